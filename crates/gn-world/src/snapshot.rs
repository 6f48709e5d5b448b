//! Whole-world save/load as JSON.
//!
//! Maps are stored as size, corner policy, layout and the list of statically
//! blocked cells.  Agents are stored as their [`AgentRecord`]; paths,
//! navigation state and reservations are derived and rebuilt on load, so a
//! restored agent that is away from its goal simply searches again on its
//! first update.  Signal subscriptions are not persisted.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use gn_agent::{AgentRecord, AgentSignals, NavigationAgent};
use gn_core::{AgentId, GridPoint, MapId, SimConfig, Size, Tick};
use gn_grid::GridMap;
use gn_path::PathPlanner;

use crate::world::{AgentSlot, MapSlot};
use crate::{DebugView, MapLayout, World, WorldError, WorldResult};

/// Ids may be sparse after removals, but never more than this many slots
/// past the number of records of their kind.
const MAX_ID_GAP: usize = 65_536;

fn check_slot(kind: &str, index: usize, records: usize) -> WorldResult<()> {
    if index >= records.saturating_add(MAX_ID_GAP) {
        return Err(WorldError::Snapshot(format!(
            "{kind} id {index} is out of range for {records} record(s)"
        )));
    }
    Ok(())
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub id:           MapId,
    pub size:         Size<i32>,
    pub corners:      bool,
    pub layout:       MapLayout,
    #[serde(default)]
    pub static_cells: Vec<GridPoint>,
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id:     AgentId,
    #[serde(flatten)]
    pub record: AgentRecord,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub config: SimConfig,
    pub tick:   Tick,
    pub maps:   Vec<MapSnapshot>,
    pub agents: Vec<AgentSnapshot>,
}

impl WorldSnapshot {
    pub fn to_json(&self) -> WorldResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> WorldResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> WorldResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> WorldResult<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

impl<P: PathPlanner> World<P> {
    /// Capture the persistent state of every live map and agent.
    pub fn snapshot(&self) -> WorldSnapshot {
        let maps = self
            .maps
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|s| (i, s)))
            .map(|(i, s)| MapSnapshot {
                id:           MapId::from_index(i),
                size:         s.map.size(),
                corners:      s.map.corners(),
                layout:       s.layout,
                static_cells: s.map.static_cells().collect(),
            })
            .collect();
        let agents = self
            .agents()
            .map(|a| AgentSnapshot { id: a.id(), record: a.record() })
            .collect();
        WorldSnapshot { config: self.config.clone(), tick: self.now(), maps, agents }
    }

    /// Rebuild a world from `snapshot`, keeping every map and agent id.
    ///
    /// Agents are re-created in ascending id order so reservations are laid
    /// down the same way the original update order would.
    pub fn from_snapshot(snapshot: &WorldSnapshot, planner: P) -> WorldResult<Self> {
        let mut world = Self::with_planner(snapshot.config.clone(), planner)?;
        world.clock.current_tick = snapshot.tick;

        for m in &snapshot.maps {
            check_slot("map", m.id.index(), snapshot.maps.len())?;
            m.layout.validate()?;
            let mut map = GridMap::new(m.size, m.corners)?;
            for cell in &m.static_cells {
                map.set_static_blocked(*cell, true)?;
            }
            let index = m.id.index();
            if index >= world.maps.len() {
                world.maps.resize_with(index + 1, || None);
            }
            if world.maps[index].is_some() {
                return Err(WorldError::Snapshot(format!("duplicate map id {}", m.id)));
            }
            world.maps[index] = Some(MapSlot { map, layout: m.layout, debug: DebugView::new() });
        }

        let mut agents: Vec<&AgentSnapshot> = snapshot.agents.iter().collect();
        agents.sort_by_key(|a| a.id);
        let epsilon = world.config.arrival_epsilon;
        for a in agents {
            check_slot("agent", a.id.index(), snapshot.agents.len())?;
            let slot = world.map_slot_mut(a.record.map)?;
            let agent = NavigationAgent::from_record(a.id, &a.record, &mut slot.map, epsilon)?;
            let index = a.id.index();
            if index >= world.agents.len() {
                world.agents.resize_with(index + 1, || None);
            }
            if world.agents[index].is_some() {
                return Err(WorldError::Snapshot(format!("duplicate agent id {}", a.id)));
            }
            world.agents[index] = Some(AgentSlot { agent, signals: AgentSignals::new() });
        }

        info!(
            "restored world at tick {}: {} maps, {} agents",
            snapshot.tick,
            snapshot.maps.len(),
            snapshot.agents.len()
        );
        Ok(world)
    }
}
