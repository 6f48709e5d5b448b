//! The `World` arena and its tick loop.

use log::{info, warn};

use gn_agent::{AgentSignals, NavState, NavigationAgent};
use gn_core::{AgentId, GridPoint, MapId, NavError, Point, SimClock, SimConfig, Size, Tick};
use gn_grid::GridMap;
use gn_path::{AStarPlanner, PathPlanner};

use crate::{DebugView, MapLayout, TickSummary, WorldError, WorldObserver, WorldResult};

// ── Slots ─────────────────────────────────────────────────────────────────────

/// A map with its coordinate layout and debug overlay.
#[derive(Debug)]
pub(crate) struct MapSlot {
    pub(crate) map:    GridMap,
    pub(crate) layout: MapLayout,
    pub(crate) debug:  DebugView,
}

/// An agent with the four signals it fires.
#[derive(Debug)]
pub(crate) struct AgentSlot {
    pub(crate) agent:   NavigationAgent,
    pub(crate) signals: AgentSignals,
}

// ── World ─────────────────────────────────────────────────────────────────────

/// Owns every map and agent and drives them tick by tick.
///
/// Maps and agents live in `Vec<Option<_>>` arenas addressed by [`MapId`] and
/// [`AgentId`]; ids are never reused after removal.  An agent refers to its
/// map by id only, so the world decides lifetimes: a map cannot be removed
/// while agents are still bound to it.
///
/// # Update order
///
/// Agents are updated in creation order (ascending `AgentId`).  Each agent's
/// footprint sync happens before the next agent searches, so later agents
/// see earlier agents' post-move positions within the same tick.  The order
/// is stable, which makes runs reproducible.
///
/// # Signals and re-entrancy
///
/// Signal callbacks receive `&NavigationAgent` after the transition.  They
/// cannot reach back into the world; callers that want to react (e.g. give
/// an arrived agent a new goal) record the id and act after `update`.
#[derive(Debug)]
pub struct World<P: PathPlanner = AStarPlanner> {
    pub config:        SimConfig,
    pub clock:         SimClock,
    planner:           P,
    pub(crate) maps:   Vec<Option<MapSlot>>,
    pub(crate) agents: Vec<Option<AgentSlot>>,
}

impl World<AStarPlanner> {
    /// A world searching with the default [`AStarPlanner`].
    pub fn new(config: SimConfig) -> WorldResult<Self> {
        Self::with_planner(config, AStarPlanner::default())
    }
}

impl<P: PathPlanner> World<P> {
    pub fn with_planner(config: SimConfig, planner: P) -> WorldResult<Self> {
        config.validate()?;
        Ok(Self {
            clock: config.make_clock(),
            config,
            planner,
            maps: Vec::new(),
            agents: Vec::new(),
        })
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }

    // ── Maps ──────────────────────────────────────────────────────────────

    pub fn add_map(&mut self, size: Size<i32>, corners: bool, layout: MapLayout) -> WorldResult<MapId> {
        layout.validate()?;
        let map = GridMap::new(size, corners)?;
        let id = MapId::from_index(self.maps.len());
        self.maps.push(Some(MapSlot { map, layout, debug: DebugView::new() }));
        info!("added {id}: {size} cells, corners={corners}");
        Ok(id)
    }

    /// Copy `id`'s obstacles, corner policy and layout into a new map.
    /// Reservations are not copied; agents stay on the source map.
    pub fn clone_map(&mut self, id: MapId) -> WorldResult<MapId> {
        let source = self.map_slot(id)?;
        let slot = MapSlot {
            map:    source.map.clone_static(),
            layout: source.layout,
            debug:  DebugView::new(),
        };
        let clone = MapId::from_index(self.maps.len());
        self.maps.push(Some(slot));
        info!("cloned {id} into {clone}");
        Ok(clone)
    }

    /// Remove an empty map.  Fails while any agent is bound to it.
    pub fn remove_map(&mut self, id: MapId) -> WorldResult<()> {
        self.map_slot(id)?;
        let bound = self.agents().filter(|a| a.map() == id).count();
        if bound > 0 {
            return Err(WorldError::MapInUse { map: id, agents: bound });
        }
        self.maps[id.index()] = None;
        info!("removed {id}");
        Ok(())
    }

    pub fn map(&self, id: MapId) -> WorldResult<&GridMap> {
        Ok(&self.map_slot(id)?.map)
    }

    pub fn layout(&self, id: MapId) -> WorldResult<&MapLayout> {
        Ok(&self.map_slot(id)?.layout)
    }

    pub fn debug_view(&self, id: MapId) -> WorldResult<&DebugView> {
        Ok(&self.map_slot(id)?.debug)
    }

    /// Live map ids in creation order.
    pub fn map_ids(&self) -> impl Iterator<Item = MapId> + '_ {
        self.maps
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| MapId::from_index(i))
    }

    pub(crate) fn map_slot(&self, id: MapId) -> WorldResult<&MapSlot> {
        self.maps
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or_else(|| NavError::MapNotFound(id).into())
    }

    pub(crate) fn map_slot_mut(&mut self, id: MapId) -> WorldResult<&mut MapSlot> {
        self.maps
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or_else(|| NavError::MapNotFound(id).into())
    }

    /// Resize a map, then repair every agent bound to it: forget reserved
    /// cells that fell off the grid and pull footprints back inside.
    pub fn resize_grid(&mut self, id: MapId, size: Size<i32>) -> WorldResult<()> {
        let slot = self
            .maps
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(NavError::MapNotFound(id))?;
        slot.map.resize(size)?;

        for agent_slot in self.agents.iter_mut().flatten() {
            let agent = &mut agent_slot.agent;
            if agent.map() != id {
                continue;
            }
            agent.prune_reserved_outside(&slot.map);
            if agent.clamp_to(&mut slot.map)? {
                warn!("{} clamped into resized {id} at {}", agent.id(), agent.position());
            }
        }
        slot.debug.rebuild(&slot.map, &slot.layout);
        info!("resized {id} to {size}");
        Ok(())
    }

    // ── Agents ────────────────────────────────────────────────────────────

    /// Spawn an agent at grid-space `position` on map `map`.
    pub fn add_agent(&mut self, map: MapId, position: Point, footprint_size: i32) -> WorldResult<AgentId> {
        let id = AgentId::from_index(self.agents.len());
        let slot = self.map_slot_mut(map)?;
        let agent = NavigationAgent::new(id, map, &mut slot.map, position, footprint_size)?;
        self.agents.push(Some(AgentSlot { agent, signals: AgentSignals::new() }));
        info!("added {id} on {map} at {position} (footprint {footprint_size})");
        Ok(id)
    }

    /// Duplicate an agent onto the same map.  The clone reserves its own
    /// footprint and starts with an empty path and no signal subscribers.
    pub fn clone_agent(&mut self, id: AgentId) -> WorldResult<AgentId> {
        let clone_id = AgentId::from_index(self.agents.len());
        let source = self
            .agents
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(NavError::AgentNotFound(id))?;
        let map_id = source.agent.map();
        let slot = self
            .maps
            .get_mut(map_id.index())
            .and_then(Option::as_mut)
            .ok_or(NavError::MapNotFound(map_id))?;
        let agent = source.agent.clone_as(clone_id, &mut slot.map)?;
        self.agents.push(Some(AgentSlot { agent, signals: AgentSignals::new() }));
        info!("cloned {id} into {clone_id}");
        Ok(clone_id)
    }

    /// Destroy an agent, releasing its footprint and dropping its signals.
    pub fn remove_agent(&mut self, id: AgentId) -> WorldResult<()> {
        let slot = self
            .agents
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(NavError::AgentNotFound(id))?;
        let map_id = slot.agent.map();
        let map = &mut self.map_slot_mut(map_id)?.map;
        slot.agent.retire(map)?;
        info!("removed {id}");
        Ok(())
    }

    pub fn agent(&self, id: AgentId) -> WorldResult<&NavigationAgent> {
        Ok(&self.agent_slot(id)?.agent)
    }

    /// The agent's `on_start` / `on_stop` / `on_arrive` / `on_blocked`
    /// signals, for subscribing.
    pub fn signals(&self, id: AgentId) -> WorldResult<&AgentSignals> {
        Ok(&self.agent_slot(id)?.signals)
    }

    /// Live agents in update order.
    pub fn agents(&self) -> impl Iterator<Item = &NavigationAgent> + '_ {
        self.agents.iter().flatten().map(|s| &s.agent)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.iter().flatten().count()
    }

    pub(crate) fn agent_slot(&self, id: AgentId) -> WorldResult<&AgentSlot> {
        self.agents
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or_else(|| NavError::AgentNotFound(id).into())
    }

    /// Run `f` with the agent and its map borrowed mutably together.
    pub(crate) fn with_agent_map<T>(
        &mut self,
        id: AgentId,
        f:  impl FnOnce(&mut NavigationAgent, &mut MapSlot) -> WorldResult<T>,
    ) -> WorldResult<T> {
        let slot = self
            .agents
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(NavError::AgentNotFound(id))?;
        let map_id = slot.agent.map();
        let map = self
            .maps
            .get_mut(map_id.index())
            .and_then(Option::as_mut)
            .ok_or(NavError::MapNotFound(map_id))?;
        f(&mut slot.agent, map)
    }

    /// Halt an agent and fire its `on_stop` signal.
    pub fn stop_agent(&mut self, id: AgentId) -> WorldResult<()> {
        let slot = self
            .agents
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(NavError::AgentNotFound(id))?;
        let event = slot.agent.stop();
        slot.signals.fire(event, &slot.agent);
        Ok(())
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Update every agent by `dt` seconds in creation order, firing signals
    /// and observer callbacks as events occur.  Returns the number of events.
    pub fn update<O: WorldObserver>(&mut self, dt: f32, observer: &mut O) -> WorldResult<usize> {
        let now = self.clock.current_tick;
        let mut fired = 0;

        for slot in self.agents.iter_mut().flatten() {
            let map_id = slot.agent.map();
            let map = self
                .maps
                .get_mut(map_id.index())
                .and_then(Option::as_mut)
                .ok_or(NavError::MapNotFound(map_id))?;
            let events = slot.agent.update(dt, &mut map.map, &self.planner, &self.config)?;
            for event in events {
                slot.signals.fire(event, &slot.agent);
                observer.on_agent_event(now, &slot.agent, event);
                fired += 1;
            }
        }

        for slot in self.maps.iter_mut().flatten() {
            slot.debug.recolor(&slot.map);
        }
        Ok(fired)
    }

    /// One full tick: observer start hook, `update(config.dt_secs)`, end
    /// hook, clock advance.
    pub fn step<O: WorldObserver>(&mut self, observer: &mut O) -> WorldResult<TickSummary> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let events = self.update(self.config.dt_secs, observer)?;
        let summary = self.summary(events);
        observer.on_tick_end(now, &summary);
        self.clock.advance();
        Ok(summary)
    }

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: WorldObserver>(&mut self, observer: &mut O) -> WorldResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer)?;
        }
        observer.on_run_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks (ignores `end_tick`).
    pub fn run_ticks<O: WorldObserver>(&mut self, n: u64, observer: &mut O) -> WorldResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    /// Aggregate state of every agent, with `events` fired this tick.
    pub fn summary(&self, events: usize) -> TickSummary {
        let mut summary = TickSummary { events, ..TickSummary::default() };
        for agent in self.agents() {
            summary.agents += 1;
            match agent.state() {
                NavState::Idle    => summary.idle += 1,
                NavState::Seeking => summary.seeking += 1,
                NavState::Blocked => summary.blocked += 1,
                NavState::Arrived => summary.arrived += 1,
            }
        }
        summary.reservations = self.maps.iter().flatten().map(|s| s.map.total_reservations()).sum();
        summary
    }

    /// Agents whose footprint covers `cell` on `map`, in update order.
    pub fn agents_at(&self, map: MapId, cell: GridPoint) -> Vec<AgentId> {
        self.agents()
            .filter(|a| a.map() == map && a.overlaps(cell))
            .map(NavigationAgent::id)
            .collect()
    }
}
