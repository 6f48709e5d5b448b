//! Unit tests for gn-world.

#[cfg(test)]
mod helpers {
    use gn_agent::{AgentEvent, NavigationAgent};
    use gn_core::{AgentId, Point, SimConfig, Size, Tick};

    use crate::{MapLayout, TickSummary, World, WorldObserver};

    pub fn world() -> World {
        World::new(SimConfig::default()).unwrap()
    }

    pub fn pt(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    /// 32×32 cells with the grid's top-left at (10, 10).
    pub fn layout32() -> MapLayout {
        MapLayout::new(Size::new(32.0, 32.0), pt(10.0, 10.0)).unwrap()
    }

    /// Records every observer callback.
    #[derive(Default)]
    pub struct Recorder {
        pub events:    Vec<(u64, AgentId, AgentEvent)>,
        pub starts:    u64,
        pub summaries: Vec<TickSummary>,
        pub ended_at:  Option<Tick>,
    }

    impl WorldObserver for Recorder {
        fn on_tick_start(&mut self, _tick: Tick) {
            self.starts += 1;
        }

        fn on_agent_event(&mut self, tick: Tick, agent: &NavigationAgent, event: AgentEvent) {
            self.events.push((tick.0, agent.id(), event));
        }

        fn on_tick_end(&mut self, _tick: Tick, summary: &TickSummary) {
            self.summaries.push(*summary);
        }

        fn on_run_end(&mut self, final_tick: Tick) {
            self.ended_at = Some(final_tick);
        }
    }
}

// ── Coordinate layout ─────────────────────────────────────────────────────────

#[cfg(test)]
mod layout {
    use gn_core::{GridPoint, Size};

    use super::helpers::{layout32, pt};
    use crate::MapLayout;

    #[test]
    fn grid_local_round_trip() {
        let layout = layout32();
        for y in 0..20 {
            for x in 0..20 {
                let p = pt(x as f32 + 0.25, y as f32 + 0.75);
                let back = layout.grid_from_local(layout.local_from_grid(p));
                assert!(back.approx_eq(p, 1e-4), "{p} -> {back}");

                let local = pt(x as f32 * 13.7, y as f32 * 9.1);
                let again = layout.local_from_grid(layout.grid_from_local(local));
                assert!(again.approx_eq(local, 1e-3), "{local} -> {again}");
            }
        }
    }

    #[test]
    fn cell_centre_and_offset() {
        let layout = layout32();
        assert_eq!(layout.local_from_cell(GridPoint::new(0, 0)), pt(26.0, 26.0));
        assert_eq!(layout.local_from_grid(pt(0.0, 0.0)), pt(10.0, 10.0));
        assert_eq!(layout.cell_from_local(pt(41.9, 42.1)), GridPoint::new(0, 1));
    }

    #[test]
    fn scalars_use_mean_cell_size() {
        let layout = MapLayout::new(Size::new(32.0, 16.0), pt(0.0, 0.0)).unwrap();
        assert_eq!(layout.local_from_grid_distance(2.0), 48.0);
        assert_eq!(layout.grid_from_local_distance(48.0), 2.0);
    }

    #[test]
    fn world_origin_translates() {
        let layout = layout32().with_origin(pt(100.0, -50.0));
        let local = layout.local_from_grid(pt(1.0, 1.0));
        assert_eq!(layout.world_from_local(local), pt(142.0, -8.0));
        assert_eq!(layout.local_from_world(pt(142.0, -8.0)), local);
    }

    #[test]
    fn fit_bounds_divides_rectangle() {
        let mut layout = MapLayout::default();
        layout.fit_bounds(pt(0.0, 100.0), pt(200.0, 200.0), Size::new(10, 5)).unwrap();
        assert_eq!(layout.cell_size, Size::new(20.0, 20.0));
        assert_eq!(layout.offset, pt(0.0, 100.0));
        assert_eq!(layout.bounds(Size::new(10, 5)), (pt(0.0, 100.0), pt(200.0, 200.0)));

        // Degenerate rectangles are rejected and leave the layout alone.
        assert!(layout.fit_bounds(pt(0.0, 0.0), pt(0.0, 10.0), Size::new(10, 5)).is_err());
        assert_eq!(layout.cell_size, Size::new(20.0, 20.0));
    }

    #[test]
    fn invalid_cell_size_rejected() {
        assert!(MapLayout::new(Size::new(0.0, 32.0), pt(0.0, 0.0)).is_err());
        assert!(MapLayout::new(Size::new(32.0, f32::NAN), pt(0.0, 0.0)).is_err());
        assert!(MapLayout::new(Size::new(32.0, 32.0), pt(f32::INFINITY, 0.0)).is_err());
    }
}

// ── Arena ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod arena {
    use gn_core::{AgentId, GridPoint, MapId, NavError, Size};
    use gn_grid::GridError;

    use super::helpers::{pt, world};
    use crate::{MapLayout, WorldError};

    #[test]
    fn zero_area_map_rejected() {
        let mut w = world();
        assert!(matches!(
            w.add_map(Size::new(0, 4), true, MapLayout::default()),
            Err(WorldError::Grid(GridError::InvalidSize(_)))
        ));
    }

    #[test]
    fn ids_follow_creation_order() {
        let mut w = world();
        let m = w.add_map(Size::new(8, 8), true, MapLayout::default()).unwrap();
        let a = w.add_agent(m, pt(1.5, 1.5), 1).unwrap();
        let b = w.add_agent(m, pt(3.5, 1.5), 1).unwrap();
        assert_eq!((m, a, b), (MapId(0), AgentId(0), AgentId(1)));
        let ids: Vec<_> = w.agents().map(|a| a.id()).collect();
        assert_eq!(ids, [a, b]);
    }

    #[test]
    fn remove_agent_releases_and_forgets() {
        let mut w = world();
        let m = w.add_map(Size::new(8, 8), true, MapLayout::default()).unwrap();
        let a = w.add_agent(m, pt(4.5, 4.5), 3).unwrap();
        assert_eq!(w.map(m).unwrap().total_reservations(), 9);
        w.remove_agent(a).unwrap();
        assert_eq!(w.map(m).unwrap().total_reservations(), 0);
        assert!(matches!(w.agent(a), Err(WorldError::Nav(NavError::AgentNotFound(id))) if id == a));
        assert!(w.remove_agent(a).is_err());

        // Ids are not reused.
        assert_eq!(w.add_agent(m, pt(1.5, 1.5), 1).unwrap(), AgentId(1));
    }

    #[test]
    fn map_in_use_cannot_be_removed() {
        let mut w = world();
        let m = w.add_map(Size::new(8, 8), true, MapLayout::default()).unwrap();
        let a = w.add_agent(m, pt(1.5, 1.5), 1).unwrap();
        assert!(matches!(w.remove_map(m), Err(WorldError::MapInUse { agents: 1, .. })));
        w.remove_agent(a).unwrap();
        w.remove_map(m).unwrap();
        assert!(w.map(m).is_err());
        assert_eq!(w.map_ids().count(), 0);
    }

    #[test]
    fn clone_agent_reserves_separately() {
        let mut w = world();
        let m = w.add_map(Size::new(8, 8), true, MapLayout::default()).unwrap();
        let a = w.add_agent(m, pt(3.5, 3.5), 1).unwrap();
        let b = w.clone_agent(a).unwrap();
        let cell = GridPoint::new(3, 3);
        assert_eq!(w.map(m).unwrap().reservations(cell), 2);
        assert_eq!(w.agent(b).unwrap().position(), pt(3.5, 3.5));
        assert_eq!(w.agents_at(m, cell), [a, b]);

        w.remove_agent(a).unwrap();
        assert_eq!(w.map(m).unwrap().reservations(cell), 1);
        w.remove_agent(b).unwrap();
        assert_eq!(w.map(m).unwrap().reservations(cell), 0);
    }

    #[test]
    fn clone_map_copies_obstacles_not_agents() {
        let mut w = world();
        let m = w.add_map(Size::new(8, 8), false, MapLayout::default()).unwrap();
        w.path_map(m).unwrap().set_static_blocked(GridPoint::new(2, 2), true).unwrap();
        w.add_agent(m, pt(5.5, 5.5), 1).unwrap();

        let c = w.clone_map(m).unwrap();
        let copy = w.map(c).unwrap();
        assert!(copy.statically_blocked(GridPoint::new(2, 2)));
        assert!(!copy.corners());
        assert_eq!(copy.total_reservations(), 0);
        assert_eq!(w.map(m).unwrap().total_reservations(), 1);
    }
}

// ── Tick loop, ordering, signals ──────────────────────────────────────────────

#[cfg(test)]
mod ticking {
    use std::cell::RefCell;
    use std::rc::Rc;

    use gn_agent::{AgentEvent, NavState};
    use gn_core::{AgentId, SimConfig, Size, Tick};

    use super::helpers::{Recorder, pt, world};
    use crate::{AgentBuilder, MapBuilder, World};

    /// `first` and `second` are created in that order; `mover` sits on the
    /// cell `follower` wants and steps aside.
    fn order_scenario(mover_first: bool) -> Vec<(u64, AgentId, AgentEvent)> {
        let mut w = world();
        let m = MapBuilder::new(Size::new(4, 1)).build(&mut w).unwrap();
        let mover = AgentBuilder::new(m, pt(1.5, 0.5)).goal(pt(2.5, 0.5), 0.0);
        let follower = AgentBuilder::new(m, pt(0.5, 0.5)).goal(pt(1.5, 0.5), 0.0);
        if mover_first {
            mover.spawn(&mut w).unwrap();
            follower.spawn(&mut w).unwrap();
        } else {
            follower.spawn(&mut w).unwrap();
            mover.spawn(&mut w).unwrap();
        }
        let mut rec = Recorder::default();
        w.run_ticks(3, &mut rec).unwrap();
        rec.events
    }

    #[test]
    fn later_agents_see_earlier_moves() {
        use AgentEvent::*;
        assert_eq!(
            order_scenario(true),
            [(0, AgentId(0), Start), (0, AgentId(0), Arrive), (0, AgentId(1), Start), (0, AgentId(1), Arrive)]
        );
        assert_eq!(
            order_scenario(false),
            [
                (0, AgentId(0), Blocked),
                (0, AgentId(1), Start),
                (0, AgentId(1), Arrive),
                (1, AgentId(0), Start),
                (1, AgentId(0), Arrive),
            ]
        );
    }

    #[test]
    fn runs_are_reproducible() {
        assert_eq!(order_scenario(false), order_scenario(false));
    }

    #[test]
    fn signals_fire_in_subscription_order() {
        let mut w = world();
        let m = MapBuilder::new(Size::new(10, 3)).build(&mut w).unwrap();
        let id = AgentBuilder::new(m, pt(0.5, 1.5)).speed(2.0).goal(pt(6.5, 1.5), 0.0).spawn(&mut w).unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        let signals = w.signals(id).unwrap();
        let l = Rc::clone(&log);
        let _start = signals.on_start.connect(move |a| l.borrow_mut().push(("start", a.state())));
        let l = Rc::clone(&log);
        let _first = signals.on_arrive.connect(move |a| l.borrow_mut().push(("arrive-1", a.state())));
        let l = Rc::clone(&log);
        let _second = signals.on_arrive.connect(move |a| l.borrow_mut().push(("arrive-2", a.state())));

        w.run_ticks(10, &mut crate::NoopObserver).unwrap();
        assert_eq!(
            *log.borrow(),
            [("start", NavState::Seeking), ("arrive-1", NavState::Arrived), ("arrive-2", NavState::Arrived)]
        );
    }

    #[test]
    fn blocked_signal_drops_notifications() {
        let mut w = world();
        let m = MapBuilder::new(Size::new(6, 1)).build(&mut w).unwrap();
        let id = AgentBuilder::new(m, pt(0.5, 0.5)).goal(pt(5.5, 0.5), 0.0).spawn(&mut w).unwrap();
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        let _r = w.signals(id).unwrap().on_arrive.connect(move |_| *h.borrow_mut() += 1);

        w.signals(id).unwrap().on_arrive.block();
        w.run_ticks(10, &mut crate::NoopObserver).unwrap();
        assert_eq!(*hits.borrow(), 0);
        assert!(w.signals(id).unwrap().on_arrive.unblock());
        assert_eq!(w.agent(id).unwrap().state(), NavState::Arrived);
    }

    #[test]
    fn stop_through_facade_fires_on_stop() {
        let mut w = world();
        let m = MapBuilder::new(Size::new(6, 1)).build(&mut w).unwrap();
        let id = AgentBuilder::new(m, pt(0.5, 0.5)).goal(pt(5.5, 0.5), 0.0).spawn(&mut w).unwrap();
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        let _r = w.signals(id).unwrap().on_stop.connect(move |_| *h.borrow_mut() += 1);

        w.run_ticks(1, &mut crate::NoopObserver).unwrap();
        w.path_agent(id).unwrap().stop().unwrap();
        w.path_agent(id).unwrap().stop().unwrap();
        assert_eq!(*hits.borrow(), 2);
        assert!(!w.path_agent(id).unwrap().pathfinding().unwrap());
        assert_eq!(w.map(m).unwrap().total_reservations(), 1);
    }

    #[test]
    fn run_stops_at_end_tick() {
        let cfg = SimConfig { total_ticks: 5, ..SimConfig::default() };
        let mut w = World::new(cfg).unwrap();
        let m = MapBuilder::new(Size::new(4, 4)).build(&mut w).unwrap();
        AgentBuilder::new(m, pt(0.5, 0.5)).spawn(&mut w).unwrap();
        let mut rec = Recorder::default();
        w.run(&mut rec).unwrap();
        assert_eq!(rec.starts, 5);
        assert_eq!(rec.ended_at, Some(Tick(5)));
        assert_eq!(w.now(), Tick(5));
        assert!(rec.summaries.iter().all(|s| s.agents == 1 && s.idle == 1 && s.reservations == 1));
    }

    #[test]
    fn summary_counts_states() {
        let mut w = world();
        let m = MapBuilder::new(Size::new(10, 3))
            .block_region(gn_core::GridPoint::new(5, 0), Size::new(1, 3))
            .build(&mut w)
            .unwrap();
        AgentBuilder::new(m, pt(0.5, 0.5)).goal(pt(9.5, 0.5), 0.0).spawn(&mut w).unwrap();
        AgentBuilder::new(m, pt(0.5, 2.5)).goal(pt(3.5, 2.5), 0.0).spawn(&mut w).unwrap();
        AgentBuilder::new(m, pt(2.5, 1.5)).spawn(&mut w).unwrap();
        let summary = w.step(&mut crate::NoopObserver).unwrap();
        assert_eq!(summary.agents, 3);
        assert_eq!(summary.blocked, 1);
        assert_eq!(summary.seeking, 1);
        assert_eq!(summary.idle, 1);
        assert_eq!(summary.events, 2);
    }
}

// ── Resize ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod resize {
    use gn_core::{GridPoint, Size};

    use super::helpers::{pt, world};
    use crate::{AgentBuilder, MapBuilder};

    #[test]
    fn shrinking_clamps_agents_inside() {
        let mut w = world();
        let m = MapBuilder::new(Size::new(10, 10)).build(&mut w).unwrap();
        let small = AgentBuilder::new(m, pt(9.5, 9.5)).spawn(&mut w).unwrap();
        let wide = AgentBuilder::new(m, pt(8.5, 1.5)).footprint(3).spawn(&mut w).unwrap();

        w.path_map(m).unwrap().resize_grid(Size::new(6, 6)).unwrap();

        let grid = w.map(m).unwrap();
        assert_eq!(w.agent(small).unwrap().position(), pt(5.5, 5.5));
        assert_eq!(w.agent(wide).unwrap().position(), pt(4.5, 1.5));
        assert_eq!(grid.reservations(GridPoint::new(5, 5)), 1);
        assert_eq!(grid.total_reservations(), 1 + 9);
        for a in w.agents() {
            assert!(a.footprint().within(grid.size()));
            assert!(a.reserved_cells().iter().all(|c| grid.in_bounds(*c)));
        }
    }

    #[test]
    fn growing_keeps_obstacles_and_agents() {
        let mut w = world();
        let m = MapBuilder::new(Size::new(4, 4)).block(GridPoint::new(1, 1)).build(&mut w).unwrap();
        let a = AgentBuilder::new(m, pt(3.5, 3.5)).spawn(&mut w).unwrap();
        w.resize_grid(m, Size::new(8, 8)).unwrap();
        assert!(w.map(m).unwrap().statically_blocked(GridPoint::new(1, 1)));
        assert_eq!(w.agent(a).unwrap().position(), pt(3.5, 3.5));
        assert_eq!(w.map(m).unwrap().total_reservations(), 1);
    }

    #[test]
    fn agents_keep_working_after_resize() {
        let mut w = world();
        let m = MapBuilder::new(Size::new(10, 4)).build(&mut w).unwrap();
        let a = AgentBuilder::new(m, pt(0.5, 0.5)).goal(pt(9.5, 0.5), 0.0).spawn(&mut w).unwrap();
        w.run_ticks(2, &mut crate::NoopObserver).unwrap();
        w.resize_grid(m, Size::new(5, 4)).unwrap();
        // The goal is now off the grid: unreachable, not a crash.
        w.run_ticks(3, &mut crate::NoopObserver).unwrap();
        assert_eq!(w.agent(a).unwrap().state(), gn_agent::NavState::Blocked);
        w.path_agent(a).unwrap().set_grid_goal(pt(4.5, 3.5), 0.0).unwrap();
        w.run_ticks(10, &mut crate::NoopObserver).unwrap();
        assert_eq!(w.agent(a).unwrap().state(), gn_agent::NavState::Arrived);
    }
}

// ── Facade ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod facade {
    use gn_core::{GridPoint, Size};

    use super::helpers::{layout32, pt, world};
    use crate::{AgentBuilder, World};

    fn setup() -> (World, gn_core::MapId, gn_core::AgentId) {
        let mut w = world();
        let m = w.add_map(Size::new(10, 10), true, layout32()).unwrap();
        w.path_map(m).unwrap().set_static_blocked(GridPoint::new(2, 0), true).unwrap();
        let a = AgentBuilder::new(m, pt(3.5, 2.5)).speed(2.0).spawn(&mut w).unwrap();
        (w, m, a)
    }

    #[test]
    fn local_and_grid_views_agree() {
        let (mut w, _, a) = setup();
        let mut agent = w.path_agent(a).unwrap();
        assert_eq!(agent.local_position().unwrap(), pt(122.0, 90.0));
        assert_eq!(agent.local_speed().unwrap(), 64.0);

        agent.set_local_position(pt(186.0, 58.0)).unwrap();
        assert!(agent.grid_position().unwrap().approx_eq(pt(5.5, 1.5), 1e-5));

        agent.set_local_speed(96.0).unwrap();
        assert!((agent.grid_speed().unwrap() - 3.0).abs() < 1e-6);

        agent.set_local_goal(pt(282.0, 282.0), 16.0).unwrap();
        assert!(agent.grid_goal().unwrap().approx_eq(pt(8.5, 8.5), 1e-5));
        assert!((agent.agent().unwrap().tolerance() - 0.5).abs() < 1e-6);
        assert!(agent.local_goal().unwrap().approx_eq(pt(282.0, 282.0), 1e-3));
    }

    #[test]
    fn world_position_adds_origin() {
        let (mut w, m, a) = setup();
        w.path_map(m).unwrap().set_origin(pt(1000.0, 0.0)).unwrap();
        assert_eq!(w.path_agent(a).unwrap().world_position().unwrap(), pt(1122.0, 90.0));
    }

    #[test]
    fn out_of_grid_requests_are_clamped() {
        let (mut w, _, a) = setup();
        let mut agent = w.path_agent(a).unwrap();
        agent.set_grid_goal(pt(50.0, -3.0), 0.0).unwrap();
        assert_eq!(agent.grid_goal().unwrap(), pt(9.5, 0.5));
        agent.set_grid_position(pt(-7.0, 4.2)).unwrap();
        assert_eq!(agent.grid_position().unwrap(), pt(0.5, 4.5));
        assert!(agent.set_grid_position(pt(f32::NAN, 1.0)).is_err());
    }

    #[test]
    fn node_and_overlap_queries() {
        let (mut w, m, a) = setup();
        {
            let map = w.path_map(m).unwrap();
            assert!(map.node_from_local(pt(10.0 + 32.0 * 2.2, 13.0)).unwrap().static_blocked);
            assert_eq!(map.node_from_grid(GridPoint::new(3, 2)).unwrap().reservations, 1);
            assert!(map.node_from_local(pt(5.0, 5.0)).is_err());
            assert!(map.statically_blocked(GridPoint::new(2, 0)).unwrap());
            assert!(map.blocked(GridPoint::new(3, 2)).unwrap());
        }
        let mut agent = w.path_agent(a).unwrap();
        assert!(agent.grid_overlaps(GridPoint::new(3, 2)).unwrap());
        assert!(agent.local_overlaps(pt(122.0, 90.0)).unwrap());
        assert!(!agent.local_overlaps(pt(160.0, 90.0)).unwrap());

        agent.set_grid_size(3).unwrap();
        assert!(agent.grid_overlaps(GridPoint::new(4, 3)).unwrap());
        assert_eq!(w.map(m).unwrap().total_reservations(), 9);
    }

    #[test]
    fn footprint_toggle_through_facade() {
        let (mut w, m, a) = setup();
        let mut agent = w.path_agent(a).unwrap();
        assert!(agent.has_footprint().unwrap());
        agent.disable_footprint().unwrap();
        assert!(!agent.has_footprint().unwrap());
        assert_eq!(w.map(m).unwrap().total_reservations(), 0);
        w.path_agent(a).unwrap().enable_footprint().unwrap();
        assert_eq!(w.map(m).unwrap().total_reservations(), 1);
    }

    #[test]
    fn cell_size_and_bounds() {
        let (mut w, m, _) = setup();
        let mut map = w.path_map(m).unwrap();
        assert_eq!(map.cell_size().unwrap(), Size::new(32.0, 32.0));
        assert_eq!(map.bounds().unwrap(), (pt(10.0, 10.0), pt(330.0, 330.0)));

        map.set_bounds(pt(0.0, 0.0), pt(100.0, 50.0)).unwrap();
        assert_eq!(map.cell_size().unwrap(), Size::new(10.0, 5.0));
        assert_eq!(map.local_from_cell(GridPoint::new(1, 1)).unwrap(), pt(15.0, 7.5));

        map.set_cell_size(Size::new(4.0, 4.0)).unwrap();
        assert_eq!(map.local_from_grid(pt(1.0, 1.0)).unwrap(), pt(4.0, 4.0));
        assert!(map.set_cell_size(Size::new(-1.0, 4.0)).is_err());
        assert_eq!(map.local_from_grid_distance(2.0).unwrap(), 8.0);
    }

    #[test]
    fn local_path_is_scaled() {
        let (mut w, _, a) = setup();
        w.path_agent(a).unwrap().set_grid_goal(pt(3.5, 6.5), 0.0).unwrap();
        w.run_ticks(1, &mut crate::NoopObserver).unwrap();
        let agent = w.path_agent(a).unwrap();
        let grid = agent.path().unwrap();
        let local = agent.local_path().unwrap();
        assert_eq!(grid.len(), local.len());
        assert_eq!(local.last().copied(), Some(pt(122.0, 218.0)));
    }
}

// ── Debug overlay ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod debug {
    use gn_core::{GridPoint, Size};

    use super::helpers::{layout32, pt, world};
    use crate::debug::{OPEN_TILES, RESERVED_TILE, STATIC_BLOCKED_TILE};
    use crate::AgentBuilder;

    #[test]
    fn overlay_tracks_map() {
        let mut w = world();
        let m = w.add_map(Size::new(4, 3), true, layout32()).unwrap();
        assert!(w.debug_view(m).unwrap().tiles().is_empty(), "hidden overlays are not built");

        let mut map = w.path_map(m).unwrap();
        map.set_static_blocked(GridPoint::new(0, 0), true).unwrap();
        map.show().unwrap();
        assert!(map.debug_visible().unwrap());
        assert_eq!(map.debug_tiles().unwrap().len(), 12);

        AgentBuilder::new(m, pt(2.5, 1.5)).spawn(&mut w).unwrap();
        w.run_ticks(1, &mut crate::NoopObserver).unwrap();

        let view = w.debug_view(m).unwrap();
        let tile = view.tile(GridPoint::new(1, 2)).unwrap();
        assert_eq!(tile.corners[0], pt(42.0, 74.0));
        assert_eq!(tile.corners[2], pt(74.0, 106.0));
        assert_eq!(view.tile(GridPoint::new(0, 0)).unwrap().color, STATIC_BLOCKED_TILE);
        assert_eq!(view.tile(GridPoint::new(2, 1)).unwrap().color, RESERVED_TILE);
        assert_eq!(view.tile(GridPoint::new(1, 0)).unwrap().color, OPEN_TILES[1]);
        assert_eq!(view.tile(GridPoint::new(1, 1)).unwrap().color, OPEN_TILES[0]);
        assert!(view.tile(GridPoint::new(4, 0)).is_none());
    }

    #[test]
    fn resize_and_cell_size_rebuild_visible_overlay() {
        let mut w = world();
        let m = w.add_map(Size::new(4, 3), true, layout32()).unwrap();
        let mut map = w.path_map(m).unwrap();
        map.show().unwrap();
        map.resize_grid(Size::new(5, 5)).unwrap();
        assert_eq!(map.debug_tiles().unwrap().len(), 25);

        map.set_cell_size(Size::new(10.0, 10.0)).unwrap();
        assert_eq!(map.debug_tiles().unwrap()[6].corners[0], pt(20.0, 20.0));

        map.hide().unwrap();
        assert!(!map.debug_visible().unwrap());
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod snapshot {
    use gn_agent::{AgentEvent, NavState};
    use gn_core::{AgentId, GridPoint, MapId, Size};
    use gn_path::AStarPlanner;

    use super::helpers::{Recorder, layout32, pt, world};
    use crate::{AgentBuilder, MapBuilder, World, WorldError, WorldSnapshot};

    fn populated() -> World {
        let mut w = world();
        let m = w.add_map(Size::new(12, 12), true, layout32()).unwrap();
        w.path_map(m).unwrap().set_static_region(GridPoint::new(6, 0), Size::new(1, 9), true).unwrap();
        AgentBuilder::new(m, pt(1.5, 1.5)).speed(1.5).goal(pt(10.5, 1.5), 0.0).spawn(&mut w).unwrap();
        AgentBuilder::new(m, pt(3.5, 10.5)).footprint(2).ghost().spawn(&mut w).unwrap();
        w.run_ticks(3, &mut crate::NoopObserver).unwrap();
        w
    }

    #[test]
    fn json_round_trip_restores_world() {
        let w = populated();
        let snap = w.snapshot();
        let back = WorldSnapshot::from_json(&snap.to_json().unwrap()).unwrap();
        assert_eq!(back, snap);

        let mut restored = World::from_snapshot(&back, AStarPlanner::default()).unwrap();
        assert_eq!(restored.snapshot(), snap);
        assert_eq!(restored.now(), w.now());
        for m in w.map_ids() {
            assert_eq!(
                restored.map(m).unwrap().total_reservations(),
                w.map(m).unwrap().total_reservations()
            );
        }

        let first = restored.agents().next().map(|a| a.id()).unwrap();
        assert!(restored.agent(first).unwrap().pathfinding());
        restored.run_ticks(40, &mut crate::NoopObserver).unwrap();
        assert_eq!(restored.agent(first).unwrap().state(), gn_agent::NavState::Arrived);
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");
        let snap = populated().snapshot();
        snap.save(&path).unwrap();
        assert_eq!(WorldSnapshot::load(&path).unwrap(), snap);
    }

    #[test]
    fn dangling_map_reference_rejected() {
        let mut snap = populated().snapshot();
        snap.maps.clear();
        assert!(World::from_snapshot(&snap, AStarPlanner::default()).is_err());
    }

    fn reload(w: &World) -> World {
        let json = w.snapshot().to_json().unwrap();
        World::from_snapshot(&WorldSnapshot::from_json(&json).unwrap(), AStarPlanner::default()).unwrap()
    }

    #[test]
    fn stopped_agent_stays_stopped_after_reload() {
        let mut w = world();
        let m = MapBuilder::new(Size::new(8, 5)).build(&mut w).unwrap();
        let id = AgentBuilder::new(m, pt(1.5, 2.5)).goal(pt(6.5, 2.5), 0.0).spawn(&mut w).unwrap();
        w.run_ticks(1, &mut crate::NoopObserver).unwrap();
        w.stop_agent(id).unwrap();
        let here = w.agent(id).unwrap().position();
        assert_eq!(w.agent(id).unwrap().goal(), here);

        let mut restored = reload(&w);
        let mut rec = Recorder::default();
        restored.run_ticks(3, &mut rec).unwrap();
        assert!(rec.events.is_empty(), "{:?}", rec.events);
        let agent = restored.agent(id).unwrap();
        assert_eq!(agent.position(), here);
        assert!(!agent.pathfinding());
        assert_eq!(agent.state(), NavState::Idle);
    }

    #[test]
    fn arrival_inside_tolerance_is_not_replayed() {
        let mut w = world();
        let m = MapBuilder::new(Size::new(12, 3)).build(&mut w).unwrap();
        let id = AgentBuilder::new(m, pt(0.5, 1.5)).goal(pt(10.5, 1.5), 3.0).spawn(&mut w).unwrap();
        let mut rec = Recorder::default();
        w.run_ticks(12, &mut rec).unwrap();
        assert_eq!(rec.events.last(), Some(&(6, id, AgentEvent::Arrive)));

        let mut restored = reload(&w);
        let mut rec = Recorder::default();
        restored.run_ticks(5, &mut rec).unwrap();
        assert!(rec.events.is_empty(), "{:?}", rec.events);
        assert!(restored.agent(id).unwrap().position().approx_eq(pt(7.5, 1.5), 1e-3));
    }

    #[test]
    fn absurd_ids_rejected() {
        let mut snap = populated().snapshot();
        snap.agents[0].id = AgentId(u32::MAX - 1);
        assert!(matches!(
            World::from_snapshot(&snap, AStarPlanner::default()),
            Err(WorldError::Snapshot(_))
        ));

        let mut snap = populated().snapshot();
        snap.maps[0].id = MapId(4_000_000_000);
        assert!(matches!(
            World::from_snapshot(&snap, AStarPlanner::default()),
            Err(WorldError::Snapshot(_))
        ));
    }

    #[test]
    fn sparse_ids_survive_reload() {
        let mut w = world();
        let m = MapBuilder::new(Size::new(6, 6)).build(&mut w).unwrap();
        let gone = AgentBuilder::new(m, pt(0.5, 0.5)).spawn(&mut w).unwrap();
        let kept = AgentBuilder::new(m, pt(4.5, 4.5)).spawn(&mut w).unwrap();
        w.remove_agent(gone).unwrap();
        let restored = reload(&w);
        assert!(restored.agent(gone).is_err());
        assert_eq!(restored.agent(kept).unwrap().position(), pt(4.5, 4.5));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(WorldSnapshot::from_json("{ not json").is_err());
    }
}
