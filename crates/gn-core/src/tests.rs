//! Unit tests for gn-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, MapId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::from_index(42), id);
    }

    #[test]
    fn ordering_follows_creation() {
        assert!(AgentId(0) < AgentId(1));
        assert!(MapId(3) > MapId(2));
    }

    #[test]
    fn default_is_invalid() {
        assert_eq!(AgentId::default(), AgentId::INVALID);
        assert_eq!(MapId::INVALID.0, u32::MAX);
        assert!(!MapId::default().is_valid());
        assert!(MapId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "agent#7");
        assert_eq!(MapId(0).to_string(), "map#0");
        assert_eq!(AgentId::INVALID.to_string(), "agent#-");
    }
}

#[cfg(test)]
mod geo {
    use crate::{GridPoint, Point, Size};

    #[test]
    fn cell_of_point_floors() {
        assert_eq!(Point::new(3.5, 3.5).cell(), GridPoint::new(3, 3));
        assert_eq!(Point::new(3.999, 0.0).cell(), GridPoint::new(3, 0));
        assert_eq!(Point::new(-0.25, 1.0).cell(), GridPoint::new(-1, 1));
    }

    #[test]
    fn center_is_half_offset() {
        let c = GridPoint::new(2, 5).center();
        assert_eq!(c, Point::new(2.5, 5.5));
        assert_eq!(c.cell(), GridPoint::new(2, 5));
    }

    #[test]
    fn distance_and_length() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-6);
        assert!(((b - a).length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn scale_unscale() {
        let p = Point::new(2.0, 3.0);
        let s = Point::new(32.0, 16.0);
        assert_eq!(p.scale(s), Point::new(64.0, 48.0));
        assert!(p.scale(s).unscale(s).approx_eq(p, 1e-6));
    }

    #[test]
    fn size_helpers() {
        assert_eq!(Size::new(4, 3).area(), 12);
        assert_eq!(Size::new(0, 3).area(), 0);
        assert_eq!(Size::new(-2, 3).area(), 0);
        assert_eq!(Size::new(4, 3).min_dimension(), 3);
        assert_eq!(Size::new(32.0_f32, 16.0).mean(), 24.0);
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn tick_display_and_order() {
        assert_eq!(Tick(7).to_string(), "T7");
        assert!(Tick::ZERO < Tick(1));
        assert_eq!(SimClock::new(0.25).to_string(), "T0 (0.00s)");
    }

    #[test]
    fn clock_elapsed() {
        let mut clock = SimClock::new(0.5);
        assert_eq!(clock.elapsed_secs(), 0.0);
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick, Tick(2));
        assert!((clock.elapsed_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ticks_for_distance_rounds_up() {
        let clock = SimClock::new(1.0);
        assert_eq!(clock.ticks_for_distance(5.0, 2.0), Some(3));
        assert_eq!(clock.ticks_for_distance(4.0, 2.0), Some(2));
        assert_eq!(clock.ticks_for_distance(4.0, 0.0), None);
    }

    #[test]
    fn default_config_is_valid() {
        let cfg = SimConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.end_tick(), Tick(cfg.total_ticks));
        assert_eq!(cfg.make_clock().dt_secs, cfg.dt_secs);
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = SimConfig { dt_secs: -1.0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = SimConfig { arrival_epsilon: 0.0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = SimConfig { dt_secs: f32::NAN, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }
}

#[cfg(test)]
mod signal {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::Signal;

    #[test]
    fn fires_in_subscription_order() {
        let signal: Signal<i32> = Signal::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        let _a = signal.connect(move |v| l1.borrow_mut().push(("a", *v)));
        let l2 = Rc::clone(&log);
        let _b = signal.connect(move |v| l2.borrow_mut().push(("b", *v)));

        assert_eq!(signal.notify(&7), 2);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn dropping_handle_disconnects() {
        let signal: Signal<()> = Signal::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let receiver = signal.connect(move |_| h.set(h.get() + 1));
        signal.notify(&());
        drop(receiver);
        signal.notify(&());
        assert_eq!(hits.get(), 1);
        assert!(signal.is_empty());
    }

    #[test]
    fn keyed_receivers_are_owned_by_signal() {
        let signal: Signal<()> = Signal::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _ = signal.connect_keyed("counter", move |_| h.set(h.get() + 1));
        signal.notify(&());
        assert!(signal.is_keyed("counter"));
        assert!(signal.disconnect_keyed("counter"));
        assert!(!signal.disconnect_keyed("counter"));
        signal.notify(&());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn blocked_signal_drops_silently() {
        let signal: Signal<()> = Signal::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _r = signal.connect(move |_| h.set(h.get() + 1));

        signal.block();
        signal.block();
        assert_eq!(signal.notify(&()), 0);
        assert!(!signal.unblock());
        assert!(signal.unblock(), "a notification was dropped while blocked");
        signal.notify(&());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn blocked_receiver_is_skipped() {
        let signal: Signal<()> = Signal::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let r = signal.connect(move |_| h.set(h.get() + 1));
        r.block();
        signal.notify(&());
        r.unblock();
        signal.notify(&());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn disconnect_during_dispatch_is_deferred() {
        let signal: Rc<Signal<()>> = Rc::new(Signal::new());
        let second_hits = Rc::new(Cell::new(0));

        // The first receiver disconnects the second one mid-dispatch.
        let victim: Rc<RefCell<Option<Rc<crate::Receiver<()>>>>> = Rc::new(RefCell::new(None));
        let sig = Rc::downgrade(&signal);
        let v = Rc::clone(&victim);
        let _first = signal.connect(move |_| {
            if let (Some(sig), Some(r)) = (sig.upgrade(), v.borrow().as_ref()) {
                sig.disconnect(r);
            }
        });
        let h = Rc::clone(&second_hits);
        let second = signal.connect(move |_| h.set(h.get() + 1));
        *victim.borrow_mut() = Some(Rc::clone(&second));

        signal.notify(&());
        assert_eq!(second_hits.get(), 0, "removed receiver must not run");
        assert_eq!(signal.len(), 1);
        signal.notify(&());
        assert_eq!(second_hits.get(), 0);
    }

    #[test]
    fn clear_removes_everything() {
        let signal: Signal<()> = Signal::new();
        let _a = signal.connect(|_| {});
        let _ = signal.connect_keyed("k", |_| {});
        assert_eq!(signal.len(), 2);
        signal.clear();
        assert!(signal.is_empty());
    }
}
