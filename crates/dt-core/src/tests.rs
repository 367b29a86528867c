//! Unit tests for dt-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EntityId, EventId, LaneId, ZoneId};

    #[test]
    fn index_roundtrip() {
        let id = EntityId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(EntityId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(EntityId::INVALID.0, u32::MAX);
        assert_eq!(LaneId::INVALID.0, u32::MAX);
        assert_eq!(ZoneId::INVALID.0, u16::MAX);
        assert_eq!(EventId::INVALID.0, u64::MAX);
        assert!(!LaneId::default().is_valid());
        assert!(LaneId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(EntityId(7).to_string(), "EntityId(7)");
        assert_eq!(LaneId(3).to_string(), "LaneId(3)");
    }
}

#[cfg(test)]
mod geo {
    use std::f64::consts::PI;

    use crate::geo::{lerp_angle, normalize_angle, project_onto_segment, to_degrees_positive};
    use crate::Point;

    #[test]
    fn distance_and_lerp() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.lerp(b, 0.5), Point::new(1.5, 2.0));
    }

    #[test]
    fn projection_clamps_to_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);

        let mid = project_onto_segment(Point::new(4.0, 3.0), a, b);
        assert_eq!(mid.point, Point::new(4.0, 0.0));
        assert!((mid.t - 0.4).abs() < 1e-12);
        assert!((mid.distance - 3.0).abs() < 1e-12);

        let before = project_onto_segment(Point::new(-5.0, 0.0), a, b);
        assert_eq!(before.t, 0.0);
        assert_eq!(before.point, a);

        let after = project_onto_segment(Point::new(15.0, 1.0), a, b);
        assert_eq!(after.t, 1.0);
        assert_eq!(after.point, b);
    }

    #[test]
    fn projection_onto_degenerate_segment() {
        let a = Point::new(2.0, 2.0);
        let p = project_onto_segment(Point::new(5.0, 6.0), a, a);
        assert_eq!(p.point, a);
        assert_eq!(p.t, 0.0);
        assert!((p.distance - 5.0).abs() < 1e-12);
    }

    #[test]
    fn normalize_wraps() {
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-12);
        assert!((normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn lerp_angle_takes_short_arc() {
        let from = 170f64.to_radians();
        let to = (-170f64).to_radians();
        let half = lerp_angle(from, to, 0.5);
        // Midpoint across the wrap is ±180°, not 0°.
        assert!((half.abs() - PI).abs() < 1e-9, "got {}", half.to_degrees());

        let full = lerp_angle(from, to, 1.0);
        assert!((normalize_angle(full - to)).abs() < 1e-9);
    }

    #[test]
    fn degrees_are_positive() {
        assert!((to_degrees_positive(-PI / 2.0) - 270.0).abs() < 1e-9);
        assert_eq!(to_degrees_positive(0.0), 0.0);
        assert!(to_degrees_positive(-1e-18) < 360.0);
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, Tick};

    #[test]
    fn advance_counts_ticks() {
        let mut clock = SimClock::new(0, 100, 1.0);
        assert_eq!(clock.current_tick, Tick::ZERO);
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick, Tick(2));
        assert_eq!(clock.current_tick.to_string(), "T2");
    }

    #[test]
    fn sim_speed_scales_tick_secs() {
        let clock = SimClock::new(0, 100, 1.0);
        assert!((clock.tick_secs() - 0.1).abs() < 1e-12);
        let fast = SimClock::new(0, 100, 4.0);
        assert!((fast.tick_secs() - 0.4).abs() < 1e-12);
        assert_eq!(fast.interval().as_millis(), 100);
    }

    #[test]
    fn clock_elapsed_ms() {
        let mut clock = SimClock::new(1_000, 250, 2.0);
        assert_eq!(clock.current_unix_ms(), 1_000);
        clock.advance();
        clock.advance();
        assert_eq!(clock.elapsed_ms(), 1_000);
        assert_eq!(clock.current_unix_ms(), 2_000);
    }

    #[test]
    fn clock_hms() {
        let mut clock = SimClock::new(0, 1_000, 60.0); // one simulated minute per tick
        for _ in 0..61 {
            clock.advance();
        }
        assert_eq!(clock.elapsed_hms(), (1, 1, 0));
    }
}

#[cfg(test)]
mod rng {
    use crate::{EntityId, EntityRng, SimRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = EntityRng::new(12345, EntityId(0));
        let mut r2 = EntityRng::new(12345, EntityId(0));
        for _ in 0..100 {
            let a: f64 = r1.random();
            let b: f64 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn different_entities_differ() {
        let mut r0 = EntityRng::new(1, EntityId(0));
        let mut r1 = EntityRng::new(1, EntityId(1));
        let a: u64 = r0.random();
        let b: u64 = r1.random();
        assert_ne!(a, b, "seeds for adjacent entities should diverge");
    }

    #[test]
    fn gen_range_in_bounds() {
        let mut rng = EntityRng::new(0, EntityId(0));
        for _ in 0..1000 {
            let v = rng.gen_range(5.0f64..=15.0);
            assert!((5.0..=15.0).contains(&v));
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
        assert!(rng.gen_bool(7.0)); // clamped
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = EntityRng::new(0, EntityId(0));
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[9]), Some(&9));
    }
}

#[cfg(test)]
mod kind {
    use crate::{EntityKind, MotionMode};

    #[test]
    fn motion_modes() {
        assert_eq!(EntityKind::Vehicle.motion_mode(), MotionMode::Grid);
        assert_eq!(EntityKind::Load.motion_mode(), MotionMode::Lane);
        assert_eq!(EntityKind::Person.motion_mode(), MotionMode::Lane);
    }

    #[test]
    fn display() {
        assert_eq!(EntityKind::Vehicle.to_string(), "vehicle");
        assert_eq!(EntityKind::Person.to_string(), "person");
    }
}

#[cfg(test)]
mod config {
    use crate::{EntityKind, SimConfig, SpeedRange};

    #[test]
    fn default_is_valid() {
        let cfg = SimConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.population.total(), 18);
        assert_eq!(cfg.speed_range(EntityKind::Load), cfg.load_speed);
    }

    #[test]
    fn rejects_zero_tick() {
        let cfg = SimConfig { tick_ms: 0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_inverted_speed_range() {
        let cfg = SimConfig { person_speed: SpeedRange::new(2.0, 1.0), ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_bad_probability() {
        let cfg = SimConfig { event_probability: 1.5, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn tick_secs_uses_sim_speed() {
        let cfg = SimConfig { tick_ms: 200, sim_speed: 5.0, ..SimConfig::default() };
        assert!((cfg.tick_secs() - 1.0).abs() < 1e-12);
        assert!((cfg.make_clock(0).tick_secs() - 1.0).abs() < 1e-12);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_uses_defaults() {
        let cfg: SimConfig = serde_json::from_str(r#"{ "tick_ms": 50, "seed": 7 }"#).unwrap();
        assert_eq!(cfg.tick_ms, 50);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.congestion_threshold, 3);
    }
}
