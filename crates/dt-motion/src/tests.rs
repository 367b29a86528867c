//! Unit tests for dt-motion.

#[cfg(test)]
mod helpers {
    use dt_core::{EntityId, EntityKind, LaneId, Point};
    use dt_entity::EntityState;
    use dt_spatial::{LaneGraph, LaneGraphBuilder, PathGeometry, PathSegment, SegmentKind, ZoneClassifier};

    use crate::StepContext;

    pub fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    /// Graph, geometry, and zones borrowed by a `StepContext`.
    pub struct World {
        pub graph: LaneGraph,
        pub paths: PathGeometry,
        pub zones: ZoneClassifier,
    }

    impl World {
        pub fn ctx(&self, dt: f64) -> StepContext<'_> {
            StepContext {
                dt,
                sim_time: 0.0,
                graph: &self.graph,
                paths: &self.paths,
                zones: &self.zones,
                route_length: 4,
            }
        }
    }

    /// Square loop of four 20-unit lanes; grid paths are the same square.
    pub fn square() -> World {
        let mut b = LaneGraphBuilder::new();
        b.add_lane("N", vec![p(0.0, 20.0), p(20.0, 20.0)], None).unwrap();
        b.add_lane("E", vec![p(20.0, 20.0), p(20.0, 0.0)], None).unwrap();
        b.add_lane("S", vec![p(20.0, 0.0), p(0.0, 0.0)], None).unwrap();
        b.add_lane("W", vec![p(0.0, 0.0), p(0.0, 20.0)], None).unwrap();
        let graph = b.build();
        let paths = PathGeometry::from_lane_graph(&graph);
        World { graph, paths, zones: ZoneClassifier::warehouse().unwrap() }
    }

    /// `A (0,0)→(10,0)` meeting `B` and `C` at (10, 0).
    pub fn junction() -> World {
        let mut b = LaneGraphBuilder::new();
        b.add_lane("A", vec![p(0.0, 0.0), p(10.0, 0.0)], None).unwrap();
        b.add_lane("B", vec![p(10.0, 0.0), p(20.0, 0.0)], None).unwrap();
        b.add_lane("C", vec![p(10.0, 0.0), p(10.0, 10.0)], None).unwrap();
        let graph = b.build();
        let paths = PathGeometry::new(vec![
            PathSegment::new(SegmentKind::Boundary, p(0.0, 0.0), p(100.0, 0.0)),
            PathSegment::new(SegmentKind::Connector, p(50.0, 0.0), p(50.0, 40.0)),
        ]);
        World { graph, paths, zones: ZoneClassifier::single_zone() }
    }

    pub fn world_from(graph: LaneGraph) -> World {
        let paths = PathGeometry::from_lane_graph(&graph);
        World { graph, paths, zones: ZoneClassifier::single_zone() }
    }

    pub fn lane_entity(world: &World, lane: &str, progress: f64, speed: f64) -> EntityState {
        let id = world.graph.lane_id(lane).unwrap();
        let pos = world.graph.position_at_progress(id, progress).unwrap();
        let mut e = EntityState::new(EntityId(0), EntityKind::Load, pos, speed);
        e.lane = id;
        e.progress = progress;
        e.set_route(vec![id]);
        e
    }

    pub fn vehicle(at: Point, speed: f64) -> EntityState {
        let mut e = EntityState::new(EntityId(1), EntityKind::Vehicle, at, speed);
        e.lane = LaneId::INVALID;
        e
    }
}

// ── Lane motion ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod lane {
    use super::helpers::{junction, lane_entity, p, square, world_from};
    use crate::{LaneMotion, MotionError, MotionModel};
    use dt_core::{EntityId, EntityRng, LaneId};
    use dt_spatial::LaneGraphBuilder;

    fn steady() -> LaneMotion {
        LaneMotion { jitter: 0.0, speed_smoothing: 0.0 }
    }

    #[test]
    fn transition_exactly_when_progress_reaches_one() {
        let world = square();
        let ctx = world.ctx(1.0);
        let n = world.graph.lane_id("N").unwrap();
        let mut e = lane_entity(&world, "N", 0.0, 8.0); // 20-unit lane: +0.4 per tick
        let mut rng = EntityRng::new(1, EntityId(0));
        let model = steady();

        model.advance(&mut e, &mut rng, &ctx).unwrap();
        assert_eq!(e.lane, n);
        assert!((e.progress - 0.4).abs() < 1e-12);
        model.advance(&mut e, &mut rng, &ctx).unwrap();
        assert_eq!(e.lane, n);
        assert!((e.progress - 0.8).abs() < 1e-12);

        model.advance(&mut e, &mut rng, &ctx).unwrap();
        assert_ne!(e.lane, n);
        assert_eq!(e.progress, 0.0);
        assert!(world.graph.is_connected(n, e.lane).unwrap());
        assert_eq!(e.position, world.graph.position_at_progress(e.lane, 0.0).unwrap());
    }

    #[test]
    fn progress_stays_in_unit_interval() {
        let world = square();
        let model = LaneMotion::default();
        for seed in 0..20u64 {
            let ctx = world.ctx(0.1 + seed as f64 * 0.2);
            let mut e = lane_entity(&world, "E", 0.0, 1.0 + seed as f64);
            let mut rng = EntityRng::new(seed, EntityId(0));
            for _ in 0..300 {
                model.advance(&mut e, &mut rng, &ctx).unwrap();
                assert!((0.0..=1.0).contains(&e.progress), "progress {}", e.progress);
                assert!(e.speed >= 0.0);
                assert!(e.route_cursor < e.route.len());
            }
        }
    }

    #[test]
    fn planned_lane_is_taken() {
        let world = junction();
        let ctx = world.ctx(1.0);
        let (a, c) = (world.graph.lane_id("A").unwrap(), world.graph.lane_id("C").unwrap());
        for seed in 0..10 {
            let mut e = lane_entity(&world, "A", 0.9, 5.0);
            e.set_route(vec![a, c, a, c]);
            let mut rng = EntityRng::new(seed, EntityId(0));
            steady().advance(&mut e, &mut rng, &ctx).unwrap();
            assert_eq!(e.lane, c);
            assert_eq!(e.route_cursor, 1);
        }
    }

    #[test]
    fn exhausted_route_is_replaced() {
        let world = junction();
        let ctx = world.ctx(1.0);
        let mut e = lane_entity(&world, "A", 0.9, 5.0);
        let mut rng = EntityRng::new(3, EntityId(0));
        steady().advance(&mut e, &mut rng, &ctx).unwrap();
        assert_eq!(e.route.first(), Some(&e.lane));
        assert_eq!(e.route.len(), ctx.route_length);
        assert_eq!(e.route_cursor, 0);
    }

    #[test]
    fn dead_end_turns_around() {
        let mut b = LaneGraphBuilder::new().explicit_connections_only();
        let x = b.add_lane("X", vec![p(0.0, 0.0), p(10.0, 0.0)], None).unwrap();
        let y = b.add_lane("Y", vec![p(10.0, 0.0), p(20.0, 0.0)], None).unwrap();
        b.connect(x, y).unwrap();
        let world = world_from(b.build());
        let ctx = world.ctx(1.0);

        let mut e = lane_entity(&world, "Y", 0.95, 5.0);
        let mut rng = EntityRng::new(0, EntityId(0));
        steady().advance(&mut e, &mut rng, &ctx).unwrap();
        assert_eq!(e.lane, x);
        assert_eq!(e.progress, 0.0);
    }

    #[test]
    fn isolated_lane_restarts() {
        let mut b = LaneGraphBuilder::new();
        let solo = b.add_lane("solo", vec![p(0.0, 0.0), p(10.0, 0.0)], None).unwrap();
        let world = world_from(b.build());
        let ctx = world.ctx(1.0);

        let mut e = lane_entity(&world, "solo", 0.95, 5.0);
        let mut rng = EntityRng::new(0, EntityId(0));
        steady().advance(&mut e, &mut rng, &ctx).unwrap();
        assert_eq!(e.lane, solo);
        assert_eq!(e.progress, 0.0);
        assert_eq!(e.route, vec![solo]);
        assert_eq!(e.position, p(0.0, 0.0));
    }

    #[test]
    fn zero_length_lane_does_not_divide_by_zero() {
        let mut b = LaneGraphBuilder::new();
        b.add_lane("dot", vec![p(5.0, 5.0), p(5.0, 5.0)], None).unwrap();
        let world = world_from(b.build());
        let ctx = world.ctx(0.1);
        let mut e = lane_entity(&world, "dot", 0.0, 1.0);
        let mut rng = EntityRng::new(0, EntityId(0));
        steady().advance(&mut e, &mut rng, &ctx).unwrap();
        assert!(e.progress.is_finite());
        assert!(e.position.is_finite());
    }

    #[test]
    fn missing_lane_is_error() {
        let world = square();
        let ctx = world.ctx(1.0);
        let mut e = lane_entity(&world, "N", 0.0, 1.0);
        let mut rng = EntityRng::new(0, EntityId(0));

        e.lane = LaneId::INVALID;
        assert!(matches!(steady().advance(&mut e, &mut rng, &ctx), Err(MotionError::NotOnLane(_))));

        e.lane = LaneId(77);
        assert!(matches!(steady().advance(&mut e, &mut rng, &ctx), Err(MotionError::Spatial(_))));
    }

    #[test]
    fn jitter_stays_near_target() {
        let world = square();
        let ctx = world.ctx(0.1);
        let mut e = lane_entity(&world, "N", 0.0, 1.0);
        let mut rng = EntityRng::new(5, EntityId(0));
        let model = LaneMotion::default();
        for _ in 0..200 {
            model.advance(&mut e, &mut rng, &ctx).unwrap();
            assert!((e.speed - 1.0).abs() <= model.jitter + 1e-12);
        }
    }
}

// ── Grid motion ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod grid {
    use super::helpers::{junction, p, vehicle};
    use crate::{GridMotion, MotionError, MotionModel};
    use dt_core::{EntityId, EntityRng};

    #[test]
    fn off_path_snaps_without_moving() {
        let world = junction();
        let ctx = world.ctx(1.0);
        let mut e = vehicle(p(20.0, 2.0), 3.0);
        let mut rng = EntityRng::new(1, EntityId(1));
        GridMotion::default().advance(&mut e, &mut rng, &ctx).unwrap();

        assert_eq!(e.position, p(20.0, 0.0));
        let target = e.target.unwrap();
        assert!(world.paths.is_on_path(target, 1e-9));
    }

    #[test]
    fn beyond_recovery_radius_is_error() {
        let world = junction();
        let ctx = world.ctx(1.0);
        let mut e = vehicle(p(20.0, 500.0), 3.0);
        let mut rng = EntityRng::new(1, EntityId(1));
        let err = GridMotion::default().advance(&mut e, &mut rng, &ctx).unwrap_err();
        assert!(matches!(err, MotionError::OffNetwork { .. }));
    }

    #[test]
    fn stays_on_path_with_targets_on_path() {
        let world = junction();
        let model = GridMotion::default();
        for seed in 0..10u64 {
            let ctx = world.ctx(0.5);
            let mut e = vehicle(p(50.0, 0.0), 2.5);
            let mut rng = EntityRng::new(seed, EntityId(1));
            for _ in 0..400 {
                model.advance(&mut e, &mut rng, &ctx).unwrap();
                assert!(world.paths.is_on_path(e.position, 1e-9), "{}", e.position);
                if let Some(t) = e.target {
                    assert!(world.paths.is_on_path(t, 1e-9));
                }
                assert!(e.speed >= 0.0);
            }
        }
    }

    #[test]
    fn never_overshoots_target() {
        let world = junction();
        let ctx = world.ctx(1.0);
        let mut e = vehicle(p(30.0, 0.0), 100.0);
        e.target = Some(p(35.0, 0.0));
        let mut rng = EntityRng::new(0, EntityId(1));
        GridMotion::default().advance(&mut e, &mut rng, &ctx).unwrap();
        assert_eq!(e.position, p(35.0, 0.0));
    }

    #[test]
    fn off_path_target_is_pulled_back() {
        let world = junction();
        let ctx = world.ctx(0.5);
        let model = GridMotion::default();
        let mut e = vehicle(p(20.0, 0.0), 2.0);
        e.target = Some(p(20.0, 5.0));
        let mut rng = EntityRng::new(3, EntityId(1));

        model.advance(&mut e, &mut rng, &ctx).unwrap();
        let target = e.target.unwrap();
        assert!(world.paths.is_on_path(target, 1e-9), "{target}");

        for _ in 0..50 {
            model.advance(&mut e, &mut rng, &ctx).unwrap();
        }
        assert_ne!(e.position, p(20.0, 0.0));
        assert!(world.paths.is_on_path(e.position, 1e-9));
    }

    #[test]
    fn unreachable_target_is_replaced() {
        let world = junction();
        let ctx = world.ctx(0.5);
        let mut e = vehicle(p(20.0, 0.0), 2.0);
        e.target = Some(p(20.0, 900.0));
        let mut rng = EntityRng::new(3, EntityId(1));
        GridMotion::default().advance(&mut e, &mut rng, &ctx).unwrap();
        assert!(e.target.is_some_and(|t| world.paths.is_on_path(t, 1e-9)));
    }

    #[test]
    fn moves_speed_times_dt() {
        let world = junction();
        let ctx = world.ctx(0.5);
        let mut e = vehicle(p(30.0, 0.0), 4.0);
        e.target = Some(p(40.0, 0.0));
        let mut rng = EntityRng::new(0, EntityId(1));
        GridMotion::default().advance(&mut e, &mut rng, &ctx).unwrap();
        assert!((e.position.x - 32.0).abs() < 1e-9);
    }

    #[test]
    fn heading_turns_on_short_arc() {
        let world = junction();
        let ctx = world.ctx(0.1);
        // Just below +π, target straight behind along -x (bearing π).
        let mut e = vehicle(p(30.0, 0.0), 1.0);
        e.heading = -std::f64::consts::PI + 0.2;
        e.target = Some(p(20.0, 0.0));
        let mut rng = EntityRng::new(0, EntityId(1));
        GridMotion::default().advance(&mut e, &mut rng, &ctx).unwrap();
        // Turning the short way crosses the ±π seam rather than sweeping through 0.
        assert!(e.heading < -std::f64::consts::PI + 0.2 || e.heading > 0.0, "heading {}", e.heading);
    }

    #[test]
    fn speed_wobble_is_deterministic() {
        let world = junction();
        let model = GridMotion::default();
        let run = || {
            let mut e = vehicle(p(50.0, 0.0), 2.0);
            let mut rng = EntityRng::new(9, EntityId(1));
            let mut ctx = world.ctx(0.1);
            for i in 0..100 {
                ctx.sim_time = i as f64 * 0.1;
                model.advance(&mut e, &mut rng, &ctx).unwrap();
            }
            (e.position, e.speed)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn empty_geometry_is_off_network() {
        let mut world = junction();
        world.paths = dt_spatial::PathGeometry::new(Vec::new());
        let ctx = world.ctx(1.0);
        let mut e = vehicle(p(0.0, 0.0), 1.0);
        let mut rng = EntityRng::new(0, EntityId(1));
        assert!(GridMotion::default().advance(&mut e, &mut rng, &ctx).is_err());
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod engine {
    use super::helpers::{junction, lane_entity, p, square, vehicle, world_from};
    use crate::{MotionEngine, MotionError, UpdateOutcome};
    use dt_core::{EntityId, EntityKind, EntityRng, LaneId, Point, ZoneId};
    use dt_entity::EntityState;
    use dt_spatial::LaneGraphBuilder;

    #[test]
    fn dispatches_by_kind() {
        let world = square();
        let ctx = world.ctx(0.1);
        let engine = MotionEngine::new(Point::ORIGIN);

        let mut load = lane_entity(&world, "N", 0.0, 1.0);
        let mut rng = EntityRng::new(0, EntityId(0));
        assert!(engine.update(&mut load, &mut rng, &ctx).is_moved());
        assert!(load.progress > 0.0);

        let mut car = vehicle(p(10.0, 0.0), 2.0);
        let mut rng = EntityRng::new(0, EntityId(1));
        assert!(engine.update(&mut car, &mut rng, &ctx).is_moved());
        assert!(car.target.is_some());
        assert!(!car.on_lane());
    }

    #[test]
    fn lost_vehicle_resets_to_safe_point() {
        let world = junction();
        let ctx = world.ctx(1.0);
        let safe = p(50.0, 0.0);
        let engine = MotionEngine::new(safe);
        let mut car = vehicle(p(0.0, 900.0), 2.0);
        car.target = Some(p(1.0, 900.0));
        let mut rng = EntityRng::new(0, EntityId(1));

        let outcome = engine.update(&mut car, &mut rng, &ctx);
        assert!(matches!(outcome, UpdateOutcome::Recovered { error: MotionError::OffNetwork { .. } }));
        assert_eq!(car.position, safe);
        assert!(car.target.is_none());
    }

    #[test]
    fn bad_lane_resets_to_lane_start() {
        let world = square();
        let ctx = world.ctx(0.1);
        let engine = MotionEngine::new(Point::ORIGIN);
        let mut e = lane_entity(&world, "N", 0.5, 1.0);
        e.lane = LaneId(99);
        let mut rng = EntityRng::new(2, EntityId(0));

        let outcome = engine.update(&mut e, &mut rng, &ctx);
        assert!(matches!(outcome, UpdateOutcome::Recovered { .. }));
        assert!(world.graph.lane(e.lane).is_ok());
        assert_eq!(e.progress, 0.0);
        assert_eq!(e.route.first(), Some(&e.lane));
        assert_eq!(e.position, world.graph.position_at_progress(e.lane, 0.0).unwrap());
    }

    #[test]
    fn non_finite_speed_recovers() {
        let world = square();
        let ctx = world.ctx(0.1);
        let engine = MotionEngine::new(Point::ORIGIN);
        let mut e = lane_entity(&world, "N", 0.2, 1.0);
        e.speed = f64::NAN;
        let mut rng = EntityRng::new(2, EntityId(0));

        assert!(matches!(engine.update(&mut e, &mut rng, &ctx), UpdateOutcome::Recovered { .. }));
        assert_eq!(e.speed, 1.0);
        assert!(e.position.is_finite());
    }

    #[test]
    fn fatal_when_reset_impossible() {
        let world = world_from(LaneGraphBuilder::new().build());
        let ctx = world.ctx(0.1);
        let engine = MotionEngine::new(Point::ORIGIN);
        let mut e = EntityState::new(EntityId(0), EntityKind::Person, Point::ORIGIN, 1.0);
        let mut rng = EntityRng::new(0, EntityId(0));
        assert!(matches!(engine.update(&mut e, &mut rng, &ctx), UpdateOutcome::Fatal { .. }));
    }

    #[test]
    fn zone_reclassified_every_tick() {
        let world = square();
        let ctx = world.ctx(0.1);
        let engine = MotionEngine::new(Point::ORIGIN);
        // Lane W runs along x = 0, inside the receiving-dock band.
        let mut e = lane_entity(&world, "W", 0.5, 1.0);
        e.zone = ZoneId(0);
        let mut rng = EntityRng::new(0, EntityId(0));
        engine.update(&mut e, &mut rng, &ctx);
        assert_eq!(world.zones.name(e.zone), "receiving dock");
    }

    #[test]
    fn target_speed_relaxes_to_cruise() {
        let world = square();
        let ctx = world.ctx(0.1);
        let engine = MotionEngine::new(Point::ORIGIN);
        let mut e = lane_entity(&world, "N", 0.0, 2.0);
        e.target_speed = 1.0;
        let mut rng = EntityRng::new(0, EntityId(0));
        let mut last = e.target_speed;
        for _ in 0..50 {
            engine.update(&mut e, &mut rng, &ctx);
            assert!(e.target_speed > last && e.target_speed <= 2.0);
            last = e.target_speed;
        }
    }
}
