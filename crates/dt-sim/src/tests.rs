//! Integration tests for dt-sim.

use std::sync::Arc;

use dt_core::{Point, Population, SimConfig};
use dt_events::Event;
use dt_spatial::{LaneGraph, LaneGraphBuilder};

use crate::{PositionTick, SimBuilder, TelemetrySink};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(vehicles: usize, loads: usize, persons: usize) -> SimConfig {
    SimConfig {
        population:    Population { vehicles, loads, persons },
        tick_ms:       20,
        start_unix_ms: Some(1_000_000),
        ..SimConfig::default()
    }
}

/// Rectangle of four lanes, 60 × 30.
fn loop_graph() -> Arc<LaneGraph> {
    let p = Point::new;
    let mut b = LaneGraphBuilder::new();
    b.add_lane("north", vec![p(0.0, 30.0), p(60.0, 30.0)], None).unwrap();
    b.add_lane("east", vec![p(60.0, 30.0), p(60.0, 0.0)], None).unwrap();
    b.add_lane("south", vec![p(60.0, 0.0), p(0.0, 0.0)], None).unwrap();
    b.add_lane("west", vec![p(0.0, 0.0), p(0.0, 30.0)], None).unwrap();
    Arc::new(b.build())
}

fn single_lane() -> Arc<LaneGraph> {
    let mut b = LaneGraphBuilder::new();
    b.add_lane("L1", vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)], None).unwrap();
    Arc::new(b.build())
}

#[derive(Default)]
struct Recorder {
    batches: Vec<Vec<PositionTick>>,
    events:  Vec<Event>,
    stopped: usize,
}

impl TelemetrySink for Recorder {
    fn on_position_tick(&mut self, batch: &[PositionTick]) {
        self.batches.push(batch.to_vec());
    }

    fn on_event(&mut self, event: &Event) {
        self.events.push(event.clone());
    }

    fn on_stop(&mut self) {
        self.stopped += 1;
    }
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::SimError;
    use dt_spatial::SpatialError;

    #[test]
    fn builds_population() {
        let sim = SimBuilder::new(test_config(2, 3, 4), loop_graph()).build().unwrap();
        assert_eq!(sim.entities.len(), 9);
        assert_eq!(sim.rngs.len(), 9);
        assert_eq!(sim.clock.start_unix_ms, 1_000_000);
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = SimConfig { tick_ms: 0, ..test_config(1, 1, 1) };
        let result = SimBuilder::new(cfg, loop_graph()).build();
        assert!(matches!(result, Err(SimError::Core(_))));
    }

    #[test]
    fn lane_entities_need_lanes() {
        let empty = Arc::new(LaneGraphBuilder::new().build());
        let result = SimBuilder::new(test_config(0, 1, 0), empty).build();
        assert!(matches!(result, Err(SimError::Spatial(SpatialError::EmptyGraph))));
    }

    #[test]
    fn default_safe_point_is_on_paths() {
        let sim = SimBuilder::new(test_config(1, 0, 0), loop_graph()).build().unwrap();
        assert!(sim.paths.is_on_path(sim.engine.safe_point, 1e-9));
    }

    #[test]
    fn non_finite_safe_point_rejected() {
        let result = SimBuilder::new(test_config(1, 0, 0), loop_graph())
            .safe_point(Point::new(f64::NAN, 0.0))
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }
}

// ── Sim::step ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod step_tests {
    use super::*;
    use crate::{CallbackSink, NoopSink};
    use dt_core::{MotionMode, Tick};
    use dt_events::EventKind;

    #[test]
    fn one_record_per_entity_every_tick() {
        let mut sim = SimBuilder::new(test_config(2, 2, 2), loop_graph()).build().unwrap();
        let mut rec = Recorder::default();
        let reports = sim.run_ticks(50, &mut rec);

        assert_eq!(rec.batches.len(), 50);
        assert!(rec.batches.iter().all(|b| b.len() == 6));
        assert!(reports.iter().all(|r| r.positions == 6 && r.recovered == 0 && r.fatal == 0));
        assert_eq!(reports[0].tick, Tick(0));
        assert_eq!(sim.clock.current_tick, Tick(50));
    }

    #[test]
    fn records_are_well_formed() {
        let mut sim = SimBuilder::new(test_config(3, 3, 3), loop_graph()).build().unwrap();
        let mut rec = Recorder::default();
        sim.run_ticks(100, &mut rec);

        for (i, batch) in rec.batches.iter().enumerate() {
            for r in batch {
                assert!((0.0..360.0).contains(&r.heading_deg), "{r:?}");
                assert!((0.90..1.0).contains(&r.confidence), "{r:?}");
                assert!(r.speed >= 0.0);
                assert_eq!(r.timestamp_ms, 1_000_000 + 20 * (i as i64 + 1));
                assert!(!r.zone.is_empty());
            }
        }
    }

    #[test]
    fn sim_speed_scales_timestamps() {
        let cfg = SimConfig { sim_speed: 5.0, ..test_config(0, 1, 0) };
        let mut sim = SimBuilder::new(cfg, loop_graph()).build().unwrap();
        let reports = sim.run_ticks(2, &mut NoopSink);
        assert_eq!(reports[1].timestamp_ms - reports[0].timestamp_ms, 100);
    }

    #[test]
    fn lane_progress_stays_bounded() {
        let cfg = SimConfig { sim_speed: 20.0, ..test_config(0, 5, 5) };
        let mut sim = SimBuilder::new(cfg, loop_graph()).build().unwrap();
        for _ in 0..500 {
            sim.step(&mut NoopSink);
            for e in sim.entities.iter() {
                assert_eq!(e.motion_mode(), MotionMode::Lane);
                assert!((0.0..=1.0).contains(&e.progress));
                assert!(e.route_cursor < e.route.len());
            }
        }
    }

    #[test]
    fn same_seed_same_output() {
        let run = || {
            let mut sim = SimBuilder::new(test_config(2, 2, 2), loop_graph()).build().unwrap();
            let mut rec = Recorder::default();
            sim.run_ticks(200, &mut rec);
            (rec.batches, rec.events)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn congestion_reaches_sink() {
        let cfg = SimConfig {
            event_probability: 0.0,
            collision_radius:  0.0,
            ..test_config(0, 3, 0)
        };
        let mut sim = SimBuilder::new(cfg, single_lane()).build().unwrap();
        let mut rec = Recorder::default();
        let report = sim.step(&mut rec);

        assert_eq!(report.events, 1);
        assert_eq!(rec.events.len(), 1);
        assert_eq!(rec.events[0].kind, EventKind::Congestion);
        assert_eq!(rec.events[0].entities.len(), 3);
    }

    #[test]
    fn callback_sink_receives_both_streams() {
        let cfg = SimConfig { event_probability: 0.0, collision_radius: 0.0, ..test_config(0, 3, 0) };
        let mut sim = SimBuilder::new(cfg, single_lane()).build().unwrap();
        let mut positions = 0;
        let mut events = 0;
        {
            let mut sink = CallbackSink::new(|b: &[PositionTick]| positions += b.len(), |_: &Event| events += 1);
            sim.run_ticks(3, &mut sink);
        }
        assert_eq!(positions, 9);
        assert_eq!(events, 3);
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler_tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::Scheduler;

    #[test]
    fn start_is_idempotent() {
        let sim = SimBuilder::new(test_config(1, 1, 1), loop_graph()).build().unwrap();
        let mut scheduler = Scheduler::new(sim, Recorder::default());

        let started = Instant::now();
        assert!(scheduler.start().unwrap());
        assert!(!scheduler.start().unwrap());
        assert!(scheduler.is_running());
        std::thread::sleep(Duration::from_millis(200));
        assert!(scheduler.stop().unwrap());
        let elapsed_ms = started.elapsed().as_millis() as usize;

        let rec = scheduler.sink().unwrap();
        // A single 20 ms loop can deliver at most one batch per interval.
        assert!(rec.batches.len() <= elapsed_ms / 20 + 1, "{} batches in {elapsed_ms} ms", rec.batches.len());
        assert!(!rec.batches.is_empty());
        assert_eq!(rec.stopped, 1);
        assert_eq!(scheduler.sim().unwrap().clock.current_tick.0 as usize, rec.batches.len());
    }

    #[test]
    fn stop_when_idle_is_noop() {
        let sim = SimBuilder::new(test_config(1, 0, 0), loop_graph()).build().unwrap();
        let mut scheduler = Scheduler::new(sim, Recorder::default());
        assert!(!scheduler.stop().unwrap());
        assert!(!scheduler.is_running());
        assert!(scheduler.sim().is_some());
    }

    #[test]
    fn restart_continues_clock() {
        let sim = SimBuilder::new(test_config(0, 2, 0), loop_graph()).build().unwrap();
        let mut scheduler = Scheduler::new(sim, Recorder::default());

        scheduler.start().unwrap();
        std::thread::sleep(Duration::from_millis(80));
        scheduler.stop().unwrap();
        let first = scheduler.sim().unwrap().clock.current_tick;

        scheduler.start().unwrap();
        std::thread::sleep(Duration::from_millis(80));
        let (sim, rec) = scheduler.into_inner().unwrap();

        assert!(sim.clock.current_tick >= first);
        assert_eq!(rec.stopped, 2);
        assert_eq!(rec.batches.len() as u64, sim.clock.current_tick.0);
    }
}
