//! The per-tick event detector.

use serde_json::json;

use dt_core::{EntityId, EventId, LaneId, SimConfig, SimRng};
use dt_entity::EntityState;
use dt_spatial::{LaneGraph, ZoneClassifier};

use crate::catalog::{self, RANDOM_KINDS};
use crate::{Event, EventKind, EventLocation, Severity};

#[cfg(feature = "fx-hash")]
type LaneMap<V> = rustc_hash::FxHashMap<LaneId, V>;
#[cfg(not(feature = "fx-hash"))]
type LaneMap<V> = std::collections::HashMap<LaneId, V>;

/// Detector thresholds.  Usually derived from [`SimConfig`].
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Per-entity, per-tick probability of a random operational event.
    pub event_probability:         f64,
    /// Minimum gap between two random events of one entity.
    pub cooldown_ms:               i64,
    /// Probability that a random event is `Severity::High`.
    pub high_severity_probability: f64,
    pub collision_radius:          f64,
    pub motion_threshold:          f64,
    /// Speed multiplier applied to both entities of a near-collision.
    pub collision_speed_factor:    f64,
    pub congestion_threshold:      usize,
}

impl From<&SimConfig> for DetectorConfig {
    fn from(c: &SimConfig) -> Self {
        Self {
            event_probability:         c.event_probability,
            cooldown_ms:               (c.event_cooldown_secs * 1000.0).round() as i64,
            high_severity_probability: 0.3,
            collision_radius:          c.collision_radius,
            motion_threshold:          c.motion_threshold,
            collision_speed_factor:    c.collision_speed_factor,
            congestion_threshold:      c.congestion_threshold,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::from(&SimConfig::default())
    }
}

/// Runs the random, proximity, and congestion detectors and numbers the
/// events it emits.
pub struct EventDetector {
    config:  DetectorConfig,
    rng:     SimRng,
    next_id: u64,
}

impl EventDetector {
    pub fn new(config: DetectorConfig, rng: SimRng) -> Self {
        Self { config, rng, next_id: 0 }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Total events emitted so far.
    pub fn emitted(&self) -> u64 {
        self.next_id
    }

    /// Run every detector once over `entities` and return the events raised,
    /// in detector order.
    ///
    /// Near-collisions slow the involved entities down in place; nothing else
    /// is modified apart from each entity's `last_event_ms`.
    pub fn detect(
        &mut self,
        entities: &mut [EntityState],
        graph:    &LaneGraph,
        zones:    &ZoneClassifier,
        now_ms:   i64,
    ) -> Vec<Event> {
        let mut out = Vec::new();
        self.random_events(entities, zones, now_ms, &mut out);
        self.proximity(entities, zones, now_ms, &mut out);
        self.congestion(entities, graph, now_ms, &mut out);
        log::trace!("{} events at {now_ms}", out.len());
        out
    }

    // ── Random operational events ─────────────────────────────────────────

    pub fn random_events(
        &mut self,
        entities: &mut [EntityState],
        zones:    &ZoneClassifier,
        now_ms:   i64,
        out:      &mut Vec<Event>,
    ) {
        let cooldown = self.config.cooldown_ms;
        for e in entities.iter_mut() {
            if !e.last_event_ms.is_none_or(|t| now_ms - t >= cooldown) {
                continue;
            }
            if !self.rng.gen_bool(self.config.event_probability) {
                continue;
            }

            let kind = self.rng.choose(&RANDOM_KINDS).copied().unwrap_or(EventKind::Blockage);
            let reason = self.rng.choose(catalog::reasons(kind)).copied().unwrap_or("unspecified");
            let severity = if self.rng.gen_bool(self.config.high_severity_probability) {
                Severity::High
            } else {
                Severity::Medium
            };

            e.last_event_ms = Some(now_ms);
            let event = self.make(
                now_ms,
                kind,
                vec![e.id],
                EventLocation::Zone(zones.name(e.zone).to_owned()),
                severity,
                json!({ "reason": reason, "entity_kind": e.kind.as_str() }),
            );
            out.push(event);
        }
    }

    // ── Proximity ─────────────────────────────────────────────────────────

    /// Every unordered pair closer than the collision radius with at least
    /// one entity moving faster than the motion threshold.
    pub fn proximity(
        &mut self,
        entities: &mut [EntityState],
        zones:    &ZoneClassifier,
        now_ms:   i64,
        out:      &mut Vec<Event>,
    ) {
        let radius = self.config.collision_radius;
        let threshold = self.config.motion_threshold;
        let factor = self.config.collision_speed_factor;

        // Pairs are judged on the speeds entities had when detection began;
        // penalties only apply once every pair has been checked.
        let mut pairs: Vec<(usize, usize, f64)> = Vec::new();
        for j in 1..entities.len() {
            let b = &entities[j];
            for (i, a) in entities[..j].iter().enumerate() {
                let distance = a.position.distance(b.position);
                if distance < radius && (a.speed > threshold || b.speed > threshold) {
                    pairs.push((i, j, distance));
                }
            }
        }

        for (i, j, distance) in pairs {
            for k in [i, j] {
                entities[k].speed *= factor;
                entities[k].target_speed *= factor;
            }

            let (a, b) = (&entities[i], &entities[j]);
            let ids = vec![a.id.min(b.id), a.id.max(b.id)];
            let location = EventLocation::Zone(zones.name(a.zone).to_owned());
            let event = self.make(
                now_ms,
                EventKind::NearCollision,
                ids,
                location,
                Severity::High,
                json!({ "distance": distance, "speed_factor": factor }),
            );
            out.push(event);
        }
    }

    // ── Congestion ────────────────────────────────────────────────────────

    /// One event per lane whose occupancy is at least the threshold, in
    /// ascending lane order.
    pub fn congestion(
        &mut self,
        entities: &[EntityState],
        graph:    &LaneGraph,
        now_ms:   i64,
        out:      &mut Vec<Event>,
    ) {
        let threshold = self.config.congestion_threshold;
        let mut by_lane: LaneMap<Vec<EntityId>> = LaneMap::default();
        for e in entities.iter().filter(|e| e.on_lane()) {
            by_lane.entry(e.lane).or_default().push(e.id);
        }

        let mut congested: Vec<(LaneId, Vec<EntityId>)> = by_lane
            .into_iter()
            .filter(|(_, ids)| ids.len() >= threshold)
            .collect();
        congested.sort_unstable_by_key(|(lane, _)| *lane);

        for (lane, mut ids) in congested {
            ids.sort_unstable();
            let name = graph.lane_name(lane).to_owned();
            let event = self.make(
                now_ms,
                EventKind::Congestion,
                ids.clone(),
                EventLocation::Lane(name.clone()),
                Severity::Medium,
                json!({
                    "lane":      name,
                    "occupancy": ids.len(),
                    "threshold": threshold,
                }),
            );
            out.push(event);
        }
    }

    fn make(
        &mut self,
        timestamp_ms: i64,
        kind:         EventKind,
        entities:     Vec<EntityId>,
        location:     EventLocation,
        severity:     Severity,
        payload:      serde_json::Value,
    ) -> Event {
        let id = EventId(self.next_id);
        self.next_id += 1;
        Event { id, timestamp_ms, kind, entities, location, severity, payload }
    }
}
