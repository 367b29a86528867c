//! Random operational event catalog.

use crate::EventKind;

/// Kinds the random detector draws from, uniformly.
pub const RANDOM_KINDS: [EventKind; 3] = [
    EventKind::Blockage,
    EventKind::DwellExceeded,
    EventKind::ZoneBreach,
];

const BLOCKAGE: &[&str] = &[
    "pallet left in aisle",
    "spill being cleaned up",
    "fallen stock on lane",
    "door not fully open",
];

const DWELL_EXCEEDED: &[&str] = &[
    "waiting for pick confirmation",
    "scanner not responding",
    "load not ready at station",
    "operator on break",
];

const ZONE_BREACH: &[&str] = &[
    "entered restricted area",
    "pedestrian crossing outside walkway",
    "speed limit exceeded in zone",
];

/// Reason phrases for `kind`.  Empty for kinds the random detector never
/// raises.
pub fn reasons(kind: EventKind) -> &'static [&'static str] {
    match kind {
        EventKind::Blockage      => BLOCKAGE,
        EventKind::DwellExceeded => DWELL_EXCEEDED,
        EventKind::ZoneBreach    => ZONE_BREACH,
        EventKind::NearCollision | EventKind::Congestion => &[],
    }
}
