//! The event envelope shared by every detector.

use std::fmt;

use dt_core::{EntityId, EventId};

/// What kind of situation an event reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EventKind {
    Blockage,
    DwellExceeded,
    ZoneBreach,
    NearCollision,
    Congestion,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Blockage      => "blockage",
            EventKind::DwellExceeded => "dwell_exceeded",
            EventKind::ZoneBreach    => "zone_breach",
            EventKind::NearCollision => "near_collision",
            EventKind::Congestion    => "congestion",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Medium => "medium",
            Severity::High   => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an event happened: a named zone or a named lane.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "name", rename_all = "lowercase"))]
pub enum EventLocation {
    Zone(String),
    Lane(String),
}

impl EventLocation {
    pub fn name(&self) -> &str {
        match self {
            EventLocation::Zone(n) | EventLocation::Lane(n) => n,
        }
    }
}

impl fmt::Display for EventLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventLocation::Zone(n) => write!(f, "zone:{n}"),
            EventLocation::Lane(n) => write!(f, "lane:{n}"),
        }
    }
}

/// One detected event.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub id:           EventId,
    /// Simulated Unix milliseconds of the tick that raised it.
    pub timestamp_ms: i64,
    pub kind:         EventKind,
    /// Involved entities, ascending.
    pub entities:     Vec<EntityId>,
    pub location:     EventLocation,
    pub severity:     Severity,
    /// Free-form detail; its shape depends on `kind`.
    pub payload:      serde_json::Value,
}
