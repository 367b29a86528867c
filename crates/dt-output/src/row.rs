//! Flattened event row written by tabular backends.

use dt_events::Event;

use crate::OutputResult;

/// An [`Event`] flattened to plain columns.
///
/// `entities` is a `;`-separated list of entity indices and `payload` is the
/// event payload as compact JSON text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub event_id:     u64,
    pub timestamp_ms: i64,
    pub kind:         &'static str,
    pub severity:     &'static str,
    pub location:     String,
    pub entities:     String,
    pub payload:      String,
}

impl EventRow {
    pub fn from_event(event: &Event) -> OutputResult<Self> {
        let entities = event
            .entities
            .iter()
            .map(|id| id.0.to_string())
            .collect::<Vec<_>>()
            .join(";");

        Ok(Self {
            event_id:     event.id.0,
            timestamp_ms: event.timestamp_ms,
            kind:         event.kind.as_str(),
            severity:     event.severity.as_str(),
            location:     event.location.to_string(),
            entities,
            payload:      serde_json::to_string(&event.payload)?,
        })
    }
}
