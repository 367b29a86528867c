//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `position_ticks.csv`
//! - `events.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;
use dt_events::Event;
use dt_sim::PositionTick;

use crate::row::EventRow;
use crate::writer::OutputWriter;
use crate::OutputResult;

pub const POSITIONS_FILE: &str = "position_ticks.csv";
pub const EVENTS_FILE: &str = "events.csv";

/// Writes telemetry to two CSV files.
pub struct CsvWriter {
    positions: Writer<File>,
    events:    Writer<File>,
}

impl CsvWriter {
    /// Create `dir` if needed, open both files and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut positions = Writer::from_path(dir.join(POSITIONS_FILE))?;
        positions.write_record([
            "timestamp_ms", "entity_id", "kind", "x", "y", "speed", "heading_deg", "zone", "confidence",
        ])?;

        let mut events = Writer::from_path(dir.join(EVENTS_FILE))?;
        events.write_record([
            "event_id", "timestamp_ms", "kind", "severity", "location", "entities", "payload",
        ])?;

        Ok(Self { positions, events })
    }
}

impl OutputWriter for CsvWriter {
    fn write_positions(&mut self, batch: &[PositionTick]) -> OutputResult<()> {
        for r in batch {
            self.positions.write_record(&[
                r.timestamp_ms.to_string(),
                r.entity.0.to_string(),
                r.kind.as_str().to_owned(),
                format!("{:.3}", r.x),
                format!("{:.3}", r.y),
                format!("{:.3}", r.speed),
                format!("{:.1}", r.heading_deg),
                r.zone.clone(),
                format!("{:.3}", r.confidence),
            ])?;
        }
        Ok(())
    }

    fn write_event(&mut self, event: &Event) -> OutputResult<()> {
        let row = EventRow::from_event(event)?;
        self.events.write_record(&[
            row.event_id.to_string(),
            row.timestamp_ms.to_string(),
            row.kind.to_owned(),
            row.severity.to_owned(),
            row.location,
            row.entities,
            row.payload,
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.positions.flush()?;
        self.events.flush()?;
        Ok(())
    }
}
