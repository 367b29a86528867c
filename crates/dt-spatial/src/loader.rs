//! CSV lane loader.
//!
//! # CSV format
//!
//! One row per lane vertex.  Rows of the same lane are ordered by `seq`; lanes
//! are added to the graph in the order their first row appears.  `width` may
//! be left empty.
//!
//! ```csv
//! lane,seq,x,y,width
//! L1,0,0,0,2.5
//! L1,1,40,0,2.5
//! L2,0,41,0,
//! L2,1,41,30,
//! ```
//!
//! The loader returns a [`LaneGraphBuilder`] so callers can still add explicit
//! connections or change the connection radius before building.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use dt_core::Point;

use crate::{LaneGraph, LaneGraphBuilder, SpatialError, SpatialResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LaneRecord {
    lane:  String,
    seq:   u32,
    x:     f64,
    y:     f64,
    width: Option<f64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a lane file and build the graph with the default connection radius.
pub fn load_lane_graph_csv(path: &Path) -> SpatialResult<LaneGraph> {
    let file = std::fs::File::open(path).map_err(SpatialError::Io)?;
    Ok(load_lanes_reader(file)?.build())
}

/// Parse lanes from any `Read` source into a builder.
pub fn load_lanes_reader<R: Read>(reader: R) -> SpatialResult<LaneGraphBuilder> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut order: Vec<String> = Vec::new();
    let mut by_lane: HashMap<String, Vec<LaneRecord>> = HashMap::new();

    for result in csv_reader.deserialize::<LaneRecord>() {
        let row = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        if !by_lane.contains_key(&row.lane) {
            order.push(row.lane.clone());
        }
        by_lane.entry(row.lane.clone()).or_default().push(row);
    }

    let mut builder = LaneGraphBuilder::new();
    for name in order {
        let Some(mut rows) = by_lane.remove(&name) else { continue };
        rows.sort_by_key(|r| r.seq);
        if let Some(w) = rows.windows(2).find(|w| w[0].seq == w[1].seq) {
            return Err(SpatialError::Parse(format!("lane {name:?}: duplicate seq {}", w[0].seq)));
        }

        let width = rows.iter().find_map(|r| r.width);
        let points = rows.iter().map(|r| Point::new(r.x, r.y)).collect();
        builder.add_lane(name, points, width)?;
    }

    log::debug!("loaded {} lanes from csv", builder.lane_count());
    Ok(builder)
}
