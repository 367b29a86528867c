//! Static position → zone classification.
//!
//! Zones are axis-aligned bands: an x-band covers every point whose `x` lies
//! in `[min, max)`, whatever its `y`, and likewise for y-bands.  Bands on the
//! same axis must not overlap.  Bands are tested in the order given; a point
//! matching none is in [`DEFAULT_ZONE`].

use dt_core::{Point, ZoneId};

use crate::{SpatialError, SpatialResult};

/// Zone reported for positions outside every band.
pub const DEFAULT_ZONE: &str = "main aisle";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// One half-open band `[min, max)` along `axis`.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneBand {
    pub zone: String,
    pub axis: Axis,
    pub min:  f64,
    pub max:  f64,
}

impl ZoneBand {
    pub fn new(zone: impl Into<String>, axis: Axis, min: f64, max: f64) -> Self {
        Self { zone: zone.into(), axis, min, max }
    }

    fn contains(&self, p: Point) -> bool {
        let v = match self.axis {
            Axis::X => p.x,
            Axis::Y => p.y,
        };
        v >= self.min && v < self.max
    }

    fn overlaps(&self, other: &ZoneBand) -> bool {
        self.axis == other.axis && self.min < other.max && other.min < self.max
    }
}

/// Stateless classifier.  `ZoneId(0)` is always [`DEFAULT_ZONE`].
#[derive(Clone, Debug)]
pub struct ZoneClassifier {
    names: Vec<String>,
    bands: Vec<(ZoneBand, ZoneId)>,
}

impl ZoneClassifier {
    /// Build a classifier; rejects overlapping bands on the same axis.
    ///
    /// Several bands may share a zone name; they map to one `ZoneId`.
    pub fn new(bands: Vec<ZoneBand>) -> SpatialResult<Self> {
        for (i, a) in bands.iter().enumerate() {
            if let Some(b) = bands[i + 1..].iter().find(|b| a.overlaps(b)) {
                return Err(SpatialError::OverlappingZones { a: a.zone.clone(), b: b.zone.clone() });
            }
        }

        let mut names = vec![DEFAULT_ZONE.to_owned()];
        let bands = bands
            .into_iter()
            .map(|band| {
                let id = match names.iter().position(|n| *n == band.zone) {
                    Some(i) => i,
                    None => {
                        names.push(band.zone.clone());
                        names.len() - 1
                    }
                };
                (band, ZoneId(id as u16))
            })
            .collect();

        Ok(Self { names, bands })
    }

    /// A classifier with no bands: everything is the default zone.
    pub fn single_zone() -> Self {
        Self { names: vec![DEFAULT_ZONE.to_owned()], bands: Vec::new() }
    }

    /// Classifier over [`warehouse_bands`]; fails only if those bands overlap.
    pub fn warehouse() -> SpatialResult<Self> {
        Self::new(warehouse_bands())
    }

    /// Zone containing `p`.
    pub fn classify(&self, p: Point) -> ZoneId {
        self.bands
            .iter()
            .find(|(band, _)| band.contains(p))
            .map_or(ZoneId(0), |(_, id)| *id)
    }

    /// Display name of `id`; unknown ids read as the default zone.
    pub fn name(&self, id: ZoneId) -> &str {
        self.names.get(id.index()).map_or(DEFAULT_ZONE, String::as_str)
    }

    pub fn zone_count(&self) -> usize {
        self.names.len()
    }
}

impl Default for ZoneClassifier {
    fn default() -> Self {
        Self::single_zone()
    }
}

/// Reference warehouse bands for a 100 × 60 floor: docks at the west and east
/// ends, racks in the northern half, packing along the south wall.
pub fn warehouse_bands() -> Vec<ZoneBand> {
    vec![
        ZoneBand::new("receiving dock", Axis::X, 0.0, 12.0),
        ZoneBand::new("shipping dock", Axis::X, 88.0, 100.0),
        ZoneBand::new("storage racks", Axis::Y, 30.0, 60.0),
        ZoneBand::new("packing", Axis::Y, 0.0, 8.0),
    ]
}
