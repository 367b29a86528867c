//! Entity kinds and the motion mode each one uses.

/// What sort of mobile entity this is.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EntityKind {
    /// Forklifts, tuggers, AGVs.
    Vehicle,
    /// Pallets and totes carried along lanes.
    Load,
    /// Personnel on foot.
    Person,
}

/// Which motion model drives an entity.  Fixed for the whole run.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum MotionMode {
    /// Strict straight-segment path following toward sampled targets.
    Grid,
    /// Progress along lane polylines.
    Lane,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Vehicle, EntityKind::Load, EntityKind::Person];

    pub fn motion_mode(self) -> MotionMode {
        match self {
            EntityKind::Vehicle => MotionMode::Grid,
            EntityKind::Load | EntityKind::Person => MotionMode::Lane,
        }
    }

    /// Human-readable label, useful for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Vehicle => "vehicle",
            EntityKind::Load    => "load",
            EntityKind::Person  => "person",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
