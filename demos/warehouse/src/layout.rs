//! Sample warehouse lane layout.
//!
//! A 100 × 60 floor: a perimeter loop, a central spine and two rack aisles
//! that dead-end in the storage area.  Coordinates line up with
//! `ZoneClassifier::warehouse()`, so docks sit at the west and east ends and
//! the racks fill the northern half.

use std::io::Cursor;

use dt_spatial::{LaneGraph, SpatialResult, load_lanes_reader};

const LANES_CSV: &str = "\
lane,seq,x,y,width\n\
south_w,0,4,4,3\n\
south_w,1,50,4,3\n\
south_e,0,50,4,3\n\
south_e,1,96,4,3\n\
east,0,96,4,3\n\
east,1,96,56,3\n\
north_e,0,96,56,3\n\
north_e,1,50,56,3\n\
north_w,0,50,56,3\n\
north_w,1,4,56,3\n\
west,0,4,56,3\n\
west,1,4,4,3\n\
spine_s,0,50,4,3\n\
spine_s,1,50,30,3\n\
spine_n,0,50,30,3\n\
spine_n,1,50,56,3\n\
rack_w,0,50,30,2\n\
rack_w,1,35,30,2\n\
rack_w,2,20,30,2\n\
rack_e,0,50,30,2\n\
rack_e,1,65,30,2\n\
rack_e,2,80,30,2\n\
";

/// Build the embedded layout with endpoint-inferred connections.
pub fn warehouse_graph() -> SpatialResult<LaneGraph> {
    Ok(load_lanes_reader(Cursor::new(LANES_CSV))?.build())
}
