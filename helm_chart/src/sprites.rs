/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::fmt;
use serde::{Serialize,Deserialize};
use helm_track::{VesselPosition, VesselType, DataOrigin};

use crate::projection::PixelRect;

/// sprite sheet row of the generic trail marker, below the vessel type rows
pub const TRAIL_ROW: u32 = 4;

/// a cell in the marker sprite sheet. Columns are data origins, rows are vessel types plus the
/// trail row
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub struct SpriteRef {
    pub column: u32,
    pub row: u32,
}

impl SpriteRef {
    pub fn new (column: u32, row: u32)->Self { SpriteRef { column, row } }

    /// latest positions get the marker of their vessel type, trail positions the generic trail marker
    pub fn for_position (pos: &VesselPosition)->Self {
        let row = if pos.is_latest_position { type_row( pos.vessel_type) } else { TRAIL_ROW };
        SpriteRef { column: origin_column( pos.data_origin), row }
    }

    /// the source rectangle of this sprite within the sheet
    pub fn sheet_rect (&self, marker_width: u32, marker_height: u32)->PixelRect {
        PixelRect::new( (self.column * marker_width) as i32, (self.row * marker_height) as i32, marker_width, marker_height)
    }
}

impl fmt::Display for SpriteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "sprite({},{})", self.column, self.row)
    }
}

pub fn origin_column (origin: DataOrigin)->u32 {
    match origin {
        DataOrigin::Local => 0,
        DataOrigin::Web => 1,
    }
}

pub fn type_row (vessel_type: VesselType)->u32 {
    match vessel_type {
        VesselType::Recreational => 0,
        VesselType::Passenger => 1,
        VesselType::Commercial => 2,
        VesselType::Other => 3,
    }
}
