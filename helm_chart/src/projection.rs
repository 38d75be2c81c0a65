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

//! mapping of geographic coordinates to screen pixels. This is a plain affine transform between
//! the view corners and the screen bounds, which is good enough for the harbor scale views we
//! display (no geodesic projection)

use std::fmt;
use serde::{Serialize,Deserialize};
use helm_track::VesselPosition;

use crate::errors::{HelmChartError,Result};

/// the geographic bounds of a view (decimal degrees). Views do not cross the antimeridian
#[derive(Deserialize,Serialize,Debug,Clone,Copy,PartialEq)]
pub struct ViewCorners {
    pub ul_lat: f64,
    pub ul_lon: f64,
    pub lr_lat: f64,
    pub lr_lon: f64,
}

impl ViewCorners {
    pub fn new (ul_lat: f64, ul_lon: f64, lr_lat: f64, lr_lon: f64)->Self {
        ViewCorners { ul_lat, ul_lon, lr_lat, lr_lon }
    }

    pub fn is_valid (&self)->bool {
        self.ul_lat.is_finite() && self.ul_lon.is_finite() && self.lr_lat.is_finite() && self.lr_lon.is_finite()
            && self.ul_lat > self.lr_lat && self.ul_lon < self.lr_lon
    }

    /// inclusive. Note this is false for NaN coordinates
    pub fn contains (&self, lat: f64, lon: f64)->bool {
        lat <= self.ul_lat && lat >= self.lr_lat && lon >= self.ul_lon && lon <= self.lr_lon
    }
}

/// a screen rectangle in pixels. Marker rectangles can extend beyond the screen bounds
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub fn new (x: i32, y: i32, w: u32, h: u32)->Self { PixelRect { x, y, w, h } }

    /// a w*h rectangle centered on (cx,cy)
    pub fn centered (cx: i32, cy: i32, w: u32, h: u32)->Self {
        PixelRect { x: cx - (w/2) as i32, y: cy - (h/2) as i32, w, h }
    }

    pub fn center (&self)->(i32,i32) {
        (self.x + (self.w/2) as i32, self.y + (self.h/2) as i32)
    }

    pub fn intersects (&self, other: &PixelRect)->bool {
        (self.x as i64) < other.x as i64 + other.w as i64 && (other.x as i64) < self.x as i64 + self.w as i64
            && (self.y as i64) < other.y as i64 + other.h as i64 && (other.y as i64) < self.y as i64 + self.h as i64
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "[{},{} {}x{}]", self.x, self.y, self.w, self.h)
    }
}

/// the mapping from geographic coordinates of a view to screen pixels
#[derive(Debug,Clone,PartialEq)]
pub struct Projection {
    corners: ViewCorners,
    width: u32,
    height: u32,
    marker_width: u32,
    marker_height: u32,
}

impl Projection {
    pub fn new (corners: ViewCorners, width: u32, height: u32, marker_width: u32, marker_height: u32)->Result<Self> {
        if !corners.is_valid() {
            return Err( HelmChartError::InvalidViewError( format!("degenerate view corners {:?}", corners)))
        }
        if width == 0 || height == 0 {
            return Err( HelmChartError::InvalidViewError( format!("empty screen size {width}x{height}")))
        }
        Ok( Projection { corners, width, height, marker_width, marker_height } )
    }

    pub fn corners (&self)->&ViewCorners { &self.corners }
    pub fn screen_size (&self)->(u32,u32) { (self.width, self.height) }
    pub fn marker_size (&self)->(u32,u32) { (self.marker_width, self.marker_height) }

    /// the (fractional) screen point of a geographic coordinate, or None if the coordinate is
    /// outside of the view
    pub fn project (&self, lat: f64, lon: f64)->Option<(f64,f64)> {
        if !self.corners.contains( lat, lon) {
            return None
        }
        let c = &self.corners;
        let x = (lon - c.ul_lon) / (c.lr_lon - c.ul_lon) * self.width as f64;
        let y = (c.ul_lat - lat) / (c.ul_lat - c.lr_lat) * self.height as f64;
        Some((x,y))
    }

    /// the screen rectangle of a position marker, centered on the projected position
    pub fn marker_bounds (&self, lat: f64, lon: f64)->Option<PixelRect> {
        self.project( lat, lon).map( |(x,y)| {
            PixelRect::centered( x.round() as i32, y.round() as i32, self.marker_width, self.marker_height)
        })
    }

    pub fn position_bounds (&self, pos: &VesselPosition)->Option<PixelRect> {
        self.marker_bounds( pos.lat, pos.lon)
    }
}
