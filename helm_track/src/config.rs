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

use std::time::Duration;
use serde::{Serialize,Deserialize};
use helm_common::datetime::{self,deserialize_duration,serialize_duration};

/// the position store configuration, normally loaded from `track.ron`
#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct TrackConfig {
    /// max age of a position before it gets purged by an expiry sweep
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub retention: Duration,

    /// interval in which the expiry task sweeps the store
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub expiry_interval: Duration,

    /// optional upper bound for the number of positions kept per vessel (including the latest)
    #[serde(default, skip_serializing_if="helm_common::is_none")]
    pub max_history: Option<usize>,

    /// reports with coordinates outside of this range are rejected as malformed
    #[serde(default)]
    pub valid_range: CoordinateRange,
}

impl Default for TrackConfig {
    fn default()->Self {
        TrackConfig {
            retention: datetime::hours(12),
            expiry_interval: datetime::secs(5),
            max_history: None,
            valid_range: CoordinateRange::default()
        }
    }
}

impl TrackConfig {
    pub fn with_retention (retention: Duration)->Self {
        TrackConfig { retention, ..TrackConfig::default() }
    }
}

/// inclusive lat/lon bounds (decimal degrees) for accepted reports
#[derive(Deserialize,Serialize,Debug,Clone,Copy,PartialEq)]
pub struct CoordinateRange {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Default for CoordinateRange {
    fn default()->Self {
        CoordinateRange { min_lat: -90.0, max_lat: 90.0, min_lon: -180.0, max_lon: 180.0 }
    }
}

impl CoordinateRange {
    /// note this is false for NaN coordinates
    pub fn contains (&self, lat: f64, lon: f64)->bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}
