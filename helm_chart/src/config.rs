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

use crate::projection::ViewCorners;

/// chart display configuration, normally loaded from `chart.ron`
#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct ChartConfig {
    /// fixed cadence of the frame loop
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub frame_interval: Duration,

    pub screen_width: u32,
    pub screen_height: u32,

    /// size of marker sprites, both on the sprite sheet and on screen
    pub marker_width: u32,
    pub marker_height: u32,

    /// do we render trail positions at all
    #[serde(default="default_show_trails")]
    pub show_trails: bool,

    /// max age of rendered trail positions (relative to the frame time)
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub trail_window: Duration,

    pub views: Vec<ViewConfig>,
}

fn default_show_trails()->bool { true }

impl Default for ChartConfig {
    fn default()->Self {
        ChartConfig {
            frame_interval: datetime::millis(100),
            screen_width: 800,
            screen_height: 480,
            marker_width: 16,
            marker_height: 16,
            show_trails: true,
            trail_window: datetime::hours(1),
            views: Vec::new()
        }
    }
}

#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
pub struct ViewConfig {
    pub name: String,
    pub corners: ViewCorners,
}
