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
#![allow(unused)]

//! vessel position tracking: the data model, the [`store::PositionStore`] that owns all known
//! positions, the periodic expiry task and the feed boundary through which reports come in.

use std::{cmp::Ordering, fmt, sync::Arc};
use serde::{Serialize,Deserialize};
use helm_common::datetime::EpochMillis;

pub mod config;
pub mod store;
pub mod expiry;
pub mod feed;

pub mod errors;

helm_common::define_load_config!{}

/// vessel classification. Each type has its own row in the marker sprite sheet
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,Hash)]
#[serde(rename_all="lowercase")]
pub enum VesselType {
    Recreational,
    Passenger,
    Commercial,
    Other,
}

/// where a report came from (own receiver or a web aggregator)
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,Hash)]
#[serde(rename_all="lowercase")]
pub enum DataOrigin {
    Local,
    Web,
}

/// a parsed position report as it comes in from a feed
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct VesselReport {
    pub vessel_id: String,
    pub lat: f64,
    pub lon: f64,
    pub heading: f64,
    pub vessel_type: VesselType,
    pub data_origin: DataOrigin,
    pub timestamp_ms: EpochMillis,
}

impl VesselReport {
    pub fn new (vessel_id: impl ToString, lat: f64, lon: f64, timestamp_ms: EpochMillis)->Self {
        VesselReport {
            vessel_id: vessel_id.to_string(),
            lat, lon,
            heading: 0.0,
            vessel_type: VesselType::Other,
            data_origin: DataOrigin::Local,
            timestamp_ms
        }
    }

    pub fn with_classification (mut self, heading: f64, vessel_type: VesselType, data_origin: DataOrigin)->Self {
        self.heading = heading;
        self.vessel_type = vessel_type;
        self.data_origin = data_origin;
        self
    }
}

impl fmt::Display for VesselReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "VesselReport( id: \"{}\", pos: ({:.5},{:.5}), time: {} )", self.vessel_id, self.lat, self.lon, self.timestamp_ms)
    }
}

/// an immutable position value as handed out in store snapshots.
///
/// Positions are compared and sorted in the canonical order used for every snapshot:
/// `lat`, `lon`, `timestamp_ms`, `vessel_id` and finally the latest flag (trail before latest).
/// Equality is defined on the same key, i.e. two positions are equal if they refer to the
/// same vessel at the same place and time with the same latest/trail status.
#[derive(Serialize,Debug,Clone)]
pub struct VesselPosition {
    pub vessel_id: Arc<str>, // shared with the store so that snapshots don't allocate per entry
    pub lat: f64,
    pub lon: f64,
    pub heading: f64,
    pub vessel_type: VesselType,
    pub data_origin: DataOrigin,
    pub timestamp_ms: EpochMillis,
    pub is_latest_position: bool,
}

impl VesselPosition {
    pub fn is_trail_position (&self)->bool { !self.is_latest_position }
}

impl Ord for VesselPosition {
    fn cmp (&self, other: &Self)->Ordering {
        self.lat.total_cmp( &other.lat)
            .then_with( || self.lon.total_cmp( &other.lon))
            .then_with( || self.timestamp_ms.cmp( &other.timestamp_ms))
            .then_with( || self.vessel_id.cmp( &other.vessel_id))
            .then_with( || self.is_latest_position.cmp( &other.is_latest_position))
    }
}

impl PartialOrd for VesselPosition {
    fn partial_cmp (&self, other: &Self)->Option<Ordering> { Some(self.cmp(other)) }
}

impl PartialEq for VesselPosition {
    fn eq (&self, other: &Self)->bool { self.cmp(other) == Ordering::Equal }
}

impl Eq for VesselPosition {}

impl fmt::Display for VesselPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_latest_position { "latest" } else { "trail" };
        write!( f, "VesselPosition( id: \"{}\", pos: ({:.5},{:.5}), time: {}, {kind} )", self.vessel_id, self.lat, self.lon, self.timestamp_ms)
    }
}

/// sort positions into the canonical snapshot order. Every producer of snapshots has to use this
pub fn sort_canonical (positions: &mut Vec<VesselPosition>) {
    positions.sort_unstable();
}

/// the read side of a position store as seen by renderers. Both functions return value snapshots
/// in canonical order
pub trait VesselPositions: Send + Sync {
    fn get_latest_positions (&self)->Vec<VesselPosition>;
    fn get_past_positions (&self, since: EpochMillis)->Vec<VesselPosition>;

    /// latest positions plus (optionally) the trail positions since the given time, merged in
    /// canonical order. Implementations should override this if they can take both from the
    /// same state
    fn get_display_positions (&self, trail_since: Option<EpochMillis>)->Vec<VesselPosition> {
        let mut list = self.get_latest_positions();
        if let Some(since) = trail_since {
            list.extend( self.get_past_positions( since));
            sort_canonical( &mut list);
        }
        list
    }
}
