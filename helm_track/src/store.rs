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

use std::{collections::{HashMap,VecDeque}, sync::{Arc,RwLock,RwLockReadGuard,RwLockWriteGuard}, time::Duration};
use tracing::{debug,info,warn};
use helm_common::datetime::EpochMillis;

use crate::{
    VesselPosition, VesselPositions, VesselReport, VesselType, DataOrigin, sort_canonical,
    config::{TrackConfig,CoordinateRange},
    errors::{HelmTrackError,Result,malformed}
};

/// a stored position. Note there is no latest flag - that is derived from the position within
/// the history (the back is always the latest)
#[derive(Debug,Clone)]
struct TrackPoint {
    lat: f64,
    lon: f64,
    heading: f64,
    vessel_type: VesselType,
    data_origin: DataOrigin,
    timestamp_ms: EpochMillis,
}

/// the retained positions of one vessel, oldest to newest with strictly increasing timestamps
#[derive(Debug)]
struct VesselHistory {
    vessel_id: Arc<str>,
    points: VecDeque<TrackPoint>,
}

impl VesselHistory {
    fn new (vessel_id: Arc<str>)->Self {
        VesselHistory { vessel_id, points: VecDeque::new() }
    }

    fn latest (&self)->Option<&TrackPoint> { self.points.back() }

    fn position (&self, p: &TrackPoint, is_latest_position: bool)->VesselPosition {
        VesselPosition {
            vessel_id: self.vessel_id.clone(),
            lat: p.lat,
            lon: p.lon,
            heading: p.heading,
            vessel_type: p.vessel_type,
            data_origin: p.data_origin,
            timestamp_ms: p.timestamp_ms,
            is_latest_position
        }
    }

    fn latest_position (&self)->Option<VesselPosition> {
        self.latest().map( |p| self.position( p, true))
    }

    /// append trail positions with timestamp >= since
    fn collect_trail (&self, since: EpochMillis, acc: &mut Vec<VesselPosition>) {
        let end = self.points.len().saturating_sub(1); // the back is the latest
        let start = self.points.partition_point( |p| p.timestamp_ms < since);
        if start < end {
            for p in self.points.range( start..end) {
                acc.push( self.position( p, false));
            }
        }
    }

    fn push (&mut self, p: TrackPoint, max_history: Option<usize>) {
        if let Some(max) = max_history {
            while max > 0 && self.points.len() >= max {
                self.points.pop_front(); // drop the oldest trail point
            }
        }
        self.points.push_back(p);
    }

    /// remove all points older than cutoff, return number of removed points
    fn prune (&mut self, cutoff: EpochMillis)->usize {
        let n = self.points.partition_point( |p| p.timestamp_ms < cutoff);
        self.points.drain( ..n);
        n
    }
}

/// result of an update batch (mostly for logging - feeds don't have to care)
#[derive(Debug,Clone,Copy,Default,PartialEq,Eq)]
pub struct UpdateStats {
    pub accepted: usize,
    pub malformed: usize,
    pub stale: usize,
}

/// result of an expiry sweep
#[derive(Debug,Clone,Copy,Default,PartialEq,Eq)]
pub struct ExpiryReport {
    pub removed_positions: usize,
    pub removed_vessels: usize,
}

/// the authoritative set of known vessel positions.
///
/// The store is shared between (at least) a feed that writes and a render loop that reads. All
/// access goes through one RwLock so that each update batch and each expiry sweep becomes
/// visible atomically, and readers only ever get value snapshots. Nothing in here blocks on
/// anything else than the lock, and no operation runs longer than it takes to touch the affected
/// vessels
pub struct PositionStore {
    retention: Duration,
    max_history: Option<usize>,
    valid_range: CoordinateRange,

    vessels: RwLock<HashMap<Arc<str>,VesselHistory>>,
}

impl PositionStore {
    pub fn new (config: &TrackConfig)->Self {
        PositionStore {
            retention: config.retention,
            max_history: config.max_history,
            valid_range: config.valid_range,
            vessels: RwLock::new( HashMap::new())
        }
    }

    pub fn retention (&self)->Duration { self.retention }

    // a panic while holding the lock does not leave histories half updated (we never unwind
    // out of a mutation), hence we just continue with poisoned locks
    fn read (&self)->RwLockReadGuard<'_,HashMap<Arc<str>,VesselHistory>> {
        self.vessels.read().unwrap_or_else( |e| e.into_inner())
    }

    fn write (&self)->RwLockWriteGuard<'_,HashMap<Arc<str>,VesselHistory>> {
        self.vessels.write().unwrap_or_else( |e| e.into_inner())
    }

    /// check if a report can be accepted at all (independent of store state)
    pub fn validate (&self, report: &VesselReport)->Result<()> {
        if report.vessel_id.trim().is_empty() {
            return Err( malformed!("missing vessel id in {}", report))
        }
        if !report.lat.is_finite() || !report.lon.is_finite() {
            return Err( malformed!("non-finite coordinates in {}", report))
        }
        if !self.valid_range.contains( report.lat, report.lon) {
            return Err( malformed!("coordinates out of range in {}", report))
        }
        Ok(())
    }

    /// add a batch of reports. Each report is either appended as the new latest position of its
    /// vessel or rejected (malformed or stale). Rejections are logged and do not affect other
    /// reports of the same batch. The whole batch becomes visible to readers at once
    pub fn update_vessels<I> (&self, reports: I)->UpdateStats where I: IntoIterator<Item=VesselReport> {
        let mut stats = UpdateStats::default();
        let mut vessels = self.write();

        for report in reports {
            if let Err(e) = self.validate( &report) {
                warn!("rejected report: {e}");
                stats.malformed += 1;
                continue
            }

            match add_report( &mut vessels, report, self.max_history) {
                Ok(()) => stats.accepted += 1,
                Err(e) => {
                    debug!("rejected report: {e}");
                    stats.stale += 1;
                }
            }
        }

        stats
    }

    /// remove all positions older than `now - retention`, including latest positions. Vessels
    /// without remaining positions are dropped altogether
    pub fn expire_vessels (&self, now: EpochMillis)->ExpiryReport {
        let cutoff = now.before( self.retention);
        let mut report = ExpiryReport::default();
        let mut vessels = self.write();

        vessels.retain( |id, history| {
            report.removed_positions += history.prune( cutoff);
            if history.points.is_empty() {
                info!("vessel {id} has not been heard from since {cutoff}, removing it");
                report.removed_vessels += 1;
                false
            } else {
                true
            }
        });

        report
    }

    /// snapshot of all latest positions in canonical order
    pub fn get_latest_positions (&self)->Vec<VesselPosition> {
        let mut list: Vec<VesselPosition> = {
            let vessels = self.read();
            vessels.values().filter_map( |h| h.latest_position()).collect()
        };
        sort_canonical( &mut list);
        list
    }

    /// snapshot of all trail (non-latest) positions with timestamps >= since, in canonical order
    pub fn get_past_positions (&self, since: EpochMillis)->Vec<VesselPosition> {
        let mut list: Vec<VesselPosition> = Vec::new();
        {
            let vessels = self.read();
            for history in vessels.values() {
                history.collect_trail( since, &mut list);
            }
        }
        sort_canonical( &mut list);
        list
    }

    /// snapshot of all latest positions plus the trail positions since the given time, both
    /// taken under the same lock and merged in canonical order
    pub fn get_display_positions (&self, trail_since: Option<EpochMillis>)->Vec<VesselPosition> {
        let mut list: Vec<VesselPosition> = Vec::new();
        {
            let vessels = self.read();
            for history in vessels.values() {
                if let Some(since) = trail_since {
                    history.collect_trail( since, &mut list);
                }
                if let Some(p) = history.latest_position() {
                    list.push(p);
                }
            }
        }
        sort_canonical( &mut list);
        list
    }

    /// the retained positions of a single vessel, oldest to newest
    pub fn vessel_history (&self, vessel_id: &str)->Vec<VesselPosition> {
        let vessels = self.read();
        match vessels.get( vessel_id) {
            Some(history) => {
                let n = history.points.len();
                history.points.iter().enumerate().map( |(i,p)| history.position( p, i+1 == n)).collect()
            }
            None => Vec::new()
        }
    }

    pub fn vessel_count (&self)->usize { self.read().len() }

    pub fn position_count (&self)->usize {
        self.read().values().map( |h| h.points.len()).sum()
    }

    pub fn is_empty (&self)->bool { self.read().is_empty() }
}

impl VesselPositions for PositionStore {
    fn get_latest_positions (&self)->Vec<VesselPosition> { PositionStore::get_latest_positions( self) }
    fn get_past_positions (&self, since: EpochMillis)->Vec<VesselPosition> { PositionStore::get_past_positions( self, since) }
    fn get_display_positions (&self, trail_since: Option<EpochMillis>)->Vec<VesselPosition> { PositionStore::get_display_positions( self, trail_since) }
}

fn add_report (vessels: &mut HashMap<Arc<str>,VesselHistory>, report: VesselReport, max_history: Option<usize>)->Result<()> {
    let point = TrackPoint {
        lat: report.lat,
        lon: report.lon,
        heading: report.heading,
        vessel_type: report.vessel_type,
        data_origin: report.data_origin,
        timestamp_ms: report.timestamp_ms
    };

    if let Some(history) = vessels.get_mut( report.vessel_id.as_str()) {
        if let Some(latest) = history.latest() {
            if point.timestamp_ms <= latest.timestamp_ms {
                return Err( HelmTrackError::StaleReport {
                    vessel_id: report.vessel_id,
                    timestamp: point.timestamp_ms,
                    latest: latest.timestamp_ms
                })
            }
        }
        history.push( point, max_history);

    } else {
        let vessel_id: Arc<str> = Arc::from( report.vessel_id);
        let mut history = VesselHistory::new( vessel_id.clone());
        history.push( point, max_history);
        vessels.insert( vessel_id, history);
    }

    Ok(())
}
