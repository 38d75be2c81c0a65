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

//! the boundary to feed ingesters. Protocol parsing happens elsewhere - a feed only hands over
//! batches of already parsed [`VesselReport`]s to the store.

use std::{path::{Path,PathBuf}, sync::Arc, time::Duration};
use async_trait::async_trait;
use tokio::{sync::mpsc, time::{self,Instant}};
use tokio_util::sync::CancellationToken;
use tracing::{debug,info,warn};
use helm_common::datetime::EpochMillis;

use crate::{VesselReport, store::{PositionStore,UpdateStats}, errors::{HelmTrackError,Result,op_failed}};

/// accumulated statistics over the lifetime of a feed
#[derive(Debug,Clone,Copy,Default,PartialEq,Eq)]
pub struct FeedStats {
    pub batches: usize,
    pub accepted: usize,
    pub rejected: usize,
}

impl FeedStats {
    pub fn add (&mut self, update: &UpdateStats) {
        self.batches += 1;
        self.accepted += update.accepted;
        self.rejected += update.malformed + update.stale;
    }
}

/// something that writes reports into a store until it runs out of data or gets cancelled
#[async_trait]
pub trait PositionFeed: Send {
    async fn run (&mut self, store: Arc<PositionStore>, cancel: CancellationToken)->Result<FeedStats>;
}

/* #region channel feed ***************************************************************************************/

/// a feed for ingesters that live in their own task: report batches are sent through a channel
/// and applied to the store in arrival order
pub struct ChannelFeed {
    rx: mpsc::Receiver<Vec<VesselReport>>,
}

impl ChannelFeed {
    /// create a feed and the sender end for the ingester
    pub fn new (capacity: usize)->(mpsc::Sender<Vec<VesselReport>>, Self) {
        let (tx,rx) = mpsc::channel( capacity.max(1));
        (tx, ChannelFeed{rx})
    }
}

#[async_trait]
impl PositionFeed for ChannelFeed {
    async fn run (&mut self, store: Arc<PositionStore>, cancel: CancellationToken)->Result<FeedStats> {
        let mut stats = FeedStats::default();
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                batch = self.rx.recv() => match batch {
                    Some(reports) => stats.add( &store.update_vessels( reports)),
                    None => { debug!("channel feed closed"); break }
                }
            }
        }
        Ok(stats)
    }
}

/* #endregion channel feed */

/* #region replay feed ****************************************************************************************/

/// a feed that replays recorded reports from a CSV file with header
/// `vessel_id,lat,lon,heading,vessel_type,data_origin,timestamp_ms`.
///
/// Timestamps are shifted so that the first record maps to the time the replay starts (keeping
/// their recorded spacing), and records are submitted with that spacing divided by `speed`.
/// Records that are submitted within the same `batch_window` go into the same store update
pub struct ReplayFeed {
    path: PathBuf,
    speed: f64,
    batch_window: Duration,
}

impl ReplayFeed {
    pub fn new (path: impl AsRef<Path>, speed: f64)->Self {
        let speed = if speed.is_finite() && speed > 0.0 { speed } else { 1.0 };
        ReplayFeed { path: path.as_ref().to_path_buf(), speed, batch_window: Duration::from_millis(100) }
    }

    pub fn with_batch_window (mut self, batch_window: Duration)->Self {
        self.batch_window = batch_window;
        self
    }

    /// offset of a record relative to the first one, in replay (wall clock) time
    fn replay_offset (&self, first: EpochMillis, t: EpochMillis)->Duration {
        let dt = (t.millis() - first.millis()).max(0) as f64;
        Duration::from_secs_f64( dt / self.speed / 1000.0)
    }
}

/// read all parseable records of a replay file. Rows that can't be parsed are logged and skipped
pub fn read_replay_records (path: &Path)->Result<Vec<VesselReport>> {
    let mut reader = csv::ReaderBuilder::new().trim( csv::Trim::All).from_path( path)?;
    let mut records = Vec::new();

    for (i,row) in reader.deserialize::<VesselReport>().enumerate() {
        match row {
            Ok(report) => records.push(report),
            Err(e) => warn!("skipping replay record {} of {:?}: {}", i+1, path, e)
        }
    }
    Ok(records)
}

#[async_trait]
impl PositionFeed for ReplayFeed {
    async fn run (&mut self, store: Arc<PositionStore>, cancel: CancellationToken)->Result<FeedStats> {
        let path = self.path.clone();
        let records = tokio::task::spawn_blocking( move || read_replay_records( &path)).await
            .map_err( |e| op_failed( format!("replay reader failed: {e}")))??;

        let mut stats = FeedStats::default();
        let Some(first) = records.first().map( |r| r.timestamp_ms) else {
            info!("nothing to replay in {:?}", self.path);
            return Ok(stats)
        };

        info!("replaying {} records from {:?} at speed {}", records.len(), self.path, self.speed);
        let t_start = Instant::now();
        let base = EpochMillis::now();

        let mut records = records.into_iter().peekable();
        while let Some(report) = records.next() {
            let offset = self.replay_offset( first, report.timestamp_ms);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(stats),
                _ = time::sleep_until( t_start + offset) => {}
            }

            let mut batch = vec![ self.shift( report, first, base) ];
            while let Some(next) = records.next_if( |r| self.replay_offset( first, r.timestamp_ms) <= offset + self.batch_window) {
                batch.push( self.shift( next, first, base));
            }

            stats.add( &store.update_vessels( batch));
        }

        info!("replay of {:?} done: {:?}", self.path, stats);
        Ok(stats)
    }
}

impl ReplayFeed {
    /// move a record to replay time. Only the pacing depends on `speed` - recorded spacing is
    /// kept so that closely spaced reports of the same vessel stay distinct
    fn shift (&self, mut report: VesselReport, first: EpochMillis, base: EpochMillis)->VesselReport {
        let dt = report.timestamp_ms.millis().saturating_sub( first.millis());
        report.timestamp_ms = EpochMillis::new( base.millis().saturating_add( dt));
        report
    }
}

/* #endregion replay feed */
