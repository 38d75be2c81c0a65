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

use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::{self,MissedTickBehavior}};
use tokio_util::sync::CancellationToken;
use tracing::{debug,info};
use helm_common::datetime::EpochMillis;

use crate::store::PositionStore;

/// spawn a task that sweeps the store for expired positions every `interval` until `cancel` is
/// triggered. The first sweep happens immediately
pub fn spawn_expiry_task (store: Arc<PositionStore>, interval: Duration, cancel: CancellationToken)->JoinHandle<()> {
    tokio::spawn( async move {
        let mut ticker = time::interval( interval.max( Duration::from_millis(1)));
        ticker.set_missed_tick_behavior( MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("expiry task shutting down");
                    break
                }
                _ = ticker.tick() => {
                    let report = store.expire_vessels( EpochMillis::now());
                    if report.removed_positions > 0 {
                        debug!( removed_positions = report.removed_positions, removed_vessels = report.removed_vessels, "expired positions");
                    }
                }
            }
        }
    })
}
