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

use std::{sync::Arc, time::Duration};
use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug,info,error};
use tracing_subscriber::EnvFilter;
use helm_common::{define_cli, check_cli, datetime::parse_duration, process::set_ctrlc_handler};
use helm_track::{config::TrackConfig, store::PositionStore, expiry::spawn_expiry_task, feed::{PositionFeed,ReplayFeed}};
use helm_chart::{config::ChartConfig, view::ViewSet, frame_loop::{FrameLoop,ViewCommand}};

mod trace_backend;
use trace_backend::TraceBackend;

define_cli! { ARGS [about="replay recorded vessel positions and render chart frames to the log"] =
    speed: f64 [help="replay speed factor", long, default_value="1.0"],
    duration: Option<String> [help="stop after given time (e.g. \"5min\")", long],
    cycle: Option<String> [help="switch to the next view in the given interval (e.g. \"30s\")", long],
    replay_file: String [help="CSV file with recorded vessel reports"]
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env()) // use RUST_LOG to set max level
        .init();
    check_cli!(ARGS);

    let track_config: TrackConfig = helm_track::load_config( "track.ron")?;
    let chart_config: ChartConfig = helm_chart::load_config( "chart.ron")?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        set_ctrlc_handler( move || {
            info!("received ctrl-c, shutting down");
            cancel.cancel();
        })?;
    }

    if let Some(duration) = &ARGS.duration {
        let duration = parse_duration( duration)?;
        let cancel = cancel.clone();
        tokio::spawn( async move {
            tokio::time::sleep( duration).await;
            info!("run time of {:?} expired", duration);
            cancel.cancel();
        });
    }

    //--- the store and its background tasks
    let store = Arc::new( PositionStore::new( &track_config));
    let expiry_task = spawn_expiry_task( store.clone(), track_config.expiry_interval, cancel.clone());

    let feed_task = {
        let mut feed = ReplayFeed::new( &ARGS.replay_file, ARGS.speed);
        let store = store.clone();
        let cancel = cancel.clone();
        tokio::spawn( async move {
            let res = feed.run( store, cancel.clone()).await;
            if let Err(e) = &res {
                error!("replay failed: {e}");
                cancel.cancel();
            }
            res
        })
    };

    //--- the chart
    let mut views = ViewSet::from_config( &chart_config)?;
    let mut frame_loop = FrameLoop::new( &chart_config);

    if let Some(cycle) = &ARGS.cycle {
        let interval = parse_duration( cycle)?;
        let (tx,rx) = mpsc::channel( 4);
        frame_loop = frame_loop.with_commands( rx);
        spawn_view_cycler( tx, interval, cancel.clone());
    }

    let mut backend = TraceBackend::new();
    let stats = frame_loop.run( store.clone(), &mut views, &mut backend, cancel.clone()).await;

    if let Ok(feed_stats) = feed_task.await? {
        info!("replay stats: {:?}", feed_stats);
    }
    expiry_task.await?;

    info!("rendered {} frames ({} markers drawn, {} erased, {} failures), {} vessels in store",
           stats.frames, stats.drawn, stats.erased, stats.failures, store.vessel_count());
    Ok(())
}

fn spawn_view_cycler (tx: mpsc::Sender<ViewCommand>, interval: Duration, cancel: CancellationToken) {
    tokio::spawn( async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep( interval) => {
                    if tx.send( ViewCommand::Next).await.is_err() { break }
                }
            }
        }
        debug!("view cycler terminated");
    });
}
