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
use tokio::{sync::mpsc, time::{self,MissedTickBehavior}};
use tokio_util::sync::CancellationToken;
use tracing::{debug,info,warn};
use helm_common::datetime::EpochMillis;
use helm_track::{VesselPosition, VesselPositions};

use crate::{config::ChartConfig, view::ViewSet, backend::RenderBackend, diff::FrameReport};

/// view changes requested from outside the frame loop (e.g. by an input handler)
#[derive(Debug,Clone,PartialEq,Eq)]
pub enum ViewCommand {
    Next,
    Select(String),
}

/// summary of a frame loop run
#[derive(Debug,Clone,Copy,Default,PartialEq,Eq)]
pub struct LoopStats {
    pub frames: usize,
    pub erased: usize,
    pub drawn: usize,
    pub failures: usize,
    pub view_switches: usize,
}

impl LoopStats {
    fn add (&mut self, report: &FrameReport) {
        self.frames += 1;
        self.erased += report.erased;
        self.drawn += report.drawn;
        self.failures += report.failures.len();
    }
}

enum LoopEvent {
    Frame,
    Command( Option<ViewCommand>),
}

/// the render loop: one snapshot-diff-execute pass per frame at a fixed cadence
pub struct FrameLoop {
    frame_interval: Duration,
    show_trails: bool,
    trail_window: Duration,
    commands: Option<mpsc::Receiver<ViewCommand>>,
}

impl FrameLoop {
    pub fn new (config: &ChartConfig)->Self {
        FrameLoop {
            frame_interval: config.frame_interval,
            show_trails: config.show_trails,
            trail_window: config.trail_window,
            commands: None
        }
    }

    /// process view commands from the given channel between frames
    pub fn with_commands (mut self, rx: mpsc::Receiver<ViewCommand>)->Self {
        self.commands = Some(rx);
        self
    }

    pub fn trail_since (&self, now: EpochMillis)->Option<EpochMillis> {
        if self.show_trails { Some( now.before( self.trail_window)) } else { None }
    }

    /// the positions to render at time `now`
    pub fn snapshot<S> (&self, store: &S, now: EpochMillis)->Vec<VesselPosition> where S: VesselPositions + ?Sized {
        store.get_display_positions( self.trail_since( now))
    }

    /// render a single frame of the current view
    pub fn render_frame<S,B> (&self, store: &S, views: &mut ViewSet, backend: &mut B, now: EpochMillis)->FrameReport
        where S: VesselPositions + ?Sized, B: RenderBackend + ?Sized
    {
        let snapshot = self.snapshot( store, now);
        views.render_current( snapshot, backend)
    }

    pub fn apply_command (&self, views: &mut ViewSet, cmd: ViewCommand)->bool {
        match cmd {
            ViewCommand::Next => { views.next_view(); true }
            ViewCommand::Select(name) => match views.select_view( &name) {
                Ok(_) => true,
                Err(e) => { warn!("ignoring view command: {e}"); false }
            }
        }
    }

    /// render frames until `cancel` is triggered. Frames that are missed because a pass took too
    /// long are skipped, not caught up
    pub async fn run<S,B> (&mut self, store: Arc<S>, views: &mut ViewSet, backend: &mut B, cancel: CancellationToken)->LoopStats
        where S: VesselPositions + ?Sized, B: RenderBackend + ?Sized
    {
        let mut stats = LoopStats::default();
        let mut ticker = time::interval( self.frame_interval.max( Duration::from_millis(1)));
        ticker.set_missed_tick_behavior( MissedTickBehavior::Skip);

        info!("starting frame loop with view {} at {:?} frame interval", views.current().name(), self.frame_interval);

        loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                cmd = next_command( &mut self.commands) => LoopEvent::Command(cmd),
                _ = ticker.tick() => LoopEvent::Frame,
            };

            match event {
                LoopEvent::Frame => {
                    let report = self.render_frame( store.as_ref(), views, backend, EpochMillis::now());
                    if !report.is_ok() {
                        warn!("frame {} had {} failed operations", stats.frames, report.failures.len());
                    } else if report.n_ops() > 0 {
                        debug!( erased = report.erased, drawn = report.drawn, "frame {}", stats.frames);
                    }
                    stats.add( &report);
                }
                LoopEvent::Command(Some(cmd)) => {
                    if self.apply_command( views, cmd) { stats.view_switches += 1 }
                }
                LoopEvent::Command(None) => {
                    debug!("view command channel closed");
                    self.commands = None;
                }
            }
        }

        info!("frame loop terminated: {:?}", stats);
        stats
    }
}

async fn next_command (commands: &mut Option<mpsc::Receiver<ViewCommand>>)->Option<ViewCommand> {
    match commands {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await
    }
}
