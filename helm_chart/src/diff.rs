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

//! the incremental render diff.
//!
//! Each frame gets a snapshot of positions in canonical order. Since the order is stable, the
//! part of the screen that is still correct is the longest common prefix of the previous and the
//! new snapshot. Everything after it is erased (previous suffix) and redrawn (new suffix). For
//! slowly moving vessels this is a small fraction of the markers on screen, without having to
//! keep any per-vessel display state.

use tracing::warn;
use helm_track::VesselPosition;

use crate::{
    projection::Projection, sprites::SpriteRef,
    backend::{RenderOp,RenderBackend},
    errors::HelmChartError
};

/// length of the longest common prefix of two snapshots
pub fn common_prefix_len (prev: &[VesselPosition], new: &[VesselPosition])->usize {
    prev.iter().zip( new.iter()).take_while( |(p,n)| p == n).count()
}

/// the diff state of a view, which is just the last rendered snapshot
#[derive(Debug,Default)]
pub struct RenderDiff {
    previous: Vec<VesselPosition>,
}

impl RenderDiff {
    pub fn new ()->Self { RenderDiff::default() }

    /// the snapshot of the last planned frame
    pub fn previous (&self)->&[VesselPosition] { self.previous.as_slice() }

    /// forget the last snapshot. Use this after the screen was repainted so that the next frame
    /// draws everything
    pub fn reset (&mut self) {
        self.previous.clear();
    }

    /// compute the ops that turn the screen from the previous into the new snapshot, and make
    /// `new` the previous snapshot.
    ///
    /// Positions that do not project into the view are never drawn, and hence are not erased
    /// either. They still count for the prefix comparison
    pub fn plan_frame (&mut self, projection: &Projection, new: Vec<VesselPosition>)->Vec<RenderOp> {
        let n_common = common_prefix_len( &self.previous, &new);
        let mut ops = Vec::with_capacity( (self.previous.len() - n_common) + (new.len() - n_common));

        for pos in &self.previous[n_common..] {
            if let Some(bounds) = projection.position_bounds( pos) {
                ops.push( RenderOp::Erase{ bounds });
            }
        }

        for pos in &new[n_common..] {
            if let Some(bounds) = projection.position_bounds( pos) {
                ops.push( RenderOp::Draw{ bounds, sprite: SpriteRef::for_position( pos) });
            }
        }

        self.previous = new;
        ops
    }
}

/// a backend operation that failed. `op` is None if `present()` failed
#[derive(Debug)]
pub struct OpFailure {
    pub op: Option<RenderOp>,
    pub error: HelmChartError,
}

/// what happened in a frame pass
#[derive(Debug,Default)]
pub struct FrameReport {
    pub repainted: bool,
    pub erased: usize,
    pub drawn: usize,
    pub failures: Vec<OpFailure>,
}

impl FrameReport {
    pub fn is_ok (&self)->bool { self.failures.is_empty() }
    pub fn n_ops (&self)->usize { self.erased + self.drawn }
}

/// apply ops in order, then present. Failed operations are reported but do not stop the pass
pub fn execute_frame<B> (ops: &[RenderOp], backend: &mut B)->FrameReport where B: RenderBackend + ?Sized {
    let mut report = FrameReport::default();
    execute_ops( ops, backend, &mut report);
    present( backend, &mut report);
    report
}

pub(crate) fn execute_ops<B> (ops: &[RenderOp], backend: &mut B, report: &mut FrameReport) where B: RenderBackend + ?Sized {
    for op in ops {
        match backend.apply( op) {
            Ok(()) => if op.is_erase() { report.erased += 1 } else { report.drawn += 1 }
            Err(e) => {
                warn!("render op {op} failed: {e}");
                report.failures.push( OpFailure{ op: Some(*op), error: e });
            }
        }
    }
}

pub(crate) fn present<B> (backend: &mut B, report: &mut FrameReport) where B: RenderBackend + ?Sized {
    if let Err(e) = backend.present() {
        warn!("present failed: {e}");
        report.failures.push( OpFailure{ op: None, error: e });
    }
}
