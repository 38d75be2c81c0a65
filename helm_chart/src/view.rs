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

use tracing::{debug,info,warn};
use helm_track::VesselPosition;

use crate::{
    config::ChartConfig,
    projection::Projection,
    backend::RenderBackend,
    diff::{RenderDiff,FrameReport,OpFailure,execute_ops,present},
    errors::{HelmChartError,Result}
};

/// a named chart view with its own projection and render diff state
#[derive(Debug)]
pub struct ChartView {
    name: String,
    projection: Projection,
    diff: RenderDiff,
    needs_rebuild: bool,
}

impl ChartView {
    /// a new view starts with a full background repaint
    pub fn new (name: impl ToString, projection: Projection)->Self {
        ChartView { name: name.to_string(), projection, diff: RenderDiff::new(), needs_rebuild: true }
    }

    pub fn name (&self)->&str { self.name.as_str() }
    pub fn projection (&self)->&Projection { &self.projection }
    pub fn needs_rebuild (&self)->bool { self.needs_rebuild }

    /// the positions that were rendered in the last frame (canonical order)
    pub fn rendered_positions (&self)->&[VesselPosition] { self.diff.previous() }

    /// invalidate the screen. The next frame repaints the background and draws all positions
    pub fn rebuild (&mut self) {
        self.diff.reset();
        self.needs_rebuild = true;
    }

    /// render one frame for the given snapshot (which has to be in canonical order)
    pub fn render<B> (&mut self, snapshot: Vec<VesselPosition>, backend: &mut B)->FrameReport where B: RenderBackend + ?Sized {
        let mut report = FrameReport::default();

        if self.needs_rebuild {
            debug!("repainting background of view {}", self.name);
            // the previous snapshot is already gone so even if this fails we redraw everything
            if let Err(e) = backend.repaint_background() {
                warn!("background repaint of view {} failed: {e}", self.name);
                report.failures.push( OpFailure{ op: None, error: e });
            }
            self.needs_rebuild = false;
            report.repainted = true;
        }

        let ops = self.diff.plan_frame( &self.projection, snapshot);
        execute_ops( &ops, backend, &mut report);
        present( backend, &mut report);
        report
    }

    /// the rendered position closest to screen point (x,y) if its marker center is within
    /// `radius` pixels. Latest positions win over trail positions at the same distance
    pub fn vessel_at (&self, x: i32, y: i32, radius: u32)->Option<&VesselPosition> {
        let r2 = (radius as i64).saturating_mul( radius as i64);
        let mut closest: Option<(i64,&VesselPosition)> = None;

        for pos in self.diff.previous() {
            if let Some(bounds) = self.projection.position_bounds( pos) {
                let (cx,cy) = bounds.center();
                let dx = cx as i64 - x as i64;
                let dy = cy as i64 - y as i64;
                let d2 = dx.saturating_mul(dx).saturating_add( dy.saturating_mul(dy));
                if d2 <= r2 {
                    let is_better = match closest {
                        Some((d_min,p_min)) => d2 < d_min || (d2 == d_min && pos.is_latest_position && !p_min.is_latest_position),
                        None => true
                    };
                    if is_better { closest = Some((d2,pos)) }
                }
            }
        }
        closest.map( |(_,pos)| pos)
    }
}

/// the set of configured views, one of which is current
#[derive(Debug)]
pub struct ViewSet {
    views: Vec<ChartView>,
    current: usize,
}

impl ViewSet {
    pub fn new (views: Vec<ChartView>)->Result<Self> {
        if views.is_empty() {
            return Err( HelmChartError::InvalidViewError("no views".to_string()))
        }
        for (i,v) in views.iter().enumerate() {
            if views[..i].iter().any( |w| w.name == v.name) {
                return Err( HelmChartError::InvalidViewError( format!("duplicate view name {}", v.name)))
            }
        }
        Ok( ViewSet { views, current: 0 } )
    }

    pub fn from_config (config: &ChartConfig)->Result<Self> {
        let mut views = Vec::with_capacity( config.views.len());
        for vc in &config.views {
            let projection = Projection::new( vc.corners, config.screen_width, config.screen_height, config.marker_width, config.marker_height)
                .map_err( |e| HelmChartError::InvalidViewError( format!("{}: {e}", vc.name)))?;
            views.push( ChartView::new( &vc.name, projection));
        }
        ViewSet::new( views)
    }

    pub fn len (&self)->usize { self.views.len() }
    pub fn names (&self)->impl Iterator<Item=&str> { self.views.iter().map( |v| v.name()) }

    pub fn current (&self)->&ChartView { &self.views[self.current] }
    pub fn current_mut (&mut self)->&mut ChartView { &mut self.views[self.current] }

    /// switch to the next view (wrapping around). The new current view is rebuilt on its next frame
    pub fn next_view (&mut self)->&ChartView {
        self.current = (self.current + 1) % self.views.len();
        self.switched()
    }

    pub fn select_view (&mut self, name: &str)->Result<&ChartView> {
        match self.views.iter().position( |v| v.name == name) {
            Some(idx) => {
                self.current = idx;
                Ok( self.switched())
            }
            None => Err( HelmChartError::UnknownViewError( name.to_string()))
        }
    }

    fn switched (&mut self)->&ChartView {
        let view = &mut self.views[self.current];
        view.rebuild();
        info!("switched to view {}", view.name);
        view
    }

    pub fn render_current<B> (&mut self, snapshot: Vec<VesselPosition>, backend: &mut B)->FrameReport where B: RenderBackend + ?Sized {
        self.current_mut().render( snapshot, backend)
    }

    pub fn vessel_at (&self, x: i32, y: i32, radius: u32)->Option<&VesselPosition> {
        self.current().vessel_at( x, y, radius)
    }
}
