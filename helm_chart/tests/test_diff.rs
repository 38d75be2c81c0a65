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

use std::sync::Arc;
use helm_common::datetime::EpochMillis;
use helm_track::{VesselPosition, VesselType, DataOrigin};
use helm_chart::{
    projection::{Projection,ViewCorners,PixelRect},
    sprites::{SpriteRef,TRAIL_ROW},
    backend::{RenderOp,RenderBackend,RecordingBackend},
    diff::{RenderDiff,FrameReport,common_prefix_len,execute_frame},
    errors::{HelmChartError,Result,backend_error}
};

/// 200x200 screen over lat 9..11, lon 19..21 - (10,20) is at the screen center
fn projection ()->Projection {
    Projection::new( ViewCorners::new( 11.0, 19.0, 9.0, 21.0), 200, 200, 10, 10).unwrap()
}

fn pos (id: &str, lat: f64, lon: f64, t: i64, is_latest_position: bool)->VesselPosition {
    VesselPosition {
        vessel_id: Arc::from(id),
        lat, lon,
        heading: 0.0,
        vessel_type: VesselType::Passenger,
        data_origin: DataOrigin::Local,
        timestamp_ms: EpochMillis::new(t),
        is_latest_position
    }
}

fn sorted (mut list: Vec<VesselPosition>)->Vec<VesselPosition> {
    helm_track::sort_canonical( &mut list);
    list
}

fn bounds_of (p: &VesselPosition)->PixelRect {
    projection().position_bounds( p).unwrap()
}

// run with "cargo test test_projection -- --nocapture"

#[test]
fn test_projection () {
    let proj = projection();

    let center = proj.project( 10.0, 20.0).unwrap();
    assert_eq!( (100.0, 100.0), center);
    assert_eq!( Some((0.0, 0.0)), proj.project( 11.0, 19.0));
    assert_eq!( Some((200.0, 200.0)), proj.project( 9.0, 21.0));
    assert_eq!( Some((50.0, 150.0)), proj.project( 9.5, 19.5));

    let bounds = proj.marker_bounds( 10.0, 20.0).unwrap();
    println!("marker bounds at center: {bounds}");
    assert_eq!( PixelRect::new( 95, 95, 10, 10), bounds);
    assert_eq!( (100, 100), bounds.center());

    // outside of the view or not a number - not displayable
    assert!( proj.project( 12.0, 20.0).is_none());
    assert!( proj.project( 10.0, 18.9).is_none());
    assert!( proj.project( f64::NAN, 20.0).is_none());
}

#[test]
fn test_invalid_projection () {
    assert!( Projection::new( ViewCorners::new( 9.0, 19.0, 11.0, 21.0), 200, 200, 10, 10).is_err()); // upside down
    assert!( Projection::new( ViewCorners::new( 11.0, 19.0, 9.0, 19.0), 200, 200, 10, 10).is_err()); // no width
    assert!( Projection::new( ViewCorners::new( 11.0, 19.0, 9.0, 21.0), 0, 200, 10, 10).is_err());
}

#[test]
fn test_sprites () {
    let mut p = pos("V1", 10.0, 20.0, 1000, true);
    p.vessel_type = VesselType::Commercial;
    p.data_origin = DataOrigin::Web;
    assert_eq!( SpriteRef::new( 1, 2), SpriteRef::for_position( &p));

    p.is_latest_position = false;
    let sprite = SpriteRef::for_position( &p);
    assert_eq!( SpriteRef::new( 1, TRAIL_ROW), sprite);
    assert_eq!( PixelRect::new( 16, 64, 16, 16), sprite.sheet_rect( 16, 16));
}

#[test]
fn test_initial_frame_draws_all () {
    let mut diff = RenderDiff::new();
    let snapshot = sorted( vec![ pos("A", 10.0, 20.0, 1000, true), pos("B", 10.5, 20.5, 1000, true) ]);

    let ops = diff.plan_frame( &projection(), snapshot.clone());
    for op in &ops { println!("  {op}") }
    assert_eq!( 2, ops.len());
    assert!( ops.iter().all( |op| op.is_draw()));
    assert_eq!( snapshot.as_slice(), diff.previous());

    // nothing changed - nothing to do
    assert!( diff.plan_frame( &projection(), snapshot).is_empty());
}

#[test]
fn test_scenario_d () {
    let a = pos("A", 9.5, 20.0, 1000, true);
    let b = pos("B", 10.0, 20.0, 1000, true);
    let c = pos("C", 10.5, 20.0, 1000, true);
    let d = pos("D", 10.6, 20.1, 2000, true);

    let mut diff = RenderDiff::new();
    diff.plan_frame( &projection(), vec![ a.clone(), b.clone(), c.clone() ]);

    let ops = diff.plan_frame( &projection(), vec![ a.clone(), b.clone(), d.clone() ]);
    println!("ops: {ops:?}");
    assert_eq!( vec![
        RenderOp::Erase{ bounds: bounds_of( &c) },
        RenderOp::Draw{ bounds: bounds_of( &d), sprite: SpriteRef::for_position( &d) },
    ], ops);
}

#[test]
fn test_latest_becomes_trail () {
    // V1 moves north: old latest becomes a trail point. Both sort after the unchanged A
    let a = pos("A", 9.5, 20.0, 1000, true);
    let v1_old = pos("V1", 10.0, 20.0, 1000, true);
    let v1_trail = pos("V1", 10.0, 20.0, 1000, false);
    let v1_new = pos("V1", 10.2, 20.0, 2000, true);

    let mut diff = RenderDiff::new();
    diff.plan_frame( &projection(), sorted( vec![ a.clone(), v1_old.clone() ]));
    let ops = diff.plan_frame( &projection(), sorted( vec![ a.clone(), v1_trail.clone(), v1_new.clone() ]));
    println!("ops: {ops:?}");

    assert_eq!( vec![
        RenderOp::Erase{ bounds: bounds_of( &v1_old) },
        RenderOp::Draw{ bounds: bounds_of( &v1_trail), sprite: SpriteRef::new( 0, TRAIL_ROW) },
        RenderOp::Draw{ bounds: bounds_of( &v1_new), sprite: SpriteRef::new( 0, 1) },
    ], ops);
}

#[test]
fn test_diff_erases_and_draws_suffixes () {
    let all: Vec<VesselPosition> = (0..8).map( |i| pos( &format!("V{i}"), 9.2 + i as f64 * 0.2, 20.0, 1000, true)).collect();
    let cases: Vec<(Vec<usize>,Vec<usize>)> = vec![
        (vec![], vec![0,1,2]),
        (vec![0,1,2], vec![]),
        (vec![0,1,2,3], vec![0,1,2,3]),
        (vec![0,1,2,3], vec![0,1,5,6,7]),
        (vec![0,2,4], vec![1,2,4]),
        (vec![0,1], vec![0,1,2,3]),
        (vec![0,1,2,3], vec![0,1]),
    ];

    for (prev_idx,new_idx) in cases {
        let prev: Vec<VesselPosition> = prev_idx.iter().map( |i| all[*i].clone()).collect();
        let new: Vec<VesselPosition> = new_idx.iter().map( |i| all[*i].clone()).collect();
        let n = common_prefix_len( &prev, &new);

        let mut diff = RenderDiff::new();
        diff.plan_frame( &projection(), prev.clone());
        let ops = diff.plan_frame( &projection(), new.clone());
        println!("{prev_idx:?} -> {new_idx:?}: prefix {n}, {} ops", ops.len());

        let expected: Vec<RenderOp> = prev[n..].iter().map( |p| RenderOp::Erase{ bounds: bounds_of(p) })
            .chain( new[n..].iter().map( |p| RenderOp::Draw{ bounds: bounds_of(p), sprite: SpriteRef::for_position(p) }))
            .collect();
        assert_eq!( expected, ops);
    }
}

#[test]
fn test_unprojectable_positions () {
    let a = pos("A", 10.0, 20.0, 1000, true);
    let outside = pos("A", 12.0, 20.0, 2000, true);
    let b = pos("B", 10.5, 20.0, 1000, true);

    let mut diff = RenderDiff::new();
    diff.plan_frame( &projection(), vec![ a.clone(), b.clone() ]);

    // A leaves the view: it gets erased but not drawn
    let ops = diff.plan_frame( &projection(), sorted( vec![ outside.clone(), b.clone() ]));
    println!("ops: {ops:?}");
    assert_eq!( vec![
        RenderOp::Erase{ bounds: bounds_of( &a) },
        RenderOp::Erase{ bounds: bounds_of( &b) },
        RenderOp::Draw{ bounds: bounds_of( &b), sprite: SpriteRef::for_position( &b) },
    ], ops);

    // and since it was never drawn it is never erased
    let ops = diff.plan_frame( &projection(), vec![ b.clone() ]);
    assert!( ops.is_empty());
}

/// a backend that fails to draw into a given region
struct FlakyBackend {
    bad_region: PixelRect,
    fail_present: bool,
    inner: RecordingBackend,
}

impl RenderBackend for FlakyBackend {
    fn erase_region (&mut self, bounds: &PixelRect)->Result<()> { self.inner.erase_region( bounds) }
    fn draw_marker (&mut self, sprite: &SpriteRef, bounds: &PixelRect)->Result<()> {
        if *bounds == self.bad_region { Err( backend_error("no texture")) } else { self.inner.draw_marker( sprite, bounds) }
    }
    fn present (&mut self)->Result<()> {
        if self.fail_present { Err( backend_error("surface lost")) } else { self.inner.present() }
    }
    fn repaint_background (&mut self)->Result<()> { self.inner.repaint_background() }
}

#[test]
fn test_backend_failures () {
    let a = pos("A", 9.5, 20.0, 1000, true);
    let b = pos("B", 10.0, 20.0, 1000, true);
    let c = pos("C", 10.5, 20.0, 1000, true);

    let mut backend = FlakyBackend { bad_region: bounds_of( &b), fail_present: false, inner: RecordingBackend::new() };
    let mut diff = RenderDiff::new();
    let ops = diff.plan_frame( &projection(), vec![ a.clone(), b.clone(), c.clone() ]);

    let report = execute_frame( &ops, &mut backend);
    println!("report: {report:?}");
    assert_eq!( 2, report.drawn);
    assert_eq!( 1, report.failures.len());
    assert_eq!( Some(ops[1]), report.failures[0].op);
    assert_eq!( 1, backend.inner.presents); // the pass goes on

    backend.fail_present = true;
    let ops = diff.plan_frame( &projection(), vec![ a.clone(), c.clone() ]);
    let report = execute_frame( &ops, &mut backend);
    println!("report: {report:?}");
    assert_eq!( 2, report.erased);
    assert_eq!( 1, report.drawn);
    assert_eq!( 1, report.failures.len());
    assert!( report.failures[0].op.is_none());
    assert!( matches!( report.failures[0].error, HelmChartError::BackendError(_)));
}
