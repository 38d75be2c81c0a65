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

use std::collections::HashMap;
use helm_common::datetime::{self,EpochMillis};
use helm_track::{
    VesselPosition, VesselPositions, VesselReport, VesselType, DataOrigin,
    config::{TrackConfig,CoordinateRange},
    store::{PositionStore,UpdateStats,ExpiryReport}
};

fn report (id: &str, lat: f64, lon: f64, t: i64)->VesselReport {
    VesselReport::new( id, lat, lon, EpochMillis::new(t))
}

fn store_with_retention_ms (ms: u64)->PositionStore {
    PositionStore::new( &TrackConfig::with_retention( datetime::millis(ms)))
}

/// check that every vessel has exactly one latest position which has the max timestamp of its history
fn assert_latest_invariant (store: &PositionStore) {
    let latest = store.get_latest_positions();
    let mut ids: HashMap<String,EpochMillis> = HashMap::new();
    for p in &latest {
        assert!( p.is_latest_position);
        assert!( ids.insert( p.vessel_id.to_string(), p.timestamp_ms).is_none(), "more than one latest for {}", p.vessel_id);
    }
    assert_eq!( latest.len(), store.vessel_count());

    for (id,t_latest) in &ids {
        let history = store.vessel_history( id);
        assert!( history.windows(2).all( |w| w[0].timestamp_ms < w[1].timestamp_ms), "history not strictly ordered");
        assert_eq!( history.iter().filter( |p| p.is_latest_position).count(), 1);
        assert_eq!( history.last().map( |p| p.timestamp_ms), Some(*t_latest));
    }
}

// run with "cargo test test_scenario -- --nocapture"

#[test]
fn test_scenario_a_single_report () {
    let store = store_with_retention_ms( 60_000);
    assert!( store.get_latest_positions().is_empty());

    let stats = store.update_vessels( vec![ report("V1", 10.0, 20.0, 1000) ]);
    assert_eq!( UpdateStats{ accepted: 1, malformed: 0, stale: 0 }, stats);

    let latest = store.get_latest_positions();
    println!("latest: {latest:?}");
    assert_eq!( 1, latest.len());
    let p = &latest[0];
    assert_eq!( "V1", p.vessel_id.as_ref());
    assert_eq!( (10.0, 20.0), (p.lat, p.lon));
    assert_eq!( EpochMillis::new(1000), p.timestamp_ms);
    assert!( p.is_latest_position);
}

#[test]
fn test_scenario_b_latest_becomes_trail () {
    let store = store_with_retention_ms( 60_000);
    store.update_vessels( vec![ report("V1", 10.0, 20.0, 1000) ]);
    store.update_vessels( vec![ report("V1", 10.1, 20.1, 2000) ]);

    let latest = store.get_latest_positions();
    assert_eq!( 1, latest.len());
    assert_eq!( EpochMillis::new(2000), latest[0].timestamp_ms);
    assert!( latest[0].is_latest_position);

    let past = store.get_past_positions( EpochMillis::new(0));
    println!("past: {past:?}");
    assert_eq!( 1, past.len());
    assert_eq!( EpochMillis::new(1000), past[0].timestamp_ms);
    assert!( !past[0].is_latest_position);

    assert_latest_invariant( &store);
}

#[test]
fn test_scenario_c_expire_latest () {
    let store = store_with_retention_ms( 5000);
    store.update_vessels( vec![ report("V1", 10.0, 20.0, 1000) ]);

    let res = store.expire_vessels( EpochMillis::new(10_000));
    assert_eq!( ExpiryReport{ removed_positions: 1, removed_vessels: 1 }, res);
    assert!( store.get_latest_positions().is_empty());
    assert!( store.get_past_positions( EpochMillis::new(0)).is_empty());
    assert_eq!( 0, store.vessel_count());

    // the vessel comes back once there is new data
    store.update_vessels( vec![ report("V1", 10.0, 20.0, 11_000) ]);
    assert_eq!( 1, store.get_latest_positions().len());
}

#[test]
fn test_expiry_bound () {
    let store = store_with_retention_ms( 5000);
    for t in (0..20).map( |i| i * 1000) {
        store.update_vessels( vec![ report("A", 1.0, 1.0 + t as f64 * 0.001, t), report("B", 2.0, 2.0, t + 500) ]);
    }
    let now = EpochMillis::new(17_000);
    let cutoff = now.before( store.retention());
    let res = store.expire_vessels( now);
    println!("expired: {res:?}");

    for p in store.get_latest_positions().iter().chain( store.get_past_positions( EpochMillis::new(0)).iter()) {
        assert!( p.timestamp_ms >= cutoff, "{p} survived expiry");
    }
    // 12000..19000 for A, 12500..19500 for B
    assert_eq!( 8, store.vessel_history("A").len());
    assert_eq!( 8, store.vessel_history("B").len());
    assert_latest_invariant( &store);
}

#[test]
fn test_stale_reports_rejected () {
    let store = store_with_retention_ms( 60_000);
    store.update_vessels( vec![ report("V1", 10.0, 20.0, 2000) ]);

    // same timestamp and older timestamp are both stale
    let stats = store.update_vessels( vec![ report("V1", 11.0, 21.0, 2000), report("V1", 12.0, 22.0, 1500) ]);
    assert_eq!( UpdateStats{ accepted: 0, malformed: 0, stale: 2 }, stats);

    let history = store.vessel_history("V1");
    assert_eq!( 1, history.len());
    assert_eq!( (10.0, 20.0), (history[0].lat, history[0].lon));
    assert_latest_invariant( &store);
}

#[test]
fn test_out_of_order_within_batch () {
    let store = store_with_retention_ms( 60_000);
    let stats = store.update_vessels( vec![
        report("V1", 10.0, 20.0, 1000),
        report("V1", 10.2, 20.2, 3000),
        report("V1", 10.1, 20.1, 2000), // arrives late
        report("V2", 30.0, 40.0, 2500),
    ]);
    assert_eq!( UpdateStats{ accepted: 3, malformed: 0, stale: 1 }, stats);
    assert_eq!( 2, store.vessel_history("V1").len());
    assert_latest_invariant( &store);
}

#[test]
fn test_malformed_reports_dropped () {
    let config = TrackConfig {
        valid_range: CoordinateRange{ min_lat: 40.0, max_lat: 42.0, min_lon: -72.0, max_lon: -70.0 },
        ..TrackConfig::default()
    };
    let store = PositionStore::new( &config);

    let stats = store.update_vessels( vec![
        report("OK", 41.5, -71.3, 1000),
        report("FAR", 10.0, -71.3, 1000),
        report("", 41.5, -71.3, 1000),
        report("NAN", f64::NAN, -71.3, 1000),
        report("OK2", 41.6, -71.2, 1000),
    ]);
    println!("stats: {stats:?}");
    assert_eq!( UpdateStats{ accepted: 2, malformed: 3, stale: 0 }, stats);
    assert_eq!( 2, store.vessel_count());
    assert!( store.vessel_history("FAR").is_empty());
}

#[test]
fn test_canonical_order_and_idempotence () {
    let store = store_with_retention_ms( 60_000);
    store.update_vessels( vec![
        report("C", 10.0, 5.0, 1000),
        report("B", 10.0, 5.0, 1000), // same place and time as C - vessel id breaks the tie
        report("A", 12.0, 1.0, 1000),
        report("D", 9.0, 7.0, 1000),
        report("E", 10.0, 4.0, 3000),
    ]);

    let latest = store.get_latest_positions();
    let ids: Vec<&str> = latest.iter().map( |p| p.vessel_id.as_ref()).collect();
    println!("order: {ids:?}");
    assert_eq!( vec!["D", "E", "B", "C", "A"], ids);
    assert!( latest.windows(2).all( |w| w[0] < w[1]));

    // no intervening updates -> identical snapshots
    assert_eq!( latest, store.get_latest_positions());
    assert_eq!( store.get_past_positions( EpochMillis::new(0)), store.get_past_positions( EpochMillis::new(0)));
}

#[test]
fn test_past_positions_since () {
    let store = store_with_retention_ms( 60_000);
    for t in [1000, 2000, 3000, 4000] {
        store.update_vessels( vec![ report("V1", 10.0 + t as f64 / 10_000.0, 20.0, t) ]);
    }

    let past = store.get_past_positions( EpochMillis::new(2000));
    let times: Vec<i64> = past.iter().map( |p| p.timestamp_ms.millis()).collect();
    assert_eq!( vec![2000, 3000], times); // 4000 is the latest, not a trail position
    assert!( past.iter().all( |p| p.is_trail_position()));

    assert!( store.get_past_positions( EpochMillis::new(5000)).is_empty());
}

#[test]
fn test_display_positions () {
    let store = store_with_retention_ms( 60_000);
    store.update_vessels( vec![ report("V1", 10.0, 20.0, 1000), report("V2", 5.0, 20.0, 1000) ]);
    store.update_vessels( vec![ report("V1", 11.0, 20.0, 2000) ]);

    let all = store.get_display_positions( Some(EpochMillis::new(0)));
    println!("display: {all:#?}");
    assert_eq!( 3, all.len());
    assert!( all.windows(2).all( |w| w[0] < w[1]));
    assert_eq!( 2, all.iter().filter( |p| p.is_latest_position).count());

    let latest_only = store.get_display_positions( None);
    assert_eq!( store.get_latest_positions(), latest_only);
}

#[test]
fn test_max_history () {
    let config = TrackConfig { max_history: Some(3), ..TrackConfig::default() };
    let store = PositionStore::new( &config);
    for t in 1..=5 {
        store.update_vessels( vec![ report("V1", 10.0, 20.0 + t as f64, t * 1000) ]);
    }

    let history = store.vessel_history("V1");
    let times: Vec<i64> = history.iter().map( |p| p.timestamp_ms.millis()).collect();
    assert_eq!( vec![3000, 4000, 5000], times);
    assert!( history[2].is_latest_position);
    assert_latest_invariant( &store);
}

#[test]
fn test_trait_object_snapshots () {
    let store = store_with_retention_ms( 60_000);
    store.update_vessels( vec![ report("V1", 10.0, 20.0, 1000), report("V1", 10.5, 20.5, 2000) ]);

    let positions: &dyn VesselPositions = &store;
    assert_eq!( 1, positions.get_latest_positions().len());
    assert_eq!( 1, positions.get_past_positions( EpochMillis::new(0)).len());
}

#[test]
fn test_consistent_snapshots_under_writes () {
    use std::{sync::{Arc,atomic::{AtomicBool,Ordering}}, thread};

    let store = Arc::new( store_with_retention_ms( 200));
    let done = Arc::new( AtomicBool::new(false));
    let ids: Vec<String> = (0..10).map( |i| format!("V{i}")).collect();

    let writer = {
        let store = store.clone();
        let done = done.clone();
        thread::spawn( move || {
            for step in 1..=2000i64 {
                let t = step * 10;
                let batch: Vec<VesselReport> = ids.iter().enumerate()
                    .map( |(i,id)| report( id, 10.0 + i as f64 * 0.01, 20.0 + step as f64 * 0.0001, t))
                    .collect();
                store.update_vessels( batch);
                if step % 10 == 0 {
                    store.expire_vessels( EpochMillis::new(t));
                }
            }
            done.store( true, Ordering::Release);
        })
    };

    let mut n_snapshots = 0;
    loop {
        let finished = done.load( Ordering::Acquire);
        let snapshot = store.get_display_positions( Some(EpochMillis::new(0)));
        n_snapshots += 1;

        let mut per_vessel: HashMap<&str,(usize,EpochMillis,EpochMillis)> = HashMap::new(); // (n_latest, t_latest, t_max)
        for p in &snapshot {
            let e = per_vessel.entry( p.vessel_id.as_ref()).or_insert( (0, EpochMillis::new(i64::MIN), EpochMillis::new(i64::MIN)));
            if p.is_latest_position {
                e.0 += 1;
                e.1 = p.timestamp_ms;
            }
            e.2 = e.2.max( p.timestamp_ms);
        }

        let mut t_batch: Option<EpochMillis> = None;
        for (id,(n_latest,t_latest,t_max)) in &per_vessel {
            assert_eq!( 1, *n_latest, "vessel {id} has {n_latest} latest positions");
            assert_eq!( t_max, t_latest, "latest of {id} is not its newest position");
            // update batches become visible as a whole
            match t_batch {
                Some(t) => assert_eq!( t, *t_latest, "partial batch visible"),
                None => t_batch = Some(*t_latest)
            }
        }

        if finished { break }
    }

    writer.join().unwrap();
    println!("checked {n_snapshots} snapshots");
    assert_eq!( 10, store.vessel_count());
}
