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

use chrono::{DateTime, TimeZone, Utc};
use serde::{Serialize,Deserialize,Serializer,Deserializer};
use std::{fmt, ops::{Add,Sub}, time::Duration};
use parse_duration::parse;

/// wall clock time as milliseconds since the unix epoch. This is the time unit used for all
/// position timestamps
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Hash,Default)]
#[serde(transparent)]
pub struct EpochMillis(i64);

impl EpochMillis {
    pub fn now ()->Self { EpochMillis( Utc::now().timestamp_millis()) }

    pub const fn new(millis:i64)->Self { EpochMillis(millis) }

    pub fn from_secs(secs: i64)->Self { EpochMillis(secs*1000) }

    pub fn millis(&self)->i64 { self.0 }

    /// the point in time `dur` before self. Saturates at i64::MIN instead of wrapping
    pub fn before (&self, dur: Duration)->Self {
        EpochMillis( self.0.saturating_sub( duration_millis(dur)))
    }

    /// the point in time `dur` after self
    pub fn after (&self, dur: Duration)->Self {
        EpochMillis( self.0.saturating_add( duration_millis(dur)))
    }

    /// the (non-negative) duration between an earlier time and self
    pub fn duration_since (&self, earlier: EpochMillis)->Duration {
        if self.0 > earlier.0 { Duration::from_millis( (self.0 - earlier.0) as u64) } else { Duration::ZERO }
    }
}

impl fmt::Display for EpochMillis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::<Utc>::from_timestamp_millis(self.0) {
            Some(date) => write!(f, "{}", date.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            None => write!(f, "{}ms", self.0)
        }
    }
}

impl<Tz> From<DateTime<Tz>> for EpochMillis where Tz: TimeZone {
    fn from (date: DateTime<Tz>)->Self { EpochMillis(date.timestamp_millis()) }
}

impl From<i64> for EpochMillis {
    fn from (millis: i64)->Self { EpochMillis(millis) }
}

impl Add<Duration> for EpochMillis {
    type Output = EpochMillis;
    fn add (self, dur: Duration)->EpochMillis { self.after(dur) }
}

impl Sub<Duration> for EpochMillis {
    type Output = EpochMillis;
    fn sub (self, dur: Duration)->EpochMillis { self.before(dur) }
}

#[inline]
fn duration_millis (dur: Duration)->i64 {
    i64::try_from( dur.as_millis()).unwrap_or(i64::MAX)
}

// as of Rust 1.87 the min,hour,day Duration ctors are experimental - we provide our own wrappers
#[inline] pub fn millis (n: u64)->Duration { Duration::from_millis(n) }
#[inline] pub fn secs (n: u64)->Duration { Duration::from_secs(n) }
#[inline] pub fn minutes (n: u64)->Duration { Duration::from_secs(n * 60) }
#[inline] pub fn hours (n: u64)->Duration { Duration::from_secs(n * 3600) }

/// parse human readable durations such as "30s" or "1h 30min" (e.g. from command line arguments)
pub fn parse_duration (s: &str)->crate::Result<Duration> {
    parse( s).map_err( |e| crate::errors::op_failed( format!("invalid duration \"{s}\": {e:?}")))
}

//--- support for serde

/// deserialize human readable durations such as "12h", "5s" or "250ms"
pub fn deserialize_duration <'a,D>(deserializer: D) -> Result<Duration,D::Error>
    where D: Deserializer<'a>
{
    String::deserialize(deserializer).and_then( |string| {
        parse(string.as_str())
            .map_err( |e| serde::de::Error::custom(format!("{:?}",e)))
    })
}

pub fn serialize_duration<S: Serializer> (dur: &Duration, s: S) -> Result<S::Ok, S::Error>  {
    let dfm = format!("{}ms", dur.as_millis());
    s.serialize_str(&dfm)
}
