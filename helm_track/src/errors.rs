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

use thiserror::Error;
use helm_common::datetime::EpochMillis;

pub type Result<T> = std::result::Result<T,HelmTrackError>;

#[derive(Error,Debug)]
pub enum HelmTrackError {

    #[error("malformed report {0}")]
    MalformedReport(String),

    #[error("stale report for {vessel_id}: {timestamp} is not newer than {latest}")]
    StaleReport { vessel_id: String, timestamp: EpochMillis, latest: EpochMillis },

    #[error("CSV error {0}")]
    CsvError( #[from] csv::Error),

    #[error("operation failed {0}")]
    OpFailedError(String)
}

macro_rules! malformed {
    ($fmt:literal $(, $arg:expr )* ) => {
        HelmTrackError::MalformedReport( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use malformed;

pub fn op_failed (msg: impl ToString)->HelmTrackError {
    HelmTrackError::OpFailedError( msg.to_string())
}
