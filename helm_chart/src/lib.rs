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

//! chart display of vessel positions: the mapping of positions to screen markers, the incremental
//! render diff and the frame loop that feeds it from a position store.

pub mod config;
pub mod projection;
pub mod sprites;
pub mod backend;
pub mod diff;
pub mod view;
pub mod frame_loop;

pub mod errors;
pub use errors::{HelmChartError,Result};

helm_common::define_load_config!{}
