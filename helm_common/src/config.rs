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

//! config file lookup and deserialization.
//! Configs are RON files that are resolved per resource crate in the following order:
//!   1. `$HELM_HOME/configs/❬crate❭/❬file❭`
//!   2. `~/.helm/configs/❬crate❭/❬file❭`
//!   3. `❬workspace❭/❬crate❭/configs/❬file❭` (the defaults that come with the sources)
//!
//! Crates that own configs expand [`define_load_config`] at their top level, which gives them a
//! `load_config(filename)` function bound to their own crate name.

use std::{env, fs, path::{Path,PathBuf}};
use serde::de::DeserializeOwned;
use tracing::debug;
use crate::errors::{HelmCommonError,Result};

pub const CONFIGS: &'static str = "configs";
pub const HELM_HOME: &'static str = "HELM_HOME";

pub fn find_config_file (resource_crate: &str, filename: &str)->Option<PathBuf> {
    if let Ok(helm_home) = env::var(HELM_HOME) {
        let path: PathBuf = [helm_home.as_str(), CONFIGS, resource_crate, filename].iter().collect();
        if path.is_file() { return Some(path) }
    }

    if let Ok(usr_home) = env::var("HOME") {
        let path: PathBuf = [usr_home.as_str(), ".helm", CONFIGS, resource_crate, filename].iter().collect();
        if path.is_file() { return Some(path) }
    }

    if let Some(mut path) = get_workspace_dir() {
        path.push(resource_crate);
        path.push(CONFIGS);
        path.push(filename);
        if path.is_file() { return Some(path) }
    }

    None
}

/// the top dir of the cargo workspace we are running in (if any). Starting from the current dir
/// we go up as long as the parent still contains a Cargo.toml
pub fn get_workspace_dir()->Option<PathBuf> {
    let mut path = env::current_dir().ok()?;
    if !path.join("Cargo.toml").is_file() { return None }

    while let Some(parent) = path.parent() {
        if parent.join("Cargo.toml").is_file() {
            path = parent.to_path_buf();
        } else {
            break
        }
    }
    Some(path)
}

/// deserialize a RON config from an explicit path
pub fn load_config_from_path<C,P> (path: P)->Result<C> where C: DeserializeOwned, P: AsRef<Path> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    debug!("loading config {:?}", path);
    Ok( ron::de::from_str( contents.as_str())? )
}

/// deserialize a RON config for the given resource crate, using the lookup order defined above
pub fn load_crate_config<C> (resource_crate: &str, filename: &str)->Result<C> where C: DeserializeOwned {
    match find_config_file( resource_crate, filename) {
        Some(path) => load_config_from_path( path),
        None => Err( HelmCommonError::ConfigNotFoundError( format!("{resource_crate}/{filename}")))
    }
}

/// expand at the top of crates that define configs. Config users call the defined
/// `load_config(..)` function to instantiate config structs
#[macro_export]
macro_rules! define_load_config {
    () => {
        /// load a config that belongs to this crate (see `helm_common::config` for lookup order)
        pub fn load_config<C> (filename: &str)->helm_common::Result<C> where C: serde::de::DeserializeOwned {
            helm_common::config::load_crate_config( env!("CARGO_PKG_NAME"), filename)
        }
    }
}
