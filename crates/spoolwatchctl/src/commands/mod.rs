/*
 *  Copyright 2025-2026 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

pub mod check;
pub mod init_config;
pub mod printers;
pub mod run;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use sysinfo::System;

use crate::config::{ConfigLoader, SpoolwatchConfig};

/// A configuration together with the file it came from, if any.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: SpoolwatchConfig,
    pub source: Option<PathBuf>,
}

/// Loads the configuration, falling back to defaults if no file is found.
pub fn load_config(config_file: Option<&Path>) -> Result<LoadedConfig> {
    let (config, source) = ConfigLoader::new()
        .load_or_default(config_file)
        .context("Failed to load configuration")?;
    Ok(LoadedConfig { config, source })
}

/// Host name reported as `machineName`.
pub fn machine_name() -> String {
    System::host_name()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
