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

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use spoolwatch::{CupsSpooler, LpstatTimeouts, MonitorConfig};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpoolwatchConfig {
    pub server: ServerConfig,
    pub monitor: MonitorSettings,
    pub logging: LoggingConfig,
}

/// Where completed jobs are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_url: String,
    pub office_name: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub poll_interval_secs: u64,
    pub error_backoff_secs: u64,
    /// Bound on `lpstat -r` and `lpstat -p`.
    pub status_timeout_secs: u64,
    /// Bound on the completed-jobs listing.
    pub list_timeout_secs: u64,
    /// Bound on each `lpstat -l -j` detail query.
    pub detail_timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    pub log_level: String,
    pub max_log_files: usize,
    pub json: bool,
}

impl SpoolwatchConfig {
    /// Poll loop settings derived from the `[monitor]` table.
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            poll_interval: Duration::from_secs(self.monitor.poll_interval_secs),
            error_backoff: Duration::from_secs(self.monitor.error_backoff_secs),
            ..MonitorConfig::default()
        }
    }

    pub fn lpstat_timeouts(&self) -> LpstatTimeouts {
        LpstatTimeouts {
            status: Duration::from_secs(self.monitor.status_timeout_secs),
            list: Duration::from_secs(self.monitor.list_timeout_secs),
            detail: Duration::from_secs(self.monitor.detail_timeout_secs),
        }
    }

    /// The CUPS spooler with the configured command timeouts.
    pub fn cups_spooler(&self) -> CupsSpooler {
        CupsSpooler::new().with_timeouts(self.lpstat_timeouts())
    }

    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs)
    }
}
