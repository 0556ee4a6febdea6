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

use crate::config::types::*;
use std::path::PathBuf;

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000/api/print-jobs".to_string(),
            office_name: "Unknown Office".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
            error_backoff_secs: 10,
            status_timeout_secs: 5,
            list_timeout_secs: 10,
            detail_timeout_secs: 5,
            pid_file: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: None, // Console only
            log_level: "info".to_string(),
            max_log_files: 5,
            json: false,
        }
    }
}

/// Generate a complete default configuration as TOML string.
///
/// Unlike [`SpoolwatchConfig::default`], the generated file enables a log
/// file and lets `SPOOLWATCH_API_URL` override the endpoint.
pub fn generate_default_config_toml() -> Result<String, toml::ser::Error> {
    let mut config = SpoolwatchConfig::default();
    config.server.api_url =
        "${SPOOLWATCH_API_URL:-http://localhost:3000/api/print-jobs}".to_string();
    config.logging.log_file = Some(PathBuf::from("/var/log/spoolwatch/spoolwatch.log"));
    toml::to_string_pretty(&config)
}
