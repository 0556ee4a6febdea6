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

use crate::config::{types::*, ValidationError};
use url::Url;

pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Collapses collected errors: none is Ok, one is itself, more is `Multiple`.
fn collect(mut errors: Vec<ValidationError>) -> Result<(), ValidationError> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple { errors }),
    }
}

fn positive(field: &'static str, value: u64) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::NonPositive { field, value });
    }
    Ok(())
}

impl Validate for SpoolwatchConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        let errors = [
            self.server.validate(),
            self.monitor.validate(),
            self.logging.validate(),
        ]
        .into_iter()
        .filter_map(Result::err)
        .flat_map(|e| match e {
            ValidationError::Multiple { errors } => errors,
            other => vec![other],
        })
        .collect();

        collect(errors)
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        match Url::parse(&self.api_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::InvalidApiUrl {
                url: self.api_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError::InvalidApiUrl {
                url: self.api_url.clone(),
                reason: e.to_string(),
            }),
        }

        if self.office_name.trim().is_empty() {
            errors.push(ValidationError::EmptyOfficeName);
        }
        if let Err(e) = positive("timeout_secs", self.timeout_secs) {
            errors.push(e);
        }

        collect(errors)
    }
}

impl Validate for MonitorSettings {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if let Err(e) = positive("poll_interval_secs", self.poll_interval_secs) {
            errors.push(e);
        }
        if let Err(e) = positive("error_backoff_secs", self.error_backoff_secs) {
            errors.push(e);
        }
        for (field, value) in [
            ("status_timeout_secs", self.status_timeout_secs),
            ("list_timeout_secs", self.list_timeout_secs),
            ("detail_timeout_secs", self.detail_timeout_secs),
        ] {
            if let Err(e) = positive(field, value) {
                errors.push(e);
            }
        }
        if let Some(ref pid_file) = self.pid_file {
            if pid_file.as_os_str().is_empty() || pid_file.is_dir() {
                errors.push(ValidationError::InvalidPath {
                    path: format!("pid_file '{}' must name a file", pid_file.display()),
                });
            }
        }

        collect(errors)
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(ValidationError::InvalidLogLevel {
                level: self.log_level.clone(),
            });
        }

        if let Some(ref log_file) = self.log_file {
            if log_file.file_name().is_none() {
                errors.push(ValidationError::InvalidPath {
                    path: format!("log_file '{}' must name a file", log_file.display()),
                });
            }
        }

        collect(errors)
    }
}
