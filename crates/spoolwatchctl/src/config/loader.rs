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

use crate::config::{generate_default_config_toml, ConfigError, SpoolwatchConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "SPOOLWATCH_CONFIG";

// Matches ${VAR}, ${VAR:-default}, ${VAR:?error}
static ENV_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env reference regex"));

pub struct ConfigLoader {
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default search paths
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        // 1. Current directory
        search_paths.push(PathBuf::from("./spoolwatch.toml"));

        // 2. User config directory
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("spoolwatch").join("config.toml"));
        }

        // 3. System config directory
        search_paths.push(PathBuf::from("/etc/spoolwatch/config.toml"));

        Self { search_paths }
    }

    /// Create a config loader with custom search paths
    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// Load configuration from the specified file or auto-discover
    pub fn load_config(
        &self,
        config_file: Option<&Path>,
    ) -> Result<SpoolwatchConfig, ConfigError> {
        let config_path = self.resolve_path(config_file)?;
        self.load_config_from_file(&config_path)
    }

    /// Like [`ConfigLoader::load_config`], but falls back to built-in
    /// defaults when discovery finds nothing.
    ///
    /// An explicitly named file (argument or `SPOOLWATCH_CONFIG`) must exist.
    /// Returns the path actually loaded, if any.
    pub fn load_or_default(
        &self,
        config_file: Option<&Path>,
    ) -> Result<(SpoolwatchConfig, Option<PathBuf>), ConfigError> {
        match self.resolve_path(config_file) {
            Ok(path) => {
                let config = self.load_config_from_file(&path)?;
                Ok((config, Some(path)))
            }
            Err(ConfigError::ConfigNotFound) => Ok((SpoolwatchConfig::default(), None)),
            Err(e) => Err(e),
        }
    }

    /// Load configuration from a specific file
    pub fn load_config_from_file(&self, path: &Path) -> Result<SpoolwatchConfig, ConfigError> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let substituted_content = self.substitute_env_vars(&content)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") | None => Ok(toml::from_str(&substituted_content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat {
                extension: ext.to_string(),
            }),
        }
    }

    /// Find the first existing configuration file in search paths
    pub fn find_config_file(&self) -> Option<PathBuf> {
        self.search_paths
            .iter()
            .find(|path| path.is_file())
            .cloned()
    }

    /// Get all search paths for debugging
    pub fn get_search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    fn resolve_path(&self, config_file: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(path) = config_file {
            Ok(path.to_path_buf())
        } else if let Ok(env_config) = env::var(CONFIG_ENV_VAR) {
            Ok(PathBuf::from(env_config))
        } else {
            self.find_config_file().ok_or(ConfigError::ConfigNotFound)
        }
    }

    /// Substitute environment variables in configuration content
    pub fn substitute_env_vars(&self, content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();

        for cap in ENV_REFERENCE.captures_iter(content) {
            let full_match = &cap[0];
            let var_expr = &cap[1];

            let replacement = self.process_var_expression(var_expr)?;
            result = result.replace(full_match, &replacement);
        }

        Ok(result)
    }

    /// Process a variable expression like "VAR", "VAR:-default", or "VAR:?error"
    fn process_var_expression(&self, expr: &str) -> Result<String, ConfigError> {
        if let Some((var_name, default_value)) = expr.split_once(":-") {
            Ok(env::var(var_name).unwrap_or_else(|_| default_value.to_string()))
        } else if let Some((var_name, error_msg)) = expr.split_once(":?") {
            env::var(var_name).map_err(|_| {
                ConfigError::EnvSubstitutionError(format!(
                    "Required environment variable '{}' is not set: {}",
                    var_name, error_msg
                ))
            })
        } else {
            env::var(expr).map_err(|_| {
                ConfigError::EnvSubstitutionError(format!(
                    "Required environment variable '{}' is not set",
                    expr
                ))
            })
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Where `init-config` writes when no path is given.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("spoolwatch").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("./spoolwatch.toml"))
}

/// Writes a default configuration file, creating parent directories.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }

    let content = generate_default_config_toml()?;
    let write_error = |source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, content).map_err(write_error)
}
