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

//! Tracing subscriber setup.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

use crate::config::LoggingConfig;

/// Level actually used once the `-v` / `-q` flags are taken into account.
pub fn effective_level(configured: &str, verbose: bool, quiet: bool) -> String {
    if quiet {
        "error".to_string()
    } else if verbose {
        "debug".to_string()
    } else {
        configured.to_lowercase()
    }
}

/// `RUST_LOG` wins unless a flag forces the level.
pub fn build_filter(level: &str, forced: bool) -> EnvFilter {
    if forced {
        EnvFilter::new(level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }
}

/// Installs the global subscriber: stderr always, plus a daily rolling file
/// when `config.log_file` is set.
///
/// The returned guard flushes the file writer on drop and must be held until
/// the process exits.
pub fn init_logging(
    config: &LoggingConfig,
    verbose: bool,
    quiet: bool,
) -> Result<Option<WorkerGuard>> {
    let level = effective_level(&config.log_level, verbose, quiet);
    let filter = build_filter(&level, verbose || quiet);

    let (file_layer, guard) = match config.log_file {
        Some(ref path) => {
            let (layer, guard) = file_layer(path, config.max_log_files, config.json)?;
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .with(filter)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn file_layer(path: &Path, max_log_files: usize, json: bool) -> Result<(BoxedLayer, WorkerGuard)> {
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let prefix = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "spoolwatch.log".to_string());

    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory: {}", directory.display()))?;

    let mut builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix);
    if max_log_files > 0 {
        builder = builder.max_log_files(max_log_files);
    }
    let appender = builder
        .build(directory)
        .with_context(|| format!("Failed to open log file in {}", directory.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer().with_writer(writer).with_ansi(false);
    let layer = if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    };

    Ok((layer, guard))
}
