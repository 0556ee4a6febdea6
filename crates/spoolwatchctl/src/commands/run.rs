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

use anyhow::{Context, Result};
use spoolwatch::{DeliveryClient, Extractor, Monitor, ShutdownHandle, Spooler};
use std::sync::Arc;
use tracing::{info, warn};

use super::{machine_name, LoadedConfig};
use crate::config::{SpoolwatchConfig, Validate};
use crate::pid::{acquire_pid_file, cleanup_pid_file};

/// Command-line values that take precedence over the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOverrides {
    pub api_url: Option<String>,
    pub interval: Option<u64>,
    pub log_level: Option<String>,
}

impl RunOverrides {
    /// Applies the overrides and re-validates the result.
    pub fn apply(&self, config: &mut SpoolwatchConfig) -> Result<()> {
        if let Some(ref api_url) = self.api_url {
            config.server.api_url = api_url.clone();
        }
        if let Some(interval) = self.interval {
            config.monitor.poll_interval_secs = interval;
        }
        if let Some(ref level) = self.log_level {
            config.logging.log_level = level.clone();
        }

        config
            .validate()
            .context("Configuration validation failed")?;
        Ok(())
    }
}

/// Runs the monitor until SIGINT or SIGTERM.
///
/// Fails if the spooler is unavailable at startup.
pub async fn run(loaded: LoadedConfig) -> Result<()> {
    let LoadedConfig { config, source } = loaded;

    match source {
        Some(ref path) => info!("Loaded configuration from {}", path.display()),
        None => warn!("No configuration file found, using built-in defaults"),
    }
    info!(
        office = %config.server.office_name,
        api_url = %config.server.api_url,
        interval_secs = config.monitor.poll_interval_secs,
        "Starting print job monitor"
    );

    if let Some(ref pid_file) = config.monitor.pid_file {
        acquire_pid_file(pid_file)?;
    }

    let result = run_monitor(&config).await;

    if let Some(ref pid_file) = config.monitor.pid_file {
        if let Err(e) = cleanup_pid_file(pid_file) {
            warn!("{:#}", e);
        }
    }

    result
}

async fn run_monitor(config: &SpoolwatchConfig) -> Result<()> {
    let spooler: Arc<dyn Spooler> = Arc::new(config.cups_spooler());
    let delivery = DeliveryClient::new(&config.server.api_url, config.delivery_timeout())
        .context("Failed to create API client")?;

    let mut monitor = Monitor::new(
        spooler,
        Arc::new(delivery),
        Extractor::new(machine_name()),
        config.monitor_config(),
    );

    let signals = tokio::spawn(wait_for_shutdown_signal(monitor.shutdown_handle()));
    let result = monitor.run().await;
    signals.abort();

    let totals = result.context("Print monitor could not start")?;
    info!(
        ticks = totals.ticks,
        failed_ticks = totals.failed_ticks,
        delivered = totals.delivered,
        rejected = totals.rejected,
        unreachable = totals.unreachable,
        timed_out = totals.timed_out,
        "Print monitor finished"
    );
    Ok(())
}

/// Triggers `shutdown` on the first SIGINT or SIGTERM.
async fn wait_for_shutdown_signal(shutdown: ShutdownHandle) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => info!("Received SIGINT"),
                    _ = terminate.recv() => info!("Received SIGTERM"),
                }
            }
            Err(e) => {
                warn!("Cannot listen for SIGTERM: {}", e);
                let _ = tokio::signal::ctrl_c().await;
                info!("Received SIGINT");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received shutdown signal");
    }

    info!("Stopping print monitor...");
    shutdown.trigger();
}
