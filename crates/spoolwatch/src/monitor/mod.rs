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

//! The poll loop.
//!
//! A [`Monitor`] owns the whole pipeline for one spooler: it checks the
//! spooler at startup, then once per interval lists completed jobs, extracts
//! records, filters them through its ledger and hands new ones to the
//! delivery sink.
//!
//! ```text
//! Initializing ──spooler ok──▶ Running ──shutdown──▶ Stopping ──▶ Stopped
//!      │                                                            ▲
//!      └──────────────────spooler unavailable───────────────────────┘
//! ```
//!
//! Failures are absorbed at the smallest granularity that still makes
//! progress: a bad line is skipped, a failed delivery is logged and dropped,
//! a failed tick is followed by a longer backoff sleep. Only the startup
//! spooler check can end the loop.

mod config;
mod shutdown;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::delivery::{Delivery, DeliveryOutcome};
use crate::extractor::Extractor;
use crate::ledger::{Ledger, MemoryLedger};
use crate::spooler::{Spooler, SpoolerError};

pub use config::MonitorConfig;
pub use shutdown::ShutdownHandle;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Print spooler is not available: {reason}")]
    SpoolerUnavailable { reason: String },

    #[error("Spooler query failed: {0}")]
    Spooler(#[from] SpoolerError),
}

/// Lifecycle of a [`Monitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Initializing,
    Running,
    Stopping,
    Stopped,
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MonitorState::Initializing => "initializing",
            MonitorState::Running => "running",
            MonitorState::Stopping => "stopping",
            MonitorState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Counters for one tick, or accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub ticks: u64,
    pub failed_ticks: u64,
    pub lines: u64,
    pub malformed: u64,
    pub duplicates: u64,
    pub delivered: u64,
    pub rejected: u64,
    pub unreachable: u64,
    pub timed_out: u64,
    pub ledger_resets: u64,
}

impl TickStats {
    fn absorb(&mut self, other: &TickStats) {
        self.ticks += other.ticks;
        self.failed_ticks += other.failed_ticks;
        self.lines += other.lines;
        self.malformed += other.malformed;
        self.duplicates += other.duplicates;
        self.delivered += other.delivered;
        self.rejected += other.rejected;
        self.unreachable += other.unreachable;
        self.timed_out += other.timed_out;
        self.ledger_resets += other.ledger_resets;
    }

    fn count_outcome(&mut self, outcome: &DeliveryOutcome) {
        match outcome {
            DeliveryOutcome::Delivered => self.delivered += 1,
            DeliveryOutcome::Rejected { .. } => self.rejected += 1,
            DeliveryOutcome::Unreachable { .. } => self.unreachable += 1,
            DeliveryOutcome::TimedOut => self.timed_out += 1,
        }
    }
}

/// Single-threaded poll loop over one spooler and one delivery sink.
pub struct Monitor {
    spooler: Arc<dyn Spooler>,
    delivery: Arc<dyn Delivery>,
    extractor: Extractor,
    ledger: Box<dyn Ledger>,
    config: MonitorConfig,
    shutdown: ShutdownHandle,
    state: MonitorState,
    totals: TickStats,
}

impl Monitor {
    /// Creates a monitor with an empty in-memory ledger.
    pub fn new(
        spooler: Arc<dyn Spooler>,
        delivery: Arc<dyn Delivery>,
        extractor: Extractor,
        config: MonitorConfig,
    ) -> Self {
        Self {
            spooler,
            delivery,
            extractor,
            ledger: Box::new(MemoryLedger::new()),
            config,
            shutdown: ShutdownHandle::new(),
            state: MonitorState::Initializing,
            totals: TickStats::default(),
        }
    }

    /// Replaces the ledger implementation.
    pub fn with_ledger(mut self, ledger: Box<dyn Ledger>) -> Self {
        self.ledger = ledger;
        self
    }

    /// Handle that stops this monitor at its next tick boundary.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn ledger(&self) -> &dyn Ledger {
        self.ledger.as_ref()
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Counters accumulated over all ticks so far.
    pub fn totals(&self) -> TickStats {
        self.totals
    }

    /// Runs startup checks.
    ///
    /// The spooler check is mandatory: on failure the monitor moves straight
    /// to [`MonitorState::Stopped`]. The endpoint health check and printer
    /// listing are diagnostics only.
    pub async fn initialize(&mut self) -> Result<(), MonitorError> {
        self.state = MonitorState::Initializing;
        info!("Print monitor starting on {}", self.extractor.machine_name());

        match self.spooler.is_scheduler_running().await {
            Ok(true) => info!("CUPS is running and available"),
            Ok(false) => {
                error!("CUPS scheduler is not running");
                self.state = MonitorState::Stopped;
                return Err(MonitorError::SpoolerUnavailable {
                    reason: "scheduler is not running".to_string(),
                });
            }
            Err(e) => {
                error!("Error checking CUPS: {}", e);
                self.state = MonitorState::Stopped;
                return Err(MonitorError::SpoolerUnavailable {
                    reason: e.to_string(),
                });
            }
        }

        if !self.delivery.health_check().await {
            warn!("API not reachable, but continuing to monitor...");
        }

        let printers = self.spooler.list_printers().await;
        if printers.is_empty() {
            warn!("No printers found");
        } else {
            info!("Available printers: {}", printers.join(", "));
        }

        self.state = MonitorState::Running;
        Ok(())
    }

    /// Runs one iteration of the loop body.
    ///
    /// Only a failure of the completed-jobs listing fails the tick; every
    /// per-line failure is logged and counted.
    pub async fn tick(&mut self) -> Result<TickStats, MonitorError> {
        let lines = self.spooler.list_completed_jobs().await?;
        let mut stats = TickStats {
            ticks: 1,
            ..TickStats::default()
        };

        for line in lines.iter().filter(|line| !line.trim().is_empty()) {
            stats.lines += 1;

            let record = match self.extractor.extract(self.spooler.as_ref(), line).await {
                Ok(record) => record,
                Err(e) => {
                    warn!("Error parsing job line '{}': {}", line, e);
                    stats.malformed += 1;
                    continue;
                }
            };

            let key = record.dedup_key();
            if self.ledger.seen(&key) {
                debug!(key = %key, "Skipping already reported job");
                stats.duplicates += 1;
                continue;
            }
            self.ledger.record(key);

            let outcome = self.delivery.deliver(&record).await;
            debug!(job_id = %record.job_id, outcome = %outcome, "Delivery finished");
            stats.count_outcome(&outcome);
        }

        if self.ledger.size_exceeds(self.config.ledger_ceiling) {
            self.ledger.reset_all();
            stats.ledger_resets += 1;
            info!("Cleared job cache");
        }

        Ok(stats)
    }

    /// Initializes and then polls until the shutdown handle is triggered.
    ///
    /// Returns the accumulated counters once stopped, or
    /// [`MonitorError::SpoolerUnavailable`] if startup checks fail.
    pub async fn run(&mut self) -> Result<TickStats, MonitorError> {
        self.initialize().await?;
        info!("Monitoring print jobs... (SIGTERM or SIGINT to stop)");

        while !self.shutdown.is_triggered() {
            let pause = match self.tick().await {
                Ok(stats) => {
                    self.totals.absorb(&stats);
                    self.config.poll_interval
                }
                Err(e) => {
                    error!("Monitor error: {}", e);
                    self.totals.ticks += 1;
                    self.totals.failed_ticks += 1;
                    self.config.error_backoff
                }
            };

            // Stop requested mid-tick: exit before sleeping.
            if self.shutdown.is_triggered() {
                break;
            }
            self.shutdown.sleep(pause).await;
        }

        self.state = MonitorState::Stopping;
        info!(
            ticks = self.totals.ticks,
            delivered = self.totals.delivered,
            "Print monitor stopping"
        );
        self.state = MonitorState::Stopped;
        info!("Print monitor stopped");

        Ok(self.totals)
    }
}
