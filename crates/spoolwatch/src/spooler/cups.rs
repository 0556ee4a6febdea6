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

//! CUPS spooler driven through the `lpstat` command line tool.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{Spooler, SpoolerError};

const SCHEDULER_RUNNING_MARKER: &str = "scheduler is running";

/// Upper bounds for each kind of `lpstat` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LpstatTimeouts {
    /// `lpstat -r` and `lpstat -p`.
    pub status: Duration,
    /// `lpstat -W completed -o`.
    pub list: Duration,
    /// `lpstat -l -j <id>`.
    pub detail: Duration,
}

impl Default for LpstatTimeouts {
    fn default() -> Self {
        Self {
            status: Duration::from_secs(5),
            list: Duration::from_secs(10),
            detail: Duration::from_secs(5),
        }
    }
}

/// [`Spooler`] backed by CUPS' `lpstat`.
#[derive(Debug, Clone)]
pub struct CupsSpooler {
    lpstat: PathBuf,
    timeouts: LpstatTimeouts,
}

impl CupsSpooler {
    /// Uses `lpstat` from `PATH` with the default timeouts (5s status, 10s listing, 5s detail).
    pub fn new() -> Self {
        Self::with_program("lpstat")
    }

    /// Uses a specific `lpstat` binary.
    pub fn with_program(lpstat: impl Into<PathBuf>) -> Self {
        Self {
            lpstat: lpstat.into(),
            timeouts: LpstatTimeouts::default(),
        }
    }

    /// Overrides the per-command timeouts.
    pub fn with_timeouts(mut self, timeouts: LpstatTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn timeouts(&self) -> LpstatTimeouts {
        self.timeouts
    }

    async fn lpstat(&self, args: &[&str], timeout: Duration) -> Result<Output, SpoolerError> {
        let command = format!("{} {}", self.lpstat.display(), args.join(" "));
        debug!("Running {}", command);

        let child = Command::new(&self.lpstat)
            .args(args)
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(timeout, child).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                Err(SpoolerError::NotInstalled { command })
            }
            Ok(Err(source)) => Err(SpoolerError::Io { command, source }),
            Err(_) => Err(SpoolerError::Timeout {
                command,
                after: timeout,
            }),
        }
    }
}

impl Default for CupsSpooler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Spooler for CupsSpooler {
    async fn list_completed_jobs(&self) -> Result<Vec<String>, SpoolerError> {
        let output = self
            .lpstat(&["-W", "completed", "-o"], self.timeouts.list)
            .await?;

        if !output.status.success() {
            debug!(
                status = ?output.status.code(),
                "lpstat completed-jobs listing exited unsuccessfully, treating as no jobs"
            );
            return Ok(Vec::new());
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn job_detail(&self, spooler_job_id: &str) -> String {
        match self
            .lpstat(&["-l", "-j", spooler_job_id], self.timeouts.detail)
            .await
        {
            Ok(output) => String::from_utf8_lossy(&output.stdout).into_owned(),
            Err(e) => {
                warn!("Could not get job details for {}: {}", spooler_job_id, e);
                String::new()
            }
        }
    }

    async fn is_scheduler_running(&self) -> Result<bool, SpoolerError> {
        let output = self.lpstat(&["-r"], self.timeouts.status).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(output.status.success() && stdout.contains(SCHEDULER_RUNNING_MARKER))
    }

    async fn list_printers(&self) -> Vec<String> {
        match self.lpstat(&["-p"], self.timeouts.status).await {
            Ok(output) => parse_printer_list(&String::from_utf8_lossy(&output.stdout)),
            Err(e) => {
                warn!("Error getting printer list: {}", e);
                Vec::new()
            }
        }
    }
}

/// Extracts printer names from `lpstat -p` output.
///
/// Lines look like `printer HP_LaserJet is idle.  enabled since ...`.
pub fn parse_printer_list(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| line.starts_with("printer"))
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(|name| name.replace('_', " "))
        .collect()
}
