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

//! Print spooler abstraction.
//!
//! The monitor never talks to the spooler directly; it goes through the
//! [`Spooler`] trait so the pipeline can be exercised with scripted output
//! in tests. [`CupsSpooler`] is the production implementation.

mod cups;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use cups::{parse_printer_list, CupsSpooler, LpstatTimeouts};

#[derive(Debug, Error)]
pub enum SpoolerError {
    #[error("Spooler tool '{command}' is not installed")]
    NotInstalled { command: String },

    #[error("Spooler command '{command}' timed out after {after:?}")]
    Timeout { command: String, after: Duration },

    #[error("Failed to run spooler command '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Process-boundary contract the pipeline depends on.
///
/// Every call is bounded by its own timeout inside the implementation.
#[async_trait]
pub trait Spooler: Send + Sync {
    /// Raw lines of the completed-jobs listing, one job per line.
    ///
    /// No jobs is `Ok(vec![])`, not an error.
    async fn list_completed_jobs(&self) -> Result<Vec<String>, SpoolerError>;

    /// Free-text detail block for one job.
    ///
    /// Never fails: a job that no longer exists, a timeout or a missing tool
    /// all yield an empty string.
    async fn job_detail(&self, spooler_job_id: &str) -> String;

    /// Whether the spooler's scheduler is up.
    async fn is_scheduler_running(&self) -> Result<bool, SpoolerError>;

    /// Configured printer names, for status output only. Empty on failure.
    async fn list_printers(&self) -> Vec<String>;
}
