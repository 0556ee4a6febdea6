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

//! Job records and their deduplication fingerprints.
//!
//! A [`JobRecord`] is the unit of work flowing through the pipeline. It is
//! built once by the extractor, never mutated, and serialized straight onto
//! the wire by the delivery client:
//!
//! ```text
//! {
//!   "jobId": "cups-42-1749637800",
//!   "userName": "alice",
//!   "machineName": "reception-pc",
//!   "printerName": "HP LaserJet",
//!   "documentName": "report.pdf",
//!   "pageCount": 3,
//!   "printTime": "2025-06-11T10:30:00Z",
//!   "status": "completed",
//!   "fileSize": 1024
//! }
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document name used when the spooler detail output does not carry one.
pub const UNKNOWN_DOCUMENT: &str = "Unknown Document";

/// Lifecycle status reported for a job.
///
/// Only completed jobs are polled, so this is currently a single variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Completed,
}

/// A normalized, completed print job ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    /// `cups-<spooler job id>-<unix seconds at discovery>`.
    pub job_id: String,
    pub user_name: String,
    pub machine_name: String,
    pub printer_name: String,
    pub document_name: String,
    pub page_count: u32,
    /// Discovery instant, not the spooler's completion time.
    pub print_time: DateTime<Utc>,
    pub status: JobStatus,
    pub file_size: u64,
    /// Spooler-local job number; only used to build the [`DedupKey`].
    #[serde(skip)]
    pub spooler_job_id: String,
}

impl JobRecord {
    /// Mints the globally distinguishing job id for a spooler job discovered at `at`.
    pub fn mint_job_id(spooler_job_id: &str, at: DateTime<Utc>) -> String {
        format!("cups-{}-{}", spooler_job_id, at.timestamp())
    }

    /// Fingerprint used by the ledger to recognize a job seen before.
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(&self.spooler_job_id, &self.printer_name, &self.document_name)
    }
}

/// Fingerprint of a job: `<spooler job id>-<printer name>-<document name>`.
///
/// The minted job id's timestamp is left out so the same spooler
/// job reported on consecutive ticks maps to the same key. Two distinct jobs
/// sharing all three parts collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DedupKey(String);

impl DedupKey {
    pub fn new(spooler_job_id: &str, printer_name: &str, document_name: &str) -> Self {
        DedupKey(format!(
            "{}-{}-{}",
            spooler_job_id, printer_name, document_name
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
