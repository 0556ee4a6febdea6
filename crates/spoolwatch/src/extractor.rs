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

//! Job record extraction from spooler text output.
//!
//! Extraction happens in two passes, both pure functions over text:
//!
//! 1. [`parse_job_line`] reads one line of the completed-jobs listing, e.g.
//!    `HP_LaserJet-42 alice 1024 Mon 11 Jun 2025 10:30:00 AM`, into a
//!    [`JobLine`] (printer, spooler job id, user).
//! 2. [`parse_job_detail`] scrapes the per-job detail block for the document
//!    name, page count and byte size. This is a best-effort scrape: any field
//!    it cannot find keeps its default.
//!
//! [`Extractor`] glues both together with the spooler's detail query and
//! assembles the final [`JobRecord`].

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::job::{JobRecord, JobStatus, UNKNOWN_DOCUMENT};
use crate::spooler::Spooler;

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid digit regex"));

/// Minimum number of whitespace separated fields in a completed-job line.
const MIN_FIELDS: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("spooler line is empty")]
    EmptyLine,

    #[error("expected at least 3 fields in spooler line, found {found}: {line:?}")]
    TooFewFields { found: usize, line: String },
}

/// Identity fields read from a single completed-jobs line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobLine {
    pub printer_name: String,
    pub spooler_job_id: String,
    pub user_name: String,
}

/// Fields scraped from the per-job detail block. `None` means "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobDetail {
    pub document_name: Option<String>,
    pub page_count: Option<u32>,
    pub file_size: Option<u64>,
}

/// Parses one completed-jobs line.
///
/// The first token is `<printer>-<job id>`; the split happens at the last
/// `-`, and underscores in the printer part become spaces. A token with no
/// `-` is taken whole as the printer name and the job id falls back to the
/// Unix time of `now`, so the line still yields a record.
pub fn parse_job_line(line: &str, now: DateTime<Utc>) -> Result<JobLine, ExtractError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() {
        return Err(ExtractError::EmptyLine);
    }
    if fields.len() < MIN_FIELDS {
        return Err(ExtractError::TooFewFields {
            found: fields.len(),
            line: line.trim().to_string(),
        });
    }

    let printer_job = fields[0];
    let user_name = fields[1].to_string();

    let (printer_name, spooler_job_id) = match printer_job.rsplit_once('-') {
        Some((printer, job_id)) => (normalize_printer_name(printer), job_id.to_string()),
        None => (
            normalize_printer_name(printer_job),
            now.timestamp().to_string(),
        ),
    };

    Ok(JobLine {
        printer_name,
        spooler_job_id,
        user_name,
    })
}

/// Replaces the spooler's internal `_` separators with spaces.
pub fn normalize_printer_name(raw: &str) -> String {
    raw.replace('_', " ")
}

/// Scrapes a job detail block line by line.
///
/// Per line, the first matching rule applies:
/// - `document-name` / `document name`: text right of the last `=`
/// - `pages` / `page-count`: first run of ASCII digits
/// - `size`: first run of ASCII digits
///
/// Matching is case-insensitive. Once a field is set it is never overwritten;
/// a digit run too large for the field saturates instead of being dropped.
pub fn parse_job_detail(text: &str) -> JobDetail {
    let mut detail = JobDetail::default();

    for line in text.lines() {
        let lowered = line.trim().to_lowercase();

        if lowered.contains("document-name") || lowered.contains("document name") {
            if detail.document_name.is_some() {
                continue;
            }
            if let Some((_, value)) = line.rsplit_once('=') {
                let value = value.trim();
                if !value.is_empty() {
                    detail.document_name = Some(value.to_string());
                }
            }
        } else if lowered.contains("pages") || lowered.contains("page-count") {
            if detail.page_count.is_none() {
                detail.page_count =
                    first_number(line).map(|n| u32::try_from(n).unwrap_or(u32::MAX));
            }
        } else if lowered.contains("size") && detail.file_size.is_none() {
            detail.file_size = first_number(line);
        }
    }

    detail
}

/// The only parse failure left for a non-empty ASCII digit run is overflow.
fn first_number(line: &str) -> Option<u64> {
    DIGITS
        .find(line)
        .map(|m| m.as_str().parse().unwrap_or(u64::MAX))
}

/// Builds [`JobRecord`]s for the machine this agent runs on.
#[derive(Debug, Clone)]
pub struct Extractor {
    machine_name: String,
}

impl Extractor {
    pub fn new(machine_name: impl Into<String>) -> Self {
        Self {
            machine_name: machine_name.into(),
        }
    }

    pub fn machine_name(&self) -> &str {
        &self.machine_name
    }

    /// Extracts a record from `line`, querying the spooler for job detail.
    pub async fn extract(
        &self,
        spooler: &dyn Spooler,
        line: &str,
    ) -> Result<JobRecord, ExtractError> {
        self.extract_at(spooler, line, Utc::now()).await
    }

    /// Same as [`Extractor::extract`] with an explicit discovery instant.
    pub async fn extract_at(
        &self,
        spooler: &dyn Spooler,
        line: &str,
        now: DateTime<Utc>,
    ) -> Result<JobRecord, ExtractError> {
        let parsed = parse_job_line(line, now)?;

        // job_detail never fails; an empty block just leaves the defaults.
        let detail_text = spooler.job_detail(&parsed.spooler_job_id).await;
        let detail = parse_job_detail(&detail_text);
        debug!(
            spooler_job_id = %parsed.spooler_job_id,
            detail = ?detail,
            "Scraped job detail"
        );

        Ok(self.assemble(parsed, detail, now))
    }

    /// Assembles the final record, applying field defaults.
    pub fn assemble(&self, parsed: JobLine, detail: JobDetail, now: DateTime<Utc>) -> JobRecord {
        JobRecord {
            job_id: JobRecord::mint_job_id(&parsed.spooler_job_id, now),
            user_name: parsed.user_name,
            machine_name: self.machine_name.clone(),
            printer_name: parsed.printer_name,
            document_name: detail
                .document_name
                .unwrap_or_else(|| UNKNOWN_DOCUMENT.to_string()),
            // The collector requires at least one page.
            page_count: detail.page_count.unwrap_or(1).max(1),
            print_time: now,
            status: JobStatus::Completed,
            file_size: detail.file_size.unwrap_or(0),
            spooler_job_id: parsed.spooler_job_id,
        }
    }
}
