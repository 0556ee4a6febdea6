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

//! # Spoolwatch
//!
//! Spoolwatch observes a local print spooler's completed-job history and
//! forwards each newly completed job, once, to a remote collection endpoint.
//!
//! The pipeline is made of four pieces:
//!
//! - [`extractor`]: turns one line of spooler output (plus the per-job detail
//!   block) into a [`JobRecord`].
//! - [`ledger`]: the bounded in-memory set of fingerprints already emitted.
//! - [`delivery`]: posts a record to the collection endpoint and classifies
//!   the result into a [`DeliveryOutcome`].
//! - [`monitor`]: the poll loop that ties the above together, one tick per
//!   interval, with graceful shutdown and error backoff.
//!
//! The spooler itself sits behind the [`Spooler`] trait; [`CupsSpooler`]
//! drives the CUPS `lpstat` tool.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use spoolwatch::{CupsSpooler, DeliveryClient, Extractor, Monitor, MonitorConfig};
//!
//! let spooler = Arc::new(CupsSpooler::new());
//! let delivery = Arc::new(DeliveryClient::new(
//!     "http://localhost:3000/api/print-jobs",
//!     std::time::Duration::from_secs(10),
//! )?);
//! let mut monitor = Monitor::new(
//!     spooler,
//!     delivery,
//!     Extractor::new("reception-pc"),
//!     MonitorConfig::default(),
//! );
//!
//! let shutdown = monitor.shutdown_handle();
//! tokio::spawn(async move {
//!     tokio::signal::ctrl_c().await.ok();
//!     shutdown.trigger();
//! });
//!
//! monitor.run().await?;
//! ```

pub mod delivery;
pub mod extractor;
pub mod job;
pub mod ledger;
pub mod monitor;
pub mod spooler;

pub use delivery::{Delivery, DeliveryClient, DeliveryError, DeliveryOutcome};
pub use extractor::{
    parse_job_detail, parse_job_line, ExtractError, Extractor, JobDetail, JobLine,
};
pub use job::{DedupKey, JobRecord, JobStatus, UNKNOWN_DOCUMENT};
pub use ledger::{Ledger, MemoryLedger, LEDGER_CEILING};
pub use monitor::{Monitor, MonitorConfig, MonitorError, MonitorState, ShutdownHandle, TickStats};
pub use spooler::{CupsSpooler, LpstatTimeouts, Spooler, SpoolerError};
