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

//! Delivery of job records to the remote collection endpoint.
//!
//! Delivery is fire-and-classify: each record gets exactly one POST, and the
//! result is folded into a [`DeliveryOutcome`]. Nothing is retried or queued
//! here; a record that is not [`DeliveryOutcome::Delivered`] is lost from the
//! pipeline's point of view, and the monitor moves on to the next one.

mod client;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::job::JobRecord;

pub use client::{health_url, DeliveryClient};

/// Classified result of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The endpoint answered `201 Created`.
    Delivered,
    /// The endpoint answered with any other status.
    Rejected { status: u16, body: String },
    /// The endpoint could not be reached.
    Unreachable { reason: String },
    /// The request exceeded its timeout.
    TimedOut,
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Delivered => write!(f, "delivered"),
            DeliveryOutcome::Rejected { status, .. } => write!(f, "rejected (HTTP {})", status),
            DeliveryOutcome::Unreachable { .. } => write!(f, "unreachable"),
            DeliveryOutcome::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Errors building a delivery client. Delivery itself never errors; it
/// reports a [`DeliveryOutcome`].
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Sink for job records.
#[async_trait]
pub trait Delivery: Send + Sync {
    /// Sends one record and classifies the result.
    async fn deliver(&self, record: &JobRecord) -> DeliveryOutcome;

    /// Probes the endpoint's health route. Advisory only.
    async fn health_check(&self) -> bool;
}
