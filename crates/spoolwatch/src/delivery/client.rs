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

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, error, info, warn};
use url::Url;

use super::{Delivery, DeliveryError, DeliveryOutcome};
use crate::job::JobRecord;

/// HTTP delivery client for the print-job collection endpoint.
#[derive(Debug, Clone)]
pub struct DeliveryClient {
    client: Client,
    endpoint: Url,
    health_endpoint: Url,
}

impl DeliveryClient {
    /// Timeout for the health check, independent of the delivery timeout.
    const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

    /// Default delivery timeout when none is configured.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Builds a client posting to `endpoint`, each request bounded by `timeout`.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, DeliveryError> {
        let endpoint = Url::parse(endpoint).map_err(|e| DeliveryError::InvalidUrl {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(DeliveryError::InvalidUrl {
                url: endpoint.to_string(),
                reason: "endpoint must be an http(s) URL".to_string(),
            });
        }

        let client = Client::builder().timeout(timeout).build()?;
        let health_endpoint = health_url(&endpoint);

        Ok(Self {
            client,
            endpoint,
            health_endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn health_endpoint(&self) -> &Url {
        &self.health_endpoint
    }

    fn classify_transport_error(err: reqwest::Error) -> DeliveryOutcome {
        if err.is_timeout() {
            DeliveryOutcome::TimedOut
        } else {
            DeliveryOutcome::Unreachable {
                reason: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl Delivery for DeliveryClient {
    async fn deliver(&self, record: &JobRecord) -> DeliveryOutcome {
        let response = match self
            .client
            .post(self.endpoint.clone())
            .json(record)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let outcome = Self::classify_transport_error(e);
                match &outcome {
                    DeliveryOutcome::TimedOut => {
                        error!(job_id = %record.job_id, "API request timeout")
                    }
                    DeliveryOutcome::Unreachable { reason } => error!(
                        job_id = %record.job_id,
                        endpoint = %self.endpoint,
                        "Cannot connect to API server: {}",
                        reason
                    ),
                    _ => {}
                }
                return outcome;
            }
        };

        let status = response.status();
        if status == StatusCode::CREATED {
            info!(
                job_id = %record.job_id,
                "Sent: {} by {} on {}",
                record.document_name,
                record.user_name,
                record.printer_name
            );
            return DeliveryOutcome::Delivered;
        }

        let body = response.text().await.unwrap_or_default();
        error!(
            job_id = %record.job_id,
            status = status.as_u16(),
            "API Error {}: {}",
            status.as_u16(),
            body
        );
        DeliveryOutcome::Rejected {
            status: status.as_u16(),
            body,
        }
    }

    async fn health_check(&self) -> bool {
        debug!("Probing {}", self.health_endpoint);
        match self
            .client
            .get(self.health_endpoint.clone())
            .timeout(Self::HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => {
                info!("API connection successful");
                true
            }
            Ok(response) => {
                warn!("API returned status {}", response.status().as_u16());
                false
            }
            Err(e) => {
                warn!("API test failed: {}", e);
                false
            }
        }
    }
}

/// Derives the health check URL from the job submission URL.
///
/// `/print-jobs` in the path becomes `/health`; otherwise the last path
/// segment is replaced with `health`. Query and fragment are dropped.
pub fn health_url(endpoint: &Url) -> Url {
    let mut url = endpoint.clone();
    let path = endpoint.path();

    let health_path = if path.contains("/print-jobs") {
        path.replace("/print-jobs", "/health")
    } else {
        match path.trim_end_matches('/').rsplit_once('/') {
            Some((prefix, _)) => format!("{}/health", prefix),
            None => "/health".to_string(),
        }
    };

    url.set_path(&health_path);
    url.set_query(None);
    url.set_fragment(None);
    url
}
