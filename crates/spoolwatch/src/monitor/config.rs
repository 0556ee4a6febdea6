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

use crate::ledger::LEDGER_CEILING;

/// Configuration for the poll loop.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Sleep between successful ticks.
    pub poll_interval: Duration,

    /// Sleep after a tick that failed as a whole (e.g. the spooler listing
    /// itself errored).
    pub error_backoff: Duration,

    /// Ledger size above which it is cleared at the end of a tick.
    pub ledger_ceiling: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            error_backoff: Duration::from_secs(10),
            ledger_ceiling: LEDGER_CEILING,
        }
    }
}
