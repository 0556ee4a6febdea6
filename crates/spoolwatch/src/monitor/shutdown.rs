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

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::debug;

/// Cooperative stop signal for the monitor.
///
/// Triggering only flips a flag and wakes a sleeping monitor; it never
/// interrupts work in progress. The monitor checks the flag at tick
/// boundaries. Safe to trigger from a signal handler task.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    triggered: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop.
    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Sleeps for `duration`, returning early if a stop is requested.
    pub async fn sleep(&self, duration: Duration) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a trigger in between is not lost.
        notified.as_mut().enable();

        if self.is_triggered() {
            return;
        }

        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = notified => {
                debug!("Sleep interrupted by shutdown request");
            }
        }
    }
}
