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

//! Deduplication ledger.
//!
//! The ledger remembers which [`DedupKey`]s have already been emitted. It is
//! owned by a single monitor and only ever grows, until the monitor decides
//! it has crossed its ceiling and clears it wholesale. There is no per-entry
//! expiry.
//!
//! After a reset, jobs still present in the spooler history are emitted again
//! on the next tick. That duplication is the price of bounded memory.

use std::collections::HashSet;

use crate::job::DedupKey;

/// Default number of entries above which the monitor resets the ledger.
pub const LEDGER_CEILING: usize = 1000;

/// Set of fingerprints already emitted.
///
/// Implementations other than [`MemoryLedger`] (persistent, TTL based) can be
/// swapped into the monitor without touching the loop.
pub trait Ledger: Send {
    /// Returns true if `key` was recorded since the last reset.
    fn seen(&self, key: &DedupKey) -> bool;

    /// Records `key` as emitted.
    fn record(&mut self, key: DedupKey);

    /// Number of recorded keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if strictly more than `limit` keys are recorded.
    fn size_exceeds(&self, limit: usize) -> bool {
        self.len() > limit
    }

    /// Forgets every recorded key.
    fn reset_all(&mut self);
}

/// In-memory ledger backed by a `HashSet`.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    keys: HashSet<DedupKey>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Ledger for MemoryLedger {
    fn seen(&self, key: &DedupKey) -> bool {
        self.keys.contains(key)
    }

    fn record(&mut self, key: DedupKey) {
        self.keys.insert(key);
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn reset_all(&mut self) {
        self.keys.clear();
    }
}
