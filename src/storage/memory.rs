// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! In-process backend for local development and tests.
//!
//! Behaves like a single always-reachable node. A write call can be told to
//! fail so abort behaviour can be exercised without a real cluster.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{RelayError, Result};
use crate::protocol::record::{PayloadRecord, WriteAck};
use crate::query::RecordFilter;
use crate::storage::backend::VaultBackend;

const NO_FAILURE: usize = usize::MAX;

pub struct MemoryBackend {
    records: RwLock<Vec<PayloadRecord>>,
    write_calls: AtomicUsize,
    fail_on_call: AtomicUsize,
    reverse_reads: AtomicBool,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            write_calls: AtomicUsize::new(0),
            fail_on_call: AtomicUsize::new(NO_FAILURE),
            reverse_reads: AtomicBool::new(false),
        }
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `call`-th write call (zero-based, counted over the backend's
    /// lifetime) fail with [`RelayError::BackendRejected`].
    pub fn fail_on_write_call(&self, call: usize) {
        self.fail_on_call.store(call, Ordering::SeqCst);
    }

    /// Return reads newest-first instead of in insertion order.
    pub fn reverse_reads(&self, reverse: bool) {
        self.reverse_reads.store(reverse, Ordering::SeqCst);
    }

    /// Store records directly, bypassing write-call accounting.
    pub fn insert_raw(&self, records: impl IntoIterator<Item = PayloadRecord>) {
        self.records.write().extend(records);
    }

    /// Number of write calls attempted so far, including failed ones.
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl VaultBackend for MemoryBackend {
    async fn write_records(&self, batch_index: usize, records: &[PayloadRecord]) -> Result<Vec<WriteAck>> {
        let call = self.write_calls.fetch_add(1, Ordering::SeqCst);
        if call == self.fail_on_call.load(Ordering::SeqCst) {
            return Err(RelayError::BackendRejected(format!(
                "injected failure on write call {call}"
            )));
        }

        self.records.write().extend_from_slice(records);
        Ok(vec![WriteAck {
            node: "memory".into(),
            batch_index,
            created: records.iter().map(|r| r.id.clone()).collect(),
            errors: Vec::new(),
        }])
    }

    async fn read_records(&self, filter: &RecordFilter) -> Result<Vec<PayloadRecord>> {
        let mut found: Vec<PayloadRecord> = self
            .records
            .read()
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        if self.reverse_reads.load(Ordering::SeqCst) {
            found.reverse();
        }
        Ok(found)
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}
