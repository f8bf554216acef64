// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Batch writer — submits one upload's records to the backend in bounded,
//! strictly sequential batches.
//!
//! ```text
//! records ─→ [batch 0] ─→ backend ─ ok ─→ [batch 1] ─→ backend ─ ok ─→ …
//!                                   │
//!                                 error
//!                                   ▼
//!                    abort: earlier batches stay, later ones never sent
//! ```
//!
//! At most one batch of one upload is in flight at any time. Distinct uploads
//! run their own writers concurrently.

use tracing::{debug, error, info};

use crate::error::{RelayError, Result};
use crate::protocol::record::{PayloadRecord, WriteAck};
use crate::storage::backend::SharedBackend;

pub struct BatchWriter {
    backend: SharedBackend,
    max_batch_size: usize,
}

impl BatchWriter {
    pub fn new(backend: SharedBackend, max_batch_size: usize) -> Self {
        Self { backend, max_batch_size: max_batch_size.max(1) }
    }

    /// Number of write calls needed for `records` records.
    pub fn batch_count(&self, records: usize) -> usize {
        records.div_ceil(self.max_batch_size)
    }

    /// Write all `records`, batch after batch, collecting every ack.
    ///
    /// On the first failing batch the whole call fails with
    /// [`RelayError::BatchWrite`]. Nothing already written is rolled back.
    pub async fn write_all(&self, records: &[PayloadRecord]) -> Result<Vec<WriteAck>> {
        let batches = self.batch_count(records.len());
        let mut acks = Vec::new();
        let mut persisted = 0;

        for (batch_index, batch) in records.chunks(self.max_batch_size).enumerate() {
            match self.backend.write_records(batch_index, batch).await {
                Ok(batch_acks) => {
                    persisted += batch.len();
                    debug!(
                        batch = batch_index,
                        batches,
                        records = batch.len(),
                        acks = batch_acks.len(),
                        "Batch written"
                    );
                    acks.extend(batch_acks);
                }
                Err(e) => {
                    error!(
                        batch = batch_index,
                        batches,
                        persisted,
                        error = %e,
                        "Batch write failed, aborting upload"
                    );
                    return Err(RelayError::BatchWrite {
                        batch_index,
                        batches,
                        persisted,
                        source: Box::new(e),
                    });
                }
            }
        }

        info!(records = records.len(), batches, "All batches written");
        Ok(acks)
    }
}
