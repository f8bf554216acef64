// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! The single write/read seam the relay core calls.
//!
//! How a backend spreads records across its nodes is its own business; the
//! core only needs one success/failure signal per write and a flat list of
//! records per read.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::protocol::record::{PayloadRecord, WriteAck};
use crate::query::RecordFilter;

#[async_trait]
pub trait VaultBackend: Send + Sync {
    /// Persist one batch. Either every record is accepted or an error is
    /// returned; the acks describe what each node created.
    async fn write_records(&self, batch_index: usize, records: &[PayloadRecord]) -> Result<Vec<WriteAck>>;

    /// Fetch every record matching `filter`, in backend order.
    async fn read_records(&self, filter: &RecordFilter) -> Result<Vec<PayloadRecord>>;

    /// Short human-readable description for logs and health output.
    fn describe(&self) -> String;
}

pub type SharedBackend = Arc<dyn VaultBackend>;
