// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Relay pipeline: wires serializer, chunker, tagger, batch writer, query
//! router and reassembler around one backend.
//!
//! Write path: payload → text → fragments → records → batches → backend.
//! Read path:  filter → backend → records → groups → text → payload.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::codec;
use crate::config::ChunkingConfig;
use crate::error::{RelayError, Result};
use crate::protocol::chunker;
use crate::protocol::reassembly::{self, Reassembled};
use crate::protocol::record::{self, WriteAck};
use crate::query::RecordFilter;
use crate::storage::backend::SharedBackend;
use crate::storage::batch_writer::BatchWriter;

/// Result of a fully written upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReceipt {
    /// Records written.
    pub chunks: usize,
    pub total_chunks: u32,
    pub results: Vec<WriteAck>,
}

#[derive(Clone)]
pub struct Relay {
    backend: SharedBackend,
    chunking: ChunkingConfig,
}

impl Relay {
    /// Fails with [`RelayError::Config`] if either chunking limit is zero.
    pub fn new(backend: SharedBackend, chunking: ChunkingConfig) -> Result<Self> {
        chunking.validate()?;
        Ok(Self { backend, chunking })
    }

    pub fn chunking(&self) -> ChunkingConfig {
        self.chunking
    }

    pub fn backend_description(&self) -> String {
        self.backend.describe()
    }

    /// Split `payload` into records and write them all.
    ///
    /// `content_key` must be fresh per logical upload: two uploads sharing a
    /// key interleave their fragments and the group becomes unreadable.
    #[instrument(skip(self, payload))]
    pub async fn upload(&self, owner_key: &str, content_key: &str, payload: &Value) -> Result<UploadReceipt> {
        if owner_key.is_empty() {
            return Err(RelayError::InvalidRequest("owner_key is required".into()));
        }
        if content_key.is_empty() {
            return Err(RelayError::InvalidRequest("content_key is required".into()));
        }

        let text = codec::serialize(payload)?;
        let fragments = chunker::chunk(&text, self.chunking.max_fragment_size);
        let records = record::tag_fragments(owner_key, content_key, &fragments);
        let total_chunks = fragments.len() as u32;

        info!(
            chars = text.chars().count(),
            total_chunks,
            max_fragment_size = self.chunking.max_fragment_size,
            "Uploading payload"
        );

        let writer = BatchWriter::new(self.backend.clone(), self.chunking.max_batch_size);
        let results = writer.write_all(&records).await?;

        Ok(UploadReceipt { chunks: records.len(), total_chunks, results })
    }

    /// Fetch and reassemble every content group matching `filter`.
    #[instrument(skip(self))]
    pub async fn fetch(&self, filter: &RecordFilter) -> Result<Reassembled> {
        let records = self.backend.read_records(filter).await?;
        let fetched = records.len();
        let result = reassembly::reassemble(records)?;
        info!(fragments = fetched, groups = result.groups(), "Query reassembled");
        Ok(result)
    }
}
