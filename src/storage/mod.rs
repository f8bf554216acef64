// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Storage subsystem — backend seam, batch writer, and backends.

pub mod backend;
pub mod batch_writer;
pub mod memory;
pub mod vault;

use std::sync::Arc;

use crate::config::{BackendConfig, BackendMode};
use crate::error::Result;
use backend::SharedBackend;

/// Build the backend selected by `config`.
pub fn open_backend(config: &BackendConfig) -> Result<SharedBackend> {
    let backend: SharedBackend = match config.mode {
        BackendMode::Vault => Arc::new(vault::VaultClient::new(config)?),
        BackendMode::Memory => Arc::new(memory::MemoryBackend::new()),
    };
    Ok(backend)
}
