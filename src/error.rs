// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

use std::fmt;

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Batch {batch_index} of {batches} failed ({persisted} records already persisted): {source}")]
    BatchWrite {
        batch_index: usize,
        batches: usize,
        persisted: usize,
        #[source]
        source: Box<RelayError>,
    },

    #[error("Content group '{content_key}' is incomplete: {defect}")]
    ReassemblyIncomplete {
        content_key: String,
        defect: GroupDefect,
    },

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Backend rejected request: {0}")]
    BackendRejected(String),
}

/// Why a fetched content group cannot be reassembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupDefect {
    /// Fewer distinct indices than the declared total.
    Missing { expected: u32, found: u32 },
    /// The same `chunk_index` appears more than once.
    Duplicate { chunk_index: u32 },
    /// Fragments disagree on `total_chunks`.
    InconsistentTotal { first: u32, other: u32 },
    /// A `chunk_index` lies outside `0..total_chunks`.
    OutOfRange { chunk_index: u32, total_chunks: u32 },
    /// Fragments sharing a `content_key` name different owners.
    OwnerMismatch { first: String, other: String },
}

impl fmt::Display for GroupDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupDefect::Missing { expected, found } => {
                write!(f, "{found} of {expected} fragments present")
            }
            GroupDefect::Duplicate { chunk_index } => {
                write!(f, "duplicate fragment at index {chunk_index}")
            }
            GroupDefect::InconsistentTotal { first, other } => {
                write!(f, "fragments declare different totals ({first} vs {other})")
            }
            GroupDefect::OutOfRange { chunk_index, total_chunks } => {
                write!(f, "fragment index {chunk_index} outside declared total {total_chunks}")
            }
            GroupDefect::OwnerMismatch { first, other } => {
                write!(f, "fragments belong to different owners ('{first}' vs '{other}')")
            }
        }
    }
}

impl RelayError {
    /// Stable machine-readable code used in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_error",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Serialization(_) => "serialization_error",
            Self::BatchWrite { .. } => "batch_write_failed",
            Self::ReassemblyIncomplete { .. } => "reassembly_incomplete",
            Self::BackendUnavailable(_) => "backend_unavailable",
            Self::BackendRejected(_) => "backend_rejected",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidRequest(_) | Self::Serialization(_) => StatusCode::BAD_REQUEST,
            Self::BatchWrite { .. } | Self::BackendRejected(_) => StatusCode::BAD_GATEWAY,
            Self::ReassemblyIncomplete { .. } => StatusCode::CONFLICT,
            Self::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Zero-based index of the failing batch, for write aborts.
    pub fn batch_index(&self) -> Option<usize> {
        match self {
            Self::BatchWrite { batch_index, .. } => Some(*batch_index),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
