// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

use serde::Deserialize;

use crate::error::{RelayError, Result};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// HTTP listener configuration (optional).
    #[serde(default)]
    pub server: ServerConfig,
    /// Fragment and batch limits (optional).
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Storage backend endpoints and credentials.
    pub backend: BackendConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body. Whole recordings arrive in one
    /// request, so this sits far above a single record's size.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port(), max_body_bytes: default_max_body_bytes() }
    }
}

fn default_port() -> u16 { 3000 }
fn default_max_body_bytes() -> usize { 64 * 1024 * 1024 }

/// Limits applied on the write path.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Maximum characters per payload fragment.
    /// Kept well below the vault's per-record ceiling to leave room for
    /// encryption and encoding overhead.
    #[serde(default = "default_fragment_size")]
    pub max_fragment_size: usize,
    /// Maximum records submitted in one backend write call.
    #[serde(default = "default_batch_size")]
    pub max_batch_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_fragment_size: default_fragment_size(),
            max_batch_size: default_batch_size(),
        }
    }
}

fn default_fragment_size() -> usize { 3500 }
fn default_batch_size() -> usize { 50 }

impl ChunkingConfig {
    /// Both limits must be non-zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_fragment_size == 0 {
            return Err(RelayError::Config("max_fragment_size must be > 0".into()));
        }
        if self.max_batch_size == 0 {
            return Err(RelayError::Config("max_batch_size must be > 0".into()));
        }
        Ok(())
    }
}

/// Which backend implementation the relay talks to.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Remote multi-node vault over HTTP.
    #[default]
    Vault,
    /// In-process store; nothing survives a restart.
    Memory,
}

/// Storage backend configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    #[serde(default)]
    pub mode: BackendMode,
    /// Collection schema all records are written under.
    #[serde(default)]
    pub schema_id: String,
    /// Per-request timeout for node calls.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Cluster members, contacted in the listed order.
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

/// One vault node.
#[derive(Debug, Deserialize, Clone)]
pub struct NodeConfig {
    /// Base URL, e.g. `https://node-a.example.com`.
    pub url: String,
    /// Bearer token presented to this node.
    #[serde(default)]
    pub token: String,
}

fn default_timeout() -> u64 { 30 }

impl Config {
    /// Load configuration from a TOML file at `path`.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RelayError::Config(format!("Cannot read config file: {e}")))?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| RelayError::Config(format!("Invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        if self.server.max_body_bytes == 0 {
            return Err(RelayError::Config("max_body_bytes must be > 0".into()));
        }
        if self.backend.mode == BackendMode::Vault {
            if self.backend.nodes.is_empty() {
                return Err(RelayError::Config("No vault nodes defined".into()));
            }
            if self.backend.schema_id.is_empty() {
                return Err(RelayError::Config("schema_id is required in vault mode".into()));
            }
            if self.backend.request_timeout_secs == 0 {
                return Err(RelayError::Config("request_timeout_secs must be > 0".into()));
            }
        }
        Ok(())
    }
}
