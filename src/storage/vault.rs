// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! HTTP client for the multi-node vault.
//!
//! Node protocol:
//!
//! ```text
//! POST {node}/api/v1/data/create   {"schema": id, "data": [records]}
//!   → {"data": {"created": [ids], "errors": [...]}}
//! POST {node}/api/v1/data/read     {"schema": id, "filter": {...}}
//!   → {"data": [records]}
//! ```
//!
//! Writes go to every node in configured order and succeed only if every
//! node accepts the whole batch. Reads are served by the first node that
//! answers.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::{BackendConfig, NodeConfig};
use crate::error::{RelayError, Result};
use crate::protocol::record::{PayloadRecord, WriteAck};
use crate::query::RecordFilter;
use crate::storage::backend::VaultBackend;

#[derive(Deserialize)]
struct CreateResponse {
    data: CreateResult,
}

#[derive(Deserialize)]
struct CreateResult {
    #[serde(default)]
    created: Vec<String>,
    #[serde(default)]
    errors: Vec<Value>,
}

#[derive(Deserialize)]
struct ReadResponse {
    data: Vec<PayloadRecord>,
}

pub struct VaultClient {
    http: reqwest::Client,
    nodes: Vec<NodeConfig>,
    schema_id: String,
}

impl VaultClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RelayError::Config(format!("Cannot build HTTP client: {e}")))?;
        Ok(Self {
            http,
            nodes: config.nodes.clone(),
            schema_id: config.schema_id.clone(),
        })
    }

    fn endpoint(node: &NodeConfig, action: &str) -> String {
        format!("{}/api/v1/data/{action}", node.url.trim_end_matches('/'))
    }

    async fn post<T: DeserializeOwned>(&self, node: &NodeConfig, action: &str, body: &Value) -> Result<T> {
        let url = Self::endpoint(node, action);
        let mut req = self.http.post(&url).json(body);
        if !node.token.is_empty() {
            req = req.bearer_auth(&node.token);
        }

        let response = req
            .send()
            .await
            .map_err(|e| RelayError::BackendUnavailable(format!("{url}: {e}")))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RelayError::BackendUnavailable(format!("{url}: {e}")))?;
        if !status.is_success() {
            return Err(RelayError::BackendRejected(format!("{url} returned {status}: {text}")));
        }
        serde_json::from_str(&text)
            .map_err(|e| RelayError::BackendRejected(format!("{url} sent a malformed response: {e}")))
    }
}

#[async_trait]
impl VaultBackend for VaultClient {
    async fn write_records(&self, batch_index: usize, records: &[PayloadRecord]) -> Result<Vec<WriteAck>> {
        let body = json!({ "schema": self.schema_id, "data": records });
        let mut acks = Vec::with_capacity(self.nodes.len());

        for node in &self.nodes {
            let resp: CreateResponse = self.post(node, "create", &body).await?;
            let errors: Vec<String> = resp.data.errors.iter().map(Value::to_string).collect();
            if !errors.is_empty() {
                return Err(RelayError::BackendRejected(format!(
                    "node {} rejected {} of {} records: {}",
                    node.url,
                    errors.len(),
                    records.len(),
                    errors.join("; ")
                )));
            }
            debug!(node = node.url, batch = batch_index, created = resp.data.created.len(), "Node accepted batch");
            acks.push(WriteAck {
                node: node.url.clone(),
                batch_index,
                created: resp.data.created,
                errors,
            });
        }
        Ok(acks)
    }

    async fn read_records(&self, filter: &RecordFilter) -> Result<Vec<PayloadRecord>> {
        let body = json!({ "schema": self.schema_id, "filter": filter.to_backend_filter() });
        let mut last_err = RelayError::BackendUnavailable("no vault nodes configured".into());

        for node in &self.nodes {
            match self.post::<ReadResponse>(node, "read", &body).await {
                Ok(resp) => return Ok(resp.data),
                Err(e @ RelayError::BackendUnavailable(_)) => {
                    warn!(node = node.url, error = %e, "Node unreachable, trying next");
                    last_err = e;
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err)
    }

    fn describe(&self) -> String {
        format!("vault ({} nodes, schema {})", self.nodes.len(), self.schema_id)
    }
}
