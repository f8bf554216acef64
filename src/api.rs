// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! HTTP API consumed by the mobile client.
//!
//! Endpoints:
//!   POST /api/v1/data/create                              → chunk + write a payload
//!   GET  /api/v1/data/query?owner_key=..&content_key=..   → fetch + reassemble
//!   GET  /api/v1/health                                   → backend and limits
//!
//! Every response is `{"success": bool, ...}`; failures carry
//! `"errors": [{"code", "message", "batch_index"?}]`.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::RelayError;
use crate::protocol::reassembly::Reassembled;
use crate::query::RecordFilter;
use crate::relay::Relay;

/// Shared state passed to all handlers.
pub struct AppState {
    pub relay: Relay,
    /// Request body ceiling applied to every route.
    pub max_body_bytes: usize,
}

// ──────────────── request / response types ────────────────────────────────

/// Upload body. The `wallet_address` / `video_cid` / `recording_data` names
/// used by older clients are accepted too.
#[derive(Deserialize)]
pub struct CreateRequest {
    #[serde(alias = "wallet_address")]
    owner_key: String,
    #[serde(alias = "video_cid")]
    content_key: String,
    #[serde(alias = "recording_data")]
    payload: Value,
}

#[derive(Deserialize)]
pub struct QueryParams {
    #[serde(default, alias = "wallet_address")]
    owner_key: Option<String>,
    #[serde(default, alias = "video_cid")]
    content_key: Option<String>,
}

#[derive(Serialize)]
struct ErrorEntry {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    batch_index: Option<usize>,
}

#[derive(Serialize)]
struct GroupEntry {
    owner_key: String,
    content_key: String,
    payload: Value,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let entry = ErrorEntry {
            code: self.code(),
            message: self.to_string(),
            batch_index: self.batch_index(),
        };
        let body = json!({ "success": false, "errors": [entry] });
        (status, Json(body)).into_response()
    }
}

fn ok(data: impl Serialize) -> Response {
    (StatusCode::OK, Json(json!({ "success": true, "data": data }))).into_response()
}

// ──────────────── router ──────────────────────────────────────────────────

/// Build the axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_body_bytes);
    let api = Router::new()
        .route("/data/create", post(handle_create))
        .route("/data/query", get(handle_query))
        .route("/health", get(handle_health));

    Router::new()
        .nest("/api/v1", api)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the API on `port` until CTRL+C.
pub async fn start_server(state: Arc<AppState>, port: u16) -> std::io::Result<()> {
    let app = build_router(state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(port, "HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received CTRL+C, shutting down…");
            }
        })
        .await
}

// ──────────────── handlers ────────────────────────────────────────────────

async fn handle_create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(b) => b,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected upload body");
            return RelayError::InvalidRequest(rejection.body_text()).into_response();
        }
    };

    match state.relay.upload(&req.owner_key, &req.content_key, &req.payload).await {
        Ok(receipt) => {
            info!(
                owner_key = req.owner_key,
                content_key = req.content_key,
                chunks = receipt.chunks,
                "Upload stored"
            );
            ok(receipt)
        }
        Err(e) => {
            warn!(content_key = req.content_key, error = %e, "Upload failed");
            e.into_response()
        }
    }
}

async fn handle_query(
    State(state): State<Arc<AppState>>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(p) => p,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected query string");
            return RelayError::InvalidRequest(rejection.body_text()).into_response();
        }
    };
    let filter = RecordFilter::from_params(params.owner_key, params.content_key);
    if filter.is_unscoped() {
        info!("Unscoped query, listing every record");
    }

    match state.relay.fetch(&filter).await {
        Ok(Reassembled::Empty) => ok(Vec::<Value>::new()),
        Ok(Reassembled::Single(group)) => ok(group.payload),
        Ok(Reassembled::Many(groups)) => ok(groups
            .into_iter()
            .map(|g| GroupEntry {
                owner_key: g.owner_key,
                content_key: g.content_key,
                payload: g.payload,
            })
            .collect::<Vec<_>>()),
        Err(e) => {
            warn!(filter = ?filter, error = %e, "Query failed");
            e.into_response()
        }
    }
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Response {
    let chunking = state.relay.chunking();
    ok(json!({
        "backend": state.relay.backend_description(),
        "max_fragment_size": chunking.max_fragment_size,
        "max_batch_size": chunking.max_batch_size,
    }))
}
