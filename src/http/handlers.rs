//! Axum HTTP handlers for the web server
//!
//! Provides the Model Context Protocol endpoint and the health and discovery
//! metadata endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::mcp::rpc::{json_rpc_error, PARSE_ERROR};
use crate::mcp::server::{handle_json_rpc_payload, SUPPORTED_PROTOCOL_VERSION};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub mcp_endpoint: &'static str,
    pub protocol_version: &'static str,
    pub capabilities: [&'static str; 3],
    pub transports: [&'static str; 2],
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn discovery() -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        mcp_endpoint: "/mcp",
        protocol_version: SUPPORTED_PROTOCOL_VERSION,
        capabilities: ["tools", "resources", "prompts"],
        transports: ["http", "stdio"],
    })
}

pub async fn mcp_endpoint(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(err) => {
            debug!(error = %err, bytes = body.len(), "rejecting unparseable body");
            return (
                StatusCode::OK,
                Json(json_rpc_error(None, PARSE_ERROR, "Parse error")),
            )
                .into_response()
        }
    };

    match handle_json_rpc_payload(&state, payload).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
