use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod config;
pub mod domain;
pub mod dracor_client;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod stdio;

#[cfg(test)]
mod test_support;

use dracor_client::CorpusApi;

#[derive(Clone)]
pub struct AppState {
    pub corpus_api: Arc<dyn CorpusApi>,
}

impl AppState {
    pub fn new(corpus_api: Arc<dyn CorpusApi>) -> Self {
        Self { corpus_api }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/.well-known/mcp", get(http::handlers::discovery))
        .route("/mcp", post(http::handlers::mcp_endpoint))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
