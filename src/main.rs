use std::sync::Arc;

use dracor_mcp::{
    build_app,
    config::{Config, Transport},
    dracor_client::DracorClient,
    logging, stdio, AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    logging::init_logging();

    let client = DracorClient::new(
        &config.api_base_url,
        config.request_timeout(),
        config.max_retries,
    )?;
    let state = AppState::new(Arc::new(client));

    info!(
        api_base_url = %config.api_base_url,
        timeout_secs = config.request_timeout_secs,
        max_retries = config.max_retries,
        "dracor client configured"
    );

    match config.transport {
        Transport::Stdio => stdio::serve_stdio(state).await?,
        Transport::Http => {
            let bind_socket = config.bind_socket()?;
            let listener = tokio::net::TcpListener::bind(bind_socket).await?;

            info!(
                bind_addr = %config.bind_addr,
                bind_port = config.bind_port,
                "server starting"
            );

            axum::serve(listener, build_app(state).into_make_service()).await?;
        }
    }

    Ok(())
}
