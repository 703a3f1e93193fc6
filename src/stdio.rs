//! Newline-delimited JSON-RPC over standard input and output
//!
//! Each input line carries one message or batch; each response is written as
//! one line. Logs go to stderr so stdout stays a clean protocol stream.

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::mcp::rpc::{json_rpc_error, PARSE_ERROR};
use crate::mcp::server::handle_json_rpc_payload;
use crate::AppState;

pub async fn serve_stdio(state: AppState) -> std::io::Result<()> {
    info!("serving mcp over stdio");
    serve_lines(
        &state,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

/// Runs until `reader` reaches end of input.
pub async fn serve_lines<R, W>(state: &AppState, mut reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }

        let trimmed = line.trim_ascii();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_slice::<Value>(trimmed) {
            Ok(payload) => handle_json_rpc_payload(state, payload).await,
            Err(err) => {
                debug!(error = %err, "discarding unparsable stdio line");
                Some(json_rpc_error(None, PARSE_ERROR, "Parse error"))
            }
        };

        if let Some(response) = response {
            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
        }
    }

    info!("stdin closed, stopping");
    Ok(())
}
