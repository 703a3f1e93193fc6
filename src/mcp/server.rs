//! The central Model Context Protocol engine
//!
//! Decodes JSON-RPC messages, validates request shapes, negotiates the
//! protocol version and routes methods to the resource, tool and prompt
//! registries. Both transports feed payloads through [`handle_json_rpc_payload`].

use rust_mcp_sdk::schema::{
    CallToolRequest, GetPromptRequest, Implementation, InitializeRequest, InitializeResult,
    JsonrpcMessage, JsonrpcRequest, ListPromptsRequest, ListResourceTemplatesRequest,
    ListResourcesRequest, ListResourcesResult, ListToolsRequest, ListToolsResult, PingRequest,
    ProtocolVersion, ReadResourceRequest, ServerCapabilities, ServerCapabilitiesPrompts,
    ServerCapabilitiesResources, ServerCapabilitiesTools,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::domain::{
    prompts::{build_prompts_list, handle_prompts_get},
    resources::{build_resource_templates_list, build_resources_list, handle_resources_read},
    tools::{build_tools_list, handle_tools_call},
};
use crate::mcp::rpc::{
    app_error_to_json_rpc, is_json_rpc_error, json_rpc_error, json_rpc_result,
    request_id_to_value, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
};
use crate::{errors::AppError, AppState};

pub const SUPPORTED_PROTOCOL_VERSION: &str = "2024-11-05";

const SERVER_INSTRUCTIONS: &str = "Read DraCor corpora, plays, characters, networks and texts \
through resources; use tools for searches, comparisons and analyses; prompts provide analysis \
templates.";

/// Handles a decoded payload that may be a single message or a batch.
/// Returns `None` when nothing needs to be sent back.
pub async fn handle_json_rpc_payload(state: &AppState, payload: Value) -> Option<Value> {
    let Some(batch) = payload.as_array() else {
        return handle_json_rpc_value(state, payload).await;
    };

    if batch.is_empty() {
        return Some(Value::Array(vec![json_rpc_error(
            None,
            INVALID_REQUEST,
            "Invalid Request",
        )]));
    }

    let mut responses = Vec::new();
    for item in batch {
        if let Some(response) = handle_json_rpc_value(state, item.clone()).await {
            responses.push(response);
        }
    }

    if responses.is_empty() {
        None
    } else {
        Some(Value::Array(responses))
    }
}

pub async fn handle_json_rpc_value(state: &AppState, payload: Value) -> Option<Value> {
    if !payload.is_object() {
        return Some(json_rpc_error(None, INVALID_REQUEST, "Invalid Request"));
    }

    let request_id = payload.get("id").cloned();
    let parsed: JsonrpcMessage = match serde_json::from_value(payload) {
        Ok(message) => message,
        Err(_) => return Some(json_rpc_error(request_id, INVALID_REQUEST, "Invalid Request")),
    };

    match parsed {
        JsonrpcMessage::Request(request) => {
            if let Err(error_response) = validate_request_shape(&request) {
                return Some(error_response);
            }

            let request_id = request_id_to_value(request.id);
            if request.method.trim().is_empty() {
                return Some(json_rpc_error(
                    Some(request_id),
                    INVALID_REQUEST,
                    "Invalid Request",
                ));
            }

            Some(
                handle_json_rpc_request(
                    state,
                    Some(request_id),
                    request.method,
                    request.params.map(Value::Object),
                )
                .await,
            )
        }
        JsonrpcMessage::Notification(notification) => {
            debug!(method = %notification.method, "notification ignored");
            None
        }
        JsonrpcMessage::ResultResponse(_) | JsonrpcMessage::ErrorResponse(_) => {
            Some(json_rpc_error(request_id, INVALID_REQUEST, "Invalid Request"))
        }
    }
}

pub fn validate_request_shape(request: &JsonrpcRequest) -> Result<(), Value> {
    let payload = serde_json::to_value(request).expect("jsonrpc request serialization");
    let request_id = Some(request_id_to_value(request.id.clone()));

    let valid = match request.method.as_str() {
        "tools/call" => serde_json::from_value::<CallToolRequest>(payload).is_ok(),
        "tools/list" => serde_json::from_value::<ListToolsRequest>(payload).is_ok(),
        "resources/read" => serde_json::from_value::<ReadResourceRequest>(payload).is_ok(),
        "resources/list" => serde_json::from_value::<ListResourcesRequest>(payload).is_ok(),
        "resources/templates/list" => {
            serde_json::from_value::<ListResourceTemplatesRequest>(payload).is_ok()
        }
        "prompts/list" => serde_json::from_value::<ListPromptsRequest>(payload).is_ok(),
        "prompts/get" => serde_json::from_value::<GetPromptRequest>(payload).is_ok(),
        "ping" => serde_json::from_value::<PingRequest>(payload).is_ok(),
        "initialize" => serde_json::from_value::<InitializeRequest>(payload).is_ok(),
        _ => true,
    };

    if valid {
        Ok(())
    } else {
        Err(json_rpc_error(request_id, INVALID_PARAMS, "Invalid params"))
    }
}

pub async fn handle_json_rpc_request(
    state: &AppState,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
) -> Value {
    let operation = operation_name(&method, params.as_ref());

    let response = match method.as_str() {
        "initialize" => match initialize_result(params.as_ref()) {
            Ok(result) => json_rpc_result(id, result),
            Err(err) => app_error_to_json_rpc(id, err),
        },
        "ping" => json_rpc_result(id, json!({})),
        "tools/list" => json_rpc_result(
            id,
            serde_json::to_value(ListToolsResult {
                meta: None,
                next_cursor: None,
                tools: build_tools_list(),
            })
            .expect("tools list result serialization"),
        ),
        "tools/call" => handle_tools_call(state, id, params).await,
        "resources/list" => json_rpc_result(
            id,
            serde_json::to_value(ListResourcesResult {
                meta: None,
                next_cursor: None,
                resources: build_resources_list(),
            })
            .expect("resources list result serialization"),
        ),
        "resources/templates/list" => json_rpc_result(
            id,
            serde_json::to_value(build_resource_templates_list())
                .expect("resource templates result serialization"),
        ),
        "resources/read" => handle_resources_read(state, id, params).await,
        "prompts/list" => json_rpc_result(
            id,
            serde_json::to_value(build_prompts_list()).expect("prompts list result serialization"),
        ),
        "prompts/get" => handle_prompts_get(id, params),
        _ => json_rpc_error(id, METHOD_NOT_FOUND, "Method not found"),
    };

    info!(
        method = %method,
        operation = %operation,
        outcome = if is_json_rpc_error(&response) { "failure" } else { "success" },
        "mcp action audited"
    );

    response
}

fn initialize_result(params: Option<&Value>) -> Result<Value, AppError> {
    let protocol_version = negotiate_protocol_version(params)?;

    let initialize_result = InitializeResult {
        server_info: Implementation {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: Some("DraCor MCP".to_string()),
            description: None,
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools {
                list_changed: Some(false),
            }),
            resources: Some(ServerCapabilitiesResources {
                subscribe: Some(false),
                list_changed: Some(false),
            }),
            prompts: Some(ServerCapabilitiesPrompts {
                list_changed: Some(false),
            }),
            ..Default::default()
        },
        protocol_version: protocol_version.into(),
        instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        meta: None,
    };

    Ok(serde_json::to_value(initialize_result)?)
}

/// The client must state a version; the answer is always the one this
/// server implements and the client decides whether to continue.
pub fn negotiate_protocol_version(params: Option<&Value>) -> Result<ProtocolVersion, AppError> {
    let offered_version = params
        .and_then(Value::as_object)
        .and_then(|object| object.get("protocolVersion"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|version| !version.is_empty())
        .ok_or_else(|| {
            AppError::bad_request(
                "invalid_protocol_version",
                "initialize params.protocolVersion is required",
            )
        })?;

    if offered_version != SUPPORTED_PROTOCOL_VERSION {
        debug!(
            offered = offered_version,
            answered = SUPPORTED_PROTOCOL_VERSION,
            "client offered a different protocol version"
        );
    }

    Ok(ProtocolVersion::V2024_11_05)
}

/// Tool name, resource uri or prompt name the request targets.
pub fn operation_name(method: &str, params: Option<&Value>) -> String {
    let field = match method {
        "tools/call" | "prompts/get" => "name",
        "resources/read" => "uri",
        _ => return "-".to_string(),
    };

    params
        .and_then(|params| params.get(field))
        .and_then(Value::as_str)
        .unwrap_or("-")
        .to_string()
}
