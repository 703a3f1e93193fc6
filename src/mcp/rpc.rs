//! JSON-RPC protocol representations and formatting utilities
//!
//! Maps operation failures onto JSON-RPC error payloads with a stable
//! `{code, message, details}` data object.

use rust_mcp_sdk::schema::{
    JsonrpcErrorResponse, JsonrpcResultResponse, RequestId, Result as McpResult, RpcError,
};
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::dracor_client::ApiError;
use crate::errors::AppError;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
pub const UPSTREAM_ERROR: i32 = -32000;
pub const RESOURCE_NOT_FOUND: i32 = -32002;

pub fn is_json_rpc_error(value: &Value) -> bool {
    value.get("error").is_some()
}

fn error_data(code: &str, message: impl Into<String>, details: Value) -> Option<Value> {
    Some(json!({
        "code": code,
        "message": message.into(),
        "details": details,
    }))
}

pub fn app_error_to_json_rpc(id: Option<Value>, err: AppError) -> Value {
    match err {
        AppError::BadRequest { code, message } => json_rpc_error_with_data(
            id,
            INVALID_PARAMS,
            "Invalid params",
            error_data(code, message, json!({})),
        ),
        AppError::Upstream(api_error) => api_error_to_json_rpc(id, api_error),
        AppError::Internal { code, message } => {
            error!(code, error = %message, "internal error");
            json_rpc_error(id, INTERNAL_ERROR, "Internal error")
        }
    }
}

fn api_error_to_json_rpc(id: Option<Value>, err: ApiError) -> Value {
    let summary = err.to_string();
    warn!(
        kind = err.kind(),
        status = ?err.status_code(),
        error = %summary,
        "upstream call failed"
    );

    match err {
        ApiError::NotFound { path, .. } => json_rpc_error_with_data(
            id,
            RESOURCE_NOT_FOUND,
            "Resource not found",
            error_data("not_found", summary, json!({ "path": path, "status": 404 })),
        ),
        ApiError::Http { status, path, .. } => json_rpc_error_with_data(
            id,
            UPSTREAM_ERROR,
            "Upstream error",
            error_data(
                "upstream_http_error",
                summary,
                json!({ "path": path, "status": status }),
            ),
        ),
        ApiError::Transport { path, .. } => json_rpc_error_with_data(
            id,
            UPSTREAM_ERROR,
            "Upstream unavailable",
            error_data("upstream_unavailable", summary, json!({ "path": path })),
        ),
        ApiError::Parse { path, format, .. } => json_rpc_error_with_data(
            id,
            UPSTREAM_ERROR,
            "Upstream error",
            error_data(
                "upstream_parse_error",
                summary,
                json!({ "path": path, "format": format }),
            ),
        ),
        ApiError::InvalidEndpoint { .. } => json_rpc_error_with_data(
            id,
            INVALID_PARAMS,
            "Invalid params",
            error_data("invalid_argument", summary, json!({})),
        ),
    }
}

/// `-32601` with a data object naming what could not be found.
pub fn not_found_with_data(id: Option<Value>, code: &str, message: &str, details: Value) -> Value {
    json_rpc_error_with_data(
        id,
        METHOD_NOT_FOUND,
        "Method not found",
        error_data(code, message, details),
    )
}

pub fn json_rpc_error(id: Option<Value>, code: i32, message: &str) -> Value {
    json_rpc_error_with_data(id, code, message, None)
}

pub fn json_rpc_error_with_data(
    id: Option<Value>,
    code: i32,
    message: &str,
    data: Option<Value>,
) -> Value {
    let response = JsonrpcErrorResponse::new(
        RpcError {
            code: i64::from(code),
            data,
            message: message.to_string(),
        },
        id.as_ref().and_then(value_to_request_id),
    );
    serde_json::to_value(response).expect("jsonrpc error response serialization")
}

pub fn json_rpc_result(id: Option<Value>, result: Value) -> Value {
    if let Some(request_id) = id.as_ref().and_then(value_to_request_id) {
        let extra = result.as_object().cloned();
        let response = JsonrpcResultResponse::new(request_id, McpResult { meta: None, extra });
        return serde_json::to_value(response).expect("jsonrpc result response serialization");
    }

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

pub fn value_to_request_id(value: &Value) -> Option<RequestId> {
    if let Some(string_id) = value.as_str() {
        return Some(RequestId::String(string_id.to_string()));
    }

    value.as_i64().map(RequestId::Integer)
}

pub fn request_id_to_value(id: RequestId) -> Value {
    match id {
        RequestId::String(value) => Value::String(value),
        RequestId::Integer(value) => Value::Number(value.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_resource_not_found() {
        let response = app_error_to_json_rpc(
            Some(json!(7)),
            AppError::Upstream(ApiError::NotFound {
                path: "corpora/xyz".to_string(),
                message: "no such corpus".to_string(),
            }),
        );

        assert_eq!(response["id"], 7);
        assert_eq!(response["error"]["code"], RESOURCE_NOT_FOUND);
        assert_eq!(response["error"]["message"], "Resource not found");
        assert_eq!(response["error"]["data"]["code"], "not_found");
        assert_eq!(response["error"]["data"]["details"]["path"], "corpora/xyz");
    }

    #[test]
    fn http_error_keeps_status() {
        let response = app_error_to_json_rpc(
            Some(json!("a")),
            AppError::Upstream(ApiError::Http {
                status: 503,
                path: "corpora".to_string(),
                message: "maintenance".to_string(),
            }),
        );

        assert_eq!(response["error"]["code"], UPSTREAM_ERROR);
        assert_eq!(response["error"]["data"]["code"], "upstream_http_error");
        assert_eq!(response["error"]["data"]["details"]["status"], 503);
    }

    #[test]
    fn transport_and_parse_errors_have_distinct_codes() {
        let transport = app_error_to_json_rpc(
            Some(json!(1)),
            AppError::Upstream(ApiError::Transport {
                path: "info".to_string(),
                message: "request timed out".to_string(),
            }),
        );
        let parse = app_error_to_json_rpc(
            Some(json!(1)),
            AppError::Upstream(ApiError::Parse {
                path: "info".to_string(),
                format: "json",
                message: "expected value".to_string(),
            }),
        );

        assert_eq!(transport["error"]["data"]["code"], "upstream_unavailable");
        assert!(transport["error"]["data"]["details"]["status"].is_null());
        assert_eq!(parse["error"]["data"]["code"], "upstream_parse_error");
        assert_eq!(parse["error"]["data"]["details"]["format"], "json");
    }

    #[test]
    fn internal_error_hides_details() {
        let response = app_error_to_json_rpc(Some(json!(2)), AppError::internal("boom"));
        assert_eq!(response["error"]["code"], INTERNAL_ERROR);
        assert!(response["error"]["data"].is_null());
    }
}
