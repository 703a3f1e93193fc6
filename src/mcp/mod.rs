//! Model Context Protocol (MCP) server handling and JSON-RPC implementations
//!
//! Covers JSON-RPC validation, version negotiation, error formatting and
//! method routing.

pub mod rpc;
pub mod server;
