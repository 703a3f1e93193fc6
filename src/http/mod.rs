//! HTTP transport for the Model Context Protocol
//!
//! Provides the `/mcp` listener and the metadata endpoints.

pub mod handlers;
