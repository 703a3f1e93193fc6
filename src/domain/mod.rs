//! DraCor domain: record types, endpoint catalogue and the MCP registries
//!
//! Resources, tools and prompts are explicit tables; composite operations
//! live in [`analysis`].

pub mod analysis;
pub mod endpoints;
pub mod models;
pub mod prompts;
pub mod resources;
pub mod text;
pub mod tools;
pub mod utils;
