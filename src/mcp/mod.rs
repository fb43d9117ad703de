//! Model Context Protocol (MCP) server implementation.
//!
//! This module exposes the backend CRUD operations as MCP tools so AI
//! assistants like Claude Desktop can drive the legal-document backend.
//!
//! ## Module Structure
//!
//! - `helpers`: result normalization and shared validation
//! - `messages`: user-facing text templates
//! - `server`: the tool router and transport entry points
//! - `types`: per-tool input schemas

mod helpers;
mod messages;
mod server;
pub mod types;

pub use server::{LarMcpServer, run_server};
