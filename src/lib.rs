//! lar-mcp - MCP adapter for a legal-document backend
//!
//! lar-mcp exposes a fixed set of Model Context Protocol tools so an AI
//! assistant can manage documents, clients and cases in an existing
//! legal-document backend over its REST API. The adapter is stateless:
//! every tool call authenticates from scratch, performs its backend calls
//! and returns one uniform result, never an unhandled failure.
//!
//! ## Module Structure
//!
//! - `api`: backend client layer (auth, HTTP executor, SSE decoding, merges)
//! - `cli`: command-line interface (transport selection, logging setup)
//! - `config`: environment configuration for the backend connection
//! - `mcp`: Model Context Protocol server implementation

pub mod api;
pub mod cli;
pub mod config;
pub mod mcp;
