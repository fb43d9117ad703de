//! Backend client layer: everything between a tool body and the legal-document
//! backend's REST API.
//!
//! ## Module Structure
//!
//! - `auth`: per-call credential provider (login, user-id resolution)
//! - `error`: error taxonomy for this layer
//! - `http`: operation descriptors and the HTTP executor
//! - `merge`: field-merge policies for read-modify-write edits
//! - `sse`: server-sent-event decoding for the ask operation
//! - `types`: wire types for the payloads the adapter builds itself

pub mod auth;
pub mod error;
pub mod http;
pub mod merge;
pub mod sse;
pub mod types;

pub use error::ApiError;
pub use http::{ApiClient, ApiResponse, Operation, Payload};
pub use types::{CaseStatus, Credentials};
