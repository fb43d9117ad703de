//! Input schemas for the MCP tools.
//!
//! Each struct is the typed, schema-validated input of one tool; the MCP
//! layer rejects calls that do not match before the tool body runs. An
//! `Option` field distinguishes "not provided" from an explicitly supplied
//! value, which the edit merges rely on.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::api::CaseStatus;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AskParams {
    /// Question to ask about an uploaded document
    pub message: String,
    /// Identifier of the uploaded file the question refers to
    pub file_id: u64,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadDocumentParams {
    /// Name to store the document under
    pub name: String,
    /// URL of the PDF to fetch and upload
    pub url: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDocumentParams {
    /// Name of the stored document to delete
    pub name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientParams {
    /// Client's full name
    pub name: String,
    /// How to reach the client (phone, email, ...)
    pub contact_information: String,
    /// Postal address
    pub address: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteClientParams {
    /// Identifier of the client to delete
    pub client_id: u64,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditClientParams {
    /// Identifier of the client to edit
    pub client_id: u64,
    /// New name; omit to keep the current one
    pub name: Option<String>,
    /// New contact information; an explicit empty string clears it
    pub contact_information: Option<String>,
    /// New postal address; an explicit empty string clears it
    pub address: Option<String>,
    /// New notes; an explicit empty string clears them
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCaseParams {
    /// Case title
    pub title: String,
    /// Identifier of the client the case belongs to
    pub client_id: u64,
    /// Case description
    pub description: Option<String>,
    /// Lifecycle state; defaults to Open
    pub status: Option<CaseStatus>,
    /// Court date in ISO 8601 (date or date-time)
    pub court_date: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCaseParams {
    /// Identifier of the case to delete
    pub case_id: u64,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditCaseParams {
    /// Identifier of the case to edit
    pub case_id: u64,
    /// New title; omit to keep the current one
    pub title: Option<String>,
    /// New description; an explicit empty string clears it
    pub description: Option<String>,
    /// New lifecycle state
    pub status: Option<CaseStatus>,
    /// New court date in ISO 8601 (date or date-time)
    pub court_date: Option<String>,
    /// Move the case to another client (zero is treated as not provided)
    pub client_id: Option<u64>,
    /// Reassign the case; defaults to the authenticated user
    pub assigned_user_id: Option<u64>,
}
