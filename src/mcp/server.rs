use anyhow::Result;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    transport::streamable_http_server::{StreamableHttpService, session::local::LocalSessionManager},
};
use serde_json::{Map, Value, json};
use tracing::info;

use crate::api::{
    ApiClient, Credentials, Operation,
    auth,
    merge::{CASE_FIELDS, CLIENT_FIELDS, merge_entity},
    sse,
    types::{NewCase, NewClient},
};
use crate::cli::Transport;
use crate::config::ApiConfig;

use super::helpers::{
    delete_case_text, delete_client_text, delete_document_text, extract_list, is_valid_court_date,
    looks_like_pdf, structured_result, text_result, with_error_boundary,
};
use super::messages;
use super::types::{
    AskParams, CreateCaseParams, CreateClientParams, DeleteCaseParams, DeleteClientParams,
    DeleteDocumentParams, EditCaseParams, EditClientParams, UploadDocumentParams,
};

/// Read configuration, build a client and authenticate. Runs at the start
/// of every tool call; nothing survives from one call to the next.
async fn connect() -> Result<(ApiConfig, ApiClient, Credentials)> {
    let config = ApiConfig::from_env()?;
    let api = ApiClient::new(&config.base_url)?;
    let credentials = auth::authenticate(&api, &config).await?;
    Ok((config, api, credentials))
}

/// Keep only the fields the caller actually supplied, for the edit merges.
fn insert_provided(input: &mut Map<String, Value>, key: &str, value: Option<impl Into<Value>>) {
    if let Some(value) = value {
        input.insert(key.to_string(), value.into());
    }
}

#[derive(Clone)]
pub struct LarMcpServer {
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl LarMcpServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    /// Ask the assistant backend a question about an uploaded document
    #[tool(
        name = "lar-ask",
        description = "Ask a question about an uploaded document. Streams the backend's answer and returns it as text."
    )]
    async fn ask(&self, params: Parameters<AskParams>) -> Result<CallToolResult, McpError> {
        Ok(with_error_boundary(async move {
            let (_, api, credentials) = connect().await?;

            let body = json!({ "message": params.0.message, "fileId": params.0.file_id });
            let operation = Operation::post_json(&["api", "chat", "ask"], body).event_stream();
            let response = api.send(&credentials.token, operation).await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(crate::api::ApiError::Status { status, body }.into());
            }

            let answer = sse::collect_answer(response).await?;
            let text = if answer.is_empty() {
                messages::no_answer()
            } else {
                answer
            };
            Ok(text_result(text))
        })
        .await)
    }

    /// Fetch a PDF from a URL and store it in the backend
    #[tool(
        name = "lar-upload-document",
        description = "Download a PDF from a URL and upload it to the document store under the given name. The URL must resolve to a real PDF."
    )]
    async fn upload_document(
        &self,
        params: Parameters<UploadDocumentParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(with_error_boundary(async move {
            let UploadDocumentParams { name, url } = params.0;
            let (_, api, credentials) = connect().await?;

            let download = api.http().get(&url).send().await?;
            let content_type = download
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let bytes = download.bytes().await?;

            // validated before the upload endpoint is ever called
            if !looks_like_pdf(content_type.as_deref(), &bytes) {
                return Ok(text_result(messages::not_a_pdf(&url)));
            }

            let file_name = if name.to_ascii_lowercase().ends_with(".pdf") {
                name.clone()
            } else {
                format!("{name}.pdf")
            };
            let part = Part::bytes(bytes.to_vec())
                .file_name(file_name)
                .mime_str("application/pdf")?;
            let form = Form::new().text("name", name.clone()).part("file", part);

            let response = api
                .execute(&credentials.token, Operation::post_multipart(&["api", "files"], form))
                .await?;
            response.into_result()?;
            Ok(text_result(messages::document_uploaded(&name)))
        })
        .await)
    }

    /// Delete a stored document by name
    #[tool(
        name = "lar-delete-document",
        description = "Delete a stored document by its name."
    )]
    async fn delete_document(
        &self,
        params: Parameters<DeleteDocumentParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(with_error_boundary(async move {
            let name = params.0.name;
            let (_, api, credentials) = connect().await?;

            let response = api
                .execute(
                    &credentials.token,
                    Operation::delete(&["api", "files", name.as_str()]),
                )
                .await?;
            Ok(text_result(delete_document_text(response, &name)?))
        })
        .await)
    }

    /// List the stored documents
    #[tool(
        name = "lar-list-documents",
        description = "List the documents currently stored in the backend."
    )]
    async fn list_documents(&self) -> Result<CallToolResult, McpError> {
        Ok(with_error_boundary(async move {
            let (_, api, credentials) = connect().await?;

            let response = api
                .execute(&credentials.token, Operation::get(&["api", "files"]))
                .await?
                .into_result()?;
            let value = response.payload().into_value();
            let count = extract_list(&value, "documents").map_or(0, Vec::len);
            Ok(structured_result(
                messages::documents_listed(count),
                &json!({ "documents": value }),
            ))
        })
        .await)
    }

    /// List the authenticated user's clients
    #[tool(
        name = "lar-list-clients",
        description = "List the clients belonging to the authenticated account."
    )]
    async fn list_clients(&self) -> Result<CallToolResult, McpError> {
        Ok(with_error_boundary(async move {
            let (_, api, credentials) = connect().await?;

            let response = api
                .execute(&credentials.token, Operation::get(&["api", "clients", "user"]))
                .await?
                .into_result()?;
            let value = response.payload().into_value();
            let count = extract_list(&value, "clients").map_or(0, Vec::len);
            Ok(structured_result(
                messages::clients_listed(count),
                &json!({ "clients": value }),
            ))
        })
        .await)
    }

    /// Create a client
    #[tool(
        name = "lar-create-client",
        description = "Create a client with a name and contact information, optionally with an address and notes."
    )]
    async fn create_client(
        &self,
        params: Parameters<CreateClientParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(with_error_boundary(async move {
            let CreateClientParams {
                name,
                contact_information,
                address,
                notes,
            } = params.0;
            let (_, api, credentials) = connect().await?;

            let body = serde_json::to_value(NewClient {
                name: &name,
                contact_information: &contact_information,
                address: address.as_deref(),
                notes: notes.as_deref(),
            })?;
            let response = api
                .execute(&credentials.token, Operation::post_json(&["api", "clients"], body))
                .await?
                .into_result()?;
            Ok(structured_result(
                messages::client_created(&name),
                &json!({ "client": response.payload().into_value() }),
            ))
        })
        .await)
    }

    /// Delete a client by id
    #[tool(
        name = "lar-delete-client",
        description = "Delete a client by its numeric id. Fails with a dedicated message when the client still has associated cases."
    )]
    async fn delete_client(
        &self,
        params: Parameters<DeleteClientParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(with_error_boundary(async move {
            let id = params.0.client_id;
            let (_, api, credentials) = connect().await?;

            let path = id.to_string();
            let response = api
                .execute(
                    &credentials.token,
                    Operation::delete(&["api", "clients", path.as_str()]),
                )
                .await?;
            Ok(text_result(delete_client_text(response, id)?))
        })
        .await)
    }

    /// Edit a client: fetch, merge the supplied fields, write back
    #[tool(
        name = "lar-edit-client",
        description = "Edit a client. Only the supplied fields change; an explicit empty string clears a field."
    )]
    async fn edit_client(
        &self,
        params: Parameters<EditClientParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(with_error_boundary(async move {
            let EditClientParams {
                client_id,
                name,
                contact_information,
                address,
                notes,
            } = params.0;
            let (_, api, credentials) = connect().await?;

            let id = client_id.to_string();
            let fetched = api
                .execute(
                    &credentials.token,
                    Operation::get(&["api", "clients", id.as_str()]),
                )
                .await?;
            if fetched.status == StatusCode::NOT_FOUND {
                return Ok(text_result(messages::client_not_found(client_id)));
            }
            let current = fetched.into_result()?.payload().into_value();

            let mut input = Map::new();
            insert_provided(&mut input, "name", name);
            insert_provided(&mut input, "contactInformation", contact_information);
            insert_provided(&mut input, "address", address);
            insert_provided(&mut input, "notes", notes);
            let merged = merge_entity(&current, &input, CLIENT_FIELDS);

            let response = api
                .execute(
                    &credentials.token,
                    Operation::put_json(&["api", "clients", id.as_str()], Value::Object(merged)),
                )
                .await?
                .into_result()?;
            Ok(structured_result(
                messages::client_updated(client_id),
                &json!({ "client": response.payload().into_value() }),
            ))
        })
        .await)
    }

    /// List the cases
    #[tool(name = "lar-list-cases", description = "List the cases in the backend.")]
    async fn list_cases(&self) -> Result<CallToolResult, McpError> {
        Ok(with_error_boundary(async move {
            let (_, api, credentials) = connect().await?;

            let response = api
                .execute(&credentials.token, Operation::get(&["api", "cases"]))
                .await?
                .into_result()?;
            let value = response.payload().into_value();
            let count = extract_list(&value, "cases").map_or(0, Vec::len);
            Ok(structured_result(
                messages::cases_listed(count),
                &json!({ "cases": value }),
            ))
        })
        .await)
    }

    /// Create a case for a client
    #[tool(
        name = "lar-create-case",
        description = "Create a case for a client. Status defaults to Open; the court date, when given, must be ISO 8601."
    )]
    async fn create_case(
        &self,
        params: Parameters<CreateCaseParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(with_error_boundary(async move {
            let CreateCaseParams {
                title,
                client_id,
                description,
                status,
                court_date,
            } = params.0;

            if let Some(date) = court_date.as_deref()
                && !is_valid_court_date(date)
            {
                return Ok(text_result(messages::invalid_date(date)));
            }

            let (_, api, credentials) = connect().await?;
            let body = serde_json::to_value(NewCase {
                title: &title,
                client_id,
                description: description.as_deref(),
                status: status.unwrap_or_default(),
                court_date: court_date.as_deref(),
            })?;
            let response = api
                .execute(&credentials.token, Operation::post_json(&["api", "cases"], body))
                .await?
                .into_result()?;
            Ok(structured_result(
                messages::case_created(&title),
                &json!({ "case": response.payload().into_value() }),
            ))
        })
        .await)
    }

    /// Delete a case by id
    #[tool(name = "lar-delete-case", description = "Delete a case by its numeric id.")]
    async fn delete_case(
        &self,
        params: Parameters<DeleteCaseParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(with_error_boundary(async move {
            let id = params.0.case_id;
            let (_, api, credentials) = connect().await?;

            let path = id.to_string();
            let response = api
                .execute(
                    &credentials.token,
                    Operation::delete(&["api", "cases", path.as_str()]),
                )
                .await?;
            Ok(text_result(delete_case_text(response, id)?))
        })
        .await)
    }

    /// Edit a case: fetch, merge the supplied fields, write back
    #[tool(
        name = "lar-edit-case",
        description = "Edit a case. Only the supplied fields change; when no assignee is given the case is assigned to the authenticated user."
    )]
    async fn edit_case(
        &self,
        params: Parameters<EditCaseParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(with_error_boundary(async move {
            let EditCaseParams {
                case_id,
                title,
                description,
                status,
                court_date,
                client_id,
                assigned_user_id,
            } = params.0;

            if let Some(date) = court_date.as_deref()
                && !is_valid_court_date(date)
            {
                return Ok(text_result(messages::invalid_date(date)));
            }

            let (config, api, credentials) = connect().await?;

            let id = case_id.to_string();
            let fetched = api
                .execute(
                    &credentials.token,
                    Operation::get(&["api", "cases", id.as_str()]),
                )
                .await?;
            if fetched.status == StatusCode::NOT_FOUND {
                return Ok(text_result(messages::case_not_found(case_id)));
            }
            let current = fetched.into_result()?.payload().into_value();

            let mut input = Map::new();
            insert_provided(&mut input, "title", title);
            insert_provided(&mut input, "description", description);
            insert_provided(&mut input, "courtDate", court_date);
            insert_provided(&mut input, "status", status.map(|s| s.as_str()));
            insert_provided(&mut input, "clientId", client_id);

            // an explicit truthy assignee wins; otherwise the case goes to
            // the authenticated user, not to whoever held it before
            let assignee = match assigned_user_id {
                Some(user) if user > 0 => json!(user),
                _ => {
                    let user_id = auth::resolve_user_id(&api, &config).await?;
                    match user_id.parse::<i64>() {
                        Ok(numeric) => json!(numeric),
                        Err(_) => json!(user_id),
                    }
                }
            };
            input.insert("assignedUserId".to_string(), assignee);

            let merged = merge_entity(&current, &input, CASE_FIELDS);
            let response = api
                .execute(
                    &credentials.token,
                    Operation::put_json(&["api", "cases", id.as_str()], Value::Object(merged)),
                )
                .await?
                .into_result()?;
            Ok(structured_result(
                messages::case_updated(case_id),
                &json!({ "case": response.payload().into_value() }),
            ))
        })
        .await)
    }
}

impl Default for LarMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_handler]
impl ServerHandler for LarMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "lar-mcp lets an AI assistant operate a legal-document backend.\n\n\
                 Available tools:\n\
                 1. lar-ask - Ask a question about an uploaded document\n\
                 2. lar-upload-document - Fetch a PDF from a URL and store it\n\
                 3. lar-delete-document - Delete a stored document by name\n\
                 4. lar-list-documents - List stored documents\n\
                 5. lar-list-clients - List the account's clients\n\
                 6. lar-create-client / lar-edit-client / lar-delete-client - Manage clients\n\
                 7. lar-list-cases - List cases\n\
                 8. lar-create-case / lar-edit-case / lar-delete-case - Manage cases\n\n\
                 Every tool authenticates against the backend on each call using\n\
                 the API_URL, API_EMAIL and API_PASSWORD environment variables.\n\
                 Edits only change the fields you supply; the rest keep their\n\
                 current values."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Serve over stdio, the default MCP transport.
async fn run_stdio() -> Result<()> {
    let service = LarMcpServer::new();
    let server = service.serve(rmcp::transport::stdio()).await?;
    server.waiting().await?;
    Ok(())
}

/// Serve over streamable HTTP for hosts that connect via URL.
async fn run_http(addr: &str) -> Result<()> {
    let service = StreamableHttpService::new(
        || Ok(LarMcpServer::new()),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    let router = axum::Router::new().nest_service("/mcp", service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "MCP HTTP transport listening");
    axum::serve(listener, router).await?;
    Ok(())
}

/// Entry point for the MCP server.
pub fn run_server(transport: Transport, http_addr: &str) -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async {
            match transport {
                Transport::Stdio => run_stdio().await,
                Transport::Http => run_http(http_addr).await,
            }
        })
}
