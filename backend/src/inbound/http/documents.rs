//! Document request API handlers.
//!
//! ```text
//! GET    /api/documents
//! GET    /api/documents/user/{userId}
//! GET    /api/documents/{id}
//! POST   /api/documents
//! PUT    /api/documents/{id}
//! DELETE /api/documents/{id}
//! ```
//!
//! Read responses are enriched with display fields from the owning user and
//! the document type, so clients never need follow-up lookups.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DocumentDetails, DocumentPatch, DocumentStatus, NewDocumentRequest};
use crate::inbound::http::envelope::{self, ApiResult, Confirmation, ErrorEnvelope};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, parse_status};

/// Request payload for filing a document request.
///
/// `user_id` and `doctype_id` are required; they are optional here so absence
/// maps to a 400 naming the missing field rather than a deserialisation
/// error. Status is not accepted: new documents always start as `pending`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDocumentRequest {
    pub user_id: Option<i64>,
    pub doctype_id: Option<i64>,
    pub notes: Option<String>,
}

/// Request payload for merge-patching a document request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDocumentRequest {
    pub user_id: Option<i64>,
    pub doctype_id: Option<i64>,
    pub status: Option<String>,
    #[schema(value_type = Option<String>, example = "2026-03-02T14:30:00Z")]
    pub issue_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Response payload for a document, enriched with user and type display
/// fields.
#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentResponse {
    pub document_id: i64,
    pub user_id: i64,
    pub doctype_id: i64,
    pub status: DocumentStatus,
    pub request_date: String,
    pub issue_date: Option<String>,
    pub notes: Option<String>,
    pub user_name: String,
    pub user_email: String,
    pub doctype_name: String,
    pub doctype_description: Option<String>,
}

impl From<DocumentDetails> for DocumentResponse {
    fn from(value: DocumentDetails) -> Self {
        Self {
            document_id: value.document.id,
            user_id: value.document.user_id,
            doctype_id: value.document.doctype_id,
            status: value.document.status,
            request_date: value.document.request_date.to_rfc3339(),
            issue_date: value.document.issue_date.map(|date| date.to_rfc3339()),
            notes: value.document.notes,
            user_name: value.user_name,
            user_email: value.user_email,
            doctype_name: value.doctype_name,
            doctype_description: value.doctype_description,
        }
    }
}

/// List all documents, newest request first.
#[utoipa::path(
    get,
    path = "/api/documents",
    responses(
        (status = 200, description = "Documents with their count", body = [DocumentResponse]),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["documents"],
    operation_id = "listDocuments"
)]
#[get("/documents")]
pub async fn list_documents(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let documents = state.documents.list().await?;
    let documents: Vec<DocumentResponse> =
        documents.into_iter().map(DocumentResponse::from).collect();
    Ok(envelope::ok_list(documents))
}

/// List one user's documents, newest request first.
#[utoipa::path(
    get,
    path = "/api/documents/user/{userId}",
    params(("userId" = i64, Path, description = "Owning user identifier")),
    responses(
        (status = 200, description = "The user's documents", body = [DocumentResponse]),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    ),
    tags = ["documents"],
    operation_id = "getDocumentsByUserId"
)]
#[get("/documents/user/{userId}")]
pub async fn list_documents_by_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let documents = state.documents.list_for_user(path.into_inner()).await?;
    let documents: Vec<DocumentResponse> =
        documents.into_iter().map(DocumentResponse::from).collect();
    Ok(envelope::ok_list(documents))
}

/// Fetch one document by id.
#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    params(("id" = i64, Path, description = "Document identifier")),
    responses(
        (status = 200, description = "The document", body = DocumentResponse),
        (status = 404, description = "Document not found", body = ErrorEnvelope)
    ),
    tags = ["documents"],
    operation_id = "getDocumentById"
)]
#[get("/documents/{id}")]
pub async fn get_document(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let document = state.documents.get(path.into_inner()).await?;
    Ok(envelope::ok_record(DocumentResponse::from(document)))
}

/// File a new document request.
#[utoipa::path(
    post,
    path = "/api/documents",
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "Document created as pending", body = DocumentResponse),
        (status = 400, description = "Missing required field", body = ErrorEnvelope),
        (status = 404, description = "User or document type not found", body = ErrorEnvelope)
    ),
    tags = ["documents"],
    operation_id = "createDocument"
)]
#[post("/documents")]
pub async fn create_document(
    state: web::Data<HttpState>,
    payload: web::Json<CreateDocumentRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let user_id = payload.user_id.ok_or_else(|| missing_field_error("user_id"))?;
    let doctype_id = payload
        .doctype_id
        .ok_or_else(|| missing_field_error("doctype_id"))?;

    let document = state
        .documents
        .create(NewDocumentRequest {
            user_id,
            doctype_id,
            notes: payload.notes,
        })
        .await?;
    Ok(envelope::created(
        "Document created successfully",
        DocumentResponse::from(document),
    ))
}

/// Merge-patch an existing document request.
#[utoipa::path(
    put,
    path = "/api/documents/{id}",
    params(("id" = i64, Path, description = "Document identifier")),
    request_body = UpdateDocumentRequest,
    responses(
        (status = 200, description = "Document updated", body = DocumentResponse),
        (status = 400, description = "Invalid status value", body = ErrorEnvelope),
        (
            status = 404,
            description = "Document, user, or document type not found",
            body = ErrorEnvelope
        )
    ),
    tags = ["documents"],
    operation_id = "updateDocument"
)]
#[put("/documents/{id}")]
pub async fn update_document(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateDocumentRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let status = payload.status.as_deref().map(parse_status).transpose()?;
    let patch = DocumentPatch {
        user_id: payload.user_id,
        doctype_id: payload.doctype_id,
        status,
        issue_date: payload.issue_date,
        notes: payload.notes,
    };

    let document = state.documents.update(path.into_inner(), patch).await?;
    Ok(envelope::ok_updated(
        "Document updated successfully",
        DocumentResponse::from(document),
    ))
}

/// Delete a document request.
#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    params(("id" = i64, Path, description = "Document identifier")),
    responses(
        (status = 200, description = "Document deleted", body = Confirmation),
        (status = 404, description = "Document not found", body = ErrorEnvelope)
    ),
    tags = ["documents"],
    operation_id = "deleteDocument"
)]
#[delete("/documents/{id}")]
pub async fn delete_document(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state.documents.delete(path.into_inner()).await?;
    Ok(envelope::ok_message("Document deleted successfully"))
}
