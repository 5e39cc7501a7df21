//! Document type API handlers.
//!
//! ```text
//! GET    /api/doctypes
//! GET    /api/doctypes/{id}
//! POST   /api/doctypes
//! PUT    /api/doctypes/{id}
//! DELETE /api/doctypes/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DocumentType, DocumentTypePatch, NewDocumentType};
use crate::inbound::http::envelope::{self, ApiResult, Confirmation, ErrorEnvelope};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::missing_field_error;

/// Request payload for creating a document type.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDocTypeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Request payload for merge-patching a document type.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDocTypeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Response payload for a document type.
#[derive(Debug, Serialize, ToSchema)]
pub struct DocTypeResponse {
    pub doctype_id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<DocumentType> for DocTypeResponse {
    fn from(value: DocumentType) -> Self {
        Self {
            doctype_id: value.id,
            name: value.name,
            description: value.description,
        }
    }
}

/// List all document types, ordered by name.
#[utoipa::path(
    get,
    path = "/api/doctypes",
    responses(
        (status = 200, description = "Document types with their count", body = [DocTypeResponse]),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["doctypes"],
    operation_id = "listDocTypes"
)]
#[get("/doctypes")]
pub async fn list_doctypes(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let doctypes = state.doctypes.list().await?;
    let doctypes: Vec<DocTypeResponse> = doctypes.into_iter().map(DocTypeResponse::from).collect();
    Ok(envelope::ok_list(doctypes))
}

/// Fetch one document type by id.
#[utoipa::path(
    get,
    path = "/api/doctypes/{id}",
    params(("id" = i64, Path, description = "Document type identifier")),
    responses(
        (status = 200, description = "The document type", body = DocTypeResponse),
        (status = 404, description = "Document type not found", body = ErrorEnvelope)
    ),
    tags = ["doctypes"],
    operation_id = "getDocTypeById"
)]
#[get("/doctypes/{id}")]
pub async fn get_doctype(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let doctype = state.doctypes.get(path.into_inner()).await?;
    Ok(envelope::ok_record(DocTypeResponse::from(doctype)))
}

/// Add a new document type to the catalogue.
#[utoipa::path(
    post,
    path = "/api/doctypes",
    request_body = CreateDocTypeRequest,
    responses(
        (status = 201, description = "Document type created", body = DocTypeResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorEnvelope),
        (status = 409, description = "Name already taken", body = ErrorEnvelope)
    ),
    tags = ["doctypes"],
    operation_id = "createDocType"
)]
#[post("/doctypes")]
pub async fn create_doctype(
    state: web::Data<HttpState>,
    payload: web::Json<CreateDocTypeRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let name = payload.name.ok_or_else(|| missing_field_error("name"))?;

    let doctype = state
        .doctypes
        .create(NewDocumentType {
            name,
            description: payload.description,
        })
        .await?;
    Ok(envelope::created(
        "Document type created successfully",
        DocTypeResponse::from(doctype),
    ))
}

/// Merge-patch an existing document type.
#[utoipa::path(
    put,
    path = "/api/doctypes/{id}",
    params(("id" = i64, Path, description = "Document type identifier")),
    request_body = UpdateDocTypeRequest,
    responses(
        (status = 200, description = "Document type updated", body = DocTypeResponse),
        (status = 400, description = "Invalid field", body = ErrorEnvelope),
        (status = 404, description = "Document type not found", body = ErrorEnvelope),
        (status = 409, description = "Name already taken", body = ErrorEnvelope)
    ),
    tags = ["doctypes"],
    operation_id = "updateDocType"
)]
#[put("/doctypes/{id}")]
pub async fn update_doctype(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateDocTypeRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let patch = DocumentTypePatch {
        name: payload.name,
        description: payload.description,
    };

    let doctype = state.doctypes.update(path.into_inner(), patch).await?;
    Ok(envelope::ok_updated(
        "Document type updated successfully",
        DocTypeResponse::from(doctype),
    ))
}

/// Delete a document type with no remaining documents.
#[utoipa::path(
    delete,
    path = "/api/doctypes/{id}",
    params(("id" = i64, Path, description = "Document type identifier")),
    responses(
        (status = 200, description = "Document type deleted", body = Confirmation),
        (
            status = 400,
            description = "Document type still referenced by documents",
            body = ErrorEnvelope
        ),
        (status = 404, description = "Document type not found", body = ErrorEnvelope)
    ),
    tags = ["doctypes"],
    operation_id = "deleteDocType"
)]
#[delete("/doctypes/{id}")]
pub async fn delete_doctype(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state.doctypes.delete(path.into_inner()).await?;
    Ok(envelope::ok_message("Document type deleted successfully"))
}
