//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: every CRUD endpoint, the request/response schemas, and the
//! health probes. Swagger UI serves the document at `/api-docs` in debug
//! builds.

use utoipa::OpenApi;

use crate::inbound::http::doctypes::{
    CreateDocTypeRequest, DocTypeResponse, UpdateDocTypeRequest,
};
use crate::inbound::http::documents::{
    CreateDocumentRequest, DocumentResponse, UpdateDocumentRequest,
};
use crate::inbound::http::envelope::{Confirmation, ErrorEnvelope};
use crate::inbound::http::health::HealthSummary;
use crate::inbound::http::users::{CreateUserRequest, UpdateUserRequest, UserResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "eMunicipality API",
        description = "HTTP interface for municipal document requests: users, \
                       document types, and document lifecycle operations."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::doctypes::list_doctypes,
        crate::inbound::http::doctypes::get_doctype,
        crate::inbound::http::doctypes::create_doctype,
        crate::inbound::http::doctypes::update_doctype,
        crate::inbound::http::doctypes::delete_doctype,
        crate::inbound::http::documents::list_documents,
        crate::inbound::http::documents::list_documents_by_user,
        crate::inbound::http::documents::get_document,
        crate::inbound::http::documents::create_document,
        crate::inbound::http::documents::update_document,
        crate::inbound::http::documents::delete_document,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserResponse,
        CreateUserRequest,
        UpdateUserRequest,
        DocTypeResponse,
        CreateDocTypeRequest,
        UpdateDocTypeRequest,
        DocumentResponse,
        CreateDocumentRequest,
        UpdateDocumentRequest,
        ErrorEnvelope,
        Confirmation,
        HealthSummary,
    )),
    tags(
        (name = "users", description = "User accounts"),
        (name = "doctypes", description = "Document type catalogue"),
        (name = "documents", description = "Document request lifecycle"),
        (name = "health", description = "Health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document structure.
    use super::*;

    #[test]
    fn document_registers_every_crud_path() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).expect("serializable document");
        let paths = json["paths"].as_object().expect("paths object");

        for path in [
            "/api/users",
            "/api/users/{id}",
            "/api/doctypes",
            "/api/doctypes/{id}",
            "/api/documents",
            "/api/documents/user/{userId}",
            "/api/documents/{id}",
            "/health",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn document_registers_envelope_schemas() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).expect("serializable document");
        let schemas = json["components"]["schemas"]
            .as_object()
            .expect("schemas object");

        assert!(schemas.contains_key("ErrorEnvelope"));
        assert!(schemas.contains_key("DocumentResponse"));
    }
}
