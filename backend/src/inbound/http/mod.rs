//! HTTP inbound adapter exposing REST endpoints.

pub mod doctypes;
pub mod documents;
pub mod envelope;
pub mod health;
pub mod state;
pub mod users;
pub(crate) mod validation;

use actix_web::{HttpResponse, web};

pub use envelope::ApiResult;

/// JSON 404 for routes outside the API surface.
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(envelope::ErrorEnvelope {
        success: false,
        message: "Endpoint not found".to_owned(),
        error: None,
    })
}

/// Register every route on an actix application.
///
/// `HttpState` and `HealthState` must already be attached as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(users::list_users)
            .service(users::create_user)
            .service(users::get_user)
            .service(users::update_user)
            .service(users::delete_user)
            .service(doctypes::list_doctypes)
            .service(doctypes::create_doctype)
            .service(doctypes::get_doctype)
            .service(doctypes::update_doctype)
            .service(doctypes::delete_doctype)
            .service(documents::list_documents)
            .service(documents::list_documents_by_user)
            .service(documents::create_document)
            .service(documents::get_document)
            .service(documents::update_document)
            .service(documents::delete_document),
    )
    .service(health::health)
    .service(health::ready)
    .service(health::live)
    .default_service(web::route().to(not_found));
}
