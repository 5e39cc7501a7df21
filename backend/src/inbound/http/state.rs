//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on the lifecycle services, which in turn hold repository ports. Tests
//! build the same state over in-memory repositories.

use std::sync::Arc;

use crate::domain::ports::{DocumentRepository, DocumentTypeRepository, UserRepository};
use crate::domain::{DocumentService, DocumentTypeService, UserService};
use crate::outbound::persistence::{
    DbPool, DieselDocumentRepository, DieselDocumentTypeRepository, DieselUserRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: UserService,
    pub doctypes: DocumentTypeService,
    pub documents: DocumentService,
}

impl HttpState {
    /// Construct state over arbitrary repository implementations.
    pub fn new(
        users: Arc<dyn UserRepository>,
        doctypes: Arc<dyn DocumentTypeRepository>,
        documents: Arc<dyn DocumentRepository>,
    ) -> Self {
        Self {
            users: UserService::new(Arc::clone(&users), Arc::clone(&documents)),
            doctypes: DocumentTypeService::new(Arc::clone(&doctypes), Arc::clone(&documents)),
            documents: DocumentService::new(documents, users, doctypes),
        }
    }

    /// Construct state over Diesel repositories sharing one connection pool.
    pub fn with_diesel(pool: DbPool) -> Self {
        Self::new(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselDocumentTypeRepository::new(pool.clone())),
            Arc::new(DieselDocumentRepository::new(pool)),
        )
    }
}
