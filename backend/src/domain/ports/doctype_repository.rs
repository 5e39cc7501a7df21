//! Port abstraction for document type persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{DocumentType, DocumentTypePatch, NewDocumentType};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by document type repository adapters.
    pub enum DocumentTypeRepositoryError {
        /// Repository connection could not be established.
        Connection => "document type repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "document type repository query failed: {message}",
        /// The unique constraint on the name fired during a write.
        DuplicateName => "document type name already taken: {message}",
        /// A delete was rejected because documents still reference the type.
        Referenced => "document type is still referenced: {message}",
    }
}

#[async_trait]
pub trait DocumentTypeRepository: Send + Sync {
    /// Fetch all document types ordered by name.
    async fn list(&self) -> Result<Vec<DocumentType>, DocumentTypeRepositoryError>;

    /// Fetch a document type by identifier.
    async fn find_by_id(&self, id: i64)
    -> Result<Option<DocumentType>, DocumentTypeRepositoryError>;

    /// Whether a name is taken, optionally ignoring one document type id.
    async fn name_in_use(
        &self,
        name: &str,
        exclude: Option<i64>,
    ) -> Result<bool, DocumentTypeRepositoryError>;

    /// Insert a new document type and return the stored row.
    async fn insert(
        &self,
        doctype: &NewDocumentType,
    ) -> Result<DocumentType, DocumentTypeRepositoryError>;

    /// Apply a merge-patch to an existing document type and return the stored
    /// row.
    ///
    /// The patch must carry at least one change; callers short-circuit empty
    /// patches.
    async fn update(
        &self,
        id: i64,
        patch: &DocumentTypePatch,
    ) -> Result<DocumentType, DocumentTypeRepositoryError>;

    /// Remove a document type record.
    async fn delete(&self, id: i64) -> Result<(), DocumentTypeRepositoryError>;
}
