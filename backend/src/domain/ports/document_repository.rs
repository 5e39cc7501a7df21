//! Port abstraction for document persistence adapters and their errors.
//!
//! Read operations return [`DocumentDetails`] rows joined with the owning
//! user and the document type, so handlers never issue follow-up lookups.
use async_trait::async_trait;

use crate::domain::{Document, DocumentDetails, DocumentPatch, NewDocumentRequest};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by document repository adapters.
    pub enum DocumentRepositoryError {
        /// Repository connection could not be established.
        Connection => "document repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "document repository query failed: {message}",
        /// A foreign key fired during a write: the referenced user or
        /// document type disappeared between validation and the statement.
        MissingReference => "document reference does not resolve: {message}",
    }
}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Fetch all documents with enrichment, newest request first.
    async fn list_detailed(&self) -> Result<Vec<DocumentDetails>, DocumentRepositoryError>;

    /// Fetch one user's documents with enrichment, newest request first.
    async fn list_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<DocumentDetails>, DocumentRepositoryError>;

    /// Fetch a document with enrichment by identifier.
    async fn find_detailed(
        &self,
        id: i64,
    ) -> Result<Option<DocumentDetails>, DocumentRepositoryError>;

    /// Fetch a bare document row by identifier.
    async fn find_by_id(&self, id: i64) -> Result<Option<Document>, DocumentRepositoryError>;

    /// Insert a new pending document and return the enriched row.
    async fn insert(
        &self,
        request: &NewDocumentRequest,
    ) -> Result<DocumentDetails, DocumentRepositoryError>;

    /// Apply a merge-patch to an existing document and return the enriched
    /// row.
    ///
    /// The patch must carry at least one change; callers short-circuit empty
    /// patches.
    async fn update(
        &self,
        id: i64,
        patch: &DocumentPatch,
    ) -> Result<DocumentDetails, DocumentRepositoryError>;

    /// Remove a document record.
    async fn delete(&self, id: i64) -> Result<(), DocumentRepositoryError>;

    /// Number of documents owned by a user.
    async fn count_for_user(&self, user_id: i64) -> Result<i64, DocumentRepositoryError>;

    /// Number of documents of a given type.
    async fn count_for_doctype(&self, doctype_id: i64) -> Result<i64, DocumentRepositoryError>;
}
