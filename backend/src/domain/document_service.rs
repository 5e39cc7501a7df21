//! Document lifecycle service.
//!
//! Implements create/read/update/delete for document requests with
//! cross-entity referential checks. Validators run fail-fast: the first
//! failure aborts the operation before any mutating statement is issued.

use std::sync::Arc;

use crate::domain::ports::{
    DocumentRepository, DocumentRepositoryError, DocumentTypeRepository,
    DocumentTypeRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{DocumentDetails, DocumentPatch, Error, NewDocumentRequest};

fn map_document_error(error: DocumentRepositoryError) -> Error {
    match error {
        DocumentRepositoryError::Connection { message } => Error::service_unavailable(message),
        DocumentRepositoryError::Query { message } => Error::internal(message),
        DocumentRepositoryError::MissingReference { .. } => {
            Error::not_found("User or document type not found")
        }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { message }
        | UserRepositoryError::DuplicateIdentity { message }
        | UserRepositoryError::Referenced { message } => Error::internal(message),
    }
}

fn map_doctype_error(error: DocumentTypeRepositoryError) -> Error {
    match error {
        DocumentTypeRepositoryError::Connection { message } => Error::service_unavailable(message),
        DocumentTypeRepositoryError::Query { message }
        | DocumentTypeRepositoryError::DuplicateName { message }
        | DocumentTypeRepositoryError::Referenced { message } => Error::internal(message),
    }
}

/// Document lifecycle operations backed by injected repositories.
#[derive(Clone)]
pub struct DocumentService {
    documents: Arc<dyn DocumentRepository>,
    users: Arc<dyn UserRepository>,
    doctypes: Arc<dyn DocumentTypeRepository>,
}

impl DocumentService {
    /// Create a new service with the given repositories.
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        users: Arc<dyn UserRepository>,
        doctypes: Arc<dyn DocumentTypeRepository>,
    ) -> Self {
        Self {
            documents,
            users,
            doctypes,
        }
    }

    async fn ensure_user_exists(&self, user_id: i64) -> Result<(), Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .map(|_| ())
            .ok_or_else(|| Error::not_found("User not found"))
    }

    async fn ensure_doctype_exists(&self, doctype_id: i64) -> Result<(), Error> {
        self.doctypes
            .find_by_id(doctype_id)
            .await
            .map_err(map_doctype_error)?
            .map(|_| ())
            .ok_or_else(|| Error::not_found("Document type not found"))
    }

    /// All documents with enrichment, newest request first. An empty store
    /// yields an empty list, not an error.
    pub async fn list(&self) -> Result<Vec<DocumentDetails>, Error> {
        self.documents
            .list_detailed()
            .await
            .map_err(map_document_error)
    }

    /// One enriched document by id.
    pub async fn get(&self, id: i64) -> Result<DocumentDetails, Error> {
        self.documents
            .find_detailed(id)
            .await
            .map_err(map_document_error)?
            .ok_or_else(|| Error::not_found("Document not found"))
    }

    /// One user's documents with enrichment, newest request first.
    ///
    /// The owning user must exist; a user with no documents yields an empty
    /// list.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<DocumentDetails>, Error> {
        self.ensure_user_exists(user_id).await?;
        self.documents
            .list_for_user(user_id)
            .await
            .map_err(map_document_error)
    }

    /// File a new document request. Both references must resolve; the new
    /// row starts as `pending` with a server-assigned request timestamp.
    pub async fn create(&self, request: NewDocumentRequest) -> Result<DocumentDetails, Error> {
        self.ensure_user_exists(request.user_id).await?;
        self.ensure_doctype_exists(request.doctype_id).await?;

        self.documents
            .insert(&request)
            .await
            .map_err(map_document_error)
    }

    /// Merge-patch an existing document. Any supplied reference must resolve;
    /// unsupplied fields keep their stored values; an empty patch returns the
    /// stored row untouched.
    pub async fn update(&self, id: i64, patch: DocumentPatch) -> Result<DocumentDetails, Error> {
        let existing = self.get(id).await?;

        if let Some(user_id) = patch.user_id {
            self.ensure_user_exists(user_id).await?;
        }
        if let Some(doctype_id) = patch.doctype_id {
            self.ensure_doctype_exists(doctype_id).await?;
        }

        if patch.is_empty() {
            return Ok(existing);
        }

        self.documents
            .update(id, &patch)
            .await
            .map_err(map_document_error)
    }

    /// Remove a document request.
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        self.documents
            .find_by_id(id)
            .await
            .map_err(map_document_error)?
            .ok_or_else(|| Error::not_found("Document not found"))?;

        self.documents.delete(id).await.map_err(map_document_error)
    }
}

#[cfg(test)]
mod tests {
    //! Behavioural coverage for the document lifecycle.
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::{DocumentStatus, ErrorCode};
    use crate::test_support::MemoryDb;

    fn service(db: &MemoryDb) -> DocumentService {
        DocumentService::new(db.documents(), db.users(), db.doctypes())
    }

    fn seeded(db: &MemoryDb) -> (i64, i64) {
        let user_id = db.add_user("alice", "alice@example.com");
        let doctype_id = db.add_doctype("Birth Certificate", Some("Certified copy"));
        (user_id, doctype_id)
    }

    #[tokio::test]
    async fn create_defaults_to_pending_and_copies_notes() {
        let db = MemoryDb::new();
        let (user_id, doctype_id) = seeded(&db);
        let before = Utc::now();

        let details = service(&db)
            .create(NewDocumentRequest {
                user_id,
                doctype_id,
                notes: Some("urgent".to_owned()),
            })
            .await
            .expect("create should succeed");

        assert_eq!(details.document.status, DocumentStatus::Pending);
        assert_eq!(details.document.notes.as_deref(), Some("urgent"));
        assert_eq!(details.document.issue_date, None);
        assert!(details.document.request_date >= before);
        assert_eq!(details.user_name, "alice");
        assert_eq!(details.user_email, "alice@example.com");
        assert_eq!(details.doctype_name, "Birth Certificate");
        assert_eq!(details.doctype_description.as_deref(), Some("Certified copy"));
    }

    #[rstest]
    #[case(true, false, "User not found")]
    #[case(false, true, "Document type not found")]
    #[tokio::test]
    async fn create_rejects_missing_references(
        #[case] missing_user: bool,
        #[case] missing_doctype: bool,
        #[case] expected_message: &str,
    ) {
        let db = MemoryDb::new();
        let (user_id, doctype_id) = seeded(&db);
        let user_id = if missing_user { user_id + 100 } else { user_id };
        let doctype_id = if missing_doctype {
            doctype_id + 100
        } else {
            doctype_id
        };

        let err = service(&db)
            .create(NewDocumentRequest {
                user_id,
                doctype_id,
                notes: None,
            })
            .await
            .expect_err("dangling reference must be rejected");

        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), expected_message);
    }

    #[tokio::test]
    async fn list_returns_empty_sequence_when_no_documents_exist() {
        let db = MemoryDb::new();
        let documents = service(&db).list().await.expect("list should succeed");
        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn list_orders_by_request_date_descending() {
        let db = MemoryDb::new();
        let (user_id, doctype_id) = seeded(&db);
        let older = db.add_document_at(
            user_id,
            doctype_id,
            DocumentStatus::Pending,
            None,
            Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).single().expect("valid date"),
        );
        let newer = db.add_document_at(
            user_id,
            doctype_id,
            DocumentStatus::Pending,
            None,
            Utc.with_ymd_and_hms(2026, 3, 2, 14, 30, 0).single().expect("valid date"),
        );

        let documents = service(&db).list().await.expect("list should succeed");
        let ids: Vec<i64> = documents.iter().map(|d| d.document.id).collect();
        assert_eq!(ids, vec![newer, older]);
    }

    #[tokio::test]
    async fn get_missing_document_is_not_found() {
        let db = MemoryDb::new();
        let err = service(&db).get(7).await.expect_err("must be missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "Document not found");
    }

    #[tokio::test]
    async fn list_for_user_requires_the_user_to_exist() {
        let db = MemoryDb::new();
        let err = service(&db)
            .list_for_user(99)
            .await
            .expect_err("unknown user must be rejected");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn list_for_user_with_no_documents_is_empty() {
        let db = MemoryDb::new();
        let (user_id, _) = seeded(&db);
        let documents = service(&db)
            .list_for_user(user_id)
            .await
            .expect("list should succeed");
        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn list_for_user_excludes_other_owners() {
        let db = MemoryDb::new();
        let (alice, doctype_id) = seeded(&db);
        let bob = db.add_user("bob", "bob@example.com");
        db.add_document(alice, doctype_id, DocumentStatus::Pending, None);
        let bobs = db.add_document(bob, doctype_id, DocumentStatus::Approved, None);

        let documents = service(&db)
            .list_for_user(bob)
            .await
            .expect("list should succeed");
        let ids: Vec<i64> = documents.iter().map(|d| d.document.id).collect();
        assert_eq!(ids, vec![bobs]);
    }

    #[tokio::test]
    async fn update_with_empty_patch_changes_nothing() {
        let db = MemoryDb::new();
        let (user_id, doctype_id) = seeded(&db);
        let id = db.add_document(user_id, doctype_id, DocumentStatus::Pending, Some("urgent"));
        let svc = service(&db);
        let before = svc.get(id).await.expect("get should succeed");

        let after = svc
            .update(id, DocumentPatch::default())
            .await
            .expect("empty patch should succeed");

        assert_eq!(after, before);
        assert_eq!(svc.get(id).await.expect("get should succeed"), before);
    }

    #[tokio::test]
    async fn update_merges_only_supplied_fields() {
        let db = MemoryDb::new();
        let (user_id, doctype_id) = seeded(&db);
        let id = db.add_document(user_id, doctype_id, DocumentStatus::Pending, Some("urgent"));

        let details = service(&db)
            .update(
                id,
                DocumentPatch {
                    status: Some(DocumentStatus::Approved),
                    ..DocumentPatch::default()
                },
            )
            .await
            .expect("update should succeed");

        assert_eq!(details.document.status, DocumentStatus::Approved);
        assert_eq!(details.document.notes.as_deref(), Some("urgent"));
        assert_eq!(details.document.user_id, user_id);
    }

    #[tokio::test]
    async fn update_validates_supplied_references() {
        let db = MemoryDb::new();
        let (user_id, doctype_id) = seeded(&db);
        let id = db.add_document(user_id, doctype_id, DocumentStatus::Pending, None);
        let svc = service(&db);

        let err = svc
            .update(
                id,
                DocumentPatch {
                    user_id: Some(user_id + 100),
                    ..DocumentPatch::default()
                },
            )
            .await
            .expect_err("dangling user reference must be rejected");
        assert_eq!(err.code(), ErrorCode::NotFound);

        let stored = svc.get(id).await.expect("get should succeed");
        assert_eq!(stored.document.user_id, user_id);
    }

    #[tokio::test]
    async fn update_missing_document_is_not_found() {
        let db = MemoryDb::new();
        let err = service(&db)
            .update(123, DocumentPatch::default())
            .await
            .expect_err("must be missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn delete_removes_the_document() {
        let db = MemoryDb::new();
        let (user_id, doctype_id) = seeded(&db);
        let id = db.add_document(user_id, doctype_id, DocumentStatus::Pending, None);
        let svc = service(&db);

        svc.delete(id).await.expect("delete should succeed");
        let err = svc.get(id).await.expect_err("document is gone");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn delete_missing_document_is_not_found() {
        let db = MemoryDb::new();
        let err = service(&db)
            .delete(55)
            .await
            .expect_err("must be missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
