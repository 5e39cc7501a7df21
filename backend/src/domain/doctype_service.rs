//! Document type lifecycle service.

use std::sync::Arc;

use crate::domain::ports::{
    DocumentRepository, DocumentRepositoryError, DocumentTypeRepository,
    DocumentTypeRepositoryError,
};
use crate::domain::validation::require_text;
use crate::domain::{DocumentType, DocumentTypePatch, Error, NewDocumentType};

const NAME_TAKEN: &str = "Document type with this name already exists";
const DOCTYPE_REFERENCED: &str =
    "Cannot delete document type with existing documents. Please delete documents first.";

/// Document type lifecycle operations backed by injected repositories.
#[derive(Clone)]
pub struct DocumentTypeService {
    doctypes: Arc<dyn DocumentTypeRepository>,
    documents: Arc<dyn DocumentRepository>,
}

fn map_doctype_error(error: DocumentTypeRepositoryError) -> Error {
    match error {
        DocumentTypeRepositoryError::Connection { message } => Error::service_unavailable(message),
        DocumentTypeRepositoryError::Query { message } => Error::internal(message),
        DocumentTypeRepositoryError::DuplicateName { .. } => Error::conflict(NAME_TAKEN),
        DocumentTypeRepositoryError::Referenced { .. } => {
            Error::referential_block(DOCTYPE_REFERENCED)
        }
    }
}

fn map_document_error(error: DocumentRepositoryError) -> Error {
    match error {
        DocumentRepositoryError::Connection { message } => Error::service_unavailable(message),
        DocumentRepositoryError::Query { message }
        | DocumentRepositoryError::MissingReference { message } => Error::internal(message),
    }
}

impl DocumentTypeService {
    /// Create a new service with the given repositories.
    pub fn new(
        doctypes: Arc<dyn DocumentTypeRepository>,
        documents: Arc<dyn DocumentRepository>,
    ) -> Self {
        Self {
            doctypes,
            documents,
        }
    }

    /// All document types, ordered by name.
    pub async fn list(&self) -> Result<Vec<DocumentType>, Error> {
        self.doctypes.list().await.map_err(map_doctype_error)
    }

    /// One document type by id.
    pub async fn get(&self, id: i64) -> Result<DocumentType, Error> {
        self.doctypes
            .find_by_id(id)
            .await
            .map_err(map_doctype_error)?
            .ok_or_else(|| Error::not_found("Document type not found"))
    }

    /// Add a new catalogue entry.
    pub async fn create(&self, doctype: NewDocumentType) -> Result<DocumentType, Error> {
        require_text("name", &doctype.name)?;

        if self
            .doctypes
            .name_in_use(&doctype.name, None)
            .await
            .map_err(map_doctype_error)?
        {
            return Err(Error::conflict(NAME_TAKEN));
        }

        self.doctypes
            .insert(&doctype)
            .await
            .map_err(map_doctype_error)
    }

    /// Merge-patch an existing document type. Unsupplied fields keep their
    /// stored values; an empty patch returns the stored row untouched.
    pub async fn update(&self, id: i64, patch: DocumentTypePatch) -> Result<DocumentType, Error> {
        let existing = self.get(id).await?;

        if let Some(name) = &patch.name {
            require_text("name", name)?;
            if name != &existing.name
                && self
                    .doctypes
                    .name_in_use(name, Some(id))
                    .await
                    .map_err(map_doctype_error)?
            {
                return Err(Error::conflict("Document type name already exists"));
            }
        }

        if patch.is_empty() {
            return Ok(existing);
        }

        self.doctypes
            .update(id, &patch)
            .await
            .map_err(map_doctype_error)
    }

    /// Remove a document type, rejecting the delete while documents reference
    /// it.
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        self.get(id).await?;

        let referencing = self
            .documents
            .count_for_doctype(id)
            .await
            .map_err(map_document_error)?;
        if referencing > 0 {
            return Err(Error::referential_block(DOCTYPE_REFERENCED));
        }

        self.doctypes.delete(id).await.map_err(map_doctype_error)
    }
}

#[cfg(test)]
mod tests {
    //! Behavioural coverage for the document type lifecycle.
    use super::*;
    use crate::domain::{DocumentStatus, ErrorCode};
    use crate::test_support::MemoryDb;

    fn service(db: &MemoryDb) -> DocumentTypeService {
        DocumentTypeService::new(db.doctypes(), db.documents())
    }

    fn new_doctype(name: &str) -> NewDocumentType {
        NewDocumentType {
            name: name.to_owned(),
            description: None,
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_name() {
        let db = MemoryDb::new();
        let svc = service(&db);
        svc.create(new_doctype("Birth Certificate"))
            .await
            .expect("first create should succeed");

        let err = svc
            .create(new_doctype("Birth Certificate"))
            .await
            .expect_err("duplicate name must be rejected");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn duplicate_check_is_case_sensitive() {
        let db = MemoryDb::new();
        let svc = service(&db);
        svc.create(new_doctype("Birth Certificate"))
            .await
            .expect("first create should succeed");
        svc.create(new_doctype("birth certificate"))
            .await
            .expect("different case is a different name");
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let db = MemoryDb::new();
        let err = service(&db)
            .create(new_doctype("  "))
            .await
            .expect_err("blank name must be rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn update_keeps_unsupplied_fields() {
        let db = MemoryDb::new();
        let svc = service(&db);
        let doctype = svc
            .create(NewDocumentType {
                name: "Residence Permit".to_owned(),
                description: Some("Proof of residence".to_owned()),
            })
            .await
            .expect("create should succeed");

        let updated = svc
            .update(
                doctype.id,
                DocumentTypePatch {
                    description: Some("Official proof of residence".to_owned()),
                    ..DocumentTypePatch::default()
                },
            )
            .await
            .expect("update should succeed");

        assert_eq!(updated.name, "Residence Permit");
        assert_eq!(
            updated.description.as_deref(),
            Some("Official proof of residence")
        );
    }

    #[tokio::test]
    async fn empty_patch_is_a_noop() {
        let db = MemoryDb::new();
        let svc = service(&db);
        let doctype = svc
            .create(new_doctype("Birth Certificate"))
            .await
            .expect("create should succeed");

        let updated = svc
            .update(doctype.id, DocumentTypePatch::default())
            .await
            .expect("empty patch should succeed");
        assert_eq!(updated, doctype);
    }

    #[tokio::test]
    async fn delete_is_blocked_while_documents_reference_the_type() {
        let db = MemoryDb::new();
        let svc = service(&db);
        let doctype = svc
            .create(new_doctype("Birth Certificate"))
            .await
            .expect("create should succeed");
        let user_id = db.add_user("alice", "alice@example.com");
        let document_id = db.add_document(user_id, doctype.id, DocumentStatus::Pending, None);

        let err = svc
            .delete(doctype.id)
            .await
            .expect_err("referenced type must not be deletable");
        assert_eq!(err.code(), ErrorCode::ReferentialBlock);

        db.remove_document(document_id);
        svc.delete(doctype.id)
            .await
            .expect("unreferenced type is deletable");
    }
}
