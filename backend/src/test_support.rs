//! Test utilities for the backend crate.
//!
//! Provides an in-memory datastore implementing the repository ports, shared
//! by unit tests (in `src/`) and integration tests (in `tests/`, via the
//! `test-support` feature). The store emulates the schema's constraint
//! backstops so error paths behave like the Diesel adapters.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    DocumentRepository, DocumentRepositoryError, DocumentTypeRepository,
    DocumentTypeRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Document, DocumentDetails, DocumentPatch, DocumentStatus, DocumentType, DocumentTypePatch,
    NewDocumentRequest, NewDocumentType, NewUser, User, UserPatch,
};

struct StoredUser {
    user: User,
    #[expect(dead_code, reason = "stored to mirror the schema; never read back")]
    password_hash: String,
}

#[derive(Default)]
struct Inner {
    users: Vec<StoredUser>,
    doctypes: Vec<DocumentType>,
    documents: Vec<Document>,
    next_user_id: i64,
    next_doctype_id: i64,
    next_document_id: i64,
    unavailable: bool,
}

impl Inner {
    fn details(&self, document: &Document) -> Option<DocumentDetails> {
        let owner = self
            .users
            .iter()
            .find(|stored| stored.user.id == document.user_id)?;
        let doctype = self
            .doctypes
            .iter()
            .find(|doctype| doctype.id == document.doctype_id)?;
        Some(DocumentDetails {
            document: document.clone(),
            user_name: owner.user.username.clone(),
            user_email: owner.user.email.clone(),
            doctype_name: doctype.name.clone(),
            doctype_description: doctype.description.clone(),
        })
    }

    fn detailed_sorted(&self, filter_user: Option<i64>) -> Vec<DocumentDetails> {
        let mut documents: Vec<&Document> = self
            .documents
            .iter()
            .filter(|document| filter_user.is_none_or(|user_id| document.user_id == user_id))
            .collect();
        documents.sort_by(|a, b| {
            b.request_date
                .cmp(&a.request_date)
                .then(b.id.cmp(&a.id))
        });
        documents
            .into_iter()
            .filter_map(|document| self.details(document))
            .collect()
    }
}

/// Shared in-memory datastore backing the three repository fakes.
#[derive(Clone, Default)]
pub struct MemoryDb {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryDb {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store lock")
    }

    /// User repository handle backed by this store.
    pub fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(MemoryUsers {
            inner: Arc::clone(&self.inner),
        })
    }

    /// Document type repository handle backed by this store.
    pub fn doctypes(&self) -> Arc<dyn DocumentTypeRepository> {
        Arc::new(MemoryDocumentTypes {
            inner: Arc::clone(&self.inner),
        })
    }

    /// Document repository handle backed by this store.
    pub fn documents(&self) -> Arc<dyn DocumentRepository> {
        Arc::new(MemoryDocuments {
            inner: Arc::clone(&self.inner),
        })
    }

    /// Make every repository call fail with a connection error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Seed a user directly, bypassing validation.
    pub fn add_user(&self, username: &str, email: &str) -> i64 {
        let mut inner = self.lock();
        inner.next_user_id += 1;
        let id = inner.next_user_id;
        inner.users.push(StoredUser {
            user: User {
                id,
                username: username.to_owned(),
                email: email.to_owned(),
                role: crate::domain::UserRole::Citizen,
                created_at: Utc::now(),
            },
            password_hash: "x".to_owned(),
        });
        id
    }

    /// Seed a document type directly, bypassing validation.
    pub fn add_doctype(&self, name: &str, description: Option<&str>) -> i64 {
        let mut inner = self.lock();
        inner.next_doctype_id += 1;
        let id = inner.next_doctype_id;
        inner.doctypes.push(DocumentType {
            id,
            name: name.to_owned(),
            description: description.map(str::to_owned),
        });
        id
    }

    /// Seed a document directly with the current time, bypassing validation.
    pub fn add_document(
        &self,
        user_id: i64,
        doctype_id: i64,
        status: DocumentStatus,
        notes: Option<&str>,
    ) -> i64 {
        self.add_document_at(user_id, doctype_id, status, notes, Utc::now())
    }

    /// Seed a document with an explicit request timestamp.
    pub fn add_document_at(
        &self,
        user_id: i64,
        doctype_id: i64,
        status: DocumentStatus,
        notes: Option<&str>,
        request_date: DateTime<Utc>,
    ) -> i64 {
        let mut inner = self.lock();
        inner.next_document_id += 1;
        let id = inner.next_document_id;
        inner.documents.push(Document {
            id,
            user_id,
            doctype_id,
            status,
            request_date,
            issue_date: None,
            notes: notes.map(str::to_owned),
        });
        id
    }

    /// Drop a seeded document.
    pub fn remove_document(&self, id: i64) {
        self.lock().documents.retain(|document| document.id != id);
    }
}

struct MemoryUsers {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryUsers {
    fn lock(&self) -> Result<MutexGuard<'_, Inner>, UserRepositoryError> {
        let inner = self.inner.lock().expect("memory store lock");
        if inner.unavailable {
            return Err(UserRepositoryError::connection("memory store offline"));
        }
        Ok(inner)
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let inner = self.lock()?;
        let mut users: Vec<User> = inner.users.iter().map(|stored| stored.user.clone()).collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, UserRepositoryError> {
        let inner = self.lock()?;
        Ok(inner
            .users
            .iter()
            .find(|stored| stored.user.id == id)
            .map(|stored| stored.user.clone()))
    }

    async fn username_in_use(
        &self,
        username: &str,
        exclude: Option<i64>,
    ) -> Result<bool, UserRepositoryError> {
        let inner = self.lock()?;
        Ok(inner.users.iter().any(|stored| {
            stored.user.username == username && Some(stored.user.id) != exclude
        }))
    }

    async fn email_in_use(
        &self,
        email: &str,
        exclude: Option<i64>,
    ) -> Result<bool, UserRepositoryError> {
        let inner = self.lock()?;
        Ok(inner
            .users
            .iter()
            .any(|stored| stored.user.email == email && Some(stored.user.id) != exclude))
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut inner = self.lock()?;
        if inner.users.iter().any(|stored| {
            stored.user.username == user.username || stored.user.email == user.email
        }) {
            return Err(UserRepositoryError::duplicate_identity(
                "users_username_key or users_email_key",
            ));
        }
        inner.next_user_id += 1;
        let stored = User {
            id: inner.next_user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: Utc::now(),
        };
        inner.users.push(StoredUser {
            user: stored.clone(),
            password_hash: user.password_hash.clone(),
        });
        Ok(stored)
    }

    async fn update(&self, id: i64, patch: &UserPatch) -> Result<User, UserRepositoryError> {
        let mut inner = self.lock()?;
        let conflict = inner.users.iter().any(|stored| {
            stored.user.id != id
                && (patch
                    .username
                    .as_ref()
                    .is_some_and(|username| &stored.user.username == username)
                    || patch
                        .email
                        .as_ref()
                        .is_some_and(|email| &stored.user.email == email))
        });
        if conflict {
            return Err(UserRepositoryError::duplicate_identity(
                "users_username_key or users_email_key",
            ));
        }
        let stored = inner
            .users
            .iter_mut()
            .find(|stored| stored.user.id == id)
            .ok_or_else(|| UserRepositoryError::query("record not found"))?;
        if let Some(username) = &patch.username {
            stored.user.username = username.clone();
        }
        if let Some(email) = &patch.email {
            stored.user.email = email.clone();
        }
        if let Some(password_hash) = &patch.password_hash {
            stored.password_hash = password_hash.clone();
        }
        if let Some(role) = patch.role {
            stored.user.role = role;
        }
        Ok(stored.user.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), UserRepositoryError> {
        let mut inner = self.lock()?;
        if inner.documents.iter().any(|document| document.user_id == id) {
            return Err(UserRepositoryError::referenced("documents_user_id_fkey"));
        }
        inner.users.retain(|stored| stored.user.id != id);
        Ok(())
    }
}

struct MemoryDocumentTypes {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryDocumentTypes {
    fn lock(&self) -> Result<MutexGuard<'_, Inner>, DocumentTypeRepositoryError> {
        let inner = self.inner.lock().expect("memory store lock");
        if inner.unavailable {
            return Err(DocumentTypeRepositoryError::connection(
                "memory store offline",
            ));
        }
        Ok(inner)
    }
}

#[async_trait]
impl DocumentTypeRepository for MemoryDocumentTypes {
    async fn list(&self) -> Result<Vec<DocumentType>, DocumentTypeRepositoryError> {
        let inner = self.lock()?;
        let mut doctypes = inner.doctypes.clone();
        doctypes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(doctypes)
    }

    async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<DocumentType>, DocumentTypeRepositoryError> {
        let inner = self.lock()?;
        Ok(inner
            .doctypes
            .iter()
            .find(|doctype| doctype.id == id)
            .cloned())
    }

    async fn name_in_use(
        &self,
        name: &str,
        exclude: Option<i64>,
    ) -> Result<bool, DocumentTypeRepositoryError> {
        let inner = self.lock()?;
        Ok(inner
            .doctypes
            .iter()
            .any(|doctype| doctype.name == name && Some(doctype.id) != exclude))
    }

    async fn insert(
        &self,
        doctype: &NewDocumentType,
    ) -> Result<DocumentType, DocumentTypeRepositoryError> {
        let mut inner = self.lock()?;
        if inner.doctypes.iter().any(|stored| stored.name == doctype.name) {
            return Err(DocumentTypeRepositoryError::duplicate_name(
                "document_types_name_key",
            ));
        }
        inner.next_doctype_id += 1;
        let stored = DocumentType {
            id: inner.next_doctype_id,
            name: doctype.name.clone(),
            description: doctype.description.clone(),
        };
        inner.doctypes.push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: i64,
        patch: &DocumentTypePatch,
    ) -> Result<DocumentType, DocumentTypeRepositoryError> {
        let mut inner = self.lock()?;
        let conflict = inner.doctypes.iter().any(|stored| {
            stored.id != id
                && patch.name.as_ref().is_some_and(|name| &stored.name == name)
        });
        if conflict {
            return Err(DocumentTypeRepositoryError::duplicate_name(
                "document_types_name_key",
            ));
        }
        let stored = inner
            .doctypes
            .iter_mut()
            .find(|doctype| doctype.id == id)
            .ok_or_else(|| DocumentTypeRepositoryError::query("record not found"))?;
        if let Some(name) = &patch.name {
            stored.name = name.clone();
        }
        if let Some(description) = &patch.description {
            stored.description = Some(description.clone());
        }
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DocumentTypeRepositoryError> {
        let mut inner = self.lock()?;
        if inner
            .documents
            .iter()
            .any(|document| document.doctype_id == id)
        {
            return Err(DocumentTypeRepositoryError::referenced(
                "documents_doctype_id_fkey",
            ));
        }
        inner.doctypes.retain(|doctype| doctype.id != id);
        Ok(())
    }
}

struct MemoryDocuments {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryDocuments {
    fn lock(&self) -> Result<MutexGuard<'_, Inner>, DocumentRepositoryError> {
        let inner = self.inner.lock().expect("memory store lock");
        if inner.unavailable {
            return Err(DocumentRepositoryError::connection("memory store offline"));
        }
        Ok(inner)
    }
}

#[async_trait]
impl DocumentRepository for MemoryDocuments {
    async fn list_detailed(&self) -> Result<Vec<DocumentDetails>, DocumentRepositoryError> {
        Ok(self.lock()?.detailed_sorted(None))
    }

    async fn list_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<DocumentDetails>, DocumentRepositoryError> {
        Ok(self.lock()?.detailed_sorted(Some(user_id)))
    }

    async fn find_detailed(
        &self,
        id: i64,
    ) -> Result<Option<DocumentDetails>, DocumentRepositoryError> {
        let inner = self.lock()?;
        Ok(inner
            .documents
            .iter()
            .find(|document| document.id == id)
            .and_then(|document| inner.details(document)))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Document>, DocumentRepositoryError> {
        let inner = self.lock()?;
        Ok(inner
            .documents
            .iter()
            .find(|document| document.id == id)
            .cloned())
    }

    async fn insert(
        &self,
        request: &NewDocumentRequest,
    ) -> Result<DocumentDetails, DocumentRepositoryError> {
        let mut inner = self.lock()?;
        let user_exists = inner
            .users
            .iter()
            .any(|stored| stored.user.id == request.user_id);
        let doctype_exists = inner
            .doctypes
            .iter()
            .any(|doctype| doctype.id == request.doctype_id);
        if !user_exists || !doctype_exists {
            return Err(DocumentRepositoryError::missing_reference(
                "documents_user_id_fkey or documents_doctype_id_fkey",
            ));
        }
        inner.next_document_id += 1;
        let document = Document {
            id: inner.next_document_id,
            user_id: request.user_id,
            doctype_id: request.doctype_id,
            status: DocumentStatus::Pending,
            request_date: Utc::now(),
            issue_date: None,
            notes: request.notes.clone(),
        };
        inner.documents.push(document.clone());
        inner
            .details(&document)
            .ok_or_else(|| DocumentRepositoryError::query("document vanished after insert"))
    }

    async fn update(
        &self,
        id: i64,
        patch: &DocumentPatch,
    ) -> Result<DocumentDetails, DocumentRepositoryError> {
        let mut inner = self.lock()?;
        let user_missing = patch
            .user_id
            .is_some_and(|user_id| !inner.users.iter().any(|stored| stored.user.id == user_id));
        let doctype_missing = patch.doctype_id.is_some_and(|doctype_id| {
            !inner.doctypes.iter().any(|doctype| doctype.id == doctype_id)
        });
        if user_missing || doctype_missing {
            return Err(DocumentRepositoryError::missing_reference(
                "documents_user_id_fkey or documents_doctype_id_fkey",
            ));
        }
        let document = inner
            .documents
            .iter_mut()
            .find(|document| document.id == id)
            .ok_or_else(|| DocumentRepositoryError::query("record not found"))?;
        if let Some(user_id) = patch.user_id {
            document.user_id = user_id;
        }
        if let Some(doctype_id) = patch.doctype_id {
            document.doctype_id = doctype_id;
        }
        if let Some(status) = patch.status {
            document.status = status;
        }
        if let Some(issue_date) = patch.issue_date {
            document.issue_date = Some(issue_date);
        }
        if let Some(notes) = &patch.notes {
            document.notes = Some(notes.clone());
        }
        let document = document.clone();
        inner
            .details(&document)
            .ok_or_else(|| DocumentRepositoryError::query("document vanished after update"))
    }

    async fn delete(&self, id: i64) -> Result<(), DocumentRepositoryError> {
        let mut inner = self.lock()?;
        inner.documents.retain(|document| document.id != id);
        Ok(())
    }

    async fn count_for_user(&self, user_id: i64) -> Result<i64, DocumentRepositoryError> {
        let inner = self.lock()?;
        Ok(inner
            .documents
            .iter()
            .filter(|document| document.user_id == user_id)
            .count() as i64)
    }

    async fn count_for_doctype(&self, doctype_id: i64) -> Result<i64, DocumentRepositoryError> {
        let inner = self.lock()?;
        Ok(inner
            .documents
            .iter()
            .filter(|document| document.doctype_id == doctype_id)
            .count() as i64)
    }
}
