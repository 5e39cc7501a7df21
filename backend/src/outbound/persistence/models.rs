//! Internal Diesel row structs for database operations.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain. Conversions into domain types live here so the repositories stay
//! thin.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{Document, DocumentType, User};

use super::schema::{document_types, documents, users};

/// Row struct for reading from the users table.
///
/// The password credential is deliberately not selected; it is write-only.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    /// Convert into the domain entity, rejecting rows whose role column no
    /// longer parses as a known enum value.
    pub(crate) fn into_domain(self) -> Result<User, String> {
        let role = self
            .role
            .parse()
            .map_err(|_| format!("unrecognised role value '{}'", self.role))?;
        Ok(User {
            id: self.user_id,
            username: self.username,
            email: self.email,
            role,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

/// Changeset struct for updating existing user records. `None` fields are
/// skipped, giving merge-patch semantics.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChanges<'a> {
    pub username: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub role: Option<&'a str>,
}

/// Row struct for reading from the document_types table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = document_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DocumentTypeRow {
    pub doctype_id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<DocumentTypeRow> for DocumentType {
    fn from(row: DocumentTypeRow) -> Self {
        Self {
            id: row.doctype_id,
            name: row.name,
            description: row.description,
        }
    }
}

/// Insertable struct for creating new document type records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = document_types)]
pub(crate) struct NewDocumentTypeRow<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
}

/// Changeset struct for updating existing document type records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = document_types)]
pub(crate) struct DocumentTypeChanges<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// Row struct for reading from the documents table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DocumentRow {
    pub document_id: i64,
    pub user_id: i64,
    pub doctype_id: i64,
    pub status: String,
    pub request_date: DateTime<Utc>,
    pub issue_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl DocumentRow {
    /// Convert into the domain entity, rejecting rows whose status column no
    /// longer parses as a known enum value.
    pub(crate) fn into_domain(self) -> Result<Document, String> {
        let status = self
            .status
            .parse()
            .map_err(|_| format!("unrecognised status value '{}'", self.status))?;
        Ok(Document {
            id: self.document_id,
            user_id: self.user_id,
            doctype_id: self.doctype_id,
            status,
            request_date: self.request_date,
            issue_date: self.issue_date,
            notes: self.notes,
        })
    }
}

/// Insertable struct for creating new document records.
///
/// `request_date` is deliberately absent: the database stamps it.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
pub(crate) struct NewDocumentRow<'a> {
    pub user_id: i64,
    pub doctype_id: i64,
    pub status: &'a str,
    pub notes: Option<&'a str>,
}

/// Changeset struct for updating existing document records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = documents)]
pub(crate) struct DocumentChanges<'a> {
    pub user_id: Option<i64>,
    pub doctype_id: Option<i64>,
    pub status: Option<&'a str>,
    pub issue_date: Option<DateTime<Utc>>,
    pub notes: Option<&'a str>,
}
