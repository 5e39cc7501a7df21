//! PostgreSQL-backed `DocumentTypeRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DocumentTypeRepository, DocumentTypeRepositoryError};
use crate::domain::{DocumentType, DocumentTypePatch, NewDocumentType};

use super::error_mapping::{DbFailure, classify};
use super::models::{DocumentTypeChanges, DocumentTypeRow, NewDocumentTypeRow};
use super::pool::{DbPool, PoolError};
use super::schema::document_types;

/// Diesel-backed implementation of the `DocumentTypeRepository` port.
#[derive(Clone)]
pub struct DieselDocumentTypeRepository {
    pool: DbPool,
}

impl DieselDocumentTypeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DocumentTypeRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DocumentTypeRepositoryError::connection(message)
        }
    }
}

fn map_read_error(error: diesel::result::Error) -> DocumentTypeRepositoryError {
    match classify(error) {
        DbFailure::Connection(message) => DocumentTypeRepositoryError::connection(message),
        DbFailure::Duplicate(message)
        | DbFailure::ForeignKey(message)
        | DbFailure::Other(message) => DocumentTypeRepositoryError::query(message),
    }
}

fn map_write_error(error: diesel::result::Error) -> DocumentTypeRepositoryError {
    match classify(error) {
        DbFailure::Duplicate(message) => DocumentTypeRepositoryError::duplicate_name(message),
        DbFailure::ForeignKey(message) => DocumentTypeRepositoryError::referenced(message),
        DbFailure::Connection(message) => DocumentTypeRepositoryError::connection(message),
        DbFailure::Other(message) => DocumentTypeRepositoryError::query(message),
    }
}

#[async_trait]
impl DocumentTypeRepository for DieselDocumentTypeRepository {
    async fn list(&self) -> Result<Vec<DocumentType>, DocumentTypeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DocumentTypeRow> = document_types::table
            .order(document_types::name.asc())
            .select(DocumentTypeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(rows.into_iter().map(DocumentType::from).collect())
    }

    async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<DocumentType>, DocumentTypeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DocumentTypeRow> = document_types::table
            .find(id)
            .select(DocumentTypeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        Ok(row.map(DocumentType::from))
    }

    async fn name_in_use(
        &self,
        name: &str,
        exclude: Option<i64>,
    ) -> Result<bool, DocumentTypeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let matches: i64 = match exclude {
            Some(id) => {
                document_types::table
                    .filter(document_types::name.eq(name))
                    .filter(document_types::doctype_id.ne(id))
                    .count()
                    .get_result(&mut conn)
                    .await
            }
            None => {
                document_types::table
                    .filter(document_types::name.eq(name))
                    .count()
                    .get_result(&mut conn)
                    .await
            }
        }
        .map_err(map_read_error)?;
        Ok(matches > 0)
    }

    async fn insert(
        &self,
        doctype: &NewDocumentType,
    ) -> Result<DocumentType, DocumentTypeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: DocumentTypeRow = diesel::insert_into(document_types::table)
            .values(&NewDocumentTypeRow {
                name: &doctype.name,
                description: doctype.description.as_deref(),
            })
            .returning(DocumentTypeRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_write_error)?;
        Ok(DocumentType::from(row))
    }

    async fn update(
        &self,
        id: i64,
        patch: &DocumentTypePatch,
    ) -> Result<DocumentType, DocumentTypeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: DocumentTypeRow = diesel::update(document_types::table.find(id))
            .set(&DocumentTypeChanges {
                name: patch.name.as_deref(),
                description: patch.description.as_deref(),
            })
            .returning(DocumentTypeRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_write_error)?;
        Ok(DocumentType::from(row))
    }

    async fn delete(&self, id: i64) -> Result<(), DocumentTypeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(document_types::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }
}
