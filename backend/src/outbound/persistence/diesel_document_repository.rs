//! PostgreSQL-backed `DocumentRepository` implementation using Diesel.
//!
//! Read operations join the owning user and the document type in a single
//! statement, so enrichment never issues follow-up queries. Foreign key
//! violations on writes surface as `MissingReference`: they mean a
//! referenced row vanished between the service's validation read and this
//! statement.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DocumentRepository, DocumentRepositoryError};
use crate::domain::{Document, DocumentDetails, DocumentPatch, DocumentStatus, NewDocumentRequest};

use super::error_mapping::{DbFailure, classify};
use super::models::{DocumentChanges, DocumentRow, NewDocumentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{document_types, documents, users};

/// Joined row shape produced by the enrichment select.
type DetailsRow = (DocumentRow, String, String, String, Option<String>);

/// Diesel-backed implementation of the `DocumentRepository` port.
#[derive(Clone)]
pub struct DieselDocumentRepository {
    pool: DbPool,
}

impl DieselDocumentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DocumentRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DocumentRepositoryError::connection(message)
        }
    }
}

fn map_read_error(error: diesel::result::Error) -> DocumentRepositoryError {
    match classify(error) {
        DbFailure::Connection(message) => DocumentRepositoryError::connection(message),
        DbFailure::Duplicate(message)
        | DbFailure::ForeignKey(message)
        | DbFailure::Other(message) => DocumentRepositoryError::query(message),
    }
}

fn map_write_error(error: diesel::result::Error) -> DocumentRepositoryError {
    match classify(error) {
        DbFailure::ForeignKey(message) => DocumentRepositoryError::missing_reference(message),
        DbFailure::Connection(message) => DocumentRepositoryError::connection(message),
        DbFailure::Duplicate(message) | DbFailure::Other(message) => {
            DocumentRepositoryError::query(message)
        }
    }
}

fn row_to_details(row: DetailsRow) -> Result<DocumentDetails, DocumentRepositoryError> {
    let (document, user_name, user_email, doctype_name, doctype_description) = row;
    let document = document
        .into_domain()
        .map_err(DocumentRepositoryError::query)?;
    Ok(DocumentDetails {
        document,
        user_name,
        user_email,
        doctype_name,
        doctype_description,
    })
}

/// Columns selected by every enrichment read.
macro_rules! details_select {
    () => {
        (
            DocumentRow::as_select(),
            users::username,
            users::email,
            document_types::name,
            document_types::description,
        )
    };
}

async fn load_details<C>(
    conn: &mut C,
    id: i64,
) -> Result<Option<DetailsRow>, diesel::result::Error>
where
    C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    documents::table
        .inner_join(users::table)
        .inner_join(document_types::table)
        .filter(documents::document_id.eq(id))
        .select(details_select!())
        .first(conn)
        .await
        .optional()
}

#[async_trait]
impl DocumentRepository for DieselDocumentRepository {
    async fn list_detailed(&self) -> Result<Vec<DocumentDetails>, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DetailsRow> = documents::table
            .inner_join(users::table)
            .inner_join(document_types::table)
            .order(documents::request_date.desc())
            .select(details_select!())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows.into_iter().map(row_to_details).collect()
    }

    async fn list_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<DocumentDetails>, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DetailsRow> = documents::table
            .inner_join(users::table)
            .inner_join(document_types::table)
            .filter(documents::user_id.eq(user_id))
            .order(documents::request_date.desc())
            .select(details_select!())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows.into_iter().map(row_to_details).collect()
    }

    async fn find_detailed(
        &self,
        id: i64,
    ) -> Result<Option<DocumentDetails>, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = load_details(&mut conn, id).await.map_err(map_read_error)?;
        row.map(row_to_details).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Document>, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DocumentRow> = documents::table
            .find(id)
            .select(DocumentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(|row| {
            row.into_domain()
                .map_err(DocumentRepositoryError::query)
        })
        .transpose()
    }

    async fn insert(
        &self,
        request: &NewDocumentRequest,
    ) -> Result<DocumentDetails, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: DocumentRow = diesel::insert_into(documents::table)
            .values(&NewDocumentRow {
                user_id: request.user_id,
                doctype_id: request.doctype_id,
                status: DocumentStatus::Pending.as_str(),
                notes: request.notes.as_deref(),
            })
            .returning(DocumentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_write_error)?;

        let details = load_details(&mut conn, row.document_id)
            .await
            .map_err(map_read_error)?;
        details.map(row_to_details).transpose()?.ok_or_else(|| {
            DocumentRepositoryError::query("document vanished after insert")
        })
    }

    async fn update(
        &self,
        id: i64,
        patch: &DocumentPatch,
    ) -> Result<DocumentDetails, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: DocumentRow = diesel::update(documents::table.find(id))
            .set(&DocumentChanges {
                user_id: patch.user_id,
                doctype_id: patch.doctype_id,
                status: patch.status.map(DocumentStatus::as_str),
                issue_date: patch.issue_date,
                notes: patch.notes.as_deref(),
            })
            .returning(DocumentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_write_error)?;

        let details = load_details(&mut conn, row.document_id)
            .await
            .map_err(map_read_error)?;
        details.map(row_to_details).transpose()?.ok_or_else(|| {
            DocumentRepositoryError::query("document vanished after update")
        })
    }

    async fn delete(&self, id: i64) -> Result<(), DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(documents::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn count_for_user(&self, user_id: i64) -> Result<i64, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        documents::table
            .filter(documents::user_id.eq(user_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_read_error)
    }

    async fn count_for_doctype(&self, doctype_id: i64) -> Result<i64, DocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        documents::table
            .filter(documents::doctype_id.eq(doctype_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_read_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for adapter error mapping and row conversion.
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert!(matches!(err, DocumentRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn plain_diesel_errors_map_to_query_errors() {
        let err = map_write_error(diesel::result::Error::NotFound);
        assert!(matches!(err, DocumentRepositoryError::Query { .. }));
    }

    #[rstest]
    fn unparsable_status_rows_are_query_errors() {
        let row: DetailsRow = (
            DocumentRow {
                document_id: 1,
                user_id: 1,
                doctype_id: 1,
                status: "archived".to_owned(),
                request_date: chrono::Utc::now(),
                issue_date: None,
                notes: None,
            },
            "alice".to_owned(),
            "alice@example.com".to_owned(),
            "Birth Certificate".to_owned(),
            None,
        );
        let err = row_to_details(row).expect_err("unknown status must be rejected");
        assert!(matches!(err, DocumentRepositoryError::Query { .. }));
        assert!(err.to_string().contains("archived"));
    }
}
