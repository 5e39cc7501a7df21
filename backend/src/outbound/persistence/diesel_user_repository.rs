//! PostgreSQL-backed `UserRepository` implementation using Diesel.
//!
//! A thin adapter: translates between Diesel rows and domain types and maps
//! datastore failures onto the port's error enum. No business logic lives
//! here.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{NewUser, User, UserPatch};

use super::error_mapping::{DbFailure, classify};
use super::models::{NewUserRow, UserChanges, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserRepositoryError::connection(message)
        }
    }
}

fn map_read_error(error: diesel::result::Error) -> UserRepositoryError {
    match classify(error) {
        DbFailure::Connection(message) => UserRepositoryError::connection(message),
        DbFailure::Duplicate(message)
        | DbFailure::ForeignKey(message)
        | DbFailure::Other(message) => UserRepositoryError::query(message),
    }
}

fn map_write_error(error: diesel::result::Error) -> UserRepositoryError {
    match classify(error) {
        DbFailure::Duplicate(message) => UserRepositoryError::duplicate_identity(message),
        DbFailure::ForeignKey(message) => UserRepositoryError::referenced(message),
        DbFailure::Connection(message) => UserRepositoryError::connection(message),
        DbFailure::Other(message) => UserRepositoryError::query(message),
    }
}

fn into_domain(row: UserRow) -> Result<User, UserRepositoryError> {
    row.into_domain().map_err(UserRepositoryError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order(users::created_at.desc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows.into_iter().map(into_domain).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(into_domain).transpose()
    }

    async fn username_in_use(
        &self,
        username: &str,
        exclude: Option<i64>,
    ) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let matches: i64 = match exclude {
            Some(id) => {
                users::table
                    .filter(users::username.eq(username))
                    .filter(users::user_id.ne(id))
                    .count()
                    .get_result(&mut conn)
                    .await
            }
            None => {
                users::table
                    .filter(users::username.eq(username))
                    .count()
                    .get_result(&mut conn)
                    .await
            }
        }
        .map_err(map_read_error)?;
        Ok(matches > 0)
    }

    async fn email_in_use(
        &self,
        email: &str,
        exclude: Option<i64>,
    ) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let matches: i64 = match exclude {
            Some(id) => {
                users::table
                    .filter(users::email.eq(email))
                    .filter(users::user_id.ne(id))
                    .count()
                    .get_result(&mut conn)
                    .await
            }
            None => {
                users::table
                    .filter(users::email.eq(email))
                    .count()
                    .get_result(&mut conn)
                    .await
            }
        }
        .map_err(map_read_error)?;
        Ok(matches > 0)
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: UserRow = diesel::insert_into(users::table)
            .values(&NewUserRow {
                username: &user.username,
                email: &user.email,
                password_hash: &user.password_hash,
                role: user.role.as_str(),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_write_error)?;
        into_domain(row)
    }

    async fn update(&self, id: i64, patch: &UserPatch) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: UserRow = diesel::update(users::table.find(id))
            .set(&UserChanges {
                username: patch.username.as_deref(),
                email: patch.email.as_deref(),
                password_hash: patch.password_hash.as_deref(),
                role: patch.role.map(|role| role.as_str()),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_write_error)?;
        into_domain(row)
    }

    async fn delete(&self, id: i64) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(users::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for adapter error mapping.
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, UserRepositoryError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn plain_diesel_errors_map_to_query_errors() {
        let err = map_write_error(diesel::result::Error::NotFound);
        assert!(matches!(err, UserRepositoryError::Query { .. }));
    }

    #[rstest]
    fn unparsable_role_rows_are_query_errors() {
        let row = UserRow {
            user_id: 1,
            username: "alice".to_owned(),
            email: "alice@example.com".to_owned(),
            role: "mayor".to_owned(),
            created_at: chrono::Utc::now(),
        };
        let err = into_domain(row).expect_err("unknown role must be rejected");
        assert!(matches!(err, UserRepositoryError::Query { .. }));
        assert!(err.to_string().contains("mayor"));
    }
}
