//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewUser, User, UserPatch};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "user repository query failed: {message}",
        /// A unique constraint on username or email fired during a write.
        DuplicateIdentity => "user identity already taken: {message}",
        /// A delete was rejected because documents still reference the user.
        Referenced => "user is still referenced: {message}",
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch all users, newest first.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, UserRepositoryError>;

    /// Whether a username is taken, optionally ignoring one user id.
    async fn username_in_use(
        &self,
        username: &str,
        exclude: Option<i64>,
    ) -> Result<bool, UserRepositoryError>;

    /// Whether an email is taken, optionally ignoring one user id.
    async fn email_in_use(
        &self,
        email: &str,
        exclude: Option<i64>,
    ) -> Result<bool, UserRepositoryError>;

    /// Insert a new user record and return the stored row.
    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError>;

    /// Apply a merge-patch to an existing user and return the stored row.
    ///
    /// The patch must carry at least one change; callers short-circuit empty
    /// patches.
    async fn update(&self, id: i64, patch: &UserPatch) -> Result<User, UserRepositoryError>;

    /// Remove a user record.
    async fn delete(&self, id: i64) -> Result<(), UserRepositoryError>;
}
