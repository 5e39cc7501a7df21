//! User lifecycle service.
//!
//! Composes the field validators with repository-backed existence and
//! uniqueness checks, failing fast on the first violation. Each operation
//! performs at most one mutating statement, after all validation reads.

use std::sync::Arc;

use crate::domain::ports::{
    DocumentRepository, DocumentRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::validation::{require_email_shape, require_text};
use crate::domain::{Error, NewUser, User, UserPatch};

const IDENTITY_TAKEN: &str = "User with this email or username already exists";
const USER_REFERENCED: &str =
    "Cannot delete user with existing documents. Please delete documents first.";

/// User lifecycle operations backed by injected repositories.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    documents: Arc<dyn DocumentRepository>,
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { message } => Error::internal(message),
        UserRepositoryError::DuplicateIdentity { .. } => Error::conflict(IDENTITY_TAKEN),
        UserRepositoryError::Referenced { .. } => Error::referential_block(USER_REFERENCED),
    }
}

fn map_document_error(error: DocumentRepositoryError) -> Error {
    match error {
        DocumentRepositoryError::Connection { message } => Error::service_unavailable(message),
        DocumentRepositoryError::Query { message }
        | DocumentRepositoryError::MissingReference { message } => Error::internal(message),
    }
}

impl UserService {
    /// Create a new service with the given repositories.
    pub fn new(users: Arc<dyn UserRepository>, documents: Arc<dyn DocumentRepository>) -> Self {
        Self { users, documents }
    }

    /// All users, newest first.
    pub async fn list(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_user_error)
    }

    /// One user by id.
    pub async fn get(&self, id: i64) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    /// Register a new user.
    pub async fn create(&self, user: NewUser) -> Result<User, Error> {
        require_text("username", &user.username)?;
        require_text("email", &user.email)?;
        require_email_shape(&user.email)?;
        require_text("password_hash", &user.password_hash)?;

        if self
            .users
            .username_in_use(&user.username, None)
            .await
            .map_err(map_user_error)?
            || self
                .users
                .email_in_use(&user.email, None)
                .await
                .map_err(map_user_error)?
        {
            return Err(Error::conflict(IDENTITY_TAKEN));
        }

        self.users.insert(&user).await.map_err(map_user_error)
    }

    /// Merge-patch an existing user. Unsupplied fields keep their stored
    /// values; an empty patch returns the stored row untouched.
    pub async fn update(&self, id: i64, patch: UserPatch) -> Result<User, Error> {
        let existing = self.get(id).await?;

        if let Some(username) = &patch.username {
            require_text("username", username)?;
            if username != &existing.username
                && self
                    .users
                    .username_in_use(username, Some(id))
                    .await
                    .map_err(map_user_error)?
            {
                return Err(Error::conflict("Username already exists"));
            }
        }

        if let Some(email) = &patch.email {
            require_text("email", email)?;
            require_email_shape(email)?;
            if email != &existing.email
                && self
                    .users
                    .email_in_use(email, Some(id))
                    .await
                    .map_err(map_user_error)?
            {
                return Err(Error::conflict("Email already exists"));
            }
        }

        if let Some(password_hash) = &patch.password_hash {
            require_text("password_hash", password_hash)?;
        }

        if patch.is_empty() {
            return Ok(existing);
        }

        self.users.update(id, &patch).await.map_err(map_user_error)
    }

    /// Remove a user, rejecting the delete while documents reference them.
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        self.get(id).await?;

        let referencing = self
            .documents
            .count_for_user(id)
            .await
            .map_err(map_document_error)?;
        if referencing > 0 {
            return Err(Error::referential_block(USER_REFERENCED));
        }

        self.users.delete(id).await.map_err(map_user_error)
    }
}
