//! User API handlers.
//!
//! ```text
//! GET    /api/users
//! GET    /api/users/{id}
//! POST   /api/users
//! PUT    /api/users/{id}
//! DELETE /api/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{NewUser, User, UserPatch, UserRole};
use crate::inbound::http::envelope::{self, ApiResult, Confirmation, ErrorEnvelope};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, parse_role};

/// Request payload for creating a user.
///
/// Every field is required; they are optional here so absence maps to a 400
/// naming the missing field rather than a deserialisation error.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<String>,
}

/// Request payload for merge-patching a user.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<String>,
}

/// Response payload for a user. The password credential is never included.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            user_id: value.id,
            username: value.username,
            email: value.email,
            role: value.role,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// List all users, newest first.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users with their count", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let users = state.users.list().await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(envelope::ok_list(users))
}

/// Fetch one user by id.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "getUserById"
)]
#[get("/users/{id}")]
pub async fn get_user(state: web::Data<HttpState>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let user = state.users.get(path.into_inner()).await?;
    Ok(envelope::ok_record(UserResponse::from(user)))
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorEnvelope),
        (status = 409, description = "Username or email already taken", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let username = payload.username.ok_or_else(|| missing_field_error("username"))?;
    let email = payload.email.ok_or_else(|| missing_field_error("email"))?;
    let password_hash = payload
        .password_hash
        .ok_or_else(|| missing_field_error("password_hash"))?;
    let role = payload.role.ok_or_else(|| missing_field_error("role"))?;
    let role = parse_role(&role)?;

    let user = state
        .users
        .create(NewUser {
            username,
            email,
            password_hash,
            role,
        })
        .await?;
    Ok(envelope::created(
        "User created successfully",
        UserResponse::from(user),
    ))
}

/// Merge-patch an existing user.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid field", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope),
        (status = 409, description = "Username or email already taken", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let role = payload.role.as_deref().map(parse_role).transpose()?;
    let patch = UserPatch {
        username: payload.username,
        email: payload.email,
        password_hash: payload.password_hash,
        role,
    };

    let user = state.users.update(path.into_inner(), patch).await?;
    Ok(envelope::ok_updated(
        "User updated successfully",
        UserResponse::from(user),
    ))
}

/// Delete a user with no remaining documents.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = Confirmation),
        (status = 400, description = "User still referenced by documents", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state.users.delete(path.into_inner()).await?;
    Ok(envelope::ok_message("User deleted successfully"))
}
