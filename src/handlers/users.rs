// handlers/users.rs - /users and /users/:id
//
// Plaintext passwords never reach the store: they are validated, hashed with
// bcrypt at the configured cost, and only the hash is persisted.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use super::parse_id;
use crate::auth::hash_password;
use crate::database::{models::User, DatabaseError};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Created};
use crate::state::AppState;
use crate::validation::{validate_user, FieldViolation, PasswordRule, ValidationError};

/**
 * POST /users - Create a login
 *
 * Expected Input:
 * ```json
 * {
 *   "fullname": "Ana Souza",
 *   "username": "ana",
 *   "email": "ana@example.com",
 *   "password": "at least 8 chars",
 *   "is_admin": false
 * }
 * ```
 */
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Created, ApiError> {
    let draft = validate_user(&body, PasswordRule::Required)?;
    let Some(password) = draft.password else {
        return Err(ValidationError::new(vec![FieldViolation::new("password", "Required")]).into());
    };

    let hashed = hash_password(password, state.config.security.bcrypt_cost).await?;
    let id = state.store.insert_user(&draft.user, &hashed).await?;

    tracing::info!("Created user {} ('{}')", id, draft.user.username);
    Ok(Created::at(format!("/users/{}", id)))
}

/// GET /users - all users ordered by full name, never with password hashes
pub async fn retrieve_all(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state.store.list_users().await?;
    Ok(ApiResponse::success(users))
}

pub async fn retrieve_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<User> {
    let id = parse_id(&id, "user")?;

    match state.store.find_user(id).await? {
        Some(user) => Ok(ApiResponse::success(user)),
        None => Err(DatabaseError::not_found("user", id).into()),
    }
}

/// PUT /users/:id - omit `password` to keep the current one
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<()> {
    let id = parse_id(&id, "user")?;
    let draft = validate_user(&body, PasswordRule::Optional)?;

    let hashed = match draft.password {
        Some(password) => Some(hash_password(password, state.config.security.bcrypt_cost).await?),
        None => None,
    };
    state
        .store
        .update_user(id, &draft.user, hashed.as_deref())
        .await?;

    tracing::info!("Updated user {}", id);
    Ok(ApiResponse::no_content())
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id, "user")?;
    state.store.delete_user(id).await?;

    tracing::info!("Deleted user {}", id);
    Ok(ApiResponse::no_content())
}
