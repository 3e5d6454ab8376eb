//! User account endpoints

use crate::error::ServerError;
use crate::models::to_api_user;
use crate::state::AppState;
use crate::ServerResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shiftboard_api_contract::validation::validate_create_user_request;
use shiftboard_api_contract::{CreateUserRequest, User, UserListResponse};
use shiftboard_db::NewUser;
use std::sync::Arc;

/// List all users, credentials stripped
pub async fn list_users(State(state): State<AppState>) -> ServerResult<Json<UserListResponse>> {
    let records = state.users.list_users().await?;
    let items: Vec<User> = records.iter().map(to_api_user).collect();
    let total = items.len() as u32;
    Ok(Json(UserListResponse { items, total }))
}

/// Register a new user.
///
/// Registration is gated on the approved-email list, and the password is
/// always run through the credential manager before storage; plaintext never
/// reaches the store.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> ServerResult<(StatusCode, Json<User>)> {
    validate_create_user_request(&request)?;

    if !state.users.is_email_approved(&request.email).await? {
        return Err(ServerError::Forbidden(format!(
            "email '{}' is not approved for registration",
            request.email
        )));
    }

    let credentials = Arc::clone(&state.credentials);
    let password = request.password;
    let credential = tokio::task::spawn_blocking(move || credentials.derive(&password))
        .await
        .map_err(|e| ServerError::Internal(format!("derivation task failed: {e}")))?;

    let record = state
        .users
        .create_user(NewUser {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: credential,
            role: request.role.unwrap_or_default(),
        })
        .await?;

    tracing::info!(user_id = record.id, "registered user");
    Ok((StatusCode::CREATED, Json(to_api_user(&record))))
}

/// Get a specific user
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ServerResult<Json<User>> {
    match state.users.user_by_id(user_id).await? {
        Some(record) => Ok(Json(to_api_user(&record))),
        None => Err(ServerError::NotFound(format!("user {}", user_id))),
    }
}

/// Delete a user and, with it, the stored credential
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ServerResult<StatusCode> {
    if state.users.delete_user(user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::NotFound(format!("user {}", user_id)))
    }
}
