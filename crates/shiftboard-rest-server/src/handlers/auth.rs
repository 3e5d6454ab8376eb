//! Login endpoint

use crate::error::ServerError;
use crate::models::to_api_user;
use crate::state::AppState;
use crate::ServerResult;
use axum::{extract::State, Json};
use shiftboard_api_contract::validation::validate_login_request;
use shiftboard_api_contract::{LoginRequest, LoginResponse};
use std::sync::Arc;

/// Authenticate a user by email and password.
///
/// An unknown email and a wrong password are indistinguishable to the
/// caller: both are a 401 with the same detail. When the email is unknown we
/// still burn one credential derivation so the two cases cost the same
/// wall-clock time.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ServerResult<Json<LoginResponse>> {
    validate_login_request(&request)?;

    let credentials = Arc::clone(&state.credentials);
    match state.users.user_by_email(&request.email).await? {
        Some(record) => {
            let password = request.password;
            let stored = record.password.clone();
            let verified =
                tokio::task::spawn_blocking(move || credentials.verify(&password, &stored))
                    .await
                    .map_err(|e| ServerError::Internal(format!("verification task failed: {e}")))?;

            if !verified {
                tracing::debug!(email = %request.email, "password verification failed");
                return Err(ServerError::Auth("Invalid email or password".to_string()));
            }

            Ok(Json(LoginResponse {
                user: to_api_user(&record),
                message: "Login successful".to_string(),
            }))
        }
        None => {
            let password = request.password;
            let _ = tokio::task::spawn_blocking(move || credentials.derive(&password)).await;
            Err(ServerError::Auth("Invalid email or password".to_string()))
        }
    }
}
