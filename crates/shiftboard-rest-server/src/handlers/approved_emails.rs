//! Approved-email registration gate endpoints

use crate::error::ServerError;
use crate::models::to_api_approved_email;
use crate::state::AppState;
use crate::ServerResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shiftboard_api_contract::{
    ApprovedEmail, ApprovedEmailListResponse, CreateApprovedEmailRequest,
};
use validator::Validate;

/// List the emails approved for registration
pub async fn list_approved_emails(
    State(state): State<AppState>,
) -> ServerResult<Json<ApprovedEmailListResponse>> {
    let records = state.users.list_approved_emails().await?;
    let items: Vec<ApprovedEmail> = records.iter().map(to_api_approved_email).collect();
    let total = items.len() as u32;
    Ok(Json(ApprovedEmailListResponse { items, total }))
}

/// Approve an email for registration
pub async fn create_approved_email(
    State(state): State<AppState>,
    Json(request): Json<CreateApprovedEmailRequest>,
) -> ServerResult<(StatusCode, Json<ApprovedEmail>)> {
    request.validate()?;

    let record = state
        .users
        .add_approved_email(&request.email, request.created_by)
        .await?;
    Ok((StatusCode::CREATED, Json(to_api_approved_email(&record))))
}

/// Revoke an approved email
pub async fn delete_approved_email(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServerResult<StatusCode> {
    if state.users.remove_approved_email(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::NotFound(format!("approved email {}", id)))
    }
}
