//! Time tracking endpoints

use crate::error::ServerError;
use crate::models::to_api_time_log;
use crate::state::AppState;
use crate::ServerResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use shiftboard_api_contract::{ClockInRequest, ClockOutRequest, TimeLog, TimeLogListResponse};
use validator::Validate;

/// Clock in: open a new time log for an employee
pub async fn clock_in(
    State(state): State<AppState>,
    Json(request): Json<ClockInRequest>,
) -> ServerResult<(StatusCode, Json<TimeLog>)> {
    request.validate()?;

    if state.users.user_by_id(request.employee_id).await?.is_none() {
        return Err(ServerError::NotFound(format!(
            "user {}",
            request.employee_id
        )));
    }

    let record = state
        .time_logs
        .clock_in(request.employee_id, request.shift_id, Utc::now(), request.late)
        .await?;
    tracing::info!(
        time_log_id = record.id,
        employee_id = record.employee_id,
        "clock in"
    );
    Ok((StatusCode::CREATED, Json(to_api_time_log(&record))))
}

/// Clock out: close an open time log.
///
/// Closing an already-closed log is a conflict, not an update; the store
/// enforces this atomically, so two racing clock-outs cannot both succeed.
pub async fn clock_out(
    State(state): State<AppState>,
    Path(time_log_id): Path<i64>,
    Json(request): Json<ClockOutRequest>,
) -> ServerResult<Json<TimeLog>> {
    request.validate()?;

    let record = state
        .time_logs
        .clock_out(
            time_log_id,
            Utc::now(),
            request.break_minutes,
            request.break_skipped,
            request.overtime,
        )
        .await?;
    Ok(Json(to_api_time_log(&record)))
}

/// List the time logs of an employee
pub async fn list_user_time_logs(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ServerResult<Json<TimeLogListResponse>> {
    if state.users.user_by_id(user_id).await?.is_none() {
        return Err(ServerError::NotFound(format!("user {}", user_id)));
    }

    let records = state.time_logs.time_logs_for_employee(user_id).await?;
    let items: Vec<TimeLog> = records.iter().map(to_api_time_log).collect();
    let total = items.len() as u32;
    Ok(Json(TimeLogListResponse { items, total }))
}
