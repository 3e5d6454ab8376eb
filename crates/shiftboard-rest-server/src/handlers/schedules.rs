//! Schedule, event and shift endpoints

use crate::error::ServerError;
use crate::models::{to_api_event, to_api_schedule, to_api_shift};
use crate::state::AppState;
use crate::ServerResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shiftboard_api_contract::validation::{
    validate_create_schedule_request, validate_create_shift_request,
};
use shiftboard_api_contract::{
    CreateEventRequest, CreateScheduleRequest, CreateShiftRequest, Event, EventListResponse,
    Schedule, ScheduleListResponse, Shift, ShiftListResponse,
};
use shiftboard_db::{NewEvent, NewSchedule, NewShift};
use validator::Validate;

/// List all schedules
pub async fn list_schedules(
    State(state): State<AppState>,
) -> ServerResult<Json<ScheduleListResponse>> {
    let records = state.schedules.list_schedules().await?;
    let items: Vec<Schedule> = records.iter().map(to_api_schedule).collect();
    let total = items.len() as u32;
    Ok(Json(ScheduleListResponse { items, total }))
}

/// Create a schedule
pub async fn create_schedule(
    State(state): State<AppState>,
    Json(request): Json<CreateScheduleRequest>,
) -> ServerResult<(StatusCode, Json<Schedule>)> {
    validate_create_schedule_request(&request)?;

    if state.users.user_by_id(request.created_by).await?.is_none() {
        return Err(ServerError::NotFound(format!(
            "user {}",
            request.created_by
        )));
    }

    let record = state
        .schedules
        .create_schedule(NewSchedule {
            week_number: request.week_number,
            month: request.month,
            year: request.year,
            created_by: request.created_by,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(to_api_schedule(&record))))
}

/// Get a specific schedule
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
) -> ServerResult<Json<Schedule>> {
    match state.schedules.schedule_by_id(schedule_id).await? {
        Some(record) => Ok(Json(to_api_schedule(&record))),
        None => Err(ServerError::NotFound(format!("schedule {}", schedule_id))),
    }
}

/// Delete a schedule
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
) -> ServerResult<StatusCode> {
    if state.schedules.delete_schedule(schedule_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::NotFound(format!("schedule {}", schedule_id)))
    }
}

/// Create an event within a schedule
pub async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> ServerResult<(StatusCode, Json<Event>)> {
    request.validate()?;

    if state
        .schedules
        .schedule_by_id(request.schedule_id)
        .await?
        .is_none()
    {
        return Err(ServerError::NotFound(format!(
            "schedule {}",
            request.schedule_id
        )));
    }

    let record = state
        .schedules
        .create_event(NewEvent {
            name: request.name,
            color_code: request.color_code,
            schedule_id: request.schedule_id,
            day: request.day,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(to_api_event(&record))))
}

/// List the events of a schedule
pub async fn list_schedule_events(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
) -> ServerResult<Json<EventListResponse>> {
    if state.schedules.schedule_by_id(schedule_id).await?.is_none() {
        return Err(ServerError::NotFound(format!("schedule {}", schedule_id)));
    }

    let records = state.schedules.events_for_schedule(schedule_id).await?;
    let items: Vec<Event> = records.iter().map(to_api_event).collect();
    let total = items.len() as u32;
    Ok(Json(EventListResponse { items, total }))
}

/// Create a shift
pub async fn create_shift(
    State(state): State<AppState>,
    Json(request): Json<CreateShiftRequest>,
) -> ServerResult<(StatusCode, Json<Shift>)> {
    validate_create_shift_request(&request)?;

    if state.users.user_by_id(request.employee_id).await?.is_none() {
        return Err(ServerError::NotFound(format!(
            "user {}",
            request.employee_id
        )));
    }
    if state
        .schedules
        .schedule_by_id(request.schedule_id)
        .await?
        .is_none()
    {
        return Err(ServerError::NotFound(format!(
            "schedule {}",
            request.schedule_id
        )));
    }

    let record = state
        .schedules
        .create_shift(NewShift {
            employee_id: request.employee_id,
            schedule_id: request.schedule_id,
            day: request.day,
            start_time: request.start_time,
            end_time: request.end_time,
            event_id: request.event_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(to_api_shift(&record))))
}

/// List the shifts of a schedule
pub async fn list_schedule_shifts(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
) -> ServerResult<Json<ShiftListResponse>> {
    if state.schedules.schedule_by_id(schedule_id).await?.is_none() {
        return Err(ServerError::NotFound(format!("schedule {}", schedule_id)));
    }

    let records = state.schedules.shifts_for_schedule(schedule_id).await?;
    let items: Vec<Shift> = records.iter().map(to_api_shift).collect();
    let total = items.len() as u32;
    Ok(Json(ShiftListResponse { items, total }))
}

/// Delete a shift
pub async fn delete_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<i64>,
) -> ServerResult<StatusCode> {
    if state.schedules.delete_shift(shift_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::NotFound(format!("shift {}", shift_id)))
    }
}
