//! Row types for the scheduling tables.
//!
//! `*Record` structs mirror stored rows; `New*` structs carry the caller-
//! supplied fields for an insert. The user record is the only place in the
//! system outside the credential manager that sees a stored credential.

use chrono::{DateTime, Utc};
use shiftboard_api_contract::Role;

/// A stored user row, including the password credential.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Credential string in `salt:hash` form. Opaque to this layer.
    pub password: String,
    pub role: Role,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Already-derived credential; this layer never receives plaintext.
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApprovedEmailRecord {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRecord {
    pub id: i64,
    pub week_number: i32,
    pub month: String,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub created_by: i64,
}

#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub week_number: i32,
    pub month: String,
    pub year: i32,
    pub created_by: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub id: i64,
    pub name: String,
    pub color_code: Option<String>,
    pub schedule_id: i64,
    pub day: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub color_code: Option<String>,
    pub schedule_id: i64,
    pub day: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShiftRecord {
    pub id: i64,
    pub employee_id: i64,
    pub schedule_id: i64,
    pub day: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub event_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewShift {
    pub employee_id: i64,
    pub schedule_id: i64,
    pub day: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub event_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeLogRecord {
    pub id: i64,
    pub employee_id: i64,
    pub shift_id: Option<i64>,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    pub break_minutes: i32,
    pub break_skipped: bool,
    pub overtime: bool,
    pub late: bool,
    pub edited: bool,
    pub edited_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}
