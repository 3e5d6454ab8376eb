//! API contract types for the Shiftboard staff-scheduling service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Staff roles, least to most privileged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Guest,
    VenueMember,
    SecurityStaff,
    Manager,
    Supervisor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::VenueMember => "venue_member",
            Role::SecurityStaff => "security_staff",
            Role::Manager => "manager",
            Role::Supervisor => "supervisor",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "guest" => Some(Role::Guest),
            "venue_member" => Some(Role::VenueMember),
            "security_staff" => Some(Role::SecurityStaff),
            "manager" => Some(Role::Manager),
            "supervisor" => Some(Role::Supervisor),
            _ => None,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Guest
    }
}

/// A user account as exposed over the API. The stored credential is
/// deliberately absent from this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Login response: the authenticated user, credential stripped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub message: String,
}

/// Registration request body
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name is required"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub total: u32,
}

/// An email pre-approved for registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovedEmail {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateApprovedEmailRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(default)]
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovedEmailListResponse {
    pub items: Vec<ApprovedEmail>,
    pub total: u32,
}

/// A weekly schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: i64,
    pub week_number: i32,
    pub month: String,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub created_by: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateScheduleRequest {
    #[validate(range(min = 1, max = 53, message = "week_number must be 1-53"))]
    pub week_number: i32,
    #[validate(length(min = 1, max = 20, message = "month is required"))]
    pub month: String,
    #[validate(range(min = 2000, max = 2200, message = "year out of range"))]
    pub year: i32,
    pub created_by: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleListResponse {
    pub items: Vec<Schedule>,
    pub total: u32,
}

/// A named event within a schedule, pinned to a weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_code: Option<String>,
    pub schedule_id: i64,
    /// 1-7 for Monday-Sunday
    pub day: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 20, message = "color_code too long"))]
    pub color_code: Option<String>,
    pub schedule_id: i64,
    #[validate(range(min = 1, max = 7, message = "day must be 1-7"))]
    pub day: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventListResponse {
    pub items: Vec<Event>,
    pub total: u32,
}

/// A single staffing shift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: i64,
    pub employee_id: i64,
    pub schedule_id: i64,
    /// 1-7 for Monday-Sunday
    pub day: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateShiftRequest {
    pub employee_id: i64,
    pub schedule_id: i64,
    #[validate(range(min = 1, max = 7, message = "day must be 1-7"))]
    pub day: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub event_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftListResponse {
    pub items: Vec<Shift>,
    pub total: u32,
}

/// A clock-in/clock-out record for one worked shift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeLog {
    pub id: i64,
    pub employee_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<i64>,
    pub clock_in: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_out: Option<DateTime<Utc>>,
    pub break_minutes: i32,
    pub break_skipped: bool,
    pub overtime: bool,
    pub late: bool,
    pub edited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Clock-in request body
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClockInRequest {
    pub employee_id: i64,
    #[serde(default)]
    pub shift_id: Option<i64>,
    /// Whether the clock-in was past the shift start
    #[serde(default)]
    pub late: bool,
}

/// Clock-out request body
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ClockOutRequest {
    #[serde(default)]
    #[validate(range(min = 0, max = 480, message = "break_minutes out of range"))]
    pub break_minutes: i32,
    #[serde(default)]
    pub break_skipped: bool,
    #[serde(default)]
    pub overtime: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeLogListResponse {
    pub items: Vec<TimeLog>,
    pub total: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [
            Role::Guest,
            Role::VenueMember,
            Role::SecurityStaff,
            Role::Manager,
            Role::Supervisor,
        ] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("admin"), None);
    }

    #[test]
    fn role_serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::SecurityStaff).unwrap();
        assert_eq!(json, r#""security_staff""#);
        let parsed: Role = serde_json::from_str(r#""venue_member""#).unwrap();
        assert_eq!(parsed, Role::VenueMember);
    }

    #[test]
    fn create_user_request_defaults_role() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{"first_name":"Ana","last_name":"Reyes","email":"ana@venue.test","password":"pw"}"#,
        )
        .unwrap();
        assert!(req.role.is_none());
    }

    #[test]
    fn user_serialization_has_no_password_field() {
        let user = User {
            id: 1,
            first_name: "Ana".into(),
            last_name: "Reyes".into(),
            email: "ana@venue.test".into(),
            role: Role::Guest,
            approved: false,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert!(value.get("credential").is_none());
    }
}
