//! Validation helpers for API contract types

use crate::error::ApiContractError;
use crate::types::*;
use validator::Validate;

/// Validate a login request
pub fn validate_login_request(request: &LoginRequest) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Validate a registration request
pub fn validate_create_user_request(request: &CreateUserRequest) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Validate a schedule creation request
pub fn validate_create_schedule_request(
    request: &CreateScheduleRequest,
) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Validate a shift creation request
///
/// Beyond the derive-level field checks, the shift must not end before it
/// starts.
pub fn validate_create_shift_request(
    request: &CreateShiftRequest,
) -> Result<(), ApiContractError> {
    request.validate()?;
    if request.end_time <= request.start_time {
        let mut errors = validator::ValidationErrors::new();
        errors.add(
            "end_time".into(),
            validator::ValidationError::new("end_before_start"),
        );
        return Err(ApiContractError::Validation(errors));
    }
    Ok(())
}
