//! Server error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shiftboard_api_contract::ProblemDetails;

/// Server result type
pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Convert error to Problem+JSON response
    pub fn to_problem(&self) -> ProblemDetails {
        match self {
            ServerError::Auth(msg) => ProblemDetails {
                problem_type: "https://docs.shiftboard.dev/errors/auth".to_string(),
                title: "Authentication Failed".to_string(),
                status: Some(StatusCode::UNAUTHORIZED.as_u16()),
                detail: msg.clone(),
                errors: Default::default(),
            },
            ServerError::Forbidden(msg) => ProblemDetails {
                problem_type: "https://docs.shiftboard.dev/errors/forbidden".to_string(),
                title: "Forbidden".to_string(),
                status: Some(StatusCode::FORBIDDEN.as_u16()),
                detail: msg.clone(),
                errors: Default::default(),
            },
            ServerError::NotFound(what) => ProblemDetails {
                problem_type: "https://docs.shiftboard.dev/errors/not-found".to_string(),
                title: "Not Found".to_string(),
                status: Some(StatusCode::NOT_FOUND.as_u16()),
                detail: format!("{} not found", what),
                errors: Default::default(),
            },
            ServerError::Conflict(msg) => ProblemDetails {
                problem_type: "https://docs.shiftboard.dev/errors/conflict".to_string(),
                title: "Conflict".to_string(),
                status: Some(StatusCode::CONFLICT.as_u16()),
                detail: msg.clone(),
                errors: Default::default(),
            },
            ServerError::BadRequest(msg) => ProblemDetails {
                problem_type: "https://docs.shiftboard.dev/errors/bad-request".to_string(),
                title: "Bad Request".to_string(),
                status: Some(StatusCode::BAD_REQUEST.as_u16()),
                detail: msg.clone(),
                errors: Default::default(),
            },
            ServerError::Validation(errors) => ProblemDetails {
                problem_type: "https://docs.shiftboard.dev/errors/validation".to_string(),
                title: "Validation Error".to_string(),
                status: Some(StatusCode::BAD_REQUEST.as_u16()),
                detail: "Request validation failed".to_string(),
                errors: errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errs)| {
                        let messages = errs
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            })
                            .collect();
                        (field.to_string(), messages)
                    })
                    .collect(),
            },
            ServerError::Database(msg) => ProblemDetails {
                problem_type: "https://docs.shiftboard.dev/errors/database".to_string(),
                title: "Database Error".to_string(),
                status: Some(StatusCode::INTERNAL_SERVER_ERROR.as_u16()),
                detail: format!("Database operation failed: {}", msg),
                errors: Default::default(),
            },
            ServerError::Internal(msg) => ProblemDetails {
                problem_type: "https://docs.shiftboard.dev/errors/internal".to_string(),
                title: "Internal Server Error".to_string(),
                status: Some(StatusCode::INTERNAL_SERVER_ERROR.as_u16()),
                detail: msg.clone(),
                errors: Default::default(),
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let problem = self.to_problem();
        let status = StatusCode::from_u16(problem.status.unwrap_or(500))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(problem)).into_response()
    }
}

/// Map persistence errors onto HTTP semantics: unique-constraint hits are
/// conflicts, missing rows are 404s, dangling references are caller mistakes.
impl From<shiftboard_db::Error> for ServerError {
    fn from(err: shiftboard_db::Error) -> Self {
        match err {
            shiftboard_db::Error::Duplicate { entity, value } => {
                ServerError::Conflict(format!("{} '{}' already exists", entity, value))
            }
            shiftboard_db::Error::NotFound { entity, id } => {
                ServerError::NotFound(format!("{} {}", entity, id))
            }
            shiftboard_db::Error::ForeignKey { entity } => {
                ServerError::BadRequest(format!("{} references a missing record", entity))
            }
            shiftboard_db::Error::AlreadyClosed { entity, id } => {
                ServerError::Conflict(format!("{} {} is already closed", entity, id))
            }
            shiftboard_db::Error::InUse { entity } => {
                ServerError::Conflict(format!("{} is still referenced by other records", entity))
            }
            other => ServerError::Database(other.to_string()),
        }
    }
}

/// Contract-level validation failures are client errors.
impl From<shiftboard_api_contract::ApiContractError> for ServerError {
    fn from(err: shiftboard_api_contract::ApiContractError) -> Self {
        match err {
            shiftboard_api_contract::ApiContractError::Validation(errors) => {
                ServerError::Validation(errors)
            }
            other => ServerError::BadRequest(other.to_string()),
        }
    }
}

/// Convert any error to ServerError
impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}

/// Convert IO errors
impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_duplicate_becomes_conflict() {
        let err: ServerError = shiftboard_db::Error::Duplicate {
            entity: "user",
            value: "ana@venue.test".into(),
        }
        .into();
        assert_eq!(err.to_problem().status, Some(409));
    }

    #[test]
    fn db_not_found_becomes_404() {
        let err: ServerError = shiftboard_db::Error::NotFound {
            entity: "time log",
            id: 3,
        }
        .into();
        assert_eq!(err.to_problem().status, Some(404));
    }

    #[test]
    fn db_already_closed_becomes_conflict() {
        let err: ServerError = shiftboard_db::Error::AlreadyClosed {
            entity: "time log",
            id: 3,
        }
        .into();
        assert_eq!(err.to_problem().status, Some(409));
    }

    #[test]
    fn db_in_use_becomes_conflict() {
        let err: ServerError = shiftboard_db::Error::InUse { entity: "user" }.into();
        assert_eq!(err.to_problem().status, Some(409));
    }

    #[test]
    fn validation_errors_carry_field_messages() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("email".into(), validator::ValidationError::new("email"));
        let problem = ServerError::Validation(errors).to_problem();
        assert_eq!(problem.status, Some(400));
        assert!(problem.errors.contains_key("email"));
    }
}
