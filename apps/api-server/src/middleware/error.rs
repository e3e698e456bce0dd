//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use cadence_core::DomainError;
use cadence_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Refused transition or lost race, with the states involved if known.
    #[error("Conflict: {detail}")]
    Conflict {
        detail: String,
        current: Option<String>,
        target: Option<String>,
    },

    /// Legal transition whose precondition failed.
    #[error("Unprocessable: {detail}")]
    Precondition {
        detail: String,
        current: String,
        target: Option<String>,
    },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Validation errors: {0:?}")]
    Validation(Vec<String>),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Precondition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Conflict {
                detail,
                current,
                target,
            } => {
                let body = ErrorResponse::conflict(detail);
                match current {
                    Some(current) => body.with_transition(current, target.clone()),
                    None => body,
                }
            }
            AppError::Precondition {
                detail,
                current,
                target,
            } => ErrorResponse::unprocessable(detail).with_transition(current, target.clone()),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Validation(errors) => ErrorResponse::unprocessable(errors.join(", ")),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        let detail = err.to_string();
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            DomainError::Validation(msg) => AppError::Validation(vec![msg]),
            DomainError::InvalidState {
                current, target, ..
            } => AppError::Conflict {
                detail,
                current: Some(current.to_string()),
                target: target.map(|t| t.to_string()),
            },
            DomainError::GuardFailed {
                current, target, ..
            } => AppError::Precondition {
                detail,
                current: current.to_string(),
                target: target.map(|t| t.to_string()),
            },
            DomainError::Conflict { .. } => AppError::Conflict {
                detail,
                current: None,
                target: None,
            },
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
