use appointments::AppointmentError;
use auth_identity::IdentityError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use provider_directory::DirectoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

/// Standard API error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Unique error ID for log correlation.
    pub error_id: String,
    /// Error type/code.
    pub error_type: String,
    /// Human-readable error message.
    pub message: String,
    /// Timestamp when the error occurred.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Main API error enum. Each variant maps to one HTTP status; `Internal`
/// carries detail for the log and surfaces an opaque message.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    Authentication { message: String },

    #[error("{message}")]
    PendingApproval { message: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("{message}")]
    BadRequest { message: String },

    #[error("{message}")]
    DeliveryFailure { message: String },

    #[error("Internal server error")]
    Internal { message: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            ApiError::PendingApproval { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::DeliveryFailure { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The error type string carried in the response body.
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation_error",
            ApiError::Authentication { .. } => "authentication_error",
            ApiError::PendingApproval { .. } => "pending_approval",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Conflict { .. } => "conflict",
            ApiError::BadRequest { .. } => "bad_request",
            ApiError::DeliveryFailure { .. } => "delivery_failure",
            ApiError::Internal { .. } => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        match &self {
            ApiError::Internal { message } => {
                // The detail goes to the log; the caller gets an opaque 500.
                error!(
                    error_id = %error_id,
                    error_type = %self.error_type(),
                    detail = %message,
                    "internal error"
                );
            }
            other => {
                debug!(
                    error_id = %error_id,
                    error_type = %other.error_type(),
                    status_code = %status_code.as_u16(),
                    error = %other,
                    "request failed"
                );
            }
        }

        let body = ApiErrorResponse {
            error_id,
            error_type: self.error_type().to_string(),
            message: self.to_string(),
            timestamp: chrono::Utc::now(),
        };
        (status_code, Json(body)).into_response()
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::EmailAlreadyRegistered => ApiError::Conflict {
                message: err.to_string(),
            },
            IdentityError::InvalidCredentials => ApiError::Authentication {
                message: err.to_string(),
            },
            IdentityError::PendingApproval => ApiError::PendingApproval {
                message: err.to_string(),
            },
            IdentityError::UserNotFound => ApiError::not_found("User"),
            IdentityError::InvalidOrExpiredToken => ApiError::BadRequest {
                message: err.to_string(),
            },
            IdentityError::InvalidToken => {
                ApiError::authentication("Invalid or expired bearer token")
            }
            IdentityError::DeliveryFailure => ApiError::DeliveryFailure {
                message: err.to_string(),
            },
            IdentityError::Hashing | IdentityError::TokenSigning(_) => ApiError::Internal {
                message: err.to_string(),
            },
            IdentityError::Database(source) => ApiError::Internal {
                message: source.to_string(),
            },
        }
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::DoctorNotFound => ApiError::not_found("Doctor"),
            DirectoryError::Store(source) => ApiError::from(source),
        }
    }
}

impl From<AppointmentError> for ApiError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound => ApiError::not_found("Appointment"),
            AppointmentError::Validation(message) => ApiError::Validation { message },
            AppointmentError::Store(source) => ApiError::from(source),
            AppointmentError::Database(source) => ApiError::Internal {
                message: source.to_string(),
            },
        }
    }
}

/// Type alias for API results.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        assert_eq!(
            ApiError::from(IdentityError::EmailAlreadyRegistered).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(IdentityError::InvalidCredentials).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(IdentityError::PendingApproval).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(IdentityError::InvalidOrExpiredToken).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(IdentityError::DeliveryFailure).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(DirectoryError::DoctorNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn internal_errors_do_not_leak_detail() {
        let err = ApiError::internal("connection pool exhausted on shard 3");
        assert_eq!(err.to_string(), "Internal server error");
    }
}
