use poem_openapi::{payload::Json, ApiResponse};

use crate::errors::internal::{DatabaseError, DirectoryError, InternalError, UserError};
use crate::types::dto::common::ErrorResponse;

/// API error responses shared by all endpoints
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Request payload failed validation
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Missing, malformed or expired token
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Authenticated identity lacks a required role
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Requested entity does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Concurrent modification detected
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(Json(ErrorResponse {
            error: "bad_request".to_string(),
            message: message.into(),
            status_code: 400,
        }))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(Json(ErrorResponse {
            error: "unauthorized".to_string(),
            message: message.into(),
            status_code: 401,
        }))
    }

    pub fn forbidden() -> Self {
        ApiError::Forbidden(Json(ErrorResponse {
            error: "forbidden".to_string(),
            message: "Insufficient role for this operation".to_string(),
            status_code: 403,
        }))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(Json(ErrorResponse {
            error: "not_found".to_string(),
            message: message.into(),
            status_code: 404,
        }))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(Json(ErrorResponse {
            error: "conflict".to_string(),
            message: message.into(),
            status_code: 409,
        }))
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        ApiError::InternalError(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: message.into(),
            status_code: 500,
        }))
    }
}

impl From<InternalError> for ApiError {
    fn from(err: InternalError) -> Self {
        match &err {
            InternalError::Directory(DirectoryError::EmployeeNotFound { .. })
            | InternalError::Directory(DirectoryError::DepartmentNotFound { .. }) => {
                ApiError::not_found(err.to_string())
            }
            InternalError::Directory(DirectoryError::DuplicateEmployeeEmail { .. })
            | InternalError::Directory(DirectoryError::DuplicateDepartmentName { .. })
            | InternalError::Directory(DirectoryError::InvalidStatus { .. })
            | InternalError::Directory(DirectoryError::InvalidDate { .. }) => {
                ApiError::bad_request(err.to_string())
            }
            InternalError::Database(DatabaseError::VersionConflict { .. }) => {
                ApiError::conflict(err.to_string())
            }
            InternalError::User(UserError::DefaultRoleMissing { .. }) => {
                // Fatal configuration error, details stay in the log
                tracing::error!("Authority resolution failed: {}", err);
                ApiError::internal_error("Authentication configuration error")
            }
            _ => {
                tracing::error!("Internal error: {}", err);
                ApiError::internal_error("Internal server error")
            }
        }
    }
}
