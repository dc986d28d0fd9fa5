//! Error handling - every failure becomes a JSON `ErrorResponse`.

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use easel_core::error::{DomainError, RepoError};
use easel_core::ports::{AuthError, UploadError};
use easel_shared::ErrorResponse;
use std::fmt;

/// Application-level error type rendered as a JSON error body.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    Internal(String),
    Validation(Vec<String>),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(message) => ErrorResponse::not_found(message),
            AppError::BadRequest(message) => ErrorResponse::bad_request(message),
            AppError::Unauthorized(message) => ErrorResponse::unauthorized(message),
            AppError::Forbidden(message) => ErrorResponse::forbidden(message),
            AppError::Conflict(message) => ErrorResponse::conflict(message),
            AppError::Internal(detail) => {
                // Details stay in the logs.
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Validation(errors) => {
                ErrorResponse::new(400, "Validation Failed").with_message(errors.join(", "))
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} {} not found", entity_type, id))
            }
            DomainError::Validation(problems) => AppError::Validation(problems),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Unauthorized => AppError::Unauthorized("Invalid credentials".to_string()),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            conflict @ RepoError::Conflict { .. } => AppError::Conflict(conflict.to_string()),
            RepoError::Unavailable(msg) => {
                tracing::error!("Storage unavailable: {}", msg);
                AppError::Internal("Storage error".to_string())
            }
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Io(msg) => AppError::Internal(format!("Upload write failed: {}", msg)),
            rejected => AppError::BadRequest(rejected.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::HashingError(msg) => AppError::Internal(msg),
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("Malformed multipart body: {}", err))
    }
}

/// Render body/query extraction failures in the same JSON shape.
pub fn extractor_error(err: impl fmt::Display, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Fallback for unmatched routes.
pub async fn route_not_found(req: HttpRequest) -> HttpResponse {
    AppError::NotFound(format!("No route for {} {}", req.method(), req.path())).error_response()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
