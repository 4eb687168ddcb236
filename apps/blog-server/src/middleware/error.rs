//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};
use blog_core::error::{DomainError, RepoError};
use blog_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
///
/// Form validation failures are not errors: they are rendered inline with
/// a 200 response by the handlers.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    /// Carries the value of the `Allow` header.
    MethodNotAllowed(&'static str),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::MethodNotAllowed(allowed) => {
                write!(f, "Method not allowed (allowed: {})", allowed)
            }
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            tracing::error!("Internal error: {}", detail);
        }
        self.problem_response(None)
    }
}

impl AppError {
    /// The problem details body, tagged with `request_id` when known.
    pub fn problem_response(&self, request_id: Option<&str>) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());

        let mut error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::MethodNotAllowed(allowed) => {
                builder.insert_header((header::ALLOW, *allowed));
                ErrorResponse::method_not_allowed(allowed)
            }
            AppError::Internal(_) => ErrorResponse::internal_error(),
        };
        if let Some(request_id) = request_id {
            error = error.with_request_id(request_id);
        }

        builder.json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} {} not found", entity_type, key))
            }
            DomainError::Repository(e) => e.into(),
            DomainError::Mail(e) => {
                tracing::error!("Mail gateway error: {}", e);
                AppError::Internal("Mail delivery failed".to_string())
            }
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Constraint(msg) => {
                tracing::error!("Database constraint violation: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
