use super::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::r2d2;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Errors returned by handlers. Every variant renders as an `ErrorResponse` body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        field: Option<&'static str>,
        message: String,
    },

    #[error("Authentication credentials were not provided")]
    Unauthorized,

    #[error("You do not have permission to perform this action")]
    Forbidden,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    /// Server-side fault unrelated to the database, e.g. password hashing
    #[error("{0}")]
    Internal(String),

    #[error("Database connection failed")]
    Pool(#[from] r2d2::PoolError),

    #[error("Database error: {0}")]
    Database(#[from] DieselError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: Some(field),
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) | ApiError::Database(DieselError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) | ApiError::Pool(_) | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<argon2::password_hash::Error> for ApiError {
    fn from(err: argon2::password_hash::Error) -> Self {
        ApiError::Internal(format!("Failed to hash password: {err}"))
    }
}

/// True when a write lost a race against a unique constraint.
pub fn is_unique_violation(err: &DieselError) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::Validation { field, message } => ErrorResponse {
                error: message,
                field: field.map(str::to_string),
            },
            ApiError::Database(DieselError::NotFound) => ErrorResponse::new("Not found"),
            ApiError::Pool(e) => {
                tracing::error!("Failed to get database connection: {}", e);
                ErrorResponse::new("Database connection failed")
            }
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                ErrorResponse::new("Internal server error")
            }
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::new("Internal server error")
            }
            other => ErrorResponse::new(other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::validation("name", "required").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("Recipe not found").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("Recipe is already in favorites").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Database(DieselError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Database(DieselError::RollbackTransaction).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Internal("hashing failed".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_hashing_failure_is_server_error() {
        let err = ApiError::from(argon2::password_hash::Error::Algorithm);
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response = ApiError::Internal("argon2 exploded".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Internal server error"}));
    }

    #[test]
    fn test_validation_message() {
        let err = ApiError::validation("cooking_time", "Cooking time must be at least 1 minute");
        assert_eq!(err.to_string(), "Cooking time must be at least 1 minute");
    }

    #[test]
    fn test_unique_violation_detection() {
        assert!(!is_unique_violation(&DieselError::NotFound));
        assert!(!is_unique_violation(&DieselError::RollbackTransaction));
    }
}
