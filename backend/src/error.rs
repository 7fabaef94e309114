//! Error handling for the StockLink backend
//!
//! Every failure a handler can produce is an [`AppError`]; the
//! [`IntoResponse`] impl maps it to a status code and a JSON body that never
//! carries raw database text.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use stocklink_shared::{LocationError, StockError};
use thiserror::Error;
use utoipa::ToSchema;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    // Validation errors
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Validation failed for {} field(s)", .0.len())]
    ValidationErrors(Vec<FieldError>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Business logic errors
    #[error("Insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: i32, requested: i32 },

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<StockShortage>,
}

/// Figures reported with an `INSUFFICIENT_STOCK` error
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct StockShortage {
    pub available: i32,
    pub requested: i32,
}

/// Field-level validation failure response
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldError>,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl AppError {
    pub fn not_found(resource: &str) -> Self {
        AppError::NotFound(resource.to_string())
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials
            | AppError::TokenExpired
            | AppError::InvalidToken
            | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AppError::Validation { .. }
            | AppError::ValidationErrors(_)
            | AppError::BadRequest(_)
            | AppError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::Internal(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::TokenExpired => "TOKEN_EXPIRED",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::InsufficientPermissions => "FORBIDDEN",
            AppError::Validation { .. } | AppError::ValidationErrors(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::Internal(_) | AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to API clients
    fn public_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => "Invalid username or password".to_string(),
            AppError::TokenExpired => "Token has expired".to_string(),
            AppError::InvalidToken => "Invalid token".to_string(),
            AppError::Unauthorized(message) => message.clone(),
            AppError::InsufficientPermissions => {
                "You do not have permission to perform this action".to_string()
            }
            AppError::Validation { message, .. } => message.clone(),
            AppError::ValidationErrors(_) => "Validation failed".to_string(),
            AppError::BadRequest(message) => message.clone(),
            AppError::NotFound(resource) => format!("{} not found", resource),
            AppError::Conflict(message) => message.clone(),
            AppError::InsufficientStock {
                available,
                requested,
            } => format!(
                "Insufficient stock. Current stock: {}, requested quantity: {}",
                available, requested
            ),
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
            AppError::Internal(_) | AppError::InternalError(_) => {
                "An internal server error occurred".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let code = self.code().to_string();
        match self {
            AppError::ValidationErrors(errors) => {
                (status, Json(ValidationErrorResponse { errors, code })).into_response()
            }
            AppError::Validation { field, message } => (
                status,
                Json(ValidationErrorResponse {
                    errors: vec![FieldError { field, message }],
                    code,
                }),
            )
                .into_response(),
            other => {
                let details = match &other {
                    AppError::InsufficientStock {
                        available,
                        requested,
                    } => Some(StockShortage {
                        available: *available,
                        requested: *requested,
                    }),
                    _ => None,
                };
                let body = ErrorResponse {
                    error: other.public_message(),
                    code,
                    details,
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return AppError::Conflict(unique_violation_message(db_err.constraint()));
            }
            if db_err.is_foreign_key_violation() {
                return AppError::Conflict(
                    "The operation conflicts with a record that references, or is referenced by, this one"
                        .to_string(),
                );
            }
        }
        AppError::DatabaseError(err)
    }
}

fn unique_violation_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("products_reference_key") => "A product with this reference already exists",
        Some("users_username_key") => "Username is already taken",
        Some("locations_warehouse_id_key") => {
            "A location structure already exists for this warehouse. Use PUT to replace it."
        }
        _ => "A record with the same unique value already exists",
    }
    .to_string()
}

impl From<StockError> for AppError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::InsufficientStock {
                available,
                requested,
            } => AppError::InsufficientStock {
                available,
                requested,
            },
            StockError::NonPositiveQuantity(_) | StockError::Overflow { .. } => {
                AppError::validation("quantity", err.to_string())
            }
            StockError::NegativeStock { .. } => AppError::Internal(err.to_string()),
        }
    }
}

impl From<LocationError> for AppError {
    fn from(err: LocationError) -> Self {
        AppError::validation("zones", err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| FieldError {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", err.code)),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::ValidationErrors(fields)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::TokenExpired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InsufficientPermissions.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("Product").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Conflict("dup".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::validation("quantity", "bad").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        assert_eq!(
            AppError::Internal("connection refused at 10.0.0.3".into()).public_message(),
            "An internal server error occurred"
        );
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound).public_message(),
            "A database error occurred"
        );
    }

    #[test]
    fn test_stock_error_conversion() {
        let err: AppError = StockError::InsufficientStock {
            available: 10,
            requested: 50,
        }
        .into();
        assert!(matches!(
            err,
            AppError::InsufficientStock {
                available: 10,
                requested: 50
            }
        ));

        let err: AppError = StockError::NonPositiveQuantity(0).into();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "quantity"));
    }

    #[test]
    fn test_unique_violation_messages() {
        assert!(unique_violation_message(Some("users_username_key")).contains("Username"));
        assert!(unique_violation_message(None).contains("already exists"));
    }
}
