//! # API Error Type
//!
//! Unified error type for server actions and HTTP routes.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Mesa POS                               │
//! │                                                                         │
//! │  Front end                   Rust Backend                               │
//! │  ─────────                   ────────────                               │
//! │                                                                         │
//! │  POST /api/tables                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Server Action                                                   │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Validation Error? ─── ValidationError ──────────┐              │  │
//! │  │         │                                        │              │  │
//! │  │         ▼                                        ▼              │  │
//! │  │  Business Rule? ──── CoreError ──────────────► ApiError ───────►│  │
//! │  │         │                                        ▲              │  │
//! │  │         ▼                                        │              │  │
//! │  │  Database Error? ─── DbError (unique / FK / 404) ┘              │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄──── 409 { "error": "Table number 4 already exists",                  │
//! │              "code": "DUPLICATE" }                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unknown failures are logged with full detail and reach the client only
//! as [`GENERIC_ERROR_MESSAGE`].

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use mesa_core::{CoreError, ValidationError};
use mesa_db::DbError;

/// Message returned for every error the client cannot act on.
pub const GENERIC_ERROR_MESSAGE: &str =
    "An unexpected error occurred. Please check the server logs.";

/// Result type for server actions.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error returned from server actions.
///
/// ## Serialization
/// ```json
/// {
///   "error": "Category 'Drinks' already exists",
///   "code": "DUPLICATE"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Human-readable error message for display
    #[serde(rename = "error")]
    pub message: String,

    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Resource not found (404)
    NotFound,

    /// Unique value already taken (409)
    Duplicate,

    /// Record still referenced by others (409)
    InUse,

    /// Table already has an open order (409)
    TableOccupied,

    /// Business rule violated (422)
    BusinessRule,

    /// Payment rejected (422)
    PaymentError,

    /// Print server unreachable or failed (502)
    PrintServer,

    /// Anything else (500)
    Internal,
}

impl ErrorCode {
    /// HTTP status for this class of error.
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Duplicate | ErrorCode::InUse | ErrorCode::TableOccupied => {
                StatusCode::CONFLICT
            }
            ErrorCode::BusinessRule | ErrorCode::PaymentError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::PrintServer => StatusCode::BAD_GATEWAY,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            code,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a duplicate-value error.
    pub fn duplicate(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Duplicate, message)
    }

    /// Creates an "in use" error.
    pub fn in_use(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InUse, message)
    }

    /// Creates a print server error.
    pub fn print_server(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::PrintServer, message)
    }

    /// Logs `detail` and returns the generic error.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Unexpected server error");
        ApiError::new(ErrorCode::Internal, GENERIC_ERROR_MESSAGE)
    }

    /// Converts a database error, replacing a foreign-key violation with `message`.
    pub fn from_db_in_use(err: DbError, message: impl Into<String>) -> Self {
        match err {
            DbError::ForeignKeyViolation { .. } => ApiError::in_use(message),
            other => other.into(),
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                tracing::warn!(field = %field, "Unique constraint violated");
                if value == "unknown" {
                    ApiError::duplicate("A record with the same value already exists")
                } else {
                    ApiError::duplicate(format!("{} '{}' already exists", field, value))
                }
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!(detail = %message, "Foreign key violation");
                ApiError::in_use("This record is in use by other records")
            }
            DbError::Rule(e) => e.into(),
            other => ApiError::internal(other),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::OrderClosed { .. }
            | CoreError::InvalidDeliveryTransition { .. }
            | CoreError::OrderTooLarge { .. }
            | CoreError::NegativeLine { .. }
            | CoreError::AmountOverflow => {
                ApiError::new(ErrorCode::BusinessRule, err.to_string())
            }
            CoreError::TableOccupied { .. } => {
                ApiError::new(ErrorCode::TableOccupied, err.to_string())
            }
            CoreError::InvalidPayment { .. } => {
                ApiError::new(ErrorCode::PaymentError, err.to_string())
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

// =============================================================================
// Delete Result
// =============================================================================

/// Outcome of a delete action.
///
/// ```json
/// { "success": false, "error": "Category has 3 menu items and cannot be deleted" }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResult {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip)]
    status: StatusCode,
}

impl From<ApiResult<()>> for DeleteResult {
    fn from(result: ApiResult<()>) -> Self {
        match result {
            Ok(()) => DeleteResult {
                success: true,
                error: None,
                status: StatusCode::OK,
            },
            Err(e) => DeleteResult {
                success: false,
                status: e.status(),
                error: Some(e.message),
            },
        }
    }
}

impl IntoResponse for DeleteResult {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesa_core::{DeliveryStatus, OrderStatus};

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::duplicate("Table number 4 already exists");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error"], "Table number 4 already exists");
        assert_eq!(json["code"], "DUPLICATE");
    }

    #[test]
    fn test_db_error_mapping() {
        let err: ApiError = DbError::not_found("Table", "t-1").into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = DbError::ForeignKeyViolation {
            message: "FOREIGN KEY constraint failed".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::InUse);

        let err: ApiError = DbError::QueryFailed("disk I/O error".to_string()).into();
        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.message, GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = DbError::Rule(CoreError::OrderClosed {
            order_id: "o-1".to_string(),
            status: OrderStatus::Paid,
        })
        .into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = CoreError::InvalidDeliveryTransition {
            from: DeliveryStatus::Delivered,
            to: DeliveryStatus::Ready,
        }
        .into();
        assert_eq!(err.code, ErrorCode::BusinessRule);

        let err: ApiError = CoreError::TableOccupied { table_number: 3 }.into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_delete_result() {
        let ok = DeleteResult::from(Ok(()));
        assert_eq!(serde_json::to_value(&ok).unwrap(), serde_json::json!({ "success": true }));

        let failed = DeleteResult::from(Err(ApiError::in_use("Role is in use")));
        assert!(!failed.success);
        assert_eq!(failed.status, StatusCode::CONFLICT);
        assert_eq!(failed.error.as_deref(), Some("Role is in use"));
    }
}
