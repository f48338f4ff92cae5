//! HTTP error mapping.
//!
//! Every failure leaves the API as `{success: false, message, type, ...context}`.
//! [`ApiError`] is the single conversion point from [`noted_core::Error`] to a
//! status code and body.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use sqlx::error::ErrorKind;
use thiserror::Error;
use tracing::{error, warn};

use noted_core::validation::EXAMPLE_NOTE_ID;
use noted_core::ValidationError;

/// `type` values of the error body.
pub mod kind {
    pub const VALIDATION: &str = "Validation Error";
    pub const NOT_FOUND: &str = "Not Found";
    pub const DUPLICATE: &str = "Duplicate Error";
    pub const REFERENCE: &str = "Reference Error";
    pub const PARSE: &str = "Parse Error";
    pub const SIZE: &str = "Size Error";
    pub const DATABASE: &str = "Database Error";
    pub const INTERNAL: &str = "Internal Server Error";
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Payload or query parameter rejected.
    #[error("{0}")]
    Validation(ValidationError),

    /// Path identifier is not a UUID.
    #[error("Invalid note ID format: {0}")]
    InvalidId(String),

    /// A request-level precondition failed (e.g. missing search term).
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Unique constraint violated; carries the constraint name.
    #[error("Duplicate value for {0}")]
    Duplicate(String),

    #[error("Invalid reference to related resource")]
    Reference,

    #[error("Invalid JSON format in request body")]
    Parse,

    #[error("Request entity too large")]
    PayloadTooLarge,

    /// The store is unreachable; carries the underlying error text.
    #[error("Database connection error: {0}")]
    DatabaseUnavailable(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

/// Body and underlying cause of a 500 response, kept on the response so
/// [`attach_error_detail`] can expose the cause in development.
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    body: Map<String, Value>,
    detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::InvalidId(_)
            | ApiError::BadRequest(_)
            | ApiError::Duplicate(_)
            | ApiError::Reference
            | ApiError::Parse => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::DatabaseUnavailable(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The `type` field of the response body.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) | ApiError::InvalidId(_) | ApiError::BadRequest(_) => {
                kind::VALIDATION
            }
            ApiError::NotFound(_) => kind::NOT_FOUND,
            ApiError::Duplicate(_) => kind::DUPLICATE,
            ApiError::Reference => kind::REFERENCE,
            ApiError::Parse => kind::PARSE,
            ApiError::PayloadTooLarge => kind::SIZE,
            ApiError::DatabaseUnavailable(_) => kind::DATABASE,
            ApiError::Internal(_) => kind::INTERNAL,
        }
    }

    /// Client-facing message. Server-side causes are never included here.
    pub fn message(&self) -> String {
        match self {
            ApiError::Validation(err) => err.message.clone(),
            ApiError::InvalidId(_) => "Invalid note ID format".to_string(),
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => msg.clone(),
            ApiError::DatabaseUnavailable(_) => "Database connection error".to_string(),
            ApiError::Internal(_) => kind::INTERNAL.to_string(),
            other => other.to_string(),
        }
    }

    fn body(&self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("success".into(), Value::Bool(false));
        body.insert("message".into(), Value::String(self.message()));
        body.insert("type".into(), Value::String(self.kind().to_string()));

        match self {
            ApiError::Validation(err) => {
                for (key, value) in &err.context {
                    body.insert(key.clone(), value.clone());
                }
            }
            ApiError::InvalidId(raw) => {
                body.insert("received".into(), Value::String(raw.clone()));
                body.insert(
                    "expected".into(),
                    Value::String(format!("UUID format (e.g., {})", EXAMPLE_NOTE_ID)),
                );
            }
            _ => {}
        }
        body
    }

    fn detail(&self) -> Option<&str> {
        match self {
            ApiError::DatabaseUnavailable(detail) | ApiError::Internal(detail) => Some(detail),
            _ => None,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<noted_core::Error> for ApiError {
    fn from(err: noted_core::Error) -> Self {
        match err {
            noted_core::Error::Validation(err) => ApiError::Validation(err),
            noted_core::Error::InvalidIdentifier(raw) => ApiError::InvalidId(raw),
            noted_core::Error::NoteNotFound(_) => ApiError::NotFound("Note not found".to_string()),
            noted_core::Error::Database(err) => ApiError::from(err),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Note not found".to_string()),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => ApiError::Duplicate(
                    db_err.constraint().unwrap_or("field").to_string(),
                ),
                ErrorKind::ForeignKeyViolation => ApiError::Reference,
                ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                    ApiError::BadRequest(db_err.message().to_string())
                }
                _ => ApiError::Internal(err.to_string()),
            },
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::WorkerCrashed => ApiError::DatabaseUnavailable(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                subsystem = "api",
                component = "error",
                error_type = self.kind(),
                error = %self,
                "Request failed"
            );
        } else {
            warn!(
                subsystem = "api",
                component = "error",
                status = status.as_u16(),
                error_type = self.kind(),
                error = %self,
                "Request rejected"
            );
        }

        let body = self.body();
        let detail = self.detail().map(str::to_string);
        let mut response = (status, Json(Value::Object(body.clone()))).into_response();
        if let Some(detail) = detail {
            response
                .extensions_mut()
                .insert(ErrorDetail { body, detail });
        }
        response
    }
}

/// Middleware (installed in development only) that adds the underlying cause
/// of a 500 response to its body as `detail`.
pub async fn attach_error_detail(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let Some(ErrorDetail { mut body, detail }) = response.extensions().get::<ErrorDetail>().cloned()
    else {
        return response;
    };

    let status = response.status();
    body.insert("detail".into(), Value::String(detail));
    let mut rebuilt = (status, Json(Value::Object(body))).into_response();
    for (name, value) in response.headers() {
        if name != axum::http::header::CONTENT_LENGTH {
            rebuilt.headers_mut().insert(name.clone(), value.clone());
        }
    }
    rebuilt
}

/// Body of the 404 fallback.
pub fn route_not_found_body(path: &str) -> Value {
    json!({
        "success": false,
        "message": "Route not found",
        "path": path,
        "suggested": "check /api-docs for available endpoints",
    })
}
