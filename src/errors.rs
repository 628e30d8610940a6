use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

/// Error taxonomy for the JSON API. Every variant maps to one HTTP status
/// and a `{"error": "..."}` body.
#[derive(Debug)]
pub enum AppError {
    /// Missing/malformed required fields or bad date ranges (400).
    Validation(String),
    /// Bad login or missing/invalid/expired bearer token (401).
    Auth(String),
    /// The operation is not allowed for this target (403).
    Forbidden(String),
    /// Unknown ID (404). Carries the entity-specific message.
    NotFound(String),
    /// Unique-constraint violation (409).
    Conflict(String),
    /// Unexpected store error (500, detail logged only).
    Db(rusqlite::Error),
    /// Connection pool failure (500).
    Pool(r2d2::Error),
    /// Password hashing failure (500).
    Hash(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {msg}"),
            AppError::Auth(msg) => write!(f, "Auth error: {msg}"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            AppError::NotFound(msg) => write!(f, "Not found: {msg}"),
            AppError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Pool(e) => write!(f, "Pool error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(msg) => HttpResponse::BadRequest().json(json!({ "error": msg })),
            AppError::Auth(msg) => HttpResponse::Unauthorized().json(json!({ "error": msg })),
            AppError::Forbidden(msg) => HttpResponse::Forbidden().json(json!({ "error": msg })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({ "error": msg })),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(json!({ "error": msg })),
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError()
                    .json(json!({ "error": "Error interno del servidor" }))
            }
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(err, _) = &e {
            if err.code == rusqlite::ErrorCode::ConstraintViolation {
                return AppError::Conflict("Conflicto con un registro existente".to_string());
            }
        }
        AppError::Db(e)
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        AppError::Pool(e)
    }
}
