//! Failure-to-status mapping for request handlers.

use poem::http::StatusCode;
use sea_orm::{DbErr, SqlErr};

pub fn not_found(what: &str) -> poem::Error {
    poem::Error::from_string(format!("{what} not found"), StatusCode::NOT_FOUND)
}

pub fn conflict(msg: impl Into<String>) -> poem::Error {
    poem::Error::from_string(msg.into(), StatusCode::CONFLICT)
}

pub fn invalid(msg: impl Into<String>) -> poem::Error {
    poem::Error::from_string(msg.into(), StatusCode::BAD_REQUEST)
}

pub fn forbidden(msg: impl Into<String>) -> poem::Error {
    poem::Error::from_string(msg.into(), StatusCode::FORBIDDEN)
}

pub fn internal(msg: impl Into<String>) -> poem::Error {
    poem::Error::from_string(msg.into(), StatusCode::INTERNAL_SERVER_ERROR)
}

/// A unique-key violation means two requests raced on the same pair or
/// duplicated a unique field; everything else is a server fault.
pub fn db(err: DbErr) -> poem::Error {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return poem::Error::from_string("Resource already exists", StatusCode::CONFLICT);
    }
    tracing::warn!(error = %err, "database error");
    poem::Error::from_string(err.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
}
