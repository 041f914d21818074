use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the store adapters. Duplicate-key violations get their
/// own variant so services can translate a lost uniqueness race into the same
/// business outcome the pre-check would have produced.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Duplicate(db_err.message().to_string())
            }
            other => StoreError::Database(other.to_string()),
        }
    }
}

/// Input validation failures. Rejected before any storage access and returned
/// to the caller as a 400; never logged as system faults.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("invalid email address")]
    InvalidEmail,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("at least one question is required")]
    NoQuestions,

    #[error("question {index}: text must not be empty")]
    EmptyQuestionText { index: usize },

    #[error("question {index}: at least {min} options are required")]
    TooFewOptions { index: usize, min: usize },

    #[error("question {index}: options must not be empty")]
    EmptyOption { index: usize },

    #[error("question {index}: answer must not be empty")]
    EmptyAnswer { index: usize },

    #[error("question {index}: answer must be one of the options")]
    AnswerNotInOptions { index: usize },

    #[error("start time must be before end time")]
    InvalidTimeWindow,
}

/// Password hashing and verification errors.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("failed to hash password: {0}")]
    Hashing(String),

    #[error("invalid password hash format: {0}")]
    InvalidFormat(String),
}

/// Structured failure body returned for every non-success outcome:
/// `{"success": false, "code": "...", "message": "..."}`.
#[derive(Debug, Serialize)]
pub struct FailureBody {
    pub success: bool,
    pub code: &'static str,
    pub message: String,
}

pub fn failure(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(FailureBody {
            success: false,
            code,
            message: message.into(),
        }),
    )
        .into_response()
}
