use thiserror::Error;
use uuid::Uuid;
use warp::reject;

use crate::validation::FieldError;

/// Enumerates high-level errors returned by this library.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Represents an SQL error.
    #[error("SQLx error")]
    Sqlx { source: sqlx::Error },

    /// Represents a submission rejected by the validator.
    #[error("invalid form submission")]
    Validation { errors: Vec<FieldError> },

    /// Represents a submission whose selected event no longer exists.
    #[error("no such event: {0}")]
    NonExistentEvent(Uuid),

    /// Represents a submission without a concrete event selection.
    #[error("no event selected")]
    MissingEventSelection,

    /// Represents a date that could not be parsed from a request.
    #[error("unable to parse date: {0}")]
    InvalidDate(String),

    /// Represents a category outside the configured set.
    #[error("unknown category: {0}")]
    InvalidCategory(String),

    /// Represents an event whose registration window ends before it starts.
    #[error("registration window ends before it starts")]
    InvalidWindow,

    /// Represents a failure to dispatch an email. Never fatal to the
    /// operation that triggered the email.
    #[error("mail dispatch failed: {message}")]
    MailDispatchFailed { message: String },
}

impl reject::Reject for BackendError {}
