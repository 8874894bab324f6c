//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`PlayGuardError`] via `#[from]` (no stringly-typed variants at the
//! boundary).

/// Top-level error crossing port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum PlayGuardError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("entity_id must not be empty")]
    EmptyEntityId,

    #[error("entity_id {0:?} must have the form `domain.object_id`")]
    MalformedEntityId(String),

    #[error("invalid identifier {0:?}")]
    InvalidId(String),

    #[error("integration must not be empty")]
    EmptyIntegration,

    #[error("unique_id must not be empty")]
    EmptyUniqueId,

    #[error("invalid time of day")]
    InvalidTimeOfDay(#[from] TimeOfDayError),

    #[error("service {service:?} requires a {field:?} field")]
    MissingServiceField {
        service: String,
        field: &'static str,
    },

    #[error("text value is {len} characters long, at most {max} allowed")]
    TextTooLong { len: usize, max: usize },
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Failure to build or parse a [`TimeOfDay`](crate::time::TimeOfDay).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeOfDayError {
    #[error("time of day is empty")]
    Empty,

    #[error("time of day {0:?} is not of the form HH:MM[:SS]")]
    Malformed(String),

    #[error("hour {0} is out of range 0-23")]
    HourOutOfRange(u32),

    #[error("minute {0} is out of range 0-59")]
    MinuteOutOfRange(u32),

    #[error("second {0} is out of range 0-59")]
    SecondOutOfRange(u32),
}

/// A control record could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    #[error("allowed window is missing or malformed")]
    MissingWindow,
}
