use thiserror::Error;
use uuid::Uuid;

use crate::schedule::Frequency;

pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Error type covering validation, scheduling, and persistence failures.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("{frequency} recurrence requires `{field}`")]
    MissingFrequencyField {
        frequency: Frequency,
        field: &'static str,
    },
    #[error("`{field}` out of range: {value}")]
    FieldOutOfRange { field: &'static str, value: u32 },
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(f64),
    #[error("interval must be positive, got {0}")]
    NonPositiveInterval(u32),
    #[error("unknown frequency: {0}")]
    InvalidFrequency(String),
    #[error("recurrence {0} is inactive")]
    InactiveRecurrence(Uuid),
    #[error("recurrence not found: {0}")]
    NotFound(Uuid),
    #[error("transaction failed: {0}")]
    Transaction(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
