// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown criteria type: {0}")]
    UnknownCriteriaType(i32),

    #[error("Criterion {id} has type {actual}, expected {expected}")]
    CriteriaTypeMismatch {
        id: i64,
        expected: String,
        actual: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
