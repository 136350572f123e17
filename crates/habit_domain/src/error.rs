use thiserror::Error;

use crate::habit::{HabitId, HabitStatus};

/// Bad user input: names, import payloads, illegal status changes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("habit name must not be empty")]
    EmptyName,

    #[error("habit name is {len} characters, at most {max} allowed")]
    NameTooLong { len: usize, max: usize },

    #[error("No habits found")]
    NoHabits,

    #[error("duplicate habit id `{0}`")]
    DuplicateId(HabitId),

    #[error("cannot change habit status from {from} to {to}")]
    InvalidTransition { from: HabitStatus, to: HabitStatus },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid day `{value}`, expected YYYY-MM-DD")]
    Day { value: String },
}

#[derive(Debug, Error)]
pub enum HabitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, HabitError>;
