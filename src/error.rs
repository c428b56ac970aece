//! Error types for task commands
//!
//! None of these are fatal. `EmptyInput` is reported to the user, `NotFound`
//! only escapes strict lookups, and persistence problems leave the in-memory
//! collection authoritative.

use crate::models::TaskId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Task text cannot be empty")]
    EmptyInput,

    #[error("Task not found: {0}")]
    NotFound(TaskId),

    #[error("Failed to persist tasks: {0}")]
    Persistence(String),

    #[error("Failed to parse stored tasks: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TaskError>;
