//! Crate-wide error type.

use thiserror::Error;

use crate::model::TaskId;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Task id {0} is already in use")]
    DuplicateId(TaskId),

    #[error("Dependency {successor} -> {predecessor} would create a cycle")]
    DependencyCycle {
        successor: TaskId,
        predecessor: TaskId,
    },

    #[error("Task {successor} cannot depend on {predecessor}: {reason}")]
    InvalidDependency {
        successor: TaskId,
        predecessor: TaskId,
        reason: &'static str,
    },

    #[error("Cannot move task {task} under {parent}: target is inside its own subtree")]
    InvalidReparent { task: TaskId, parent: TaskId },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
