use std::path::PathBuf;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Failure of a single task. Captured in its result slot.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskError {
    #[error("Task failed: {message}")]
    Failed {
        message: String,
    },

    #[error("Task panicked: {message}")]
    Panicked {
        message: String,
    },
}

impl TaskError {
    pub fn failed(message: impl Into<String>) -> Self {
        TaskError::Failed { message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Executor setup error: {message}")]
    Setup {
        message: String,
    },

    #[error("Task batch is empty")]
    EmptyBatch,

    #[error("Batch aborted: task {index} (input {input}) failed - {source}")]
    BatchAborted {
        index: usize,
        input: String,
        #[source]
        source: TaskError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File error: {path:?} - {message}")]
    File {
        path: PathBuf,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ExecutorError {
    pub fn setup(message: impl Into<String>) -> Self {
        ExecutorError::Setup { message: message.into() }
    }
}

pub type ParexResult<T> = std::result::Result<T, ExecutorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_aborted_message_names_input() {
        let err = ExecutorError::BatchAborted {
            index: 2,
            input: "700".to_string(),
            source: TaskError::failed("boom"),
        };

        let message = err.to_string();
        assert!(message.contains("task 2"));
        assert!(message.contains("700"));
        assert!(message.contains("boom"));
    }
}
