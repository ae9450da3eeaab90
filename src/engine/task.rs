// src/engine/task.rs
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{ParexResult, ExecutorError, TaskError};
use super::config::ExecutionMode;

/// Shared task function
pub type TaskFn<I, O> = Arc<dyn Fn(&I) -> Result<O, TaskError> + Send + Sync>;

/// A unit of work: an input and the pure function applied to it
pub struct Task<I, O> {
    input: I,
    func: TaskFn<I, O>,
}

impl<I, O> Task<I, O> {
    pub fn new<F>(input: I, func: F) -> Self
    where
        F: Fn(&I) -> Result<O, TaskError> + Send + Sync + 'static,
    {
        Self {
            input,
            func: Arc::new(func),
        }
    }

    /// Build a task around an already shared function
    pub fn with_shared(input: I, func: TaskFn<I, O>) -> Self {
        Self { input, func }
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub(crate) fn run(&self) -> Result<O, TaskError> {
        (self.func)(&self.input)
    }

    pub(crate) fn into_input(self) -> I {
        self.input
    }
}

impl<I: fmt::Debug, O> fmt::Debug for Task<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").field("input", &self.input).finish_non_exhaustive()
    }
}

/// Ordered sequence of tasks submitted together
pub struct TaskBatch<I, O> {
    tasks: Vec<Task<I, O>>,
}

impl<I, O> TaskBatch<I, O> {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Every input gets the same function
    pub fn from_inputs<F>(inputs: impl IntoIterator<Item = I>, func: F) -> Self
    where
        F: Fn(&I) -> Result<O, TaskError> + Send + Sync + 'static,
    {
        let func: TaskFn<I, O> = Arc::new(func);
        let tasks = inputs
            .into_iter()
            .map(|input| Task::with_shared(input, func.clone()))
            .collect();
        Self { tasks }
    }

    pub fn push(&mut self, task: Task<I, O>) {
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn inputs(&self) -> impl Iterator<Item = &I> {
        self.tasks.iter().map(Task::input)
    }

    pub(crate) fn into_tasks(self) -> Vec<Task<I, O>> {
        self.tasks
    }
}

impl<I, O> Default for TaskBatch<I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, O> FromIterator<Task<I, O>> for TaskBatch<I, O> {
    fn from_iter<T: IntoIterator<Item = Task<I, O>>>(iter: T) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}

/// Status of a finished task
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    Completed,
    Failed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Result of one task, positioned at its submission index
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionResult<I, O> {
    pub index: usize,
    pub input: I,
    pub outcome: Result<O, TaskError>,
    pub execution_time: Duration,
}

impl<I, O> ExecutionResult<I, O> {
    pub fn status(&self) -> TaskStatus {
        match self.outcome {
            Ok(_) => TaskStatus::Completed,
            Err(_) => TaskStatus::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn output(&self) -> Option<&O> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&TaskError> {
        self.outcome.as_ref().err()
    }
}

/// Ordered results of a batch plus its timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport<I, O> {
    pub batch_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub mode: ExecutionMode,
    pub units: usize,
    pub elapsed: Duration,
    pub results: Vec<ExecutionResult<I, O>>,
}

impl<I, O> BatchReport<I, O> {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of results with the given status
    pub fn count(&self, status: TaskStatus) -> usize {
        self.results.iter().filter(|r| r.status() == status).count()
    }

    pub fn success_count(&self) -> usize {
        self.count(TaskStatus::Completed)
    }

    pub fn failure_count(&self) -> usize {
        self.count(TaskStatus::Failed)
    }

    /// All outputs in order, or `None` if any task failed
    pub fn outputs(&self) -> Option<Vec<&O>> {
        self.results.iter().map(ExecutionResult::output).collect()
    }

    pub fn into_outcomes(self) -> Vec<Result<O, TaskError>> {
        self.results.into_iter().map(|r| r.outcome).collect()
    }

    /// Save the report as pretty JSON
    pub fn save(&self, path: &Path) -> ParexResult<()>
    where
        I: Serialize,
        O: Serialize,
    {
        debug!("Saving report for batch {} to {}", self.batch_id, path.display());
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ExecutorError::Serialization(format!("Failed to serialize report: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ExecutorError::File {
                path: path.to_path_buf(),
                message: format!("Failed to write file: {}", e),
            })?;

        Ok(())
    }
}
