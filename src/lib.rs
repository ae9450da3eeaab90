pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod workloads;

// Re-export main types for easier access
pub use config::Config;
pub use engine::{
    parallel_map,
    BatchReport,
    ExecutionMode,
    ExecutionResult,
    ExecutorConfig,
    ParallelExecutor,
    Task,
    TaskBatch,
};
pub use error::{ExecutorError, ParexResult, TaskError};
