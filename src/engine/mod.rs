mod config;
mod parallel;
mod pool;
mod task;

pub use config::{ExecutionMode, ExecutorConfig, DEFAULT_MAX_UNITS};
pub use parallel::{parallel_map, ParallelExecutor};
pub use task::{BatchReport, ExecutionResult, Task, TaskBatch, TaskFn, TaskStatus};
