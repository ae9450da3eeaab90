// src/engine/parallel.rs
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use chrono::Utc;
use tokio::task::JoinSet;
use tracing::{info, debug, error};
use uuid::Uuid;

use crate::error::{ParexResult, ExecutorError, TaskError};
use super::config::{ExecutionMode, ExecutorConfig};
use super::pool::{self, Completed, WorkQueue};
use super::task::{BatchReport, ExecutionResult, Task, TaskBatch};

/// Executor for running a batch of independent tasks in parallel
#[derive(Debug, Clone)]
pub struct ParallelExecutor {
    config: ExecutorConfig,
    units: usize,
}

impl ParallelExecutor {
    /// Create a new parallel executor, validating the unit count up front
    pub fn new(config: ExecutorConfig) -> ParexResult<Self> {
        let units = config.validate()?;

        if config.mode == ExecutionMode::CpuBound && units > num_cpus::get() {
            debug!(
                "{} cpu-bound units requested on a host with {} cpus",
                units,
                num_cpus::get()
            );
        }

        Ok(Self { config, units })
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Effective number of execution units
    pub fn units(&self) -> usize {
        self.units
    }

    /// Execute a batch, returning results in submission order
    pub async fn execute<I, O>(&self, batch: TaskBatch<I, O>) -> ParexResult<BatchReport<I, O>>
    where
        I: fmt::Debug + Send + Sync + 'static,
        O: Send + 'static,
    {
        if batch.is_empty() {
            return Err(ExecutorError::EmptyBatch);
        }

        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start_time = Instant::now();
        let task_count = batch.len();

        info!(
            "Executing batch {} of {} tasks ({}, {} units, fail_fast={})",
            batch_id, task_count, self.config.mode, self.units, self.config.fail_fast
        );

        let queue = Arc::new(WorkQueue::new(task_count, self.config.fail_fast));
        let tasks = batch.into_tasks();

        let (tasks, completed) = match self.config.mode {
            ExecutionMode::CpuBound => Self::run_cpu_bound(tasks, self.units, queue.clone()).await?,
            ExecutionMode::IoBound => Self::run_io_bound(tasks, self.units, queue.clone()).await?,
        };

        let elapsed = start_time.elapsed();
        let results = Self::assemble(tasks, completed, &queue, self.config.fail_fast)?;

        let report = BatchReport {
            batch_id,
            started_at,
            mode: self.config.mode,
            units: self.units,
            elapsed,
            results,
        };

        info!(
            "Batch {} finished in {:?}: {} succeeded, {} failed",
            batch_id,
            elapsed,
            report.success_count(),
            report.failure_count()
        );

        Ok(report)
    }

    /// Execute a batch on a private runtime. Must not be called from within a tokio runtime.
    pub fn execute_blocking<I, O>(&self, batch: TaskBatch<I, O>) -> ParexResult<BatchReport<I, O>>
    where
        I: fmt::Debug + Send + Sync + 'static,
        O: Send + 'static,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ExecutorError::setup(format!("failed to build runtime: {}", e)))?;

        runtime.block_on(self.execute(batch))
    }

    /// Dedicated rayon pool, kept off the async workers
    async fn run_cpu_bound<I, O>(
        tasks: Vec<Task<I, O>>,
        units: usize,
        queue: Arc<WorkQueue>,
    ) -> ParexResult<(Vec<Task<I, O>>, Vec<Completed<O>>)>
    where
        I: Send + Sync + 'static,
        O: Send + 'static,
    {
        let handle = tokio::task::spawn_blocking(move || {
            let completed = pool::run_on_thread_pool(&tasks, units, &queue);
            (tasks, completed)
        });

        match handle.await {
            Ok((tasks, completed)) => Ok((tasks, completed?)),
            Err(e) => {
                error!("Worker pool failed: {}", e);
                Err(ExecutorError::Unexpected(format!("worker pool failed: {}", e)))
            }
        }
    }

    /// `units` blocking workers on the runtime's blocking pool, each claiming from the queue
    async fn run_io_bound<I, O>(
        tasks: Vec<Task<I, O>>,
        units: usize,
        queue: Arc<WorkQueue>,
    ) -> ParexResult<(Vec<Task<I, O>>, Vec<Completed<O>>)>
    where
        I: Send + Sync + 'static,
        O: Send + 'static,
    {
        let task_count = tasks.len();
        let worker_count = units.min(task_count);
        let tasks = Arc::new(tasks);
        let mut join_set = JoinSet::new();

        debug!("Spawning {} blocking workers for {} tasks", worker_count, task_count);

        for worker_id in 0..worker_count {
            let tasks_clone = tasks.clone();
            let queue_clone = queue.clone();

            join_set.spawn_blocking(move || pool::worker_loop(worker_id, &tasks_clone, &queue_clone));
        }

        let mut completed = Vec::with_capacity(task_count);
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(mut done) => completed.append(&mut done),
                Err(e) => {
                    error!("Worker failed: {}", e);
                    return Err(ExecutorError::Unexpected(format!("worker failed: {}", e)));
                }
            }
        }

        // Every worker has returned, so this is the last reference
        let tasks = Arc::try_unwrap(tasks)
            .map_err(|_| ExecutorError::Unexpected("tasks still shared after workers finished".to_string()))?;

        Ok((tasks, completed))
    }

    /// Reassemble results by original index, or report the fail-fast abort
    fn assemble<I, O>(
        tasks: Vec<Task<I, O>>,
        completed: Vec<Completed<O>>,
        queue: &WorkQueue,
        fail_fast: bool,
    ) -> ParexResult<Vec<ExecutionResult<I, O>>>
    where
        I: fmt::Debug,
    {
        let mut slots: Vec<Option<Completed<O>>> = (0..tasks.len()).map(|_| None).collect();
        for done in completed {
            let index = done.index;
            slots[index] = Some(done);
        }

        if fail_fast {
            if let Some(index) = queue.first_failure() {
                let source = match slots[index].take().map(|done| done.outcome) {
                    Some(Err(e)) => e,
                    _ => TaskError::failed("failure was not recorded"),
                };

                error!("Batch aborted by task {}: {}", index, source);
                return Err(ExecutorError::BatchAborted {
                    index,
                    input: format!("{:?}", tasks[index].input()),
                    source,
                });
            }
        }

        tasks
            .into_iter()
            .zip(slots)
            .enumerate()
            .map(|(index, (task, slot))| match slot {
                Some(done) => Ok(ExecutionResult {
                    index,
                    input: task.into_input(),
                    outcome: done.outcome,
                    execution_time: done.execution_time,
                }),
                None => Err(ExecutorError::Unexpected(format!("task {} produced no result", index))),
            })
            .collect()
    }
}

/// Run `func` over every input with the given configuration
pub async fn parallel_map<I, O, F>(
    inputs: impl IntoIterator<Item = I>,
    func: F,
    config: ExecutorConfig,
) -> ParexResult<BatchReport<I, O>>
where
    I: fmt::Debug + Send + Sync + 'static,
    O: Send + 'static,
    F: Fn(&I) -> Result<O, TaskError> + Send + Sync + 'static,
{
    let executor = ParallelExecutor::new(config)?;
    executor.execute(TaskBatch::from_inputs(inputs, func)).await
}
