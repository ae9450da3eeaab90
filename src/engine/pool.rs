// src/engine/pool.rs
//! Work queue shared by the workers of a batch, and the rayon pool used for
//! CPU-bound batches.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, warn};

use crate::error::{ParexResult, ExecutorError, TaskError};
use super::task::Task;

const NO_FAILURE: usize = usize::MAX;

/// Outcome of one executed task, keyed by submission index
#[derive(Debug)]
pub(crate) struct Completed<O> {
    pub index: usize,
    pub outcome: Result<O, TaskError>,
    pub execution_time: Duration,
}

/// Claim cursor over a batch, shared by all workers
#[derive(Debug)]
pub(crate) struct WorkQueue {
    next: AtomicUsize,
    len: usize,
    fail_fast: bool,
    cancelled: AtomicBool,
    first_failure: AtomicUsize,
}

impl WorkQueue {
    pub fn new(len: usize, fail_fast: bool) -> Self {
        Self {
            next: AtomicUsize::new(0),
            len,
            fail_fast,
            cancelled: AtomicBool::new(false),
            first_failure: AtomicUsize::new(NO_FAILURE),
        }
    }

    /// Claim the next unclaimed task, unless the queue was cancelled
    pub fn claim(&self) -> Option<usize> {
        if self.is_cancelled() {
            return None;
        }

        let index = self.next.fetch_add(1, Ordering::SeqCst);
        (index < self.len).then_some(index)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Record a task outcome; under fail-fast the first failure cancels the rest
    pub fn observe<O>(&self, completed: &Completed<O>) {
        if completed.outcome.is_ok() {
            return;
        }

        let first = self
            .first_failure
            .compare_exchange(NO_FAILURE, completed.index, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();

        if self.fail_fast && first {
            warn!("Task {} failed, cancelling tasks that have not started", completed.index);
            self.cancelled.store(true, Ordering::SeqCst);
        }
    }

    pub fn first_failure(&self) -> Option<usize> {
        match self.first_failure.load(Ordering::SeqCst) {
            NO_FAILURE => None,
            index => Some(index),
        }
    }
}

/// Run a task, capturing panics and timing
pub(crate) fn run_guarded<I, O>(index: usize, task: &Task<I, O>) -> Completed<O> {
    debug!("Task {} started on {}", index, thread::current().name().unwrap_or("unnamed"));

    let start_time = Instant::now();
    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| task.run())) {
        Ok(outcome) => outcome,
        Err(payload) => Err(TaskError::Panicked {
            message: panic_message(payload.as_ref()),
        }),
    };
    let execution_time = start_time.elapsed();

    match &outcome {
        Ok(_) => debug!("Task {} completed in {:?}", index, execution_time),
        Err(e) => warn!("Task {} failed after {:?}: {}", index, execution_time, e),
    }

    Completed {
        index,
        outcome,
        execution_time,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Pull tasks from `queue` until it is drained or cancelled
pub(crate) fn worker_loop<I, O>(
    worker_id: usize,
    tasks: &[Task<I, O>],
    queue: &WorkQueue,
) -> Vec<Completed<O>> {
    let mut done = Vec::new();

    while let Some(index) = queue.claim() {
        let completed = run_guarded(index, &tasks[index]);
        queue.observe(&completed);
        done.push(completed);
    }

    debug!("Worker {} finished after {} tasks", worker_id, done.len());
    done
}

/// Run a batch on a dedicated rayon pool of `units` threads.
///
/// The pool lives for this call only. Tasks not yet started when the queue
/// is cancelled are skipped.
pub(crate) fn run_on_thread_pool<I, O>(
    tasks: &[Task<I, O>],
    units: usize,
    queue: &WorkQueue,
) -> ParexResult<Vec<Completed<O>>>
where
    I: Sync,
    O: Send,
{
    let worker_count = units.min(tasks.len()).max(1);
    let pool = ThreadPoolBuilder::new()
        .num_threads(worker_count)
        .thread_name(|i| format!("parex-worker-{}", i))
        .build()
        .map_err(|e| ExecutorError::setup(format!("failed to build worker pool: {}", e)))?;

    debug!("Running {} tasks on {} worker threads", tasks.len(), worker_count);

    let completed: Vec<Option<Completed<O>>> = pool.install(|| {
        tasks
            .par_iter()
            .enumerate()
            .map(|(index, task)| {
                if queue.is_cancelled() {
                    return None;
                }
                let completed = run_guarded(index, task);
                queue.observe(&completed);
                Some(completed)
            })
            .collect()
    });

    Ok(completed.into_iter().flatten().collect())
}
