//! Demo workloads: a compute-heavy factorial and wait-heavy emitters.

mod factorial;
mod ticker;

pub use factorial::{factorial_task, Factorial};
pub use ticker::{ticker_task, Emitter};
