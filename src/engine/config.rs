// src/engine/config.rs
use std::fmt;
use clap::ValueEnum;
use serde::{Serialize, Deserialize};

use crate::error::{ParexResult, ExecutorError};

/// Default upper bound on the number of execution units
pub const DEFAULT_MAX_UNITS: usize = 1024;

/// How the executor runs tasks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    /// Dedicated rayon pool of OS threads, one task at a time each, run uninterrupted
    #[default]
    #[serde(alias = "process-parallel")]
    #[value(alias = "process-parallel")]
    CpuBound,
    /// Workers on the runtime's blocking pool, each pulling the next task from a shared queue
    #[serde(alias = "thread-concurrent")]
    #[value(alias = "thread-concurrent")]
    IoBound,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::CpuBound => write!(f, "cpu-bound"),
            ExecutionMode::IoBound => write!(f, "io-bound"),
        }
    }
}

/// Configuration for a [`ParallelExecutor`](super::ParallelExecutor)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Number of execution units; `None` uses the host's parallelism
    #[serde(default)]
    pub units: Option<usize>,
    #[serde(default)]
    pub mode: ExecutionMode,
    #[serde(default)]
    pub fail_fast: bool,
    #[serde(default = "default_max_units")]
    pub max_units: usize,
}

fn default_max_units() -> usize {
    DEFAULT_MAX_UNITS
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            units: None,
            mode: ExecutionMode::default(),
            fail_fast: false,
            max_units: DEFAULT_MAX_UNITS,
        }
    }
}

impl ExecutorConfig {
    pub fn cpu_bound() -> Self {
        Self::default()
    }

    pub fn io_bound() -> Self {
        Self {
            mode: ExecutionMode::IoBound,
            ..Self::default()
        }
    }

    pub fn with_units(mut self, units: usize) -> Self {
        self.units = Some(units);
        self
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Requested unit count, falling back to the host's parallelism
    pub fn units(&self) -> usize {
        self.units.unwrap_or_else(num_cpus::get)
    }

    /// Check the unit count against the configured limits
    pub fn validate(&self) -> ParexResult<usize> {
        let units = self.units();

        if units == 0 {
            return Err(ExecutorError::setup("units must be at least 1"));
        }

        if units > self.max_units {
            return Err(ExecutorError::setup(format!(
                "requested {} units exceeds the limit of {}",
                units, self.max_units
            )));
        }

        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_units_is_host_parallelism() {
        let config = ExecutorConfig::default();
        assert_eq!(config.units(), num_cpus::get());
        assert_eq!(config.validate().unwrap(), num_cpus::get());
        assert!(!config.fail_fast);
        assert_eq!(config.mode, ExecutionMode::CpuBound);
    }

    #[test]
    fn test_zero_units_rejected() {
        let config = ExecutorConfig::default().with_units(0);
        assert!(matches!(config.validate(), Err(ExecutorError::Setup { .. })));
    }

    #[test]
    fn test_units_above_limit_rejected() {
        let config = ExecutorConfig::default().with_units(DEFAULT_MAX_UNITS + 1);
        assert!(matches!(config.validate(), Err(ExecutorError::Setup { .. })));
    }

    #[test]
    fn test_mode_aliases() {
        let mode: ExecutionMode = serde_json::from_str("\"process-parallel\"").unwrap();
        assert_eq!(mode, ExecutionMode::CpuBound);

        let mode: ExecutionMode = serde_json::from_str("\"thread-concurrent\"").unwrap();
        assert_eq!(mode, ExecutionMode::IoBound);

        let mode: ExecutionMode = serde_json::from_str("\"io-bound\"").unwrap();
        assert_eq!(mode, ExecutionMode::IoBound);
    }
}
