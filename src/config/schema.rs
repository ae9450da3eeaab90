use std::str::FromStr;
use serde::{Serialize, Deserialize};
use tracing::Level;

use crate::engine::ExecutorConfig;
use crate::error::{ParexResult, ExecutorError};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
}

/// Inputs for the bundled demos
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DemoConfig {
    pub factorial_inputs: Vec<u32>,
    pub ticker_delay_ms: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn level(&self) -> ParexResult<Level> {
        Level::from_str(&self.level)
            .map_err(|_| ExecutorError::Config(format!("Unknown log level: {}", self.level)))
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            factorial_inputs: vec![5000, 6000, 700, 8000],
            ticker_delay_ms: 2000,
        }
    }
}
