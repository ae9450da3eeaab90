// src/app.rs
use std::path::PathBuf;
use std::time::Duration;
use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::engine::{parallel_map, ExecutionMode, ExecutorConfig, TaskStatus};
use crate::workloads::{factorial_task, ticker_task, Emitter};

/// Commands understood by the application
#[derive(Debug, Clone)]
pub enum Command {
    Factorial(FactorialCommand),
    Ticker(TickerCommand),
    Config(ConfigCommand),
}

#[derive(Debug, Clone, Default)]
pub struct FactorialCommand {
    pub inputs: Vec<u32>,
    pub units: Option<usize>,
    pub mode: Option<ExecutionMode>,
    pub fail_fast: bool,
    pub fail_on: Option<u32>,
    pub full: bool,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct TickerCommand {
    pub delay_ms: Option<u64>,
    pub units: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum ConfigCommand {
    Init {
        path: Option<PathBuf>,
        force: bool,
    },
    Show,
}

/// Main application
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run_command(&self, command: &Command) -> Result<()> {
        match command {
            Command::Factorial(cmd) => self.handle_factorial_command(cmd).await,
            Command::Ticker(cmd) => self.handle_ticker_command(cmd).await,
            Command::Config(cmd) => self.handle_config_command(cmd),
        }
    }

    /// Executor settings from configuration with command-line overrides applied
    fn executor_config(&self, units: Option<usize>, mode: Option<ExecutionMode>, fail_fast: bool) -> ExecutorConfig {
        let mut config = self.config.executor.clone();
        if units.is_some() {
            config.units = units;
        }
        if let Some(mode) = mode {
            config.mode = mode;
        }
        config.fail_fast |= fail_fast;
        config
    }

    async fn handle_factorial_command(&self, cmd: &FactorialCommand) -> Result<()> {
        let inputs = if cmd.inputs.is_empty() {
            self.config.demo.factorial_inputs.clone()
        } else {
            cmd.inputs.clone()
        };
        let executor_config = self.executor_config(cmd.units, cmd.mode, cmd.fail_fast);

        info!("Computing {} factorials", inputs.len());
        let report = parallel_map(inputs, factorial_task(cmd.fail_on), executor_config).await?;

        for result in &report.results {
            match &result.outcome {
                Ok(value) if cmd.full => println!("Factorial of {} is {}", result.input, value),
                Ok(value) => println!("Factorial of {} is {}", result.input, value.summary()),
                Err(e) => println!("Factorial of {} failed: {}", result.input, e),
            }
        }
        println!(
            "{} {}, {} {}",
            report.count(TaskStatus::Completed),
            TaskStatus::Completed,
            report.count(TaskStatus::Failed),
            TaskStatus::Failed
        );
        println!("Time taken: {:.3} seconds", report.elapsed.as_secs_f64());

        if let Some(output) = &cmd.output {
            report.save(output)?;
            println!("Results saved to {}", output.display());
        }

        Ok(())
    }

    async fn handle_ticker_command(&self, cmd: &TickerCommand) -> Result<()> {
        let delay = Duration::from_millis(cmd.delay_ms.unwrap_or(self.config.demo.ticker_delay_ms));
        let executor_config = self
            .executor_config(cmd.units.or(Some(2)), Some(ExecutionMode::IoBound), false);

        info!("Running ticker emitters with {:?} between lines", delay);
        let report = parallel_map(vec![Emitter::Numbers, Emitter::Letters], ticker_task(delay), executor_config).await?;

        println!("Total time: {:.3} seconds", report.elapsed.as_secs_f64());
        Ok(())
    }

    fn handle_config_command(&self, cmd: &ConfigCommand) -> Result<()> {
        match cmd {
            ConfigCommand::Init { path, force } => {
                let path = Config::init(path.as_deref(), *force)?;
                println!("Configuration initialized at {}", path.display());
            }
            ConfigCommand::Show => {
                println!("{}", self.config.to_toml()?);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_overrides_config() {
        let app = App::new(Config::default());
        let config = app.executor_config(Some(3), Some(ExecutionMode::IoBound), true);

        assert_eq!(config.units, Some(3));
        assert_eq!(config.mode, ExecutionMode::IoBound);
        assert!(config.fail_fast);
    }

    #[test]
    fn test_config_values_kept_without_overrides() {
        let mut config = Config::default();
        config.executor.units = Some(6);
        config.executor.fail_fast = true;
        let app = App::new(config);

        let executor_config = app.executor_config(None, None, false);
        assert_eq!(executor_config.units, Some(6));
        assert!(executor_config.fail_fast);
    }

    #[tokio::test]
    async fn test_factorial_command_saves_report() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.json");
        let app = App::new(Config::default());

        let cmd = FactorialCommand {
            inputs: vec![10, 20],
            units: Some(2),
            output: Some(output.clone()),
            ..Default::default()
        };
        app.run_command(&Command::Factorial(cmd)).await.unwrap();

        let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(saved["results"][0]["outcome"]["Ok"], "3628800");
        assert_eq!(saved["results"][1]["outcome"]["Ok"], "2432902008176640000");
    }

    #[tokio::test]
    async fn test_factorial_command_fail_fast_errors() {
        let app = App::new(Config::default());
        let cmd = FactorialCommand {
            inputs: vec![5, 6, 7],
            fail_on: Some(6),
            fail_fast: true,
            ..Default::default()
        };

        assert!(app.run_command(&Command::Factorial(cmd)).await.is_err());
    }
}
