// src/main.rs
use std::path::PathBuf;
use std::process::exit;
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info, Level};

use parex::app::{App, Command, ConfigCommand, FactorialCommand, TickerCommand};
use parex::{Config, ExecutionMode};

#[derive(Parser)]
#[command(name = "parex")]
#[command(about = "Run batches of independent tasks in parallel")]
struct Args {
    #[command(subcommand)]
    command: Cli,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Cli {
    /// Compute factorials of large numbers on a worker pool
    Factorial {
        #[arg(help = "Numbers to compute factorials of (defaults from configuration)")]
        numbers: Vec<u32>,

        #[arg(short, long, help = "Number of execution units")]
        units: Option<usize>,

        #[arg(short, long, value_enum, help = "Execution mode")]
        mode: Option<ExecutionMode>,

        #[arg(long, help = "Abort the batch on the first failure")]
        fail_fast: bool,

        #[arg(long, help = "Make the task for this number fail")]
        fail_on: Option<u32>,

        #[arg(long, help = "Print every digit of each result")]
        full: bool,

        #[arg(short, long, help = "Path to save the JSON report")]
        output: Option<PathBuf>,
    },

    /// Run the number and letter emitters concurrently
    Ticker {
        #[arg(short, long, help = "Delay between lines in milliseconds")]
        delay_ms: Option<u64>,

        #[arg(short, long, help = "Number of execution units")]
        units: Option<usize>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCli,
    },
}

#[derive(Subcommand)]
enum ConfigCli {
    /// Write a default configuration file
    Init {
        #[arg(short, long, help = "Force overwrite existing configuration")]
        force: bool,

        #[arg(long, help = "Where to write the configuration")]
        path: Option<PathBuf>,
    },

    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            exit(1);
        }
    };

    // Initialize logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        config.logging.level()?
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    info!("Configuration loaded");

    let command = match args.command {
        Cli::Factorial { numbers, units, mode, fail_fast, fail_on, full, output } => {
            Command::Factorial(FactorialCommand {
                inputs: numbers,
                units,
                mode,
                fail_fast,
                fail_on,
                full,
                output,
            })
        },
        Cli::Ticker { delay_ms, units } => {
            Command::Ticker(TickerCommand { delay_ms, units })
        },
        Cli::Config { command } => {
            match command {
                ConfigCli::Init { force, path } => Command::Config(ConfigCommand::Init { path, force }),
                ConfigCli::Show => Command::Config(ConfigCommand::Show),
            }
        },
    };

    let app = App::new(config);
    if let Err(e) = app.run_command(&command).await {
        error!("Command execution failed: {}", e);
        exit(1);
    }

    Ok(())
}
