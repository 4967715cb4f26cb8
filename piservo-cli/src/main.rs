//! piservo - remote servo positioning
//! Command-line interface for moving a servo over SSH and tracking its position

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use piservo_core::transport::{CommandExecutor, DryRunExecutor};
use piservo_core::{MemoryPositionStore, MoveOutcome, PositionController, PositionStore, ServoConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Demo sweep: 0, 10, ..., 90
const SWEEP_END: i64 = 100;

#[derive(Parser, Debug)]
#[command(name = "piservo")]
#[command(author)]
#[command(version = "2026.1.16")]
#[command(about = "Move a remote servo by absolute percent or relative delta", long_about = None)]
struct Cli {
    /// Servo configuration file (TOML)
    #[arg(short, long, global = true, default_value = "servo.toml", env = "PISERVO_CONFIG")]
    config: PathBuf,

    /// Log commands instead of executing them; the stored position is read but never written
    #[arg(long, global = true)]
    dry_run: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Without a command, runs the demo sweep
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Move to an absolute logical position (percent of the range)
    Move {
        /// Logical position; values past 100 wrap back and forth
        #[arg(value_name = "PERCENT", allow_negative_numbers = true)]
        percent: i64,
    },

    /// Move relative to the last stored position
    Nudge {
        /// Signed delta added to the stored logical position
        #[arg(value_name = "DELTA", allow_negative_numbers = true)]
        delta: i64,
    },

    /// Demo sweep through 0, 10, ..., 90
    Sweep {
        /// Pause between moves in milliseconds
        #[arg(long, default_value_t = 500)]
        delay_ms: u64,

        /// Step between positions
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..=100))]
        step: u64,
    },

    /// Show the stored logical position and its physical value
    Position {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Sweep {
            delay_ms: 500,
            step: 10,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "piservo=debug,piservo_core=debug"
    } else {
        "piservo=info,piservo_core=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

type Controller = PositionController<Box<dyn PositionStore>, Box<dyn CommandExecutor>>;

fn build_controller(config_path: &Path, dry_run: bool) -> Result<Controller> {
    let config = ServoConfig::from_file(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    tracing::debug!(
        config = %config_path.display(),
        channel = %config.channel(),
        transport = ?config.remote.transport,
        dry_run,
        "config loaded"
    );

    let file_store = config.state.store();
    let (store, executor): (Box<dyn PositionStore>, Box<dyn CommandExecutor>) = if dry_run {
        // reads the stored position, never writes it
        let seeded = MemoryPositionStore::with_position(config.channel(), file_store.load(config.channel()));
        (Box::new(seeded), Box::new(DryRunExecutor::new()))
    } else {
        (Box::new(file_store), config.remote.executor()?)
    };

    Ok(PositionController::from_config(&config, store, executor)?)
}

fn run(cli: Cli) -> Result<()> {
    let mut servo = build_controller(&cli.config, cli.dry_run)?;

    match cli.command.unwrap_or_default() {
        Commands::Move { percent } => {
            let outcome = servo
                .move_absolute(percent)
                .with_context(|| format!("moving channel {} to {}", servo.channel(), percent))?;
            report(&outcome);
        }

        Commands::Nudge { delta } => {
            let outcome = servo
                .move_relative(delta)
                .with_context(|| format!("nudging channel {} by {:+}", servo.channel(), delta))?;
            report(&outcome);
        }

        Commands::Sweep { delay_ms, step } => {
            println!(
                "{} channel {} (step {}, {}ms)",
                "Sweeping".green().bold(),
                servo.channel().to_string().cyan(),
                step,
                delay_ms
            );
            let positions = (0..SWEEP_END).step_by(step as usize);
            let outcomes = servo
                .sweep(positions, Duration::from_millis(delay_ms))
                .with_context(|| format!("sweeping channel {}", servo.channel()))?;
            for outcome in &outcomes {
                report(outcome);
            }
        }

        Commands::Position { json } => {
            let current = servo.current();
            if json {
                println!("{}", serde_json::to_string_pretty(&current)?);
            } else {
                println!(
                    "{} {}: logical {} → physical {} (range {}..={})",
                    "Channel".bold(),
                    current.channel.to_string().cyan(),
                    current.logical,
                    current.physical.to_string().green(),
                    current.range.min(),
                    current.range.max()
                );
            }
        }
    }

    Ok(())
}

fn report(outcome: &MoveOutcome) {
    println!(
        "{} logical {} → {}",
        "   Moved".green().bold(),
        outcome.logical,
        outcome.physical.to_string().cyan()
    );
    if let Some(e) = &outcome.persist_error {
        eprintln!(
            "{} move succeeded, state not saved: {}",
            "warning:".yellow().bold(),
            e
        );
    }
}
