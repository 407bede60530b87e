//! Gimbal CLI
//!
//! Network PTZ source discovery and control.
//!
//! # Usage
//!
//! ```bash
//! # Scan the network for controllable sources
//! gimbal list
//!
//! # Run the control daemon
//! gimbal run --source Cam-1 --source Cam-2
//!
//! # Pick the source to control and move it
//! gimbal select 1
//! gimbal move --pan 0.3 --tilt -0.1
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Gimbal - network PTZ source discovery and control
#[derive(Parser)]
#[command(name = "gimbal")]
#[command(version)]
#[command(about = "Network PTZ source discovery and control", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the network and list controllable sources
    #[command(alias = "ls")]
    List(commands::ListArgs),

    /// Run the control daemon
    Run(commands::RunArgs),

    /// Select the source to control by its scan index
    Select(commands::SelectArgs),

    /// Set motion axis values and trigger a move
    Move(commands::MoveArgs),

    /// Show status of the running daemon
    Status,

    /// Stop the running daemon
    Stop,

    /// Manage the configuration file
    Config(commands::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("gimbal_core={}", level).parse().unwrap())
                .add_directive(format!("gimbal_cli={}", level).parse().unwrap()),
        )
        .with_target(false)
        .init();

    // Run the appropriate command
    match cli.command {
        Commands::List(args) => commands::list(args).await?,
        Commands::Run(args) => commands::run(args).await?,
        Commands::Select(args) => commands::select(args).await?,
        Commands::Move(args) => commands::mv(args).await?,
        Commands::Status => commands::status().await?,
        Commands::Stop => commands::stop().await?,
        Commands::Config(args) => commands::config(args).await?,
    }

    Ok(())
}
