//! Run command - start the control daemon

use anyhow::{bail, Context, Result};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

use gimbal_core::config::ConfigFile;
use gimbal_core::driver::ManagerDriver;
use gimbal_core::ipc::{self, IpcServer};
use gimbal_core::manager::Manager;

/// Arguments for the run command
#[derive(Args)]
pub struct RunArgs {
    /// Advertise a motion-capable simulated source (repeatable)
    #[arg(long = "source", value_name = "NAME")]
    sources: Vec<String>,

    /// Advertise a simulated source without a PTZ head (repeatable)
    #[arg(long = "fixed-source", value_name = "NAME")]
    fixed_sources: Vec<String>,

    /// Scan timeout in milliseconds (overrides the config file)
    #[arg(long)]
    scan_timeout: Option<u64>,

    /// Status poll timeout in milliseconds (overrides the config file)
    #[arg(long)]
    poll_timeout: Option<u64>,

    /// Receiver name advertised to sources (overrides the config file)
    #[arg(long)]
    receiver_name: Option<String>,

    /// Select this source index immediately after startup
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    index: Option<u8>,
}

/// Start the control daemon
pub async fn run(args: RunArgs) -> Result<()> {
    if ipc::daemon_running().await {
        bail!("A gimbal daemon is already running. Stop it with 'gimbal stop'.");
    }

    let config_file = ConfigFile::load().context("Failed to load configuration")?;
    let mut control = config_file.to_control_config();
    if let Some(ms) = args.scan_timeout {
        control.scan_timeout = Duration::from_millis(ms);
    }
    if let Some(ms) = args.poll_timeout {
        control.poll_timeout = Duration::from_millis(ms);
    }
    if let Some(name) = &args.receiver_name {
        control.receiver_name = name.clone();
    }
    control
        .validate_strict()
        .context("Invalid control settings")?;
    for warning in control.validate() {
        warn!("{}", warning);
    }

    let backend = super::sim_backend(&config_file);
    for name in &args.sources {
        backend.add_source(name, true);
    }
    for name in &args.fixed_sources {
        backend.add_source(name, false);
    }

    println!("Gimbal - Control Daemon\n");
    println!("Configuration:");
    println!("  Scan timeout:  {} ms", control.scan_timeout.as_millis());
    println!("  Poll timeout:  {} ms", control.poll_timeout.as_millis());
    println!("  Receiver name: {}", control.receiver_name);
    println!();

    let manager = Manager::new(Arc::new(backend), control);
    let driver = Arc::new(ManagerDriver::spawn(manager)?);

    if let Some(index) = args.index {
        match driver.select(index as usize).await {
            Ok(name) => println!("Controlling: {}", name),
            Err(err) => {
                warn!(index, error = %err, "initial selection failed");
                println!("Initial selection failed: {}", err);
                if let Some(hint) = err.user_hint() {
                    println!("{}", hint);
                }
            }
        }
    }

    let mut server = IpcServer::new(driver.clone())?;
    server.start().await.context("Failed to start IPC server")?;
    let mut shutdown_rx = server.shutdown_receiver();

    println!("Daemon ready. Drive it with 'gimbal select', 'gimbal move', 'gimbal status'.");
    println!("Press Ctrl+C to stop...\n");

    // Wait for Ctrl+C
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
    };

    // Serve IPC clients until interrupted or stopped
    tokio::select! {
        _ = ctrl_c => {
            println!("\nReceived interrupt signal...");
        }
        _ = shutdown_rx.recv() => {
            info!("stop requested via IPC");
        }
        _ = async {
            loop {
                match server.accept_one().await {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => error!("IPC accept error: {}", e),
                }
            }
        } => {}
    }

    println!("Stopping daemon...");
    driver.shutdown().await;

    println!("Daemon stopped.");
    Ok(())
}
