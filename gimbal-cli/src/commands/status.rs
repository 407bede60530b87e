//! Status command - show status of the running daemon

use anyhow::{Context, Result};

use gimbal_core::ipc::IpcClient;

/// Show status of the running daemon
pub async fn status() -> Result<()> {
    let mut client = IpcClient::connect()
        .await
        .context("Is the gimbal daemon running? Start it with 'gimbal run'")?;

    let status = client.status().await?;
    let stats = &status.manager;

    println!("Gimbal - Status\n");
    println!("  PID:             {}", status.pid);
    println!("  Uptime:          {:.0} s", status.uptime_seconds);
    println!();
    println!(
        "  Session:         {}",
        if stats.bound { "bound" } else { "unbound" }
    );
    if let Some(source) = &stats.source {
        println!("  Bound source:    {}", source);
    }
    if let Some(name) = &stats.source_name {
        println!("  Selected name:   {}", name);
    }
    if let Some(index) = stats.selected_index {
        println!("  Selected index:  {}", index);
    }
    println!("  Capability:      {}", stats.capability);
    println!("  Scan generation: {}", stats.scan_generation);
    if let Some(count) = stats.discovered {
        println!("  Discovered:      {} source(s)", count);
    }
    println!("  Pending axes:    {}", stats.pending);
    match stats.last_commanded {
        Some(command) => println!("  Last move:       {}", command),
        None => println!("  Last move:       none"),
    }

    Ok(())
}
