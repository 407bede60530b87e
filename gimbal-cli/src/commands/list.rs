//! List command - scan the network and print discovered sources

use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

use gimbal_core::config::ConfigFile;
use gimbal_core::discovery::SourceRegistry;
use gimbal_core::error::GimbalError;

/// Arguments for the list command
#[derive(Args)]
pub struct ListArgs {
    /// Scan timeout in milliseconds (overrides the config file)
    #[arg(short, long)]
    timeout: Option<u64>,
}

/// Scan the network and list controllable sources
pub async fn list(args: ListArgs) -> Result<()> {
    let config_file = ConfigFile::load()?;
    let control = config_file.to_control_config();
    let timeout = args
        .timeout
        .map(Duration::from_millis)
        .unwrap_or(control.scan_timeout);

    let backend = Arc::new(super::sim_backend(&config_file));
    let mut registry = SourceRegistry::new(backend, control.discovery_options());

    println!("Gimbal - Discovered Sources\n");

    match registry.scan(timeout) {
        Ok(result) => {
            println!("{:<8} {:<30} {:<20}", "Index", "Name", "Address");
            println!("{}", "-".repeat(58));
            for (index, source) in result.sources.iter().enumerate() {
                println!(
                    "{:<8} {:<30} {:<20}",
                    index,
                    truncate(&source.name, 28),
                    source.address.as_deref().unwrap_or("-")
                );
            }
            println!("\nUse 'gimbal select <INDEX>' to control one of these sources.");
        }
        Err(err @ GimbalError::DiscoveryTimeout { .. }) => {
            println!("No sources found within {} ms.", timeout.as_millis());
            if let Some(hint) = err.user_hint() {
                println!("\n{}", hint);
            }
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max - 3])
    }
}
