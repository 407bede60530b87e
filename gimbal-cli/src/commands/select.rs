//! Select command - pick the source to control by scan index

use anyhow::{Context, Result};
use clap::Args;

use gimbal_core::ipc::IpcClient;

/// Arguments for the select command
#[derive(Args)]
pub struct SelectArgs {
    /// Ordinal index into the most recent scan result
    #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
    index: u8,
}

/// Select the source to control
pub async fn select(args: SelectArgs) -> Result<()> {
    let mut client = IpcClient::connect()
        .await
        .context("Is the gimbal daemon running? Start it with 'gimbal run'")?;

    match client.select(args.index as usize).await {
        Ok(name) => {
            println!("Controlling: {}", name);
        }
        Err(err) => {
            println!("Selection failed: {}", err);
            if let Some(hint) = err.user_hint() {
                println!("{}", hint);
            }
        }
    }

    Ok(())
}
