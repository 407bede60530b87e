//! Move command - set axis values and trigger a move

use anyhow::{Context, Result};
use clap::Args;

use gimbal_core::ipc::IpcClient;
use gimbal_core::types::Axis;

/// Arguments for the move command
#[derive(Args)]
pub struct MoveArgs {
    /// Pan amount, -1 (left) to 1 (right)
    #[arg(long, allow_hyphen_values = true)]
    pan: Option<f32>,

    /// Tilt amount, -1 (down) to 1 (up)
    #[arg(long, allow_hyphen_values = true)]
    tilt: Option<f32>,

    /// Zoom amount, -1 (out) to 1 (in)
    #[arg(long, allow_hyphen_values = true)]
    zoom: Option<f32>,

    /// Update the axis values without triggering the move
    #[arg(long)]
    no_trigger: bool,
}

/// Set motion axis values and trigger a move
pub async fn mv(args: MoveArgs) -> Result<()> {
    let mut client = IpcClient::connect()
        .await
        .context("Is the gimbal daemon running? Start it with 'gimbal run'")?;

    if let Some(value) = args.pan {
        client.set_axis(Axis::Pan, value).await?;
    }
    if let Some(value) = args.tilt {
        client.set_axis(Axis::Tilt, value).await?;
    }
    if let Some(value) = args.zoom {
        client.set_axis(Axis::Zoom, value).await?;
    }

    if args.no_trigger {
        println!("Axis values updated.");
    } else {
        client.trigger().await?;
        println!("Move triggered.");
    }

    Ok(())
}
