//! Stop command - stop the running daemon

use anyhow::Result;

use gimbal_core::error::GimbalError;
use gimbal_core::ipc::IpcClient;

/// Stop the running daemon
pub async fn stop() -> Result<()> {
    let mut client = match IpcClient::connect().await {
        Ok(client) => client,
        Err(GimbalError::NoActiveSession) => {
            println!("No gimbal daemon appears to be running.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    client.stop().await?;
    println!("Stop requested.");

    Ok(())
}
