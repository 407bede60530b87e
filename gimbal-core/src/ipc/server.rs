//! IPC server for daemon mode
//!
//! Listens on a Unix socket and forwards client commands to the manager's
//! control thread.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use super::protocol::{ControllerStatus, IpcMessage, IpcResponse};
use super::socket_path;
use crate::driver::ManagerDriver;
use crate::error::{GimbalError, Result};

/// IPC server that handles client connections
pub struct IpcServer {
    /// Path to the Unix socket
    socket_path: PathBuf,
    /// Listener for incoming connections
    listener: Option<UnixListener>,
    /// Control thread facade
    driver: Arc<ManagerDriver>,
    /// Shutdown signal sender
    shutdown_tx: broadcast::Sender<()>,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl IpcServer {
    /// Create a new IPC server
    pub fn new(driver: Arc<ManagerDriver>) -> Result<Self> {
        let path = socket_path();
        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Self {
            socket_path: path,
            listener: None,
            driver,
            shutdown_tx,
            start_time: Instant::now(),
        })
    }

    /// Start listening for connections
    pub async fn start(&mut self) -> Result<()> {
        // Remove existing socket if present
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path)
                .map_err(|e| GimbalError::Config(format!("Failed to remove old socket: {}", e)))?;
        }

        // Create parent directory if needed
        if let Some(parent) = self.socket_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    GimbalError::Config(format!("Failed to create socket directory: {}", e))
                })?;
            }
        }

        // Bind to socket
        let listener = UnixListener::bind(&self.socket_path).map_err(|e| {
            GimbalError::Config(format!(
                "Failed to bind socket at {:?}: {}",
                self.socket_path, e
            ))
        })?;

        // Set socket permissions to owner-only (0600)
        // This prevents other users from connecting to our daemon
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&self.socket_path, permissions).map_err(|e| {
            warn!("Failed to set socket permissions: {}", e);
            GimbalError::Config(format!("Failed to set socket permissions: {}", e))
        })?;

        info!("IPC server listening on {:?}", self.socket_path);
        self.listener = Some(listener);

        Ok(())
    }

    /// Get a receiver for shutdown signals
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Accept and handle one connection
    ///
    /// Returns true if the server should continue, false if it should shut down
    pub async fn accept_one(&self) -> Result<bool> {
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| GimbalError::Config("Server not started".into()))?;

        // Accept with timeout to allow checking for shutdown
        let accept_result =
            tokio::time::timeout(std::time::Duration::from_millis(100), listener.accept()).await;

        let (stream, _addr) = match accept_result {
            Ok(Ok((stream, addr))) => (stream, addr),
            Ok(Err(e)) => {
                error!("Failed to accept connection: {}", e);
                return Ok(true); // Continue running
            }
            Err(_) => {
                // Timeout, just continue
                return Ok(true);
            }
        };

        debug!("IPC client connected");

        // Handle the connection
        let should_continue = self.handle_connection(stream).await;

        Ok(should_continue)
    }

    /// Handle a client connection
    ///
    /// Returns true if server should continue, false if it should shut down
    async fn handle_connection(&self, stream: UnixStream) -> bool {
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        let mut line = String::new();

        loop {
            line.clear();
            match reader.read_line(&mut line).await {
                Ok(0) => {
                    // Connection closed
                    debug!("IPC client disconnected");
                    return true;
                }
                Ok(_) => {
                    // Parse and handle message
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match IpcMessage::from_bytes(trimmed.as_bytes()) {
                        Ok(msg) => {
                            let (response, should_stop) = self.handle_message(msg).await;

                            // Send response
                            let response_bytes = response.to_bytes();
                            if let Err(e) = writer.write_all(&response_bytes).await {
                                error!("Failed to send IPC response: {}", e);
                                return true;
                            }

                            if should_stop {
                                // Signal shutdown
                                let _ = self.shutdown_tx.send(());
                                return false;
                            }
                        }
                        Err(e) => {
                            warn!("Invalid IPC message: {}", e);
                            let response = IpcResponse::error(format!("Invalid message: {}", e));
                            let _ = writer.write_all(&response.to_bytes()).await;
                        }
                    }
                }
                Err(e) => {
                    error!("Error reading from IPC client: {}", e);
                    return true;
                }
            }
        }
    }

    /// Handle an IPC message
    ///
    /// Returns (response, should_stop)
    async fn handle_message(&self, msg: IpcMessage) -> (IpcResponse, bool) {
        match msg {
            IpcMessage::Ping => (IpcResponse::Pong, false),
            IpcMessage::Status => match self.driver.stats().await {
                Ok(stats) => {
                    let status = ControllerStatus {
                        manager: stats,
                        pid: std::process::id(),
                        uptime_seconds: self.start_time.elapsed().as_secs_f64(),
                    };
                    (IpcResponse::Status(status), false)
                }
                Err(e) => (IpcResponse::error(e.to_string()), false),
            },
            IpcMessage::Select { index } => match self.driver.select(index).await {
                Ok(name) => (IpcResponse::Selected { name }, false),
                Err(e) => (IpcResponse::error(e.to_string()), false),
            },
            IpcMessage::Axis { axis, value } => match self.driver.set_axis(axis, value) {
                Ok(()) => (IpcResponse::Ok, false),
                Err(e) => (IpcResponse::error(e.to_string()), false),
            },
            IpcMessage::Move => match self.driver.trigger() {
                Ok(()) => (IpcResponse::Ok, false),
                Err(e) => (IpcResponse::error(e.to_string()), false),
            },
            IpcMessage::Stop => {
                info!("Received stop command via IPC");
                (IpcResponse::Stopping, true)
            }
        }
    }

    /// Clean up the socket file
    pub fn cleanup(&self) {
        if self.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.socket_path) {
                warn!("Failed to remove socket file: {}", e);
            } else {
                debug!("Removed socket file {:?}", self.socket_path);
            }
        }
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        self.cleanup();
    }
}
