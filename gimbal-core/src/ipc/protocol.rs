//! IPC protocol definitions
//!
//! Defines the message types used for communication between the daemon and CLI.

use serde::{Deserialize, Serialize};

use crate::manager::ManagerStats;
use crate::types::Axis;

/// Messages that can be sent to the daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IpcMessage {
    /// Check if daemon is alive
    Ping,
    /// Request current controller status
    Status,
    /// Select the source to control by scan index
    Select {
        /// Ordinal index into the next discovery result
        index: usize,
    },
    /// Update one pending axis value
    Axis {
        /// Which axis to update
        axis: Axis,
        /// New value, clamped into [-1, 1] by the manager
        value: f32,
    },
    /// Trigger the pending move
    Move,
    /// Stop the daemon gracefully
    Stop,
}

/// Responses from the daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IpcResponse {
    /// Simple acknowledgment
    Ok,
    /// Pong response to ping
    Pong,
    /// Error response
    Error { message: String },
    /// Selection succeeded, with the resolved source name
    Selected { name: String },
    /// Status response
    Status(ControllerStatus),
    /// Shutdown acknowledgment
    Stopping,
}

/// Current controller status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerStatus {
    /// Manager state snapshot
    pub manager: ManagerStats,
    /// Process ID
    pub pid: u32,
    /// Uptime in seconds
    pub uptime_seconds: f64,
}

impl IpcMessage {
    /// Serialize message to JSON bytes with newline terminator
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = serde_json::to_vec(self).unwrap_or_default();
        bytes.push(b'\n');
        bytes
    }

    /// Deserialize message from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

impl IpcResponse {
    /// Serialize response to JSON bytes with newline terminator
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = serde_json::to_vec(self).unwrap_or_default();
        bytes.push(b'\n');
        bytes
    }

    /// Deserialize response from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        IpcResponse::Error {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serialization() {
        let msg = IpcMessage::Select { index: 3 };
        let bytes = msg.to_bytes();
        let parsed = IpcMessage::from_bytes(&bytes[..bytes.len() - 1]).unwrap();
        assert!(matches!(parsed, IpcMessage::Select { index: 3 }));
    }

    #[test]
    fn test_response_serialization() {
        let resp = IpcResponse::Selected {
            name: "Cam-1".to_string(),
        };
        let bytes = resp.to_bytes();
        let parsed = IpcResponse::from_bytes(&bytes[..bytes.len() - 1]).unwrap();
        assert!(matches!(parsed, IpcResponse::Selected { name } if name == "Cam-1"));
    }
}
