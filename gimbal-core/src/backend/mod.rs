//! Protocol backend seam
//!
//! The wire protocol used to discover and talk to sources is an external
//! collaborator; this module defines the narrow interface the core needs
//! from it. A backend value is the process-wide protocol context:
//! constructing it performs the library's one-time initialization and
//! dropping it performs teardown, so all scans and connections are routed
//! through an initialized context by construction.

pub mod sim;

pub use sim::{SimBackend, SimEvent};

use std::time::Duration;

use crate::error::Result;
use crate::types::SourceIdentity;

/// Options applied when opening a discovery scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Include sources advertised from this machine
    pub show_local_sources: bool,
    /// Additional addresses to probe beyond the local subnet
    pub extra_ips: Vec<String>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            show_local_sources: true,
            extra_ips: Vec::new(),
        }
    }
}

/// Options applied when establishing a control connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverOptions {
    /// Name this receiver advertises to the source
    pub receiver_name: String,
}

impl Default for ReceiverOptions {
    fn default() -> Self {
        Self {
            receiver_name: "Gimbal PTZ Receiver".to_string(),
        }
    }
}

/// Outcome of one bounded status poll on a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollEvent {
    /// Nothing of interest arrived within the wait bound
    Idle,
    /// The connection reported a status change; capability may have shifted
    StatusChanged,
}

/// Process-wide protocol context
///
/// One backend instance may serve any number of managers; scans and
/// connections are each owned by exactly one component at a time.
pub trait Backend: Send + Sync + 'static {
    /// Scoped discovery context type
    type Scan: DiscoveryScan + Send;
    /// Live control connection type
    type Connection: Connection + Send;

    /// Open a discovery scan context
    fn open_scan(&self, options: &DiscoveryOptions) -> Result<Self::Scan>;

    /// Establish a control connection to a discovered source
    fn connect(
        &self,
        source: &SourceIdentity,
        options: &ReceiverOptions,
    ) -> Result<Self::Connection>;
}

/// A scoped discovery context
///
/// The scan is the resource: dropping it releases the underlying finder,
/// so callers that open a scan per call cannot leak one on any exit path.
pub trait DiscoveryScan {
    /// Block until the advertised source set changes, up to `timeout`.
    /// Returns whether a change was observed.
    fn wait_for_sources(&mut self, timeout: Duration) -> bool;

    /// Snapshot of the currently advertised sources, in enumeration order
    fn current_sources(&mut self) -> Vec<SourceIdentity>;
}

/// A live control connection to one source
///
/// Dropping the connection releases it.
pub trait Connection {
    /// Block up to `timeout` waiting for connection activity
    fn poll_status(&mut self, timeout: Duration) -> PollEvent;

    /// Whether the connected source accepts motion commands.
    /// Only meaningful after the connection has reported status.
    fn motion_supported(&mut self) -> bool;

    /// Command pan and tilt, each in [-1, 1]
    fn pan_tilt(&mut self, pan: f32, tilt: f32) -> Result<()>;

    /// Command zoom in [-1, 1]
    fn zoom(&mut self, zoom: f32) -> Result<()>;
}
