//! In-memory simulated source network
//!
//! Backs the integration tests and the CLI until a production protocol
//! backend is linked in. Sources can be added and removed at any time,
//! per-source motion capability and connect failures are injectable, and
//! every scan, connection, and commanded move is recorded in an event log
//! so tests can assert ordering.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use crate::backend::{
    Backend, Connection, DiscoveryOptions, DiscoveryScan, PollEvent, ReceiverOptions,
};
use crate::error::{GimbalError, Result};
use crate::types::SourceIdentity;

/// Cap on how long a simulated finder wait actually sleeps, so scan
/// timeouts elapse quickly under test
const SIM_WAIT_CAP: Duration = Duration::from_millis(25);

/// One observable backend operation, in occurrence order
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// A discovery scan context was opened
    ScanOpened,
    /// A discovery scan context was released
    ScanClosed,
    /// A control connection to the named source was established
    Connected(String),
    /// The control connection to the named source was released
    Disconnected(String),
    /// A pan/tilt command reached the named source
    PanTilt {
        source: String,
        pan: f32,
        tilt: f32,
    },
    /// A zoom command reached the named source
    Zoom { source: String, zoom: f32 },
}

#[derive(Debug, Clone)]
struct SimSource {
    identity: SourceIdentity,
    motion: bool,
    refuse_connect: bool,
}

#[derive(Debug)]
struct SimState {
    sources: Vec<SimSource>,
    open_scans: usize,
    open_connections: Vec<String>,
    max_open_connections: usize,
    announce_status_on_connect: bool,
    queued_status: Vec<String>,
    last_discovery_options: Option<DiscoveryOptions>,
    events: Vec<SimEvent>,
}

/// Simulated protocol backend
pub struct SimBackend {
    state: Arc<Mutex<SimState>>,
}

impl SimBackend {
    /// Create a backend with an empty network
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                sources: Vec::new(),
                open_scans: 0,
                open_connections: Vec::new(),
                max_open_connections: 0,
                announce_status_on_connect: true,
                queued_status: Vec::new(),
                last_discovery_options: None,
                events: Vec::new(),
            })),
        }
    }

    /// Create a backend advertising the given motion-capable sources
    pub fn with_sources(names: &[&str]) -> Self {
        let backend = Self::new();
        for name in names {
            backend.add_source(name, true);
        }
        backend
    }

    /// Advertise a source; `motion` controls whether it has a PTZ head
    pub fn add_source(&self, name: &str, motion: bool) {
        self.state.lock().sources.push(SimSource {
            identity: SourceIdentity::new(name),
            motion,
            refuse_connect: false,
        });
    }

    /// Stop advertising the named source. Existing connections survive,
    /// as they would on a real network.
    pub fn remove_source(&self, name: &str) {
        self.state.lock().sources.retain(|s| s.identity.name != name);
    }

    /// Stop advertising everything
    pub fn clear_sources(&self) {
        self.state.lock().sources.clear();
    }

    /// Make connection attempts to the named source fail
    pub fn set_refuse_connect(&self, name: &str, refuse: bool) {
        let mut state = self.state.lock();
        for source in state.sources.iter_mut() {
            if source.identity.name == name {
                source.refuse_connect = refuse;
            }
        }
    }

    /// Control whether fresh connections report a status change on their
    /// first poll (on by default, as receivers do on joining a source)
    pub fn set_announce_status_on_connect(&self, announce: bool) {
        self.state.lock().announce_status_on_connect = announce;
    }

    /// Queue a status-change report for the named source's connection
    pub fn queue_status_change(&self, name: &str) {
        self.state.lock().queued_status.push(name.to_string());
    }

    /// Everything that happened, in order
    pub fn events(&self) -> Vec<SimEvent> {
        self.state.lock().events.clone()
    }

    /// Number of scan contexts currently open
    pub fn open_scan_count(&self) -> usize {
        self.state.lock().open_scans
    }

    /// Number of connections currently open
    pub fn open_connection_count(&self) -> usize {
        self.state.lock().open_connections.len()
    }

    /// High-water mark of concurrently open connections
    pub fn max_open_connections(&self) -> usize {
        self.state.lock().max_open_connections
    }

    /// Options the most recent scan was opened with
    pub fn last_discovery_options(&self) -> Option<DiscoveryOptions> {
        self.state.lock().last_discovery_options.clone()
    }
}

impl Default for SimBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for SimBackend {
    type Scan = SimScan;
    type Connection = SimConnection;

    fn open_scan(&self, options: &DiscoveryOptions) -> Result<Self::Scan> {
        let mut state = self.state.lock();
        state.open_scans += 1;
        state.last_discovery_options = Some(options.clone());
        state.events.push(SimEvent::ScanOpened);
        Ok(SimScan {
            state: self.state.clone(),
        })
    }

    fn connect(
        &self,
        source: &SourceIdentity,
        _options: &ReceiverOptions,
    ) -> Result<Self::Connection> {
        let mut state = self.state.lock();
        let advertised = state
            .sources
            .iter()
            .find(|s| s.identity.name == source.name)
            .cloned();
        match advertised {
            None => Err(GimbalError::connect_failed(
                &source.name,
                "source is not advertised",
            )),
            Some(s) if s.refuse_connect => Err(GimbalError::connect_failed(
                &source.name,
                "connection refused",
            )),
            Some(_) => {
                state.open_connections.push(source.name.clone());
                let open = state.open_connections.len();
                if open > state.max_open_connections {
                    state.max_open_connections = open;
                }
                state.events.push(SimEvent::Connected(source.name.clone()));
                let pending_status = state.announce_status_on_connect;
                Ok(SimConnection {
                    state: self.state.clone(),
                    name: source.name.clone(),
                    pending_status,
                })
            }
        }
    }
}

/// Scoped simulated discovery context
pub struct SimScan {
    state: Arc<Mutex<SimState>>,
}

impl DiscoveryScan for SimScan {
    fn wait_for_sources(&mut self, timeout: Duration) -> bool {
        // The simulated network resolves instantly; sleep only while it is
        // empty so callers' scan deadlines can actually elapse.
        let empty = self.state.lock().sources.is_empty();
        if empty {
            std::thread::sleep(timeout.min(SIM_WAIT_CAP));
        }
        !empty
    }

    fn current_sources(&mut self) -> Vec<SourceIdentity> {
        self.state
            .lock()
            .sources
            .iter()
            .map(|s| s.identity.clone())
            .collect()
    }
}

impl Drop for SimScan {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        let open = state.open_scans.saturating_sub(1);
        state.open_scans = open;
        state.events.push(SimEvent::ScanClosed);
    }
}

/// Simulated control connection to one source
#[derive(Debug)]
pub struct SimConnection {
    state: Arc<Mutex<SimState>>,
    name: String,
    pending_status: bool,
}

impl Connection for SimConnection {
    fn poll_status(&mut self, _timeout: Duration) -> PollEvent {
        if self.pending_status {
            self.pending_status = false;
            return PollEvent::StatusChanged;
        }
        let mut state = self.state.lock();
        if let Some(pos) = state.queued_status.iter().position(|n| *n == self.name) {
            state.queued_status.remove(pos);
            return PollEvent::StatusChanged;
        }
        PollEvent::Idle
    }

    fn motion_supported(&mut self) -> bool {
        self.state
            .lock()
            .sources
            .iter()
            .find(|s| s.identity.name == self.name)
            .is_some_and(|s| s.motion)
    }

    fn pan_tilt(&mut self, pan: f32, tilt: f32) -> Result<()> {
        self.state.lock().events.push(SimEvent::PanTilt {
            source: self.name.clone(),
            pan,
            tilt,
        });
        Ok(())
    }

    fn zoom(&mut self, zoom: f32) -> Result<()> {
        self.state.lock().events.push(SimEvent::Zoom {
            source: self.name.clone(),
            zoom,
        });
        Ok(())
    }
}

impl Drop for SimConnection {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if let Some(pos) = state.open_connections.iter().position(|n| *n == self.name) {
            state.open_connections.remove(pos);
        }
        state.events.push(SimEvent::Disconnected(self.name.clone()));
    }
}
