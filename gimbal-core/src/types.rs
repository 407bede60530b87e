//! Core types for Gimbal
//!
//! These types represent the fundamental data structures shared by the
//! discovery and control layers.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global handle counter for unique manager IDs
static HANDLE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque handle for a manager instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(u64);

impl Handle {
    /// Create a new unique handle
    pub fn new() -> Self {
        Self(HANDLE_COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    /// Get the raw handle value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handle({})", self.0)
    }
}

/// Network-scoped identity of a controllable source
///
/// Valid only for as long as the source keeps advertising under this name;
/// identities are not stable across process restarts or network
/// renumbering. Produced by discovery scans, consumed by the control
/// session to establish a connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceIdentity {
    /// Advertised human-readable name, unique on the network at scan time
    pub name: String,
    /// Network address, when the backend reports one
    pub address: Option<String>,
}

impl SourceIdentity {
    /// Create an identity from an advertised name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
        }
    }

    /// Attach the advertised network address
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

impl std::fmt::Display for SourceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.address {
            Some(address) => write!(f, "{} ({})", self.name, address),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Result of one completed discovery scan
///
/// Ordering reflects enumeration order on the network, not priority, and
/// may differ between scans even for the same physical devices. A new scan
/// result fully replaces the previous one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryResult {
    /// Sources in enumeration order
    pub sources: Vec<SourceIdentity>,
    /// Monotonically increasing scan counter
    pub generation: u64,
}

impl DiscoveryResult {
    /// Number of discovered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the scan saw no sources
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Look up a source by ordinal index
    pub fn get(&self, index: usize) -> Option<&SourceIdentity> {
        self.sources.get(index)
    }
}

/// Motion axis of a PTZ head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal movement
    Pan,
    /// Vertical movement
    Tilt,
    /// Zoom in/out
    Zoom,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Pan => write!(f, "pan"),
            Axis::Tilt => write!(f, "tilt"),
            Axis::Zoom => write!(f, "zoom"),
        }
    }
}

impl std::str::FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pan" | "horizontal" => Ok(Self::Pan),
            "tilt" | "vertical" => Ok(Self::Tilt),
            "zoom" => Ok(Self::Zoom),
            _ => Err(format!("Unknown axis: {}", s)),
        }
    }
}

/// Pending pan/tilt/zoom values, each in [-1, 1]
///
/// Values are clamped on write, matching bounded slider inputs; out-of-range
/// values are never rejected. Zero on all axes is the idle position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionCommand {
    /// Left/right amount
    pub pan: f32,
    /// Up/down amount
    pub tilt: f32,
    /// Zoom in/out amount
    pub zoom: f32,
}

impl MotionCommand {
    /// Create a command with all three axes, clamping each to [-1, 1]
    pub fn new(pan: f32, tilt: f32, zoom: f32) -> Self {
        Self {
            pan: clamp_axis(pan),
            tilt: clamp_axis(tilt),
            zoom: clamp_axis(zoom),
        }
    }

    /// Set one axis, clamping to [-1, 1]
    pub fn set(&mut self, axis: Axis, value: f32) {
        let value = clamp_axis(value);
        match axis {
            Axis::Pan => self.pan = value,
            Axis::Tilt => self.tilt = value,
            Axis::Zoom => self.zoom = value,
        }
    }

    /// Read one axis
    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Pan => self.pan,
            Axis::Tilt => self.tilt,
            Axis::Zoom => self.zoom,
        }
    }
}

impl std::fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pan={:.2} tilt={:.2} zoom={:.2}",
            self.pan, self.tilt, self.zoom
        )
    }
}

/// Clamp an axis value into [-1, 1]; non-finite input degrades to idle
fn clamp_axis(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Whether the bound source supports motion control
///
/// Only knowable after a status poll against a live connection, so a fresh
/// binding always starts at `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Not yet reported by the connection
    #[default]
    Unknown,
    /// The source accepts pan/tilt/zoom commands
    Supported,
    /// The source has no motion control
    Unsupported,
}

impl Capability {
    /// Whether motion commands may be issued
    pub fn is_supported(&self) -> bool {
        matches!(self, Capability::Supported)
    }

    /// Whether the poll has resolved the capability either way
    pub fn is_known(&self) -> bool {
        !matches!(self, Capability::Unknown)
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Unknown => write!(f, "unknown"),
            Capability::Supported => write!(f, "supported"),
            Capability::Unsupported => write!(f, "unsupported"),
        }
    }
}
