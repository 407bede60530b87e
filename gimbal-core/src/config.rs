//! Configuration for Gimbal
//!
//! Provides the runtime control settings and the user configuration file
//! loaded from `~/.config/gimbal/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

use crate::backend::{DiscoveryOptions, ReceiverOptions};
use crate::error::{GimbalError, Result};

/// Runtime control settings
#[derive(Debug, Clone, PartialEq)]
pub struct ControlConfig {
    /// Upper bound for one discovery scan
    pub scan_timeout: Duration,
    /// Upper bound for one connection status poll
    pub poll_timeout: Duration,
    /// Include sources advertised from this machine
    pub show_local_sources: bool,
    /// Additional addresses to probe during discovery
    pub extra_ips: Vec<String>,
    /// Name this receiver advertises to sources
    pub receiver_name: String,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            scan_timeout: Duration::from_millis(default_scan_timeout_ms()),
            poll_timeout: Duration::from_millis(default_poll_timeout_ms()),
            show_local_sources: true,
            extra_ips: Vec::new(),
            receiver_name: default_receiver_name(),
        }
    }
}

impl ControlConfig {
    /// Set the discovery scan bound
    pub fn with_scan_timeout(mut self, timeout: Duration) -> Self {
        self.scan_timeout = timeout;
        self
    }

    /// Set the status poll bound
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Include or exclude locally advertised sources
    pub fn with_show_local_sources(mut self, show: bool) -> Self {
        self.show_local_sources = show;
        self
    }

    /// Set additional discovery addresses
    pub fn with_extra_ips(mut self, ips: Vec<String>) -> Self {
        self.extra_ips = ips;
        self
    }

    /// Set the advertised receiver name
    pub fn with_receiver_name(mut self, name: impl Into<String>) -> Self {
        self.receiver_name = name.into();
        self
    }

    /// Discovery options derived from these settings
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            show_local_sources: self.show_local_sources,
            extra_ips: self.extra_ips.clone(),
        }
    }

    /// Receiver options derived from these settings
    pub fn receiver_options(&self) -> ReceiverOptions {
        ReceiverOptions {
            receiver_name: self.receiver_name.clone(),
        }
    }

    /// Non-fatal issues worth surfacing to the user
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.scan_timeout > Duration::from_secs(30) {
            warnings.push(format!(
                "Scan timeout of {} ms blocks the control thread for the full bound when the network is empty",
                self.scan_timeout.as_millis()
            ));
        }
        if self.poll_timeout > Duration::from_secs(5) {
            warnings.push(format!(
                "Status poll timeout of {} ms delays every move trigger by up to that long",
                self.poll_timeout.as_millis()
            ));
        }
        if self.receiver_name.is_empty() {
            warnings.push("Receiver name is empty; sources will see an unnamed receiver".into());
        }
        warnings
    }

    /// Validate, rejecting settings that cannot work at all
    pub fn validate_strict(&self) -> Result<()> {
        if self.scan_timeout.is_zero() {
            return Err(GimbalError::config("Scan timeout must be greater than zero"));
        }
        if self.poll_timeout.is_zero() {
            return Err(GimbalError::config("Poll timeout must be greater than zero"));
        }
        Ok(())
    }
}

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Discovery settings
    #[serde(default)]
    pub discovery: DiscoverySettings,

    /// Control session settings
    #[serde(default)]
    pub control: ControlSettings,

    /// Simulated network settings
    #[serde(default)]
    pub sim: SimSettings,
}

/// Discovery scan settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverySettings {
    /// Scan bound in milliseconds
    #[serde(default = "default_scan_timeout_ms")]
    pub scan_timeout_ms: u64,

    /// Include sources advertised from this machine
    #[serde(default = "default_true")]
    pub show_local_sources: bool,

    /// Additional addresses to probe during discovery
    #[serde(default)]
    pub extra_ips: Vec<String>,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            scan_timeout_ms: default_scan_timeout_ms(),
            show_local_sources: true,
            extra_ips: Vec::new(),
        }
    }
}

/// Control session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlSettings {
    /// Status poll bound in milliseconds
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,

    /// Name this receiver advertises to sources
    #[serde(default = "default_receiver_name")]
    pub receiver_name: String,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            poll_timeout_ms: default_poll_timeout_ms(),
            receiver_name: default_receiver_name(),
        }
    }
}

/// Simulated network used until a protocol backend is linked in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSettings {
    /// Sources the daemon advertises on its simulated network
    #[serde(default)]
    pub sources: Vec<SimSourceSettings>,
}

/// One simulated source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSourceSettings {
    /// Advertised name
    pub name: String,

    /// Whether the source has a PTZ head
    #[serde(default = "default_true")]
    pub motion: bool,
}

impl ConfigFile {
    /// Default path: `~/.config/gimbal/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gimbal")
            .join("config.toml")
    }

    /// Load from the default path; a missing file yields defaults
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load from a specific path; a missing file yields defaults
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            debug!("no config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| GimbalError::config(format!("Failed to read {:?}: {}", path, e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| GimbalError::config(format!("Failed to parse {:?}: {}", path, e)))?;

        debug!("loaded config from {:?}", path);
        Ok(config)
    }

    /// Save to a specific path, creating parent directories
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    GimbalError::config(format!("Failed to create {:?}: {}", parent, e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| GimbalError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&path, content)
            .map_err(|e| GimbalError::config(format!("Failed to write {:?}: {}", path, e)))?;

        Ok(())
    }

    /// Runtime settings derived from the file
    pub fn to_control_config(&self) -> ControlConfig {
        let config = ControlConfig {
            scan_timeout: Duration::from_millis(self.discovery.scan_timeout_ms),
            poll_timeout: Duration::from_millis(self.control.poll_timeout_ms),
            show_local_sources: self.discovery.show_local_sources,
            extra_ips: self.discovery.extra_ips.clone(),
            receiver_name: self.control.receiver_name.clone(),
        };
        for warning in config.validate() {
            warn!("{}", warning);
        }
        config
    }
}

/// A commented sample configuration
pub fn sample_config() -> String {
    r#"# Gimbal configuration file
# Location: ~/.config/gimbal/config.toml

[discovery]
# Upper bound for one discovery scan, in milliseconds. When no sources
# appear within this bound the scan reports a timeout and the previous
# selection is kept.
scan_timeout_ms = 3000

# Include sources advertised from this machine.
show_local_sources = true

# Additional addresses to probe beyond the local subnet.
# extra_ips = ["192.168.0.107", "192.168.0.108"]
extra_ips = []

[control]
# Upper bound for one connection status poll, in milliseconds.
poll_timeout_ms = 1000

# Name this receiver advertises to the sources it controls.
receiver_name = "Gimbal PTZ Receiver"

# Simulated network advertised by the daemon until a protocol backend is
# linked in. Each source needs a name; motion defaults to true.
# [[sim.sources]]
# name = "Cam-1"
# motion = true
"#
    .to_string()
}

fn default_scan_timeout_ms() -> u64 {
    3000
}

fn default_poll_timeout_ms() -> u64 {
    1000
}

fn default_receiver_name() -> String {
    "Gimbal PTZ Receiver".to_string()
}

fn default_true() -> bool {
    true
}
