//! Error types for Gimbal

use thiserror::Error;

/// Result type alias using GimbalError
pub type Result<T> = std::result::Result<T, GimbalError>;

/// Main error type for Gimbal operations
#[derive(Debug, Error)]
pub enum GimbalError {
    /// Discovery-layer error from the protocol backend
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Control-layer error from the protocol backend
    #[error("Control error: {0}")]
    Control(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No sources appeared on the network within the scan bound
    #[error("No sources discovered within {waited_ms} ms")]
    DiscoveryTimeout {
        /// How long the scan actually waited
        waited_ms: u64,
    },

    /// Selection index exceeds the discovered source count
    #[error("Source index {index} out of range ({count} sources discovered)")]
    IndexOutOfRange {
        /// The requested ordinal index
        index: usize,
        /// Number of sources in the held discovery result
        count: usize,
    },

    /// A source resolved but the control connection could not be established
    #[error("Failed to connect to {source_name}: {reason}")]
    ConnectFailed {
        /// Name of the source we tried to connect to
        source_name: String,
        /// Backend-reported reason
        reason: String,
    },

    /// No control session is active
    #[error("No active control session")]
    NoActiveSession,

    /// Protocol runtime failed to initialize (hard fault)
    #[error("Protocol runtime initialization failed: {0}")]
    Init(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<GimbalError>,
    },
}

impl GimbalError {
    /// Create a discovery error
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    /// Create a control error
    pub fn control(msg: impl Into<String>) -> Self {
        Self::Control(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an initialization error
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }

    /// Create a connect-failed error
    pub fn connect_failed(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConnectFailed {
            source_name: source.into(),
            reason: reason.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// A short hint the CLI can print below the error message
    pub fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::DiscoveryTimeout { .. } => Some(
                "No sources are advertising on this network. Check connectivity, or raise scan_timeout_ms in config.toml.",
            ),
            Self::IndexOutOfRange { .. } => {
                Some("Run 'gimbal list' to see the currently discovered sources.")
            }
            Self::ConnectFailed { .. } => {
                Some("The source may have gone offline. Re-run 'gimbal select' after the next scan.")
            }
            Self::NoActiveSession => Some("Start the daemon with 'gimbal run'."),
            Self::Config(_) => Some("Check ~/.config/gimbal/config.toml ('gimbal config show')."),
            Self::Init(_) => {
                Some("The protocol runtime could not start; verify the backend installation.")
            }
            Self::WithContext { source, .. } => source.user_hint(),
            _ => None,
        }
    }

    /// Whether the condition is expected to clear on a later input event
    /// (new index, new trigger) without operator intervention in the code
    pub fn is_user_recoverable(&self) -> bool {
        match self {
            Self::Discovery(_)
            | Self::Control(_)
            | Self::Config(_)
            | Self::DiscoveryTimeout { .. }
            | Self::IndexOutOfRange { .. }
            | Self::ConnectFailed { .. }
            | Self::NoActiveSession => true,
            Self::Init(_) | Self::Io(_) => false,
            Self::WithContext { source, .. } => source.is_user_recoverable(),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
