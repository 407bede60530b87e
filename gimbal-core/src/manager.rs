//! Discovery-and-control manager
//!
//! Composes the source registry and the control session behind the event
//! surface the host sees: index changes, axis changes, and move triggers.
//! Every failure mode short of backend initialization degrades to "no
//! session" or "command dropped"; the manager itself never dies with the
//! network.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::backend::Backend;
use crate::config::ControlConfig;
use crate::discovery::SourceRegistry;
use crate::error::Result;
use crate::session::ControlSession;
use crate::types::{Axis, Capability, Handle, MotionCommand, SourceIdentity};

/// One managed source selection with its control session
pub struct Manager<B: Backend> {
    handle: Handle,
    scan_timeout: Duration,
    registry: SourceRegistry<B>,
    session: ControlSession<B>,
    selected_index: Option<usize>,
    source_name: Option<String>,
}

impl<B: Backend> Manager<B> {
    /// Create a manager on the given backend
    pub fn new(backend: Arc<B>, config: ControlConfig) -> Self {
        let handle = Handle::new();
        info!(%handle, "control manager created");
        Self {
            handle,
            scan_timeout: config.scan_timeout,
            registry: SourceRegistry::new(backend.clone(), config.discovery_options()),
            session: ControlSession::new(backend, config.receiver_options(), config.poll_timeout),
            selected_index: None,
            source_name: None,
        }
    }

    /// Handle an index change: scan, resolve, rebind
    ///
    /// Returns the resolved source name. A failed scan or failed
    /// resolution leaves the prior session and the published name
    /// untouched; a failed connect leaves no session but still reports the
    /// name that resolved, since resolution itself succeeded.
    pub fn select_index(&mut self, index: usize) -> Result<String> {
        debug!(handle = %self.handle, index, "index changed, rescanning");
        self.selected_index = Some(index);
        self.registry.scan(self.scan_timeout)?;
        let identity = self.registry.resolve(index)?.clone();
        self.source_name = Some(identity.name.clone());
        self.session.bind_to(&identity)?;
        Ok(identity.name)
    }

    /// Update one pending axis value
    pub fn set_axis(&mut self, axis: Axis, value: f32) {
        self.session.set_axis(axis, value);
    }

    /// Issue the pending motion values against the bound source
    pub fn trigger(&mut self) -> Result<()> {
        self.session.trigger()
    }

    /// Release the active session
    ///
    /// Idempotent: the connection is closed at most once no matter how
    /// many times this runs, and running it with no session is safe.
    pub fn shutdown(&mut self) {
        if self.session.is_bound() {
            info!(handle = %self.handle, "manager shutting down");
        }
        self.session.unbind();
    }

    /// Last successfully resolved source name
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// Identity of the bound source, if any
    pub fn bound_source(&self) -> Option<&SourceIdentity> {
        self.session.identity()
    }

    /// Whether a control connection is open
    pub fn is_bound(&self) -> bool {
        self.session.is_bound()
    }

    /// This manager's handle
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Snapshot of the manager's observable state
    pub fn stats(&self) -> ManagerStats {
        ManagerStats {
            bound: self.session.is_bound(),
            source: self.session.identity().map(|i| i.name.clone()),
            source_name: self.source_name.clone(),
            selected_index: self.selected_index,
            capability: self.session.capability(),
            scan_generation: self.registry.generation(),
            discovered: self.registry.latest().map(|r| r.len()),
            pending: self.session.pending(),
            last_commanded: self.session.last_commanded(),
        }
    }
}

/// Observable manager state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerStats {
    /// Whether a control connection is open
    pub bound: bool,
    /// Name of the bound source, if any
    pub source: Option<String>,
    /// Last successfully resolved name (retained across failures)
    pub source_name: Option<String>,
    /// Most recently requested ordinal index
    pub selected_index: Option<usize>,
    /// Motion capability of the bound source
    pub capability: Capability,
    /// Number of completed discovery scans
    pub scan_generation: u64,
    /// Source count of the most recent scan, if one completed
    pub discovered: Option<usize>,
    /// Pending axis values
    pub pending: MotionCommand,
    /// Most recently issued move, if any
    pub last_commanded: Option<MotionCommand>,
}
