//! Control session management
//!
//! Owns the single live connection to a source and mediates all motion
//! commands against it. The session state machine is
//! Unbound → Bound(capability unknown) → Bound(capability known); every
//! transition out of Bound releases the connection before anything else
//! happens, so at most one connection is ever open.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::backend::{Backend, Connection, PollEvent, ReceiverOptions};
use crate::error::Result;
use crate::types::{Axis, Capability, MotionCommand, SourceIdentity};

/// Zero-or-one live control connection
pub struct ControlSession<B: Backend> {
    backend: Arc<B>,
    options: ReceiverOptions,
    poll_timeout: Duration,
    bound: Option<BoundSession<B::Connection>>,
    pending: MotionCommand,
    last_commanded: Option<MotionCommand>,
}

struct BoundSession<C> {
    identity: SourceIdentity,
    connection: C,
    capability: Capability,
}

impl<B: Backend> ControlSession<B> {
    /// Create an unbound session
    pub fn new(backend: Arc<B>, options: ReceiverOptions, poll_timeout: Duration) -> Self {
        Self {
            backend,
            options,
            poll_timeout,
            bound: None,
            pending: MotionCommand::default(),
            last_commanded: None,
        }
    }

    /// Bind the session to a source
    ///
    /// Re-binding to the already-bound identity keeps the existing
    /// connection untouched. Binding to a different identity releases the
    /// old connection strictly before the new one is established, so an
    /// underlying connection-count limit is never exceeded. On connect
    /// failure the session is left unbound; the stale connection is not
    /// retained.
    pub fn bind_to(&mut self, identity: &SourceIdentity) -> Result<()> {
        if let Some(bound) = &self.bound {
            if bound.identity == *identity {
                debug!(source = %identity, "already bound, keeping connection");
                return Ok(());
            }
        }

        if let Some(old) = self.bound.take() {
            info!(source = %old.identity, "releasing previous control connection");
            drop(old);
        }

        match self.backend.connect(identity, &self.options) {
            Ok(connection) => {
                info!(source = %identity, "control connection established");
                self.bound = Some(BoundSession {
                    identity: identity.clone(),
                    connection,
                    capability: Capability::Unknown,
                });
                Ok(())
            }
            Err(err) => {
                warn!(source = %identity, error = %err, "connect failed, session left unbound");
                Err(err)
            }
        }
    }

    /// Release the current connection. Safe to call when unbound.
    pub fn unbind(&mut self) {
        if let Some(bound) = self.bound.take() {
            info!(source = %bound.identity, "control connection released");
        }
    }

    /// Update the pending value for one axis. Pure state update; values
    /// outside [-1, 1] are clamped, never rejected.
    pub fn set_axis(&mut self, axis: Axis, value: f32) {
        self.pending.set(axis, value);
    }

    /// Issue the pending motion values against the bound source
    ///
    /// No-op when unbound. Otherwise polls the connection with a bounded
    /// wait; a reported status change refines the motion capability. The
    /// pending pan/tilt and zoom go out as a single commanded move only
    /// when capability is known-supported; an unsupported or still-unknown
    /// capability drops the command silently.
    pub fn trigger(&mut self) -> Result<()> {
        let Some(bound) = self.bound.as_mut() else {
            debug!("trigger with no active session, command dropped");
            return Ok(());
        };

        if bound.connection.poll_status(self.poll_timeout) == PollEvent::StatusChanged {
            bound.capability = if bound.connection.motion_supported() {
                Capability::Supported
            } else {
                Capability::Unsupported
            };
            debug!(
                source = %bound.identity,
                capability = %bound.capability,
                "status poll refined motion capability"
            );
        }

        match bound.capability {
            Capability::Supported => {
                bound
                    .connection
                    .pan_tilt(self.pending.pan, self.pending.tilt)?;
                bound.connection.zoom(self.pending.zoom)?;
                self.last_commanded = Some(self.pending);
                debug!(source = %bound.identity, command = %self.pending, "motion command issued");
            }
            Capability::Unsupported => {
                debug!(source = %bound.identity, "source has no motion control, command dropped");
            }
            Capability::Unknown => {
                debug!(source = %bound.identity, "motion capability not yet known, command dropped");
            }
        }
        Ok(())
    }

    /// Whether a connection is currently open
    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// Identity of the bound source, if any
    pub fn identity(&self) -> Option<&SourceIdentity> {
        self.bound.as_ref().map(|b| &b.identity)
    }

    /// Motion capability of the bound source; `Unknown` when unbound
    pub fn capability(&self) -> Capability {
        self.bound
            .as_ref()
            .map_or(Capability::Unknown, |b| b.capability)
    }

    /// The pending axis values
    pub fn pending(&self) -> MotionCommand {
        self.pending
    }

    /// The most recently issued move, if any
    pub fn last_commanded(&self) -> Option<MotionCommand> {
        self.last_commanded
    }
}
