//! Bounded source discovery
//!
//! Turns "scan the network for controllable sources" into a deterministic,
//! time-bounded operation. A scan that observes no sources within its
//! bound returns an explicit timeout instead of blocking forever or
//! reporting a silently empty list, because an empty network and a
//! not-yet-populated finder are indistinguishable from the caller's side.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::backend::{Backend, DiscoveryOptions, DiscoveryScan};
use crate::error::{GimbalError, Result};
use crate::types::{DiscoveryResult, SourceIdentity};

/// Upper bound for a single finder wait, so the scan deadline is
/// re-checked at a reasonable cadence
const WAIT_SLICE: Duration = Duration::from_millis(1000);

/// Owner of the most recent discovery result
///
/// Each completed scan fully replaces the held result and bumps the
/// generation counter. Resolution is always against the currently held
/// result; an index that was valid for an older generation may not be
/// valid now.
pub struct SourceRegistry<B: Backend> {
    backend: Arc<B>,
    options: DiscoveryOptions,
    generation: u64,
    latest: Option<DiscoveryResult>,
}

impl<B: Backend> SourceRegistry<B> {
    /// Create a registry scanning through the given backend
    pub fn new(backend: Arc<B>, options: DiscoveryOptions) -> Self {
        Self {
            backend,
            options,
            generation: 0,
            latest: None,
        }
    }

    /// Run a bounded scan, replacing the held result on success
    ///
    /// Blocks the calling thread for up to `timeout`. The discovery
    /// context is scoped to this call and is released on every exit path,
    /// including timeout. On timeout the previously held result is kept.
    pub fn scan(&mut self, timeout: Duration) -> Result<&DiscoveryResult> {
        let started = Instant::now();
        let deadline = started + timeout;
        let mut scan = self.backend.open_scan(&self.options)?;

        let mut sources = scan.current_sources();
        while sources.is_empty() {
            let now = Instant::now();
            if now >= deadline {
                let waited_ms = started.elapsed().as_millis() as u64;
                warn!(waited_ms, "discovery scan observed no sources within bound");
                return Err(GimbalError::DiscoveryTimeout { waited_ms });
            }
            scan.wait_for_sources(WAIT_SLICE.min(deadline - now));
            sources = scan.current_sources();
        }
        drop(scan);

        self.generation += 1;
        debug!(
            generation = self.generation,
            count = sources.len(),
            "discovery scan complete"
        );
        Ok(self.latest.insert(DiscoveryResult {
            sources,
            generation: self.generation,
        }))
    }

    /// Resolve an ordinal index against the held result. Pure lookup.
    pub fn resolve(&self, index: usize) -> Result<&SourceIdentity> {
        let count = self.latest.as_ref().map_or(0, DiscoveryResult::len);
        self.latest
            .as_ref()
            .and_then(|result| result.get(index))
            .ok_or(GimbalError::IndexOutOfRange { index, count })
    }

    /// The most recent successful scan result, if any
    pub fn latest(&self) -> Option<&DiscoveryResult> {
        self.latest.as_ref()
    }

    /// Number of completed scans
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
