//! Control thread for a manager
//!
//! The manager's bounded calls (scan, status poll) block, and the host
//! surface requires that an index change run to completion before any
//! later-queued axis or trigger event applies. Both fall out of giving
//! each manager one dedicated OS thread draining a FIFO event channel:
//! events apply strictly in submission order and the async side never
//! blocks on discovery.

use parking_lot::Mutex;
use std::sync::mpsc;
use std::thread;
use tokio::sync::oneshot;
use tracing::{debug, error, warn};

use crate::backend::Backend;
use crate::error::{GimbalError, Result};
use crate::manager::{Manager, ManagerStats};
use crate::types::Axis;

enum Event {
    Select {
        index: usize,
        reply: oneshot::Sender<Result<String>>,
    },
    SetAxis {
        axis: Axis,
        value: f32,
    },
    Trigger,
    Stats {
        reply: oneshot::Sender<ManagerStats>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Async facade over a manager running on its own control thread
pub struct ManagerDriver {
    tx: mpsc::Sender<Event>,
    thread: Mutex<Option<thread::JoinHandle<()>>>,
}

impl ManagerDriver {
    /// Move `manager` onto a dedicated control thread
    pub fn spawn<B: Backend>(mut manager: Manager<B>) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let thread = thread::Builder::new()
            .name("gimbal-control".into())
            .spawn(move || {
                for event in rx {
                    match event {
                        Event::Select { index, reply } => {
                            let outcome = manager.select_index(index);
                            if let Err(err) = &outcome {
                                warn!(index, error = %err, "source selection failed");
                            }
                            let _ = reply.send(outcome);
                        }
                        Event::SetAxis { axis, value } => manager.set_axis(axis, value),
                        Event::Trigger => {
                            if let Err(err) = manager.trigger() {
                                warn!(error = %err, "motion command failed");
                            }
                        }
                        Event::Stats { reply } => {
                            let _ = reply.send(manager.stats());
                        }
                        Event::Shutdown { reply } => {
                            manager.shutdown();
                            let _ = reply.send(());
                            break;
                        }
                    }
                }
                // A closed channel without an explicit shutdown event still
                // releases the session.
                manager.shutdown();
                debug!("control thread exiting");
            })
            .map_err(|e| GimbalError::init(format!("failed to spawn control thread: {}", e)))?;

        Ok(Self {
            tx,
            thread: Mutex::new(Some(thread)),
        })
    }

    /// Queue an index change and wait for the scan-resolve-bind sequence
    /// to complete
    pub async fn select(&self, index: usize) -> Result<String> {
        let (reply, rx) = oneshot::channel();
        self.send(Event::Select { index, reply })?;
        rx.await
            .map_err(|_| GimbalError::control("control thread dropped the reply"))?
    }

    /// Queue a pending-axis update
    pub fn set_axis(&self, axis: Axis, value: f32) -> Result<()> {
        self.send(Event::SetAxis { axis, value })
    }

    /// Queue a move trigger
    pub fn trigger(&self) -> Result<()> {
        self.send(Event::Trigger)
    }

    /// Snapshot the manager state. The reply is queued behind any earlier
    /// events, so it reflects everything submitted before it.
    pub async fn stats(&self) -> Result<ManagerStats> {
        let (reply, rx) = oneshot::channel();
        self.send(Event::Stats { reply })?;
        rx.await
            .map_err(|_| GimbalError::control("control thread dropped the reply"))
    }

    /// Shut the manager down and join the control thread
    ///
    /// Waits out any in-flight bounded call. Idempotent; later calls and
    /// later event submissions report `NoActiveSession`.
    pub async fn shutdown(&self) {
        let thread = self.thread.lock().take();
        if let Some(thread) = thread {
            let (reply, rx) = oneshot::channel();
            if self.send(Event::Shutdown { reply }).is_ok() {
                let _ = rx.await;
            }
            if thread.join().is_err() {
                error!("control thread panicked");
            }
        }
    }

    fn send(&self, event: Event) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| GimbalError::NoActiveSession)
    }
}
