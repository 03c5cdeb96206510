//! Abort signalling shared by the caller, the timer and the transport.
//!
//! One controller per session. The first `abort` wins and its reason is
//! kept; later calls are no-ops. Listeners that register after the abort
//! still observe it.

use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Why a session was aborted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The caller cancelled
    Cancelled,
    /// The session deadline expired
    Timeout,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::Cancelled => f.write_str("cancelled"),
            AbortReason::Timeout => f.write_str("timeout"),
        }
    }
}

/// Owner side of the abort signal
#[derive(Debug, Clone)]
pub struct AbortController {
    tx: Arc<watch::Sender<Option<AbortReason>>>,
}

impl AbortController {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Abort with `reason`. Returns false if already aborted.
    pub fn abort(&self, reason: AbortReason) -> bool {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        })
    }

    /// Reason of the abort, once aborted
    pub fn reason(&self) -> Option<AbortReason> {
        *self.tx.borrow()
    }

    pub fn is_aborted(&self) -> bool {
        self.reason().is_some()
    }

    /// A listener for this controller
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

/// Listener side of the abort signal
#[derive(Debug, Clone)]
pub struct AbortSignal {
    rx: watch::Receiver<Option<AbortReason>>,
}

impl AbortSignal {
    pub fn reason(&self) -> Option<AbortReason> {
        *self.rx.borrow()
    }

    /// Resolve once aborted. Resolves immediately if already aborted.
    pub async fn aborted(&mut self) -> AbortReason {
        loop {
            if let Some(reason) = *self.rx.borrow_and_update() {
                return reason;
            }
            if self.rx.changed().await.is_err() {
                // Controller gone without aborting
                return futures::future::pending().await;
            }
        }
    }
}

/// Caller-facing handle that can only cancel
#[derive(Debug, Clone)]
pub struct CancelHandle {
    controller: AbortController,
}

impl CancelHandle {
    pub(crate) fn new(controller: AbortController) -> Self {
        Self { controller }
    }

    /// Cancel the session. Returns false if it was already aborted.
    pub fn cancel(&self) -> bool {
        self.controller.abort(AbortReason::Cancelled)
    }

    pub fn is_cancelled(&self) -> bool {
        self.controller.reason() == Some(AbortReason::Cancelled)
    }

    /// Reason the session was aborted, if it was
    pub fn reason(&self) -> Option<AbortReason> {
        self.controller.reason()
    }
}
