//! Cooperative cancellation for long-running aggregations.
//!
//! An aggregation checks its [`AbortSignal`] between pages, never during a
//! primitive call. A signal trips when its [`AbortHandle`] is used or when its
//! deadline passes.

use crate::error::GatewayError;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Trigger side of a cancellation pair.
#[derive(Debug)]
pub struct AbortHandle {
    tx: watch::Sender<bool>,
}

impl AbortHandle {
    /// Create a connected handle/signal pair.
    #[must_use]
    pub fn pair() -> (Self, AbortSignal) {
        let (tx, rx) = watch::channel(false);
        (
            Self { tx },
            AbortSignal {
                cancelled: Some(rx),
                deadline: None,
            },
        )
    }

    /// Request cancellation. Idempotent.
    pub fn abort(&self) {
        self.tx.send_replace(true);
    }
}

/// Observer side of a cancellation pair, optionally with a deadline.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    cancelled: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

impl AbortSignal {
    /// A signal that never trips.
    #[must_use]
    pub fn never() -> Self {
        Self::default()
    }

    /// Also trip once `timeout` has elapsed from now.
    ///
    /// An earlier deadline already in place is kept.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        self.deadline = Some(match self.deadline {
            Some(existing) if existing <= candidate => existing,
            _ => candidate,
        });
        self
    }

    /// Whether cancellation was requested explicitly.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.cancelled.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Fail if the signal has tripped.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Cancelled`] when aborted or past the deadline.
    pub fn check(&self) -> Result<(), GatewayError> {
        if self.is_aborted() {
            return Err(GatewayError::Cancelled {
                reason: "cancelled by caller".to_string(),
            });
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(GatewayError::Cancelled {
                reason: "aggregation deadline elapsed".to_string(),
            });
        }
        Ok(())
    }
}
