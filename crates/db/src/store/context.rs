//! Cancellation and deadline for one transfer.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{StoreError, StoreResult};

/// Caller-supplied cancellation signal and optional deadline.
///
/// Passed explicitly into [`Store::transfer_tx`](super::Store::transfer_tx).
/// When either fires before commit, the running statement is cancelled on
/// the server and the transaction is rolled back before the call returns,
/// so no row lock outlives it.
#[derive(Debug, Clone, Default)]
pub struct TxContext {
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl TxContext {
    /// A context that never cancels and has no deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context driven by an existing token.
    #[must_use]
    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            timeout: None,
        }
    }

    /// Sets the deadline measured from the start of the transfer.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The configured deadline, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Token shared with the caller.
    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancels every transfer running under this context.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns true once cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Starts the clock for one transfer.
    pub(crate) fn arm(&self) -> Interrupt {
        Interrupt {
            cancel: self.cancel.clone(),
            deadline: self.timeout.map(|limit| (Instant::now() + limit, limit)),
        }
    }
}

/// The signals of one running transfer, with its deadline fixed at start.
#[derive(Debug)]
pub(crate) struct Interrupt {
    cancel: CancellationToken,
    deadline: Option<(Instant, Duration)>,
}

impl Interrupt {
    /// Time left before the deadline, `None` when there is no deadline.
    pub(crate) fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|(at, _)| at.saturating_duration_since(Instant::now()))
    }

    /// Fails if the transfer was cancelled or its deadline has passed.
    pub(crate) fn check(&self) -> StoreResult<()> {
        if self.cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        match self.deadline {
            Some((at, limit)) if Instant::now() >= at => Err(StoreError::TimedOut(limit)),
            _ => Ok(()),
        }
    }

    /// Resolves with the matching error once cancelled or past the deadline.
    pub(crate) async fn fired(&self) -> StoreError {
        match self.deadline {
            Some((at, limit)) => tokio::select! {
                biased;
                () = self.cancel.cancelled() => StoreError::Cancelled,
                () = tokio::time::sleep_until(at) => StoreError::TimedOut(limit),
            },
            None => {
                self.cancel.cancelled().await;
                StoreError::Cancelled
            }
        }
    }
}
