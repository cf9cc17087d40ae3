//! # Execution Context
//!
//! Every service operation receives a [`Context`] that bounds how long the
//! work may take and lets the owner abandon it early. The server derives one
//! per request from its root context (cancelled on shutdown); the client
//! applies it around each HTTP exchange.
//!
//! Contexts are cheap to clone. Deriving a context never loosens it: a new
//! timeout only takes effect if it ends earlier than the current deadline,
//! and a new cancel handle is added on top of the existing signals.

use std::future::{poll_fn, Future};
use std::task::Poll;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// Why a context stopped the work it was guarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Cancelled {
    #[error("context deadline exceeded")]
    DeadlineExceeded,
    #[error("context canceled")]
    Canceled,
}

#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    signals: Vec<watch::Receiver<bool>>,
}

/// Cancels every context derived from the one it was created with.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    sender: std::sync::Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

impl Context {
    /// A context with no deadline that is never cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current <= deadline => current,
            _ => deadline,
        });
        self
    }

    pub fn with_cancel(mut self) -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        self.signals.push(receiver);
        let handle = CancelHandle {
            sender: std::sync::Arc::new(sender),
        };
        (self, handle)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn is_cancelled(&self) -> bool {
        self.signals.iter().any(|signal| *signal.borrow())
    }

    /// The reason this context is already done, if any.
    pub fn err(&self) -> Option<Cancelled> {
        if self.is_cancelled() {
            return Some(Cancelled::Canceled);
        }
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => Some(Cancelled::DeadlineExceeded),
            _ => None,
        }
    }

    /// Drive `fut` to completion unless the deadline passes or a cancel
    /// handle fires first. The abandoned future is dropped.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, Cancelled>
    where
        F: Future,
    {
        if let Some(reason) = self.err() {
            return Err(reason);
        }

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancelled() => Err(Cancelled::Canceled),
            _ = deadline => Err(Cancelled::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }

    /// Resolves once any cancel handle fires; pends forever when none can.
    pub async fn cancelled(&self) {
        let mut receivers = self.signals.clone();
        let mut waits: Vec<_> = receivers
            .iter_mut()
            .map(|receiver| Some(Box::pin(receiver.wait_for(|cancelled| *cancelled))))
            .collect();

        poll_fn(|cx| {
            for slot in waits.iter_mut() {
                let Some(wait) = slot.as_mut() else {
                    continue;
                };
                let poll = wait.as_mut().poll(cx);
                match poll {
                    Poll::Ready(Ok(_)) => return Poll::Ready(()),
                    // Handle dropped without cancelling.
                    Poll::Ready(Err(_)) => *slot = None,
                    Poll::Pending => {}
                }
            }
            Poll::Pending
        })
        .await
    }
}
