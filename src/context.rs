//! Cancellation and deadline signal threaded through every request.

use crate::error::{Error, Result};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Carries a cancellation flag and an optional deadline for a call.
///
/// Clones share the cancellation flag, so one clone can be handed to a
/// request while another is kept to cancel it.
///
/// ```rust,no_run
/// use std::time::Duration;
/// use usda::{Client, Context};
///
/// # async fn run() -> Result<(), usda::Error> {
/// let client = Client::builder("your-api-key").build()?;
/// let ctx = Context::new().with_timeout(Duration::from_secs(5));
/// let results = client.food_name_search(&ctx, "cheddar").await?;
/// println!("{} matches", results.list.total);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    state: Arc<CancelState>,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire `timeout` from now.
    ///
    /// A timeout too large to represent as an instant sets no deadline.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Expire at `deadline`. An earlier deadline already set is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancel every request running under this context or its clones.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
        self.state.notify.notify_waiters();
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Why the context is done, or `None` while it is still live.
    pub fn err(&self) -> Option<Error> {
        if self.is_cancelled() {
            return Some(Error::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Error::Timeout),
            _ => None,
        }
    }

    /// Resolve once the context is cancelled.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.state.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Resolve with the context's error once it is cancelled or expired.
    async fn done(&self) -> Error {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.cancelled() => Error::Cancelled,
                    _ = tokio::time::sleep_until(deadline) => Error::Timeout,
                }
            }
            None => {
                self.cancelled().await;
                Error::Cancelled
            }
        }
    }

    /// Run `fut` until it completes or the context is done.
    ///
    /// A transport error observed after the context fired is replaced by the
    /// context's own error.
    pub(crate) async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }

        let result = tokio::select! {
            biased;
            err = self.done() => Err(err),
            result = fut => result,
        };

        result.map_err(|err| match self.err() {
            Some(ctx_err) if err.is_transport() => ctx_err,
            _ => err,
        })
    }
}
