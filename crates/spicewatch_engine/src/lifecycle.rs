use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Mount-state token shared by a view and every task it spawns.
///
/// Deactivation is one-way. Async completions must call [`is_active`] right
/// before mutating shared state, and again after any further await.
///
/// [`is_active`]: LifecycleGuard::is_active
#[derive(Debug, Clone, Default)]
pub struct LifecycleGuard {
    token: CancellationToken,
}

impl LifecycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Marks the view torn down. Synchronous; wakes every [`run`](Self::run).
    pub fn deactivate(&self) {
        self.token.cancel();
    }

    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// Drives `work` until it finishes or the guard is deactivated. The future
    /// is dropped on teardown, and a result that races teardown is discarded.
    pub async fn run<F>(&self, work: F) -> Option<F::Output>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            output = work => self.is_active().then_some(output),
        }
    }
}
