//! Lifecycle-bound task groups.
//!
//! Every screen controller owns a [`Scope`]; subscriptions it launches are
//! children of that scope and are cancelled together when the scope is
//! cancelled or dropped. The worker schedule runs under a scope as well.

use std::future::Future;
use std::sync::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A cancellation scope owning a set of spawned tasks.
#[derive(Debug)]
pub struct Scope {
    shutdown_tx: watch::Sender<bool>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Scope {
    pub fn new() -> Self {
        let (shutdown_tx, _shutdown_rx) = watch::channel(false);
        Self {
            shutdown_tx,
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Spawn a child task that is aborted when the scope is cancelled.
    ///
    /// The future races the shutdown signal at every suspension point, so a
    /// cancelled scope publishes nothing further even if the future was
    /// already in flight.
    pub fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if *self.shutdown_tx.borrow() {
            return;
        }
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = shutdown_rx.changed() => {}
                _ = fut => {}
            }
        });
        self.handles.lock().expect("scope lock poisoned").push(handle);
    }

    /// Cancel every child task. Idempotent.
    pub fn cancel(&self) {
        let _ = self.shutdown_tx.send(true);
        for handle in self.handles.lock().expect("scope lock poisoned").drain(..) {
            handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// A receiver that resolves when the scope is cancelled.
    pub fn cancelled(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_spawn_runs_to_completion() {
        let scope = Scope::new();
        let done = Arc::new(AtomicBool::new(false));
        let flag = done.clone();
        scope.spawn(async move {
            flag.store(true, Ordering::SeqCst);
        });
        tokio::task::yield_now().await;
        assert!(done.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_stops_children() {
        let scope = Scope::new();
        let done = Arc::new(AtomicBool::new(false));
        let flag = done.clone();
        scope.spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            flag.store(true, Ordering::SeqCst);
        });
        scope.cancel();
        tokio::task::yield_now().await;
        assert!(!done.load(Ordering::SeqCst));
        assert!(scope.is_cancelled());
    }

    #[tokio::test]
    async fn test_spawn_after_cancel_is_a_no_op() {
        let scope = Scope::new();
        scope.cancel();
        let done = Arc::new(AtomicBool::new(false));
        let flag = done.clone();
        scope.spawn(async move {
            flag.store(true, Ordering::SeqCst);
        });
        tokio::task::yield_now().await;
        assert!(!done.load(Ordering::SeqCst));
    }
}
