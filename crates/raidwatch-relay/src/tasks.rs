//! Owned task registry for coordinated shutdown.

use std::future::Future;

use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Every long-running task is spawned here; `shutdown` cancels and joins all.
#[derive(Default)]
pub struct TaskRegistry {
    cancel: CancellationToken,
    set: Mutex<JoinSet<()>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that fires when the registry shuts down.
    pub fn token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    pub async fn spawn<F>(&self, name: &'static str, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.set
            .lock()
            .await
            .spawn(fut.instrument(tracing::info_span!("task", name)));
    }

    pub async fn len(&self) -> usize {
        self.set.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.set.lock().await.is_empty()
    }

    /// Cancel every task and wait for all of them to finish.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let mut set = self.set.lock().await;
        while let Some(res) = set.join_next().await {
            if let Err(e) = res {
                if e.is_panic() {
                    tracing::error!(error = %e, "task panicked");
                }
            }
        }
    }
}
