use std::sync::Arc;
use tokio::sync::watch;

/// Counts the outstanding work of one check session.
///
/// Every queued or running work item owns exactly one [`Credit`]. The count
/// drops when the credit is dropped, so a worker that panics still releases
/// its share.
#[derive(Clone)]
pub struct CompletionTracker {
    outstanding: Arc<watch::Sender<usize>>,
}

impl CompletionTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            outstanding: Arc::new(tx),
        }
    }

    pub fn credit(&self) -> Credit {
        self.outstanding.send_modify(|n| *n += 1);
        Credit {
            outstanding: Arc::clone(&self.outstanding),
        }
    }

    pub fn outstanding(&self) -> usize {
        *self.outstanding.borrow()
    }

    /// Resolves once no credit is outstanding.
    pub async fn wait_idle(&self) {
        let mut rx = self.outstanding.subscribe();
        // the sender lives in `self`, so this cannot fail
        let _ = rx.wait_for(|n| *n == 0).await;
    }
}

impl Default for CompletionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CompletionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionTracker")
            .field("outstanding", &self.outstanding())
            .finish()
    }
}

/// One unit of outstanding work.
#[must_use = "dropping a credit marks its work item as finished"]
pub struct Credit {
    outstanding: Arc<watch::Sender<usize>>,
}

impl Drop for Credit {
    fn drop(&mut self) {
        self.outstanding.send_modify(|n| *n = n.saturating_sub(1));
    }
}

impl std::fmt::Debug for Credit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credit")
    }
}
