// Dashboard configuration store - Owner of the authoritative snapshot
use crate::domain::dashboard::DashboardConfig;
use std::sync::Arc;
use tokio::sync::watch;

/// Holds the current `DashboardConfig` as an immutable snapshot. Updates
/// replace the whole value; subscribers always observe full snapshots.
#[derive(Debug)]
pub struct DashboardStore {
    tx: watch::Sender<Arc<DashboardConfig>>,
}

impl DashboardStore {
    /// The config is normalized so every breakpoint has a layout.
    pub fn new(config: DashboardConfig) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(config.normalize()));
        Self { tx }
    }

    pub fn snapshot(&self) -> Arc<DashboardConfig> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardConfig>> {
        self.tx.subscribe()
    }

    /// Swap in a new snapshot. Returns whether anything changed; equal
    /// configs do not notify subscribers.
    pub fn replace(&self, config: DashboardConfig) -> bool {
        let next = Arc::new(config.normalize());
        self.tx.send_if_modified(|current| {
            if **current == *next {
                false
            } else {
                *current = next;
                true
            }
        })
    }
}
