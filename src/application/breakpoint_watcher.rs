// Breakpoint watcher - Debounced viewport width to breakpoint resolution
use crate::domain::breakpoint::Breakpoint;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Owns the current breakpoint. Resize notifications are debounced with
/// cancel-and-reschedule semantics: only the most recent one fires.
#[derive(Debug, Clone)]
pub struct BreakpointWatcher {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    debounce: Duration,
    latest: AtomicU64,
    current: watch::Sender<Breakpoint>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl BreakpointWatcher {
    pub fn new(initial: Breakpoint, debounce: Duration) -> Self {
        let (current, _rx) = watch::channel(initial);
        Self {
            inner: Arc::new(Inner {
                debounce,
                latest: AtomicU64::new(0),
                current,
                pending: Mutex::new(None),
            }),
        }
    }

    pub fn current(&self) -> Breakpoint {
        *self.inner.current.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Breakpoint> {
        self.inner.current.subscribe()
    }

    /// Schedule a recomputation for `width`, superseding any pending one.
    /// Must be called from within a tokio runtime.
    pub fn on_resize(&self, width: u32) {
        let token = self.inner.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = self.inner.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            if inner.latest.load(Ordering::SeqCst) != token {
                return;
            }
            let next = Breakpoint::resolve(width);
            let changed = inner.current.send_if_modified(|current| {
                if *current == next {
                    false
                } else {
                    *current = next;
                    true
                }
            });
            if changed {
                tracing::debug!("Viewport {}px -> breakpoint {}", width, next);
            }
        });

        let mut pending = self.inner.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(task) {
            previous.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_recompute_waits_for_debounce() {
        let watcher = BreakpointWatcher::new(Breakpoint::Lg, DEFAULT_DEBOUNCE);

        watcher.on_resize(500);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(watcher.current(), Breakpoint::Lg);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(watcher.current(), Breakpoint::Xs);
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_latest_resize_fires() {
        let watcher = BreakpointWatcher::new(Breakpoint::Lg, DEFAULT_DEBOUNCE);
        let mut rx = watcher.subscribe();

        watcher.on_resize(400);
        tokio::time::sleep(Duration::from_millis(50)).await;
        watcher.on_resize(800);
        tokio::time::sleep(Duration::from_millis(50)).await;
        watcher.on_resize(1700);

        // The first two deadlines pass without firing.
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(watcher.current(), Breakpoint::Lg);
        assert!(!rx.has_changed().unwrap());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(watcher.current(), Breakpoint::Xl);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Breakpoint::Xl);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_breakpoint_does_not_notify() {
        let watcher = BreakpointWatcher::new(Breakpoint::Lg, DEFAULT_DEBOUNCE);
        let rx = watcher.subscribe();

        watcher.on_resize(1300);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(watcher.current(), Breakpoint::Lg);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_recomputations_are_aborted() {
        let watcher = BreakpointWatcher::new(Breakpoint::Lg, DEFAULT_DEBOUNCE);
        for width in [300, 500, 700, 900, 1100] {
            watcher.on_resize(width);
        }
        tokio::time::sleep(Duration::from_millis(1)).await;

        let metrics = tokio::runtime::Handle::current().metrics();
        assert_eq!(metrics.num_alive_tasks(), 1);

        tokio::time::sleep(DEFAULT_DEBOUNCE).await;
        assert_eq!(watcher.current(), Breakpoint::Md);
        assert_eq!(metrics.num_alive_tasks(), 0);
    }
}
