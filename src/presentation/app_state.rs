// Application state for HTTP handlers
use crate::application::breakpoint_watcher::BreakpointWatcher;
use crate::application::edit_session::EditSession;
use crate::application::widget_registry::WidgetRegistry;
use crate::domain::dashboard::DashboardConfig;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// The edit session is the single owner of every store mutation; requests
/// are serialized through its mutex.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<EditSession>>,
    pub snapshots: watch::Receiver<Arc<DashboardConfig>>,
    pub registry: Arc<WidgetRegistry>,
    pub breakpoints: BreakpointWatcher,
}

impl AppState {
    pub fn new(session: EditSession, breakpoints: BreakpointWatcher) -> Self {
        let snapshots = session.subscribe();
        let registry = session.registry().clone();
        Self {
            session: Arc::new(Mutex::new(session)),
            snapshots,
            registry,
            breakpoints,
        }
    }

    /// Latest published snapshot, readable without taking the session lock.
    pub fn snapshot(&self) -> Arc<DashboardConfig> {
        self.snapshots.borrow().clone()
    }
}
