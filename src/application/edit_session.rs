// Edit session controller - Gates mutation and commits or discards edits
use crate::application::config_store::DashboardStore;
use crate::application::error::{DashboardError, Result};
use crate::application::layout_sync::{apply_layout_change, LayoutChange, SyncReport};
use crate::application::persistence_gateway::{LoadOutcome, PersistenceGateway};
use crate::application::widget_lifecycle::{self, WidgetActionHandler};
use crate::application::widget_registry::WidgetRegistry;
use crate::domain::breakpoint::Breakpoint;
use crate::domain::dashboard::DashboardConfig;
use crate::domain::widget::{WidgetConfig, WidgetId};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

pub const DISCARD_PROMPT: &str = "You have unsaved changes. Discard them?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Viewing,
    Editing,
    Saving,
    Cancelling,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Viewing => "viewing",
            SessionState::Editing => "editing",
            SessionState::Saving => "saving",
            SessionState::Cancelling => "cancelling",
        };
        f.write_str(name)
    }
}

/// Decision point for discarding unsaved changes.
pub trait ConfirmDiscard {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> ConfirmDiscard for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelOutcome {
    /// Edits were discarded and the session is back to viewing.
    Discarded,
    /// The user declined; the session is still editing, untouched.
    Kept,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub state: SessionState,
    pub unsaved_changes: bool,
}

pub struct EditSession {
    store: DashboardStore,
    gateway: Arc<PersistenceGateway>,
    registry: Arc<WidgetRegistry>,
    state: SessionState,
    unsaved_changes: bool,
    baseline: Arc<DashboardConfig>,
}

impl EditSession {
    /// Start a viewing session on `initial`, which is also treated as the
    /// last persisted configuration.
    pub fn new(gateway: Arc<PersistenceGateway>, registry: Arc<WidgetRegistry>, initial: DashboardConfig) -> Self {
        let store = DashboardStore::new(initial);
        let baseline = store.snapshot();
        Self {
            store,
            gateway,
            registry,
            state: SessionState::Viewing,
            unsaved_changes: false,
            baseline,
        }
    }

    /// Load through the gateway and start a viewing session on the result.
    pub async fn open(gateway: Arc<PersistenceGateway>, registry: Arc<WidgetRegistry>) -> (Self, LoadOutcome) {
        let outcome = gateway.load().await;
        let session = Self::new(gateway, registry, outcome.config.clone());
        (session, outcome)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved_changes
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            state: self.state,
            unsaved_changes: self.unsaved_changes,
        }
    }

    pub fn snapshot(&self) -> Arc<DashboardConfig> {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardConfig>> {
        self.store.subscribe()
    }

    pub fn registry(&self) -> &Arc<WidgetRegistry> {
        &self.registry
    }

    pub fn gateway(&self) -> &Arc<PersistenceGateway> {
        &self.gateway
    }

    pub fn enter_edit(&mut self) -> Result<()> {
        self.require(SessionState::Viewing, "enter edit mode")?;
        self.transition(SessionState::Editing);
        Ok(())
    }

    /// Reconcile a rendering-surface layout event into the store.
    pub fn apply_layout_change(&mut self, change: &LayoutChange) -> Result<SyncReport> {
        self.require(SessionState::Editing, "change the layout")?;
        let (next, report) = apply_layout_change(&self.store.snapshot(), change);
        self.commit(next);
        Ok(report)
    }

    /// Add a widget of `widget_type` to the active breakpoint's layout.
    pub fn add_widget(&mut self, widget_type: &str, breakpoint: Breakpoint) -> Result<WidgetConfig> {
        self.require(SessionState::Editing, "add a widget")?;
        let (next, widget) =
            widget_lifecycle::add_widget(&self.store.snapshot(), &self.registry, widget_type, breakpoint)?;
        tracing::info!("Added {} widget {} on {}", widget.widget_type, widget.id, breakpoint);
        self.commit(next);
        Ok(widget)
    }

    /// Remove a widget from every breakpoint.
    pub fn remove_widget(&mut self, id: &WidgetId) -> Result<()> {
        self.require(SessionState::Editing, "remove a widget")?;
        let next = widget_lifecycle::remove_widget(&self.store.snapshot(), id)?;
        tracing::info!("Removed widget {} from all breakpoints", id);
        self.commit(next);
        Ok(())
    }

    pub fn duplicate_widget<H: WidgetActionHandler>(&self, id: &WidgetId, handler: &H) -> Result<H::Output> {
        widget_lifecycle::duplicate_widget(&self.store.snapshot(), id, handler)
    }

    pub fn widget_settings<H: WidgetActionHandler>(&self, id: &WidgetId, handler: &H) -> Result<H::Output> {
        widget_lifecycle::widget_settings(&self.store.snapshot(), id, handler)
    }

    /// Editing → Saving. Returns the snapshot to hand to the gateway.
    pub fn begin_save(&mut self) -> Result<Arc<DashboardConfig>> {
        if self.state == SessionState::Saving {
            return Err(DashboardError::SaveInProgress);
        }
        self.require(SessionState::Editing, "save")?;
        self.transition(SessionState::Saving);
        Ok(self.store.snapshot())
    }

    /// Conclude a save started with `begin_save`. On failure the session
    /// returns to editing with the in-memory config intact.
    pub fn finish_save(&mut self, saved: Arc<DashboardConfig>, result: anyhow::Result<()>) -> Result<()> {
        self.require(SessionState::Saving, "finish saving")?;
        match result {
            Ok(()) => {
                tracing::info!("Dashboard saved");
                self.baseline = saved;
                self.unsaved_changes = false;
                self.transition(SessionState::Viewing);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Dashboard save failed: {:#}", e);
                self.transition(SessionState::Editing);
                Err(DashboardError::SaveFailure(e))
            }
        }
    }

    pub async fn save(&mut self) -> Result<()> {
        let snapshot = self.begin_save()?;
        let result = self.gateway.save(&snapshot).await;
        self.finish_save(snapshot, result)
    }

    /// Leave edit mode, discarding edits. With unsaved changes the caller's
    /// confirmation is required; declining leaves everything as it was.
    pub fn cancel(&mut self, confirm: &dyn ConfirmDiscard) -> Result<CancelOutcome> {
        self.require(SessionState::Editing, "cancel editing")?;
        self.transition(SessionState::Cancelling);

        if self.unsaved_changes && !confirm.confirm(DISCARD_PROMPT) {
            self.transition(SessionState::Editing);
            return Ok(CancelOutcome::Kept);
        }

        self.store.replace((*self.baseline).clone());
        self.unsaved_changes = false;
        self.transition(SessionState::Viewing);
        Ok(CancelOutcome::Discarded)
    }

    fn commit(&mut self, next: DashboardConfig) {
        if self.store.replace(next) {
            self.unsaved_changes = true;
        }
    }

    fn require(&self, expected: SessionState, action: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(DashboardError::InvalidState {
                action,
                state: self.state,
            })
        }
    }

    fn transition(&mut self, next: SessionState) {
        tracing::info!("Edit session {} -> {}", self.state, next);
        self.state = next;
    }
}
