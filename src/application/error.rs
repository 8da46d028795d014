// Engine error types
use crate::application::edit_session::SessionState;
use crate::domain::widget::WidgetId;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("unknown widget type '{0}'")]
    UnknownWidgetType(String),

    #[error("widget '{0}' not found")]
    WidgetNotFound(WidgetId),

    #[error("cannot {action} while the session is {state}")]
    InvalidState {
        action: &'static str,
        state: SessionState,
    },

    #[error("a save is already in progress")]
    SaveInProgress,

    #[error("failed to save dashboard: {0:#}")]
    SaveFailure(#[source] anyhow::Error),
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;
