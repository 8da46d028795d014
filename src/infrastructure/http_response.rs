// HTTP response utilities for engine errors
use crate::application::error::DashboardError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

impl DashboardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::UnknownWidgetType(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DashboardError::WidgetNotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::InvalidState { .. } | DashboardError::SaveInProgress => StatusCode::CONFLICT,
            DashboardError::SaveFailure(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// JSON error body `{ "error": message }` with the given status.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        error_response(status, self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::edit_session::SessionState;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            DashboardError::UnknownWidgetType("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            DashboardError::WidgetNotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DashboardError::InvalidState {
                action: "add a widget",
                state: SessionState::Viewing
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(DashboardError::SaveInProgress.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            DashboardError::SaveFailure(anyhow::anyhow!("boom")).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_invalid_state_message() {
        let err = DashboardError::InvalidState {
            action: "add a widget",
            state: SessionState::Viewing,
        };
        assert_eq!(err.to_string(), "cannot add a widget while the session is viewing");
    }

    #[test]
    fn test_error_response_status() {
        let response = DashboardError::SaveInProgress.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
