// HTTP request handlers
use crate::application::edit_session::{CancelOutcome, SessionStatus};
use crate::application::error::DashboardError;
use crate::application::layout_sync::{rects_for, LayoutChange, SyncReport};
use crate::application::widget_lifecycle::WidgetActionHandler;
use crate::domain::breakpoint::{Breakpoint, UnknownBreakpoint};
use crate::domain::dashboard::{DashboardConfig, LayoutRect};
use crate::domain::widget::{WidgetConfig, WidgetId, WidgetMetadata};
use crate::infrastructure::http_response::error_response;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::Response,
    Json,
};
use futures::stream::Stream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_stream::wrappers::WatchStream;

#[derive(Deserialize)]
pub struct ViewportRequest {
    pub width: u32,
}

#[derive(Deserialize)]
pub struct AddWidgetRequest {
    #[serde(rename = "type")]
    pub widget_type: String,
}

#[derive(Deserialize)]
pub struct CancelQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    #[serde(flatten)]
    pub status: SessionStatus,
    pub breakpoint: Breakpoint,
}

#[derive(Serialize)]
pub struct CancelResponse {
    pub outcome: CancelOutcome,
    #[serde(flatten)]
    pub status: SessionStatus,
}

/// Duplicate and settings are client-side features; the server only
/// resolves the widget and hands it back.
struct ReturnWidget;

impl WidgetActionHandler for ReturnWidget {
    type Output = WidgetConfig;

    fn duplicate(&self, widget: &WidgetConfig) -> WidgetConfig {
        widget.clone()
    }

    fn settings(&self, widget: &WidgetConfig) -> WidgetConfig {
        widget.clone()
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current dashboard snapshot
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardConfig> {
    Json((*state.snapshot()).clone())
}

/// Stream every new snapshot as a server-sent event
pub async fn dashboard_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = WatchStream::new(state.snapshots.clone())
        .map(|snapshot| Event::default().event("dashboard").json_data(&*snapshot));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Rectangles for one breakpoint, for the rendering surface
pub async fn get_layout(
    Path(breakpoint): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LayoutRect>>, Response> {
    let breakpoint: Breakpoint = breakpoint
        .parse()
        .map_err(|e: UnknownBreakpoint| error_response(StatusCode::NOT_FOUND, e.to_string()))?;
    Ok(Json(rects_for(&state.snapshot(), breakpoint)))
}

/// Layout-change event from the rendering surface
pub async fn layout_changed(
    State(state): State<Arc<AppState>>,
    Json(change): Json<LayoutChange>,
) -> Result<Json<SyncReport>, DashboardError> {
    let mut session = state.session.lock().await;
    let report = session.apply_layout_change(&change)?;
    Ok(Json(report))
}

/// Viewport resize; the breakpoint is recomputed after the debounce
pub async fn viewport_resized(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ViewportRequest>,
) -> StatusCode {
    state.breakpoints.on_resize(request.width);
    StatusCode::ACCEPTED
}

pub async fn current_breakpoint(State(state): State<Arc<AppState>>) -> Json<Breakpoint> {
    Json(state.breakpoints.current())
}

pub async fn widget_catalog(State(state): State<Arc<AppState>>) -> Json<Vec<WidgetMetadata>> {
    Json(state.registry.list().into_iter().cloned().collect())
}

/// Add a widget to the breakpoint the client is currently on
pub async fn add_widget(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddWidgetRequest>,
) -> Result<(StatusCode, Json<WidgetConfig>), DashboardError> {
    let breakpoint = state.breakpoints.current();
    let mut session = state.session.lock().await;
    let widget = session.add_widget(&request.widget_type, breakpoint)?;
    Ok((StatusCode::CREATED, Json(widget)))
}

pub async fn remove_widget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, DashboardError> {
    let mut session = state.session.lock().await;
    session.remove_widget(&WidgetId::from(id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn widget_settings(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<WidgetConfig>, DashboardError> {
    let session = state.session.lock().await;
    let widget = session.widget_settings(&WidgetId::from(id), &ReturnWidget)?;
    Ok(Json(widget))
}

pub async fn duplicate_widget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<WidgetConfig>, DashboardError> {
    let session = state.session.lock().await;
    let widget = session.duplicate_widget(&WidgetId::from(id), &ReturnWidget)?;
    Ok(Json(widget))
}

pub async fn session_status(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    let session = state.session.lock().await;
    Json(SessionResponse {
        status: session.status(),
        breakpoint: state.breakpoints.current(),
    })
}

pub async fn enter_edit(State(state): State<Arc<AppState>>) -> Result<Json<SessionStatus>, DashboardError> {
    let mut session = state.session.lock().await;
    session.enter_edit()?;
    Ok(Json(session.status()))
}

/// Save the session. The lock is released while the remote call runs so
/// reads keep flowing; the session itself rejects edits until it finishes.
/// The save runs on its own task so it completes even if the request is
/// dropped.
pub async fn save(State(state): State<Arc<AppState>>) -> Result<Json<SessionStatus>, DashboardError> {
    let (snapshot, gateway) = {
        let mut session = state.session.lock().await;
        let snapshot = session.begin_save()?;
        (snapshot, session.gateway().clone())
    };

    let session = state.session.clone();
    let task = tokio::spawn(async move {
        let result = gateway.save(&snapshot).await;
        let mut session = session.lock().await;
        session.finish_save(snapshot, result)?;
        Ok::<_, DashboardError>(session.status())
    });

    let status = task
        .await
        .map_err(|e| DashboardError::SaveFailure(anyhow::Error::new(e).context("save task aborted")))??;
    Ok(Json(status))
}

pub async fn cancel(
    Query(query): Query<CancelQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<CancelResponse>, DashboardError> {
    let mut session = state.session.lock().await;
    let outcome = session.cancel(&move |_: &str| query.confirm)?;
    Ok(Json(CancelResponse {
        outcome,
        status: session.status(),
    }))
}
