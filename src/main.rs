// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::breakpoint_watcher::BreakpointWatcher;
use crate::application::edit_session::EditSession;
use crate::application::persistence_gateway::PersistenceGateway;
use crate::application::widget_registry::WidgetRegistry;
use crate::domain::breakpoint::Breakpoint;
use crate::infrastructure::config::{load_app_config, load_widget_catalog};
use crate::infrastructure::file_cache::FileDashboardCache;
use crate::infrastructure::http_repository::HttpDashboardRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    add_widget, cancel, current_breakpoint, dashboard_events, duplicate_widget, enter_edit,
    get_dashboard, get_layout, health_check, layout_changed, remove_widget, save, session_status,
    viewport_resized, widget_catalog, widget_settings,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let app_config = load_app_config()?;
    let catalog = load_widget_catalog()?;

    let registry = if catalog.widgets.is_empty() {
        WidgetRegistry::with_defaults()
    } else {
        tracing::info!("Loaded {} widget types from config", catalog.widgets.len());
        WidgetRegistry::from_entries(catalog.widgets)
    };
    let registry = Arc::new(registry);

    // Create adapters (infrastructure layer)
    let remote = Arc::new(HttpDashboardRepository::new(
        app_config.remote.base_url.clone(),
        app_config.remote.token.clone(),
        app_config.remote.timeout(),
    )?);
    let cache = Arc::new(FileDashboardCache::new(&app_config.cache.dir));

    // Create services (application layer)
    let gateway = Arc::new(PersistenceGateway::new(remote, cache, registry.default_dashboard()));
    let (session, outcome) = EditSession::open(gateway, registry).await;
    tracing::info!("Dashboard loaded from {:?}", outcome.source);

    let breakpoints = BreakpointWatcher::new(Breakpoint::Lg, app_config.breakpoints.debounce());
    let state = AppState::new(session, breakpoints);

    // Start server
    let addr: SocketAddr = app_config.server.addr.parse()?;
    tracing::info!("Starting dashboard layout service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state)).await?;

    Ok(())
}

/// Routes for the rendering client (presentation layer)
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/events", get(dashboard_events))
        .route("/layouts", post(layout_changed))
        .route("/layouts/:breakpoint", get(get_layout))
        .route("/viewport", post(viewport_resized))
        .route("/breakpoint", get(current_breakpoint))
        .route("/catalog", get(widget_catalog))
        .route("/widgets", post(add_widget))
        .route("/widgets/:id", delete(remove_widget))
        .route("/widgets/:id/settings", get(widget_settings))
        .route("/widgets/:id/duplicate", post(duplicate_widget))
        .route("/session", get(session_status))
        .route("/session/edit", post(enter_edit))
        .route("/session/save", post(save))
        .route("/session/cancel", post(cancel))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(Arc::new(state))
}
