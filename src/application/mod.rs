// Application layer - Layout engine services
pub mod breakpoint_watcher;
pub mod config_store;
pub mod dashboard_repository;
pub mod edit_session;
pub mod error;
pub mod layout_sync;
pub mod persistence_gateway;
pub mod widget_lifecycle;
pub mod widget_registry;
