// Repository traits for dashboard persistence
use crate::domain::dashboard::DashboardConfig;
use async_trait::async_trait;

/// Remote store holding the user's dashboard configuration.
#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Fetch the persisted configuration. Network failures, a missing
    /// dashboard and malformed payloads are all errors.
    async fn fetch(&self) -> anyhow::Result<DashboardConfig>;

    /// Replace the persisted configuration.
    async fn store(&self, config: &DashboardConfig) -> anyhow::Result<()>;
}

/// Durable local copy of the last saved configuration.
#[async_trait]
pub trait DashboardCache: Send + Sync {
    /// `Ok(None)` when nothing has been cached yet.
    async fn read(&self) -> anyhow::Result<Option<DashboardConfig>>;

    async fn write(&self, config: &DashboardConfig) -> anyhow::Result<()>;
}
