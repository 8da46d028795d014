// Persistence gateway - Remote load/save with a local cache fallback
use crate::application::dashboard_repository::{DashboardCache, DashboardRepository};
use crate::domain::dashboard::DashboardConfig;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Where a loaded configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadSource {
    Remote,
    Cache,
    Default,
}

/// Non-fatal problem encountered while loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "camelCase")]
pub enum LoadWarning {
    Remote(String),
    Cache(String),
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::Remote(msg) => write!(f, "remote load failed: {}", msg),
            LoadWarning::Cache(msg) => write!(f, "local cache unavailable: {}", msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub config: DashboardConfig,
    pub source: LoadSource,
    pub warnings: Vec<LoadWarning>,
}

pub struct PersistenceGateway {
    remote: Arc<dyn DashboardRepository>,
    cache: Arc<dyn DashboardCache>,
    fallback: DashboardConfig,
    save_lock: Mutex<()>,
}

impl PersistenceGateway {
    pub fn new(
        remote: Arc<dyn DashboardRepository>,
        cache: Arc<dyn DashboardCache>,
        fallback: DashboardConfig,
    ) -> Self {
        Self {
            remote,
            cache,
            fallback,
            save_lock: Mutex::new(()),
        }
    }

    /// Load the user's configuration. Tries the remote service, then the
    /// local cache, then the built-in default; never fails. The result is
    /// normalized on every path.
    pub async fn load(&self) -> LoadOutcome {
        let mut warnings = Vec::new();

        match self.remote.fetch().await {
            Ok(config) => {
                tracing::info!("Loaded dashboard from remote service");
                return LoadOutcome {
                    config: config.normalize(),
                    source: LoadSource::Remote,
                    warnings,
                };
            }
            Err(e) => {
                tracing::warn!("Remote dashboard load failed, falling back: {:#}", e);
                warnings.push(LoadWarning::Remote(format!("{:#}", e)));
            }
        }

        match self.cache.read().await {
            Ok(Some(config)) => {
                tracing::warn!("Using locally cached dashboard");
                return LoadOutcome {
                    config: config.normalize(),
                    source: LoadSource::Cache,
                    warnings,
                };
            }
            Ok(None) => {
                tracing::debug!("No cached dashboard available");
            }
            Err(e) => {
                tracing::warn!("Local dashboard cache unreadable: {:#}", e);
                warnings.push(LoadWarning::Cache(format!("{:#}", e)));
            }
        }

        tracing::warn!("Using built-in default dashboard");
        LoadOutcome {
            config: self.fallback.clone().normalize(),
            source: LoadSource::Default,
            warnings,
        }
    }

    /// Persist `config`. The local cache copy is written first and its
    /// failure is only logged; the remote write decides the result. Saves
    /// are serialized so overlapping calls land in order.
    pub async fn save(&self, config: &DashboardConfig) -> anyhow::Result<()> {
        let _guard = self.save_lock.lock().await;

        if let Err(e) = self.cache.write(config).await {
            tracing::warn!("Failed to write local dashboard cache: {:#}", e);
        }

        self.remote.store(config).await
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FakeRemote, MemoryCache};
    use super::*;
    use crate::application::widget_registry::WidgetRegistry;
    use crate::domain::breakpoint::Breakpoint;
    use crate::domain::dashboard::BreakpointLayout;
    use std::collections::BTreeMap;

    fn gateway(remote: Arc<FakeRemote>, cache: Arc<MemoryCache>) -> PersistenceGateway {
        PersistenceGateway::new(remote, cache, WidgetRegistry::with_defaults().default_dashboard())
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let remote = Arc::new(FakeRemote::default());
        let cache = Arc::new(MemoryCache::default());
        let gateway = gateway(remote, cache);
        let config = WidgetRegistry::with_defaults().default_dashboard();

        gateway.save(&config).await.unwrap();
        let outcome = gateway.load().await;

        assert_eq!(outcome.source, LoadSource::Remote);
        assert_eq!(outcome.config, config);
        assert!(outcome.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_save_is_idempotent() {
        let remote = Arc::new(FakeRemote::default());
        let cache = Arc::new(MemoryCache::default());
        let gateway = gateway(remote.clone(), cache.clone());
        let config = DashboardConfig::empty();

        gateway.save(&config).await.unwrap();
        let first = remote.stored.lock().unwrap().clone();
        gateway.save(&config).await.unwrap();

        assert_eq!(*remote.stored.lock().unwrap(), first);
        assert_eq!(*cache.stored.lock().unwrap(), Some(config));
    }

    #[tokio::test]
    async fn test_load_normalizes_missing_breakpoints() {
        let mut layouts = BTreeMap::new();
        layouts.insert(Breakpoint::Lg, BreakpointLayout::template(Breakpoint::Lg));
        let remote = Arc::new(FakeRemote::with(DashboardConfig { layouts }));
        let gateway = gateway(remote, Arc::new(MemoryCache::default()));

        let outcome = gateway.load().await;

        assert_eq!(outcome.config.layouts.len(), Breakpoint::ALL.len());
    }

    #[tokio::test]
    async fn test_load_falls_back_to_cache() {
        let remote = Arc::new(FakeRemote::default());
        let cache = Arc::new(MemoryCache::default());
        let gateway = gateway(remote.clone(), cache);
        gateway.save(&DashboardConfig::empty()).await.unwrap();

        remote.set_failing(true);
        let outcome = gateway.load().await;

        assert_eq!(outcome.source, LoadSource::Cache);
        assert_eq!(outcome.config, DashboardConfig::empty());
        assert!(matches!(outcome.warnings.as_slice(), [LoadWarning::Remote(_)]));
    }

    #[tokio::test]
    async fn test_load_falls_back_to_default() {
        let remote = Arc::new(FakeRemote::default());
        let gateway = gateway(remote, Arc::new(MemoryCache::default()));

        let outcome = gateway.load().await;

        assert_eq!(outcome.source, LoadSource::Default);
        assert_eq!(outcome.config, WidgetRegistry::with_defaults().default_dashboard());
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_save_still_writes_cache() {
        let remote = Arc::new(FakeRemote::default());
        remote.set_failing(true);
        let cache = Arc::new(MemoryCache::default());
        let gateway = gateway(remote, cache.clone());

        let result = gateway.save(&DashboardConfig::empty()).await;

        assert!(result.is_err());
        assert_eq!(*cache.stored.lock().unwrap(), Some(DashboardConfig::empty()));
    }
}
