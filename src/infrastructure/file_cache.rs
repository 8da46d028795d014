// Local file cache for the last saved dashboard
use crate::application::dashboard_repository::DashboardCache;
use crate::domain::dashboard::DashboardConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fixed key the cached configuration is stored under.
pub const CACHE_KEY: &str = "dashboard-config";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedDashboard {
    saved_at: DateTime<Utc>,
    config: DashboardConfig,
}

#[derive(Debug, Clone)]
pub struct FileDashboardCache {
    path: PathBuf,
}

impl FileDashboardCache {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", CACHE_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DashboardCache for FileDashboardCache {
    async fn read(&self) -> Result<Option<DashboardConfig>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };

        let cached: CachedDashboard = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        tracing::debug!("Read cached dashboard saved at {}", cached.saved_at);
        Ok(Some(cached.config))
    }

    async fn write(&self, config: &DashboardConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let cached = CachedDashboard {
            saved_at: Utc::now(),
            config: config.clone(),
        };
        let content = serde_json::to_string_pretty(&cached)?;

        // Replace atomically through a sibling temp file.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::widget_registry::WidgetRegistry;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_missing_cache() {
        let dir = TempDir::new().unwrap();
        let cache = FileDashboardCache::new(dir.path());

        assert!(cache.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let dir = TempDir::new().unwrap();
        let cache = FileDashboardCache::new(dir.path().join("nested"));
        let config = WidgetRegistry::with_defaults().default_dashboard();

        cache.write(&config).await.unwrap();
        cache.write(&config).await.unwrap();

        assert_eq!(cache.read().await.unwrap(), Some(config));
        assert!(cache.path().ends_with("dashboard-config.json"));
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_error() {
        let dir = TempDir::new().unwrap();
        let cache = FileDashboardCache::new(dir.path());
        std::fs::write(cache.path(), "not json").unwrap();

        assert!(cache.read().await.is_err());
    }

    #[tokio::test]
    async fn test_cache_file_layout() {
        let dir = TempDir::new().unwrap();
        let cache = FileDashboardCache::new(dir.path());
        cache.write(&DashboardConfig::empty()).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(cache.path()).unwrap()).unwrap();
        assert!(raw["savedAt"].is_string());
        assert_eq!(raw["config"]["layouts"]["md"]["cols"], 10);
    }
}
