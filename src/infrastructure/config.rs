use crate::domain::widget::WidgetMetadata;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub remote: RemoteSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub breakpoints: BreakpointSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_addr")]
    pub addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { addr: default_addr() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemoteSettings {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RemoteSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { dir: default_cache_dir() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BreakpointSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl BreakpointSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for BreakpointSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct WidgetCatalogConfig {
    #[serde(default)]
    pub widgets: Vec<WidgetMetadata>,
}

fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}

fn default_debounce_ms() -> u64 {
    150
}

/// Settings from `config/dashboard` overlaid with `DASHBOARD__*` env vars.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Widget catalog from `config/widgets`; empty when the file is absent.
pub fn load_widget_catalog() -> anyhow::Result<WidgetCatalogConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/widgets").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}
