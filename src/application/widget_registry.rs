// Widget metadata registry - Static catalog of widget types
use crate::domain::dashboard::DashboardConfig;
use crate::domain::widget::WidgetMetadata;
use std::collections::HashMap;

/// Widget types placed on the built-in starter dashboard.
const STARTER_WIDGETS: &[&str] = &[
    "portfolio-summary",
    "performance-chart",
    "market-overview",
    "news-feed",
];

#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry {
    entries: HashMap<String, WidgetMetadata>,
    order: Vec<String>,
}

impl WidgetRegistry {
    pub fn with_defaults() -> Self {
        Self::from_entries(vec![
            WidgetMetadata::new("portfolio-summary", "Portfolio Summary", 4, 2, "wallet", "Portfolio"),
            WidgetMetadata::new("performance-chart", "Performance Chart", 6, 4, "trending-up", "Charts"),
            WidgetMetadata::new("market-overview", "Market Overview", 4, 3, "globe", "Markets"),
            WidgetMetadata::new("watchlist", "Watchlist", 3, 4, "eye", "Markets"),
            WidgetMetadata::new("news-feed", "News Feed", 4, 4, "newspaper", "News"),
            WidgetMetadata::new("ai-insights", "AI Insights", 4, 3, "sparkles", "Insights"),
            WidgetMetadata::new("recent-transactions", "Recent Transactions", 6, 3, "list", "Portfolio"),
            WidgetMetadata::new("asset-allocation", "Asset Allocation", 4, 3, "pie-chart", "Charts"),
        ])
    }

    /// Build from a catalog; later entries replace earlier ones of the same type.
    pub fn from_entries(entries: Vec<WidgetMetadata>) -> Self {
        let mut registry = Self::default();
        for meta in entries {
            registry.register(meta);
        }
        registry
    }

    pub fn register(&mut self, meta: WidgetMetadata) {
        if !self.entries.contains_key(&meta.widget_type) {
            self.order.push(meta.widget_type.clone());
        }
        self.entries.insert(meta.widget_type.clone(), meta);
    }

    pub fn get(&self, widget_type: &str) -> Option<&WidgetMetadata> {
        self.entries.get(widget_type)
    }

    /// Catalog in registration order.
    pub fn list(&self) -> Vec<&WidgetMetadata> {
        self.order.iter().filter_map(|t| self.entries.get(t)).collect()
    }

    /// Built-in fallback dashboard, made of whichever starter types this
    /// catalog knows about.
    pub fn default_dashboard(&self) -> DashboardConfig {
        let starter: Vec<WidgetMetadata> = STARTER_WIDGETS
            .iter()
            .filter_map(|t| self.get(t).cloned())
            .collect();
        DashboardConfig::starter(&starter).normalize()
    }
}
