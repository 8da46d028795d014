// Widget domain models
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, globally unique widget identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    /// Fresh id for a newly created widget. Ids are never reused.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for WidgetId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for WidgetId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetPosition {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl WidgetPosition {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Clamp a proposed rectangle onto a grid of `cols` columns:
    /// `w` into `[1, cols]`, `x` into `[0, cols - w]`, `y` and `h` into
    /// `[0, ∞)` and `[1, ∞)` respectively.
    pub fn clamped(x: i64, y: i64, w: i64, h: i64, cols: u32) -> Self {
        let cols = i64::from(cols.max(1));
        let w = w.clamp(1, cols);
        let x = x.clamp(0, cols - w);
        let y = y.max(0);
        let h = h.max(1);
        Self {
            x: saturate(x),
            y: saturate(y),
            w: saturate(w),
            h: saturate(h),
        }
    }

    /// Same position, re-clamped onto a grid of `cols` columns.
    pub fn clamp_to(self, cols: u32) -> Self {
        Self::clamped(
            i64::from(self.x),
            i64::from(self.y),
            i64::from(self.w),
            i64::from(self.h),
            cols,
        )
    }

    pub fn fits(&self, cols: u32) -> bool {
        self.w >= 1 && self.h >= 1 && self.x.saturating_add(self.w) <= cols
    }
}

fn saturate(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetPermissions {
    #[serde(default = "granted")]
    pub can_edit: bool,
    #[serde(default = "granted")]
    pub can_move: bool,
    #[serde(default = "granted")]
    pub can_resize: bool,
    #[serde(default = "granted")]
    pub can_delete: bool,
}

fn granted() -> bool {
    true
}

impl WidgetPermissions {
    pub fn all() -> Self {
        Self {
            can_edit: true,
            can_move: true,
            can_resize: true,
            can_delete: true,
        }
    }
}

impl Default for WidgetPermissions {
    fn default() -> Self {
        Self::all()
    }
}

fn empty_config() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

/// One widget instance placed on a breakpoint layout. `config` is opaque
/// widget-specific settings owned by the widget itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub id: WidgetId,
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(default)]
    pub title: String,
    pub position: WidgetPosition,
    #[serde(default = "empty_config")]
    pub config: serde_json::Value,
    #[serde(default = "granted")]
    pub is_visible: bool,
    #[serde(default)]
    pub permissions: WidgetPermissions,
}

impl WidgetConfig {
    /// New visible widget with every permission granted and empty settings.
    pub fn new(id: WidgetId, widget_type: &str, title: &str, position: WidgetPosition) -> Self {
        Self {
            id,
            widget_type: widget_type.to_string(),
            title: title.to_string(),
            position,
            config: empty_config(),
            is_visible: true,
            permissions: WidgetPermissions::all(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSize {
    pub w: u32,
    pub h: u32,
}

/// Catalog entry describing a widget type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetMetadata {
    #[serde(rename = "type")]
    pub widget_type: String,
    pub name: String,
    #[serde(alias = "default_size")]
    pub default_size: WidgetSize,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub category: String,
}

impl WidgetMetadata {
    pub fn new(widget_type: &str, name: &str, w: u32, h: u32, icon: &str, category: &str) -> Self {
        Self {
            widget_type: widget_type.to_string(),
            name: name.to_string(),
            default_size: WidgetSize { w, h },
            icon: icon.to_string(),
            category: category.to_string(),
        }
    }
}
