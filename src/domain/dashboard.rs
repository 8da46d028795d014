// Dashboard domain model - per-breakpoint layouts
use super::breakpoint::Breakpoint;
use super::widget::{WidgetConfig, WidgetId, WidgetMetadata, WidgetPosition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_ROW_HEIGHT: u32 = 60;
pub const DEFAULT_MARGIN: [u32; 2] = [16, 16];
pub const DEFAULT_CONTAINER_PADDING: [u32; 2] = [16, 16];

fn default_row_height() -> u32 {
    DEFAULT_ROW_HEIGHT
}

fn default_margin() -> [u32; 2] {
    DEFAULT_MARGIN
}

fn default_container_padding() -> [u32; 2] {
    DEFAULT_CONTAINER_PADDING
}

/// Widget arrangement for a single breakpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakpointLayout {
    #[serde(default)]
    pub breakpoint: Breakpoint,
    #[serde(default)]
    pub cols: u32,
    #[serde(default = "default_row_height")]
    pub row_height: u32,
    #[serde(default = "default_margin")]
    pub margin: [u32; 2],
    #[serde(default = "default_container_padding")]
    pub container_padding: [u32; 2],
    #[serde(default)]
    pub widgets: Vec<WidgetConfig>,
}

impl BreakpointLayout {
    /// Empty layout carrying the tier's grid metrics.
    pub fn template(breakpoint: Breakpoint) -> Self {
        Self {
            breakpoint,
            cols: breakpoint.cols(),
            row_height: DEFAULT_ROW_HEIGHT,
            margin: DEFAULT_MARGIN,
            container_padding: DEFAULT_CONTAINER_PADDING,
            widgets: Vec::new(),
        }
    }

    pub fn widget(&self, id: &WidgetId) -> Option<&WidgetConfig> {
        self.widgets.iter().find(|w| &w.id == id)
    }

    /// Rectangles in widget order, as handed to the rendering surface.
    pub fn rects(&self) -> Vec<LayoutRect> {
        self.widgets.iter().map(LayoutRect::from_widget).collect()
    }

    fn normalized(mut self, breakpoint: Breakpoint) -> Self {
        self.breakpoint = breakpoint;
        if self.cols == 0 {
            self.cols = breakpoint.cols();
        }
        let cols = self.cols;
        for widget in &mut self.widgets {
            widget.position = widget.position.clamp_to(cols);
        }
        self
    }
}

/// Rectangle exchanged with the grid-rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRect {
    pub id: WidgetId,
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl LayoutRect {
    pub fn new(id: impl Into<WidgetId>, x: i64, y: i64, w: i64, h: i64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            w,
            h,
        }
    }

    pub fn from_widget(widget: &WidgetConfig) -> Self {
        let p = widget.position;
        Self::new(
            widget.id.clone(),
            i64::from(p.x),
            i64::from(p.y),
            i64::from(p.w),
            i64::from(p.h),
        )
    }
}

/// The complete multi-breakpoint layout set for one user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub layouts: BTreeMap<Breakpoint, BreakpointLayout>,
}

impl DashboardConfig {
    /// Every breakpoint present with an empty template layout.
    pub fn empty() -> Self {
        Self::default().normalize()
    }

    /// Starter dashboard: the given widget types placed on every tier,
    /// packed left to right in row order. Ids are `default-<type>` so the
    /// same widget is recognisable across tiers.
    pub fn starter(widgets: &[WidgetMetadata]) -> Self {
        let layouts = Breakpoint::ALL
            .iter()
            .map(|&bp| {
                let mut layout = BreakpointLayout::template(bp);
                let cols = layout.cols;
                let (mut x, mut y, mut row_height) = (0u32, 0u32, 0u32);
                for meta in widgets {
                    let w = meta.default_size.w.clamp(1, cols);
                    let h = meta.default_size.h.max(1);
                    if x + w > cols {
                        x = 0;
                        y += row_height;
                        row_height = 0;
                    }
                    let id = WidgetId::from(format!("default-{}", meta.widget_type));
                    layout.widgets.push(WidgetConfig::new(
                        id,
                        &meta.widget_type,
                        &meta.name,
                        WidgetPosition::new(x, y, w, h),
                    ));
                    x += w;
                    row_height = row_height.max(h);
                }
                (bp, layout)
            })
            .collect();
        Self { layouts }
    }

    /// Guarantee every known breakpoint has a layout, keyed consistently,
    /// with a usable column count and every widget inside the grid.
    pub fn normalize(self) -> Self {
        let mut layouts = self.layouts;
        for bp in Breakpoint::ALL {
            let layout = layouts
                .remove(&bp)
                .unwrap_or_else(|| BreakpointLayout::template(bp));
            layouts.insert(bp, layout.normalized(bp));
        }
        Self { layouts }
    }

    pub fn layout(&self, breakpoint: Breakpoint) -> Option<&BreakpointLayout> {
        self.layouts.get(&breakpoint)
    }

    /// Layout for `breakpoint`, or the tier's template if it is missing.
    pub fn layout_or_template(&self, breakpoint: Breakpoint) -> BreakpointLayout {
        self.layouts
            .get(&breakpoint)
            .cloned()
            .unwrap_or_else(|| BreakpointLayout::template(breakpoint))
    }

    /// First widget with this id on any tier.
    pub fn find_widget(&self, id: &WidgetId) -> Option<(Breakpoint, &WidgetConfig)> {
        self.layouts
            .iter()
            .find_map(|(bp, layout)| layout.widget(id).map(|w| (*bp, w)))
    }

    pub fn contains_widget(&self, id: &WidgetId) -> bool {
        self.find_widget(id).is_some()
    }

    /// True when every widget on every tier lies inside its layout's grid.
    pub fn positions_valid(&self) -> bool {
        self.layouts
            .values()
            .all(|layout| layout.widgets.iter().all(|w| w.position.fits(layout.cols)))
    }
}
