// Widget lifecycle - Add, remove and delegate operations on widgets
use crate::application::error::{DashboardError, Result};
use crate::application::widget_registry::WidgetRegistry;
use crate::domain::breakpoint::Breakpoint;
use crate::domain::dashboard::DashboardConfig;
use crate::domain::widget::{WidgetConfig, WidgetId, WidgetPosition};

/// Caller-supplied behavior for widget actions the engine only routes.
pub trait WidgetActionHandler {
    type Output;

    fn duplicate(&self, widget: &WidgetConfig) -> Self::Output;

    fn settings(&self, widget: &WidgetConfig) -> Self::Output;
}

/// Create a widget of `widget_type` at the origin of the active breakpoint.
///
/// The widget is inserted into `breakpoint`'s layout only; other tiers are
/// left as they are.
pub fn add_widget(
    current: &DashboardConfig,
    registry: &WidgetRegistry,
    widget_type: &str,
    breakpoint: Breakpoint,
) -> Result<(DashboardConfig, WidgetConfig)> {
    let meta = registry
        .get(widget_type)
        .ok_or_else(|| DashboardError::UnknownWidgetType(widget_type.to_string()))?;

    let mut next = current.clone();
    let mut layout = next.layout_or_template(breakpoint);
    let position = WidgetPosition::new(0, 0, meta.default_size.w, meta.default_size.h).clamp_to(layout.cols);
    let widget = WidgetConfig::new(WidgetId::generate(), &meta.widget_type, &meta.name, position);

    layout.widgets.push(widget.clone());
    next.layouts.insert(breakpoint, layout);
    Ok((next, widget))
}

/// Delete the widget from every breakpoint's layout.
pub fn remove_widget(current: &DashboardConfig, id: &WidgetId) -> Result<DashboardConfig> {
    if !current.contains_widget(id) {
        return Err(DashboardError::WidgetNotFound(id.clone()));
    }

    let mut next = current.clone();
    for layout in next.layouts.values_mut() {
        layout.widgets.retain(|w| &w.id != id);
    }
    Ok(next)
}

/// Resolve `id` and hand the widget to the caller's duplicate behavior.
pub fn duplicate_widget<H: WidgetActionHandler>(
    current: &DashboardConfig,
    id: &WidgetId,
    handler: &H,
) -> Result<H::Output> {
    let widget = resolve(current, id)?;
    Ok(handler.duplicate(widget))
}

/// Resolve `id` and hand the widget to the caller's settings behavior.
pub fn widget_settings<H: WidgetActionHandler>(
    current: &DashboardConfig,
    id: &WidgetId,
    handler: &H,
) -> Result<H::Output> {
    let widget = resolve(current, id)?;
    Ok(handler.settings(widget))
}

fn resolve<'a>(current: &'a DashboardConfig, id: &WidgetId) -> Result<&'a WidgetConfig> {
    current
        .find_widget(id)
        .map(|(_, widget)| widget)
        .ok_or_else(|| DashboardError::WidgetNotFound(id.clone()))
}
