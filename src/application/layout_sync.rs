// Layout synchronizer - Reconciles rendering-surface rectangles with the config
use crate::domain::breakpoint::Breakpoint;
use crate::domain::dashboard::{DashboardConfig, LayoutRect};
use crate::domain::widget::{WidgetId, WidgetPosition};
use serde::Serialize;
use std::collections::BTreeMap;

/// One layout-change event: the surface may report several breakpoints at once.
pub type LayoutChange = BTreeMap<Breakpoint, Vec<LayoutRect>>;

/// Rectangle that named no widget on its breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IgnoredRect {
    pub breakpoint: Breakpoint,
    pub id: WidgetId,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Widgets whose stored position actually moved.
    pub updated: usize,
    /// Rectangles whose proposed geometry had to be clamped.
    pub clamped: usize,
    pub ignored: Vec<IgnoredRect>,
}

impl SyncReport {
    pub fn changed(&self) -> bool {
        self.updated > 0
    }
}

/// Apply a layout-change event to `current`, producing the next config.
///
/// Only `position` of matched widgets is replaced. Rectangles without a
/// backing widget are reported and logged, never turned into widgets.
pub fn apply_layout_change(current: &DashboardConfig, change: &LayoutChange) -> (DashboardConfig, SyncReport) {
    let mut next = current.clone();
    let mut report = SyncReport::default();

    for (&breakpoint, rects) in change {
        let mut layout = next.layout_or_template(breakpoint);
        let cols = layout.cols;

        for rect in rects {
            let Some(widget) = layout.widgets.iter_mut().find(|w| w.id == rect.id) else {
                tracing::warn!(
                    "Ignoring rectangle for unknown widget {} on breakpoint {}",
                    rect.id,
                    breakpoint
                );
                report.ignored.push(IgnoredRect {
                    breakpoint,
                    id: rect.id.clone(),
                });
                continue;
            };

            let position = WidgetPosition::clamped(rect.x, rect.y, rect.w, rect.h, cols);
            if !proposed_matches(rect, &position) {
                tracing::debug!(
                    "Clamped widget {} on {}: ({}, {}, {}, {}) -> ({}, {}, {}, {})",
                    rect.id, breakpoint, rect.x, rect.y, rect.w, rect.h,
                    position.x, position.y, position.w, position.h
                );
                report.clamped += 1;
            }
            if widget.position != position {
                widget.position = position;
                report.updated += 1;
            }
        }

        next.layouts.insert(breakpoint, layout);
    }

    (next, report)
}

/// Rectangles for one breakpoint, as emitted to the rendering surface.
pub fn rects_for(config: &DashboardConfig, breakpoint: Breakpoint) -> Vec<LayoutRect> {
    config.layout_or_template(breakpoint).rects()
}

fn proposed_matches(rect: &LayoutRect, position: &WidgetPosition) -> bool {
    rect.x == i64::from(position.x)
        && rect.y == i64::from(position.y)
        && rect.w == i64::from(position.w)
        && rect.h == i64::from(position.h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::widget::{WidgetConfig, WidgetMetadata};

    fn config() -> DashboardConfig {
        DashboardConfig::starter(&[
            WidgetMetadata::new("a", "A", 4, 2, "", ""),
            WidgetMetadata::new("b", "B", 4, 2, "", ""),
        ])
        .normalize()
    }

    fn change(breakpoint: Breakpoint, rects: Vec<LayoutRect>) -> LayoutChange {
        let mut change = LayoutChange::new();
        change.insert(breakpoint, rects);
        change
    }

    #[test]
    fn test_clamps_x_to_cols_minus_width() {
        let current = config();
        let event = change(Breakpoint::Lg, vec![LayoutRect::new("default-a", 15, 0, 4, 2)]);

        let (next, report) = apply_layout_change(&current, &event);

        let widget = next.layout(Breakpoint::Lg).unwrap().widget(&"default-a".into()).unwrap();
        assert_eq!(widget.position, WidgetPosition::new(8, 0, 4, 2));
        assert_eq!(report.clamped, 1);
        assert_eq!(report.updated, 1);
    }

    #[test]
    fn test_only_position_changes() {
        let mut current = config();
        if let Some(layout) = current.layouts.get_mut(&Breakpoint::Lg) {
            layout.widgets[0].config = serde_json::json!({ "currency": "EUR" });
            layout.widgets[0].is_visible = false;
        }
        let event = change(Breakpoint::Lg, vec![LayoutRect::new("default-a", 2, 3, 5, 6)]);

        let (next, _) = apply_layout_change(&current, &event);

        let before: &WidgetConfig = &current.layout(Breakpoint::Lg).unwrap().widgets[0];
        let after: &WidgetConfig = &next.layout(Breakpoint::Lg).unwrap().widgets[0];
        assert_eq!(after.position, WidgetPosition::new(2, 3, 5, 6));
        assert_eq!(after.config, before.config);
        assert_eq!(after.is_visible, before.is_visible);
        assert_eq!(after.title, before.title);
        assert_eq!(after.permissions, before.permissions);
    }

    #[test]
    fn test_unknown_rect_is_ignored() {
        let current = config();
        let event = change(
            Breakpoint::Md,
            vec![
                LayoutRect::new("ghost", 0, 0, 2, 2),
                LayoutRect::new("default-b", 0, 5, 4, 2),
            ],
        );

        let (next, report) = apply_layout_change(&current, &event);

        let md = next.layout(Breakpoint::Md).unwrap();
        assert_eq!(md.widgets.len(), 2);
        assert!(md.widget(&"ghost".into()).is_none());
        assert_eq!(
            report.ignored,
            vec![IgnoredRect {
                breakpoint: Breakpoint::Md,
                id: "ghost".into()
            }]
        );
        assert_eq!(md.widget(&"default-b".into()).unwrap().position.y, 5);
    }

    #[test]
    fn test_multiple_breakpoints_in_one_event() {
        let current = config();
        let mut event = change(Breakpoint::Lg, vec![LayoutRect::new("default-a", 0, 4, 4, 2)]);
        event.insert(Breakpoint::Sm, vec![LayoutRect::new("default-a", 0, 9, 9, 2)]);

        let (next, report) = apply_layout_change(&current, &event);

        assert_eq!(report.updated, 2);
        let lg = next.layout(Breakpoint::Lg).unwrap().widget(&"default-a".into()).unwrap();
        let sm = next.layout(Breakpoint::Sm).unwrap().widget(&"default-a".into()).unwrap();
        assert_eq!(lg.position, WidgetPosition::new(0, 4, 4, 2));
        assert_eq!(sm.position, WidgetPosition::new(0, 9, 6, 2));
        // Untouched tiers stay identical.
        assert_eq!(next.layout(Breakpoint::Xl), current.layout(Breakpoint::Xl));
    }

    #[test]
    fn test_missing_breakpoint_is_synthesized() {
        let mut current = config();
        current.layouts.remove(&Breakpoint::Xs);
        let event = change(Breakpoint::Xs, vec![LayoutRect::new("default-a", 0, 0, 1, 1)]);

        let (next, report) = apply_layout_change(&current, &event);

        let xs = next.layout(Breakpoint::Xs).unwrap();
        assert_eq!(xs.cols, 4);
        assert!(xs.widgets.is_empty());
        assert_eq!(report.ignored.len(), 1);
    }

    #[test]
    fn test_echoed_layout_is_a_no_op() {
        let current = config();
        let event = change(Breakpoint::Lg, rects_for(&current, Breakpoint::Lg));

        let (next, report) = apply_layout_change(&current, &event);

        assert_eq!(next, current);
        assert!(!report.changed());
    }

    #[test]
    fn test_positions_stay_valid() {
        let current = config();
        let event = change(
            Breakpoint::Xxs,
            vec![
                LayoutRect::new("default-a", -3, -3, 7, 0),
                LayoutRect::new("default-b", 1, 2, 2, 1),
            ],
        );

        let (next, _) = apply_layout_change(&current, &event);

        assert!(next.positions_valid());
        let xxs = next.layout(Breakpoint::Xxs).unwrap();
        assert_eq!(xxs.widgets[0].position, WidgetPosition::new(0, 0, 2, 1));
        assert_eq!(xxs.widgets[1].position, WidgetPosition::new(0, 2, 2, 1));
    }
}
