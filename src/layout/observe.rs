//! Intrinsic content-size feedback.
//!
//! Watches the natural height of rendered text/list/table content and
//! feeds it back to the document model as an enforced minimum, so content
//! never overflows its widget box. The feedback is suspended while the
//! widget is being dragged or resized — otherwise the observer and the
//! user's pointer would fight over the height.

use std::collections::HashMap;

use crate::model::Widget;

/// A height change the document model should absorb: the widget's rendered
/// height becomes `max(stored_height, min_height)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeUpdate {
    pub widget_id: String,
    pub min_height: f64,
}

/// Tracks the last observed natural height per widget and reports changes.
#[derive(Debug, Default)]
pub struct IntrinsicSizeObserver {
    natural: HashMap<String, f64>,
}

impl IntrinsicSizeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a measured natural content height for `widget`.
    ///
    /// Returns an update when the height changed and no gesture is active
    /// on the widget. Only types whose height follows their content are
    /// observed; everything else is ignored.
    pub fn observe(
        &mut self,
        widget: &Widget,
        natural_height: f64,
        gesture_active: bool,
    ) -> Option<SizeUpdate> {
        if !widget.kind.has_intrinsic_height() {
            return None;
        }
        let natural_height = natural_height.ceil();
        if gesture_active {
            return None;
        }
        match self.natural.insert(widget.id.clone(), natural_height) {
            Some(previous) if previous == natural_height => None,
            _ => Some(SizeUpdate {
                widget_id: widget.id.clone(),
                min_height: natural_height,
            }),
        }
    }

    /// Drop the record for a removed widget.
    pub fn forget(&mut self, widget_id: &str) {
        self.natural.remove(widget_id);
    }

    /// The height a widget actually renders at.
    pub fn effective_height(stored: f64, natural: f64) -> f64 {
        stored.max(natural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WidgetType;
    use pretty_assertions::assert_eq;

    fn text_widget(id: &str) -> Widget {
        let mut w = Widget::with_defaults(WidgetType::Text);
        w.id = id.to_string();
        w
    }

    #[test]
    fn reports_only_changes() {
        let w = text_widget("w");
        let mut obs = IntrinsicSizeObserver::new();
        assert_eq!(
            obs.observe(&w, 120.0, false),
            Some(SizeUpdate {
                widget_id: "w".into(),
                min_height: 120.0,
            })
        );
        assert_eq!(obs.observe(&w, 120.0, false), None);
        assert_eq!(
            obs.observe(&w, 96.2, false).map(|u| u.min_height),
            Some(97.0)
        );
    }

    #[test]
    fn suspended_during_gestures() {
        let w = text_widget("w");
        let mut obs = IntrinsicSizeObserver::new();
        assert_eq!(obs.observe(&w, 120.0, true), None);
        // First report after the gesture ends goes through.
        assert!(obs.observe(&w, 120.0, false).is_some());
    }

    #[test]
    fn shapes_are_not_observed() {
        let mut shape = Widget::with_defaults(WidgetType::Rectangle);
        shape.id = "r".into();
        let mut obs = IntrinsicSizeObserver::new();
        assert_eq!(obs.observe(&shape, 300.0, false), None);
    }

    #[test]
    fn effective_height_never_shrinks_below_content() {
        assert_eq!(IntrinsicSizeObserver::effective_height(100.0, 140.0), 140.0);
        assert_eq!(IntrinsicSizeObserver::effective_height(100.0, 60.0), 100.0);
    }
}
