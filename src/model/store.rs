//! # Document Actions
//!
//! Every mutation of a template goes through [`apply`]: a pure function
//! from a template and an [`Action`] to a new template. Callers keep the
//! old value for undo; nothing in here mutates in place or touches I/O.
//!
//! Unknown page or widget ids make an action a no-op rather than an error.
//! Concurrent editors and generative producers routinely race against
//! deletions, and a stale id arriving late is normal, not exceptional.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::layout::autosize::estimate_height;
use crate::model::{Page, PageProperties, PropBag, Template, Widget, WidgetType};

/// A single edit to a template.
#[derive(Debug, Clone)]
pub enum Action {
    /// Add a palette widget with its type defaults to the end of a page's
    /// paint order.
    AddWidget { page_id: String, kind: WidgetType },
    /// Merge a partial update into one widget.
    UpdateWidget {
        page_id: String,
        widget_id: String,
        patch: WidgetPatch,
    },
    RemoveWidget { page_id: String, widget_id: String },
    /// Move a widget within a page's paint order.
    ReorderWidgets {
        page_id: String,
        from: usize,
        to: usize,
    },
    AddPage,
    /// Refused when it would remove the last page.
    RemovePage { page_id: String },
    UpdatePageProperties {
        page_id: String,
        properties: PageProperties,
    },
    SetDataSource(String),
    Rename(String),
    /// Insert externally generated widgets, completing whatever fields the
    /// producer left out.
    InsertGenerated {
        page_id: String,
        widgets: Vec<GeneratedWidget>,
    },
}

/// Partial widget update. Geometry fields replace; `props` and `style`
/// merge key-by-key into the existing bags; `bindings`, when present,
/// replaces the whole map (binding edits are made against the full set).
#[derive(Debug, Clone, Default)]
pub struct WidgetPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub props: PropBag,
    pub style: PropBag,
    pub bindings: Option<BTreeMap<String, String>>,
}

/// A widget as emitted by a generative producer: the type is required,
/// everything else is optional and completed from the type's defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedWidget {
    #[serde(rename = "type")]
    pub kind: WidgetType,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    #[serde(default)]
    pub props: PropBag,
    #[serde(default)]
    pub style: PropBag,
    #[serde(default)]
    pub bindings: BTreeMap<String, String>,
}

/// Apply one action to a template, returning the updated template.
pub fn apply(template: &Template, action: Action) -> Template {
    let mut next = template.clone();
    match action {
        Action::AddWidget { page_id, kind } => {
            if let Some(page) = page_mut(&mut next, &page_id) {
                page.widgets.push(sized_default(kind));
            }
        }
        Action::UpdateWidget {
            page_id,
            widget_id,
            patch,
        } => {
            if let Some(widget) = widget_mut(&mut next, &page_id, &widget_id) {
                apply_patch(widget, patch);
            }
        }
        Action::RemoveWidget { page_id, widget_id } => {
            if let Some(page) = page_mut(&mut next, &page_id) {
                page.widgets.retain(|w| w.id != widget_id);
            }
        }
        Action::ReorderWidgets { page_id, from, to } => {
            if let Some(page) = page_mut(&mut next, &page_id) {
                if from < page.widgets.len() {
                    let widget = page.widgets.remove(from);
                    let to = to.min(page.widgets.len());
                    page.widgets.insert(to, widget);
                }
            }
        }
        Action::AddPage => next.pages.push(Page::new()),
        Action::RemovePage { page_id } => {
            if next.pages.len() > 1 {
                next.pages.retain(|p| p.id != page_id);
            } else {
                log::warn!("refusing to remove the last page");
            }
        }
        Action::UpdatePageProperties {
            page_id,
            properties,
        } => {
            if let Some(page) = page_mut(&mut next, &page_id) {
                page.properties = properties;
            }
        }
        Action::SetDataSource(source) => next.data_source = source,
        Action::Rename(name) => next.name = name,
        Action::InsertGenerated { page_id, widgets } => {
            if let Some(page) = page_mut(&mut next, &page_id) {
                page.widgets
                    .extend(widgets.into_iter().map(complete_generated));
            }
        }
    }
    next
}

fn page_mut<'a>(template: &'a mut Template, page_id: &str) -> Option<&'a mut Page> {
    template.pages.iter_mut().find(|p| p.id == page_id)
}

fn widget_mut<'a>(
    template: &'a mut Template,
    page_id: &str,
    widget_id: &str,
) -> Option<&'a mut Widget> {
    page_mut(template, page_id)?
        .widgets
        .iter_mut()
        .find(|w| w.id == widget_id)
}

fn apply_patch(widget: &mut Widget, patch: WidgetPatch) {
    if let Some(x) = patch.x {
        widget.x = x;
    }
    if let Some(y) = patch.y {
        widget.y = y;
    }
    if let Some(width) = patch.width {
        widget.width = width;
    }
    if let Some(height) = patch.height {
        widget.height = height;
    }
    for (key, value) in patch.props {
        widget.props.insert(key, value);
    }
    for (key, value) in patch.style {
        widget.style.insert(key, value);
    }
    if let Some(bindings) = patch.bindings {
        widget.bindings = bindings;
    }
}

/// A palette widget, with its default height widened to fit the default
/// content where the estimate says it will not.
fn sized_default(kind: WidgetType) -> Widget {
    let mut widget = Widget::with_defaults(kind);
    let estimated = estimate_height(
        kind,
        widget.prop("content"),
        widget.width,
        widget.font_size(),
    );
    widget.height = widget.height.max(estimated);
    widget
}

/// Complete a producer's partial widget: type defaults underneath, the
/// producer's fields on top, and an estimated height when it gave none.
fn complete_generated(generated: GeneratedWidget) -> Widget {
    let mut widget = Widget::with_defaults(generated.kind);
    if let Some(x) = generated.x {
        widget.x = x;
    }
    if let Some(y) = generated.y {
        widget.y = y;
    }
    if let Some(width) = generated.width {
        widget.width = width;
    }
    for (key, value) in generated.props {
        widget.props.insert(key, value);
    }
    for (key, value) in generated.style {
        widget.style.insert(key, value);
    }
    widget.bindings.extend(generated.bindings);

    widget.height = match generated.height {
        Some(height) => height,
        None => estimate_height(
            generated.kind,
            widget.prop("content"),
            widget.width,
            widget.font_size(),
        ),
    };
    widget
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn template_with_widget(kind: WidgetType) -> (Template, String, String) {
        let mut t = Template::new("doc");
        let w = Widget::with_defaults(kind);
        let page_id = t.pages[0].id.clone();
        let widget_id = w.id.clone();
        t.pages[0].widgets.push(w);
        (t, page_id, widget_id)
    }

    #[test]
    fn apply_leaves_the_input_untouched() {
        let (t, page_id, widget_id) = template_with_widget(WidgetType::Text);
        let _ = apply(
            &t,
            Action::RemoveWidget {
                page_id,
                widget_id: widget_id.clone(),
            },
        );
        assert_eq!(t.pages[0].widgets[0].id, widget_id);
    }

    #[test]
    fn add_widget_appends_in_paint_order() {
        let t = Template::new("doc");
        let page_id = t.pages[0].id.clone();
        let t = apply(
            &t,
            Action::AddWidget {
                page_id: page_id.clone(),
                kind: WidgetType::Title,
            },
        );
        let t = apply(
            &t,
            Action::AddWidget {
                page_id,
                kind: WidgetType::Table,
            },
        );
        let kinds: Vec<_> = t.pages[0].widgets.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WidgetType::Title, WidgetType::Table]);
    }

    #[test]
    fn update_merges_bags_and_replaces_geometry() {
        let (t, page_id, widget_id) = template_with_widget(WidgetType::Text);
        let mut patch = WidgetPatch {
            x: Some(120.0),
            ..WidgetPatch::default()
        };
        patch.props.insert("content".into(), json!("updated"));
        patch.style.insert("color".into(), json!("#ff0000"));

        let t = apply(
            &t,
            Action::UpdateWidget {
                page_id,
                widget_id,
                patch,
            },
        );
        let w = &t.pages[0].widgets[0];
        assert_eq!(w.x, 120.0);
        assert_eq!(w.prop_str("content"), Some("updated"));
        assert_eq!(w.style_str("color"), Some("#ff0000"));
        // Untouched style keys survive the merge.
        assert_eq!(w.style_f64("fontSize"), Some(16.0));
    }

    #[test]
    fn stale_ids_are_no_ops() {
        let (t, page_id, _) = template_with_widget(WidgetType::Text);
        let same = apply(
            &t,
            Action::UpdateWidget {
                page_id,
                widget_id: "gone".into(),
                patch: WidgetPatch {
                    x: Some(999.0),
                    ..WidgetPatch::default()
                },
            },
        );
        assert_eq!(same, t);
    }

    #[test]
    fn reorder_moves_within_bounds() {
        let mut t = Template::new("doc");
        let page_id = t.pages[0].id.clone();
        for kind in [WidgetType::Title, WidgetType::Text, WidgetType::Image] {
            t.pages[0].widgets.push(Widget::with_defaults(kind));
        }
        let t = apply(
            &t,
            Action::ReorderWidgets {
                page_id: page_id.clone(),
                from: 0,
                to: 2,
            },
        );
        let kinds: Vec<_> = t.pages[0].widgets.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![WidgetType::Text, WidgetType::Image, WidgetType::Title]
        );

        // Out-of-range source index does nothing.
        let same = apply(
            &t,
            Action::ReorderWidgets {
                page_id,
                from: 9,
                to: 0,
            },
        );
        assert_eq!(same, t);
    }

    #[test]
    fn the_last_page_cannot_be_removed() {
        let t = Template::new("doc");
        let page_id = t.pages[0].id.clone();
        let same = apply(&t, Action::RemovePage { page_id });
        assert_eq!(same.pages.len(), 1);

        let two = apply(&t, Action::AddPage);
        let removed = apply(
            &two,
            Action::RemovePage {
                page_id: two.pages[0].id.clone(),
            },
        );
        assert_eq!(removed.pages.len(), 1);
        assert_eq!(removed.pages[0].id, two.pages[1].id);
    }

    #[test]
    fn generated_widgets_are_completed_from_defaults() {
        let t = Template::new("doc");
        let page_id = t.pages[0].id.clone();
        let generated: Vec<GeneratedWidget> = serde_json::from_value(json!([
            {
                "type": "Text",
                "x": 60, "y": 200, "width": 300,
                "props": { "content": "Generated paragraph content." },
                "bindings": { "props.content": "report.summary" }
            }
        ]))
        .unwrap();

        let t = apply(&t, Action::InsertGenerated { page_id, widgets: generated });
        let w = &t.pages[0].widgets[0];
        assert_eq!(w.kind, WidgetType::Text);
        assert_eq!((w.x, w.y, w.width), (60.0, 200.0, 300.0));
        // Missing height was estimated, not defaulted to zero.
        assert!(w.height >= 50.0);
        // Default style came along even though the producer sent none.
        assert_eq!(w.style_f64("fontSize"), Some(16.0));
        assert_eq!(w.bindings["props.content"], "report.summary");
        assert!(!w.id.is_empty());
    }

    #[test]
    fn rename_and_data_source_are_plain_replacements() {
        let t = Template::new("doc");
        let t = apply(&t, Action::Rename("Informe".into()));
        let t = apply(&t, Action::SetDataSource(r#"{"user":{}}"#.into()));
        assert_eq!(t.name, "Informe");
        assert_eq!(t.data_source, r#"{"user":{}}"#);
    }
}
