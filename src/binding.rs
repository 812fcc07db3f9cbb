//! # Data Binding
//!
//! Resolves a widget's declared bindings against an external JSON data
//! object, producing a concrete widget ready for rendering. Two pieces:
//!
//! - [`resolve_path`] reads a dotted path out of a nested value.
//! - [`resolve_widget`] overlays every binding whose data path resolves
//!   onto a copy of the widget, creating intermediate objects as needed.
//!
//! Resolution is pure: inputs are never mutated, identical inputs produce
//! identical outputs, and nothing here can fail the render. A binding whose
//! path misses simply leaves the widget's static value in place — that is
//! the normal state while a template is being edited.

use serde_json::{Map, Value};

use crate::model::Widget;

/// Live previews cap bound arrays at this many items; export never does.
pub const LIVE_ARRAY_CAP: usize = 10;

/// How bound array values are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Interactive editing view: content/table arrays longer than
    /// [`LIVE_ARRAY_CAP`] are truncated and `props.isTruncated` is set as a
    /// UI hint. A performance accommodation, not a data rule.
    Live,
    /// Thumbnails, HTML export, PDF capture: full data, no hint flag.
    Export,
}

/// Read a dotted path out of a nested data value.
///
/// Splits on `.` and walks objects; literal numeric segments index into
/// arrays. Short-circuits to `None` as soon as any intermediate is missing.
/// The compound `props.tableData[r][c]` binding keys are *not* understood
/// here; the table renderer handles those itself.
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut current = root;
    for part in path.split('.') {
        match current {
            Value::Object(map) => current = map.get(part)?,
            Value::Array(arr) => {
                let idx: usize = part.parse().ok()?;
                current = arr.get(idx)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Overlay a widget's bindings with values from `data`.
///
/// Returns a resolved copy; the original widget is untouched. Bindings are
/// applied in key order, which is stable for a given widget.
pub fn resolve_widget(widget: &Widget, data: &Value, mode: ResolveMode) -> Widget {
    let mut resolved = widget.clone();

    for (property_path, data_path) in &widget.bindings {
        let Some(value) = resolve_path(data, data_path) else {
            continue;
        };
        let mut value = value.clone();

        // Large bound arrays get capped in the interactive preview only.
        if mode == ResolveMode::Live
            && (property_path == "props.tableData" || property_path == "props.content")
        {
            if let Value::Array(items) = &value {
                if items.len() > LIVE_ARRAY_CAP {
                    value = Value::Array(items[..LIVE_ARRAY_CAP].to_vec());
                    resolved
                        .props
                        .insert("isTruncated".to_string(), Value::Bool(true));
                }
            }
        }

        write_at_path(&mut resolved, property_path, value);
    }

    resolved
}

/// Resolve against a raw JSON data-source string. A malformed source is an
/// expected editing state: the widget comes back unchanged.
pub fn resolve_widget_with_source(widget: &Widget, source: &str, mode: ResolveMode) -> Widget {
    match serde_json::from_str::<Value>(source) {
        Ok(data) => resolve_widget(widget, &data, mode),
        Err(e) => {
            log::debug!("binding data source failed to parse: {e}");
            widget.clone()
        }
    }
}

/// Write `value` into the widget at a dotted property path rooted at
/// `props` or `style`, creating intermediate objects along the way. Paths
/// with any other root (or direct scalar fields) are ignored — bindings
/// only ever target the two bags.
fn write_at_path(widget: &mut Widget, property_path: &str, value: Value) {
    let mut segments = property_path.split('.');
    let Some(root) = segments.next() else { return };
    let bag = match root {
        "props" => &mut widget.props,
        "style" => &mut widget.style,
        _ => return,
    };

    let segments: Vec<&str> = segments.collect();
    let Some((last, intermediate)) = segments.split_last() else {
        return;
    };

    let mut current = bag;
    for seg in intermediate {
        let entry = current
            .entry(seg.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        // A non-object intermediate is replaced, matching overlay semantics.
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = entry.as_object_mut().expect("just ensured object");
    }
    current.insert(last.to_string(), value);
}
