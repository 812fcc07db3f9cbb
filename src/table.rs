//! # Table Projection
//!
//! Turns a table widget's data — either an array of row-arrays (first row =
//! headers) or an array of objects — plus the user's chosen column order and
//! labels into a flat headers+rows shape that both renderers consume.
//!
//! The ordering rule is deliberate: a user's manual `columnOrder` survives
//! data-shape changes. Keys that disappeared are dropped, keys that newly
//! appeared are appended at the end, and nothing is ever silently
//! re-sorted alphabetically.

use serde_json::Value;

use crate::model::Widget;

/// Per-row height override. `Auto` defers to content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowHeight {
    Auto,
    Px(f64),
}

/// The projected table shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TableProjection {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Pixel width per column; equal split of the widget width when the
    /// user has not resized columns.
    pub col_widths: Vec<f64>,
    /// Height override per body row, `Auto` where unset.
    pub row_heights: Vec<RowHeight>,
    /// Deliberate explicit state: a bound dynamic table whose data array is
    /// empty renders a single "no data" row spanning all columns.
    pub placeholder: bool,
}

/// Project a table widget's props into headers and body rows.
pub fn project(widget: &Widget) -> TableProjection {
    let empty = vec![];
    let table_data = widget
        .prop("tableData")
        .and_then(Value::as_array)
        .unwrap_or(&empty);
    let dynamic = widget.prop_str("tableMode") == Some("dynamic");

    let (headers, rows) = match table_data.first() {
        Some(Value::Object(first)) => project_objects(widget, first, table_data),
        Some(Value::Array(first)) => {
            let headers = first.iter().map(cell_text).collect();
            let rows = table_data[1..]
                .iter()
                .map(|row| match row {
                    Value::Array(cells) => cells.iter().map(cell_text).collect(),
                    other => vec![cell_text(other)],
                })
                .collect();
            (headers, rows)
        }
        // Empty or malformed data: no headers, no rows, never an error.
        _ => (vec![], vec![]),
    };

    let col_count = if !headers.is_empty() {
        headers.len()
    } else {
        rows.first().map(Vec::len).unwrap_or(1)
    };

    let col_widths = widget
        .prop("colWidths")
        .and_then(Value::as_array)
        .map(|ws| ws.iter().filter_map(Value::as_f64).collect::<Vec<_>>())
        .filter(|ws| !ws.is_empty())
        .unwrap_or_else(|| vec![widget.width / col_count as f64; col_count]);

    let overrides = widget.prop("rowHeights").and_then(Value::as_array);
    let row_heights = (0..rows.len())
        .map(|i| {
            match overrides.and_then(|hs| hs.get(i)) {
                Some(Value::Number(n)) => n.as_f64().map(RowHeight::Px).unwrap_or(RowHeight::Auto),
                // The literal string 'auto', or no override at all.
                _ => RowHeight::Auto,
            }
        })
        .collect();

    let placeholder = dynamic && rows.is_empty();

    TableProjection {
        headers,
        rows,
        col_widths,
        row_heights,
        placeholder,
    }
}

/// Array-of-objects mode: column keys come from the first element, ordered
/// by `columnOrder` (filtered to live keys, new keys appended), labelled by
/// `columnHeaders` with the raw key as fallback.
fn project_objects(
    widget: &Widget,
    first: &serde_json::Map<String, Value>,
    table_data: &[Value],
) -> (Vec<String>, Vec<Vec<String>>) {
    let object_keys: Vec<&String> = first.keys().collect();

    let ordered_keys: Vec<String> = match widget
        .prop("columnOrder")
        .and_then(Value::as_array)
        .filter(|order| !order.is_empty())
    {
        Some(order) => {
            let mut keys: Vec<String> = order
                .iter()
                .filter_map(Value::as_str)
                .filter(|k| object_keys.iter().any(|ok| ok == k))
                .map(str::to_string)
                .collect();
            for key in &object_keys {
                if !keys.iter().any(|k| &k == key) {
                    keys.push((*key).clone());
                }
            }
            keys
        }
        None => object_keys.iter().map(|k| (*k).clone()).collect(),
    };

    let labels = widget.prop("columnHeaders").and_then(Value::as_object);
    let headers = ordered_keys
        .iter()
        .map(|key| {
            labels
                .and_then(|m| m.get(key))
                .and_then(Value::as_str)
                .unwrap_or(key)
                .to_string()
        })
        .collect();

    let rows = table_data
        .iter()
        .map(|row| {
            ordered_keys
                .iter()
                .map(|key| {
                    row.get(key)
                        .map(cell_text)
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    (headers, rows)
}

/// Display text for a cell value. Strings pass through, scalars stringify,
/// null shows as empty, and anything structured falls back to its JSON.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WidgetType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn table(props: Value) -> Widget {
        let mut w = Widget::with_defaults(WidgetType::Table);
        w.width = 400.0;
        w.props = match props {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        w
    }

    #[test]
    fn array_of_arrays_uses_first_row_as_headers() {
        let w = table(json!({
            "tableData": [["A", "B"], ["1", "2"], ["3", "4"]],
        }));
        let p = project(&w);
        assert_eq!(p.headers, vec!["A", "B"]);
        assert_eq!(p.rows, vec![vec!["1", "2"], vec!["3", "4"]]);
        assert!(!p.placeholder);
    }

    #[test]
    fn objects_respect_column_order_and_labels() {
        let w = table(json!({
            "tableMode": "dynamic",
            "tableData": [{"id": 1, "name": "Ann"}, {"id": 2, "name": "Bea"}],
            "columnOrder": ["name", "id"],
            "columnHeaders": {"name": "Nombre"},
        }));
        let p = project(&w);
        assert_eq!(p.headers, vec!["Nombre", "id"]);
        assert_eq!(p.rows[0], vec!["Ann", "1"]);
        assert_eq!(p.rows[1], vec!["Bea", "2"]);
    }

    #[test]
    fn vanished_keys_drop_and_new_keys_append() {
        // columnOrder was saved against an older data shape: "price" is
        // gone and "stock" is new.
        let w = table(json!({
            "tableData": [{"name": "x", "stock": 3, "id": 9}],
            "columnOrder": ["price", "name", "id"],
        }));
        let p = project(&w);
        assert_eq!(p.headers, vec!["name", "id", "stock"]);
    }

    #[test]
    fn projection_is_stable_across_calls() {
        let w = table(json!({
            "tableData": [{"b": 1, "a": 2, "c": 3}],
            "columnOrder": ["c", "a"],
        }));
        assert_eq!(project(&w), project(&w));
        assert_eq!(project(&w).headers, vec!["c", "a", "b"]);
    }

    #[test]
    fn widths_fall_back_to_an_equal_split() {
        let w = table(json!({
            "tableData": [["A", "B", "C", "D"]],
        }));
        assert_eq!(project(&w).col_widths, vec![100.0; 4]);

        let sized = table(json!({
            "tableData": [["A", "B"]],
            "colWidths": [120, 280],
        }));
        assert_eq!(project(&sized).col_widths, vec![120.0, 280.0]);
    }

    #[test]
    fn row_height_overrides_pass_through() {
        let w = table(json!({
            "tableData": [["H"], ["r1"], ["r2"], ["r3"]],
            "rowHeights": [40, "auto"],
        }));
        let p = project(&w);
        assert_eq!(
            p.row_heights,
            vec![RowHeight::Px(40.0), RowHeight::Auto, RowHeight::Auto]
        );
    }

    #[test]
    fn empty_dynamic_table_is_a_placeholder_not_an_error() {
        let w = table(json!({
            "tableMode": "dynamic",
            "tableData": [],
        }));
        let p = project(&w);
        assert!(p.placeholder);
        assert!(p.headers.is_empty() && p.rows.is_empty());

        // Static empty data is just an empty table.
        let s = table(json!({ "tableData": [] }));
        assert!(!project(&s).placeholder);
    }

    #[test]
    fn malformed_data_projects_empty() {
        let w = table(json!({ "tableData": "definitely not rows" }));
        let p = project(&w);
        assert!(p.headers.is_empty() && p.rows.is_empty());
    }
}
