//! Heuristic intrinsic-height estimate for freshly created or generated
//! widgets.
//!
//! This is a one-shot guess made before anything is rendered: characters
//! per line are estimated from the widget width and font size, wrapped
//! lines from the content length. The live intrinsic-size feedback loop
//! supersedes it as soon as the widget actually renders, so the numbers
//! only need to be in the right neighborhood — but they must never shrink
//! as content grows.

use serde_json::Value;

use crate::model::WidgetType;

/// Extra breathing room added on top of the estimated text block.
const PADDING: f64 = 20.0;

/// Estimate a starting height in page pixels for a widget of `kind` with
/// the given textual/list `content`, `width`, and `font_size`.
pub fn estimate_height(
    kind: WidgetType,
    content: Option<&Value>,
    width: f64,
    font_size: f64,
) -> f64 {
    let default_min: f64 = 50.0;

    // List widgets size by their flattened item count.
    if kind == WidgetType::List {
        if let Some(Value::Array(items)) = content {
            let count = count_list_items(items) as f64;
            return default_min.max(count * font_size * 1.5 + PADDING);
        }
        return default_min;
    }

    let text = match content {
        Some(Value::String(s)) => s.as_str(),
        _ => {
            return match kind {
                WidgetType::Image => default_min.max(150.0),
                WidgetType::QrCode => default_min.max(100.0),
                _ => default_min,
            };
        }
    };

    let newline_lines = text.split('\n').count();
    let average_char_width = font_size * 0.6;
    let chars_per_line = (width / average_char_width).floor() as usize;
    let wrapped_lines = if chars_per_line > 0 {
        text.chars().count().div_ceil(chars_per_line)
    } else {
        0
    };
    let total_lines = newline_lines.max(wrapped_lines) as f64;

    let (line_height, min_height) = match kind {
        WidgetType::Title => (40.0, 60.0),
        WidgetType::Subtitle => (30.0, 40.0),
        WidgetType::Text | WidgetType::StyledParagraph => (24.0, 50.0),
        // Index content is a fixed placeholder; its height never follows it.
        WidgetType::Index => return 50.0,
        _ => (font_size * 1.5, default_min),
    };

    min_height.max(total_lines * line_height + PADDING)
}

/// Depth-first count of every item and sub-item in a nested list value.
/// Entries are `[text, children]` pairs.
fn count_list_items(items: &[Value]) -> usize {
    let mut count = 0;
    for entry in items {
        count += 1;
        if let Some(Value::Array(children)) = entry.get(1) {
            count += count_list_items(children);
        }
    }
    count
}
