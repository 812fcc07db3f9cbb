//! # Static Rendering
//!
//! Turns resolved widgets into self-contained HTML strings: inline styles
//! only, no scripts, no stylesheet. The output is what gets exported,
//! thumbnailed, and fed to print capture, so rendering is deterministic and
//! total — every widget type produces *some* markup, and nothing in here
//! returns an error.
//!
//! [`render_widget`] emits one widget's inner markup; the page and document
//! shells around it live in [`document`].

pub mod document;

use std::sync::OnceLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Captures, Regex};
use serde_json::Value;

use crate::binding::resolve_path;
use crate::model::{PropBag, Widget, WidgetType};
use crate::table::{self, RowHeight};

/// Style keys whose numeric values carry physical units and need `px`.
const PX_KEYS: &[&str] = &[
    "fontSize",
    "borderWidth",
    "borderRadius",
    "borderTopWidth",
    "borderBottomWidth",
    "borderLeftWidth",
    "borderRightWidth",
    "margin",
    "marginTop",
    "marginBottom",
    "marginLeft",
    "marginRight",
];

/// `encodeURIComponent` escape set: everything except alphanumerics and
/// `- _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{(.*?)\}\}").expect("placeholder pattern is valid"))
}

/// Substitute `{{dotted.path}}` placeholders against `data`. Unresolved
/// tokens stay verbatim, which is what a template author editing against
/// incomplete sample data expects to see.
pub fn interpolate(text: &str, data: &Value) -> String {
    placeholder_re()
        .replace_all(text, |caps: &Captures| {
            let path = caps[1].trim();
            match resolve_path(data, path) {
                Some(value) => scalar_text(value),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn kebab(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Translate a camelCase style bag into an inline CSS declaration string,
/// suffixing `px` onto numeric values of physical-unit keys. Every entry
/// ends with `"; "` so fragments concatenate cleanly.
pub fn style_string(bag: &PropBag) -> String {
    let mut out = String::new();
    for (key, value) in bag {
        let css_key = kebab(key);
        match value {
            Value::Number(n) if PX_KEYS.contains(&key.as_str()) => {
                out.push_str(&format!("{css_key}: {n}px; "));
            }
            Value::String(s) => out.push_str(&format!("{css_key}: {s}; ")),
            other => out.push_str(&format!("{css_key}: {other}; ")),
        }
    }
    out
}

/// Render one widget's inner markup. The widget is expected to have had its
/// bindings resolved already; `data` is still needed for `{{placeholder}}`
/// substitution, List data-path leaves, and per-cell table bindings.
pub fn render_widget(widget: &Widget, data: &Value) -> String {
    let style = style_string(&widget.style);
    let resolve = |text: &str| interpolate(text, data);

    let text_content = match widget.prop_str("content") {
        Some(s) => resolve(s),
        None => String::new(),
    };
    let text_html = match widget.prop_str("link") {
        Some(link) => format!(
            "<a href=\"{link}\" target=\"_blank\" rel=\"noopener noreferrer\">{text_content}</a>"
        ),
        None => text_content,
    };

    match widget.kind {
        WidgetType::Title => format!(
            "<h1 style=\"width:100%; margin:0; padding:2px; box-sizing:border-box; {style}\">{text_html}</h1>"
        ),
        WidgetType::Subtitle => format!(
            "<h2 style=\"width:100%; margin:0; padding:2px; box-sizing:border-box; {style}\">{text_html}</h2>"
        ),
        WidgetType::Text | WidgetType::StyledParagraph => format!(
            "<p style=\"width:100%; margin:0; padding:2px; box-sizing:border-box; white-space: pre-wrap; {style}\">{text_html}</p>"
        ),
        WidgetType::Index => format!(
            "<div style=\"width:100%; margin:0; padding:2px; box-sizing:border-box; display:flex; align-items:center; justify-content:center; color:#9ca3af; font-style:italic; {style}\">Índice</div>"
        ),
        WidgetType::List => {
            let items = match widget.prop("content") {
                Some(Value::Array(items)) => items.as_slice(),
                _ => &[],
            };
            format!(
                "<div style=\"width:100%; margin:0; padding:2px; box-sizing:border-box; {style}\">{}</div>",
                render_list(items, data)
            )
        }
        WidgetType::Image => format!(
            "<img src=\"{}\" alt=\"Image\" style=\"width:100%; height:100%; {style}\" />",
            widget.prop_str("src").unwrap_or("")
        ),
        WidgetType::QrCode => {
            let encoded =
                utf8_percent_encode(widget.prop_str("data").unwrap_or(""), URI_COMPONENT);
            format!(
                "<img src=\"https://api.qrserver.com/v1/create-qr-code/?size=200x200&data={encoded}\" alt=\"QR Code\" style=\"width:100%; height:100%;\" />"
            )
        }
        // A circle is just a rectangle whose default style carries a huge
        // border radius.
        WidgetType::Rectangle | WidgetType::Circle => {
            format!("<div style=\"width:100%; height:100%; {style}\"></div>")
        }
        WidgetType::Triangle => format!(
            "<div style=\"width:100%; height:100%; background-color:{}; {style} clip-path: polygon(50% 0%, 0% 100%, 100% 100%);\"></div>",
            widget.style_str("backgroundColor").unwrap_or("transparent")
        ),
        WidgetType::Arrow => {
            let fill = widget.style_str("backgroundColor").unwrap_or("black");
            let stroke = widget.style_str("borderColor").unwrap_or("none");
            let stroke_width = widget.style_f64("borderWidth").unwrap_or(0.0);
            let opacity = widget.style_f64("opacity").unwrap_or(1.0);
            format!(
                "<svg width=\"100%\" height=\"100%\" viewBox=\"0 0 100 40\" preserveAspectRatio=\"none\"><polygon points=\"0,15 70,15 70,0 100,20 70,40 70,25 0,25\" style=\"fill:{fill}; stroke:{stroke}; stroke-width:{stroke_width}; opacity: {opacity}\" /></svg>"
            )
        }
        WidgetType::Checkbox => render_checkbox(widget, &style, data),
        WidgetType::Table => render_table(widget, &style, data),
        WidgetType::Unknown => {
            log::warn!("unknown widget type for widget {}, rendering placeholder", widget.id);
            "<div></div>".to_string()
        }
    }
}

/// Recursive ordered-list markup over `[text, children]` entries. A leaf's
/// text is looked up as a data path first; when the lookup misses it is
/// shown literally (after placeholder substitution).
fn render_list(items: &[Value], data: &Value) -> String {
    let mut html = String::from("<ol style=\"list-style-type: decimal; padding-left: 20px;\">");
    for entry in items {
        let text = entry
            .get(0)
            .and_then(Value::as_str)
            .unwrap_or_default();
        let resolved = match resolve_path(data, text) {
            Some(value) => scalar_text(value),
            None => interpolate(text, data),
        };
        html.push_str(&format!("<li>{resolved}"));
        if let Some(Value::Array(children)) = entry.get(1) {
            if !children.is_empty() {
                html.push_str(&render_list(children, data));
            }
        }
        html.push_str("</li>");
    }
    html.push_str("</ol>");
    html
}

fn render_checkbox(widget: &Widget, style: &str, data: &Value) -> String {
    let color = widget.style_str("color").unwrap_or("#000000");
    let background = widget.style_str("backgroundColor").unwrap_or("transparent");
    let box_size = widget.font_size() * 1.1;
    let checkmark = if widget.prop_bool("checked") {
        format!(
            "<svg viewBox=\"0 0 20 20\" fill=\"{color}\" style=\"width: 100%; height: 100%;\"><path fill-rule=\"evenodd\" d=\"M16.707 5.293a1 1 0 010 1.414l-8 8a1 1 0 01-1.414 0l-4-4a1 1 0 011.414-1.414L8 12.586l7.293-7.293a1 1 0 011.414 0z\" clip-rule=\"evenodd\" /></svg>"
        )
    } else {
        String::new()
    };
    let label = interpolate(widget.prop_str("label").unwrap_or(""), data);
    format!(
        "<div style=\"{style} display: flex; align-items: center; gap: 8px;\">\
         <div style=\"width: {box_size}px; height: {box_size}px; border: 1.5px solid {color}; \
         background-color: {background}; display: inline-flex; align-items: center; \
         justify-content: center; box-sizing: border-box; border-radius: 3px;\">{checkmark}</div>\
         <label>{label}</label></div>"
    )
}

fn render_table(widget: &Widget, style: &str, data: &Value) -> String {
    let projection = table::project(widget);
    let border_color = widget.style_str("borderColor").unwrap_or("#d1d5db");

    let mut html = format!(
        "<table style=\"width:100%; font-size: 14px; border-collapse: collapse; table-layout: fixed; {style}\">"
    );

    html.push_str("<colgroup>");
    for width in &projection.col_widths {
        html.push_str(&format!("<col style=\"width: {width}px\">"));
    }
    html.push_str("</colgroup>");

    let header_bag = prop_style_bag(widget, "headerStyle");
    let header_color = header_bag
        .as_ref()
        .and_then(|b| b.get("color"))
        .and_then(Value::as_str)
        .unwrap_or("inherit")
        .to_string();
    let header_style = header_bag.as_ref().map(style_string).unwrap_or_default();

    html.push_str(&format!("<thead><tr style=\"{header_style}\">"));
    for header in &projection.headers {
        html.push_str(&format!(
            "<th style=\"border: 1px solid {border_color}; padding: 8px; text-align: left; \
             font-weight: bold; word-wrap: break-word; color: {header_color};\">{}</th>",
            interpolate(header, data)
        ));
    }
    html.push_str("</tr></thead>");

    html.push_str("<tbody>");
    if projection.placeholder {
        let span = projection.col_widths.len().max(1);
        html.push_str(&format!(
            "<tr><td colspan=\"{span}\" style=\"border: 1px solid {border_color}; padding: 8px; \
             text-align: center; color: #9ca3af; font-style: italic;\">Sin datos</td></tr>"
        ));
    }
    let even_bag = prop_style_bag(widget, "evenRowStyle");
    let odd_bag = prop_style_bag(widget, "oddRowStyle");
    for (r_idx, row) in projection.rows.iter().enumerate() {
        let row_bag = if r_idx % 2 == 0 { &even_bag } else { &odd_bag };
        let row_color = row_bag
            .as_ref()
            .and_then(|b| b.get("color"))
            .and_then(Value::as_str)
            .unwrap_or("inherit")
            .to_string();
        let mut row_style = row_bag.as_ref().map(style_string).unwrap_or_default();
        match projection.row_heights.get(r_idx) {
            Some(RowHeight::Px(h)) => row_style.push_str(&format!("height: {h}px;")),
            _ => row_style.push_str("height: auto;"),
        }

        html.push_str(&format!("<tr style=\"{row_style}\">"));
        for (c_idx, cell) in row.iter().enumerate() {
            // Per-cell bindings use the literal compound key form.
            let bound = widget
                .bindings
                .get(&format!("props.tableData[{r_idx}][{c_idx}]"))
                .and_then(|path| resolve_path(data, path))
                .map(scalar_text);
            let content = match bound {
                Some(value) => value,
                None => interpolate(cell, data),
            };
            html.push_str(&format!(
                "<td style=\"border: 1px solid {border_color}; padding: 8px; \
                 word-wrap: break-word; color: {row_color};\">{content}</td>"
            ));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

fn prop_style_bag(widget: &Widget, key: &str) -> Option<PropBag> {
    widget.prop(key).and_then(Value::as_object).cloned()
}
