//! Page and document shells around the widget renderer.
//!
//! Two export flavors share the same page geometry:
//!
//! - **Resolved export** ([`render_document`]): bindings are resolved
//!   against the data object and widgets are emitted fully concrete. This
//!   is the input to print capture.
//! - **Template export** ([`render_document_template`]): bindings become
//!   `{{dotted.path}}` placeholders so a downstream system can substitute
//!   its own data with plain string replacement.

use crate::binding::{resolve_widget, ResolveMode};
use crate::model::{Page, Template, WatermarkKind, Widget, WidgetType};
use crate::render::{render_widget, style_string};

/// Render one page with its widgets resolved against `data`. `index` is
/// zero-based; `total` is the page count for the pagination footer.
pub fn render_page(page: &Page, data: &serde_json::Value, index: usize, total: usize) -> String {
    let (width, height) = page.properties.orientation.dimensions();
    let mut html = format!(
        "<div style=\"width: {width}px; height: {height}px; background-color: {}; \
         position: relative; overflow: hidden;\">",
        page.properties.background_color
    );

    html.push_str(&render_chrome(page, index, total));

    for widget in &page.widgets {
        let resolved = resolve_widget(widget, data, ResolveMode::Export);
        html.push_str(&format!(
            "<div style=\"position: absolute; left: {}px; top: {}px; width: {}px; \
             height: {}px; box-sizing: border-box;\">{}</div>",
            resolved.x,
            resolved.y,
            resolved.width,
            resolved.height,
            render_widget(&resolved, data)
        ));
    }

    html.push_str("</div>");
    html
}

/// Watermark, header, and pagination footer for a page.
fn render_chrome(page: &Page, index: usize, total: usize) -> String {
    let props = &page.properties;
    let mut html = String::new();

    if props.watermark.enabled {
        let wm = &props.watermark;
        let transform = format!("translate(-50%, -50%) rotate({}deg)", wm.angle);
        match (wm.kind, wm.src.as_deref()) {
            (WatermarkKind::Image, Some(src)) if !src.is_empty() => {
                html.push_str(&format!(
                    "<img src=\"{src}\" alt=\"Watermark\" style=\"position: absolute; \
                     top: 50%; left: 50%; transform: {transform}; opacity: {}; \
                     max-width: 80%; max-height: 80%; pointer-events: none;\" />",
                    wm.opacity
                ));
            }
            _ => {
                html.push_str(&format!(
                    "<div style=\"position: absolute; top: 50%; left: 50%; \
                     transform: {transform}; color: {}; opacity: {}; font-size: {}px; \
                     white-space: nowrap; pointer-events: none;\">{}</div>",
                    wm.color, wm.opacity, wm.font_size, wm.text
                ));
            }
        }
    }

    if props.header.enabled {
        html.push_str(&format!(
            "<div style=\"position: absolute; top: 0; left: 0; right: 0; padding: 10px 40px; \
             font-size: 12px; color: #6b7280; text-align: center;\">{}</div>",
            props.header.text
        ));
    }

    if props.pagination.enabled {
        html.push_str(&format!(
            "<div style=\"position: absolute; bottom: 0; right: 0; padding: 10px 40px; \
             font-size: 12px; color: #6b7280;\">Página {} de {}</div>",
            index + 1,
            total
        ));
    }

    html
}

/// One widget in template-export form: absolutely positioned, with its
/// content bindings turned back into `{{path}}` placeholders. Types without
/// a template representation come out as a labelled outline box.
pub fn render_widget_template(widget: &Widget) -> String {
    let mut style = format!(
        "position: absolute; left: {}px; top: {}px; width: {}px; height: {}px; \
         box-sizing: border-box;",
        widget.x, widget.y, widget.width, widget.height
    );
    style.push_str(&style_string(&widget.style));

    let content = match widget.bindings.get("props.content") {
        Some(path) => format!("{{{{{path}}}}}"),
        None => widget.prop_str("content").unwrap_or("").to_string(),
    };

    match widget.kind {
        WidgetType::Title => format!("<h1 style=\"{style}\">{content}</h1>"),
        WidgetType::Subtitle => format!("<h2 style=\"{style}\">{content}</h2>"),
        WidgetType::Text | WidgetType::StyledParagraph => {
            format!("<p style=\"{style} white-space: pre-wrap;\">{content}</p>")
        }
        WidgetType::Image => {
            let src = match widget.bindings.get("props.src") {
                Some(path) => format!("{{{{{path}}}}}"),
                None => widget.prop_str("src").unwrap_or("").to_string(),
            };
            format!("<img src=\"{src}\" style=\"{style}\" />")
        }
        other => format!(
            "<div style=\"{style} border: 1px solid #ccc; display: flex; \
             align-items: center; justify-content: center; font-size: 10px; \
             color: #888;\">{}</div>",
            other.name()
        ),
    }
}

fn document_shell(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title}</title>\n\
         <style>body {{ font-family: sans-serif; background-color: #f0f0f0; \
         margin: 0; padding: 0; }}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

/// Each page as the print capture sees it, stacked with a document margin
/// and shadow so the file also reads well in a browser.
fn framed(page_html: String) -> String {
    // The page div ends with "overflow: hidden;" from render_page; appending
    // the frame styles to that same declaration keeps one wrapper per page.
    page_html.replacen(
        "overflow: hidden;\"",
        "overflow: hidden; margin: 20px auto; box-shadow: 0 0 10px rgba(0,0,0,0.1);\"",
        1,
    )
}

/// Render a whole template against a data object into a standalone HTML
/// document.
pub fn render_document(template: &Template, data: &serde_json::Value) -> String {
    let total = template.pages.len();
    let body: String = template
        .pages
        .iter()
        .enumerate()
        .map(|(i, page)| framed(render_page(page, data, i, total)))
        .collect();
    document_shell(&template.name, &body)
}

/// Render a template with placeholders left in, for external substitution.
pub fn render_document_template(template: &Template) -> String {
    let body: String = template
        .pages
        .iter()
        .map(|page| {
            let (width, height) = page.properties.orientation.dimensions();
            let widgets: String = page.widgets.iter().map(render_widget_template).collect();
            format!(
                "<div style=\"width: {width}px; height: {height}px; background-color: {}; \
                 position: relative; overflow: hidden; margin: 20px auto; \
                 box-shadow: 0 0 10px rgba(0,0,0,0.1);\">{widgets}</div>",
                page.properties.background_color
            )
        })
        .collect();
    document_shell(&template.name, &body)
}
