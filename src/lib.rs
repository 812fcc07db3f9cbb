//! # Maqueta
//!
//! A data-bound document template engine.
//!
//! A template is a set of fixed-size pages holding absolutely positioned
//! widgets — text blocks, tables, images, shapes. Widgets declare
//! *bindings* from their properties to dotted paths in an external JSON
//! data object; rendering a template against data resolves those bindings
//! and emits self-contained static HTML, page by page.
//!
//! Nothing downstream of parsing can fail: missing data paths leave static
//! values in place, malformed data sources degrade to an empty object, and
//! unknown widget types render as placeholders. A half-edited template is
//! the normal case, not the exceptional one.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]    — Templates, pages, widgets; pure edit actions
//!       ↓
//!   [binding]  — Resolve property→data bindings against a data object
//!       ↓
//!   [table]    — Project table data into headers and rows
//!       ↓
//!   [render]   — Static HTML for widgets, pages, whole documents
//!
//!   [layout]   — Interactive geometry: drag/resize snapping, size
//!                estimation, intrinsic-size feedback (no HTML involved)
//! ```

pub mod binding;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;
pub mod table;

pub use binding::{resolve_path, resolve_widget, ResolveMode};
pub use error::MaquetaError;
pub use model::{Page, Template, Widget, WidgetType};
pub use render::document::{render_document, render_document_template};

/// Render a template against a data object into a standalone HTML document.
///
/// This is the primary entry point. The data object is used as-is; to use
/// the template's own stored data source, pass [`Template::parsed_data`].
pub fn render(template: &Template, data: &serde_json::Value) -> String {
    render_document(template, data)
}

/// Render a template described as JSON against a raw JSON data string.
///
/// The template must parse; the data string is lenient and degrades to an
/// empty object, matching editor behavior.
pub fn render_json(template_json: &str, data_json: &str) -> Result<String, MaquetaError> {
    let template: Template = serde_json::from_str(template_json)?;
    let data = model::parse_data_source(data_json);
    Ok(render(&template, &data))
}
