//! Integration tests for the template rendering pipeline.
//!
//! These tests exercise the full path from template JSON to static HTML.
//! They verify:
//! - JSON deserialization of the interchange format
//! - Binding resolution against a data object
//! - Table projection ordering and labels in rendered output
//! - List rendering of nested structures
//! - Drag snapping to another widget's center line
//! - Determinism of the whole pipeline

use maqueta::binding::{resolve_widget, ResolveMode};
use maqueta::layout::{GestureCommit, LiveLayoutEngine};
use maqueta::model::store::{apply, Action};
use maqueta::model::{Page, Template, Widget, WidgetType};
use maqueta::{render_document, render_json};

use serde_json::{json, Value};

// ─── Helpers ────────────────────────────────────────────────────

fn make_widget(kind: WidgetType, props: Value) -> Widget {
    let mut w = Widget::with_defaults(kind);
    if let Value::Object(m) = props {
        for (k, v) in m {
            w.props.insert(k, v);
        }
    }
    w
}

fn make_bound_widget(kind: WidgetType, props: Value, bindings: &[(&str, &str)]) -> Widget {
    let mut w = make_widget(kind, props);
    for (property, path) in bindings {
        w.bindings.insert(property.to_string(), path.to_string());
    }
    w
}

fn make_template(widgets: Vec<Widget>) -> Template {
    let mut t = Template::new("test");
    t.pages[0].widgets = widgets;
    t
}

// ─── Binding through rendering ──────────────────────────────────

#[test]
fn bound_text_renders_the_data_value() {
    let widget = make_bound_widget(
        WidgetType::Text,
        json!({"content": "Hello"}),
        &[("props.content", "user.name")],
    );
    let data = json!({"user": {"name": "World"}});

    let resolved = resolve_widget(&widget, &data, ResolveMode::Export);
    assert_eq!(resolved.prop_str("content"), Some("World"));

    let html = render_document(&make_template(vec![widget]), &data);
    assert!(html.contains(">World<"));
}

#[test]
fn unbound_widgets_render_their_static_content() {
    let widget = make_widget(WidgetType::Text, json!({"content": "static text"}));
    let html = render_document(&make_template(vec![widget]), &json!({}));
    assert!(html.contains(">static text<"));
}

#[test]
fn render_json_parses_template_and_tolerates_bad_data() {
    let template = make_template(vec![make_widget(
        WidgetType::Title,
        json!({"content": "Informe"}),
    )]);
    let template_json = serde_json::to_string(&template).unwrap();

    let html = render_json(&template_json, "{ this is not json").unwrap();
    assert!(html.contains(">Informe</h1>"));

    assert!(render_json("{ broken template", "{}").is_err());
}

// ─── Table projection in rendered output ────────────────────────

#[test]
fn dynamic_table_respects_column_order() {
    let widget = make_bound_widget(
        WidgetType::Table,
        json!({
            "tableMode": "dynamic",
            "tableData": [],
            "columnOrder": ["name", "id"],
        }),
        &[("props.tableData", "people")],
    );
    let data = json!({"people": [{"id": 1, "name": "Ann"}, {"id": 2, "name": "Bea"}]});

    let html = render_document(&make_template(vec![widget]), &data);
    let name_pos = html.find(">name</th>").expect("name header");
    let id_pos = html.find(">id</th>").expect("id header");
    assert!(name_pos < id_pos, "columnOrder was not applied");

    let ann_pos = html.find(">Ann</td>").expect("first row first cell");
    let one_pos = html.find(">1</td>").expect("first row second cell");
    assert!(ann_pos < one_pos, "row cells not in column order");
}

#[test]
fn export_renders_full_table_data_past_the_live_cap() {
    let widget = make_bound_widget(
        WidgetType::Table,
        json!({"tableMode": "dynamic", "tableData": []}),
        &[("props.tableData", "rows")],
    );
    let rows: Vec<Value> = (0..25).map(|i| json!({"n": format!("fila-{i}")})).collect();
    let data = json!({ "rows": rows });

    let html = render_document(&make_template(vec![widget]), &data);
    assert!(html.contains(">fila-24</td>"));
    assert!(!html.contains("isTruncated"));
}

// ─── Lists ──────────────────────────────────────────────────────

#[test]
fn nested_list_renders_nested_ordered_lists() {
    let widget = make_widget(
        WidgetType::List,
        json!({"content": [["A", []], ["B", [["B1", []]]]]}),
    );
    let html = render_document(&make_template(vec![widget]), &json!({}));

    // Two top-level items, one nested item under "B".
    assert_eq!(html.matches("<li>").count(), 3);
    assert!(html.contains("<li>B<ol"));
    assert!(html.contains("<li>B1</li>"));
}

// ─── Drag snapping ──────────────────────────────────────────────

#[test]
fn drag_snaps_the_vertical_center_to_a_neighbor() {
    // A 100×50 widget dragged down a portrait page until its middle comes
    // within threshold of a neighbor whose vertical middle sits at y = 500.
    let mut dragged = Widget::with_defaults(WidgetType::Rectangle);
    dragged.x = 10.0;
    dragged.y = 10.0;
    dragged.width = 100.0;
    dragged.height = 50.0;

    let mut neighbor = Widget::with_defaults(WidgetType::Rectangle);
    neighbor.x = 600.0;
    neighbor.y = 400.0;
    neighbor.width = 100.0;
    neighbor.height = 200.0; // middle at 500

    let page = Page::new();
    let mut engine = LiveLayoutEngine::for_page(&page);
    assert!(engine.begin_drag(&dragged, (20.0, 20.0)));

    let others = vec![neighbor];
    engine.pointer_move((20.0, 483.0), others.iter());
    assert_eq!(engine.guides().horizontal, vec![500.0]);

    match engine.pointer_up().expect("gesture was active") {
        GestureCommit::Move { y, .. } => assert_eq!(y + 25.0, 500.0),
        other => panic!("expected a move commit, got {other:?}"),
    }
    assert!(engine.guides().is_empty());
}

// ─── Edit actions feeding the renderer ──────────────────────────

#[test]
fn added_widget_round_trips_through_actions_to_html() {
    let template = Template::new("doc");
    let page_id = template.pages[0].id.clone();

    let template = apply(
        &template,
        Action::AddWidget {
            page_id: page_id.clone(),
            kind: WidgetType::Title,
        },
    );
    let template = apply(
        &template,
        Action::SetDataSource(r#"{"user":{"name":"Ada"}}"#.into()),
    );

    let html = render_document(&template, &template.parsed_data());
    // The palette default title text comes through.
    assert!(html.contains(">Título Principal</h1>"));
}

// ─── Determinism ────────────────────────────────────────────────

#[test]
fn rendering_is_deterministic() {
    let widgets = vec![
        make_bound_widget(
            WidgetType::Text,
            json!({"content": "x"}),
            &[("props.content", "a.b")],
        ),
        make_widget(WidgetType::Checkbox, json!({"label": "ok", "checked": true})),
        make_bound_widget(
            WidgetType::Table,
            json!({"tableMode": "dynamic", "tableData": []}),
            &[("props.tableData", "rows")],
        ),
    ];
    let template = make_template(widgets);
    let data = json!({"a": {"b": "y"}, "rows": [{"k": 1}]});

    assert_eq!(
        render_document(&template, &data),
        render_document(&template, &data)
    );
}

#[test]
fn resolution_never_mutates_the_template() {
    let widget = make_bound_widget(
        WidgetType::Text,
        json!({"content": "static"}),
        &[("props.content", "user.name")],
    );
    let template = make_template(vec![widget]);
    let before = serde_json::to_string(&template).unwrap();

    let _ = render_document(&template, &json!({"user": {"name": "changed"}}));
    let after = serde_json::to_string(&template).unwrap();
    assert_eq!(before, after);
}
