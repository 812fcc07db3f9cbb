//! # Document Model
//!
//! The interchange representation for the template engine. A template owns
//! pages; a page owns an ordered list of widgets; a widget is a typed,
//! absolutely positioned content block with open `props`/`style` bags and a
//! map of data bindings. This shape is shared verbatim with persistence and
//! with generative content producers, so it is designed to round-trip
//! through JSON without loss.
//!
//! `props` and `style` are deliberately open JSON maps rather than typed
//! structs: bindings write arbitrary dotted paths into them at resolve time,
//! and content producers are free to attach keys this engine has never seen.
//! The widget *type*, on the other hand, is a closed enum so that renderers
//! and the layout engine dispatch exhaustively.

pub mod store;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Open property bag carried by every widget (`props` and `style`).
pub type PropBag = Map<String, Value>;

/// A complete document template ready for editing or rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    /// Pages in reading order. A template always retains at least one page.
    pub pages: Vec<Page>,
    /// The external data object, stored as a JSON string exactly as the
    /// user typed it. Parsed leniently: malformed input degrades to `{}`.
    #[serde(default)]
    pub data_source: String,
}

impl Template {
    /// Create a template with a single empty page.
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            pages: vec![Page::new()],
            data_source: "{}".to_string(),
        }
    }

    /// Parse the data source, falling back to an empty object on any error.
    /// Malformed data is an expected editing state, never a render failure.
    pub fn parsed_data(&self) -> Value {
        parse_data_source(&self.data_source)
    }
}

/// Parse a JSON data source string, degrading to `{}` on failure.
pub fn parse_data_source(source: &str) -> Value {
    if source.trim().is_empty() {
        return json!({});
    }
    match serde_json::from_str(source) {
        Ok(v) => v,
        Err(e) => {
            log::debug!("data source failed to parse, treating as empty: {e}");
            json!({})
        }
    }
}

/// A single fixed-size page holding widgets in paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    /// Array order is z-order and reading order. Mutated only by explicit
    /// reorder actions.
    #[serde(default)]
    pub widgets: Vec<Widget>,
    #[serde(default)]
    pub properties: PageProperties,
}

impl Page {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            widgets: vec![],
            properties: PageProperties::default(),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

/// Page orientation. Fixes the pixel box: 816×1056 or 1056×816.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Returns (width, height) in page pixels.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            Orientation::Portrait => (816.0, 1056.0),
            Orientation::Landscape => (1056.0, 816.0),
        }
    }
}

/// Per-page presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageProperties {
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default)]
    pub watermark: Watermark,
    #[serde(default)]
    pub header: PageHeader,
    #[serde(default)]
    pub pagination: Pagination,
}

fn default_background() -> String {
    "#ffffff".to_string()
}

impl Default for PageProperties {
    fn default() -> Self {
        Self {
            orientation: Orientation::Portrait,
            background_color: default_background(),
            watermark: Watermark::default(),
            header: PageHeader::default(),
            pagination: Pagination::default(),
        }
    }
}

/// Watermark painted behind page content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Watermark {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: WatermarkKind,
    pub text: String,
    #[serde(default)]
    pub src: Option<String>,
    pub color: String,
    pub opacity: f64,
    pub font_size: f64,
    /// Rotation in degrees; negative tilts counter-clockwise.
    pub angle: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatermarkKind {
    #[default]
    Text,
    Image,
}

impl Default for Watermark {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: WatermarkKind::Text,
            text: "BORRADOR".to_string(),
            src: None,
            color: "#000000".to_string(),
            opacity: 0.1,
            font_size: 96.0,
            angle: -45.0,
        }
    }
}

/// Optional repeated header line at the top of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageHeader {
    pub enabled: bool,
    pub text: String,
}

impl Default for PageHeader {
    fn default() -> Self {
        Self {
            enabled: false,
            text: "Encabezado de mi Documento".to_string(),
        }
    }
}

/// "Página i de n" footer toggle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub enabled: bool,
}

/// The closed set of widget types.
///
/// `Unknown` is never produced by this crate; it absorbs unrecognized type
/// strings from foreign producers so deserialization cannot fail on a schema
/// mismatch. Renderers treat it as a neutral placeholder and log it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetType {
    Title,
    Subtitle,
    Text,
    StyledParagraph,
    List,
    Index,
    Image,
    Table,
    QrCode,
    Rectangle,
    Circle,
    Triangle,
    Arrow,
    Checkbox,
    Unknown,
}

impl WidgetType {
    /// The wire name used in the interchange format.
    pub fn name(&self) -> &'static str {
        match self {
            WidgetType::Title => "Title",
            WidgetType::Subtitle => "Subtitle",
            WidgetType::Text => "Text",
            WidgetType::StyledParagraph => "Styled Paragraph",
            WidgetType::List => "List",
            WidgetType::Index => "Index",
            WidgetType::Image => "Image",
            WidgetType::Table => "Table",
            WidgetType::QrCode => "QR Code",
            WidgetType::Rectangle => "Rectangle",
            WidgetType::Circle => "Circle",
            WidgetType::Triangle => "Triangle",
            WidgetType::Arrow => "Arrow",
            WidgetType::Checkbox => "Checkbox",
            WidgetType::Unknown => "Unknown",
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "Title" => WidgetType::Title,
            "Subtitle" => WidgetType::Subtitle,
            "Text" => WidgetType::Text,
            "Styled Paragraph" => WidgetType::StyledParagraph,
            "List" => WidgetType::List,
            "Index" => WidgetType::Index,
            "Image" => WidgetType::Image,
            "Table" => WidgetType::Table,
            "QR Code" => WidgetType::QrCode,
            "Rectangle" => WidgetType::Rectangle,
            "Circle" => WidgetType::Circle,
            "Triangle" => WidgetType::Triangle,
            "Arrow" => WidgetType::Arrow,
            "Checkbox" => WidgetType::Checkbox,
            _ => WidgetType::Unknown,
        }
    }

    /// Whether this type's rendered height follows its text/list/table
    /// content (drives the intrinsic-size feedback loop).
    pub fn has_intrinsic_height(&self) -> bool {
        matches!(
            self,
            WidgetType::Title
                | WidgetType::Subtitle
                | WidgetType::Text
                | WidgetType::StyledParagraph
                | WidgetType::List
                | WidgetType::Index
                | WidgetType::Table
        )
    }
}

impl Serialize for WidgetType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for WidgetType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(WidgetType::from_name(&name))
    }
}

/// A positioned, typed content block on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    /// Unique within the document.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WidgetType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Type-specific content bag: `content`, `src`, `data`, `label`,
    /// `checked`, the table fields, and anything a producer attaches.
    #[serde(default)]
    pub props: PropBag,
    /// Typography and box-model bag, stored with camelCase CSS-ish keys.
    #[serde(default)]
    pub style: PropBag,
    /// Property path → data path. Keys outside the type's bindable set are
    /// tolerated and simply ignored at resolve time.
    #[serde(default)]
    pub bindings: BTreeMap<String, String>,
}

impl Widget {
    /// Create a widget of the given type with a fresh id and that type's
    /// default geometry, props, and style (the editor palette defaults).
    pub fn with_defaults(kind: WidgetType) -> Self {
        let (width, height, props, style) = type_defaults(kind);
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            x: 50.0,
            y: 50.0,
            width,
            height,
            props,
            style,
            bindings: BTreeMap::new(),
        }
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    pub fn prop_bool(&self, key: &str) -> bool {
        self.props.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn style_str(&self, key: &str) -> Option<&str> {
        self.style.get(key).and_then(Value::as_str)
    }

    pub fn style_f64(&self, key: &str) -> Option<f64> {
        self.style.get(key).and_then(Value::as_f64)
    }

    /// Font size with the editor's 16px fallback.
    pub fn font_size(&self) -> f64 {
        self.style_f64("fontSize").unwrap_or(16.0)
    }
}

fn bag(value: Value) -> PropBag {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Palette defaults per widget type: (width, height, props, style).
fn type_defaults(kind: WidgetType) -> (f64, f64, PropBag, PropBag) {
    let plain_style = |font_size: f64, color: &str| {
        json!({
            "fontSize": font_size,
            "color": color,
            "margin": 0,
            "borderWidth": 0,
            "borderStyle": "solid",
            "borderRadius": 0,
            "opacity": 1,
        })
    };
    let shape_style = |fill: &str, stroke: &str, stroke_width: f64, radius: f64| {
        json!({
            "backgroundColor": fill,
            "borderColor": stroke,
            "borderWidth": stroke_width,
            "borderStyle": "solid",
            "borderRadius": radius,
            "opacity": 1,
            "margin": 0,
        })
    };

    match kind {
        WidgetType::Title => (
            400.0,
            60.0,
            bag(json!({ "content": "Título Principal" })),
            bag(json!({
                "fontSize": 36, "fontWeight": "bold", "color": "#000000",
                "margin": 0, "borderWidth": 0, "borderStyle": "solid",
                "borderRadius": 0, "opacity": 1,
            })),
        ),
        WidgetType::Subtitle => (
            350.0,
            50.0,
            bag(json!({ "content": "Subtítulo de Sección" })),
            bag(json!({
                "fontSize": 24, "fontWeight": "bold", "color": "#000000",
                "margin": 0, "borderWidth": 0, "borderStyle": "solid",
                "borderRadius": 0, "opacity": 1,
            })),
        ),
        WidgetType::Text => (
            350.0,
            100.0,
            bag(json!({ "content": "Lorem ipsum dolor sit amet..." })),
            bag(plain_style(16.0, "#000000")),
        ),
        WidgetType::StyledParagraph => (
            400.0,
            120.0,
            bag(json!({ "content": "Este es un párrafo con más opciones de estilo." })),
            bag(plain_style(16.0, "#333333")),
        ),
        WidgetType::List => (
            350.0,
            100.0,
            bag(json!({
                "content": [
                    ["Primer elemento", []],
                    ["Segundo elemento", [
                        ["Sub-elemento 2.1", []],
                        ["Sub-elemento 2.2", []],
                    ]],
                ],
            })),
            bag(plain_style(16.0, "#000000")),
        ),
        WidgetType::Index => (
            300.0,
            50.0,
            bag(json!({ "content": "Índice" })),
            bag(json!({
                "fontSize": 20, "fontWeight": "bold", "margin": 0,
                "borderWidth": 0, "borderStyle": "solid", "borderRadius": 0,
                "opacity": 1,
            })),
        ),
        WidgetType::Image => (
            200.0,
            150.0,
            bag(json!({ "src": "", "srcType": "url" })),
            bag(json!({
                "objectFit": "cover", "margin": 0, "borderWidth": 0,
                "borderStyle": "solid", "borderRadius": 0, "opacity": 1,
            })),
        ),
        WidgetType::Table => (
            400.0,
            150.0,
            bag(json!({
                "tableMode": "static",
                "tableData": [["Cabecera 1", "Cabecera 2"], ["Dato 1", "Dato 2"]],
                "repeatHeader": true,
            })),
            bag(json!({
                "color": "#000000", "margin": 0, "borderWidth": 1,
                "borderStyle": "solid", "borderColor": "#d1d5db",
                "borderRadius": 0, "opacity": 1,
            })),
        ),
        WidgetType::QrCode => (
            100.0,
            100.0,
            bag(json!({ "data": "https://example.com" })),
            bag(json!({
                "margin": 0, "borderWidth": 0, "borderStyle": "solid",
                "borderRadius": 0, "opacity": 1,
            })),
        ),
        WidgetType::Checkbox => (
            150.0,
            24.0,
            bag(json!({ "label": "Mi Casilla", "checked": false })),
            bag(json!({
                "color": "#000000", "fontSize": 16, "margin": 0,
                "borderWidth": 0, "borderStyle": "solid", "borderRadius": 0,
                "opacity": 1,
            })),
        ),
        WidgetType::Rectangle => (
            120.0,
            80.0,
            PropBag::new(),
            bag(shape_style("#d1d5db", "#6b7280", 1.0, 0.0)),
        ),
        WidgetType::Circle => (
            80.0,
            80.0,
            PropBag::new(),
            bag(shape_style("#d1d5db", "#6b7280", 1.0, 9999.0)),
        ),
        WidgetType::Triangle => (
            90.0,
            80.0,
            PropBag::new(),
            bag(shape_style("#d1d5db", "transparent", 0.0, 0.0)),
        ),
        WidgetType::Arrow => (
            120.0,
            40.0,
            PropBag::new(),
            bag(shape_style("#d1d5db", "#6b7280", 0.0, 0.0)),
        ),
        WidgetType::Unknown => (120.0, 80.0, PropBag::new(), PropBag::new()),
    }
}

/// The binding keys allowed for a widget type. Enforced by editors and
/// validators before a binding is attached; the resolver itself tolerates
/// anything and ignores keys whose data path does not resolve.
pub fn bindable_properties(kind: WidgetType) -> &'static [&'static str] {
    const TYPOGRAPHY: &[&str] = &[
        "props.content",
        "style.color",
        "style.fontSize",
        "props.link",
        "style.backgroundColor",
        "style.borderColor",
        "style.borderWidth",
        "style.opacity",
    ];
    const APPEARANCE: &[&str] = &[
        "style.backgroundColor",
        "style.borderColor",
        "style.borderWidth",
        "style.opacity",
    ];

    match kind {
        WidgetType::Title
        | WidgetType::Subtitle
        | WidgetType::Text
        | WidgetType::StyledParagraph
        | WidgetType::Index => TYPOGRAPHY,
        WidgetType::Image => &["props.src", "style.opacity", "style.borderRadius"],
        WidgetType::Table => &["props.tableData"],
        WidgetType::List => &["props.content"],
        WidgetType::Rectangle | WidgetType::Circle | WidgetType::Triangle | WidgetType::Arrow => {
            APPEARANCE
        }
        WidgetType::Checkbox => &["props.label", "props.checked"],
        WidgetType::QrCode => &["props.data"],
        WidgetType::Unknown => &[],
    }
}
