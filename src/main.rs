//! # Maqueta CLI
//!
//! Usage:
//!   maqueta template.json --data data.json -o out.html
//!   echo '{ ... }' | maqueta -o out.html
//!   maqueta template.json --template-export -o template.html
//!   maqueta --example > report.json

use std::env;
use std::fs;
use std::io::{self, Read};

use maqueta::model::parse_data_source;
use maqueta::{render_document, render_document_template, Template};

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    // Handle --example flag
    if args.iter().any(|a| a == "--example") {
        print!("{}", example_template_json());
        return;
    }

    // Read template input
    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1]).expect("Failed to read template file")
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).expect("Failed to read stdin");
        buf
    };

    let data_json = args
        .windows(2)
        .find(|w| w[0] == "--data")
        .map(|w| fs::read_to_string(&w[1]).expect("Failed to read data file"));

    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "output.html".to_string());

    let template: Template = match serde_json::from_str(&input) {
        Ok(t) => t,
        Err(e) => {
            let err: maqueta::MaquetaError = e.into();
            eprintln!("✗ {}", err);
            std::process::exit(1);
        }
    };

    let html = if args.iter().any(|a| a == "--template-export") {
        render_document_template(&template)
    } else {
        // Explicit --data wins over the data source stored in the template.
        let data = match &data_json {
            Some(json) => parse_data_source(json),
            None => template.parsed_data(),
        };
        render_document(&template, &data)
    };

    fs::write(&output_path, &html).expect("Failed to write HTML");
    eprintln!("✓ Written {} bytes to {}", html.len(), output_path);
}

fn example_template_json() -> &'static str {
    r##"{
  "id": "example-report",
  "name": "Informe de Ejemplo",
  "dataSource": "{\n  \"user\": { \"name\": \"Ada\" },\n  \"rows\": [\n    { \"id\": 1, \"name\": \"Alfa\" },\n    { \"id\": 2, \"name\": \"Beta\" }\n  ]\n}",
  "pages": [
    {
      "id": "page-1",
      "properties": {
        "orientation": "Portrait",
        "backgroundColor": "#ffffff",
        "watermark": {
          "enabled": true,
          "type": "Text",
          "text": "BORRADOR",
          "color": "#000000",
          "opacity": 0.1,
          "fontSize": 96,
          "angle": -45
        },
        "header": { "enabled": true, "text": "Encabezado de mi Documento" },
        "pagination": { "enabled": true }
      },
      "widgets": [
        {
          "id": "w-title",
          "type": "Title",
          "x": 50, "y": 60, "width": 500, "height": 60,
          "props": { "content": "Informe para {{user.name}}" },
          "style": { "fontSize": 36, "fontWeight": "bold", "color": "#111827" }
        },
        {
          "id": "w-intro",
          "type": "Text",
          "x": 50, "y": 140, "width": 500, "height": 80,
          "props": { "content": "Resumen generado automáticamente." },
          "style": { "fontSize": 16, "color": "#374151" },
          "bindings": { "props.content": "user.summary" }
        },
        {
          "id": "w-table",
          "type": "Table",
          "x": 50, "y": 240, "width": 520, "height": 180,
          "props": {
            "tableMode": "dynamic",
            "tableData": [],
            "columnOrder": ["name", "id"],
            "columnHeaders": { "name": "Nombre", "id": "ID" },
            "evenRowStyle": { "backgroundColor": "#f9fafb" }
          },
          "style": { "borderColor": "#d1d5db", "color": "#111827" },
          "bindings": { "props.tableData": "rows" }
        },
        {
          "id": "w-qr",
          "type": "QR Code",
          "x": 620, "y": 60, "width": 100, "height": 100,
          "props": { "data": "https://example.com" },
          "style": {}
        }
      ]
    }
  ]
}"##
}
