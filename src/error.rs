//! Structured error types for the template engine.
//!
//! Rendering itself is total; errors only arise at the edges, where JSON
//! comes in from files or callers and HTML goes back out.

use thiserror::Error;

/// The unified error type returned by the public API functions.
#[derive(Debug, Error)]
pub enum MaquetaError {
    /// JSON input failed to parse as a valid template document.
    #[error("failed to parse template: {source}{}", hint_suffix(.hint))]
    Parse {
        source: serde_json::Error,
        hint: String,
    },
    /// Reading input or writing rendered output failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  hint: {hint}")
    }
}

impl From<serde_json::Error> for MaquetaError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "check for trailing commas, missing quotes, or unescaped characters".to_string()
            }
            serde_json::error::Category::Data => {
                "the JSON is valid but doesn't match the template schema; check field names and types"
                    .to_string()
            }
            serde_json::error::Category::Eof => {
                "unexpected end of input, the JSON may be truncated".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        MaquetaError::Parse { source: e, hint }
    }
}
