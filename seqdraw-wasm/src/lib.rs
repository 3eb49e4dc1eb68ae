//! WebAssembly bindings for seqdraw

use seqdraw_core::{Config, Style};
use wasm_bindgen::prelude::*;

/// Render a sequence diagram to SVG
///
/// Processing instructions in the source (`#!style rose`) are honoured.
///
/// # Returns
/// The rendered SVG as a string, or an error message
#[wasm_bindgen]
pub fn render(input: &str) -> Result<String, String> {
    seqdraw_core::render_str(input).map_err(|e| e.to_string())
}

/// Render a sequence diagram to SVG with a specific style
///
/// # Arguments
/// * `input` - The sequence diagram source code
/// * `style_name` - The name of the style to use (e.g., "modern-blue", "rose", "plain");
///   unknown names fall back to the default style
///
/// # Returns
/// The rendered SVG as a string, or an error message
#[wasm_bindgen]
pub fn render_with_style(input: &str, style_name: &str) -> Result<String, String> {
    let diagram = seqdraw_core::load(input).map_err(|e| e.to_string())?;
    let style = Style::by_name(style_name).unwrap_or_default();
    let config = Config::default()
        .with_instructions(diagram.instructions())
        .with_style(style);
    Ok(seqdraw_core::render_with_config(&diagram, config))
}

/// Get a list of available style names
#[wasm_bindgen]
pub fn available_styles() -> Vec<String> {
    Style::available_styles()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

/// Parse a sequence diagram and return a JSON summary
///
/// # Returns
/// `{"title":..,"actors":[..],"itemCount":n}`, or an error message
#[wasm_bindgen]
pub fn parse_to_json(input: &str) -> Result<String, String> {
    let diagram = seqdraw_core::load(input).map_err(|e| e.to_string())?;

    let mut json = String::from("{");

    if let Some(title) = diagram.title() {
        json.push_str(&format!(r#""title":"{}","#, escape_json(title)));
    }

    json.push_str(r#""actors":["#);
    for (i, actor) in diagram.actors().iter().enumerate() {
        if i > 0 {
            json.push(',');
        }
        json.push_str(&format!(
            r#"{{"name":"{}","label":"{}","rank":{}}}"#,
            escape_json(actor.name()),
            escape_json(actor.label()),
            actor.rank()
        ));
    }
    json.push_str("],");

    json.push_str(&format!(r#""itemCount":{}"#, diagram.item_count()));
    json.push('}');

    Ok(json)
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn escape_json(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
