//! Rendering configuration and entry points

use tracing::warn;

use crate::canvas::Canvas;
use crate::error::Result;
use crate::font::{EstimatedFont, FontMetrics};
use crate::graphbox::Size;
use crate::layout::build_graphic;
use crate::model::{Diagram, ProcessInstruction};
use crate::style::Style;
use crate::svg::SvgCanvas;

/// Rendering configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Space around the whole diagram
    pub margin: f64,
    pub font_size: f64,
    pub title_font_size: f64,
    /// Padding inside actor boxes
    pub actor_padding: f64,
    /// Minimum space between neighbouring actor boxes
    pub actor_gap: f64,
    /// Space between an actor icon and its label
    pub icon_gap: f64,
    /// Minimum lifeline length
    pub lifeline_spacer: f64,
    /// Horizontal room on each side of a message label
    pub message_padding: f64,
    /// Space between a message label and its arrow
    pub label_gap: f64,
    /// Space below an arrow
    pub arrow_descent: f64,
    pub self_loop_width: f64,
    pub self_loop_height: f64,
    pub note_padding: f64,
    /// Distance between a note and the lifeline it is attached to
    pub note_offset: f64,
    /// Size of the folded note corner
    pub note_fold: f64,
    pub divider_padding: f64,
    /// Vertical padding above block headers and below the last block row
    pub block_padding: f64,
    /// Horizontal inset per nesting level
    pub block_inset: f64,
    pub block_tab_padding: f64,
    /// Colours
    pub style: Style,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            margin: 10.0,
            font_size: 12.0,
            title_font_size: 16.0,
            actor_padding: 8.0,
            actor_gap: 24.0,
            icon_gap: 4.0,
            lifeline_spacer: 20.0,
            message_padding: 12.0,
            label_gap: 4.0,
            arrow_descent: 8.0,
            self_loop_width: 30.0,
            self_loop_height: 16.0,
            note_padding: 6.0,
            note_offset: 10.0,
            note_fold: 8.0,
            divider_padding: 6.0,
            block_padding: 8.0,
            block_inset: 10.0,
            block_tab_padding: 4.0,
            style: Style::default(),
        }
    }
}

impl Config {
    /// Set the style
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Apply `#!style`, `#!font-size` and `#!margin` instructions; anything else is ignored
    pub fn with_instructions(mut self, instructions: &[ProcessInstruction]) -> Self {
        for instruction in instructions {
            let value = instruction.value.as_str();
            match instruction.name.to_ascii_lowercase().as_str() {
                "style" => match Style::by_name(value) {
                    Some(style) => self.style = style,
                    None => warn!(style = value, "unknown style, keeping current"),
                },
                "font-size" => match positive(value) {
                    Some(size) => self.font_size = size,
                    None => warn!(value, "invalid font size"),
                },
                "margin" => match value.parse::<f64>() {
                    Ok(margin) if margin >= 0.0 && margin.is_finite() => self.margin = margin,
                    _ => warn!(value, "invalid margin"),
                },
                name => warn!(instruction = name, "ignoring unknown processing instruction"),
            }
        }
        self
    }
}

fn positive(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| *v > 0.0 && v.is_finite())
}

/// Render a diagram to SVG with default config
pub fn render(diagram: &Diagram) -> String {
    render_with_config(diagram, Config::default())
}

/// Render a diagram to SVG with custom config
pub fn render_with_config(diagram: &Diagram, config: Config) -> String {
    let font = EstimatedFont::new(config.style.font_family.clone());
    let mut canvas = SvgCanvas::new().with_background(config.style.background);
    render_to(diagram, &config, &font, &mut canvas);
    canvas.into_string()
}

/// Lay out `diagram` and draw it onto `canvas`, returning the canvas size
pub fn render_to(
    diagram: &Diagram,
    config: &Config,
    font: &dyn FontMetrics,
    canvas: &mut dyn Canvas,
) -> Size {
    let mut graphic = build_graphic(diagram, config, font);
    graphic.draw(canvas)
}

/// Parse, build and render `input`, honouring its processing instructions
pub fn render_str(input: &str) -> Result<String> {
    let diagram = crate::load(input)?;
    let config = Config::default().with_instructions(diagram.instructions());
    Ok(render_with_config(&diagram, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ParseError};
    use pretty_assertions::assert_eq;

    fn pi(name: &str, value: &str) -> ProcessInstruction {
        ProcessInstruction {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_simple_render() {
        let svg = render_str("Alice->Bob: Hello").unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(">Alice</text>"));
        assert!(svg.contains(">Hello</text>"));
    }

    #[test]
    fn test_render_title() {
        let svg = render_str("title: Checkout Flow\na->b").unwrap();
        assert!(svg.contains(">Checkout Flow</text>"));
        assert!(svg.contains(r#"font-weight="bold""#));
    }

    #[test]
    fn test_render_is_deterministic() {
        let diagram = crate::load("a->b: one\nnote right of b: two\nalt: x\nb->a\nend").unwrap();
        assert_eq!(render(&diagram), render(&diagram));
    }

    #[test]
    fn test_instructions() {
        let config = Config::default().with_instructions(&[
            pi("style", "rose"),
            pi("font-size", "14"),
            pi("margin", "20"),
            pi("zoom", "2"),
            pi("font-size", "huge"),
        ]);
        assert_eq!(config.style, Style::rose());
        assert_eq!(config.font_size, 14.0);
        assert_eq!(config.margin, 20.0);
    }

    #[test]
    fn test_style_from_script() {
        let svg = render_str("#!style rose\na->b").unwrap();
        assert!(svg.contains(&Style::rose().actor_fill.to_hex()));
    }

    #[test]
    fn test_errors_propagate() {
        let err = render_str("a->b: bad \\q").unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::Syntax { line: 1, .. })));
    }

    #[test]
    fn test_escapes_label_text() {
        let svg = render_str("a->b: <script>").unwrap();
        assert!(svg.contains("&lt;script&gt;"));
        assert!(!svg.contains("<script>"));

        let svg = render_str("a->b: x\u{0}y").unwrap();
        assert!(svg.contains(">xy</text>"));
        assert!(!svg.contains('\u{0}'));
    }
}
