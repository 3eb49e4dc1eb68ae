//! SVG output

use std::fmt::Write;

use crate::canvas::{Canvas, Color, Fill, PathOp, Stroke, TextStyle};
use crate::graphbox::{Point, Size};

/// Distance from the top of a text box to its baseline, as a fraction of the font size
const BASELINE: f64 = 0.8;

/// [`Canvas`] that writes an SVG document into a string
#[derive(Debug, Clone, Default)]
pub struct SvgCanvas {
    svg: String,
    size: Size,
    background: Option<Color>,
    closed: bool,
}

impl SvgCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint the whole canvas before any other element
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The document written so far
    pub fn as_str(&self) -> &str {
        &self.svg
    }

    pub fn into_string(self) -> String {
        self.svg
    }
}

/// Format a coordinate with at most two decimals
fn num(value: f64) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" | "" => "0".to_string(),
        _ => text.to_string(),
    }
}

fn stroke_attrs(stroke: Option<&Stroke>) -> String {
    let Some(stroke) = stroke else {
        return r#" stroke="none""#.to_string();
    };
    let mut attrs = format!(
        r#" stroke="{}" stroke-width="{}""#,
        stroke.color.to_hex(),
        num(stroke.width)
    );
    if !stroke.color.is_opaque() {
        let _ = write!(attrs, r#" stroke-opacity="{}""#, num(stroke.color.opacity()));
    }
    if stroke.is_dashed() {
        let dash: Vec<String> = stroke.dash.iter().map(|d| num(*d)).collect();
        let _ = write!(attrs, r#" stroke-dasharray="{}""#, dash.join(","));
    }
    attrs
}

fn fill_attrs(fill: Option<&Fill>) -> String {
    match fill {
        None => r#" fill="none""#.to_string(),
        Some(fill) if fill.color.is_opaque() => format!(r#" fill="{}""#, fill.color.to_hex()),
        Some(fill) => format!(
            r#" fill="{}" fill-opacity="{}""#,
            fill.color.to_hex(),
            num(fill.color.opacity())
        ),
    }
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", num(p.x), num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape XML special characters and drop characters XML 1.0 does not allow
pub fn escape_xml(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' | '\n' | '\r' => escaped.push(c),
            c if c < ' ' || c == '\u{fffe}' || c == '\u{ffff}' => {}
            c => escaped.push(c),
        }
    }
    escaped
}

impl Canvas for SvgCanvas {
    fn set_size(&mut self, size: Size) {
        self.size = size;
        let _ = writeln!(
            self.svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
            w = num(size.width),
            h = num(size.height)
        );
        if let Some(color) = self.background {
            let _ = writeln!(
                self.svg,
                r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
                num(size.width),
                num(size.height),
                color.to_hex()
            );
        }
    }

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        let _ = writeln!(
            self.svg,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y),
            stroke_attrs(Some(stroke))
        );
    }

    fn rect(&mut self, origin: Point, size: Size, stroke: Option<&Stroke>, fill: Option<&Fill>) {
        let _ = writeln!(
            self.svg,
            r#"<rect x="{}" y="{}" width="{}" height="{}"{}{}/>"#,
            num(origin.x),
            num(origin.y),
            num(size.width),
            num(size.height),
            stroke_attrs(stroke),
            fill_attrs(fill)
        );
    }

    fn circle(&mut self, center: Point, radius: f64, stroke: Option<&Stroke>, fill: Option<&Fill>) {
        let _ = writeln!(
            self.svg,
            r#"<circle cx="{}" cy="{}" r="{}"{}{}/>"#,
            num(center.x),
            num(center.y),
            num(radius),
            stroke_attrs(stroke),
            fill_attrs(fill)
        );
    }

    fn text(&mut self, origin: Point, text: &str, style: &TextStyle) {
        let weight = if style.bold {
            r#" font-weight="bold""#
        } else {
            ""
        };
        let _ = writeln!(
            self.svg,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}"{}>{}</text>"#,
            num(origin.x),
            num(origin.y + style.size * BASELINE),
            escape_xml(&style.font),
            num(style.size),
            style.color.to_hex(),
            weight,
            escape_xml(text)
        );
    }

    fn polygon(&mut self, points: &[Point], stroke: Option<&Stroke>, fill: Option<&Fill>) {
        let _ = writeln!(
            self.svg,
            r#"<polygon points="{}"{}{}/>"#,
            points_attr(points),
            stroke_attrs(stroke),
            fill_attrs(fill)
        );
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) {
        let _ = writeln!(
            self.svg,
            r#"<polyline points="{}"{}{}/>"#,
            points_attr(points),
            stroke_attrs(Some(stroke)),
            fill_attrs(None)
        );
    }

    fn path(&mut self, ops: &[PathOp], stroke: Option<&Stroke>, fill: Option<&Fill>) {
        let mut d = String::new();
        for op in ops {
            if !d.is_empty() {
                d.push(' ');
            }
            let _ = match op {
                PathOp::MoveTo(p) => write!(d, "M {} {}", num(p.x), num(p.y)),
                PathOp::LineTo(p) => write!(d, "L {} {}", num(p.x), num(p.y)),
                PathOp::QuadTo(c, p) => write!(
                    d,
                    "Q {} {} {} {}",
                    num(c.x),
                    num(c.y),
                    num(p.x),
                    num(p.y)
                ),
                PathOp::Close => write!(d, "Z"),
            };
        }
        let _ = writeln!(
            self.svg,
            r#"<path d="{}"{}{}/>"#,
            d,
            stroke_attrs(stroke),
            fill_attrs(fill)
        );
    }

    fn close(&mut self) {
        if !self.closed {
            self.svg.push_str("</svg>\n");
            self.closed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("<a & 'b'>"), "&lt;a &amp; &apos;b&apos;&gt;");
    }

    #[test]
    fn test_escape_xml_drops_control_characters() {
        assert_eq!(escape_xml("a\u{0}b\u{1b}c\u{ffff}"), "abc");
        assert_eq!(escape_xml("tab\there"), "tab\there");
        assert_eq!(escape_xml("日本"), "日本");
    }

    #[test]
    fn test_number_format() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(10.5), "10.5");
        assert_eq!(num(1.0 / 3.0), "0.33");
        assert_eq!(num(-0.001), "0");
    }

    #[test]
    fn test_document_shape() {
        let mut canvas = SvgCanvas::new().with_background(Color::WHITE);
        canvas.set_size(Size::new(100.0, 50.0));
        canvas.line(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            &Stroke::dashed(Color::BLACK, 1.0, &[4.0, 2.0]),
        );
        canvas.close();
        canvas.close();

        let svg = canvas.into_string();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 100 50\""));
        assert!(svg.contains(r##"<rect x="0" y="0" width="100" height="50" fill="#ffffff"/>"##));
        assert!(svg.contains(r#"stroke-dasharray="4,2""#));
        assert_eq!(svg.matches("</svg>").count(), 1);
    }

    #[test]
    fn test_text_is_escaped() {
        let mut canvas = SvgCanvas::new();
        canvas.set_size(Size::new(10.0, 10.0));
        let style = TextStyle {
            font: "sans-serif".to_string(),
            size: 10.0,
            color: Color::BLACK,
            bold: true,
        };
        canvas.text(Point::new(1.0, 2.0), "a < b", &style);
        let svg = canvas.as_str();
        assert!(svg.contains(r#"y="10""#));
        assert!(svg.contains(r#"font-weight="bold""#));
        assert!(svg.contains(">a &lt; b</text>"));
    }
}
