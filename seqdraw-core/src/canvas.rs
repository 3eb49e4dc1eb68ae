//! Abstract drawing surface
//!
//! Shapes never produce output directly; they issue primitive calls against a [`Canvas`].
//! [`crate::svg::SvgCanvas`] is the bundled implementation.

use crate::graphbox::{Point, Size};

/// RGBA colour, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb`, ignoring alpha
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a value in `0.0..=1.0`
    pub fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

/// Outline style
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    /// Dash pattern; empty for a solid line
    pub dash: Vec<f64>,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: Vec::new(),
        }
    }

    pub fn dashed(color: Color, width: f64, dash: &[f64]) -> Self {
        Self {
            color,
            width,
            dash: dash.to_vec(),
        }
    }

    pub fn is_dashed(&self) -> bool {
        !self.dash.is_empty()
    }
}

/// Interior paint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub color: Color,
}

impl Fill {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

/// Font selection for a run of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font family name as reported by the font metrics
    pub font: String,
    pub size: f64,
    pub color: Color,
    pub bold: bool,
}

/// One step of a [`Canvas::path`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo(Point),
    LineTo(Point),
    /// Quadratic curve through a control point
    QuadTo(Point, Point),
    Close,
}

/// Drawing surface receiving the primitives of one render.
///
/// `set_size` is called exactly once before any drawing call and `close` exactly once
/// after the last one.
pub trait Canvas {
    fn set_size(&mut self, size: Size);

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke);

    fn rect(&mut self, origin: Point, size: Size, stroke: Option<&Stroke>, fill: Option<&Fill>);

    fn circle(&mut self, center: Point, radius: f64, stroke: Option<&Stroke>, fill: Option<&Fill>);

    /// Single line of text; `origin` is the top-left corner of its box
    fn text(&mut self, origin: Point, text: &str, style: &TextStyle);

    /// Closed polygon
    fn polygon(&mut self, points: &[Point], stroke: Option<&Stroke>, fill: Option<&Fill>);

    /// Open, multi-segment line
    fn polyline(&mut self, points: &[Point], stroke: &Stroke);

    fn path(&mut self, ops: &[PathOp], stroke: Option<&Stroke>, fill: Option<&Fill>);

    fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::rgb(255, 0, 16).to_hex(), "#ff0010");
        assert_eq!(Color::WHITE.to_hex(), "#ffffff");
    }

    #[test]
    fn test_color_opacity() {
        assert!(Color::BLACK.is_opaque());
        assert_eq!(Color::TRANSPARENT.opacity(), 0.0);
        assert_eq!(Color::rgba(0, 0, 0, 255).opacity(), 1.0);
    }

    #[test]
    fn test_stroke_dash() {
        assert!(!Stroke::solid(Color::BLACK, 1.0).is_dashed());
        assert!(Stroke::dashed(Color::BLACK, 1.0, &[4.0, 2.0]).is_dashed());
    }
}
