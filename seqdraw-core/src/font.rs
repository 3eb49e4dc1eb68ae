//! Text measurement

use unicode_width::UnicodeWidthChar;

use crate::canvas::{Canvas, TextStyle};
use crate::graphbox::{Point, Size};

/// Source of text extents
pub trait FontMetrics {
    /// Extent of a single line of `text` at `size` pixels
    fn measure(&self, text: &str, size: f64) -> Size;

    /// Family name written into the output
    fn display_name(&self) -> &str;
}

const WIDTH_SCALE: f64 = 1.1;
const LINE_HEIGHT_SCALE: f64 = 1.25;

/// Width estimate from per-character weights; no font files involved
#[derive(Debug, Clone)]
pub struct EstimatedFont {
    family: String,
}

impl EstimatedFont {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
        }
    }
}

impl Default for EstimatedFont {
    fn default() -> Self {
        Self::new("sans-serif")
    }
}

fn char_weight(c: char) -> f64 {
    match c.width() {
        None | Some(0) => 0.0,
        Some(2..) => 1.0,
        Some(_) if c.is_ascii() => {
            if c.is_uppercase() {
                0.7
            } else {
                0.5
            }
        }
        // Accented latin and similar single-width glyphs
        Some(_) => 0.55,
    }
}

impl FontMetrics for EstimatedFont {
    fn measure(&self, text: &str, size: f64) -> Size {
        let weighted: f64 = text.chars().map(char_weight).sum();
        Size::new(weighted * size * WIDTH_SCALE, size * LINE_HEIGHT_SCALE)
    }

    fn display_name(&self) -> &str {
        &self.family
    }
}

/// Horizontal alignment of lines inside a [`TextBlock`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Pre-measured multi-line text
#[derive(Debug, Clone)]
pub struct TextBlock {
    lines: Vec<(String, f64)>,
    line_height: f64,
    style: TextStyle,
}

impl TextBlock {
    /// Split on newlines and measure each line
    pub fn measure(font: &dyn FontMetrics, text: &str, style: TextStyle) -> Self {
        let mut line_height = style.size * LINE_HEIGHT_SCALE;
        let lines = if text.is_empty() {
            Vec::new()
        } else {
            text.split('\n')
                .map(|line| {
                    let size = font.measure(line, style.size);
                    line_height = line_height.max(size.height);
                    (line.to_string(), size.width)
                })
                .collect()
        };
        Self {
            lines,
            line_height,
            style,
        }
    }

    pub fn size(&self) -> Size {
        let width = self.lines.iter().map(|(_, w)| *w).fold(0.0, f64::max);
        Size::new(width, self.lines.len() as f64 * self.line_height)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Draw with the block's top-left corner at `origin`
    pub fn draw(&self, canvas: &mut dyn Canvas, origin: Point, align: TextAlign) {
        let block_width = self.size().width;
        for (i, (line, width)) in self.lines.iter().enumerate() {
            let x = match align {
                TextAlign::Left => origin.x,
                TextAlign::Center => origin.x + (block_width - width) / 2.0,
            };
            let y = origin.y + i as f64 * self.line_height;
            canvas.text(Point::new(x, y), line, &self.style);
        }
    }
}
