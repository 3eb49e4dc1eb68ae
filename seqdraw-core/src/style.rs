//! Named colour styles

use crate::canvas::Color;

/// Colours and font family used when drawing
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub name: String,
    pub background: Color,
    /// Actor box fill
    pub actor_fill: Color,
    pub actor_stroke: Color,
    pub actor_text: Color,
    pub lifeline: Color,
    pub lifeline_dashed: bool,
    /// Action line and arrowhead
    pub message: Color,
    pub message_text: Color,
    pub note_fill: Color,
    pub note_stroke: Color,
    pub note_text: Color,
    /// Block frame and segment separators
    pub block_stroke: Color,
    /// Block header tab background
    pub block_label_fill: Color,
    pub block_text: Color,
    pub divider_stroke: Color,
    /// Gap band and frame divider background
    pub divider_fill: Color,
    pub font_family: String,
}

impl Default for Style {
    fn default() -> Self {
        Self::default_style()
    }
}

impl Style {
    /// Black on white
    pub fn default_style() -> Self {
        Self {
            name: "default".to_string(),
            background: Color::WHITE,
            actor_fill: Color::WHITE,
            actor_stroke: Color::rgb(0x33, 0x33, 0x33),
            actor_text: Color::BLACK,
            lifeline: Color::rgb(0x99, 0x99, 0x99),
            lifeline_dashed: true,
            message: Color::rgb(0x33, 0x33, 0x33),
            message_text: Color::BLACK,
            note_fill: Color::rgb(0xff, 0xff, 0xcc),
            note_stroke: Color::rgb(0x33, 0x33, 0x33),
            note_text: Color::BLACK,
            block_stroke: Color::rgb(0x66, 0x66, 0x66),
            block_label_fill: Color::WHITE,
            block_text: Color::BLACK,
            divider_stroke: Color::rgb(0x66, 0x66, 0x66),
            divider_fill: Color::rgb(0xf0, 0xf0, 0xf0),
            font_family: "sans-serif".to_string(),
        }
    }

    pub fn modern_blue() -> Self {
        Self {
            name: "modern-blue".to_string(),
            background: Color::WHITE,
            actor_fill: Color::rgb(0x4a, 0x90, 0xd9),
            actor_stroke: Color::rgb(0x2a, 0x5a, 0x8a),
            actor_text: Color::WHITE,
            lifeline: Color::rgb(0x4a, 0x90, 0xd9),
            lifeline_dashed: false,
            message: Color::rgb(0x33, 0x33, 0x33),
            message_text: Color::BLACK,
            note_fill: Color::rgb(0xe8, 0xf4, 0xfd),
            note_stroke: Color::rgb(0x4a, 0x90, 0xd9),
            note_text: Color::BLACK,
            block_stroke: Color::rgb(0x4a, 0x90, 0xd9),
            block_label_fill: Color::rgb(0xe8, 0xf4, 0xfd),
            block_text: Color::BLACK,
            divider_stroke: Color::rgb(0x4a, 0x90, 0xd9),
            divider_fill: Color::rgb(0xe8, 0xf4, 0xfd),
            font_family: "sans-serif".to_string(),
        }
    }

    pub fn rose() -> Self {
        Self {
            name: "rose".to_string(),
            background: Color::WHITE,
            actor_fill: Color::rgb(0xc2, 0x18, 0x5b),
            actor_stroke: Color::rgb(0x88, 0x0e, 0x4f),
            actor_text: Color::WHITE,
            lifeline: Color::rgb(0xc2, 0x18, 0x5b),
            lifeline_dashed: false,
            message: Color::rgb(0xc2, 0x18, 0x5b),
            message_text: Color::BLACK,
            note_fill: Color::rgb(0xfc, 0xe4, 0xec),
            note_stroke: Color::rgb(0xc2, 0x18, 0x5b),
            note_text: Color::BLACK,
            block_stroke: Color::rgb(0xc2, 0x18, 0x5b),
            block_label_fill: Color::rgb(0xfc, 0xe4, 0xec),
            block_text: Color::BLACK,
            divider_stroke: Color::rgb(0x88, 0x0e, 0x4f),
            divider_fill: Color::rgb(0xfc, 0xe4, 0xec),
            font_family: "sans-serif".to_string(),
        }
    }

    /// Orange on cream
    pub fn warm() -> Self {
        Self {
            name: "warm".to_string(),
            background: Color::rgb(0xff, 0xfb, 0xf0),
            actor_fill: Color::rgb(0xff, 0xcc, 0x80),
            actor_stroke: Color::rgb(0xef, 0x6c, 0x00),
            actor_text: Color::BLACK,
            lifeline: Color::rgb(0xef, 0x6c, 0x00),
            lifeline_dashed: true,
            message: Color::rgb(0xef, 0x6c, 0x00),
            message_text: Color::BLACK,
            note_fill: Color::rgb(0xff, 0xf3, 0xe0),
            note_stroke: Color::rgb(0xef, 0x6c, 0x00),
            note_text: Color::BLACK,
            block_stroke: Color::rgb(0xef, 0x6c, 0x00),
            block_label_fill: Color::rgb(0xff, 0xf3, 0xe0),
            block_text: Color::BLACK,
            divider_stroke: Color::rgb(0xef, 0x6c, 0x00),
            divider_fill: Color::rgb(0xff, 0xf3, 0xe0),
            font_family: "sans-serif".to_string(),
        }
    }

    pub fn gray() -> Self {
        Self {
            name: "gray".to_string(),
            background: Color::rgb(0xfa, 0xfa, 0xfa),
            actor_fill: Color::rgb(0x75, 0x75, 0x75),
            actor_stroke: Color::rgb(0x42, 0x42, 0x42),
            actor_text: Color::WHITE,
            lifeline: Color::rgb(0x75, 0x75, 0x75),
            lifeline_dashed: false,
            message: Color::rgb(0x42, 0x42, 0x42),
            message_text: Color::rgb(0x21, 0x21, 0x21),
            note_fill: Color::rgb(0xee, 0xee, 0xee),
            note_stroke: Color::rgb(0x75, 0x75, 0x75),
            note_text: Color::rgb(0x21, 0x21, 0x21),
            block_stroke: Color::rgb(0x75, 0x75, 0x75),
            block_label_fill: Color::rgb(0xee, 0xee, 0xee),
            block_text: Color::rgb(0x21, 0x21, 0x21),
            divider_stroke: Color::rgb(0x42, 0x42, 0x42),
            divider_fill: Color::rgb(0xee, 0xee, 0xee),
            font_family: "sans-serif".to_string(),
        }
    }

    /// Monochrome with a serif face
    pub fn plain() -> Self {
        Self {
            name: "plain".to_string(),
            background: Color::WHITE,
            actor_fill: Color::WHITE,
            actor_stroke: Color::BLACK,
            actor_text: Color::BLACK,
            lifeline: Color::BLACK,
            lifeline_dashed: false,
            message: Color::BLACK,
            message_text: Color::BLACK,
            note_fill: Color::WHITE,
            note_stroke: Color::BLACK,
            note_text: Color::BLACK,
            block_stroke: Color::BLACK,
            block_label_fill: Color::WHITE,
            block_text: Color::BLACK,
            divider_stroke: Color::BLACK,
            divider_fill: Color::WHITE,
            font_family: "serif".to_string(),
        }
    }

    /// Look up a style by name or alias
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default_style()),
            "modern-blue" | "modernblue" | "blue" => Some(Self::modern_blue()),
            "rose" | "pink" => Some(Self::rose()),
            "warm" | "orange" => Some(Self::warm()),
            "gray" | "grey" => Some(Self::gray()),
            "plain" | "monochrome" => Some(Self::plain()),
            _ => None,
        }
    }

    pub fn available_styles() -> Vec<&'static str> {
        vec!["default", "modern-blue", "rose", "warm", "gray", "plain"]
    }
}
