//! Map a [`Diagram`] onto the layout grid
//!
//! Columns: 0 is the left margin, the actor of rank `i` sits on column `2i + 1` with a
//! spacer column `2i + 2` to its right, and the last column is the right margin.
//! Rows: 0 holds the title, 1 the header boxes, then one row per action, note or divider
//! and one header row per block segment; the last row holds the footer boxes.

use tracing::{debug, error};

use crate::canvas::{Color, Fill, Stroke, TextStyle};
use crate::font::{FontMetrics, TextBlock};
use crate::graphbox::{Graphic, GraphicItem, Size};
use crate::model::*;
use crate::renderer::Config;
use crate::shapes::{
    self, ActivityLine, ActorBox, BlockFrame, Lifeline, NoteBox, SegmentHeader, Title,
};

const LIFELINE_DASH: [f64; 2] = [4.0, 4.0];

/// Column of an actor
pub fn actor_col(id: ActorId) -> usize {
    2 * id.0 + 1
}

/// Last column index for `actors` actors
pub fn last_col(actors: usize) -> usize {
    2 * actors + 1
}

/// Rows taken by a run of items, counting block headers
pub fn item_rows(items: &[SequenceItem]) -> usize {
    items
        .iter()
        .map(|item| match item {
            SequenceItem::Block(block) => block
                .segments
                .iter()
                .map(|segment| 1 + item_rows(&segment.items))
                .sum(),
            _ => 1,
        })
        .sum()
}

/// Last row and column indices of the grid for `diagram`
pub fn grid_extent(diagram: &Diagram) -> (usize, usize) {
    (
        2 + item_rows(diagram.items()),
        last_col(diagram.actors().len()),
    )
}

/// Build the placed graphic for `diagram`
pub fn build_graphic(diagram: &Diagram, config: &Config, font: &dyn FontMetrics) -> Graphic {
    let (rows, cols) = grid_extent(diagram);
    let mut builder = Builder {
        graphic: Graphic::new(rows, cols, config.margin),
        config,
        font,
        cols,
        frames: Vec::new(),
    };

    builder.actors(diagram, rows);
    if let Some(title) = diagram.title() {
        builder.title(title);
    }
    builder.items(diagram.items(), 2, 0);

    let mut frames = std::mem::take(&mut builder.frames);
    let levels = frames.iter().map(|(_, frame)| frame.depth + 1).max();
    if let (Some((_, first)), Some(levels)) = (frames.first_mut(), levels) {
        first.margin_levels = levels;
    }
    for (row, frame) in frames {
        builder.put(row, 0, frame);
    }

    debug!(
        rows,
        cols,
        shapes = builder.graphic.len(),
        "laid out diagram"
    );
    builder.graphic
}

struct Builder<'a> {
    graphic: Graphic,
    config: &'a Config,
    font: &'a dyn FontMetrics,
    cols: usize,
    /// Block frames in pre-order, placed after every item
    frames: Vec<(usize, BlockFrame)>,
}

impl Builder<'_> {
    fn put(&mut self, row: usize, col: usize, item: impl GraphicItem + 'static) {
        if let Err(err) = self.graphic.put(row, col, item) {
            error!(error = %err, "dropped shape outside the grid");
        }
    }

    fn text(&self, text: &str, size: f64, color: Color, bold: bool) -> TextBlock {
        let style = TextStyle {
            font: self.font.display_name().to_string(),
            size,
            color,
            bold,
        };
        TextBlock::measure(self.font, text, style)
    }

    fn col(&self, participant: Participant) -> usize {
        match participant {
            Participant::Actor(id) => actor_col(id),
            Participant::LeftOffside => 0,
            Participant::RightOffside => self.cols,
        }
    }

    fn actors(&mut self, diagram: &Diagram, footer_row: usize) {
        let config = self.config;
        let style = &config.style;
        let stroke = Stroke::solid(style.actor_stroke, 1.5);

        for actor in diagram.actors() {
            let col = actor_col(actor.id());
            for (footer, row, visible) in [
                (false, 1, actor.in_header()),
                (true, footer_row, actor.in_footer()),
            ] {
                if !visible {
                    continue;
                }
                let label = self.text(
                    actor.label(),
                    config.font_size,
                    style.actor_text,
                    false,
                );
                let actor_box = ActorBox {
                    label,
                    icon: actor.icon().cloned(),
                    footer,
                    padding: config.actor_padding,
                    icon_gap: config.icon_gap,
                    gap: config.actor_gap,
                    stroke: stroke.clone(),
                    fill: Fill::new(style.actor_fill),
                    icon_fill: Fill::new(style.background),
                };
                self.put(row, col, actor_box);
            }
        }

        let lifeline = if style.lifeline_dashed {
            Stroke::dashed(style.lifeline, 1.0, &LIFELINE_DASH)
        } else {
            Stroke::solid(style.lifeline, 1.0)
        };
        for actor in diagram.actors() {
            let col = actor_col(actor.id());
            self.put(
                1,
                col,
                Lifeline {
                    col,
                    footer_row,
                    spacer: config.lifeline_spacer,
                    stroke: lifeline.clone(),
                },
            );
        }
    }

    fn title(&mut self, title: &str) {
        let config = self.config;
        let text = self.text(
            title,
            config.title_font_size,
            config.style.actor_text,
            true,
        );
        self.put(
            0,
            0,
            Title {
                text,
                gap: config.actor_padding,
            },
        );
    }

    /// Place `items` from `row` on and return the first row after them
    fn items(&mut self, items: &[SequenceItem], mut row: usize, depth: usize) -> usize {
        for item in items {
            row = match item {
                SequenceItem::Action(action) => {
                    self.action(row, action);
                    row + 1
                }
                SequenceItem::Note(note) => {
                    self.note(row, note);
                    row + 1
                }
                SequenceItem::Divider(divider) => {
                    self.divider(row, divider);
                    row + 1
                }
                SequenceItem::Block(block) => self.block(row, block, depth),
            };
        }
        row
    }

    fn action(&mut self, row: usize, action: &Action) {
        let config = self.config;
        let style = &config.style;
        let label = self.text(
            &action.message,
            config.font_size,
            style.message_text,
            false,
        );
        let from_col = self.col(action.from);
        let line = ActivityLine {
            from_col,
            to_col: self.col(action.to),
            arrow: action.arrow,
            label,
            label_fill: Fill::new(style.background),
            stroke: Stroke::solid(style.message, 1.0),
            padding: config.message_padding,
            label_gap: config.label_gap,
            descent: config.arrow_descent,
            loop_size: Size::new(config.self_loop_width, config.self_loop_height),
        };
        self.put(row, from_col, line);
    }

    fn note(&mut self, row: usize, note: &Note) {
        let config = self.config;
        let style = &config.style;
        let text = self.text(&note.message, config.font_size, style.note_text, false);
        let col = self.col(note.actor1);
        let other_col = note
            .actor2
            .map(|other| self.col(other))
            .filter(|&other| other != col);
        let note_box = NoteBox {
            alignment: note.alignment,
            other_col,
            text,
            padding: config.note_padding,
            offset: config.note_offset,
            fold: config.note_fold,
            descent: config.arrow_descent,
            stroke: Stroke::solid(style.note_stroke, 1.0),
            fill: Fill::new(style.note_fill),
        };
        self.put(row, col, note_box);
    }

    fn divider(&mut self, row: usize, divider: &Divider) {
        let config = self.config;
        let style = &config.style;
        let text = self.text(
            divider.message.as_deref().unwrap_or_default(),
            config.font_size,
            style.message_text,
            false,
        );
        let shape = shapes::Divider {
            kind: divider.kind,
            text,
            min_height: config.font_size,
            padding: config.divider_padding,
            stroke: Stroke::solid(style.divider_stroke, 1.0),
            fill: Fill::new(style.divider_fill),
            label_fill: Fill::new(style.background),
        };
        self.put(row, 0, shape);
    }

    /// Returns the first row after the block
    fn block(&mut self, first_row: usize, block: &Block, depth: usize) -> usize {
        let config = self.config;
        let style = &config.style;
        let stroke = Stroke::solid(style.block_stroke, 1.0);
        let tab_fill = Fill::new(style.block_label_fill);
        let label_fill = Fill::new(style.background);
        let text_color = style.block_text;

        let slot = self.frames.len();
        let mut headers = Vec::with_capacity(block.segments.len());
        let mut row = first_row;
        for segment in &block.segments {
            headers.push(SegmentHeader {
                row,
                tab: self.text(&segment.prefix, config.font_size, text_color, true),
                message: self.text(
                    &bracketed(&segment.message),
                    config.font_size,
                    text_color,
                    false,
                ),
            });
            row = self.items(&segment.items, row + 1, depth + 1);
        }

        let frame = BlockFrame {
            segments: headers,
            last_row: row - 1,
            depth,
            closing: closing_frames(block),
            margin_levels: 0,
            padding: config.block_padding,
            inset: config.block_inset,
            tab_padding: config.block_tab_padding,
            stroke,
            tab_fill,
            label_fill,
        };
        // Nested frames were pushed while walking the segments; keep outer first
        self.frames.insert(slot, (first_row, frame));
        row
    }
}

/// `[condition]`, or nothing for an empty message
fn bracketed(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!("[{}]", message)
    }
}

/// Number of frames, this one included, whose bottom edge falls on the block's last row
fn closing_frames(block: &Block) -> usize {
    let nested = block
        .segments
        .last()
        .and_then(|segment| segment.items.last())
        .map(|item| match item {
            SequenceItem::Block(inner) => closing_frames(inner),
            _ => 0,
        })
        .unwrap_or(0);
    1 + nested
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Canvas, PathOp};
    use crate::font::EstimatedFont;
    use crate::graphbox::Point;
    use crate::{parser, tree};
    use pretty_assertions::assert_eq;

    fn diagram(input: &str) -> Diagram {
        tree::build(&parser::parse(input).unwrap()).unwrap()
    }

    fn graphic(input: &str) -> Graphic {
        let mut graphic =
            build_graphic(&diagram(input), &Config::default(), &EstimatedFont::default());
        assert_eq!(graphic.rejected(), 0);
        graphic.resolve();
        graphic
    }

    #[test]
    fn test_two_actors_one_action() {
        let d = diagram("participant a\nparticipant b\na->b: hello");
        assert_eq!(grid_extent(&d), (3, 5));

        let mut g = build_graphic(&d, &Config::default(), &EstimatedFont::default());
        assert_eq!(g.rejected(), 0);
        let size = g.resolve();
        assert!(size.width > 0.0 && size.height > 0.0);

        let a = g.point(2, actor_col(ActorId(0))).x;
        let b = g.point(2, actor_col(ActorId(1))).x;
        assert!(b > a);
        assert!(g.point(0, 0).x < a);
        assert!(g.point(0, 5).x > b);
    }

    #[test]
    fn test_block_rows() {
        let d = diagram("alt: ok\na->b: yes\nelse: no\na->b: nope\nend");
        assert_eq!(item_rows(d.items()), 4);
        assert_eq!(grid_extent(&d).0, 6);
    }

    #[test]
    fn test_nested_block_rows() {
        let d = diagram("loop\nalt\na->b\nelsealt\nelse\nb->a\nend\nend\na->a");
        // loop header + (alt header + 1) + elsealt header + (else header + 1) + action
        assert_eq!(item_rows(d.items()), 7);

        let g = build_graphic(&d, &Config::default(), &EstimatedFont::default());
        assert_eq!(g.rejected(), 0);
        assert_eq!(g.rows(), 9);
    }

    #[test]
    fn test_notes_and_dividers_fit_the_grid() {
        let d = diagram(
            "note left of a: l\nnote over a, b: both\nnote right of .right: edge\n\
             spacer: s\ngap: g\nframe: f\nhorizontal\nloop\nnote over b: in\nline: l\nend",
        );
        assert_eq!(grid_extent(&d), (2 + 10, 5));
        let mut g = build_graphic(&d, &Config::default(), &EstimatedFont::default());
        assert_eq!(g.rejected(), 0);
        let size = g.resolve();
        assert!(size.width > 0.0 && size.height > 0.0);
    }

    /// Keeps frame outlines and dashed segment separators
    #[derive(Debug, Default)]
    struct FrameCanvas {
        frames: Vec<(Point, Size)>,
        separators: Vec<f64>,
    }

    impl Canvas for FrameCanvas {
        fn set_size(&mut self, _size: Size) {}

        fn line(&mut self, from: Point, to: Point, stroke: &Stroke) {
            if stroke.is_dashed() && from.y == to.y {
                self.separators.push(from.y);
            }
        }

        fn rect(&mut self, origin: Point, size: Size, stroke: Option<&Stroke>, fill: Option<&Fill>) {
            if stroke.is_some() && fill.is_none() {
                self.frames.push((origin, size));
            }
        }

        fn circle(&mut self, _: Point, _: f64, _: Option<&Stroke>, _: Option<&Fill>) {}

        fn text(&mut self, _: Point, _: &str, _: &TextStyle) {}

        fn polygon(&mut self, _: &[Point], _: Option<&Stroke>, _: Option<&Fill>) {}

        fn polyline(&mut self, _: &[Point], _: &Stroke) {}

        fn path(&mut self, _: &[PathOp], _: Option<&Stroke>, _: Option<&Fill>) {}

        fn close(&mut self) {}
    }

    #[test]
    fn test_segments_do_not_overlap() {
        let d = diagram("alt: ok\na->b: yes\nelse: no\na->b: nope\nend");
        let mut g = build_graphic(&d, &Config::default(), &EstimatedFont::default());
        assert_eq!(g.rejected(), 0);
        let mut canvas = FrameCanvas::default();
        g.draw(&mut canvas);

        assert_eq!(canvas.frames.len(), 1);
        assert_eq!(canvas.separators.len(), 1);
        let (origin, size) = canvas.frames[0];
        let (top, bottom) = (origin.y, origin.y + size.height);
        let separator = canvas.separators[0];
        assert!(top < separator && separator < bottom);

        // Header rows 2 and 4, one action row in each segment
        let action_col = actor_col(ActorId(0));
        let first = g.point(3, action_col).y;
        let second = g.point(5, action_col).y;
        assert!(top < first && first < separator);
        assert!(separator < second && second < bottom);
        assert!(g.point(4, 0).y > separator);
    }

    #[test]
    fn test_nested_frames_keep_notes_inside() {
        let d = diagram(
            "participant a\nparticipant b\nalt: o\nloop: m\nalt: i\nnote left of a: N\nnote right of b: M\nend\nend\nend",
        );
        let config = Config::default();
        let font = EstimatedFont::default();
        let mut g = build_graphic(&d, &config, &font);
        assert_eq!(g.rejected(), 0);
        let mut canvas = FrameCanvas::default();
        g.draw(&mut canvas);

        assert_eq!(canvas.frames.len(), 3);
        let (inner_origin, inner_size) = canvas.frames[2];
        let inner_left = inner_origin.x;
        let inner_right = inner_origin.x + inner_size.width;

        let note_width = |text: &str| {
            let style = TextStyle {
                font: font.display_name().to_string(),
                size: config.font_size,
                color: config.style.note_text,
                bold: false,
            };
            TextBlock::measure(&font, text, style).size().width + 2.0 * config.note_padding
        };
        let a = g.point(5, actor_col(ActorId(0))).x;
        let b = g.point(6, actor_col(ActorId(1))).x;
        assert!(a - config.note_offset - note_width("N") > inner_left);
        assert!(b + config.note_offset + note_width("M") < inner_right);

        // Frames stay concentric
        for pair in canvas.frames.windows(2) {
            let ((outer, outer_size), (inner, inner_size)) = (pair[0], pair[1]);
            assert!(inner.x > outer.x);
            assert!(inner.x + inner_size.width < outer.x + outer_size.width);
        }
    }

    #[test]
    fn test_sibling_blocks_reserve_one_inset() {
        let config = Config::default();
        let one = graphic("a->b\nalt\na->b\nend");
        let two = graphic("a->b\nalt\na->b\nend\nloop\nb->a\nend");
        let gap = |g: &Graphic| g.point(0, 1).x - g.point(0, 0).x;
        assert_eq!(gap(&one), gap(&two));
        let none = graphic("a->b");
        assert!((gap(&one) - gap(&none) - config.block_inset).abs() < 1e-9);
    }

    #[test]
    fn test_self_message_widens_spacer_column() {
        let plain = graphic("participant a\nparticipant b\na->b");
        let looped = graphic("participant a\nparticipant b\na->b\na->a: think about it");

        let spacer = |g: &Graphic| g.point(0, 2).x - g.point(0, 1).x;
        assert!(spacer(&looped) > spacer(&plain));
        // The next actor still has its own column, to the right of the loop
        assert!(looped.point(0, 3).x > looped.point(0, 2).x);
    }

    #[test]
    fn test_empty_diagram() {
        let d = diagram("participant a");
        assert_eq!(grid_extent(&d), (2, 3));
        let mut g = build_graphic(&d, &Config::default(), &EstimatedFont::default());
        let size = g.resolve();
        let config = Config::default();
        // Lifeline spacer between header and footer
        assert!(g.point(2, 1).y - g.point(1, 1).y >= config.lifeline_spacer);
        assert!(size.height > 2.0 * config.margin);
    }

    #[test]
    fn test_offside_columns() {
        let d = diagram(".left->a: in\na->.right: out");
        let mut g = build_graphic(&d, &Config::default(), &EstimatedFont::default());
        assert_eq!(g.rejected(), 0);
        g.resolve();
        assert!(g.point(2, 0).x < g.point(2, 1).x);
        assert!(g.point(3, 3).x > g.point(3, 1).x);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let input = "title: T\nparticipant a\nb->a: x\nnote over a, b: n\nloop: l\na->b\nend";
        let nodes = parser::parse(input).unwrap();
        let first = tree::build(&nodes).unwrap();
        let second = tree::build(&nodes).unwrap();
        let font = EstimatedFont::default();
        let config = Config::default();
        let mut g1 = build_graphic(&first, &config, &font);
        let mut g2 = build_graphic(&second, &config, &font);
        assert_eq!(g1.resolve(), g2.resolve());
        assert_eq!(g1.points(), g2.points());
    }

    #[test]
    fn test_closing_frames() {
        let d = diagram("alt\nloop\na->b\nend\nend");
        match &d.items()[0] {
            SequenceItem::Block(block) => assert_eq!(closing_frames(block), 2),
            other => panic!("Expected Block, got {:?}", other),
        }
        let d = diagram("alt\nloop\na->b\nend\nb->a\nend");
        match &d.items()[0] {
            SequenceItem::Block(block) => assert_eq!(closing_frames(block), 1),
            other => panic!("Expected Block, got {:?}", other),
        }
    }
}
