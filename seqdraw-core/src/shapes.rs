//! Graphic items placed on the grid by [`crate::layout`]
//!
//! Every shape is fully measured when it is constructed; `constraints` only reports the
//! space it needs and `draw` only reads resolved grid points.

use crate::canvas::{Fill, Stroke};
use crate::font::{TextAlign, TextBlock};
use crate::graphbox::{Constrainer, DrawContext, GraphicItem, GridPos, Point, Sides, Size};
use crate::icon::IconRef;
use crate::model::{Arrow, ArrowHead, ArrowStem, DividerKind, NoteAlignment};

const HEAD_LENGTH: f64 = 8.0;
const HEAD_HALF_WIDTH: f64 = 4.0;
const DASH: [f64; 2] = [6.0, 4.0];
const THICK_WIDTH: f64 = 2.5;

/// Text behind an opaque rectangle so that lines under it are hidden
fn draw_label(
    ctx: &mut DrawContext<'_>,
    text: &TextBlock,
    origin: Point,
    background: &Fill,
    align: TextAlign,
) {
    if text.is_empty() {
        return;
    }
    ctx.canvas.rect(origin, text.size(), None, Some(background));
    text.draw(ctx.canvas, origin, align);
}

/// Diagram title, centered over the full width
#[derive(Debug)]
pub struct Title {
    pub text: TextBlock,
    pub gap: f64,
}

impl GraphicItem for Title {
    fn constraints(&self, at: GridPos, c: &mut Constrainer<'_>) {
        let size = self.text.size();
        c.floor(at, Sides::vertical(size.height + self.gap, 0.0));
        let last = GridPos::new(at.row, c.cols());
        c.span(at, last, Size::new(size.width, 0.0));
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, point: Point) {
        let size = self.text.size();
        let right = ctx.point(0, ctx.grid().cols()).x;
        let x = (point.x + right - size.width) / 2.0;
        self.text.draw(
            ctx.canvas,
            Point::new(x, point.y - size.height - self.gap / 2.0),
            TextAlign::Center,
        );
    }
}

/// Header or footer box of an actor, with an optional icon above the label
#[derive(Debug)]
pub struct ActorBox {
    pub label: TextBlock,
    pub icon: Option<IconRef>,
    pub footer: bool,
    pub padding: f64,
    pub icon_gap: f64,
    /// Minimum free space between neighbouring boxes
    pub gap: f64,
    pub stroke: Stroke,
    pub fill: Fill,
    pub icon_fill: Fill,
}

impl ActorBox {
    pub fn size(&self) -> Size {
        let label = self.label.size();
        let (icon_w, icon_h) = match &self.icon {
            Some(icon) => {
                let size = icon.icon().size();
                (size.width, size.height + self.icon_gap)
            }
            None => (0.0, 0.0),
        };
        Size::new(
            label.width.max(icon_w) + 2.0 * self.padding,
            label.height + icon_h + 2.0 * self.padding,
        )
    }
}

impl GraphicItem for ActorBox {
    fn constraints(&self, at: GridPos, c: &mut Constrainer<'_>) {
        let size = self.size();
        let half = size.width / 2.0 + self.gap / 2.0;
        let sides = if self.footer {
            Sides::new(half, half, 0.0, size.height)
        } else {
            Sides::new(half, half, size.height, 0.0)
        };
        c.floor(at, sides);
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, point: Point) {
        let size = self.size();
        let top = if self.footer {
            point.y
        } else {
            point.y - size.height
        };
        let origin = Point::new(point.x - size.width / 2.0, top);
        ctx.canvas
            .rect(origin, size, Some(&self.stroke), Some(&self.fill));

        let mut y = top + self.padding;
        if let Some(icon) = &self.icon {
            let icon_size = icon.icon().size();
            icon.icon().draw(
                ctx.canvas,
                Point::new(point.x - icon_size.width / 2.0, y),
                &self.stroke,
                &self.icon_fill,
            );
            y += icon_size.height + self.icon_gap;
        }
        let label = self.label.size();
        self.label
            .draw(ctx.canvas, Point::new(point.x - label.width / 2.0, y), TextAlign::Center);
    }
}

/// Vertical line from the header row to the footer row
#[derive(Debug)]
pub struct Lifeline {
    pub col: usize,
    pub footer_row: usize,
    /// Minimum length when there are no items
    pub spacer: f64,
    pub stroke: Stroke,
}

impl GraphicItem for Lifeline {
    fn constraints(&self, at: GridPos, c: &mut Constrainer<'_>) {
        c.floor(
            GridPos::new(self.footer_row, at.col),
            Sides::vertical(self.spacer, 0.0),
        );
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, point: Point) {
        let end = ctx.point(self.footer_row, self.col);
        ctx.canvas.line(point, end, &self.stroke);
    }
}

/// Arrow between two columns, or a loop back to the same column
#[derive(Debug)]
pub struct ActivityLine {
    pub from_col: usize,
    pub to_col: usize,
    pub arrow: Arrow,
    pub label: TextBlock,
    pub label_fill: Fill,
    pub stroke: Stroke,
    /// Horizontal room around the label
    pub padding: f64,
    /// Distance between label and line
    pub label_gap: f64,
    pub descent: f64,
    pub loop_size: Size,
}

impl ActivityLine {
    fn stem(&self) -> Stroke {
        let mut stroke = self.stroke.clone();
        match self.arrow.stem {
            ArrowStem::Solid => {}
            ArrowStem::Dashed => stroke.dash = DASH.to_vec(),
            ArrowStem::Thick => stroke.width = THICK_WIDTH,
        }
        stroke
    }

    fn draw_head(&self, ctx: &mut DrawContext<'_>, tip: Point, direction: f64) {
        let base = tip.x - direction * HEAD_LENGTH;
        let upper = Point::new(base, tip.y - HEAD_HALF_WIDTH);
        let lower = Point::new(base, tip.y + HEAD_HALF_WIDTH);
        let mut stroke = self.stroke.clone();
        stroke.dash.clear();
        match self.arrow.head {
            ArrowHead::Solid => {
                let fill = Fill::new(self.stroke.color);
                ctx.canvas
                    .polygon(&[tip, upper, lower], Some(&stroke), Some(&fill));
            }
            ArrowHead::Open => ctx.canvas.polyline(&[upper, tip, lower], &stroke),
            ArrowHead::Barbed => ctx.canvas.polyline(&[upper, tip], &stroke),
            ArrowHead::LowerBarbed => ctx.canvas.polyline(&[lower, tip], &stroke),
        }
    }
}

impl GraphicItem for ActivityLine {
    fn constraints(&self, at: GridPos, c: &mut Constrainer<'_>) {
        let label = self.label.size();
        if self.from_col == self.to_col {
            let right = self.loop_size.width + self.label_gap + label.width + self.padding;
            c.add(at, Sides::horizontal(0.0, right));
            let top = self.loop_size.height.max(label.height) + self.label_gap;
            c.floor(at, Sides::vertical(top, self.descent));
        } else {
            let to = GridPos::new(at.row, self.to_col);
            c.span(at, to, Size::new(label.width + 2.0 * self.padding, 0.0));
            c.floor(at, Sides::vertical(label.height + self.label_gap, self.descent));
        }
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, point: Point) {
        let stem = self.stem();
        let label = self.label.size();

        if self.from_col == self.to_col {
            let Size { width, height } = self.loop_size;
            let top = point.y - height;
            ctx.canvas.polyline(
                &[
                    Point::new(point.x, top),
                    Point::new(point.x + width, top),
                    Point::new(point.x + width, point.y),
                    point,
                ],
                &stem,
            );
            self.draw_head(ctx, point, -1.0);
            let origin = Point::new(
                point.x + width + self.label_gap,
                point.y - height / 2.0 - label.height / 2.0,
            );
            draw_label(ctx, &self.label, origin, &self.label_fill, TextAlign::Left);
            return;
        }

        let end = Point::new(ctx.point(0, self.to_col).x, point.y);
        ctx.canvas.line(point, end, &stem);
        let direction = if end.x >= point.x { 1.0 } else { -1.0 };
        self.draw_head(ctx, end, direction);

        let mid = (point.x + end.x) / 2.0;
        let origin = Point::new(
            mid - label.width / 2.0,
            point.y - self.label_gap - label.height,
        );
        draw_label(ctx, &self.label, origin, &self.label_fill, TextAlign::Center);
    }
}

/// Note with a folded top-right corner; its bottom edge sits on the row
#[derive(Debug)]
pub struct NoteBox {
    pub alignment: NoteAlignment,
    /// Second column of `note over a, b`
    pub other_col: Option<usize>,
    pub text: TextBlock,
    pub padding: f64,
    /// Distance from the lifeline
    pub offset: f64,
    pub fold: f64,
    pub descent: f64,
    pub stroke: Stroke,
    pub fill: Fill,
}

impl NoteBox {
    fn size(&self) -> Size {
        let text = self.text.size();
        Size::new(
            text.width + 2.0 * self.padding,
            text.height + 2.0 * self.padding,
        )
    }

    /// Horizontal extent given the resolved x of the anchor and second column
    fn extent(&self, x: f64, other_x: Option<f64>) -> (f64, f64) {
        let width = self.size().width;
        match (self.alignment, other_x) {
            (NoteAlignment::Left, _) => (x - self.offset - width, x - self.offset),
            (NoteAlignment::Right, _) => (x + self.offset, x + self.offset + width),
            (NoteAlignment::Over, None) => (x - width / 2.0, x + width / 2.0),
            (NoteAlignment::Over, Some(other)) => {
                let (left, right) = (x.min(other), x.max(other));
                let span = right - left + 2.0 * self.offset;
                let extra = (width - span).max(0.0) / 2.0;
                (left - self.offset - extra, right + self.offset + extra)
            }
        }
    }
}

impl GraphicItem for NoteBox {
    fn constraints(&self, at: GridPos, c: &mut Constrainer<'_>) {
        let size = self.size();
        c.floor(at, Sides::vertical(size.height + self.padding, self.descent));
        match (self.alignment, self.other_col) {
            (NoteAlignment::Left, _) => {
                c.floor(at, Sides::horizontal(size.width + 2.0 * self.offset, 0.0))
            }
            (NoteAlignment::Right, _) => {
                c.floor(at, Sides::horizontal(0.0, size.width + 2.0 * self.offset))
            }
            (NoteAlignment::Over, None) => {
                let half = size.width / 2.0 + self.offset;
                c.floor(at, Sides::horizontal(half, half));
            }
            (NoteAlignment::Over, Some(other)) => {
                let (first, last) = (at.col.min(other), at.col.max(other));
                c.floor(
                    GridPos::new(at.row, first),
                    Sides::horizontal(2.0 * self.offset, 0.0),
                );
                c.floor(
                    GridPos::new(at.row, last),
                    Sides::horizontal(0.0, 2.0 * self.offset),
                );
                c.span(
                    GridPos::new(at.row, first),
                    GridPos::new(at.row, last),
                    Size::new(size.width - 2.0 * self.offset, 0.0),
                );
            }
        }
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, point: Point) {
        let other_x = self.other_col.map(|col| ctx.point(0, col).x);
        let (left, right) = self.extent(point.x, other_x);
        let bottom = point.y;
        let top = bottom - self.size().height;
        let fold = self.fold.min(right - left).min(bottom - top);

        let outline = [
            Point::new(left, top),
            Point::new(right - fold, top),
            Point::new(right, top + fold),
            Point::new(right, bottom),
            Point::new(left, bottom),
        ];
        ctx.canvas
            .polygon(&outline, Some(&self.stroke), Some(&self.fill));
        ctx.canvas.polyline(
            &[
                Point::new(right - fold, top),
                Point::new(right - fold, top + fold),
                Point::new(right, top + fold),
            ],
            &self.stroke,
        );

        let text_width = self.text.size().width;
        let x = (left + right - text_width) / 2.0;
        self.text
            .draw(ctx.canvas, Point::new(x, top + self.padding), TextAlign::Left);
    }
}

/// Full-width horizontal separator
#[derive(Debug)]
pub struct Divider {
    pub kind: DividerKind,
    pub text: TextBlock,
    /// Height used when there is no text
    pub min_height: f64,
    pub padding: f64,
    pub stroke: Stroke,
    pub fill: Fill,
    /// Opaque background behind text
    pub label_fill: Fill,
}

impl Divider {
    fn height(&self) -> f64 {
        (self.text.size().height + 2.0 * self.padding).max(self.min_height)
    }
}

impl GraphicItem for Divider {
    fn constraints(&self, at: GridPos, c: &mut Constrainer<'_>) {
        c.floor(at, Sides::vertical(self.height(), 0.0));
        let last = GridPos::new(at.row, c.cols());
        let width = self.text.size().width + 4.0 * self.padding;
        c.span(at, last, Size::new(width, 0.0));
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, point: Point) {
        let height = self.height();
        let left = point.x;
        let right = ctx.point(0, ctx.grid().cols()).x;
        let top = point.y - height;
        let mid = top + height / 2.0;

        let text = self.text.size();
        let text_origin = Point::new((left + right - text.width) / 2.0, mid - text.height / 2.0);

        match self.kind {
            DividerKind::Spacer => {
                draw_label(ctx, &self.text, text_origin, &self.label_fill, TextAlign::Center);
            }
            DividerKind::Gap => {
                ctx.canvas.rect(
                    Point::new(left, top),
                    Size::new(right - left, height),
                    None,
                    Some(&self.fill),
                );
                self.text.draw(ctx.canvas, text_origin, TextAlign::Center);
            }
            DividerKind::Frame => {
                let frame = Size::new(
                    text.width + 2.0 * self.padding,
                    text.height + 2.0 * self.padding,
                );
                let origin = Point::new(
                    text_origin.x - self.padding,
                    text_origin.y - self.padding,
                );
                ctx.canvas
                    .rect(origin, frame, Some(&self.stroke), Some(&self.fill));
                self.text.draw(ctx.canvas, text_origin, TextAlign::Center);
            }
            DividerKind::Line => {
                ctx.canvas
                    .line(Point::new(left, mid), Point::new(right, mid), &self.stroke);
                draw_label(ctx, &self.text, text_origin, &self.label_fill, TextAlign::Center);
            }
        }
    }
}

/// Header of one block segment
#[derive(Debug)]
pub struct SegmentHeader {
    pub row: usize,
    pub tab: TextBlock,
    pub message: TextBlock,
}

/// Frame around an `alt`/`loop` block, anchored at its first header row
#[derive(Debug)]
pub struct BlockFrame {
    pub segments: Vec<SegmentHeader>,
    pub last_row: usize,
    /// Nesting depth, 0 for a top-level block
    pub depth: usize,
    /// This frame plus the nested frames that end on the same row
    pub closing: usize,
    /// Insets this frame reserves on both sides of the diagram, on top of item footprints
    pub margin_levels: usize,
    pub padding: f64,
    pub inset: f64,
    pub tab_padding: f64,
    pub stroke: Stroke,
    pub tab_fill: Fill,
    pub label_fill: Fill,
}

impl BlockFrame {
    fn tab_size(&self, header: &SegmentHeader) -> Size {
        let tab = header.tab.size();
        let message = header.message.size();
        Size::new(
            tab.width + 2.0 * self.tab_padding,
            tab.height.max(message.height) + 2.0 * self.tab_padding,
        )
    }

    fn horizontal(&self, ctx: &DrawContext<'_>) -> (f64, f64) {
        let shift = self.depth as f64 * self.inset;
        let left = ctx.point(0, 0).x + shift;
        let right = ctx.point(0, ctx.grid().cols()).x - shift;
        (left, right)
    }

    /// Vertical extent `(top, bottom)` of each segment after resolution
    pub fn segment_bounds(&self, point: impl Fn(usize) -> f64) -> Vec<(f64, f64)> {
        let bottom = point(self.last_row) + self.closing as f64 * self.padding
            - self.padding / 2.0;
        let tops: Vec<f64> = self
            .segments
            .iter()
            .map(|header| point(header.row) - self.tab_size(header).height)
            .collect();
        tops.iter()
            .enumerate()
            .map(|(i, &top)| (top, tops.get(i + 1).copied().unwrap_or(bottom)))
            .collect()
    }
}

impl GraphicItem for BlockFrame {
    fn constraints(&self, at: GridPos, c: &mut Constrainer<'_>) {
        let last_col = c.cols();
        if self.margin_levels > 0 {
            let margin = self.margin_levels as f64 * self.inset;
            c.add(at, Sides::horizontal(0.0, margin));
            c.add(
                GridPos::new(at.row, last_col),
                Sides::horizontal(margin, 0.0),
            );
        }

        for header in &self.segments {
            let row = GridPos::new(header.row, 0);
            let tab = self.tab_size(header);
            c.floor(row, Sides::vertical(tab.height, 0.0));
            c.add(row, Sides::vertical(self.padding, 0.0));
            let width = 2.0 * self.depth as f64 * self.inset
                + tab.width
                + header.message.size().width
                + 4.0 * self.tab_padding;
            c.span(
                row,
                GridPos::new(header.row, last_col),
                Size::new(width, 0.0),
            );
        }

        c.add(
            GridPos::new(self.last_row, 0),
            Sides::vertical(0.0, self.padding),
        );
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, _point: Point) {
        let (left, right) = self.horizontal(ctx);
        let bounds = self.segment_bounds(|row| ctx.point(row, 0).y);
        let (Some(&(top, _)), Some(&(_, bottom))) = (bounds.first(), bounds.last()) else {
            return;
        };

        ctx.canvas.rect(
            Point::new(left, top),
            Size::new(right - left, bottom - top),
            Some(&self.stroke),
            None,
        );

        let separator = Stroke::dashed(self.stroke.color, self.stroke.width, &DASH);
        for (i, (header, &(segment_top, _))) in self.segments.iter().zip(&bounds).enumerate() {
            if i > 0 {
                ctx.canvas.line(
                    Point::new(left, segment_top),
                    Point::new(right, segment_top),
                    &separator,
                );
            }

            let tab = self.tab_size(header);
            ctx.canvas.rect(
                Point::new(left, segment_top),
                tab,
                Some(&self.stroke),
                Some(&self.tab_fill),
            );
            header.tab.draw(
                ctx.canvas,
                Point::new(left + self.tab_padding, segment_top + self.tab_padding),
                TextAlign::Left,
            );
            draw_label(
                ctx,
                &header.message,
                Point::new(
                    left + tab.width + self.tab_padding,
                    segment_top + self.tab_padding,
                ),
                &self.label_fill,
                TextAlign::Left,
            );
        }
    }
}
