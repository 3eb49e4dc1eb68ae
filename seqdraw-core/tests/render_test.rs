use std::sync::Arc;

use pretty_assertions::assert_eq;
use seqdraw_core::canvas::{Canvas, Fill, PathOp, Stroke, TextStyle};
use seqdraw_core::icon::{Icon, IconError, IconLookup};
use seqdraw_core::{
    build, load, parse, render_to, Config, EstimatedFont, FontMetrics, Point, Size, TreeBuilder,
};

/// Drawing call as seen by the canvas
#[derive(Debug, Clone, PartialEq)]
enum Op {
    SetSize(Size),
    Line {
        from: Point,
        to: Point,
        dashed: bool,
    },
    Rect {
        origin: Point,
        size: Size,
        stroked: bool,
        filled: bool,
    },
    Circle(Point),
    Text(Point, String),
    Polygon(Vec<Point>),
    Polyline(Vec<Point>),
    Path(usize),
    Close,
}

#[derive(Debug, Default)]
struct RecordingCanvas {
    ops: Vec<Op>,
}

impl RecordingCanvas {
    fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(_, text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn position(&self, text: &str) -> usize {
        self.ops
            .iter()
            .position(|op| matches!(op, Op::Text(_, t) if t == text))
            .unwrap_or_else(|| panic!("no text {:?} in {:#?}", text, self.ops))
    }

    fn lines(&self) -> Vec<(Point, Point, bool)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Line { from, to, dashed } => Some((*from, *to, *dashed)),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn set_size(&mut self, size: Size) {
        self.ops.push(Op::SetSize(size));
    }

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.ops.push(Op::Line {
            from,
            to,
            dashed: stroke.is_dashed(),
        });
    }

    fn rect(&mut self, origin: Point, size: Size, stroke: Option<&Stroke>, fill: Option<&Fill>) {
        self.ops.push(Op::Rect {
            origin,
            size,
            stroked: stroke.is_some(),
            filled: fill.is_some(),
        });
    }

    fn circle(&mut self, center: Point, _radius: f64, _stroke: Option<&Stroke>, _fill: Option<&Fill>) {
        self.ops.push(Op::Circle(center));
    }

    fn text(&mut self, origin: Point, text: &str, _style: &TextStyle) {
        self.ops.push(Op::Text(origin, text.to_string()));
    }

    fn polygon(&mut self, points: &[Point], _stroke: Option<&Stroke>, _fill: Option<&Fill>) {
        self.ops.push(Op::Polygon(points.to_vec()));
    }

    fn polyline(&mut self, points: &[Point], _stroke: &Stroke) {
        self.ops.push(Op::Polyline(points.to_vec()));
    }

    fn path(&mut self, ops: &[PathOp], _stroke: Option<&Stroke>, _fill: Option<&Fill>) {
        self.ops.push(Op::Path(ops.len()));
    }

    fn close(&mut self) {
        self.ops.push(Op::Close);
    }
}

fn record(input: &str) -> RecordingCanvas {
    let diagram = load(input).unwrap();
    let mut canvas = RecordingCanvas::default();
    render_to(
        &diagram,
        &Config::default(),
        &EstimatedFont::default(),
        &mut canvas,
    );
    canvas
}

#[test]
fn test_set_size_first_and_close_last() {
    let canvas = record("a->b: hi\nnote over a, b: both\nalt\nb->a\nend");
    let sizes = canvas
        .ops
        .iter()
        .filter(|op| matches!(op, Op::SetSize(_)))
        .count();
    assert_eq!(sizes, 1);
    assert!(matches!(canvas.ops.first(), Some(Op::SetSize(_))));
    assert_eq!(canvas.ops.last(), Some(&Op::Close));
    assert_eq!(canvas.ops.iter().filter(|op| **op == Op::Close).count(), 1);
}

#[test]
fn test_placement_order_is_draw_order() {
    let canvas = record("title: T\nparticipant a\nparticipant b\na->b: hello");
    assert_eq!(canvas.texts(), vec!["a", "a", "b", "b", "T", "hello"]);

    // Both lifelines are drawn before the title and the action
    let lines = canvas.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].2 && lines[1].2);
    assert!(!lines[2].2);
}

fn assert_label_background(canvas: &RecordingCanvas, text: &str) {
    let index = canvas.position(text);
    let text_origin = match &canvas.ops[index] {
        Op::Text(origin, _) => *origin,
        other => panic!("Expected Text, got {:?}", other),
    };
    match &canvas.ops[index - 1] {
        Op::Rect {
            origin,
            stroked,
            filled,
            ..
        } => {
            assert_eq!(*origin, text_origin);
            assert!(!stroked);
            assert!(filled);
        }
        other => panic!("Expected background Rect, got {:?}", other),
    }
}

#[test]
fn test_label_background_precedes_text() {
    assert_label_background(&record("a->b: hello"), "hello");

    let canvas = record("participant a\nparticipant b\nspacer: crossing the lifelines");
    assert_label_background(&canvas, "crossing the lifelines");
    let last_lifeline = canvas
        .ops
        .iter()
        .rposition(|op| matches!(op, Op::Line { .. }))
        .unwrap();
    assert!(canvas.position("crossing the lifelines") > last_lifeline);
    assert_label_background(&record("a->b\nline: split"), "split");
}

#[test]
fn test_nested_notes_stay_inside_frames() {
    let canvas = record(
        "participant a\nparticipant b\nalt: o\nloop: m\nalt: i\nnote left of a: N\nend\nend\nend",
    );
    let frames: Vec<(Point, Size)> = canvas
        .ops
        .iter()
        .filter_map(|op| match op {
            Op::Rect {
                origin,
                size,
                stroked: true,
                filled: false,
            } => Some((*origin, *size)),
            _ => None,
        })
        .collect();
    assert_eq!(frames.len(), 3);

    let note = canvas
        .ops
        .iter()
        .find_map(|op| match op {
            Op::Polygon(points) => Some(points.clone()),
            _ => None,
        })
        .unwrap();
    let note_left = note.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let note_right = note.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    for (origin, size) in frames {
        assert!(note_left > origin.x, "note at {} crosses frame at {}", note_left, origin.x);
        assert!(note_right < origin.x + size.width);
    }
}

#[test]
fn test_empty_diagram_draws_boxes_and_lifeline() {
    let canvas = record("participant a: Alone");
    let kinds: Vec<&str> = canvas
        .ops
        .iter()
        .map(|op| match op {
            Op::SetSize(_) => "size",
            Op::Rect { .. } => "rect",
            Op::Text(..) => "text",
            Op::Line { .. } => "line",
            Op::Close => "close",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["size", "rect", "text", "rect", "text", "line", "close"]
    );

    match &canvas.ops[0] {
        Op::SetSize(size) => assert!(size.width > 0.0 && size.height > 0.0),
        other => panic!("Expected SetSize, got {:?}", other),
    }
    let (from, to, _) = canvas.lines()[0];
    assert!(to.y - from.y >= Config::default().lifeline_spacer);
}

#[test]
fn test_hidden_boxes() {
    let canvas = record("participant a header=none footer=none\na->a");
    assert!(!canvas
        .ops
        .iter()
        .any(|op| matches!(op, Op::Rect { stroked: true, .. })));
}

#[test]
fn test_note_left_sits_left_of_lifeline() {
    let canvas = record("note left of a: hi");
    let (lifeline, _, _) = canvas.lines()[0];
    let outline = canvas
        .ops
        .iter()
        .find_map(|op| match op {
            Op::Polygon(points) => Some(points.clone()),
            _ => None,
        })
        .unwrap();
    assert!(outline.iter().all(|p| p.x < lifeline.x));
}

#[test]
fn test_arrow_points_at_target() {
    let canvas = record("participant a\nparticipant b\nb->a");
    let lifelines = canvas.lines();
    let a_x = lifelines[0].0.x;
    let head = canvas
        .ops
        .iter()
        .find_map(|op| match op {
            Op::Polygon(points) => Some(points.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(head[0].x, a_x);
    assert!(head[1].x > a_x);
}

#[test]
fn test_else_segment_draws_dashed_separator() {
    let canvas = record("alt: yes\na->b\nelse: no\nb->a\nend");
    let dashed_horizontal = canvas
        .lines()
        .into_iter()
        .filter(|(from, to, dashed)| *dashed && from.y == to.y)
        .count();
    assert_eq!(dashed_horizontal, 1);
    assert!(canvas.position("alt") < canvas.position("else"));
    assert!(canvas.position("[yes]") < canvas.position("[no]"));
}

#[test]
fn test_nested_frames_are_concentric() {
    let canvas = record("alt: outer\nloop: inner\na->b\nend\nend");
    let frames: Vec<(Point, Size)> = canvas
        .ops
        .iter()
        .filter_map(|op| match op {
            Op::Rect {
                origin,
                size,
                stroked: true,
                filled: false,
            } => Some((*origin, *size)),
            _ => None,
        })
        .collect();
    assert_eq!(frames.len(), 2);
    let (outer, inner) = (frames[0], frames[1]);
    assert!(inner.0.x > outer.0.x);
    assert!(inner.0.y > outer.0.y);
    assert!(inner.0.x + inner.1.width < outer.0.x + outer.1.width);
    assert!(inner.0.y + inner.1.height < outer.0.y + outer.1.height);
}

#[test]
fn test_rendering_twice_is_identical() {
    let input = "title: Login\nuser->web: POST /login\nweb->db: query\ndb-->>web: row\nnote right of db: indexed\nweb->web: hash\nweb-->>user: 200";
    assert_eq!(record(input).ops, record(input).ops);
}

/// Every glyph is 10px wide and lines are 10px tall
#[derive(Debug)]
struct MonoFont;

impl FontMetrics for MonoFont {
    fn measure(&self, text: &str, _size: f64) -> Size {
        Size::new(10.0 * text.chars().count() as f64, 10.0)
    }

    fn display_name(&self) -> &str {
        "monospace"
    }
}

#[test]
fn test_custom_font_metrics_drive_layout() {
    let diagram = load("a->b: 0123456789012345678901234567890123456789").unwrap();
    let mut canvas = RecordingCanvas::default();
    render_to(&diagram, &Config::default(), &MonoFont, &mut canvas);

    let lines = canvas.lines();
    let distance = lines[1].0.x - lines[0].0.x;
    let config = Config::default();
    assert!(distance >= 400.0 + 2.0 * config.message_padding);
}

#[derive(Debug)]
struct Star;

impl Icon for Star {
    fn size(&self) -> Size {
        Size::new(16.0, 16.0)
    }

    fn draw(&self, canvas: &mut dyn Canvas, origin: Point, _stroke: &Stroke, _fill: &Fill) {
        canvas.circle(origin.offset(8.0, 8.0), 8.0, None, None);
    }
}

struct StarIcons;

impl IconLookup for StarIcons {
    fn lookup(&self, name: &str) -> Result<Arc<dyn Icon>, IconError> {
        match name {
            "star" => Ok(Arc::new(Star)),
            _ => Err(IconError::NotFound(name.to_string())),
        }
    }
}

#[test]
fn test_custom_icons_are_drawn_in_both_boxes() {
    let nodes = parse("participant s icon=star").unwrap();
    let diagram = TreeBuilder::new(&StarIcons).build(&nodes).unwrap();
    assert!(build(&nodes).is_err());

    let mut canvas = RecordingCanvas::default();
    render_to(
        &diagram,
        &Config::default(),
        &EstimatedFont::default(),
        &mut canvas,
    );
    let circles = canvas
        .ops
        .iter()
        .filter(|op| matches!(op, Op::Circle(_)))
        .count();
    assert_eq!(circles, 2);
}

#[test]
fn test_svg_output() {
    let svg = seqdraw_core::render_str("title: Demo\nAlice->Bob: Hello\nBob-->>Alice: Hi").unwrap();
    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(svg.contains(">Demo</text>"));
    assert!(svg.contains("stroke-dasharray"));
    assert_eq!(svg.matches("</svg>").count(), 1);
}
