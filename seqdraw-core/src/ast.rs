//! AST definitions for the sequence diagram DSL

/// A parsed statement and the 1-based source line it starts on
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub line: usize,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(line: usize, kind: NodeKind) -> Self {
        Self { line, kind }
    }
}

/// A statement of the DSL
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `title: text`
    Title(String),
    /// `participant ident [attr=value ...] [: description]`
    Actor {
        ident: String,
        attributes: Vec<Attribute>,
        description: Option<String>,
    },
    /// `from -> to: message`
    Action {
        from: ActorRef,
        to: ActorRef,
        arrow: Arrow,
        message: String,
    },
    /// `note left of a: text`, `note over a, b: text`
    Note {
        actors: Vec<ActorRef>,
        alignment: NoteAlignment,
        message: String,
    },
    /// `spacer`, `gap: text`, `horizontal line: text`, ...
    Gap {
        kind: DividerKind,
        message: Option<String>,
    },
    /// `alt` / `elsealt` / `else` / `loop` ... `end`
    Block(Vec<Segment>),
    /// `#!name value`
    ProcessInstruction(ProcessInstruction),
}

/// `name=value` pair attached to an actor declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Reference to an actor from an action or note
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActorRef {
    /// Plain identifier
    Named(String),
    /// `.name` reference to one of the diagram margins; only `left` and `right` resolve
    Pseudo(String),
}

/// One segment of an alt/loop block
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Label shown in the segment's header tab
    pub prefix: String,
    pub message: String,
    pub nodes: Vec<Node>,
}

/// A `#!name value` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInstruction {
    pub name: String,
    pub value: String,
}

/// Arrow style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrow {
    pub stem: ArrowStem,
    pub head: ArrowHead,
}

impl Arrow {
    /// `->`
    pub const SYNC: Arrow = Arrow {
        stem: ArrowStem::Solid,
        head: ArrowHead::Solid,
    };

    /// `-->>`
    pub const RESPONSE: Arrow = Arrow {
        stem: ArrowStem::Dashed,
        head: ArrowHead::Open,
    };
}

/// Line style of an arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowStem {
    /// `-`
    Solid,
    /// `--`
    Dashed,
    /// `=`
    Thick,
}

/// Arrowhead style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowHead {
    /// `>`
    Solid,
    /// `>>`
    Open,
    /// `/>`
    Barbed,
    /// `\>`
    LowerBarbed,
}

/// Note position relative to its actor(s)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAlignment {
    Left,
    Right,
    Over,
}

/// Horizontal divider style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DividerKind {
    /// Empty vertical space
    Spacer,
    /// Band that interrupts the lifelines
    Gap,
    /// Boxed caption across the diagram
    Frame,
    /// Horizontal rule
    Line,
}

impl DividerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DividerKind::Spacer => "spacer",
            DividerKind::Gap => "gap",
            DividerKind::Frame => "frame",
            DividerKind::Line => "line",
        }
    }
}

/// Block segment kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Alt,
    /// Only ever a non-first segment
    Else,
    Loop,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Alt => "alt",
            SegmentKind::Else => "else",
            SegmentKind::Loop => "loop",
        }
    }
}
