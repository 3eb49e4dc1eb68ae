//! Semantic diagram model produced by [`crate::tree`]

use crate::icon::IconRef;

pub use crate::ast::{
    Arrow, ArrowHead, ArrowStem, DividerKind, NoteAlignment, ProcessInstruction, SegmentKind,
};

/// Rank of an actor, which is also its index in [`Diagram::actors`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActorId(pub usize);

/// Endpoint of an action or anchor of a note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participant {
    Actor(ActorId),
    /// Outer left margin (`.left`)
    LeftOffside,
    /// Outer right margin (`.right`)
    RightOffside,
}

/// A lifeline owner
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub(crate) name: String,
    pub(crate) label: String,
    pub(crate) rank: usize,
    pub(crate) icon: Option<IconRef>,
    pub(crate) in_header: bool,
    pub(crate) in_footer: bool,
}

impl Actor {
    pub(crate) fn new(name: &str, rank: usize) -> Self {
        Self {
            name: name.to_string(),
            label: name.to_string(),
            rank,
            icon: None,
            in_header: true,
            in_footer: true,
        }
    }

    /// Identifier used in the source
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text shown in the actor box
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn id(&self) -> ActorId {
        ActorId(self.rank)
    }

    pub fn icon(&self) -> Option<&IconRef> {
        self.icon.as_ref()
    }

    pub fn in_header(&self) -> bool {
        self.in_header
    }

    pub fn in_footer(&self) -> bool {
        self.in_footer
    }
}

/// One entry of the diagram's timeline
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceItem {
    Action(Action),
    Note(Note),
    Divider(Divider),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub from: Participant,
    pub to: Participant,
    pub arrow: Arrow,
    pub message: String,
}

impl Action {
    pub fn is_self(&self) -> bool {
        self.from == self.to
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub actor1: Participant,
    /// Second actor of `note over a, b`
    pub actor2: Option<Participant>,
    pub alignment: NoteAlignment,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Divider {
    pub message: Option<String>,
    pub kind: DividerKind,
}

/// `alt` or `loop` block
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub segments: Vec<BlockSegment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockSegment {
    pub kind: SegmentKind,
    pub prefix: String,
    pub message: String,
    pub items: Vec<SequenceItem>,
}

/// A resolved sequence diagram
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Diagram {
    pub(crate) title: Option<String>,
    pub(crate) actors: Vec<Actor>,
    pub(crate) items: Vec<SequenceItem>,
    pub(crate) instructions: Vec<ProcessInstruction>,
}

impl Diagram {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Actors in rank order
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.0)
    }

    pub fn actor_named(&self, name: &str) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.name == name)
    }

    pub fn items(&self) -> &[SequenceItem] {
        &self.items
    }

    /// `#!` lines, in source order
    pub fn instructions(&self) -> &[ProcessInstruction] {
        &self.instructions
    }

    /// Number of items including those nested in blocks
    pub fn item_count(&self) -> usize {
        fn count(items: &[SequenceItem]) -> usize {
            items
                .iter()
                .map(|item| match item {
                    SequenceItem::Block(block) => {
                        1 + block
                            .segments
                            .iter()
                            .map(|segment| count(&segment.items))
                            .sum::<usize>()
                    }
                    _ => 1,
                })
                .sum()
        }
        count(&self.items)
    }
}
