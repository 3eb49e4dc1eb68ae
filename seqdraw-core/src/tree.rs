//! Resolve parsed nodes into a [`Diagram`]

use std::collections::HashMap;

use tracing::debug;

use crate::ast::{ActorRef, Attribute, Node, NodeKind, Segment};
use crate::error::{Error, Result, SemanticError};
use crate::icon::{BuiltinIcons, IconError, IconLookup, IconRef};
use crate::model::*;

/// Build a diagram using the bundled icon set
pub fn build(nodes: &[Node]) -> Result<Diagram> {
    TreeBuilder::new(&BuiltinIcons).build(nodes)
}

/// Walks the AST, assigning actor ranks in first-reference order
pub struct TreeBuilder<'a> {
    icons: &'a dyn IconLookup,
    require_declarations: bool,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(icons: &'a dyn IconLookup) -> Self {
        Self {
            icons,
            require_declarations: false,
        }
    }

    /// Reject references to actors without a `participant` line
    pub fn require_declarations(mut self, require: bool) -> Self {
        self.require_declarations = require;
        self
    }

    pub fn build(&self, nodes: &[Node]) -> Result<Diagram> {
        let mut state = BuildState {
            builder: self,
            diagram: Diagram::default(),
            index: HashMap::new(),
        };
        let items = state.items(nodes)?;
        state.diagram.items = items;

        debug!(
            actors = state.diagram.actors.len(),
            items = state.diagram.item_count(),
            instructions = state.diagram.instructions.len(),
            "built diagram"
        );
        Ok(state.diagram)
    }
}

struct BuildState<'b, 'a> {
    builder: &'b TreeBuilder<'a>,
    diagram: Diagram,
    /// Actor name to rank
    index: HashMap<String, usize>,
}

impl BuildState<'_, '_> {
    fn items(&mut self, nodes: &[Node]) -> Result<Vec<SequenceItem>> {
        let mut items = Vec::new();
        for node in nodes {
            if let Some(item) = self.node(node)? {
                items.push(item);
            }
        }
        Ok(items)
    }

    fn node(&mut self, node: &Node) -> Result<Option<SequenceItem>> {
        let line = node.line;
        let item = match &node.kind {
            NodeKind::Title(title) => {
                self.diagram.title = Some(title.clone());
                None
            }
            NodeKind::Actor {
                ident,
                attributes,
                description,
            } => {
                self.declare(line, ident, attributes, description.as_deref())?;
                None
            }
            NodeKind::Action {
                from,
                to,
                arrow,
                message,
            } => Some(SequenceItem::Action(Action {
                from: self.resolve(line, from)?,
                to: self.resolve(line, to)?,
                arrow: *arrow,
                message: message.clone(),
            })),
            NodeKind::Note {
                actors,
                alignment,
                message,
            } => {
                let (first, second) = match actors.as_slice() {
                    [first] => (first, None),
                    [first, second] => (first, Some(second)),
                    _ => {
                        return Err(SemanticError::NoteActors {
                            line,
                            count: actors.len(),
                        }
                        .into())
                    }
                };
                let actor1 = self.resolve(line, first)?;
                let actor2 = match second {
                    Some(second) => Some(self.resolve(line, second)?),
                    None => None,
                }
                .filter(|second| *second != actor1);
                Some(SequenceItem::Note(Note {
                    actor1,
                    actor2,
                    alignment: *alignment,
                    message: message.clone(),
                }))
            }
            NodeKind::Gap { kind, message } => Some(SequenceItem::Divider(Divider {
                message: message.clone(),
                kind: *kind,
            })),
            NodeKind::Block(segments) => Some(SequenceItem::Block(self.block(segments)?)),
            NodeKind::ProcessInstruction(instruction) => {
                self.diagram.instructions.push(instruction.clone());
                None
            }
        };
        Ok(item)
    }

    fn block(&mut self, segments: &[Segment]) -> Result<Block> {
        let mut built = Vec::with_capacity(segments.len());
        for segment in segments {
            built.push(BlockSegment {
                kind: segment.kind,
                prefix: segment.prefix.clone(),
                message: segment.message.clone(),
                items: self.items(&segment.nodes)?,
            });
        }
        Ok(Block { segments: built })
    }

    fn get_or_create(&mut self, name: &str) -> usize {
        if let Some(&rank) = self.index.get(name) {
            return rank;
        }
        let rank = self.diagram.actors.len();
        self.diagram.actors.push(Actor::new(name, rank));
        self.index.insert(name.to_string(), rank);
        rank
    }

    fn resolve(&mut self, line: usize, actor: &ActorRef) -> Result<Participant> {
        match actor {
            ActorRef::Named(name) => {
                if self.builder.require_declarations && !self.index.contains_key(name) {
                    return Err(SemanticError::UnresolvedActor {
                        line,
                        name: name.clone(),
                    }
                    .into());
                }
                Ok(Participant::Actor(ActorId(self.get_or_create(name))))
            }
            ActorRef::Pseudo(name) => match name.to_ascii_lowercase().as_str() {
                "left" => Ok(Participant::LeftOffside),
                "right" => Ok(Participant::RightOffside),
                _ => Err(SemanticError::InvalidPseudoActor {
                    line,
                    name: name.clone(),
                }
                .into()),
            },
        }
    }

    fn declare(
        &mut self,
        line: usize,
        ident: &str,
        attributes: &[Attribute],
        description: Option<&str>,
    ) -> Result<()> {
        let rank = self.get_or_create(ident);

        let mut icon = None;
        let mut in_header = None;
        let mut in_footer = None;
        for attribute in attributes {
            match attribute.name.to_ascii_lowercase().as_str() {
                "icon" => icon = Some(self.icon(line, ident, &attribute.value)?),
                "header" => in_header = Some(box_visibility(line, ident, attribute)?),
                "footer" => in_footer = Some(box_visibility(line, ident, attribute)?),
                _ => {
                    return Err(SemanticError::UnknownAttribute {
                        line,
                        actor: ident.to_string(),
                        attribute: attribute.name.clone(),
                    }
                    .into())
                }
            }
        }

        let actor = &mut self.diagram.actors[rank];
        if let Some(label) = description {
            actor.label = label.to_string();
        }
        if icon.is_some() {
            actor.icon = icon;
        }
        if let Some(visible) = in_header {
            actor.in_header = visible;
        }
        if let Some(visible) = in_footer {
            actor.in_footer = visible;
        }
        Ok(())
    }

    fn icon(&self, line: usize, actor: &str, name: &str) -> Result<IconRef> {
        match self.builder.icons.lookup(name) {
            Ok(icon) => Ok(IconRef::new(name, icon)),
            Err(IconError::NotFound(_)) => Err(SemanticError::IconNotFound {
                line,
                actor: actor.to_string(),
                icon: name.to_string(),
            }
            .into()),
            Err(IconError::Resource(err)) => Err(Error::Resource(err)),
        }
    }
}

/// `header=` / `footer=` value
fn box_visibility(line: usize, actor: &str, attribute: &Attribute) -> Result<bool> {
    match attribute.value.to_ascii_lowercase().as_str() {
        "none" => Ok(false),
        "box" => Ok(true),
        _ => Err(SemanticError::InvalidAttributeValue {
            line,
            actor: actor.to_string(),
            attribute: attribute.name.clone(),
            value: attribute.value.clone(),
        }
        .into()),
    }
}
