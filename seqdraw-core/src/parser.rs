//! Parser for the sequence diagram DSL
//!
//! Source is processed one line at a time: each line is tokenized by [`crate::lexer`] and
//! parsed as a single statement. Block statements (`alt`, `elsealt`, `else`, `loop`, `end`)
//! open, split and close segments on a stack, so nesting depth is unbounded.

use tracing::debug;

use crate::ast::*;
use crate::error::ParseError;
use crate::lexer::{tokenize, Keyword, Token};

const DEFAULT_FILE: &str = "<input>";

/// Parse a complete script
pub fn parse(input: &str) -> Result<Vec<Node>, ParseError> {
    parse_named(DEFAULT_FILE, input)
}

/// Parse a complete script, reporting errors against `file`.
///
/// Processing instructions are returned first, in source order, followed by every other
/// node.
pub fn parse_named(file: &str, input: &str) -> Result<Vec<Node>, ParseError> {
    let mut instructions = Vec::new();
    let mut nodes = Vec::new();
    let mut open: Vec<OpenBlock> = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("#!") {
            let instruction = parse_instruction(rest)
                .map_err(|message| ParseError::syntax(file, line_no, message))?;
            instructions.push(Node::new(line_no, NodeKind::ProcessInstruction(instruction)));
            continue;
        }

        let tokens =
            tokenize(trimmed).map_err(|message| ParseError::syntax(file, line_no, message))?;
        if tokens.is_empty() {
            // Comment-only line
            continue;
        }

        let statement = parse_statement(&tokens)
            .map_err(|message| ParseError::syntax(file, line_no, message))?;

        match statement {
            Statement::Node(kind) => push_node(&mut nodes, &mut open, Node::new(line_no, kind)),
            Statement::Open(segment) => open.push(OpenBlock::new(line_no, segment)),
            Statement::Next { segment, last } => {
                let block = open.last_mut().ok_or_else(|| {
                    ParseError::syntax(
                        file,
                        line_no,
                        format!("`{}` outside of an `alt` block", segment.prefix),
                    )
                })?;
                block
                    .next_segment(segment, last)
                    .map_err(|message| ParseError::syntax(file, line_no, message))?;
            }
            Statement::End => {
                let block = open
                    .pop()
                    .ok_or_else(|| ParseError::syntax(file, line_no, "`end` without a block"))?;
                push_node(&mut nodes, &mut open, block.finish());
            }
        }
    }

    if let Some(block) = open.last() {
        return Err(ParseError::syntax(
            file,
            block.line,
            "unterminated block: missing `end`",
        ));
    }

    debug!(
        file,
        instructions = instructions.len(),
        nodes = nodes.len(),
        "parsed script"
    );

    instructions.extend(nodes);
    Ok(instructions)
}

/// Result of parsing one line
enum Statement {
    Node(NodeKind),
    /// `alt` / `loop`
    Open(Segment),
    /// `elsealt` / `else`; `last` is set for a plain `else`
    Next { segment: Segment, last: bool },
    End,
}

/// Block whose `end` has not been seen yet
struct OpenBlock {
    line: usize,
    segments: Vec<Segment>,
    closed_by_else: bool,
}

impl OpenBlock {
    fn new(line: usize, first: Segment) -> Self {
        Self {
            line,
            segments: vec![first],
            closed_by_else: false,
        }
    }

    fn kind(&self) -> SegmentKind {
        self.segments
            .first()
            .map(|segment| segment.kind)
            .unwrap_or(SegmentKind::Alt)
    }

    fn next_segment(&mut self, segment: Segment, last: bool) -> Result<(), String> {
        if self.kind() != SegmentKind::Alt {
            return Err(format!(
                "`{}` is only valid inside an `alt` block",
                segment.prefix
            ));
        }
        if self.closed_by_else {
            return Err(format!(
                "`{}` cannot follow the final `else` of a block",
                segment.prefix
            ));
        }
        self.closed_by_else = last;
        self.segments.push(segment);
        Ok(())
    }

    fn finish(self) -> Node {
        Node::new(self.line, NodeKind::Block(self.segments))
    }
}

fn push_node(nodes: &mut Vec<Node>, open: &mut [OpenBlock], node: Node) {
    let target = open
        .last_mut()
        .and_then(|block| block.segments.last_mut())
        .map(|segment| &mut segment.nodes);
    match target {
        Some(segment_nodes) => segment_nodes.push(node),
        None => nodes.push(node),
    }
}

/// Parse `name value` following a `#!`
fn parse_instruction(rest: &str) -> Result<ProcessInstruction, String> {
    let rest = rest.trim();
    let (name, value) = match rest.find(char::is_whitespace) {
        Some(split) => (&rest[..split], rest[split..].trim()),
        None => (rest, ""),
    };
    if name.is_empty() {
        return Err("processing instruction is missing a name".to_string());
    }
    Ok(ProcessInstruction {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// Cursor over the tokens of a single line
struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Cursor<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        self.eat(&Token::Keyword(keyword))
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), String> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{}`", keyword.as_str())))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, String> {
        match self.peek() {
            Some(Token::Ident(ident)) => {
                self.pos += 1;
                Ok(ident.clone())
            }
            _ => Err(self.unexpected(what)),
        }
    }

    fn message(&mut self) -> Option<String> {
        match self.peek() {
            Some(Token::Message(text)) => {
                self.pos += 1;
                Some(text.clone())
            }
            _ => None,
        }
    }

    fn expect_message(&mut self, what: &str) -> Result<String, String> {
        self.message()
            .ok_or_else(|| self.unexpected(&format!("`:` followed by the {}", what)))
    }

    fn expect_end(&self) -> Result<(), String> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(format!("unexpected {} after end of statement", token)),
        }
    }

    fn unexpected(&self, expected: &str) -> String {
        match self.peek() {
            Some(token) => format!("expected {}, found {}", expected, token),
            None => format!("expected {}, found end of line", expected),
        }
    }
}

fn parse_statement(tokens: &[Token]) -> Result<Statement, String> {
    let mut cursor = Cursor::new(tokens);

    let statement = match cursor.peek() {
        Some(Token::Keyword(Keyword::Title)) => {
            cursor.bump();
            Statement::Node(NodeKind::Title(cursor.expect_message("title")?))
        }
        Some(Token::Keyword(Keyword::Participant)) => {
            cursor.bump();
            Statement::Node(parse_participant(&mut cursor)?)
        }
        Some(Token::Keyword(Keyword::Note)) => {
            cursor.bump();
            Statement::Node(parse_note(&mut cursor)?)
        }
        Some(Token::Keyword(
            Keyword::Horizontal | Keyword::Spacer | Keyword::Gap | Keyword::Line | Keyword::Frame,
        )) => Statement::Node(parse_gap(&mut cursor)?),
        Some(Token::Keyword(Keyword::Alt)) => {
            cursor.bump();
            Statement::Open(segment(SegmentKind::Alt, "alt", &mut cursor))
        }
        Some(Token::Keyword(Keyword::Loop)) => {
            cursor.bump();
            Statement::Open(segment(SegmentKind::Loop, "loop", &mut cursor))
        }
        Some(Token::Keyword(Keyword::ElseAlt)) => {
            cursor.bump();
            Statement::Next {
                segment: segment(SegmentKind::Else, "else alt", &mut cursor),
                last: false,
            }
        }
        Some(Token::Keyword(Keyword::Else)) => {
            cursor.bump();
            Statement::Next {
                segment: segment(SegmentKind::Else, "else", &mut cursor),
                last: true,
            }
        }
        Some(Token::Keyword(Keyword::End)) => {
            cursor.bump();
            Statement::End
        }
        Some(Token::Ident(_) | Token::Dot) => Statement::Node(parse_action(&mut cursor)?),
        Some(other) => return Err(format!("unexpected {} at start of statement", other)),
        None => return Err("empty statement".to_string()),
    };

    cursor.expect_end()?;
    Ok(statement)
}

fn segment(kind: SegmentKind, prefix: &str, cursor: &mut Cursor<'_>) -> Segment {
    Segment {
        kind,
        prefix: prefix.to_string(),
        message: cursor.message().unwrap_or_default(),
        nodes: Vec::new(),
    }
}

/// `participant ident [name=value ...] [: description]`
fn parse_participant(cursor: &mut Cursor<'_>) -> Result<NodeKind, String> {
    let ident = cursor.expect_ident("actor name")?;

    let mut attributes = Vec::new();
    while let Some(Token::Ident(name)) = cursor.peek() {
        cursor.bump();
        if !cursor.eat(&Token::Equal) {
            return Err(cursor.unexpected(&format!("`=` after attribute `{}`", name)));
        }
        let value = cursor.expect_ident(&format!("value for attribute `{}`", name))?;
        attributes.push(Attribute {
            name: name.clone(),
            value,
        });
    }

    Ok(NodeKind::Actor {
        ident,
        attributes,
        description: cursor.message(),
    })
}

/// `ident` or `.left` / `.right`
fn parse_actor_ref(cursor: &mut Cursor<'_>) -> Result<ActorRef, String> {
    match cursor.peek() {
        Some(Token::Ident(name)) => {
            cursor.bump();
            Ok(ActorRef::Named(name.clone()))
        }
        Some(Token::Dot) => {
            cursor.bump();
            match cursor.peek() {
                Some(Token::Ident(name)) => {
                    cursor.bump();
                    Ok(ActorRef::Pseudo(name.clone()))
                }
                Some(Token::Keyword(keyword @ (Keyword::Left | Keyword::Right))) => {
                    cursor.bump();
                    Ok(ActorRef::Pseudo(keyword.as_str().to_string()))
                }
                _ => Err(cursor.unexpected("pseudo-actor name after `.`")),
            }
        }
        _ => Err(cursor.unexpected("actor name")),
    }
}

/// `from <stem><head> to [: message]`
fn parse_action(cursor: &mut Cursor<'_>) -> Result<NodeKind, String> {
    let from = parse_actor_ref(cursor)?;

    let stem = match cursor.peek() {
        Some(Token::Dash) => ArrowStem::Solid,
        Some(Token::DoubleDash) => ArrowStem::Dashed,
        Some(Token::Equal) => ArrowStem::Thick,
        _ => return Err(cursor.unexpected("arrow (`-`, `--` or `=`)")),
    };
    cursor.bump();

    let head = match cursor.peek() {
        Some(Token::Gt) => ArrowHead::Solid,
        Some(Token::DoubleGt) => ArrowHead::Open,
        Some(Token::SlashGt) => ArrowHead::Barbed,
        Some(Token::BackslashGt) => ArrowHead::LowerBarbed,
        _ => return Err(cursor.unexpected("arrowhead (`>`, `>>`, `/>` or `\\>`)")),
    };
    cursor.bump();

    let to = parse_actor_ref(cursor)?;

    Ok(NodeKind::Action {
        from,
        to,
        arrow: Arrow { stem, head },
        message: cursor.message().unwrap_or_default(),
    })
}

/// `note left of a: text`, `note right of a: text`, `note over a[, b]: text`
fn parse_note(cursor: &mut Cursor<'_>) -> Result<NodeKind, String> {
    let (alignment, actors) = if cursor.eat_keyword(Keyword::Left) {
        cursor.expect_keyword(Keyword::Of)?;
        (NoteAlignment::Left, vec![parse_actor_ref(cursor)?])
    } else if cursor.eat_keyword(Keyword::Right) {
        cursor.expect_keyword(Keyword::Of)?;
        (NoteAlignment::Right, vec![parse_actor_ref(cursor)?])
    } else if cursor.eat_keyword(Keyword::Over) {
        let mut actors = vec![parse_actor_ref(cursor)?];
        if cursor.eat(&Token::Comma) {
            actors.push(parse_actor_ref(cursor)?);
        }
        (NoteAlignment::Over, actors)
    } else {
        return Err(cursor.unexpected("`left of`, `right of` or `over`"));
    };

    Ok(NodeKind::Note {
        actors,
        alignment,
        message: cursor.expect_message("note text")?,
    })
}

/// `horizontal [kind] [: text]` or `kind [: text]`
fn parse_gap(cursor: &mut Cursor<'_>) -> Result<NodeKind, String> {
    let horizontal = cursor.eat_keyword(Keyword::Horizontal);

    let kind = match cursor.peek() {
        Some(Token::Keyword(Keyword::Spacer)) => Some(DividerKind::Spacer),
        Some(Token::Keyword(Keyword::Gap)) => Some(DividerKind::Gap),
        Some(Token::Keyword(Keyword::Line)) => Some(DividerKind::Line),
        Some(Token::Keyword(Keyword::Frame)) => Some(DividerKind::Frame),
        _ => None,
    };
    let kind = match kind {
        Some(kind) => {
            cursor.bump();
            kind
        }
        None if horizontal => DividerKind::Line,
        None => return Err(cursor.unexpected("divider kind")),
    };

    Ok(NodeKind::Gap {
        kind,
        message: cursor.message(),
    })
}
