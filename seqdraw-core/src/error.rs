//! Error types for the parse, build and layout phases

/// Result alias used by the pipeline entry points
pub type Result<T> = std::result::Result<T, Error>;

/// Any failure that can abort the text → diagram → image pipeline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("{file}:{line}: syntax error: {message}")]
    Syntax {
        file: String,
        line: usize,
        message: String,
    },
}

impl ParseError {
    pub(crate) fn syntax(file: &str, line: usize, message: impl Into<String>) -> Self {
        ParseError::Syntax {
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }

    /// 1-based source line the error was reported at
    pub fn line(&self) -> usize {
        match self {
            ParseError::Syntax { line, .. } => *line,
        }
    }
}

/// Errors raised while resolving the AST into a [`Diagram`](crate::model::Diagram)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticError {
    #[error("line {line}: invalid pseudo-actor `.{name}` (expected `.left` or `.right`)")]
    InvalidPseudoActor { line: usize, name: String },

    #[error("line {line}: actor `{name}` is referenced but never declared")]
    UnresolvedActor { line: usize, name: String },

    #[error("line {line}: icon `{icon}` for actor `{actor}` not found")]
    IconNotFound {
        line: usize,
        actor: String,
        icon: String,
    },

    #[error("line {line}: unknown attribute `{attribute}` on actor `{actor}`")]
    UnknownAttribute {
        line: usize,
        actor: String,
        attribute: String,
    },

    #[error("line {line}: invalid value `{value}` for attribute `{attribute}` on actor `{actor}`")]
    InvalidAttributeValue {
        line: usize,
        actor: String,
        attribute: String,
        value: String,
    },

    #[error("line {line}: a note takes one or two actors, got {count}")]
    NoteActors { line: usize, count: usize },
}

/// Failure reported by an external collaborator (icon set, font source)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{resource}: {message}")]
pub struct ResourceError {
    pub resource: String,
    pub message: String,
}

impl ResourceError {
    pub fn new(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            message: message.into(),
        }
    }
}

/// An item was placed outside the grid allocated for it.
///
/// This is an internal invariant violation of the graphic builder, never a user error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("grid position ({row}, {col}) is outside the grid (last row {rows}, last column {cols})")]
pub struct LayoutBoundsError {
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
}
