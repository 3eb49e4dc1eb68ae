//! seqdraw-core: sequence diagram DSL parser and constraint-based grid layout engine
//!
//! Text is parsed into AST nodes, resolved into a [`Diagram`], mapped onto a grid of
//! layout points and finally drawn onto a [`Canvas`].
//!
//! # Example
//!
//! ```
//! use seqdraw_core::{load, render};
//!
//! let input = r#"
//! title: Example
//! Alice->Bob: Hello
//! Bob-->>Alice: Hi there
//! "#;
//!
//! let diagram = load(input).unwrap();
//! let svg = render(&diagram);
//! println!("{}", svg);
//! ```
//!
//! # Styled rendering
//!
//! ```
//! use seqdraw_core::{load, render_with_config, Config, Style};
//!
//! let diagram = load("Alice->Bob: Hello").unwrap();
//! let config = Config::default().with_style(Style::modern_blue());
//! let svg = render_with_config(&diagram, config);
//! ```

pub mod ast;
pub mod canvas;
pub mod error;
pub mod font;
pub mod graphbox;
pub mod icon;
pub mod layout;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod renderer;
pub mod shapes;
pub mod style;
pub mod svg;
pub mod tree;

pub use canvas::{Canvas, Color, Fill, PathOp, Stroke, TextStyle};
pub use error::{Error, LayoutBoundsError, ParseError, ResourceError, Result, SemanticError};
pub use font::{EstimatedFont, FontMetrics};
pub use graphbox::{Graphic, Point, Size};
pub use icon::{BuiltinIcons, Icon, IconError, IconLookup};
pub use model::{Actor, ActorId, Diagram, Participant, SequenceItem};
pub use parser::{parse, parse_named};
pub use renderer::{render, render_str, render_to, render_with_config, Config};
pub use style::Style;
pub use svg::SvgCanvas;
pub use tree::{build, TreeBuilder};

/// Parse and build a diagram with the bundled icons
pub fn load(input: &str) -> Result<Diagram> {
    let nodes = parse(input)?;
    build(&nodes)
}
