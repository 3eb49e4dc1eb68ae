//! Actor icons

use std::fmt;
use std::sync::Arc;

use crate::canvas::{Canvas, Fill, PathOp, Stroke};
use crate::error::ResourceError;
use crate::graphbox::{Point, Size};

/// A drawable glyph shown above an actor's label
pub trait Icon: fmt::Debug + Send + Sync {
    fn size(&self) -> Size;

    /// Draw with the icon's top-left corner at `origin`
    fn draw(&self, canvas: &mut dyn Canvas, origin: Point, stroke: &Stroke, fill: &Fill);
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IconError {
    #[error("icon `{0}` not found")]
    NotFound(String),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Resolves icon names used by `participant x icon=<name>`
pub trait IconLookup {
    fn lookup(&self, name: &str) -> Result<Arc<dyn Icon>, IconError>;
}

/// Icons shipped with the crate
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinIcons;

impl BuiltinIcons {
    pub const NAMES: [&'static str; 4] = ["human", "actor", "cylinder", "database"];
}

impl IconLookup for BuiltinIcons {
    fn lookup(&self, name: &str) -> Result<Arc<dyn Icon>, IconError> {
        match name.to_ascii_lowercase().as_str() {
            "human" | "actor" => Ok(Arc::new(StickFigure)),
            "cylinder" | "database" => Ok(Arc::new(Cylinder)),
            _ => Err(IconError::NotFound(name.to_string())),
        }
    }
}

/// A resolved icon together with the name it was requested by
#[derive(Clone)]
pub struct IconRef {
    name: String,
    icon: Arc<dyn Icon>,
}

impl IconRef {
    pub fn new(name: impl Into<String>, icon: Arc<dyn Icon>) -> Self {
        Self {
            name: name.into(),
            icon,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon(&self) -> &dyn Icon {
        self.icon.as_ref()
    }
}

impl fmt::Debug for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IconRef").field(&self.name).finish()
    }
}

impl PartialEq for IconRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Head, body, arms and legs
#[derive(Debug)]
struct StickFigure;

impl StickFigure {
    const HEAD_R: f64 = 6.0;
    const BODY_LEN: f64 = 12.0;
    const ARM_SPAN: f64 = 20.0;
    const LEG_LEN: f64 = 10.0;
}

impl Icon for StickFigure {
    fn size(&self) -> Size {
        Size::new(
            Self::ARM_SPAN,
            Self::HEAD_R * 2.0 + Self::BODY_LEN + Self::LEG_LEN,
        )
    }

    fn draw(&self, canvas: &mut dyn Canvas, origin: Point, stroke: &Stroke, fill: &Fill) {
        let cx = origin.x + Self::ARM_SPAN / 2.0;
        let neck = origin.y + Self::HEAD_R * 2.0;
        let hip = neck + Self::BODY_LEN;
        let arm_y = neck + Self::BODY_LEN / 3.0;
        let half = Self::ARM_SPAN / 2.0;

        canvas.circle(
            Point::new(cx, origin.y + Self::HEAD_R),
            Self::HEAD_R,
            Some(stroke),
            Some(fill),
        );
        canvas.line(Point::new(cx, neck), Point::new(cx, hip), stroke);
        canvas.line(Point::new(cx - half, arm_y), Point::new(cx + half, arm_y), stroke);
        canvas.polyline(
            &[
                Point::new(cx - half * 0.8, hip + Self::LEG_LEN),
                Point::new(cx, hip),
                Point::new(cx + half * 0.8, hip + Self::LEG_LEN),
            ],
            stroke,
        );
    }
}

/// Database drum
#[derive(Debug)]
struct Cylinder;

impl Cylinder {
    const WIDTH: f64 = 24.0;
    const HEIGHT: f64 = 28.0;
    const CAP: f64 = 4.0;
}

impl Icon for Cylinder {
    fn size(&self) -> Size {
        Size::new(Self::WIDTH, Self::HEIGHT)
    }

    fn draw(&self, canvas: &mut dyn Canvas, origin: Point, stroke: &Stroke, fill: &Fill) {
        let left = origin.x;
        let right = origin.x + Self::WIDTH;
        let mid = origin.x + Self::WIDTH / 2.0;
        let top = origin.y + Self::CAP;
        let bottom = origin.y + Self::HEIGHT - Self::CAP;

        let body = [
            PathOp::MoveTo(Point::new(left, top)),
            PathOp::LineTo(Point::new(left, bottom)),
            PathOp::QuadTo(
                Point::new(mid, bottom + Self::CAP * 2.0),
                Point::new(right, bottom),
            ),
            PathOp::LineTo(Point::new(right, top)),
            PathOp::QuadTo(Point::new(mid, top + Self::CAP * 2.0), Point::new(left, top)),
            PathOp::Close,
        ];
        canvas.path(&body, Some(stroke), Some(fill));

        let lid = [
            PathOp::MoveTo(Point::new(left, top)),
            PathOp::QuadTo(Point::new(mid, top - Self::CAP * 2.0), Point::new(right, top)),
            PathOp::QuadTo(Point::new(mid, top + Self::CAP * 2.0), Point::new(left, top)),
            PathOp::Close,
        ];
        canvas.path(&lid, Some(stroke), Some(fill));
    }
}
