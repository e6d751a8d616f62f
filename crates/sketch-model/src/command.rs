//! Drawing commands issued against the canvas.

use serde::{Deserialize, Serialize};

use crate::geometry::{PixelPoint, Rgb};

/// Outline shapes placed with two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Line,
    /// Axis-aligned, with the two points as opposite corners.
    Rectangle,
    /// The two points span a diameter.
    Circle,
    /// A line with a head at `to`.
    Arrow,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Arrow => "arrow",
        }
    }
}

/// A single canvas mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawingCommand {
    /// Ink a segment from `from` to `to`. `from == to` draws a dot.
    Draw {
        from: PixelPoint,
        to: PixelPoint,
        color: Rgb,
        width: u32,
    },

    /// Paint a filled background-colored disc.
    Erase { center: PixelPoint, radius: u32 },

    /// Ink a shape outline between two anchor points.
    Shape {
        kind: ShapeKind,
        from: PixelPoint,
        to: PixelPoint,
        color: Rgb,
        width: u32,
    },

    /// Reset the whole canvas to background.
    Clear,
}

impl DrawingCommand {
    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Clear)
    }

    /// Draw and Erase build up strokes over several frames; shapes and
    /// clears are always single commands.
    pub fn is_stroke(&self) -> bool {
        matches!(self, Self::Draw { .. } | Self::Erase { .. })
    }
}

/// A command tagged with the hand slot that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCommand {
    pub slot: usize,
    pub command: DrawingCommand,
    /// Whether this command continues a stroke begun on an earlier frame.
    pub continues_stroke: bool,
}
