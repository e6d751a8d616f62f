//! The drawing engine: sole owner of the canvas and its history.
//!
//! Every mutating operation snapshots the pre-mutation canvas onto the undo
//! stack and clears the redo stack before touching pixels. Undo and redo at
//! an empty stack are ordinary outcomes, not errors.

use std::sync::Arc;

use airsketch_common::config::{
    validate_brush_width, BrushConfig, CanvasConfig, HistoryConfig, SessionConfig,
};
use airsketch_common::error::{HistoryStack, SketchError, SketchResult};
use airsketch_sketch_model::command::{DrawingCommand, ShapeKind};
use airsketch_sketch_model::geometry::{PixelPoint, Rgb};

use crate::compositor;
use crate::history::SnapshotStack;
use crate::raster::{PixelBuffer, VideoFrame};

/// Result of an undo or redo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOutcome {
    /// A snapshot was restored.
    Applied,
    /// The stack was empty; the canvas is unchanged.
    Empty,
}

impl HistoryOutcome {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }

    /// Convert to a `Result` for callers that treat an empty stack as an error.
    pub fn into_result(self, stack: HistoryStack) -> SketchResult<()> {
        match self {
            Self::Applied => Ok(()),
            Self::Empty => Err(SketchError::EmptyHistory { stack }),
        }
    }
}

/// Canvas raster, brush state, and bounded undo/redo.
#[derive(Debug, Clone)]
pub struct DrawingEngine {
    canvas: PixelBuffer,
    background: Rgb,
    color: Rgb,
    brush_width: u32,
    opacity: f64,
    eraser_scale: u32,
    undo: SnapshotStack,
    redo: SnapshotStack,
}

impl DrawingEngine {
    /// Build an engine from validated configuration sections.
    pub fn new(canvas: &CanvasConfig, brush: &BrushConfig, history: &HistoryConfig) -> Self {
        let background = Rgb::from(canvas.background);
        Self {
            canvas: PixelBuffer::filled(canvas.width, canvas.height, background),
            background,
            color: Rgb::from(brush.color),
            brush_width: brush.width,
            opacity: brush.opacity,
            eraser_scale: brush.eraser_scale,
            undo: SnapshotStack::new(history.undo_depth),
            redo: SnapshotStack::new(history.undo_depth),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(&config.canvas, &config.brush, &config.history)
    }

    /// Ink a segment. `from == to` inks a dot of radius `width / 2`.
    pub fn draw(&mut self, from: PixelPoint, to: PixelPoint, color: Rgb, width: u32) {
        self.record();
        self.canvas.draw_segment(from, to, width, color);
    }

    /// Paint a background-colored disc.
    pub fn erase(&mut self, center: PixelPoint, radius: u32) {
        self.record();
        self.canvas.fill_disc(center, radius, self.background);
    }

    /// Ink a shape outline between two anchor points.
    pub fn shape(
        &mut self,
        kind: ShapeKind,
        from: PixelPoint,
        to: PixelPoint,
        color: Rgb,
        width: u32,
    ) {
        self.record();
        self.canvas.draw_shape(kind, from, to, width, color);
        tracing::debug!(shape = kind.as_str(), ?from, ?to, "Shape placed");
    }

    /// Reset the whole canvas to background.
    pub fn clear(&mut self) {
        self.record();
        self.canvas.fill(self.background);
        tracing::debug!(undo_depth = self.undo.len(), "Canvas cleared");
    }

    /// Apply a command with a history snapshot.
    pub fn apply(&mut self, command: &DrawingCommand) {
        match *command {
            DrawingCommand::Draw {
                from,
                to,
                color,
                width,
            } => self.draw(from, to, color, width),
            DrawingCommand::Erase { center, radius } => self.erase(center, radius),
            DrawingCommand::Shape {
                kind,
                from,
                to,
                color,
                width,
            } => self.shape(kind, from, to, color, width),
            DrawingCommand::Clear => self.clear(),
        }
    }

    /// Apply a command that continues an already-recorded stroke.
    ///
    /// No snapshot is pushed, so one undo removes the whole stroke. The redo
    /// stack is still cleared. `Shape` and `Clear` are never continuations
    /// and always record.
    pub fn apply_continuation(&mut self, command: &DrawingCommand) {
        match *command {
            DrawingCommand::Draw {
                from,
                to,
                color,
                width,
            } => {
                self.redo.clear();
                self.canvas.draw_segment(from, to, width, color);
            }
            DrawingCommand::Erase { center, radius } => {
                self.redo.clear();
                self.canvas.fill_disc(center, radius, self.background);
            }
            DrawingCommand::Shape { .. } | DrawingCommand::Clear => self.apply(command),
        }
    }

    /// Restore the most recent snapshot, moving the current canvas to redo.
    pub fn undo(&mut self) -> HistoryOutcome {
        let Some(previous) = self.undo.pop() else {
            tracing::debug!("Undo requested with empty history");
            return HistoryOutcome::Empty;
        };
        let current = std::mem::replace(&mut self.canvas, previous);
        self.redo.push(current);
        HistoryOutcome::Applied
    }

    /// Re-apply the most recently undone snapshot.
    pub fn redo(&mut self) -> HistoryOutcome {
        let Some(next) = self.redo.pop() else {
            tracing::debug!("Redo requested with empty history");
            return HistoryOutcome::Empty;
        };
        let current = std::mem::replace(&mut self.canvas, next);
        self.undo.push(current);
        HistoryOutcome::Applied
    }

    /// Overlay the canvas onto a camera frame. Never mutates the canvas.
    pub fn composite(&self, frame: &VideoFrame) -> VideoFrame {
        compositor::composite(&self.canvas, self.background, frame)
    }

    /// An immutable copy of the current canvas for export or rendering.
    pub fn snapshot(&self) -> Arc<PixelBuffer> {
        Arc::new(self.canvas.clone())
    }

    pub fn canvas(&self) -> &PixelBuffer {
        &self.canvas
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    /// Active base color, before opacity.
    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    /// Color actually written to the canvas: the base color blended toward
    /// white by the opacity.
    pub fn ink_color(&self) -> Rgb {
        self.color.with_opacity(self.opacity)
    }

    pub fn brush_width(&self) -> u32 {
        self.brush_width
    }

    /// Change the brush width. The eraser radius follows.
    pub fn set_brush_width(&mut self, width: u32) -> SketchResult<()> {
        validate_brush_width(width)?;
        self.brush_width = width;
        Ok(())
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f64) -> SketchResult<()> {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(SketchError::config(format!(
                "brush.opacity must be within [0, 1], got {opacity}"
            )));
        }
        self.opacity = opacity;
        Ok(())
    }

    pub fn eraser_radius(&self) -> u32 {
        self.brush_width.saturating_mul(self.eraser_scale)
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    fn record(&mut self) {
        self.undo.push(self.canvas.clone());
        self.redo.clear();
    }
}
