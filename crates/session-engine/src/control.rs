//! Control surface for changes requested outside the gesture pipeline.
//!
//! Controls are queued to the producer and applied between frames, so the
//! canvas is only ever mutated from one place.

use serde::{Deserialize, Serialize};

use airsketch_render_engine::{DrawingEngine, HistoryOutcome};
use airsketch_sketch_model::command::ShapeKind;
use airsketch_sketch_model::geometry::Rgb;

use crate::coordinator::DualHandCoordinator;

/// A request from the GUI or another external caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "control", content = "value", rename_all = "snake_case")]
pub enum Control {
    Undo,
    Redo,
    ClearCanvas,
    SetColor(Rgb),
    /// Brush width in pixels; values outside `1..=20` are ignored.
    SetBrushWidth(u32),
    /// Ink opacity; values outside `[0, 1]` are ignored.
    SetOpacity(f64),
    /// Arm a shape for the first hand to place with two Navigate gestures;
    /// `None` disarms.
    SetShape(Option<ShapeKind>),
    /// Turn fingertip smoothing on or off.
    SetSmoothing(bool),
    /// Forget all per-hand state, as if every hand was lost.
    ResetTracking,
}

/// Apply one control. Returns whether the canvas changed.
pub fn apply_control(
    control: Control,
    engine: &mut DrawingEngine,
    coordinator: &mut DualHandCoordinator,
) -> bool {
    tracing::debug!(?control, "Applying control");
    match control {
        Control::Undo => {
            coordinator.break_strokes();
            engine.undo() == HistoryOutcome::Applied
        }
        Control::Redo => {
            coordinator.break_strokes();
            engine.redo() == HistoryOutcome::Applied
        }
        Control::ClearCanvas => {
            coordinator.break_strokes();
            engine.clear();
            true
        }
        Control::SetColor(color) => {
            engine.set_color(color);
            false
        }
        Control::SetBrushWidth(width) => {
            if let Err(e) = engine.set_brush_width(width) {
                tracing::warn!(error = %e, width, "Ignoring brush width change");
            }
            false
        }
        Control::SetOpacity(opacity) => {
            if let Err(e) = engine.set_opacity(opacity) {
                tracing::warn!(error = %e, opacity, "Ignoring opacity change");
            }
            false
        }
        Control::SetShape(shape) => {
            coordinator.set_shape(shape);
            false
        }
        Control::SetSmoothing(enabled) => {
            coordinator.set_smoothing(enabled);
            false
        }
        Control::ResetTracking => {
            coordinator.reset();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airsketch_common::config::SessionConfig;
    use airsketch_sketch_model::geometry::PixelPoint;

    fn setup() -> (DrawingEngine, DualHandCoordinator) {
        let config = SessionConfig::default();
        (
            DrawingEngine::from_config(&config),
            DualHandCoordinator::new(&config),
        )
    }

    #[test]
    fn test_undo_redo_controls() {
        let (mut engine, mut coordinator) = setup();
        assert!(!apply_control(Control::Undo, &mut engine, &mut coordinator));

        engine.draw(PixelPoint::new(1, 1), PixelPoint::new(9, 9), Rgb::WHITE, 2);
        assert!(apply_control(Control::Undo, &mut engine, &mut coordinator));
        assert!(apply_control(Control::Redo, &mut engine, &mut coordinator));
        assert!(!apply_control(Control::Redo, &mut engine, &mut coordinator));
        assert!(apply_control(Control::ClearCanvas, &mut engine, &mut coordinator));
        assert_eq!(engine.undo_len(), 2);
    }

    #[test]
    fn test_invalid_brush_settings_are_ignored() {
        let (mut engine, mut coordinator) = setup();
        apply_control(Control::SetBrushWidth(12), &mut engine, &mut coordinator);
        assert_eq!(engine.brush_width(), 12);
        apply_control(Control::SetBrushWidth(0), &mut engine, &mut coordinator);
        apply_control(Control::SetBrushWidth(40), &mut engine, &mut coordinator);
        assert_eq!(engine.brush_width(), 12);

        apply_control(Control::SetOpacity(-0.1), &mut engine, &mut coordinator);
        assert_eq!(engine.opacity(), 1.0);
        apply_control(Control::SetOpacity(0.25), &mut engine, &mut coordinator);
        assert_eq!(engine.opacity(), 0.25);

        apply_control(
            Control::SetColor(Rgb::new(0, 255, 0)),
            &mut engine,
            &mut coordinator,
        );
        assert_eq!(engine.color(), Rgb::new(0, 255, 0));
    }

    #[test]
    fn test_shape_and_smoothing_controls() {
        let (mut engine, mut coordinator) = setup();
        let changed = apply_control(
            Control::SetShape(Some(ShapeKind::Circle)),
            &mut engine,
            &mut coordinator,
        );
        assert!(!changed);
        assert_eq!(coordinator.shape(), Some(ShapeKind::Circle));
        apply_control(Control::SetShape(None), &mut engine, &mut coordinator);
        assert_eq!(coordinator.shape(), None);

        apply_control(Control::SetSmoothing(false), &mut engine, &mut coordinator);
        assert!(!coordinator.smoothing_enabled());
        assert_eq!(engine.undo_len(), 0);
    }

    #[test]
    fn test_control_json() {
        let json = serde_json::to_string(&Control::SetBrushWidth(7)).unwrap();
        assert_eq!(json, r#"{"control":"set_brush_width","value":7}"#);
        let parsed: Control = serde_json::from_str(r#"{"control":"undo"}"#).unwrap();
        assert_eq!(parsed, Control::Undo);
        let parsed: Control =
            serde_json::from_str(r#"{"control":"set_shape","value":"arrow"}"#).unwrap();
        assert_eq!(parsed, Control::SetShape(Some(ShapeKind::Arrow)));
        let parsed: Control =
            serde_json::from_str(r#"{"control":"set_smoothing","value":false}"#).unwrap();
        assert_eq!(parsed, Control::SetSmoothing(false));
    }
}
