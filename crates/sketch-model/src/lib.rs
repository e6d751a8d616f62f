//! AirSketch Sketch Model
//!
//! Defines the data contracts shared by the sketching pipeline:
//! - **Landmarks:** 21-point hand skeletons and per-frame hand observations
//! - **Gestures:** finger states and the closed set of gesture labels
//! - **Commands:** the drawing commands issued against the canvas
//! - **Geometry:** points and colors
//!
//! Landmark coordinates are normalized to `[0.0, 1.0]` relative to the
//! camera frame, with `y` growing downward. Canvas coordinates are pixels.

pub mod command;
pub mod geometry;
pub mod gesture;
pub mod landmark;

pub use command::*;
pub use geometry::*;
pub use gesture::*;
pub use landmark::*;
