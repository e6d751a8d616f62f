//! AirSketch Session Engine
//!
//! Runs the per-frame sketching pipeline for up to two hands:
//!
//! ```text
//! FrameObservations ──► slot tracker ──► per-slot classify/debounce/smooth
//!                                                   │
//!                                                   ▼
//!                        Control ──► producer ──► DrawingEngine ──► latest frame
//! ```
//!
//! The [`worker::SketchWorker`] is the only writer to the canvas. Controls
//! from outside are queued to it and applied between frames.

pub mod control;
pub mod coordinator;
pub mod tracker;
pub mod worker;

pub use control::{apply_control, Control};
pub use coordinator::{DualHandCoordinator, FrameReport, HandReport};
pub use tracker::SLOT_COUNT;
pub use worker::{
    LatestFrame, PublishedFrame, SketchHandle, SketchWorker, WorkerInput, WorkerState, WorkerStats,
};
