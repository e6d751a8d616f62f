//! AirSketch Render Engine
//!
//! Owns the drawing canvas and everything that mutates or reads it.
//!
//! # Pipeline Architecture
//!
//! ```text
//! DrawingCommand ──┐
//!                  ├── history push (snapshot, redo cleared)
//!                  │         │
//!                  │         ▼
//!                  └── rasterize (segment / disc / clear)
//!                            │
//!                            ▼
//!                      canvas buffer ──┐
//!                                      ├── mask composite ──► output frame
//! camera frame ────────────────────────┘
//! ```

pub mod compositor;
pub mod engine;
pub mod history;
pub mod palette;
pub mod raster;

pub use compositor::composite;
pub use engine::{DrawingEngine, HistoryOutcome};
pub use palette::Palette;
pub use history::SnapshotStack;
pub use raster::{PixelBuffer, VideoFrame};
