//! AirSketch Common Utilities
//!
//! Shared infrastructure for all AirSketch crates:
//! - Error types and result aliases
//! - Session clock and FPS measurement
//! - Tracing/logging initialization
//! - Session configuration loading and validation

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
