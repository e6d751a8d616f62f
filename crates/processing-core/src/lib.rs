//! AirSketch Processing Core
//!
//! Turns one hand's raw landmark stream into stable control signals:
//! - **Finger States:** which fingers are extended in a single frame
//! - **Gesture Recognition:** raw classification plus window debouncing
//! - **Fingertip Smoothing:** adaptive 1-euro style low-pass filtering
//!
//! This crate is pure computation with no I/O and no threads. Each
//! stateful type covers exactly one hand; the session engine owns one set
//! per tracked hand slot.

pub mod fingers;
pub mod recognizer;
pub mod smoothing;

pub use fingers::FingerClassifier;
pub use recognizer::{GestureRecognizer, GestureUpdate};
pub use smoothing::{OneEuroFilter, PointSmoother};
