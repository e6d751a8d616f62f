//! Synthetic hand skeletons for driving the pipeline in tests.

#![allow(dead_code)]

use airsketch_common::config::SessionConfig;
use airsketch_sketch_model::landmark::{
    FrameObservations, HandObservation, Handedness, Landmark, INDEX_PIP, INDEX_TIP, LANDMARK_COUNT,
    MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP, PINKY_TIP, RING_PIP, RING_TIP, THUMB_IP, THUMB_MCP,
    THUMB_TIP, WRIST,
};

pub const FRAME_SECS: f64 = 1.0 / 30.0;

pub const DRAW: [bool; 5] = [false, true, false, false, false];
pub const NAVIGATE: [bool; 5] = [false, true, true, false, false];
pub const ERASE: [bool; 5] = [false, true, true, true, true];
pub const FIST: [bool; 5] = [false; 5];
pub const PALM: [bool; 5] = [true; 5];

/// 200x200 canvas, default thresholds.
pub fn config() -> SessionConfig {
    let mut config = SessionConfig::default();
    config.canvas.width = 200;
    config.canvas.height = 200;
    config
}

/// An upright hand with the given fingers extended and the index fingertip
/// at normalized `tip`.
pub fn hand(fingers: [bool; 5], handedness: Handedness, tip: (f64, f64)) -> HandObservation {
    let mut points = [Landmark::new(0.5, 0.7, 0.0); LANDMARK_COUNT];
    points[WRIST] = Landmark::new(0.5, 0.8, 0.0);

    let outward = match handedness {
        Handedness::Right => -1.0,
        Handedness::Left => 1.0,
    };
    points[THUMB_MCP] = Landmark::new(0.5 + outward * 0.05, 0.7, 0.0);
    points[THUMB_IP] = Landmark::new(0.5 + outward * 0.08, 0.68, 0.0);
    points[THUMB_TIP] = if fingers[0] {
        Landmark::new(0.5 + outward * 0.12, 0.66, 0.0)
    } else {
        Landmark::new(0.5 + outward * 0.02, 0.75, 0.0)
    };

    let joints = [
        (INDEX_TIP, INDEX_PIP),
        (MIDDLE_TIP, MIDDLE_PIP),
        (RING_TIP, RING_PIP),
        (PINKY_TIP, PINKY_PIP),
    ];
    for (i, (tip, pip)) in joints.iter().enumerate() {
        let x = 0.45 + i as f64 * 0.04;
        let extended = fingers[i + 1];
        points[*pip] = Landmark::new(x, 0.55, 0.0);
        points[pip + 1] = Landmark::new(x, if extended { 0.48 } else { 0.6 }, 0.0);
        points[*tip] = Landmark::new(x, if extended { 0.42 } else { 0.62 }, 0.0);
    }

    let (dx, dy) = (tip.0 - points[INDEX_TIP].x, tip.1 - points[INDEX_TIP].y);
    let landmarks = points
        .iter()
        .map(|p| Landmark::new(p.x + dx, p.y + dy, p.z))
        .collect();
    HandObservation::new(handedness, landmarks)
}

/// A hand pinching: index extended, thumb tip touching the index tip.
pub fn pinch(handedness: Handedness, tip: (f64, f64)) -> HandObservation {
    let mut observation = hand(DRAW, handedness, tip);
    let index_tip = observation.landmarks[INDEX_TIP];
    observation.landmarks[THUMB_TIP] = Landmark::new(index_tip.x + 0.01, index_tip.y, 0.0);
    observation
}

pub fn frame(index: usize, hands: Vec<HandObservation>) -> FrameObservations {
    FrameObservations::new(index as f64 * FRAME_SECS, hands)
}
