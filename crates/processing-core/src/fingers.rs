//! Finger-state classification from a single frame of landmarks.
//!
//! Image `y` grows downward, so an upright finger is extended when its tip
//! sits above (smaller `y` than) its PIP joint. The thumb folds across the
//! palm instead of toward it, so it is judged laterally against its IP
//! joint, with the direction mirrored between left and right hands.

use airsketch_common::config::GestureThresholds;
use airsketch_sketch_model::gesture::FingerState;
use airsketch_sketch_model::landmark::{
    HandLandmarks, Handedness, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP,
    PINKY_TIP, RING_PIP, RING_TIP, THUMB_IP, THUMB_TIP,
};

/// Tip/PIP landmark pairs for index, middle, ring, pinky.
const FINGER_JOINTS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Stateless finger-state classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerClassifier {
    /// Required vertical tip-over-PIP distance (normalized).
    pub extension_margin: f64,
    /// Required lateral tip-past-IP distance for the thumb (normalized).
    pub thumb_margin: f64,
}

impl FingerClassifier {
    pub fn new(extension_margin: f64, thumb_margin: f64) -> Self {
        Self {
            extension_margin,
            thumb_margin,
        }
    }

    pub fn from_thresholds(thresholds: &GestureThresholds) -> Self {
        Self::new(thresholds.extension_margin, thresholds.thumb_margin)
    }

    /// Classify which fingers are extended.
    pub fn classify(&self, hand: &HandLandmarks, handedness: Handedness) -> FingerState {
        let thumb_tip = hand[THUMB_TIP].x;
        let thumb_ip = hand[THUMB_IP].x;
        let thumb = match handedness {
            Handedness::Right => thumb_tip < thumb_ip - self.thumb_margin,
            Handedness::Left => thumb_tip > thumb_ip + self.thumb_margin,
        };

        let [index, middle, ring, pinky] = FINGER_JOINTS
            .map(|(tip, pip)| hand[tip].y < hand[pip].y - self.extension_margin);

        FingerState {
            thumb,
            index,
            middle,
            ring,
            pinky,
        }
    }
}

impl Default for FingerClassifier {
    fn default() -> Self {
        Self::from_thresholds(&GestureThresholds::default())
    }
}
