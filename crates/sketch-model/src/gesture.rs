//! Finger states and gesture labels.

use serde::{Deserialize, Serialize};

/// Which fingers are extended, thumb first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FingerState {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerState {
    pub const fn new(thumb: bool, index: bool, middle: bool, ring: bool, pinky: bool) -> Self {
        Self {
            thumb,
            index,
            middle,
            ring,
            pinky,
        }
    }

    /// Build from `[thumb, index, middle, ring, pinky]`.
    pub const fn from_array(flags: [bool; 5]) -> Self {
        Self::new(flags[0], flags[1], flags[2], flags[3], flags[4])
    }

    pub const fn as_array(&self) -> [bool; 5] {
        [self.thumb, self.index, self.middle, self.ring, self.pinky]
    }

    /// Number of extended fingers.
    pub fn count(&self) -> usize {
        self.as_array().iter().filter(|f| **f).count()
    }

    /// Index, middle, ring and pinky as a tuple, for pattern matching.
    pub const fn non_thumb(&self) -> (bool, bool, bool, bool) {
        (self.index, self.middle, self.ring, self.pinky)
    }
}

/// The closed set of gestures the pipeline reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureLabel {
    #[default]
    Idle,
    /// Index finger only: ink follows the fingertip.
    Draw,
    /// Index and middle: move the pen without ink.
    Navigate,
    /// Four fingers, thumb folded: erase under the fingertip.
    Erase,
    /// Fist: wipe the canvas.
    ClearAll,
    /// Open palm: freeze output.
    Pause,
    /// Thumb and index tips touching: settings indicator.
    PinchSettings,
}

impl GestureLabel {
    /// All labels, in declaration order.
    pub const ALL: [GestureLabel; 7] = [
        Self::Idle,
        Self::Draw,
        Self::Navigate,
        Self::Erase,
        Self::ClearAll,
        Self::Pause,
        Self::PinchSettings,
    ];

    /// String representation for the GUI status line and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Draw => "draw",
            Self::Navigate => "navigate",
            Self::Erase => "erase",
            Self::ClearAll => "clear_all",
            Self::Pause => "pause",
            Self::PinchSettings => "pinch_settings",
        }
    }

    /// Gestures that move a point across the canvas and therefore need the
    /// smoothed fingertip.
    pub fn tracks_pointer(&self) -> bool {
        matches!(self, Self::Draw | Self::Navigate | Self::Erase)
    }
}

impl std::fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
