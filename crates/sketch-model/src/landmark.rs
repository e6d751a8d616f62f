//! Hand landmarks and per-frame observations.
//!
//! The perception component reports each detected hand as 21 normalized
//! `(x, y, z)` landmarks plus a handedness label. Observations arrive
//! unvalidated; [`HandObservation::landmarks`] is the checked view.

use serde::{Deserialize, Serialize};

use airsketch_common::error::{SketchError, SketchResult};

use crate::geometry::Point2D;

/// Number of landmarks in a hand skeleton.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// A single normalized landmark. Serialized as `[x, y, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Projection onto the image plane.
    pub fn xy(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

impl From<[f64; 3]> for Landmark {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Landmark> for [f64; 3] {
    fn from(lm: Landmark) -> Self {
        [lm.x, lm.y, lm.z]
    }
}

/// Reported handedness. May flicker frame to frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

/// A validated 21-landmark hand skeleton.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandLandmarks([Landmark; LANDMARK_COUNT]);

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self(points)
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.0.get(index)
    }

    pub fn as_slice(&self) -> &[Landmark] {
        &self.0
    }

    pub fn wrist(&self) -> Point2D {
        self.0[WRIST].xy()
    }

    /// The drawing control point.
    pub fn index_tip(&self) -> Point2D {
        self.0[INDEX_TIP].xy()
    }

    /// Image-plane distance between the thumb and index fingertips.
    pub fn pinch_distance(&self) -> f64 {
        self.0[THUMB_TIP].xy().distance_to(&self.0[INDEX_TIP].xy())
    }
}

impl std::ops::Index<usize> for HandLandmarks {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl TryFrom<&[Landmark]> for HandLandmarks {
    type Error = SketchError;

    fn try_from(points: &[Landmark]) -> Result<Self, Self::Error> {
        let array: [Landmark; LANDMARK_COUNT] =
            points.try_into().map_err(|_| SketchError::InputShape {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            })?;
        Ok(Self(array))
    }
}

/// One detected hand in one camera frame, as produced by the perception
/// component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    pub handedness: Handedness,
    pub landmarks: Vec<Landmark>,
}

impl HandObservation {
    pub fn new(handedness: Handedness, landmarks: Vec<Landmark>) -> Self {
        Self {
            handedness,
            landmarks,
        }
    }

    /// Checked landmark view. Fails with [`SketchError::InputShape`] unless
    /// exactly 21 landmarks are present.
    pub fn validated(&self) -> SketchResult<HandLandmarks> {
        HandLandmarks::try_from(self.landmarks.as_slice())
    }
}

/// All hands observed in one camera frame, with the capture timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameObservations {
    /// Capture time in seconds since session start.
    #[serde(rename = "t")]
    pub timestamp_secs: f64,

    /// Zero to two detected hands, in detector order.
    #[serde(default)]
    pub hands: Vec<HandObservation>,
}

impl FrameObservations {
    pub fn new(timestamp_secs: f64, hands: Vec<HandObservation>) -> Self {
        Self {
            timestamp_secs,
            hands,
        }
    }

    pub fn empty(timestamp_secs: f64) -> Self {
        Self::new(timestamp_secs, Vec::new())
    }
}

/// Parse a recorded observation log (one JSON frame per line).
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_frames(jsonl: &str) -> Result<Vec<FrameObservations>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize frames to the observation log format.
pub fn serialize_frames(frames: &[FrameObservations]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_hand() -> Vec<Landmark> {
        (0..LANDMARK_COUNT)
            .map(|i| Landmark::new(i as f64 / 100.0, 0.5, 0.0))
            .collect()
    }

    #[test]
    fn test_validated_accepts_21() {
        let obs = HandObservation::new(Handedness::Right, flat_hand());
        let hand = obs.validated().unwrap();
        assert!((hand.index_tip().x - 0.08).abs() < 1e-9);
        assert!((hand.pinch_distance() - 0.04).abs() < 1e-9);
    }

    #[test]
    fn test_validated_rejects_wrong_count() {
        let mut points = flat_hand();
        points.pop();
        let obs = HandObservation::new(Handedness::Left, points);
        match obs.validated() {
            Err(SketchError::InputShape { expected, actual }) => {
                assert_eq!(expected, 21);
                assert_eq!(actual, 20);
            }
            other => panic!("expected InputShape, got {other:?}"),
        }

        let obs = HandObservation::new(Handedness::Left, Vec::new());
        assert!(obs.validated().is_err());
    }

    #[test]
    fn test_landmark_serializes_as_triple() {
        let json = serde_json::to_string(&Landmark::new(0.25, 0.5, -0.1)).unwrap();
        assert_eq!(json, "[0.25,0.5,-0.1]");
    }

    #[test]
    fn test_parse_frames_skips_comments() {
        let jsonl = "# recorded 2026-01-01\n\n{\"t\":0.5,\"hands\":[]}\n{\"t\":0.55}\n";
        let frames = parse_frames(jsonl).unwrap();
        assert_eq!(frames.len(), 2);
        assert!(frames[1].hands.is_empty());
        assert!((frames[1].timestamp_secs - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_frame_log_format() {
        let frame = FrameObservations::new(
            1.0,
            vec![HandObservation::new(Handedness::Right, flat_hand())],
        );
        let jsonl = serialize_frames(std::slice::from_ref(&frame)).unwrap();
        assert!(jsonl.contains("\"t\":1.0"));
        assert!(jsonl.contains("\"handedness\":\"right\""));
        assert_eq!(parse_frames(&jsonl).unwrap(), vec![frame]);
    }
}
