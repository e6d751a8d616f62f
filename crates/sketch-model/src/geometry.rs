//! Points and colors.

use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates.
///
/// Used both for normalized landmark positions and for smoothed canvas
/// positions before they are snapped to the pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Snap to the nearest pixel.
    pub fn to_pixel(self) -> PixelPoint {
        PixelPoint::new(self.x.round() as i32, self.y.round() as i32)
    }
}

/// An integer canvas coordinate. May lie outside the canvas; rasterization
/// clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for PixelPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Blend toward white: `c * opacity + 255 * (1 - opacity)` per channel.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity >= 1.0 {
            return self;
        }
        let blend = |c: u8| (c as f64 * opacity + 255.0 * (1.0 - opacity)).round() as u8;
        Self([blend(self.0[0]), blend(self.0[1]), blend(self.0[2])])
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(value: [u8; 3]) -> Self {
        Self(value)
    }
}
