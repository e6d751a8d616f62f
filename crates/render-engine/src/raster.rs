//! Pixel buffers and primitive rasterization.
//!
//! Strokes are rasterized as capsules: every pixel whose center lies within
//! `width / 2` of the segment is inked. A zero-length segment therefore
//! becomes a disc, and consecutive segments join without gaps.
//!
//! Points may lie anywhere in `i32` space. Bounding boxes are computed with
//! saturating arithmetic and clipped to the buffer before any pixel is
//! visited.

use std::f64::consts::FRAC_PI_6;

use airsketch_common::error::{SketchError, SketchResult};
use airsketch_sketch_model::command::ShapeKind;
use airsketch_sketch_model::geometry::{PixelPoint, Rgb};

/// Arrow head length as a fraction of the shaft.
const ARROW_TIP_RATIO: f64 = 0.3;

/// A row-major RGB raster. Used for the canvas, its snapshots, and video
/// frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

/// Video frames share the canvas representation.
pub type VideoFrame = PixelBuffer;

impl PixelBuffer {
    /// A buffer filled with one color.
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Wrap existing pixel data. Fails unless `pixels.len() == width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgb>) -> SketchResult<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(SketchError::render(format!(
                "pixel data has {} entries, expected {width}x{height} = {expected}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Rgb> {
        self.index_of(x, y).map(|i| self.pixels[i])
    }

    /// Set a pixel. Out-of-bounds writes are ignored.
    pub fn put(&mut self, x: i32, y: i32, color: Rgb) {
        if let Some(i) = self.index_of(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Count pixels equal to `color`.
    pub fn count(&self, color: Rgb) -> usize {
        self.pixels.iter().filter(|p| **p == color).count()
    }

    /// Ink a capsule of diameter `width` from `from` to `to`.
    pub fn draw_segment(&mut self, from: PixelPoint, to: PixelPoint, width: u32, color: Rgb) {
        let radius = width.max(1) as f64 / 2.0;
        let (ax, ay) = (from.x as f64, from.y as f64);
        let (bx, by) = (to.x as f64, to.y as f64);
        let (dx, dy) = (bx - ax, by - ay);
        let len_sq = dx * dx + dy * dy;

        let pad = radius.ceil() as i32;
        let Some((x0, y0, x1, y1)) = self.clip_box(
            from.x.min(to.x).saturating_sub(pad),
            from.y.min(to.y).saturating_sub(pad),
            from.x.max(to.x).saturating_add(pad),
            from.y.max(to.y).saturating_add(pad),
        ) else {
            return;
        };

        let radius_sq = radius * radius;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (px, py) = (x as f64, y as f64);
                let t = if len_sq == 0.0 {
                    0.0
                } else {
                    (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0)
                };
                let (cx, cy) = (ax + t * dx, ay + t * dy);
                if (px - cx).powi(2) + (py - cy).powi(2) <= radius_sq {
                    let i = self.width as usize * y as usize + x as usize;
                    self.pixels[i] = color;
                }
            }
        }
    }

    /// Fill a disc of the given radius.
    pub fn fill_disc(&mut self, center: PixelPoint, radius: u32, color: Rgb) {
        let r = i32::try_from(radius).unwrap_or(i32::MAX);
        let Some((x0, y0, x1, y1)) = self.clip_box(
            center.x.saturating_sub(r),
            center.y.saturating_sub(r),
            center.x.saturating_add(r),
            center.y.saturating_add(r),
        ) else {
            return;
        };

        let radius_sq = (radius as i64).pow(2);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as i64 - center.x as i64;
                let dy = y as i64 - center.y as i64;
                if dx * dx + dy * dy <= radius_sq {
                    let i = self.width as usize * y as usize + x as usize;
                    self.pixels[i] = color;
                }
            }
        }
    }

    /// Ink a circle outline of stroke `width` around `center`.
    pub fn draw_ring(&mut self, center: PixelPoint, radius: f64, width: u32, color: Rgb) {
        let half = width.max(1) as f64 / 2.0;
        let outer = radius + half;
        let inner = (radius - half).max(0.0);
        let pad = outer.ceil().min(i32::MAX as f64) as i32;
        let Some((x0, y0, x1, y1)) = self.clip_box(
            center.x.saturating_sub(pad),
            center.y.saturating_sub(pad),
            center.x.saturating_add(pad),
            center.y.saturating_add(pad),
        ) else {
            return;
        };

        let (outer_sq, inner_sq) = (outer * outer, inner * inner);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f64 - center.x as f64;
                let dy = y as f64 - center.y as f64;
                let d_sq = dx * dx + dy * dy;
                if d_sq <= outer_sq && d_sq >= inner_sq {
                    let i = self.width as usize * y as usize + x as usize;
                    self.pixels[i] = color;
                }
            }
        }
    }

    /// Ink a shape outline anchored at `from` and `to`.
    pub fn draw_shape(
        &mut self,
        kind: ShapeKind,
        from: PixelPoint,
        to: PixelPoint,
        width: u32,
        color: Rgb,
    ) {
        match kind {
            ShapeKind::Line => self.draw_segment(from, to, width, color),
            ShapeKind::Rectangle => {
                let corners = [
                    from,
                    PixelPoint::new(to.x, from.y),
                    to,
                    PixelPoint::new(from.x, to.y),
                ];
                for i in 0..corners.len() {
                    let next = corners[(i + 1) % corners.len()];
                    self.draw_segment(corners[i], next, width, color);
                }
            }
            ShapeKind::Circle => {
                let center = PixelPoint::new(
                    midpoint(from.x, to.x),
                    midpoint(from.y, to.y),
                );
                let dx = to.x as f64 - from.x as f64;
                let dy = to.y as f64 - from.y as f64;
                let radius = (dx.hypot(dy) / 2.0).floor();
                self.draw_ring(center, radius, width, color);
            }
            ShapeKind::Arrow => {
                self.draw_segment(from, to, width, color);
                let dx = from.x as f64 - to.x as f64;
                let dy = from.y as f64 - to.y as f64;
                let tip = dx.hypot(dy) * ARROW_TIP_RATIO;
                if tip < 1.0 {
                    return;
                }
                let angle = dy.atan2(dx);
                for side in [-FRAC_PI_6, FRAC_PI_6] {
                    let head = PixelPoint::new(
                        (to.x as f64 + tip * (angle + side).cos()).round() as i32,
                        (to.y as f64 + tip * (angle + side).sin()).round() as i32,
                    );
                    self.draw_segment(to, head, width, color);
                }
            }
        }
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(self.width as usize * y as usize + x as usize)
    }

    /// Intersect an inclusive box with the buffer bounds.
    fn clip_box(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> Option<(i32, i32, i32, i32)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let max_x = self.width as i32 - 1;
        let max_y = self.height as i32 - 1;
        let (x0, y0) = (x0.max(0), y0.max(0));
        let (x1, y1) = (x1.min(max_x), y1.min(max_y));
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }
}

fn midpoint(a: i32, b: i32) -> i32 {
    ((a as i64 + b as i64) / 2) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: Rgb = Rgb::new(255, 0, 0);

    fn blank() -> PixelBuffer {
        PixelBuffer::filled(40, 30, Rgb::BLACK)
    }

    #[test]
    fn test_from_pixels_checks_length() {
        assert!(PixelBuffer::from_pixels(2, 2, vec![Rgb::BLACK; 4]).is_ok());
        assert!(PixelBuffer::from_pixels(2, 2, vec![Rgb::BLACK; 3]).is_err());
    }

    #[test]
    fn test_horizontal_segment_width() {
        let mut buf = blank();
        buf.draw_segment(PixelPoint::new(5, 10), PixelPoint::new(15, 10), 3, INK);
        for x in 5..=15 {
            assert_eq!(buf.get(x, 9), Some(INK));
            assert_eq!(buf.get(x, 10), Some(INK));
            assert_eq!(buf.get(x, 11), Some(INK));
            assert_eq!(buf.get(x, 12), Some(Rgb::BLACK));
        }
        assert_eq!(buf.get(20, 10), Some(Rgb::BLACK));
    }

    #[test]
    fn test_width_one_diagonal_is_connected() {
        let mut buf = blank();
        buf.draw_segment(PixelPoint::new(0, 0), PixelPoint::new(9, 3), 1, INK);
        for x in 0..=9 {
            let inked = (0..30).filter(|y| buf.get(x, *y) == Some(INK)).count();
            assert!(inked >= 1, "column {x} has no ink");
        }
    }

    #[test]
    fn test_zero_length_segment_is_dot() {
        let mut buf = blank();
        buf.draw_segment(PixelPoint::new(20, 15), PixelPoint::new(20, 15), 4, INK);
        assert_eq!(buf.get(20, 15), Some(INK));
        assert_eq!(buf.get(22, 15), Some(INK));
        assert_eq!(buf.get(23, 15), Some(Rgb::BLACK));
        assert_eq!(buf.get(22, 17), Some(Rgb::BLACK));
    }

    #[test]
    fn test_clipping_out_of_bounds() {
        let mut buf = blank();
        buf.draw_segment(PixelPoint::new(-50, -50), PixelPoint::new(-10, -10), 5, INK);
        assert_eq!(buf.count(INK), 0);
        buf.fill_disc(PixelPoint::new(-2, 5), 4, INK);
        assert!(buf.count(INK) > 0);
        assert_eq!(buf.get(0, 5), Some(INK));
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let mut buf = blank();
        let far = PixelPoint::new(i32::MAX, i32::MAX);
        buf.draw_segment(far, far, 20, INK);
        buf.fill_disc(PixelPoint::new(i32::MIN, i32::MIN), 200, INK);
        assert_eq!(buf.count(INK), 0);

        // A segment from inside the canvas to a saturated point still inks
        // the visible part.
        buf.draw_segment(PixelPoint::new(5, 5), PixelPoint::new(i32::MAX, 5), 1, INK);
        assert_eq!(buf.get(39, 5), Some(INK));

        buf.draw_shape(ShapeKind::Circle, PixelPoint::new(i32::MIN, 0), far, 3, INK);
        buf.draw_shape(ShapeKind::Arrow, PixelPoint::new(0, 0), far, 3, INK);
    }

    #[test]
    fn test_rectangle_outline() {
        let mut buf = blank();
        buf.draw_shape(
            ShapeKind::Rectangle,
            PixelPoint::new(5, 5),
            PixelPoint::new(25, 20),
            1,
            INK,
        );
        assert_eq!(buf.get(5, 12), Some(INK));
        assert_eq!(buf.get(25, 12), Some(INK));
        assert_eq!(buf.get(15, 5), Some(INK));
        assert_eq!(buf.get(15, 20), Some(INK));
        assert_eq!(buf.get(15, 12), Some(Rgb::BLACK));
    }

    #[test]
    fn test_circle_spans_diameter() {
        let mut buf = blank();
        buf.draw_shape(
            ShapeKind::Circle,
            PixelPoint::new(10, 15),
            PixelPoint::new(30, 15),
            1,
            INK,
        );
        assert_eq!(buf.get(10, 15), Some(INK));
        assert_eq!(buf.get(30, 15), Some(INK));
        assert_eq!(buf.get(20, 5), Some(INK));
        assert_eq!(buf.get(20, 15), Some(Rgb::BLACK));
    }

    #[test]
    fn test_arrow_has_head_at_target() {
        let mut line = blank();
        line.draw_shape(ShapeKind::Line, PixelPoint::new(5, 15), PixelPoint::new(35, 15), 1, INK);
        let mut arrow = blank();
        arrow.draw_shape(ShapeKind::Arrow, PixelPoint::new(5, 15), PixelPoint::new(35, 15), 1, INK);

        assert!(arrow.count(INK) > line.count(INK));
        // Head strokes fan back from the tip on both sides of the shaft.
        assert_eq!(arrow.get(31, 13), Some(INK));
        assert_eq!(arrow.get(31, 17), Some(INK));
        assert_eq!(line.get(31, 13), Some(Rgb::BLACK));
    }

    #[test]
    fn test_disc_area() {
        let mut buf = blank();
        buf.fill_disc(PixelPoint::new(20, 15), 5, INK);
        // Lattice points within radius 5 of the origin.
        assert_eq!(buf.count(INK), 81);
    }
}
