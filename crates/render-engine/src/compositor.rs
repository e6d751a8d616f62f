//! Frame compositor: overlays the canvas onto a camera frame.
//!
//! Canvas pixels equal to the background color are transparent. Every other
//! canvas pixel replaces the frame pixel beneath it.

use airsketch_sketch_model::geometry::Rgb;

use crate::raster::{PixelBuffer, VideoFrame};

/// Composite `canvas` over `frame`.
///
/// The output always has the frame's dimensions. When the canvas and frame
/// sizes differ only the overlapping top-left region is masked; the rest of
/// the frame passes through.
pub fn composite(canvas: &PixelBuffer, background: Rgb, frame: &VideoFrame) -> VideoFrame {
    let mut output = frame.clone();
    if canvas.width() != frame.width() || canvas.height() != frame.height() {
        tracing::debug!(
            canvas_width = canvas.width(),
            canvas_height = canvas.height(),
            frame_width = frame.width(),
            frame_height = frame.height(),
            "Compositing over mismatched frame size"
        );
    }

    let width = canvas.width().min(frame.width()) as i32;
    let height = canvas.height().min(frame.height()) as i32;
    for y in 0..height {
        for x in 0..width {
            if let Some(ink) = canvas.get(x, y).filter(|c| *c != background) {
                output.put(x, y, ink);
            }
        }
    }
    output
}
