//! Frame rendering with a sigma-based display stretch.

use image::{GrayImage, Luma};
use ndarray::ArrayView2;
use std::path::Path;
use thiserror::Error;

use crate::stats::{DisplayStretch, FrameStats};

/// Errors from frame rendering
#[derive(Error, Debug)]
pub enum RenderError {
    /// PNG encoding or filesystem failure
    #[error("image write error: {0}")]
    Image(#[from] image::ImageError),
}

/// Render a frame to an 8-bit grayscale image.
///
/// Pixels are clamped to the stretch window around the median and scaled
/// linearly to 0-255. A zero-sigma (flat) frame renders as black.
pub fn render_frame(
    data: ArrayView2<f64>,
    stats: &FrameStats,
    stretch: &DisplayStretch,
) -> GrayImage {
    let (rows, cols) = data.dim();
    let (vmin, vmax) = stretch.range(stats);
    let span = vmax - vmin;

    let mut img = GrayImage::new(cols as u32, rows as u32);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let v = data[[y as usize, x as usize]];
        let scaled = if span > 0.0 {
            ((v - vmin) / span * 255.0).clamp(0.0, 255.0)
        } else {
            0.0
        };
        *pixel = Luma([scaled as u8]);
    }

    img
}

/// Render a frame and save it as a PNG (or any format the path implies).
pub fn render_frame_to<P: AsRef<Path>>(
    path: P,
    data: ArrayView2<f64>,
    stats: &FrameStats,
    stretch: &DisplayStretch,
) -> Result<(), RenderError> {
    render_frame(data, stats, stretch).save(path)?;
    Ok(())
}
