//! Robust frame statistics for display stretching.
//!
//! All-sky frames carry a bright, spatially varying background, so the
//! display window is anchored on the median and a robust standard deviation
//! (scaled median absolute deviation) rather than the plain mean and sigma.

use ndarray::ArrayView2;
use thiserror::Error;

/// Errors from frame statistics computation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Image has no pixels
    #[error("image is empty")]
    EmptyImage,
    /// A NaN or infinite sample was encountered
    #[error("non-finite sample at flat index {index}")]
    NonFinite { index: usize },
}

/// Summary statistics of a single frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Median pixel value
    pub median: f64,
    /// Arithmetic mean pixel value
    pub mean: f64,
    /// Robust standard deviation, 1.4826 x median absolute deviation
    pub sigma: f64,
}

/// Display stretch in units of the robust sigma around the median.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayStretch {
    /// Sigmas below the median mapped to black
    pub low_sigma: f64,
    /// Sigmas above the median mapped to white
    pub high_sigma: f64,
}

impl Default for DisplayStretch {
    fn default() -> Self {
        Self {
            low_sigma: 1.0,
            high_sigma: 4.0,
        }
    }
}

impl DisplayStretch {
    /// The `(vmin, vmax)` display window for a frame with the given stats.
    pub fn range(&self, stats: &FrameStats) -> (f64, f64) {
        (
            stats.median - self.low_sigma * stats.sigma,
            stats.median + self.high_sigma * stats.sigma,
        )
    }
}

/// Conversion from median absolute deviation to standard deviation for a
/// normal distribution.
const MAD_TO_SIGMA: f64 = 1.4826;

/// Compute median, mean, and robust sigma for a frame.
pub fn frame_stats(data: ArrayView2<f64>) -> Result<FrameStats, StatsError> {
    let n = data.len();
    if n == 0 {
        return Err(StatsError::EmptyImage);
    }
    if let Some((index, _)) = data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(StatsError::NonFinite { index });
    }

    let mut samples: Vec<f64> = data.iter().copied().collect();
    let median = median_in_place(&mut samples);
    let mean = samples.iter().sum::<f64>() / n as f64;

    // Reuse the sorted buffer for the absolute deviations.
    for v in &mut samples {
        *v = (*v - median).abs();
    }
    let mad = median_in_place(&mut samples);
    let sigma = MAD_TO_SIGMA * mad;

    Ok(FrameStats {
        median,
        mean,
        sigma,
    })
}

/// Median of a scratch buffer, sorting it in place.
///
/// Averages the two middle elements for even-length input, matching the
/// numpy convention the pipeline's consumers expect.
pub(crate) fn median_in_place(values: &mut [f64]) -> f64 {
    debug_assert!(!values.is_empty());
    values.sort_unstable_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        0.5 * (values[mid - 1] + values[mid])
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;

    #[test]
    fn test_constant_frame_has_zero_sigma() {
        let frame = Array2::from_elem((8, 8), 500.0);
        let stats = frame_stats(frame.view()).unwrap();
        assert_eq!(stats.median, 500.0);
        assert_eq!(stats.mean, 500.0);
        assert_eq!(stats.sigma, 0.0);
    }

    #[test]
    fn test_median_resists_outliers() {
        let mut frame = Array2::from_elem((10, 10), 100.0);
        frame[[0, 0]] = 1e6;
        frame[[5, 5]] = 1e6;

        let stats = frame_stats(frame.view()).unwrap();
        assert_eq!(stats.median, 100.0);
        assert!(stats.mean > 100.0);
        assert_eq!(stats.sigma, 0.0);
    }

    #[test]
    fn test_known_median_even_count() {
        let frame =
            Array2::from_shape_vec((2, 3), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let stats = frame_stats(frame.view()).unwrap();
        assert_relative_eq!(stats.median, 3.5, epsilon = 1e-12);
        assert_relative_eq!(stats.mean, 3.5, epsilon = 1e-12);
    }

    #[test]
    fn test_mad_sigma_scale() {
        // Values symmetric about 10 with absolute deviations {0, 1, 1, 2, 2}.
        let frame =
            Array2::from_shape_vec((1, 5), vec![8.0, 9.0, 10.0, 11.0, 12.0]).unwrap();
        let stats = frame_stats(frame.view()).unwrap();
        assert_relative_eq!(stats.sigma, 1.4826, epsilon = 1e-12);
    }

    #[test]
    fn test_nan_rejected_with_index() {
        let mut frame = Array2::from_elem((3, 3), 1.0);
        frame[[1, 2]] = f64::NAN;
        assert_eq!(
            frame_stats(frame.view()),
            Err(StatsError::NonFinite { index: 5 })
        );
    }

    #[test]
    fn test_empty_frame_rejected() {
        let frame = Array2::<f64>::zeros((0, 4));
        assert_eq!(frame_stats(frame.view()), Err(StatsError::EmptyImage));
    }

    #[test]
    fn test_stretch_window() {
        let stats = FrameStats {
            median: 1000.0,
            mean: 1010.0,
            sigma: 50.0,
        };
        let stretch = DisplayStretch::default();
        let (vmin, vmax) = stretch.range(&stats);
        assert_relative_eq!(vmin, 950.0, epsilon = 1e-12);
        assert_relative_eq!(vmax, 1200.0, epsilon = 1e-12);
    }
}
