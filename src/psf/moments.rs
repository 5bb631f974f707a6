use ndarray::ArrayView2;

use super::{FitError, GaussianParameters};
use crate::stats::median_in_place;

/// The model has six parameters, so demand at least one spare pixel.
pub(crate) const MIN_PIXELS: usize = 7;

/// Relative threshold below which a normalization sum counts as zero.
const SUM_EPS: f64 = 1e-12;

/// Estimate Gaussian parameters from the statistical moments of an image.
///
/// The median is taken as the background, the background-subtracted image
/// provides an intensity-weighted centroid, and the column and row through
/// the centroid provide second-moment width estimates. The peak of the
/// subtracted image gives the height.
///
/// Degenerate inputs (anything that would put a zero in a normalization
/// denominator) are rejected with [`FitError::DegenerateMoments`] instead of
/// silently producing non-finite parameters.
pub fn moments(data: ArrayView2<f64>) -> Result<GaussianParameters, FitError> {
    let (rows, cols) = data.dim();
    if rows == 0 || cols == 0 {
        return Err(FitError::EmptyImage);
    }
    if rows * cols < MIN_PIXELS {
        return Err(FitError::TooSmall {
            min: MIN_PIXELS,
            got: rows * cols,
        });
    }

    let mut samples: Vec<f64> = data.iter().copied().collect();
    let offset = median_in_place(&mut samples);

    let subtracted = data.mapv(|v| v - offset);
    let total = subtracted.sum();
    let peak_abs = subtracted.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let zero_sum = |sum: f64| !sum.is_finite() || sum.abs() <= SUM_EPS * peak_abs.max(1.0);

    if zero_sum(total) {
        return Err(FitError::DegenerateMoments(
            "background-subtracted image sums to zero",
        ));
    }

    let mut x = 0.0;
    let mut y = 0.0;
    for ((i, j), &v) in subtracted.indexed_iter() {
        x += i as f64 * v;
        y += j as f64 * v;
    }
    x /= total;
    y /= total;

    let in_grid = x.is_finite()
        && y.is_finite()
        && (0.0..=(rows - 1) as f64).contains(&x)
        && (0.0..=(cols - 1) as f64).contains(&y);
    if !in_grid {
        return Err(FitError::DegenerateMoments("centroid fell outside the image"));
    }

    // Width along rows from the column through the centroid, and vice versa.
    let col = subtracted.column(y as usize);
    let col_sum = col.sum();
    if zero_sum(col_sum) {
        return Err(FitError::DegenerateMoments("centroid column sums to zero"));
    }
    let second_x: f64 = col
        .indexed_iter()
        .map(|(i, &v)| (i as f64 - y).powi(2) * v)
        .sum();
    let width_x = (second_x / col_sum).abs().sqrt();

    let row = subtracted.row(x as usize);
    let row_sum = row.sum();
    if zero_sum(row_sum) {
        return Err(FitError::DegenerateMoments("centroid row sums to zero"));
    }
    let second_y: f64 = row
        .indexed_iter()
        .map(|(j, &v)| (j as f64 - x).powi(2) * v)
        .sum();
    let width_y = (second_y / row_sum).abs().sqrt();

    // Widths are divisors in the model; a collapsed width (single hot pixel)
    // cannot seed a fit.
    if !(width_x.is_finite() && width_x > 0.0 && width_y.is_finite() && width_y > 0.0) {
        return Err(FitError::DegenerateMoments("width estimate collapsed to zero"));
    }

    let height = subtracted.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(GaussianParameters {
        height,
        center_x: x,
        center_y: y,
        width_x,
        width_y,
        offset,
    })
}
