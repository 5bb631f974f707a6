use ndarray::Array2;

/// Parameters of a 2D elliptical Gaussian.
///
/// The model evaluated at `(x, y)` is
/// `offset + height * exp(-0.5 * (((center_x - x) / width_x)^2 + ((center_y - y) / width_y)^2))`
/// where `x` runs along rows and `y` along columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianParameters {
    /// Peak height above the background
    pub height: f64,
    /// Row coordinate of the peak
    pub center_x: f64,
    /// Column coordinate of the peak
    pub center_y: f64,
    /// Gaussian width along rows (standard deviation, pixels)
    pub width_x: f64,
    /// Gaussian width along columns (standard deviation, pixels)
    pub width_y: f64,
    /// Constant background level
    pub offset: f64,
}

impl GaussianParameters {
    /// Evaluate the model at a single point.
    ///
    /// Pure function of the parameters; repeated evaluation at the same point
    /// is bit-identical.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let dx = (self.center_x - x) / self.width_x;
        let dy = (self.center_y - y) / self.width_y;
        self.offset + self.height * (-0.5 * (dx * dx + dy * dy)).exp()
    }

    /// Evaluate the model over a full `(rows, cols)` index grid.
    ///
    /// Useful for generating synthetic star images and predicted frames.
    pub fn predict(&self, shape: (usize, usize)) -> Array2<f64> {
        Array2::from_shape_fn(shape, |(i, j)| self.evaluate(i as f64, j as f64))
    }
}
