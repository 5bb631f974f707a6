//! 2D Gaussian point spread function fitting.
//!
//! Estimates the parameters of an elliptical Gaussian that best explains an
//! image cutout containing a single star. A closed-form moment estimate
//! provides the starting point, which a damped least-squares (Levenberg-
//! Marquardt) refinement then polishes against the full pixel grid.
//!
//! Coordinates follow the array index convention: `x` is the row coordinate
//! and `y` is the column coordinate.

mod fit;
mod model;
mod moments;

pub use fit::{fit_gaussian, PsfFit};
pub use model::GaussianParameters;
pub use moments::moments;

use thiserror::Error;

/// Errors that can occur while fitting a Gaussian PSF
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// Input image has no pixels
    #[error("image is empty")]
    EmptyImage,
    /// Input image has fewer pixels than model parameters
    #[error("image too small to fit: need at least {min} pixels, got {got}")]
    TooSmall { min: usize, got: usize },
    /// A normalization denominator vanished during moment estimation
    #[error("degenerate moments: {0}")]
    DegenerateMoments(&'static str),
    /// The refinement loop hit the iteration cap without meeting tolerance
    #[error("fit did not converge after {iterations} iterations")]
    DidNotConverge { iterations: usize },
}
