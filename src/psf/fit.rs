use nalgebra::{Matrix6, Vector6};
use ndarray::ArrayView2;

use super::{moments, FitError, GaussianParameters};

const MAX_ITER: usize = 200;
const STEP_TOL: f64 = 1e-10;

/// Result of a converged PSF fit
#[derive(Debug, Clone, Copy)]
pub struct PsfFit {
    /// Best-fit Gaussian parameters
    pub params: GaussianParameters,
    /// Iterations the refinement loop ran
    pub iterations: usize,
    /// Sum of squared residuals at the solution
    pub residual_ss: f64,
}

/// Fit a 2D elliptical Gaussian to an image cutout.
///
/// Starts from the moment estimate and refines it with a Levenberg-Marquardt
/// loop over every pixel of the image, using the analytic Jacobian of the
/// model. Convergence means the relative parameter step dropped below
/// tolerance; hitting the iteration cap instead reports
/// [`FitError::DidNotConverge`], leaving the caller to decide whether the
/// moment estimate is an acceptable fallback.
pub fn fit_gaussian(data: ArrayView2<f64>) -> Result<PsfFit, FitError> {
    let start = moments(data)?;
    let mut p = [
        start.height,
        start.center_x,
        start.center_y,
        start.width_x,
        start.width_y,
        start.offset,
    ];

    let mut lambda = 1e-3_f64;
    let mut nu = 2.0_f64;
    let mut best_cost = residual_ss(data, &p);
    let mut iterations = 0;

    for iter in 0..MAX_ITER {
        iterations = iter + 1;

        let (jtj, jtr) = normal_equations(data, &p);

        // Damped normal equations, scaled by the diagonal.
        let mut damped = jtj;
        for k in 0..6 {
            damped[(k, k)] += lambda * jtj[(k, k)].max(1e-12);
        }

        let delta = match damped.cholesky() {
            Some(chol) => chol.solve(&jtr),
            None => {
                lambda *= nu;
                nu *= 2.0;
                continue;
            }
        };

        let mut candidate = p;
        for k in 0..6 {
            candidate[k] += delta[k];
        }
        // Widths are divisors; back a nonpositive step off instead of
        // letting the model blow up.
        if candidate[3] <= 0.0 {
            candidate[3] = p[3] * 0.5;
        }
        if candidate[4] <= 0.0 {
            candidate[4] = p[4] * 0.5;
        }

        let new_cost = residual_ss(data, &candidate);

        // Nielsen gain ratio: compare actual to predicted cost reduction.
        let predicted: f64 = (0..6)
            .map(|k| delta[k] * (lambda * jtj[(k, k)].max(1e-12) * delta[k] + jtr[k]))
            .sum();

        if predicted > 0.0 && (best_cost - new_cost) / predicted > 0.0 {
            let rho = (best_cost - new_cost) / predicted;
            p = candidate;
            best_cost = new_cost;
            lambda *= (1.0_f64 / 3.0).max(1.0 - (2.0 * rho - 1.0).powi(3));
            nu = 2.0;
        } else {
            lambda *= nu;
            nu *= 2.0;
        }

        let param_norm = p.iter().map(|v| v * v).sum::<f64>().sqrt();
        let step_norm = (0..6).map(|k| delta[k] * delta[k]).sum::<f64>().sqrt();
        if step_norm / param_norm.max(1e-12) < STEP_TOL {
            return Ok(PsfFit {
                params: GaussianParameters {
                    height: p[0],
                    center_x: p[1],
                    center_y: p[2],
                    width_x: p[3].abs(),
                    width_y: p[4].abs(),
                    offset: p[5],
                },
                iterations,
                residual_ss: best_cost,
            });
        }
    }

    Err(FitError::DidNotConverge { iterations })
}

/// Accumulate J^T J and J^T r over the full pixel grid.
fn normal_equations(data: ArrayView2<f64>, p: &[f64; 6]) -> (Matrix6<f64>, Vector6<f64>) {
    let [height, cx, cy, wx, wy, offset] = *p;
    let inv_wx2 = 1.0 / (wx * wx);
    let inv_wy2 = 1.0 / (wy * wy);

    let mut jtj = Matrix6::zeros();
    let mut jtr = Vector6::zeros();
    let mut jac = [0.0_f64; 6];

    for ((i, j), &value) in data.indexed_iter() {
        let dx = i as f64 - cx;
        let dy = j as f64 - cy;
        let e = (-0.5 * (dx * dx * inv_wx2 + dy * dy * inv_wy2)).exp();
        let model = offset + height * e;
        let r = value - model;

        jac[0] = e;
        jac[1] = height * e * dx * inv_wx2;
        jac[2] = height * e * dy * inv_wy2;
        jac[3] = height * e * dx * dx / (wx * wx * wx);
        jac[4] = height * e * dy * dy / (wy * wy * wy);
        jac[5] = 1.0;

        for a in 0..6 {
            jtr[a] += jac[a] * r;
            for b in a..6 {
                jtj[(a, b)] += jac[a] * jac[b];
            }
        }
    }

    // Mirror the upper triangle.
    for a in 0..6 {
        for b in 0..a {
            jtj[(a, b)] = jtj[(b, a)];
        }
    }

    (jtj, jtr)
}

fn residual_ss(data: ArrayView2<f64>, p: &[f64; 6]) -> f64 {
    let [height, cx, cy, wx, wy, offset] = *p;
    let inv_wx2 = 1.0 / (wx * wx);
    let inv_wy2 = 1.0 / (wy * wy);

    data.indexed_iter()
        .map(|((i, j), &value)| {
            let dx = i as f64 - cx;
            let dy = j as f64 - cy;
            let model = offset + height * (-0.5 * (dx * dx * inv_wx2 + dy * dy * inv_wy2)).exp();
            let r = value - model;
            r * r
        })
        .sum()
}
