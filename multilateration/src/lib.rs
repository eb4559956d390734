//! This crate estimates a 3D position from measured distances to landmarks of known position.
//!
//! Each measured range `r_i` to landmark `L_i` constrains the position `p` to a sphere:
//!
//! ```text
//! ‖p − L_i‖ = r_i
//! ```
//!
//! With three or more landmarks the spheres intersect in (at most) two points, mirrored through
//! the plane of the landmarks. The solver linearizes the range equations around the current
//! estimate and takes Gauss-Newton steps from the origin, so for ceiling landmarks it settles on
//! the intersection below the ceiling, which is where the sensor is.
//!
//! The linearized system is solved with an SVD. When the landmark geometry is degenerate (fewer
//! than three landmarks, or collinear landmarks) the minimum-norm correction is used instead of
//! failing, so a best-effort estimate is always produced.

use log::*;
use rgbd_core::{
    nalgebra::{DMatrix, DVector, Matrix3xX, Point3, Vector3},
    LandmarkTable,
};
use thiserror::Error;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Ranges closer to a landmark than this are treated as sitting on the landmark.
const DEGENERATE_RANGE: f64 = 1e-12;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SolveError {
    #[error("no landmarks to solve against")]
    NoLandmarks,
    #[error("{ranges} ranges were given for {landmarks} landmarks")]
    DimensionMismatch { landmarks: usize, ranges: usize },
    #[error("range {index} is not a finite distance")]
    NonFiniteRange { index: usize },
    #[error("reference landmark {index} does not exist among {landmarks} landmarks")]
    ReferenceOutOfRange { index: usize, landmarks: usize },
}

/// Decides when the iteration has converged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum Convergence {
    /// The norm of the last position correction is below epsilon.
    StepNorm,
    /// The norm of the range residuals before the last correction is below epsilon.
    ResidualNorm,
    /// The absolute range residual `|‖p − L_k‖ − r_k|` of landmark `k` is below epsilon.
    ///
    /// Older configurations used landmark `2` and compared the signed difference, which stops
    /// as soon as the estimate is closer to `L_k` than `r_k`. Only the magnitude counts here, so
    /// inconsistent ranges do not stop the iteration early.
    ReferenceLandmark(usize),
}

impl Default for Convergence {
    fn default() -> Self {
        Convergence::StepNorm
    }
}

/// The outcome of a [`Multilateration::solve`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Solution {
    /// The estimated position in the landmark coordinate frame.
    pub position: Point3<f64>,
    /// The number of Gauss-Newton iterations performed.
    pub iterations: usize,
    /// Whether the convergence criterion was met before the iterations ran out.
    pub converged: bool,
    /// The norm of the range residuals at `position`.
    pub residual: f64,
}

/// Iterative linearized least-squares (Gauss-Newton) multilateration.
///
/// ```
/// use rgbd_core::{nalgebra::Point3, LandmarkTable};
/// use multilateration::Multilateration;
///
/// let table = LandmarkTable::reference();
/// let truth = Point3::new(4.0, 1.0, 1.0);
/// let ranges: Vec<f64> = table.positions().map(|l| (l - truth).norm()).collect();
///
/// let solution = Multilateration::new().solve(&table, &ranges).unwrap();
/// assert!(solution.converged);
/// assert!((solution.position - truth).norm() < 1e-3);
/// ```
///
/// This struct is marked as `#[non_exhaustive]` to allow the backwards-compatible addition of new fields.
#[derive(Copy, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct Multilateration {
    /// The maximum number of Gauss-Newton iterations.
    pub max_iterations: usize,
    /// The threshold used by the [`Convergence`] criterion.
    pub epsilon: f64,
    pub convergence: Convergence,
    /// Singular values below this are treated as zero when solving the linearized system.
    pub singular_value_epsilon: f64,
}

impl Multilateration {
    /// Creates a solver with 10 iterations and an epsilon of `1e-10`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the [`Multilateration::max_iterations`].
    #[must_use]
    pub fn max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }

    /// Sets the [`Multilateration::epsilon`].
    #[must_use]
    pub fn epsilon(self, epsilon: f64) -> Self {
        Self { epsilon, ..self }
    }

    #[must_use]
    pub fn convergence(self, convergence: Convergence) -> Self {
        Self {
            convergence,
            ..self
        }
    }

    #[must_use]
    pub fn singular_value_epsilon(self, singular_value_epsilon: f64) -> Self {
        Self {
            singular_value_epsilon,
            ..self
        }
    }

    /// Estimates the position whose distance to landmark `i` of `table` is `ranges[i]`.
    ///
    /// Only malformed input is an error. Degenerate geometry or running out of iterations still
    /// produces a [`Solution`], check [`Solution::converged`] to tell them apart.
    pub fn solve(&self, table: &LandmarkTable, ranges: &[f64]) -> Result<Solution, SolveError> {
        let landmarks = table.len();
        if landmarks == 0 {
            return Err(SolveError::NoLandmarks);
        }
        if ranges.len() != landmarks {
            return Err(SolveError::DimensionMismatch {
                landmarks,
                ranges: ranges.len(),
            });
        }
        if let Some(index) = ranges.iter().position(|r| !r.is_finite()) {
            return Err(SolveError::NonFiniteRange { index });
        }
        if let Convergence::ReferenceLandmark(index) = self.convergence {
            if index >= landmarks {
                return Err(SolveError::ReferenceOutOfRange { index, landmarks });
            }
        }
        if landmarks < 3 {
            debug!(
                "solving with {} landmarks, the position is underdetermined",
                landmarks
            );
        }

        let positions = table.matrix();
        let mut position = Point3::origin();
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            iterations += 1;

            let (jacobian, residuals) = linearize(position, positions, ranges);
            let svd = match jacobian.try_svd(true, true, f64::EPSILON, 0) {
                Some(svd) => svd,
                None => {
                    warn!("SVD of the range jacobian failed to converge");
                    break;
                }
            };
            let step: Vector3<f64> = match svd.solve(&residuals, self.singular_value_epsilon) {
                Ok(step) => Vector3::new(step[0], step[1], step[2]),
                Err(e) => {
                    warn!("unable to solve the linearized ranges: {}", e);
                    break;
                }
            };
            position += step;
            trace!(
                "iteration {}: position {:?} step {:e} residual {:e}",
                iterations,
                position.coords.as_slice(),
                step.norm(),
                residuals.norm()
            );

            converged = match self.convergence {
                Convergence::StepNorm => step.norm() < self.epsilon,
                Convergence::ResidualNorm => residuals.norm() < self.epsilon,
                Convergence::ReferenceLandmark(k) => {
                    let landmark = Point3::from(positions.column(k).into_owned());
                    ((position - landmark).norm() - ranges[k]).abs() < self.epsilon
                }
            };
            if converged {
                break;
            }
        }

        let residual = linearize(position, positions, ranges).1.norm();
        if !converged {
            debug!(
                "multilateration stopped after {} iterations with residual {:e}",
                iterations, residual
            );
        }
        Ok(Solution {
            position,
            iterations,
            converged,
            residual,
        })
    }
}

impl Default for Multilateration {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            epsilon: 1e-10,
            convergence: Convergence::default(),
            singular_value_epsilon: 1e-12,
        }
    }
}

/// Computes the range jacobian and the range residuals `r_i − ‖p − L_i‖` at `position`.
fn linearize(
    position: Point3<f64>,
    positions: &Matrix3xX<f64>,
    ranges: &[f64],
) -> (DMatrix<f64>, DVector<f64>) {
    let n = ranges.len();
    let mut jacobian = DMatrix::zeros(n, 3);
    let mut residuals = DVector::zeros(n);
    for (i, (landmark, &range)) in positions.column_iter().zip(ranges).enumerate() {
        let offset = position.coords - landmark;
        let predicted = offset.norm();
        if predicted > DEGENERATE_RANGE {
            jacobian
                .row_mut(i)
                .copy_from(&(offset / predicted).transpose());
        }
        residuals[i] = range - predicted;
    }
    (jacobian, residuals)
}
