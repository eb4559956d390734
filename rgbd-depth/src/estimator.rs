use crate::DisparityModel;
use log::*;
use rgbd_core::{is_valid_disparity, nearest_pixel, DepthSampler, Quadrilateral};
use thiserror::Error;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum DepthError {
    #[error("depth cannot be estimated for an invalid quadrilateral")]
    InvalidQuadrilateral,
    #[error("vertex {vertex} sampled outside the frame at ({x}, {y})")]
    OutOfBounds { vertex: usize, x: f64, y: f64 },
    #[error("only {valid} vertices found a valid disparity, {required} are required")]
    InsufficientSamples { valid: usize, required: usize },
}

/// How the per-vertex disparities are combined into one reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum VertexAveraging {
    /// Average only the vertices that found a valid disparity, of which there must be at
    /// least `minimum_valid`.
    ExcludeInvalid { minimum_valid: usize },
    /// Average all four vertices, counting a vertex that never found a valid disparity as `-1`.
    ///
    /// This biases the result toward the sensor and exists to reproduce older recordings.
    IncludeSentinel,
}

impl Default for VertexAveraging {
    fn default() -> Self {
        VertexAveraging::ExcludeInvalid { minimum_valid: 3 }
    }
}

/// Estimates the distance from the sensor to a landmark using the disparity at its corners.
///
/// The corners of a ceiling light rarely have valid readings, so each corner that doesn't is
/// pushed outward by repeatedly dilating the landmark about its centroid until the corner lands
/// on the ceiling around the light.
///
/// ```
/// use rgbd_core::{nalgebra::Point2, Quadrilateral};
/// use rgbd_depth::{DepthEstimator, DisparityFrame, DisparityModel};
///
/// let frame = DisparityFrame::filled(640, 480, 500);
/// let landmark = Quadrilateral::valid([
///     Point2::new(100.0, 100.0),
///     Point2::new(160.0, 100.0),
///     Point2::new(160.0, 140.0),
///     Point2::new(100.0, 140.0),
/// ]);
/// let meters = DepthEstimator::new().estimate(&frame, &landmark).unwrap();
/// assert_eq!(meters, DisparityModel::Tangent.to_meters(500.0));
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct DepthEstimator {
    /// The number of times a vertex is pushed outward before giving up on it.
    pub max_dilation_attempts: usize,
    /// The scale applied to the landmark on every attempt.
    pub dilation_scale: f64,
    pub averaging: VertexAveraging,
    pub model: DisparityModel,
}

impl DepthEstimator {
    /// Creates a `DepthEstimator` with default values.
    ///
    /// Same as calling [`Default::default`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the maximum number of dilations tried per vertex.
    ///
    /// Default: `100`
    #[must_use]
    pub fn max_dilation_attempts(self, max_dilation_attempts: usize) -> Self {
        Self {
            max_dilation_attempts,
            ..self
        }
    }

    /// Set the scale of each dilation.
    ///
    /// Default: `1.5`
    #[must_use]
    pub fn dilation_scale(self, dilation_scale: f64) -> Self {
        Self {
            dilation_scale,
            ..self
        }
    }

    /// Default: `VertexAveraging::ExcludeInvalid { minimum_valid: 3 }`
    #[must_use]
    pub fn averaging(self, averaging: VertexAveraging) -> Self {
        Self { averaging, ..self }
    }

    /// Default: `DisparityModel::Tangent`
    #[must_use]
    pub fn model(self, model: DisparityModel) -> Self {
        Self { model, ..self }
    }

    /// Estimates the distance to the landmark in meters.
    pub fn estimate<S>(&self, sampler: &S, landmark: &Quadrilateral) -> Result<f64, DepthError>
    where
        S: DepthSampler + ?Sized,
    {
        let raw = self.estimate_raw(sampler, landmark)?;
        let meters = self.model.to_meters(raw);
        debug!("landmark disparity {:.1} is {:.3} m", raw, meters);
        Ok(meters)
    }

    /// Estimates the averaged raw disparity of the landmark.
    pub fn estimate_raw<S>(&self, sampler: &S, landmark: &Quadrilateral) -> Result<f64, DepthError>
    where
        S: DepthSampler + ?Sized,
    {
        if !landmark.is_valid() {
            return Err(DepthError::InvalidQuadrilateral);
        }

        let mut samples = [None; 4];
        for (vertex, sample) in samples.iter_mut().enumerate() {
            *sample = self.sample_vertex(sampler, landmark, vertex)?;
        }

        match self.averaging {
            VertexAveraging::ExcludeInvalid { minimum_valid } => {
                let valid = samples.iter().flatten().count();
                if valid == 0 || valid < minimum_valid {
                    return Err(DepthError::InsufficientSamples {
                        valid,
                        required: minimum_valid.max(1),
                    });
                }
                let sum: f64 = samples.iter().flatten().map(|&raw| f64::from(raw)).sum();
                Ok(sum / valid as f64)
            }
            VertexAveraging::IncludeSentinel => {
                let sum: f64 = samples
                    .iter()
                    .map(|sample| sample.map_or(-1.0, f64::from))
                    .sum();
                Ok(sum / samples.len() as f64)
            }
        }
    }

    /// Finds a valid disparity for one vertex, dilating the landmark until one is found.
    ///
    /// Returns `Ok(None)` when the dilation budget is exhausted.
    fn sample_vertex<S>(
        &self,
        sampler: &S,
        landmark: &Quadrilateral,
        vertex: usize,
    ) -> Result<Option<u16>, DepthError>
    where
        S: DepthSampler + ?Sized,
    {
        let mut current = *landmark;
        for attempt in 0..=self.max_dilation_attempts {
            if attempt > 0 {
                current = rgbd_geom::dilate(&current, self.dilation_scale);
            }
            let point = current.vertex(vertex);
            let raw = nearest_pixel(point)
                .and_then(|pixel| sampler.sample_raw_disparity(pixel))
                .ok_or(DepthError::OutOfBounds {
                    vertex,
                    x: point.x,
                    y: point.y,
                })?;
            if is_valid_disparity(raw) {
                if attempt > 0 {
                    trace!("vertex {} found disparity {} after {} dilations", vertex, raw, attempt);
                }
                return Ok(Some(raw));
            }
        }
        trace!(
            "vertex {} found no valid disparity within {} dilations",
            vertex,
            self.max_dilation_attempts
        );
        Ok(None)
    }
}

impl Default for DepthEstimator {
    fn default() -> Self {
        Self {
            max_dilation_attempts: 100,
            dilation_scale: 1.5,
            averaging: VertexAveraging::default(),
            model: DisparityModel::default(),
        }
    }
}
