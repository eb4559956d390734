use crate::Error;
use multilateration::{Convergence, Multilateration};
use rgbd_core::{nalgebra::Vector2, LandmarkTable, LANDMARK_COUNT_MAX};
use rgbd_depth::{DepthEstimator, DisparityBand, DisparityModel, VertexAveraging};
use rgbd_landmarks::{LandmarkFilter, LandmarkMatcher, MatchStrategy};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The settings for the localization process.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizationSettings {
    /// The smallest area (square pixels) of a landmark
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_area_min"))]
    pub area_min: f64,
    /// The largest area (square pixels) of a landmark
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_area_max"))]
    pub area_max: f64,
    /// The area difference (square pixels) at or above which two landmarks never match
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_area_difference")
    )]
    pub area_difference: f64,
    /// The centroid distance (pixels) at or above which two landmarks never match
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_position_difference")
    )]
    pub position_difference: f64,
    /// The maximum number of landmarks detected per modality per frame
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_landmark_count_max")
    )]
    pub landmark_count_max: usize,
    /// The number of times a landmark corner is pushed outward looking for a valid disparity
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_max_dilation_attempts")
    )]
    pub max_dilation_attempts: usize,
    /// The scale of each outward push of a landmark corner
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_dilation_scale")
    )]
    pub dilation_scale: f64,
    /// The maximum number of multilateration iterations
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_max_iterations")
    )]
    pub max_iterations: usize,
    /// The threshold of the multilateration convergence criterion
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_epsilon"))]
    pub epsilon: f64,
    /// The raw disparity at and above which a pixel is part of the no-data mask
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_no_data_threshold")
    )]
    pub no_data_threshold: u16,
    /// The horizontal shift (pixels) that aligns the depth image with the color image
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub x_offset: i32,
    /// The vertical shift (pixels) that aligns the depth image with the color image
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub y_offset: i32,
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_match_strategy")
    )]
    pub match_strategy: MatchStrategy,
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub averaging: VertexAveraging,
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub convergence: Convergence,
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub disparity_model: DisparityModel,
    /// The world coordinates (meters) of each landmark as `[x, y, z]`
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_landmark_positions")
    )]
    pub landmark_positions: Vec<[f64; 3]>,
}

impl LocalizationSettings {
    /// Checks that every setting is usable.
    pub fn validate(&self) -> Result<(), Error> {
        let invalid = |setting: &'static str, reason: &'static str| -> Result<(), Error> {
            Err(Error::InvalidSettings { setting, reason })
        };
        if !(self.area_min.is_finite() && self.area_min >= 0.0) {
            return invalid("area_min", "must be a finite non-negative area");
        }
        if !(self.area_max.is_finite() && self.area_max >= self.area_min) {
            return invalid("area_max", "must be a finite area no smaller than area_min");
        }
        if !(self.area_difference > 0.0) {
            return invalid("area_difference", "must be positive");
        }
        if !(self.position_difference > 0.0) {
            return invalid("position_difference", "must be positive");
        }
        if self.landmark_count_max == 0 || self.landmark_count_max > LANDMARK_COUNT_MAX {
            return invalid("landmark_count_max", "must be between 1 and 10");
        }
        if !(self.dilation_scale.is_finite() && self.dilation_scale > 1.0) {
            return invalid("dilation_scale", "must be a finite scale above 1");
        }
        if self.max_iterations == 0 {
            return invalid("max_iterations", "must be at least 1");
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return invalid("epsilon", "must be a finite positive threshold");
        }
        if let VertexAveraging::ExcludeInvalid { minimum_valid } = self.averaging {
            if minimum_valid > 4 {
                return invalid("averaging", "a landmark only has 4 vertices");
            }
        }
        if self.landmark_positions.is_empty() {
            return invalid("landmark_positions", "at least one landmark is required");
        }
        if self.landmark_positions.len() > LANDMARK_COUNT_MAX {
            return Err(Error::TooManyLandmarks {
                configured: self.landmark_positions.len(),
                max: LANDMARK_COUNT_MAX,
            });
        }
        if self
            .landmark_positions
            .iter()
            .flatten()
            .any(|c| !c.is_finite())
        {
            return invalid("landmark_positions", "coordinates must be finite");
        }
        if let Convergence::ReferenceLandmark(k) = self.convergence {
            if k >= self.landmark_positions.len() {
                return invalid("convergence", "the reference landmark does not exist");
            }
        }
        Ok(())
    }

    /// The alignment offset of the depth image.
    pub fn offset(&self) -> Vector2<i32> {
        Vector2::new(self.x_offset, self.y_offset)
    }

    pub fn landmark_table(&self) -> LandmarkTable {
        LandmarkTable::from_rows(&self.landmark_positions)
    }

    pub fn landmark_filter(&self) -> LandmarkFilter {
        LandmarkFilter::new()
            .area_bounds(self.area_min, self.area_max)
            .max_count(self.landmark_count_max)
    }

    pub fn landmark_matcher(&self) -> LandmarkMatcher {
        LandmarkMatcher::new()
            .strategy(self.match_strategy)
            .area_difference(self.area_difference)
            .position_difference(self.position_difference)
    }

    pub fn depth_estimator(&self) -> DepthEstimator {
        DepthEstimator::new()
            .max_dilation_attempts(self.max_dilation_attempts)
            .dilation_scale(self.dilation_scale)
            .averaging(self.averaging)
            .model(self.disparity_model)
    }

    pub fn multilateration(&self) -> Multilateration {
        Multilateration::new()
            .max_iterations(self.max_iterations)
            .epsilon(self.epsilon)
            .convergence(self.convergence)
    }
}

impl Default for LocalizationSettings {
    fn default() -> Self {
        Self {
            area_min: default_area_min(),
            area_max: default_area_max(),
            area_difference: default_area_difference(),
            position_difference: default_position_difference(),
            landmark_count_max: default_landmark_count_max(),
            max_dilation_attempts: default_max_dilation_attempts(),
            dilation_scale: default_dilation_scale(),
            max_iterations: default_max_iterations(),
            epsilon: default_epsilon(),
            no_data_threshold: default_no_data_threshold(),
            x_offset: 0,
            y_offset: 0,
            match_strategy: default_match_strategy(),
            averaging: VertexAveraging::default(),
            convergence: Convergence::default(),
            disparity_model: DisparityModel::default(),
            landmark_positions: default_landmark_positions(),
        }
    }
}

fn default_area_min() -> f64 {
    1000.0
}

fn default_area_max() -> f64 {
    10000.0
}

fn default_area_difference() -> f64 {
    500.0
}

fn default_position_difference() -> f64 {
    100.0
}

fn default_landmark_count_max() -> usize {
    LANDMARK_COUNT_MAX
}

fn default_max_dilation_attempts() -> usize {
    100
}

fn default_dilation_scale() -> f64 {
    1.5
}

fn default_max_iterations() -> usize {
    10
}

fn default_epsilon() -> f64 {
    1e-10
}

fn default_no_data_threshold() -> u16 {
    DisparityBand::NO_DATA_THRESHOLD
}

fn default_match_strategy() -> MatchStrategy {
    MatchStrategy::Similarity
}

fn default_landmark_positions() -> Vec<[f64; 3]> {
    LandmarkTable::reference()
        .positions()
        .map(|p| [p.x, p.y, p.z])
        .collect()
}
