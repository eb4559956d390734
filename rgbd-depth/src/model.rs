#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

const TANGENT_SCALE: f64 = 0.1236;
const TANGENT_DIVISOR: f64 = 2842.5;
const TANGENT_OFFSET: f64 = 1.1863;

const INVERSE_SLOPE: f64 = -0.0030711016;
const INVERSE_INTERCEPT: f64 = 3.3309495161;

/// A calibrated mapping between raw disparity and metric depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum DisparityModel {
    /// `0.1236 * tan(raw / 2842.5 + 1.1863)` meters.
    ///
    /// Within about 0.33 cm (sum squared difference) of measured data.
    Tangent,
    /// `1 / (raw * -0.0030711016 + 3.3309495161)` meters.
    ///
    /// A first order fit, roughly 10 cm off at 4 m and under 2 cm off within 2.5 m.
    Inverse,
}

impl DisparityModel {
    /// Converts a raw disparity (possibly averaged, so not necessarily an integer) into meters.
    pub fn to_meters(self, raw: f64) -> f64 {
        match self {
            DisparityModel::Tangent => TANGENT_SCALE * (raw / TANGENT_DIVISOR + TANGENT_OFFSET).tan(),
            DisparityModel::Inverse => 1.0 / (raw * INVERSE_SLOPE + INVERSE_INTERCEPT),
        }
    }

    /// Converts meters back into the raw disparity the sensor would report.
    pub fn to_raw(self, meters: f64) -> f64 {
        match self {
            DisparityModel::Tangent => {
                ((meters / TANGENT_SCALE).atan() - TANGENT_OFFSET) * TANGENT_DIVISOR
            }
            DisparityModel::Inverse => (1.0 / meters - INVERSE_INTERCEPT) / INVERSE_SLOPE,
        }
    }
}

impl Default for DisparityModel {
    fn default() -> Self {
        DisparityModel::Tangent
    }
}

/// Coarse classification of raw disparity readings by the distance they represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisparityBand {
    /// Below 242 (under 0.4 m), not a real reading.
    Unknown,
    /// Below 658 (under 0.8 m).
    TooClose,
    /// Below 1006 (under 4 m).
    Normal,
    /// Below 1050 (under 8 m).
    TooFar,
    /// 1050 and above, including the 2047 "no reading" value.
    NoData,
}

impl DisparityBand {
    /// The first raw disparity of the [`DisparityBand::NoData`] band.
    pub const NO_DATA_THRESHOLD: u16 = 1050;

    pub fn classify(raw: u16) -> Self {
        match raw {
            0..=241 => DisparityBand::Unknown,
            242..=657 => DisparityBand::TooClose,
            658..=1005 => DisparityBand::Normal,
            1006..=1049 => DisparityBand::TooFar,
            _ => DisparityBand::NoData,
        }
    }
}
