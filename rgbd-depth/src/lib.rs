//! Turns raw Kinect-style disparity readings into distances to ceiling-light landmarks.
//!
//! The depth sensor reports an 11-bit raw disparity per pixel. Ceiling lights are specular, so
//! the sensor usually reports no reading at all on and around them. That absence is useful twice:
//!
//! * The "no data" region of the disparity image outlines the lights, which is how landmarks are
//!   found in the depth modality (see [`no_data_mask`] and [`MaskAccumulator`]).
//! * The distance to a light has to be measured on the ceiling right next to it, which is why the
//!   [`DepthEstimator`] dilates the landmark until its corners land on valid readings.

mod estimator;
mod frame;
mod mask;
mod model;

pub use estimator::*;
pub use frame::*;
pub use mask::*;
pub use model::*;
