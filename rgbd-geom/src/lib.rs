//! This crate contains the planar geometry used to find and measure ceiling-light landmarks.
//!
//! ## Dilation
//!
//! Depth readings along the border of a ceiling light are frequently missing because the
//! light saturates the sensor. To find a usable reading, the landmark is scaled up about its
//! centroid `c` and the sample is retried at the corresponding vertex of the larger quadrilateral.
//!
//! - `c` the centroid of the quadrilateral
//! - `v` a vertex of the detected landmark
//! - `v'` the same vertex after dilating by `1.5`
//!
//! ```text
//!   v'- - - - - - - - - - +
//!   :                     :
//!   :    v-----------+    :
//!   :    |           |    :
//!   :    |     c     |    :
//!   :    |           |    :
//!   :    +-----------+    :
//!   :                     :
//!   + - - - - - - - - - - +
//! ```

#![no_std]

mod polygon;
mod quad;

pub use polygon::*;
pub use quad::*;

use rgbd_core::{nalgebra::Point2, SENSOR_WIDTH};

/// Computes the Euclidean distance between two pixel locations.
///
/// A distance longer than the sensor width cannot occur between two points of the same frame.
/// Such a distance indicates an implausible match, so `None` is returned instead.
///
/// ```
/// use rgbd_core::nalgebra::Point2;
///
/// let a = Point2::new(0.0, 0.0);
/// assert_eq!(rgbd_geom::distance(a, Point2::new(3.0, 4.0)), Some(5.0));
/// assert_eq!(rgbd_geom::distance(a, Point2::new(600.0, 300.0)), None);
/// ```
pub fn distance(a: Point2<f64>, b: Point2<f64>) -> Option<f64> {
    let distance = rgbd_core::nalgebra::distance(&a, &b);
    (distance <= SENSOR_WIDTH as f64).then(|| distance)
}
