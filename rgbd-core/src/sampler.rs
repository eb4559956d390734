use crate::RAW_DISPARITY_MAX;
use nalgebra::Point2;
use num_traits::Float;

/// Allows the retrieval of raw disparity readings at pixel locations.
///
/// Implementations return `None` when the pixel lies outside the sensor frame.
/// Any in-frame reading is returned as-is, including the `0` and [`RAW_DISPARITY_MAX`]
/// readings which carry no depth; use [`is_valid_disparity`] to check them.
pub trait DepthSampler {
    /// Samples the raw disparity at an integer pixel coordinate.
    fn sample_raw_disparity(&self, pixel: Point2<i32>) -> Option<u16>;

    /// Samples the raw disparity at the pixel nearest to a sub-pixel point.
    fn sample_nearest(&self, point: Point2<f64>) -> Option<u16> {
        self.sample_raw_disparity(nearest_pixel(point)?)
    }
}

impl<S> DepthSampler for &S
where
    S: DepthSampler + ?Sized,
{
    fn sample_raw_disparity(&self, pixel: Point2<i32>) -> Option<u16> {
        (**self).sample_raw_disparity(pixel)
    }
}

/// Rounds a sub-pixel point to the nearest integer pixel.
///
/// Fails if the point is not finite or does not fit in an `i32`.
pub fn nearest_pixel(point: Point2<f64>) -> Option<Point2<i32>> {
    let to_i32 = |v: f64| {
        let v = Float::round(v);
        (v.is_finite() && v >= i32::MIN as f64 && v <= i32::MAX as f64).then(|| v as i32)
    };
    Some(Point2::new(to_i32(point.x)?, to_i32(point.y)?))
}

/// Checks that a raw disparity is inside the usable 11-bit range `(0, 2047)`.
pub fn is_valid_disparity(raw: u16) -> bool {
    raw > 0 && raw < RAW_DISPARITY_MAX
}
