use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};
use image::{ImageBuffer, Luma, Pixel};
use rgbd_core::{
    nalgebra::{Point2, Vector2},
    DepthSampler, RAW_DISPARITY_MAX, SENSOR_HEIGHT, SENSOR_WIDTH,
};

/// A raw disparity image as delivered by the sensor, one 11-bit reading per 16-bit pixel.
#[derive(Debug, Clone, PartialEq, AsMut, AsRef, Deref, DerefMut, From, Into)]
pub struct DisparityFrame(pub ImageBuffer<Luma<u16>, Vec<u16>>);

impl DisparityFrame {
    /// Creates a sensor sized frame where every pixel has no reading.
    pub fn no_readings() -> Self {
        Self::filled(SENSOR_WIDTH, SENSOR_HEIGHT, RAW_DISPARITY_MAX)
    }

    /// Creates a frame where every pixel reads `raw`.
    pub fn filled(width: u32, height: u32, raw: u16) -> Self {
        Self(ImageBuffer::from_pixel(width, height, Luma([raw])))
    }
}

impl DepthSampler for DisparityFrame {
    fn sample_raw_disparity(&self, pixel: Point2<i32>) -> Option<u16> {
        let x = u32::try_from(pixel.x).ok()?;
        let y = u32::try_from(pixel.y).ok()?;
        (x < self.width() && y < self.height()).then(|| self.get_pixel(x, y).0[0])
    }
}

/// Views a sampler through an alignment offset.
///
/// Depth-derived images are shifted by `offset` so they line up with the color image.
/// Landmarks found in those shifted images must be sampled at `pixel - offset` in the raw frame.
#[derive(Debug, Clone, Copy)]
pub struct ShiftedSampler<S> {
    pub sampler: S,
    pub offset: Vector2<i32>,
}

impl<S> ShiftedSampler<S> {
    pub fn new(sampler: S, offset: Vector2<i32>) -> Self {
        Self { sampler, offset }
    }
}

impl<S> DepthSampler for ShiftedSampler<S>
where
    S: DepthSampler,
{
    fn sample_raw_disparity(&self, pixel: Point2<i32>) -> Option<u16> {
        let x = pixel.x.checked_sub(self.offset.x)?;
        let y = pixel.y.checked_sub(self.offset.y)?;
        self.sampler.sample_raw_disparity(Point2::new(x, y))
    }
}

/// Translates an image by `offset` pixels (positive moves content right and down).
///
/// Pixels uncovered by the translation are zero.
pub fn shift_image<P>(
    image: &ImageBuffer<P, Vec<P::Subpixel>>,
    offset: Vector2<i32>,
) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel,
{
    let (width, height) = image.dimensions();
    if offset == Vector2::zeros() {
        return image.clone();
    }
    let mut shifted = ImageBuffer::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels() {
        let target_x = x as i64 + offset.x as i64;
        let target_y = y as i64 + offset.y as i64;
        if (0..width as i64).contains(&target_x) && (0..height as i64).contains(&target_y) {
            shifted.put_pixel(target_x as u32, target_y as u32, *pixel);
        }
    }
    shifted
}
