use crate::AreaStats;
use log::*;
use rgbd_core::{nalgebra::Point2, LandmarkSet, Polygon, Quadrilateral, LANDMARK_COUNT_MAX};
use rgbd_geom::{is_convex, polygon_area};

/// Why a polygon was not accepted as a landmark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// Ceiling lights approximate to exactly 4 vertices.
    VertexCount(usize),
    /// The enclosed area is outside the configured bounds.
    Area(f64),
    NotConvex,
}

/// Accepts polygons shaped like a ceiling light: 4 vertices, a plausible area, and convex.
///
/// The polygons are expected to be outer contours already simplified by Douglas-Peucker with
/// a tolerance of about 2% of the contour perimeter.
///
/// This struct is marked as `#[non_exhaustive]` to allow the backwards-compatible addition of new fields.
#[derive(Copy, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct LandmarkFilter {
    /// The smallest enclosed area (square pixels) of an accepted landmark, inclusive.
    pub area_min: f64,
    /// The largest enclosed area (square pixels) of an accepted landmark, inclusive.
    pub area_max: f64,
    /// The maximum number of landmarks kept per invocation. Clamped to [`LANDMARK_COUNT_MAX`].
    pub max_count: usize,
}

impl LandmarkFilter {
    /// Creates a filter accepting areas between `1000` and `10000` square pixels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the [`LandmarkFilter::area_min`] and [`LandmarkFilter::area_max`].
    #[must_use]
    pub fn area_bounds(self, area_min: f64, area_max: f64) -> Self {
        Self {
            area_min,
            area_max,
            ..self
        }
    }

    /// Sets the [`LandmarkFilter::max_count`].
    #[must_use]
    pub fn max_count(self, max_count: usize) -> Self {
        Self { max_count, ..self }
    }

    /// Checks one polygon, returning its vertices and enclosed area if it is a landmark.
    pub fn check(&self, polygon: &Polygon) -> Result<([Point2<f64>; 4], f64), Rejection> {
        let vertices = polygon
            .as_quad()
            .ok_or(Rejection::VertexCount(polygon.len()))?;
        let area = polygon_area(&vertices).abs();
        if !(self.area_min..=self.area_max).contains(&area) {
            return Err(Rejection::Area(area));
        }
        if !is_convex(&vertices) {
            return Err(Rejection::NotConvex);
        }
        Ok((vertices, area))
    }

    /// Filters the polygons down to a [`LandmarkSet`] in detection order.
    pub fn filter<'a>(&self, polygons: impl IntoIterator<Item = &'a Polygon>) -> LandmarkSet {
        self.filter_with_stats(polygons, &mut AreaStats::new())
    }

    /// Same as [`LandmarkFilter::filter`], but records the accepted areas into `stats`.
    ///
    /// `stats` is not reset first, which lets a caller accumulate over several invocations.
    pub fn filter_with_stats<'a>(
        &self,
        polygons: impl IntoIterator<Item = &'a Polygon>,
        stats: &mut AreaStats,
    ) -> LandmarkSet {
        let max_count = self.max_count.min(LANDMARK_COUNT_MAX);
        let mut landmarks = LandmarkSet::new();
        for (index, polygon) in polygons.into_iter().enumerate() {
            let (vertices, area) = match self.check(polygon) {
                Ok(accepted) => accepted,
                Err(rejection) => {
                    trace!("polygon {} rejected: {:?}", index, rejection);
                    continue;
                }
            };
            if landmarks.len() >= max_count
                || landmarks.push(Quadrilateral::valid(vertices)).is_err()
            {
                debug!(
                    "polygon {} (area {:.1}) dropped, already have {} landmarks",
                    index,
                    area,
                    landmarks.len()
                );
                stats.record_drop();
                continue;
            }
            trace!(
                "landmark {}: {:?} area {:.1}",
                landmarks.len() - 1,
                vertices,
                area
            );
            stats.record(area);
        }
        landmarks
    }
}

impl Default for LandmarkFilter {
    fn default() -> Self {
        Self {
            area_min: 1000.0,
            area_max: 10000.0,
            max_count: LANDMARK_COUNT_MAX,
        }
    }
}
