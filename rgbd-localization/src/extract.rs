use image::GrayImage;
use rgbd_core::Polygon;

/// Finds candidate landmark outlines in a binary mask.
///
/// Implementations are expected to return the outer contours of the white regions, each
/// simplified to a polygon (Douglas-Peucker at about 2% of the contour perimeter works well).
/// The order of the polygons is the detection order used for the rest of the frame.
pub trait PolygonExtractor {
    fn find_polygons(&mut self, mask: &GrayImage) -> Vec<Polygon>;
}

impl<F> PolygonExtractor for F
where
    F: FnMut(&GrayImage) -> Vec<Polygon>,
{
    fn find_polygons(&mut self, mask: &GrayImage) -> Vec<Polygon> {
        self(mask)
    }
}
