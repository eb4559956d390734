use image::GrayImage;
use imageproc::{
    contours::{find_contours, BorderType},
    geometry::{approximate_polygon_dp, arc_length},
};
use log::*;
use rgbd_localization::rgbd_core::Polygon;

/// The Douglas-Peucker tolerance as a fraction of the contour perimeter.
const APPROXIMATION_ACCURACY: f64 = 0.02;

/// Finds the outer contours of the non-zero regions of `mask` and simplifies them to polygons.
pub fn outer_polygons(mask: &GrayImage) -> Vec<Polygon> {
    let polygons: Vec<Polygon> = find_contours::<i32>(mask)
        .into_iter()
        .filter(|contour| matches!(contour.border_type, BorderType::Outer))
        .map(|contour| {
            let epsilon = arc_length(&contour.points, true) * APPROXIMATION_ACCURACY;
            let approximation = approximate_polygon_dp(&contour.points, epsilon, true);
            Polygon::from_pixels(approximation.into_iter().map(|p| (p.x, p.y)))
        })
        .collect();
    trace!("found {} outer contours", polygons.len());
    polygons
}
