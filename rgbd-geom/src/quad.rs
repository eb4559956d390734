use rgbd_core::{nalgebra::Point2, Quadrilateral};

/// Computes the centroid of a quadrilateral with the shoelace formula.
///
/// The vertices are treated as a closed loop. An invalid quadrilateral produces the origin.
/// A degenerate quadrilateral (zero signed area) produces the mean of its vertices.
///
/// ```
/// use rgbd_core::{nalgebra::Point2, Quadrilateral};
///
/// let square = Quadrilateral::valid([
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(0.0, 1.0),
/// ]);
/// assert_eq!(rgbd_geom::centroid(&square), Point2::new(0.5, 0.5));
/// ```
pub fn centroid(quad: &Quadrilateral) -> Point2<f64> {
    if !quad.is_valid() {
        return Point2::origin();
    }

    let vertices = quad.vertices();
    let mut area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for (i, a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        let cross = a.x * b.y - b.x * a.y;
        area += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    area *= 0.5;

    if area == 0.0 {
        let sum = vertices.iter().fold(Point2::origin(), |acc, v| acc + v.coords);
        return sum / vertices.len() as f64;
    }
    Point2::new(cx / (6.0 * area), cy / (6.0 * area))
}

/// Moves a coordinate toward (`scale < 1`) or away from (`scale > 1`) a center coordinate.
///
/// ```
/// assert_eq!(rgbd_geom::scale_toward(3.0, 2.0, 1.0), 5.0);
/// assert_eq!(rgbd_geom::scale_toward(3.0, 0.5, 1.0), 2.0);
/// ```
pub fn scale_toward(point: f64, scale: f64, center: f64) -> f64 {
    point * scale + center * (1.0 - scale)
}

/// Applies [`scale_toward`] to both axes of a point.
pub fn scale_point_toward(point: Point2<f64>, scale: f64, center: Point2<f64>) -> Point2<f64> {
    Point2::new(
        scale_toward(point.x, scale, center.x),
        scale_toward(point.y, scale, center.y),
    )
}

/// Scales every vertex of a quadrilateral about its [`centroid`].
///
/// The result is always a valid quadrilateral. Callers must check the validity of the input.
#[must_use]
pub fn dilate(quad: &Quadrilateral, scale: f64) -> Quadrilateral {
    let center = centroid(quad);
    Quadrilateral::valid(
        quad.vertices()
            .map(|vertex| scale_point_toward(vertex, scale, center)),
    )
}
