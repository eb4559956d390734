use core::f64::consts::TAU;
use num_traits::Float;
use rgbd_core::nalgebra::{Point2, Vector2};

/// Computes the signed area of a closed polygon with the shoelace formula.
///
/// The sign depends on the winding. Use `.abs()` to get the enclosed area.
///
/// ```
/// use rgbd_core::nalgebra::Point2;
///
/// let rectangle = [
///     Point2::new(0.0, 0.0),
///     Point2::new(40.0, 0.0),
///     Point2::new(40.0, 30.0),
///     Point2::new(0.0, 30.0),
/// ];
/// assert_eq!(rgbd_geom::polygon_area(&rectangle), 1200.0);
/// ```
pub fn polygon_area(vertices: &[Point2<f64>]) -> f64 {
    0.5 * edges(vertices)
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum::<f64>()
}

/// Checks if a closed polygon is convex.
///
/// Every corner must turn the same way (collinear corners are ignored) and the boundary
/// must wind around exactly once, which rules out self-intersecting star shapes.
pub fn is_convex(vertices: &[Point2<f64>]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut sign = 0.0;
    let mut winding = 0.0;
    for i in 0..n {
        let incoming: Vector2<f64> = vertices[(i + 1) % n] - vertices[i];
        let outgoing: Vector2<f64> = vertices[(i + 2) % n] - vertices[(i + 1) % n];
        let cross = incoming.perp(&outgoing);
        if cross != 0.0 {
            if sign * cross < 0.0 {
                return false;
            }
            sign = Float::signum(cross);
        }
        winding += Float::atan2(cross, incoming.dot(&outgoing));
    }

    sign != 0.0 && Float::abs(Float::abs(winding) - TAU) < 1e-6
}

fn edges(vertices: &[Point2<f64>]) -> impl Iterator<Item = (Point2<f64>, Point2<f64>)> + '_ {
    vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|(&a, &b)| (a, b))
}
