use approx::assert_relative_eq;
use rgbd_core::{nalgebra::Point2, Polygon, LANDMARK_COUNT_MAX};
use rgbd_landmarks::{AreaStats, LandmarkFilter, Rejection};

/// An axis aligned rectangle with its top-left corner at `(x, y)`.
fn rectangle(x: i32, y: i32, width: i32, height: i32) -> Polygon {
    Polygon::from_pixels([
        (x, y),
        (x + width, y),
        (x + width, y + height),
        (x, y + height),
    ])
}

#[test]
fn only_quadrilaterals_pass() {
    let filter = LandmarkFilter::new();
    let triangle = Polygon::from_pixels([(0, 0), (100, 0), (0, 100)]);
    let pentagon = Polygon::from_pixels([(50, 0), (100, 40), (80, 100), (20, 100), (0, 40)]);
    let empty = Polygon::default();
    assert_eq!(filter.check(&triangle), Err(Rejection::VertexCount(3)));
    assert_eq!(filter.check(&pentagon), Err(Rejection::VertexCount(5)));
    assert_eq!(filter.check(&empty), Err(Rejection::VertexCount(0)));
    assert!(filter.filter([&triangle, &pentagon, &empty]).is_empty());
}

#[test]
fn area_bounds_are_inclusive() {
    let filter = LandmarkFilter::new();
    // 27 * 37 = 999, 25 * 40 = 1000, 7 * 143 = 1001
    assert_eq!(
        filter.check(&rectangle(10, 10, 27, 37)),
        Err(Rejection::Area(999.0))
    );
    assert!(filter.check(&rectangle(10, 10, 25, 40)).is_ok());
    assert!(filter.check(&rectangle(10, 10, 7, 143)).is_ok());
    // 100 * 100 = 10000, 101 * 100 = 10100
    assert!(filter.check(&rectangle(10, 10, 100, 100)).is_ok());
    assert_eq!(
        filter.check(&rectangle(10, 10, 101, 100)),
        Err(Rejection::Area(10100.0))
    );
}

#[test]
fn concave_quadrilaterals_are_rejected() {
    let dart = Polygon::from_pixels([(0, 0), (100, 50), (0, 100), (30, 50)]);
    assert_eq!(
        LandmarkFilter::new().check(&dart),
        Err(Rejection::NotConvex)
    );
}

#[test]
fn winding_does_not_matter() {
    let mut clockwise = rectangle(0, 0, 50, 50);
    clockwise.reverse();
    let landmarks = LandmarkFilter::new().filter([&clockwise]);
    assert_eq!(landmarks.len(), 1);
    assert_eq!(landmarks[0].vertex(0), Point2::new(0.0, 50.0));
}

#[test]
fn keeps_detection_order_and_vertex_order() {
    let polygons = vec![
        rectangle(0, 0, 50, 50),
        Polygon::from_pixels([(0, 0), (1, 0), (0, 1)]),
        rectangle(200, 100, 60, 40),
        rectangle(400, 300, 30, 40),
    ];
    let landmarks = LandmarkFilter::new().filter(&polygons);
    assert_eq!(landmarks.len(), 3);
    assert_eq!(landmarks[0].vertices()[..], polygons[0][..]);
    assert_eq!(landmarks[1].vertices()[..], polygons[2][..]);
    assert_eq!(landmarks[2].vertices()[..], polygons[3][..]);
    assert!(landmarks.iter().all(|l| l.is_valid()));
}

#[test]
fn overflow_is_dropped_and_counted() {
    pretty_env_logger::init_timed();
    let polygons: Vec<_> = (0..LANDMARK_COUNT_MAX as i32 + 2)
        .map(|i| rectangle(i * 50, 0, 40, 40))
        .collect();

    let mut stats = AreaStats::new();
    let landmarks = LandmarkFilter::new().filter_with_stats(&polygons, &mut stats);
    assert_eq!(landmarks.len(), LANDMARK_COUNT_MAX);
    assert_eq!(stats.count, LANDMARK_COUNT_MAX);
    assert_eq!(stats.dropped, 2);
    assert_eq!(landmarks[9].vertex(0), Point2::new(450.0, 0.0));

    let mut stats = AreaStats::new();
    let landmarks = LandmarkFilter::new()
        .max_count(3)
        .filter_with_stats(&polygons, &mut stats);
    assert_eq!(landmarks.len(), 3);
    assert_eq!(stats.dropped, 9);

    // Requests beyond the set capacity are clamped.
    let landmarks = LandmarkFilter::new().max_count(100).filter(&polygons);
    assert_eq!(landmarks.len(), LANDMARK_COUNT_MAX);
}

#[test]
fn statistics_track_accepted_areas() {
    let polygons = [
        rectangle(0, 0, 40, 25),
        rectangle(100, 0, 50, 40),
        rectangle(200, 0, 5, 5),
        rectangle(300, 0, 60, 50),
    ];
    let mut stats = AreaStats::new();
    LandmarkFilter::new().filter_with_stats(&polygons, &mut stats);
    assert_eq!(stats.count, 3);
    assert_relative_eq!(stats.mean, (1000.0 + 2000.0 + 3000.0) / 3.0);
    assert_relative_eq!(stats.min, 1000.0);
    assert_relative_eq!(stats.max, 3000.0);
    assert_eq!(stats.dropped, 0);

    stats.reset();
    assert_eq!(stats, AreaStats::default());
}

#[test]
fn custom_area_bounds() {
    let filter = LandmarkFilter::new().area_bounds(10.0, 100.0);
    assert!(filter.check(&rectangle(0, 0, 5, 5)).is_ok());
    assert!(filter.check(&rectangle(0, 0, 40, 25)).is_err());
}
