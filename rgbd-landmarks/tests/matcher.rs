use rgbd_core::{nalgebra::Point2, LandmarkSet, Quadrilateral};
use rgbd_landmarks::{LandmarkMatch, LandmarkMatcher, MatchStrategy};

fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Quadrilateral {
    Quadrilateral::valid([
        Point2::new(x, y),
        Point2::new(x + width, y),
        Point2::new(x + width, y + height),
        Point2::new(x, y + height),
    ])
}

fn set(landmarks: &[Quadrilateral]) -> LandmarkSet {
    let mut set = LandmarkSet::new();
    for &landmark in landmarks {
        set.push(landmark).unwrap();
    }
    set
}

fn pairs(matches: &[LandmarkMatch]) -> Vec<(usize, usize)> {
    matches.iter().map(|m| (m.rgb, m.depth)).collect()
}

#[test]
fn positional_pairs_equal_slots() {
    let rgb = set(&[
        rectangle(0.0, 0.0, 50.0, 50.0),
        rectangle(300.0, 300.0, 50.0, 50.0),
        rectangle(500.0, 100.0, 50.0, 50.0),
    ]);
    let depth = set(&[
        rectangle(300.0, 300.0, 50.0, 50.0),
        Quadrilateral::invalid(),
    ]);
    let matches = LandmarkMatcher::positional().match_landmarks(&rgb, &depth);
    // Geometry is ignored entirely, invalid slots are skipped.
    assert_eq!(pairs(&matches), vec![(0, 0)]);
}

#[test]
fn similarity_survives_reordering() {
    let a = rectangle(100.0, 100.0, 60.0, 40.0);
    let b = rectangle(400.0, 250.0, 50.0, 50.0);
    let rgb = set(&[a, b]);
    let depth = set(&[rectangle(405.0, 252.0, 50.0, 48.0), rectangle(98.0, 103.0, 60.0, 40.0)]);

    let matches = LandmarkMatcher::new().match_landmarks(&rgb, &depth);
    assert_eq!(pairs(&matches), vec![(1, 0), (0, 1)]);

    let matches = LandmarkMatcher::positional().match_landmarks(&rgb, &depth);
    assert_eq!(pairs(&matches), vec![(0, 0), (1, 1)]);
}

#[test]
fn similarity_respects_thresholds() {
    let matcher = LandmarkMatcher::new();
    let rgb = rectangle(100.0, 100.0, 50.0, 50.0);
    // Same area, centroid 150 pixels away.
    assert!(matcher.cost(&rgb, &rectangle(250.0, 100.0, 50.0, 50.0)).is_none());
    // Same centroid, 1100 square pixels of area difference.
    assert!(matcher.cost(&rgb, &rectangle(95.0, 95.0, 60.0, 60.0)).is_none());
    // Perfect match.
    assert_eq!(matcher.cost(&rgb, &rgb), Some(0.0));
    // Invalid landmarks never match.
    assert!(matcher.cost(&rgb, &Quadrilateral::invalid()).is_none());

    let loose = matcher.position_difference(200.0).area_difference(2000.0);
    assert!(loose.cost(&rgb, &rectangle(250.0, 100.0, 50.0, 50.0)).is_some());
    assert!(loose.cost(&rgb, &rectangle(95.0, 95.0, 60.0, 60.0)).is_some());
}

#[test]
fn similarity_keeps_only_mutual_best() {
    let rgb = set(&[rectangle(100.0, 100.0, 50.0, 50.0)]);
    let depth = set(&[
        rectangle(130.0, 100.0, 50.0, 50.0),
        rectangle(105.0, 100.0, 50.0, 50.0),
    ]);
    let matches = LandmarkMatcher::new().match_landmarks(&rgb, &depth);
    assert_eq!(pairs(&matches), vec![(0, 1)]);
}

#[test]
fn similarity_rejects_ties() {
    let matcher = LandmarkMatcher::new();
    let light = rectangle(100.0, 100.0, 50.0, 50.0);
    let left = rectangle(90.0, 100.0, 50.0, 50.0);
    let right = rectangle(110.0, 100.0, 50.0, 50.0);
    assert_eq!(matcher.cost(&light, &left), matcher.cost(&light, &right));

    // Two depth landmarks equally close to one color landmark.
    let matches = matcher.match_landmarks(&set(&[light]), &set(&[left, right]));
    assert!(matches.is_empty());

    // Two color landmarks equally close to one depth landmark.
    let matches = matcher.match_landmarks(&set(&[left, right]), &set(&[light]));
    assert!(matches.is_empty());

    // An unambiguous landmark still matches next to an ambiguous one.
    let far = rectangle(400.0, 300.0, 50.0, 50.0);
    let matches = matcher.match_landmarks(&set(&[light, far]), &set(&[left, far, right]));
    assert_eq!(pairs(&matches), vec![(1, 1)]);
}

#[test]
fn empty_sets_do_not_match() {
    let rgb = set(&[rectangle(100.0, 100.0, 50.0, 50.0)]);
    let empty = LandmarkSet::new();
    for strategy in [MatchStrategy::Positional, MatchStrategy::Similarity] {
        let matcher = LandmarkMatcher::new().strategy(strategy);
        assert!(matcher.match_landmarks(&rgb, &empty).is_empty());
        assert!(matcher.match_landmarks(&empty, &rgb).is_empty());
    }
}
