use approx::assert_relative_eq;
use multilateration::{Convergence, Multilateration, SolveError};
use nalgebra::{Point3, Vector3};
use rgbd_core::LandmarkTable;

const ROUNDS: usize = 200;

fn exact_ranges(table: &LandmarkTable, position: Point3<f64>) -> Vec<f64> {
    table.positions().map(|l| (l - position).norm()).collect()
}

#[test]
fn reference_landmarks_converge() {
    let table = LandmarkTable::reference();
    for truth in [
        Point3::new(4.0, 1.0, 1.0),
        Point3::new(4.5, 1.5, 0.8),
        Point3::new(1.0, 1.0, 0.5),
    ] {
        let solution = Multilateration::new()
            .solve(&table, &exact_ranges(&table, truth))
            .unwrap();
        assert!(solution.converged, "{:?} did not converge", truth);
        assert!(solution.iterations <= 10);
        assert_relative_eq!(solution.position, truth, epsilon = 1e-3);
        assert!(solution.residual < 1e-6);
    }
}

#[test]
fn convergence_criteria_agree() {
    let table = LandmarkTable::reference();
    let truth = Point3::new(4.0, 1.0, 1.0);
    let ranges = exact_ranges(&table, truth);
    for convergence in [
        Convergence::StepNorm,
        Convergence::ResidualNorm,
        Convergence::ReferenceLandmark(2),
    ] {
        let solution = Multilateration::new()
            .epsilon(1e-8)
            .convergence(convergence)
            .solve(&table, &ranges)
            .unwrap();
        assert!(solution.converged, "{:?} did not converge", convergence);
        assert_relative_eq!(solution.position, truth, epsilon = 1e-3);
    }
}

#[test]
fn reference_landmark_uses_the_residual_magnitude() {
    let table = LandmarkTable::reference();
    let mut ranges = exact_ranges(&table, Point3::new(4.0, 1.0, 1.0));
    // The ranges no longer agree, the best fit ends up about 5 cm closer to landmark 2.
    ranges[2] += 0.2;
    let solution = Multilateration::new()
        .epsilon(1e-8)
        .convergence(Convergence::ReferenceLandmark(2))
        .solve(&table, &ranges)
        .unwrap();
    let landmark = table.position(2).unwrap();
    let difference = (solution.position - landmark).norm() - ranges[2];
    assert!(difference < -0.01);
    assert!(!solution.converged);
    assert_eq!(solution.iterations, 10);
}

#[test]
fn exhausted_iterations_are_reported() {
    let table = LandmarkTable::reference();
    let ranges = exact_ranges(&table, Point3::new(4.0, 1.0, 1.0));
    let solution = Multilateration::new()
        .max_iterations(1)
        .solve(&table, &ranges)
        .unwrap();
    assert_eq!(solution.iterations, 1);
    assert!(!solution.converged);
    assert!(solution.position.coords.iter().all(|v| v.is_finite()));
}

#[test]
fn degenerate_geometry_stays_finite() {
    let truth = Point3::new(4.0, 1.0, 1.0);
    let tables = [
        LandmarkTable::from_rows(&[[5.193, 2.438, 2.905], [5.193, 0.0, 2.905]]),
        LandmarkTable::from_rows(&[[5.193, 2.438, 2.905]]),
        LandmarkTable::from_rows(&[
            [1.0, 0.0, 2.905],
            [2.0, 0.0, 2.905],
            [3.0, 0.0, 2.905],
        ]),
    ];
    for table in &tables {
        let solution = Multilateration::new()
            .solve(table, &exact_ranges(table, truth))
            .unwrap();
        assert!(solution.position.coords.iter().all(|v| v.is_finite()));
        assert!(solution.residual.is_finite());
    }

    // A landmark at the origin produces a zero jacobian row on the first iteration.
    let table = LandmarkTable::from_rows(&[
        [0.0, 0.0, 0.0],
        [5.193, 0.0, 2.905],
        [3.364, 2.438, 2.905],
        [3.364, 0.0, 2.905],
    ]);
    let solution = Multilateration::new()
        .solve(&table, &exact_ranges(&table, truth))
        .unwrap();
    assert!(solution.position.coords.iter().all(|v| v.is_finite()));
}

#[test]
fn malformed_input_is_rejected() {
    let table = LandmarkTable::reference();
    assert_eq!(
        Multilateration::new().solve(&LandmarkTable::new(&[]), &[]),
        Err(SolveError::NoLandmarks)
    );
    assert_eq!(
        Multilateration::new().solve(&table, &[1.0, 2.0, 3.0]),
        Err(SolveError::DimensionMismatch {
            landmarks: 4,
            ranges: 3
        })
    );
    assert_eq!(
        Multilateration::new().solve(&table, &[1.0, f64::NAN, 3.0, 4.0]),
        Err(SolveError::NonFiniteRange { index: 1 })
    );
    assert_eq!(
        Multilateration::new()
            .convergence(Convergence::ReferenceLandmark(4))
            .solve(&table, &[3.0; 4]),
        Err(SolveError::ReferenceOutOfRange {
            index: 4,
            landmarks: 4
        })
    );
}

#[test]
fn randomized() {
    let successes = (0..ROUNDS).filter(|_| run_round()).count();
    eprintln!("successes: {}", successes);
    assert!(successes > ROUNDS * 95 / 100);
}

/// Solves for a random position in the room below the reference ceiling lights.
fn run_round() -> bool {
    let table = LandmarkTable::reference();
    let offset = Vector3::<f64>::new_random();
    let truth = Point3::new(
        3.0 + 2.0 * offset.x,
        2.4 * offset.y,
        0.2 + 1.3 * offset.z,
    );
    match Multilateration::new().solve(&table, &exact_ranges(&table, truth)) {
        Ok(solution) => {
            let error = (solution.position - truth).norm();
            if error > 1e-3 {
                eprintln!("{:?} solved as {:?}", truth, solution.position);
            }
            error <= 1e-3
        }
        Err(e) => {
            eprintln!("failed to solve: {}", e);
            false
        }
    }
}
