use approx::assert_relative_eq;
use rgbd_core::{
    nalgebra::{Point2, Vector2},
    Quadrilateral,
};
use rgbd_depth::{
    DepthError, DepthEstimator, DisparityFrame, DisparityModel, ShiftedSampler, VertexAveraging,
};

fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Quadrilateral {
    Quadrilateral::valid([
        Point2::new(x, y),
        Point2::new(x + width, y),
        Point2::new(x + width, y + height),
        Point2::new(x, y + height),
    ])
}

/// A frame reading `background` everywhere except a "no reading" light at the given rectangle.
fn frame_with_light(background: u16, x: u32, y: u32, width: u32, height: u32) -> DisparityFrame {
    let mut frame = DisparityFrame::filled(640, 480, background);
    for py in y..y + height {
        for px in x..x + width {
            frame.put_pixel(px, py, image::Luma([2047]));
        }
    }
    frame
}

#[test]
fn uniform_disparity_uses_tangent_model() {
    let frame = DisparityFrame::filled(640, 480, 500);
    let meters = DepthEstimator::new()
        .estimate(&frame, &rectangle(200.0, 200.0, 60.0, 40.0))
        .unwrap();
    assert_relative_eq!(meters, 0.1236 * (500.0f64 / 2842.5 + 1.1863).tan());
}

#[test]
fn invalid_landmark_is_rejected() {
    let frame = DisparityFrame::filled(640, 480, 500);
    assert_eq!(
        DepthEstimator::new().estimate(&frame, &Quadrilateral::invalid()),
        Err(DepthError::InvalidQuadrilateral)
    );
}

#[test]
fn dilation_reaches_the_ceiling_around_a_light() {
    // The landmark covers the light exactly, so every corner reads "no data" at first.
    let frame = frame_with_light(800, 300, 200, 60, 40);
    let landmark = rectangle(300.0, 200.0, 59.0, 39.0);
    let raw = DepthEstimator::new().estimate_raw(&frame, &landmark).unwrap();
    assert_relative_eq!(raw, 800.0);

    // Without any dilation the corners never leave the light.
    let result = DepthEstimator::new()
        .max_dilation_attempts(0)
        .estimate_raw(&frame, &landmark);
    assert_eq!(
        result,
        Err(DepthError::InsufficientSamples {
            valid: 0,
            required: 3
        })
    );
}

#[test]
fn leaving_the_frame_aborts() {
    // The light fills the frame, so dilation eventually walks off the image.
    let frame = DisparityFrame::no_readings();
    let result = DepthEstimator::new().estimate(&frame, &rectangle(300.0, 200.0, 60.0, 40.0));
    assert!(matches!(
        result,
        Err(DepthError::OutOfBounds { vertex: 0, .. })
    ));

    // A landmark hanging off the frame fails on the first sample.
    let frame = DisparityFrame::filled(640, 480, 500);
    let result = DepthEstimator::new().estimate(&frame, &rectangle(620.0, 200.0, 60.0, 40.0));
    assert!(matches!(
        result,
        Err(DepthError::OutOfBounds { vertex: 1, .. })
    ));
}

#[test]
fn averaging_policies_handle_missing_vertices() {
    // Only vertex 0 (top left) reads anything; the others see no reading at all.
    let mut frame = DisparityFrame::filled(640, 480, 2047);
    frame.put_pixel(100, 100, image::Luma([600]));
    let landmark = rectangle(100.0, 100.0, 60.0, 40.0);
    let estimator = DepthEstimator::new().max_dilation_attempts(2);

    assert_eq!(
        estimator.estimate_raw(&frame, &landmark),
        Err(DepthError::InsufficientSamples {
            valid: 1,
            required: 3
        })
    );

    let lenient = estimator.averaging(VertexAveraging::ExcludeInvalid { minimum_valid: 1 });
    assert_relative_eq!(lenient.estimate_raw(&frame, &landmark).unwrap(), 600.0);

    let sentinel = estimator.averaging(VertexAveraging::IncludeSentinel);
    assert_relative_eq!(
        sentinel.estimate_raw(&frame, &landmark).unwrap(),
        (600.0 - 3.0) / 4.0
    );
}

#[test]
fn shifted_sampler_undoes_the_alignment_offset() {
    let mut frame = DisparityFrame::filled(640, 480, 2047);
    for y in 90..150 {
        for x in 90..170 {
            frame.put_pixel(x, y, image::Luma([700]));
        }
    }
    // The landmark was found in an image shifted 20 pixels right and 10 down.
    let shifted = ShiftedSampler::new(&frame, Vector2::new(20, 10));
    let landmark = rectangle(120.0, 110.0, 60.0, 40.0);
    let meters = DepthEstimator::new()
        .max_dilation_attempts(0)
        .estimate(&shifted, &landmark)
        .unwrap();
    assert_relative_eq!(meters, DisparityModel::Tangent.to_meters(700.0));
}
