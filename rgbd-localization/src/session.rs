use crate::{Error, LocalizationSettings, PolygonExtractor};
use image::GrayImage;
use log::*;
use multilateration::{Multilateration, Solution};
use rgbd_core::{nalgebra::Vector2, LandmarkSet, LandmarkTable, RangeVector};
use rgbd_depth::{
    no_data_mask, shift_image, DepthEstimator, DisparityFrame, MaskAccumulator, ShiftedSampler,
};
use rgbd_landmarks::{AreaStats, LandmarkFilter, LandmarkMatcher, LandmarkMatches, Modality};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// One synchronized capture of the sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// The raw disparity image.
    pub disparity: DisparityFrame,
    /// The binary edge mask of the color image, already in color image coordinates.
    pub edges: GrayImage,
}

/// What came of localizing one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum FrameOutcome {
    /// Every landmark range was measured and a position was solved.
    Located(Solution),
    /// `missing` landmark ranges could not be measured, so no position was solved.
    Sparse { missing: usize },
}

impl FrameOutcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            FrameOutcome::Located(solution) => Some(solution),
            FrameOutcome::Sparse { .. } => None,
        }
    }
}

/// Everything found while processing one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub rgb_landmarks: LandmarkSet,
    pub depth_landmarks: LandmarkSet,
    pub matches: LandmarkMatches,
    pub ranges: RangeVector,
    pub outcome: FrameOutcome,
}

/// Localizes an RGB-D sensor frame by frame and owns the state kept between frames.
///
/// The depth modality is accumulated over frames, so the session must be [`reset`](Session::reset)
/// whenever the frames stop being consecutive views of the same scene.
#[derive(Debug, Clone)]
pub struct Session {
    settings: LocalizationSettings,
    table: LandmarkTable,
    filter: LandmarkFilter,
    matcher: LandmarkMatcher,
    estimator: DepthEstimator,
    solver: Multilateration,
    offset: Vector2<i32>,
    accumulator: MaskAccumulator,
    stats: [AreaStats; 2],
}

impl Session {
    pub fn new(settings: LocalizationSettings) -> Result<Self, Error> {
        settings.validate()?;
        Ok(Self {
            table: settings.landmark_table(),
            filter: settings.landmark_filter(),
            matcher: settings.landmark_matcher(),
            estimator: settings.depth_estimator(),
            solver: settings.multilateration(),
            offset: settings.offset(),
            accumulator: MaskAccumulator::new(rgbd_core::SENSOR_WIDTH, rgbd_core::SENSOR_HEIGHT),
            stats: [AreaStats::new(); 2],
            settings,
        })
    }

    pub fn settings(&self) -> &LocalizationSettings {
        &self.settings
    }

    pub fn landmark_table(&self) -> &LandmarkTable {
        &self.table
    }

    /// The shift applied to the depth image to align it with the color image.
    pub fn offset(&self) -> Vector2<i32> {
        self.offset
    }

    /// Changes the alignment offset, which also [`reset`](Session::reset)s the session.
    pub fn set_offset(&mut self, offset: Vector2<i32>) {
        info!("depth alignment offset set to ({}, {})", offset.x, offset.y);
        self.offset = offset;
        self.reset();
    }

    /// Moves the alignment offset by `delta` pixels.
    pub fn nudge_offset(&mut self, delta: Vector2<i32>) {
        self.set_offset(self.offset + delta);
    }

    /// Clears the accumulated depth mask and the landmark statistics.
    pub fn reset(&mut self) {
        debug!("resetting session state");
        self.accumulator.reset();
        for stats in &mut self.stats {
            stats.reset();
        }
    }

    /// The area statistics of the landmarks accepted in the latest frame.
    pub fn stats(&self, modality: Modality) -> &AreaStats {
        &self.stats[modality.index()]
    }

    /// The depth mask accumulated since the last reset.
    pub fn accumulated_mask(&self) -> &GrayImage {
        self.accumulator.mask()
    }

    /// Runs one frame through the whole pipeline.
    ///
    /// Only configuration problems are errors. A frame where some landmark could not be measured
    /// produces [`FrameOutcome::Sparse`].
    pub fn process_frame<E>(&mut self, frame: &Frame, extractor: &mut E) -> Result<FrameReport, Error>
    where
        E: PolygonExtractor + ?Sized,
    {
        let mask = no_data_mask(&frame.disparity, self.settings.no_data_threshold);
        self.accumulator.accumulate(&shift_image(&mask, self.offset));

        let depth_polygons = extractor.find_polygons(self.accumulator.mask());
        let depth_stats = &mut self.stats[Modality::Depth.index()];
        depth_stats.reset();
        let depth_landmarks = self.filter.filter_with_stats(&depth_polygons, depth_stats);

        let rgb_polygons = extractor.find_polygons(&frame.edges);
        let rgb_stats = &mut self.stats[Modality::Rgb.index()];
        rgb_stats.reset();
        let rgb_landmarks = self.filter.filter_with_stats(&rgb_polygons, rgb_stats);

        debug!(
            "found {} depth landmarks in {} polygons and {} rgb landmarks in {} polygons",
            depth_landmarks.len(),
            depth_polygons.len(),
            rgb_landmarks.len(),
            rgb_polygons.len()
        );

        let matches = self.matcher.match_landmarks(&rgb_landmarks, &depth_landmarks);
        let ranges = self.measure_ranges(&frame.disparity, &depth_landmarks, &matches);

        let outcome = match ranges.complete() {
            Some(ranges) => {
                let solution = self.solver.solve(&self.table, &ranges)?;
                if solution.converged {
                    info!(
                        "located at ({:.3}, {:.3}, {:.3}) after {} iterations",
                        solution.position.x,
                        solution.position.y,
                        solution.position.z,
                        solution.iterations
                    );
                } else {
                    warn!(
                        "position ({:.3}, {:.3}, {:.3}) did not converge, residual {:e}",
                        solution.position.x,
                        solution.position.y,
                        solution.position.z,
                        solution.residual
                    );
                }
                FrameOutcome::Located(solution)
            }
            None => {
                let missing = ranges.missing();
                debug!("{} of {} landmark ranges unknown", missing, ranges.len());
                FrameOutcome::Sparse { missing }
            }
        };

        Ok(FrameReport {
            rgb_landmarks,
            depth_landmarks,
            matches,
            ranges,
            outcome,
        })
    }

    /// Measures the range to each landmark slot whose depth landmark found a color match.
    ///
    /// Depth landmark `i` is taken to be landmark `i` of the table.
    fn measure_ranges(
        &self,
        disparity: &DisparityFrame,
        depth_landmarks: &LandmarkSet,
        matches: &LandmarkMatches,
    ) -> RangeVector {
        let sampler = ShiftedSampler::new(disparity, self.offset);
        let mut ranges = RangeVector::unknown(self.table.len());
        for m in matches {
            if m.depth >= self.table.len() {
                trace!("depth landmark {} has no known position", m.depth);
                continue;
            }
            match self.estimator.estimate(&sampler, &depth_landmarks[m.depth]) {
                Ok(meters) => ranges.set(m.depth, meters),
                Err(e) => debug!("no range to landmark {}: {}", m.depth, e),
            }
        }
        ranges
    }
}
