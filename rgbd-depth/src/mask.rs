use crate::DisparityFrame;
use image::{GrayImage, Luma};
use log::*;

/// Builds a binary mask that is white wherever the disparity is at or above `threshold`.
///
/// With [`DisparityBand::NO_DATA_THRESHOLD`](crate::DisparityBand::NO_DATA_THRESHOLD) this keeps
/// only the pixels where the sensor saw nothing usable, which is where the ceiling lights are.
pub fn no_data_mask(disparity: &DisparityFrame, threshold: u16) -> GrayImage {
    GrayImage::from_fn(disparity.width(), disparity.height(), |x, y| {
        if disparity.get_pixel(x, y).0[0] >= threshold {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Accumulates the no-data masks of successive frames.
///
/// A single frame's no-data region is noisy, especially while the sensor is moving. Adding
/// several frames (saturating at white) grows the region so that landmark outlines close up.
/// The accumulation must be reset whenever the alignment of the depth image changes.
#[derive(Debug, Clone)]
pub struct MaskAccumulator {
    accumulated: GrayImage,
    frames: usize,
}

impl MaskAccumulator {
    /// Creates an empty (all black) accumulator.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            accumulated: GrayImage::new(width, height),
            frames: 0,
        }
    }

    /// Adds a mask to the accumulation.
    ///
    /// If the mask dimensions differ from the accumulation, the accumulation restarts from it.
    pub fn accumulate(&mut self, mask: &GrayImage) {
        if mask.dimensions() != self.accumulated.dimensions() {
            warn!(
                "mask dimensions changed from {:?} to {:?}, restarting accumulation",
                self.accumulated.dimensions(),
                mask.dimensions()
            );
            self.accumulated = mask.clone();
            self.frames = 1;
            return;
        }
        for (acc, &sample) in self.accumulated.iter_mut().zip(mask.iter()) {
            *acc = acc.saturating_add(sample);
        }
        self.frames += 1;
    }

    /// Clears the accumulation back to black.
    pub fn reset(&mut self) {
        for p in self.accumulated.iter_mut() {
            *p = 0;
        }
        self.frames = 0;
    }

    /// The accumulated mask.
    pub fn mask(&self) -> &GrayImage {
        &self.accumulated
    }

    /// The number of masks accumulated since the last reset.
    pub fn frames(&self) -> usize {
        self.frames
    }
}
