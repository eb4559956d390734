//! Finds ceiling-light landmarks among the polygons extracted from a binary mask and pairs the
//! landmarks found in the depth modality with those found in the color modality.
//!
//! The same [`LandmarkFilter`] is run twice per frame: once on the polygons of the depth
//! "no data" mask and once on the polygons of the color edge mask. The [`LandmarkMatcher`] then
//! decides which depth landmark corresponds to which color landmark.

mod filter;
mod matcher;
mod stats;

pub use filter::*;
pub use matcher::*;
pub use stats::*;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The sensor modality a landmark set was detected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum Modality {
    /// The no-data region of the disparity image.
    Depth,
    /// The edge mask of the color image.
    Rgb,
}

impl Modality {
    /// Both modalities, in the order they are processed each frame.
    pub const ALL: [Modality; 2] = [Modality::Depth, Modality::Rgb];

    pub fn index(self) -> usize {
        match self {
            Modality::Depth => 0,
            Modality::Rgb => 1,
        }
    }
}
