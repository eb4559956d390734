use arrayvec::ArrayVec;
use float_ord::FloatOrd;
use log::*;
use rgbd_core::{LandmarkSet, Quadrilateral, LANDMARK_COUNT_MAX};
use rgbd_geom::{centroid, distance, polygon_area};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Match costs closer than this are considered equal.
const COST_TIE: f64 = 1e-9;

/// Pairs of landmark indices, at most one per landmark slot.
pub type LandmarkMatches = ArrayVec<LandmarkMatch, LANDMARK_COUNT_MAX>;

/// A color landmark index paired with a depth landmark index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LandmarkMatch {
    pub rgb: usize,
    pub depth: usize,
}

/// How landmarks detected in the two modalities are paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum MatchStrategy {
    /// Slot `i` of one modality is paired with slot `i` of the other whenever both are valid.
    ///
    /// This breaks as soon as the detection order differs between the modalities.
    Positional,
    /// Pairs are scored by centroid distance and area difference, and only mutual best pairs
    /// within the thresholds are kept. A landmark with two equally good candidates is ambiguous
    /// and left unmatched.
    Similarity,
}

/// Pairs the landmarks of the color modality with the landmarks of the depth modality.
///
/// This struct is marked as `#[non_exhaustive]` to allow the backwards-compatible addition of new fields.
#[derive(Copy, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct LandmarkMatcher {
    pub strategy: MatchStrategy,
    /// Pairs whose areas differ by this many square pixels or more are never matched.
    pub area_difference: f64,
    /// Pairs whose centroids are this many pixels apart or more are never matched.
    pub position_difference: f64,
}

impl LandmarkMatcher {
    /// Creates a similarity matcher with an area threshold of `500` and a position threshold of `100`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a positional matcher.
    pub fn positional() -> Self {
        Self::new().strategy(MatchStrategy::Positional)
    }

    /// Sets the [`LandmarkMatcher::strategy`].
    #[must_use]
    pub fn strategy(self, strategy: MatchStrategy) -> Self {
        Self { strategy, ..self }
    }

    /// Sets the [`LandmarkMatcher::area_difference`].
    #[must_use]
    pub fn area_difference(self, area_difference: f64) -> Self {
        Self {
            area_difference,
            ..self
        }
    }

    /// Sets the [`LandmarkMatcher::position_difference`].
    #[must_use]
    pub fn position_difference(self, position_difference: f64) -> Self {
        Self {
            position_difference,
            ..self
        }
    }

    /// Pairs the landmarks, returning the matches ordered by depth index.
    pub fn match_landmarks(&self, rgb: &LandmarkSet, depth: &LandmarkSet) -> LandmarkMatches {
        let matches = match self.strategy {
            MatchStrategy::Positional => positional(rgb, depth),
            MatchStrategy::Similarity => self.similarity(rgb, depth),
        };
        debug!(
            "matched {} of {} rgb and {} depth landmarks",
            matches.len(),
            rgb.len(),
            depth.len()
        );
        matches
    }

    /// The dissimilarity of two landmarks, or `None` if they are outside the thresholds.
    ///
    /// Each difference is normalized by its threshold, so a perfect match costs `0.0` and the
    /// cost of an acceptable match is always below `2.0`.
    pub fn cost(&self, rgb: &Quadrilateral, depth: &Quadrilateral) -> Option<f64> {
        if !rgb.is_valid() || !depth.is_valid() {
            return None;
        }
        let position = distance(centroid(rgb), centroid(depth))?;
        let area =
            (polygon_area(rgb.vertices()).abs() - polygon_area(depth.vertices()).abs()).abs();
        if position >= self.position_difference || area >= self.area_difference {
            return None;
        }
        Some(position / self.position_difference + area / self.area_difference)
    }

    fn similarity(&self, rgb: &LandmarkSet, depth: &LandmarkSet) -> LandmarkMatches {
        let costs: ArrayVec<ArrayVec<Option<f64>, LANDMARK_COUNT_MAX>, LANDMARK_COUNT_MAX> = rgb
            .iter()
            .map(|r| depth.iter().map(|d| self.cost(r, d)).collect())
            .collect();

        let best_depth_for = |rgb_ix: usize| {
            unique_best(
                (0..depth.len())
                    .filter_map(|depth_ix| costs[rgb_ix][depth_ix].map(|c| (depth_ix, c))),
            )
        };
        let best_rgb_for = |depth_ix: usize| {
            unique_best(
                (0..rgb.len()).filter_map(|rgb_ix| costs[rgb_ix][depth_ix].map(|c| (rgb_ix, c))),
            )
        };

        (0..depth.len())
            .filter_map(|depth_ix| {
                let rgb_ix = best_rgb_for(depth_ix)?;
                if best_depth_for(rgb_ix) == Some(depth_ix) {
                    Some(LandmarkMatch {
                        rgb: rgb_ix,
                        depth: depth_ix,
                    })
                } else {
                    trace!(
                        "depth landmark {} rejected: it is not the unique best for rgb landmark {}",
                        depth_ix,
                        rgb_ix
                    );
                    None
                }
            })
            .collect()
    }
}

impl Default for LandmarkMatcher {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::Similarity,
            area_difference: 500.0,
            position_difference: 100.0,
        }
    }
}

/// Picks the candidate with the lowest cost.
///
/// Returns `None` when there are no candidates or when the two lowest costs are within
/// [`COST_TIE`] of each other, since the pairing would then be arbitrary.
fn unique_best(candidates: impl Iterator<Item = (usize, f64)>) -> Option<usize> {
    let mut candidates: ArrayVec<(usize, f64), LANDMARK_COUNT_MAX> = candidates.collect();
    candidates.sort_unstable_by_key(|&(_, c)| FloatOrd(c));
    match candidates.as_slice() {
        [] => None,
        &[(ix, _)] => Some(ix),
        &[(ix, best), (_, second), ..] => (second - best > COST_TIE).then(|| ix),
    }
}

fn positional(rgb: &LandmarkSet, depth: &LandmarkSet) -> LandmarkMatches {
    (0..rgb.len().min(depth.len()))
        .filter(|&ix| rgb.valid(ix).is_some() && depth.valid(ix).is_some())
        .map(|ix| LandmarkMatch { rgb: ix, depth: ix })
        .collect()
}
