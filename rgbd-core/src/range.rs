use alloc::{vec, vec::Vec};
use derive_more::{AsRef, Deref, From, Into};

/// The distance in meters from the observer to every known landmark for one frame.
///
/// Each slot lines up with a column of the [`LandmarkTable`](crate::LandmarkTable).
/// A slot is `None` when the distance to that landmark could not be measured this frame.
#[derive(Debug, Clone, PartialEq, Default, AsRef, Deref, From, Into)]
pub struct RangeVector(Vec<Option<f64>>);

impl RangeVector {
    /// Creates a range vector with `len` unknown slots.
    pub fn unknown(len: usize) -> Self {
        Self(vec![None; len])
    }

    /// Records the range for slot `index`.
    ///
    /// Ranges that are not strictly positive and finite are recorded as unknown.
    pub fn set(&mut self, index: usize, meters: f64) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = Some(meters).filter(|&m| m.is_finite() && m > 0.0);
        }
    }

    /// Marks the range for slot `index` as unknown.
    pub fn clear(&mut self, index: usize) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = None;
        }
    }

    /// The number of slots whose range is unknown.
    pub fn missing(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_none()).count()
    }

    /// A frame is sparse when at least one range is unknown. Sparse frames are not solved.
    pub fn is_sparse(&self) -> bool {
        self.missing() != 0
    }

    /// Gets every range if none of them is unknown.
    pub fn complete(&self) -> Option<Vec<f64>> {
        self.0.iter().copied().collect()
    }
}
