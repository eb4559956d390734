use crate::{Quadrilateral, LANDMARK_COUNT_MAX};
use arrayvec::ArrayVec;
use core::ops::Deref;

/// An ordered, bounded set of landmark [`Quadrilateral`]s detected in one modality of one frame.
///
/// The index of a landmark is its detection order within the frame. Downstream positional
/// matching relies on this order, so the set never reorders its contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSet(ArrayVec<Quadrilateral, LANDMARK_COUNT_MAX>);

impl LandmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a landmark to the end of the set.
    ///
    /// If the set is already at [`LANDMARK_COUNT_MAX`], the landmark is handed back as the error.
    pub fn push(&mut self, landmark: Quadrilateral) -> Result<(), Quadrilateral> {
        self.0.try_push(landmark).map_err(|e| e.element())
    }

    /// Retrieves the landmark in slot `index`, if the slot holds a valid landmark.
    pub fn valid(&self, index: usize) -> Option<&Quadrilateral> {
        self.0.get(index).filter(|quad| quad.is_valid())
    }

    pub fn is_full(&self) -> bool {
        self.0.is_full()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl Deref for LandmarkSet {
    type Target = [Quadrilateral];

    fn deref(&self) -> &[Quadrilateral] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a LandmarkSet {
    type Item = &'a Quadrilateral;
    type IntoIter = core::slice::Iter<'a, Quadrilateral>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
