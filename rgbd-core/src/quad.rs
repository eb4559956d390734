use alloc::vec::Vec;
use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};
use nalgebra::Point2;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Whether a [`Quadrilateral`] passed the landmark filter.
///
/// This is not a spatial property. A quadrilateral is only `Valid` once it has been accepted
/// by the 4-vertex, area and convexity checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum Validity {
    Valid,
    Invalid,
}

/// Four ordered vertices in pixel coordinates along with a [`Validity`] flag.
///
/// The X axis points right and the Y axis points down, as with every image in this workspace.
/// Quadrilaterals are never mutated after creation; operations such as dilation produce a new one.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Quadrilateral {
    vertices: [Point2<f64>; 4],
    validity: Validity,
}

impl Quadrilateral {
    /// Creates a [`Validity::Valid`] quadrilateral.
    ///
    /// Only the landmark filter and geometric transforms of already valid quadrilaterals
    /// should call this, since a valid quadrilateral is assumed to have passed the filter.
    pub fn valid(vertices: [Point2<f64>; 4]) -> Self {
        Self {
            vertices,
            validity: Validity::Valid,
        }
    }

    /// Creates an [`Validity::Invalid`] quadrilateral with all vertices at the origin.
    pub fn invalid() -> Self {
        Self {
            vertices: [Point2::origin(); 4],
            validity: Validity::Invalid,
        }
    }

    pub fn validity(&self) -> Validity {
        self.validity
    }

    pub fn is_valid(&self) -> bool {
        self.validity == Validity::Valid
    }

    /// The vertices in their original order.
    pub fn vertices(&self) -> &[Point2<f64>; 4] {
        &self.vertices
    }

    /// Retrieves vertex `index`.
    ///
    /// Panics if `index >= 4`.
    pub fn vertex(&self, index: usize) -> Point2<f64> {
        self.vertices[index]
    }

    /// Applies `f` to every vertex, keeping the validity.
    #[must_use]
    pub fn map_vertices(&self, mut f: impl FnMut(Point2<f64>) -> Point2<f64>) -> Self {
        Self {
            vertices: self.vertices.map(&mut f),
            validity: self.validity,
        }
    }
}

impl Default for Quadrilateral {
    fn default() -> Self {
        Self::invalid()
    }
}

/// A closed polygon as produced by the external contour extraction and polygon approximation.
///
/// The last vertex connects back to the first one. No guarantee is made about the vertex count,
/// winding or convexity; that is what the landmark filter checks.
#[derive(Debug, Clone, PartialEq, Default, AsMut, AsRef, Deref, DerefMut, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Polygon(pub Vec<Point2<f64>>);

impl Polygon {
    /// Builds a polygon from integer pixel coordinates.
    pub fn from_pixels(pixels: impl IntoIterator<Item = (i32, i32)>) -> Self {
        Self(
            pixels
                .into_iter()
                .map(|(x, y)| Point2::new(x as f64, y as f64))
                .collect(),
        )
    }

    /// Gets the vertices as a fixed array if there are exactly 4 of them.
    pub fn as_quad(&self) -> Option<[Point2<f64>; 4]> {
        match self.0.as_slice() {
            &[a, b, c, d] => Some([a, b, c, d]),
            _ => None,
        }
    }
}
