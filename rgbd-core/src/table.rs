use alloc::vec::Vec;
use nalgebra::{Matrix3xX, Point3};

/// The known world coordinates (in meters) of every landmark, one landmark per column.
///
/// The table is built once from configuration and is immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkTable(Matrix3xX<f64>);

impl LandmarkTable {
    /// Builds the table from a list of landmark positions in slot order.
    pub fn new(positions: &[Point3<f64>]) -> Self {
        if positions.is_empty() {
            return Self(Matrix3xX::zeros(0));
        }
        let columns: Vec<_> = positions.iter().map(|p| p.coords).collect();
        Self(Matrix3xX::from_columns(&columns))
    }

    /// Builds the table from rows of `[x, y, z]` as found in configuration files.
    pub fn from_rows(rows: &[[f64; 3]]) -> Self {
        let positions: Vec<_> = rows.iter().map(|&[x, y, z]| Point3::new(x, y, z)).collect();
        Self::new(&positions)
    }

    /// The reference installation: four ceiling lights at a height of 2.905 meters.
    pub fn reference() -> Self {
        Self::from_rows(&[
            [5.193, 2.438, 2.905],
            [5.193, 0.0, 2.905],
            [3.364, 2.438, 2.905],
            [3.364, 0.0, 2.905],
        ])
    }

    /// The number of landmarks.
    pub fn len(&self) -> usize {
        self.0.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieves the world position of landmark `index`.
    pub fn position(&self, index: usize) -> Option<Point3<f64>> {
        (index < self.len()).then(|| self.0.column(index).into_owned().into())
    }

    pub fn positions(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.0.column_iter().map(|c| c.into_owned().into())
    }

    /// The underlying 3xN matrix.
    pub fn matrix(&self) -> &Matrix3xX<f64> {
        &self.0
    }
}
