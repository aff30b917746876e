//! Dense row-major feature matrix.

/// Row-major `f32` matrix backing training and batch prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct RowMatrix {
    data: Vec<f32>,
    num_rows: usize,
    num_cols: usize,
}

impl RowMatrix {
    /// Wrap a flat row-major buffer.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != num_rows * num_cols`.
    pub fn from_vec(data: Vec<f32>, num_rows: usize, num_cols: usize) -> Self {
        assert_eq!(
            data.len(),
            num_rows * num_cols,
            "matrix data length {} does not match {}x{}",
            data.len(),
            num_rows,
            num_cols
        );
        Self {
            data,
            num_rows,
            num_cols,
        }
    }

    /// Build a matrix from encoded rows of uniform width.
    ///
    /// # Panics
    ///
    /// Panics if row widths differ.
    pub fn from_rows(rows: &[Vec<f32>]) -> Self {
        let num_rows = rows.len();
        let num_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(num_rows * num_cols);
        for row in rows {
            assert_eq!(row.len(), num_cols, "ragged row in matrix");
            data.extend_from_slice(row);
        }
        Self {
            data,
            num_rows,
            num_cols,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.num_cols;
        &self.data[start..start + self.num_cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f32] {
        let start = row * self.num_cols;
        &mut self.data[start..start + self.num_cols]
    }
}
