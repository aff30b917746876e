//! Feature standardization.
//!
//! [`StandardScaler`] is fitted on the training matrix and persisted with
//! the model, so predictions standardize features with the training-time
//! statistics rather than recomputing them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::RowMatrix;

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScalerError {
    #[error("scaler is not fitted")]
    NotFitted,
    #[error("feature width mismatch: scaler was fitted on {expected} columns, got {got}")]
    WidthMismatch { expected: usize, got: usize },
    #[error("cannot fit scaler on an empty matrix")]
    EmptyFit,
}

// ============================================================================
// StandardScaler
// ============================================================================

/// Per-column standardization to zero mean and unit variance.
///
/// Statistics are stored as `Option` so an unfitted scaler is representable
/// and rejected explicitly rather than silently transforming with garbage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Option<Vec<f32>>,
    std: Option<Vec<f32>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of columns this scaler was fitted on, if fitted.
    pub fn num_features(&self) -> Option<usize> {
        self.mean.as_ref().map(Vec::len)
    }

    pub fn mean(&self) -> Option<&[f32]> {
        self.mean.as_deref()
    }

    pub fn std(&self) -> Option<&[f32]> {
        self.std.as_deref()
    }

    /// Compute per-column mean and standard deviation.
    ///
    /// Accumulates in f64; a constant column gets standard deviation 1 so
    /// its transform is a plain mean shift instead of a division by zero.
    pub fn fit(&mut self, data: &RowMatrix) -> Result<(), ScalerError> {
        if data.num_rows() == 0 || data.num_cols() == 0 {
            return Err(ScalerError::EmptyFit);
        }
        let num_rows = data.num_rows();
        let num_cols = data.num_cols();

        let mut sums = vec![0.0f64; num_cols];
        for row in 0..num_rows {
            for (sum, &value) in sums.iter_mut().zip(data.row(row)) {
                *sum += value as f64;
            }
        }
        let mean: Vec<f64> = sums.iter().map(|s| s / num_rows as f64).collect();

        let mut squared = vec![0.0f64; num_cols];
        for row in 0..num_rows {
            for (col, &value) in data.row(row).iter().enumerate() {
                let delta = value as f64 - mean[col];
                squared[col] += delta * delta;
            }
        }
        let std: Vec<f32> = squared
            .iter()
            .map(|&sq| {
                let var = sq / num_rows as f64;
                if var > 0.0 {
                    var.sqrt() as f32
                } else {
                    1.0
                }
            })
            .collect();

        self.mean = Some(mean.iter().map(|&m| m as f32).collect());
        self.std = Some(std);
        Ok(())
    }

    /// Standardize every row of a matrix in place.
    pub fn transform(&self, data: &mut RowMatrix) -> Result<(), ScalerError> {
        let expected = self.num_features().ok_or(ScalerError::NotFitted)?;
        if data.num_cols() != expected {
            return Err(ScalerError::WidthMismatch {
                expected,
                got: data.num_cols(),
            });
        }
        for row in 0..data.num_rows() {
            self.transform_row(data.row_mut(row))?;
        }
        Ok(())
    }

    /// Standardize a single row in place.
    pub fn transform_row(&self, row: &mut [f32]) -> Result<(), ScalerError> {
        let (mean, std) = match (&self.mean, &self.std) {
            (Some(mean), Some(std)) => (mean, std),
            _ => return Err(ScalerError::NotFitted),
        };
        if row.len() != mean.len() {
            return Err(ScalerError::WidthMismatch {
                expected: mean.len(),
                got: row.len(),
            });
        }
        for ((value, &m), &s) in row.iter_mut().zip(mean).zip(std) {
            *value = (*value - m) / s;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
