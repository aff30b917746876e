//! Random forest regression.
//!
//! The forest averages fully grown regression trees, each fitted on a
//! bootstrap resample of the training data. Growth is deterministic for a
//! fixed seed: every tree derives its own RNG stream from the forest seed,
//! so the parallel fit yields the same model as a sequential one.
//!
//! # Example
//!
//! ```ignore
//! use footprint::forest::{ForestParams, RandomForest};
//!
//! let params = ForestParams::default();
//! let forest = RandomForest::fit(&data, &targets, &params);
//! let prediction = forest.predict_row(data.row(0));
//! ```

mod grow;
mod tree;

pub use tree::{RegressionTree, TreeBuilder};

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::RowMatrix;
use grow::TreeGrower;

// ============================================================================
// Parameters
// ============================================================================

/// Forest fitting parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestParams {
    /// Number of trees to grow.
    pub num_trees: usize,
    /// Maximum tree depth.
    pub max_depth: usize,
    /// Minimum number of rows required to attempt a split.
    pub min_samples_split: usize,
    /// Minimum number of rows on each side of a split.
    pub min_samples_leaf: usize,
    /// Fraction of features considered per split (1.0 = all).
    pub feature_fraction: f64,
    /// Whether each tree sees a bootstrap resample of the data.
    pub bootstrap: bool,
    /// Seed for the per-tree RNG streams.
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            num_trees: 100,
            max_depth: 32,
            min_samples_split: 2,
            min_samples_leaf: 1,
            feature_fraction: 1.0,
            bootstrap: true,
            seed: 42,
        }
    }
}

// ============================================================================
// RandomForest
// ============================================================================

/// A fitted random forest regressor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
    num_features: u32,
}

impl RandomForest {
    /// Fit a forest on a feature matrix and targets.
    ///
    /// # Panics
    ///
    /// Panics if `targets` does not match the matrix row count, the matrix
    /// is empty, or `params.num_trees` is zero.
    pub fn fit(data: &RowMatrix, targets: &[f32], params: &ForestParams) -> Self {
        assert_eq!(
            targets.len(),
            data.num_rows(),
            "number of targets ({}) must match number of rows ({})",
            targets.len(),
            data.num_rows()
        );
        assert!(data.num_rows() > 0, "cannot fit a forest on zero rows");
        assert!(params.num_trees > 0, "forest must have at least one tree");

        let trees: Vec<RegressionTree> = (0..params.num_trees)
            .into_par_iter()
            .map(|t| {
                let mut rng =
                    Xoshiro256PlusPlus::seed_from_u64(params.seed.wrapping_add(t as u64));
                let mut rows = sample_rows(data.num_rows(), params.bootstrap, &mut rng);
                TreeGrower::new(data, targets, params).grow(&mut rows, &mut rng)
            })
            .collect();

        Self {
            trees,
            num_features: data.num_cols() as u32,
        }
    }

    /// Number of trees in the forest.
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Feature width the forest was fitted on.
    pub fn num_features(&self) -> u32 {
        self.num_features
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Predict a single row: the mean of all tree outputs.
    pub fn predict_row(&self, features: &[f32]) -> f32 {
        debug_assert_eq!(features.len(), self.num_features as usize);
        let sum: f64 = self
            .trees
            .iter()
            .map(|tree| tree.predict_row(features) as f64)
            .sum();
        (sum / self.trees.len() as f64) as f32
    }

    /// Predict every row of a matrix.
    pub fn predict_rows(&self, data: &RowMatrix) -> Vec<f32> {
        (0..data.num_rows())
            .map(|row| self.predict_row(data.row(row)))
            .collect()
    }
}

fn sample_rows(num_rows: usize, bootstrap: bool, rng: &mut Xoshiro256PlusPlus) -> Vec<u32> {
    if bootstrap {
        (0..num_rows)
            .map(|_| rng.gen_range(0..num_rows) as u32)
            .collect()
    } else {
        (0..num_rows as u32).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
