//! Shared helpers for integration tests.
//!
//! For assertion macros and synthetic data, use `footprint::testing`.

#![allow(dead_code)]

use footprint::artifact::{Artifact, TargetTransform};
use footprint::forest::ForestParams;
use footprint::testing::synthetic_frame;
use footprint::training::{TrainReport, Trainer, TrainerParams, Verbosity};

#[allow(unused_imports)]
pub use footprint::testing::{DEFAULT_TOLERANCE, DEFAULT_TOLERANCE_F64};
#[allow(unused_imports)]
pub use footprint::{assert_approx_eq, assert_approx_eq_f64};

/// Train a small artifact on synthetic survey data.
pub fn train_artifact(rows: usize, trees: usize, seed: u64) -> (Artifact, TrainReport) {
    train_artifact_with(rows, trees, seed, TargetTransform::Log1p)
}

/// Train a small artifact with an explicit target transform.
pub fn train_artifact_with(
    rows: usize,
    trees: usize,
    seed: u64,
    transform: TargetTransform,
) -> (Artifact, TrainReport) {
    let frame = synthetic_frame(rows, seed);
    let params = TrainerParams {
        forest: ForestParams {
            num_trees: trees,
            seed,
            ..ForestParams::default()
        },
        target_transform: transform,
        verbosity: Verbosity::Silent,
        ..TrainerParams::default()
    };
    Trainer::new(params)
        .fit(&frame)
        .expect("training on synthetic data should succeed")
}
