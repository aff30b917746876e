//! End-to-end training: dataset to artifact.
//!
//! The trainer owns the full pipeline: encode every response against the
//! built-in schema, hold out a validation split, fit the scaler on the
//! training rows only, fit the forest on transformed targets, and report
//! validation error in kilograms.
//!
//! # Example
//!
//! ```ignore
//! use footprint::data::load_training_csv;
//! use footprint::training::{Trainer, TrainerParams};
//!
//! let frame = load_training_csv("survey.csv")?;
//! let (artifact, report) = Trainer::new(TrainerParams::default()).fit(&frame)?;
//! println!("valid rmse: {:.1} kg", report.rmse);
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use thiserror::Error;

use super::logger::{TrainingLogger, Verbosity};
use super::metric::{Mae, Metric, Rmse};
use crate::artifact::{Artifact, ArtifactMeta, TargetTransform};
use crate::data::{RowMatrix, TrainingFrame};
use crate::encode::FeatureEncoder;
use crate::forest::{ForestParams, RandomForest};
use crate::scaler::{ScalerError, StandardScaler};
use crate::schema::{FeatureSchema, SchemaError};

// ============================================================================
// Parameters
// ============================================================================

/// Training pipeline parameters.
#[derive(Debug, Clone)]
pub struct TrainerParams {
    /// Forest fitting parameters.
    pub forest: ForestParams,
    /// Transform applied to emission targets before fitting.
    pub target_transform: TargetTransform,
    /// Fraction of rows held out for validation metrics.
    pub valid_fraction: f64,
    /// Logging verbosity.
    pub verbosity: Verbosity,
}

impl Default for TrainerParams {
    fn default() -> Self {
        Self {
            forest: ForestParams::default(),
            target_transform: TargetTransform::default(),
            valid_fraction: 0.2,
            verbosity: Verbosity::Info,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug)]
pub enum TrainError {
    #[error("training dataset is empty")]
    EmptyDataset,
    #[error("target at dataset row {row} is not finite")]
    NonFiniteTarget { row: usize },
    #[error("target {value} at dataset row {row} is negative, which the log transform cannot represent")]
    NegativeTarget { row: usize, value: f32 },
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Scaler(#[from] ScalerError),
}

// ============================================================================
// TrainReport
// ============================================================================

/// Summary of a completed training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    /// Total dataset rows.
    pub rows: usize,
    /// Rows held out for validation (0 means metrics are on the train set).
    pub valid_rows: usize,
    /// Root mean squared error in kilograms.
    pub rmse: f64,
    /// Mean absolute error in kilograms.
    pub mae: f64,
    /// Trees in the fitted forest.
    pub num_trees: usize,
}

// ============================================================================
// Trainer
// ============================================================================

/// Fits an [`Artifact`] from a [`TrainingFrame`].
#[derive(Debug, Clone)]
pub struct Trainer {
    params: TrainerParams,
    logger: TrainingLogger,
}

impl Trainer {
    pub fn new(params: TrainerParams) -> Self {
        let logger = TrainingLogger::new(params.verbosity);
        Self { params, logger }
    }

    /// Run the training pipeline.
    pub fn fit(&self, frame: &TrainingFrame) -> Result<(Artifact, TrainReport), TrainError> {
        if frame.is_empty() {
            return Err(TrainError::EmptyDataset);
        }
        self.validate_targets(&frame.targets)?;

        let schema = FeatureSchema::builtin();
        let encoder = FeatureEncoder::for_schema(&schema)?;
        self.logger
            .start_training(self.params.forest.num_trees, frame.len());

        let encoded: Vec<Vec<f32>> = frame
            .responses
            .iter()
            .map(|response| encoder.encode(response).into_values())
            .collect();

        let (train_idx, valid_idx) = self.split_indices(frame.len());
        self.logger.log_split(train_idx.len(), valid_idx.len());

        let mut train_data = gather_rows(&encoded, &train_idx);
        let transform = self.params.target_transform;
        let train_targets: Vec<f32> = train_idx
            .iter()
            .map(|&i| transform.encode(frame.targets[i]))
            .collect();

        let mut scaler = StandardScaler::new();
        scaler.fit(&train_data)?;
        scaler.transform(&mut train_data)?;

        let forest = RandomForest::fit(&train_data, &train_targets, &self.params.forest);

        // Metrics are reported in kilograms, on held-out rows when there
        // are any.
        let (prefix, eval_idx, eval_data) = if valid_idx.is_empty() {
            ("train", &train_idx, train_data)
        } else {
            let mut valid_data = gather_rows(&encoded, &valid_idx);
            scaler.transform(&mut valid_data)?;
            ("valid", &valid_idx, valid_data)
        };
        let predictions: Vec<f32> = forest
            .predict_rows(&eval_data)
            .iter()
            .map(|&v| transform.decode(v))
            .collect();
        let labels: Vec<f32> = eval_idx.iter().map(|&i| frame.targets[i]).collect();
        let rmse = Rmse.evaluate(&predictions, &labels);
        let mae = Mae.evaluate(&predictions, &labels);
        self.logger.log_metrics(&[
            (format!("{prefix}-{}", Rmse.name()), rmse),
            (format!("{prefix}-{}", Mae.name()), mae),
        ]);
        self.logger.finish_training();

        let meta = ArtifactMeta {
            target_transform: transform,
            schema_fingerprint: schema.fingerprint(),
            num_features: encoder.width() as u32,
            trained_rows: train_idx.len() as u32,
        };
        let report = TrainReport {
            rows: frame.len(),
            valid_rows: valid_idx.len(),
            rmse,
            mae,
            num_trees: forest.num_trees(),
        };
        let artifact = Artifact {
            schema,
            scaler,
            forest,
            meta,
        };
        Ok((artifact, report))
    }

    fn validate_targets(&self, targets: &[f32]) -> Result<(), TrainError> {
        for (row, &value) in targets.iter().enumerate() {
            if !value.is_finite() {
                return Err(TrainError::NonFiniteTarget { row });
            }
            if self.params.target_transform == TargetTransform::Log1p && value < 0.0 {
                return Err(TrainError::NegativeTarget { row, value });
            }
        }
        Ok(())
    }

    /// Deterministic shuffled split. The validation set is capped so at
    /// least one row always remains for training.
    fn split_indices(&self, rows: usize) -> (Vec<usize>, Vec<usize>) {
        let valid_len = if self.params.valid_fraction > 0.0 {
            ((rows as f64 * self.params.valid_fraction).round() as usize).min(rows - 1)
        } else {
            0
        };
        if valid_len == 0 {
            return ((0..rows).collect(), Vec::new());
        }

        let mut indices: Vec<usize> = (0..rows).collect();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.params.forest.seed);
        indices.shuffle(&mut rng);
        let valid = indices.split_off(rows - valid_len);
        (indices, valid)
    }
}

fn gather_rows(encoded: &[Vec<f32>], indices: &[usize]) -> RowMatrix {
    let rows: Vec<Vec<f32>> = indices.iter().map(|&i| encoded[i].clone()).collect();
    RowMatrix::from_rows(&rows)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::synthetic_frame;

    fn quiet_params(num_trees: usize) -> TrainerParams {
        TrainerParams {
            forest: ForestParams {
                num_trees,
                ..ForestParams::default()
            },
            verbosity: Verbosity::Silent,
            ..TrainerParams::default()
        }
    }

    #[test]
    fn fit_produces_a_consistent_artifact() {
        let frame = synthetic_frame(120, 7);
        let (artifact, report) = Trainer::new(quiet_params(10)).fit(&frame).unwrap();

        let schema = FeatureSchema::builtin();
        assert_eq!(artifact.schema, schema);
        assert_eq!(artifact.meta.schema_fingerprint, schema.fingerprint());
        assert_eq!(artifact.meta.num_features as usize, schema.len());
        assert_eq!(artifact.scaler.num_features(), Some(schema.len()));
        assert_eq!(artifact.forest.num_features() as usize, schema.len());
        assert_eq!(artifact.meta.target_transform, TargetTransform::Log1p);

        assert_eq!(report.rows, 120);
        assert_eq!(report.valid_rows, 24);
        assert_eq!(artifact.meta.trained_rows, 96);
        assert_eq!(report.num_trees, 10);
        assert!(report.rmse.is_finite() && report.rmse >= 0.0);
        assert!(report.mae <= report.rmse + 1e-9);
    }

    #[test]
    fn fit_is_deterministic() {
        let frame = synthetic_frame(80, 3);
        let trainer = Trainer::new(quiet_params(6));
        let (a, report_a) = trainer.fit(&frame).unwrap();
        let (b, report_b) = trainer.fit(&frame).unwrap();
        assert_eq!(a.forest, b.forest);
        assert_eq!(a.scaler, b.scaler);
        assert_eq!(report_a, report_b);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let frame = TrainingFrame {
            responses: Vec::new(),
            targets: Vec::new(),
        };
        let err = Trainer::new(quiet_params(4)).fit(&frame).unwrap_err();
        assert!(matches!(err, TrainError::EmptyDataset));
    }

    #[test]
    fn negative_target_is_rejected_under_log_transform() {
        let mut frame = synthetic_frame(10, 1);
        frame.targets[3] = -1.0;
        let err = Trainer::new(quiet_params(4)).fit(&frame).unwrap_err();
        assert!(matches!(err, TrainError::NegativeTarget { row: 3, .. }));
    }

    #[test]
    fn negative_target_is_allowed_for_identity() {
        let mut frame = synthetic_frame(10, 1);
        frame.targets[3] = -1.0;
        let params = TrainerParams {
            target_transform: TargetTransform::Identity,
            ..quiet_params(4)
        };
        assert!(Trainer::new(params).fit(&frame).is_ok());
    }

    #[test]
    fn non_finite_target_is_rejected() {
        let mut frame = synthetic_frame(10, 1);
        frame.targets[5] = f32::NAN;
        let err = Trainer::new(quiet_params(4)).fit(&frame).unwrap_err();
        assert!(matches!(err, TrainError::NonFiniteTarget { row: 5 }));
    }

    #[test]
    fn zero_valid_fraction_evaluates_on_train() {
        let frame = synthetic_frame(30, 2);
        let params = TrainerParams {
            valid_fraction: 0.0,
            ..quiet_params(4)
        };
        let (artifact, report) = Trainer::new(params).fit(&frame).unwrap();
        assert_eq!(report.valid_rows, 0);
        assert_eq!(artifact.meta.trained_rows, 30);
    }

    #[test]
    fn single_row_trains_without_validation() {
        let frame = synthetic_frame(1, 9);
        let (artifact, report) = Trainer::new(quiet_params(2)).fit(&frame).unwrap();
        assert_eq!(report.valid_rows, 0);
        assert_eq!(artifact.meta.trained_rows, 1);
    }

    #[test]
    fn full_forest_beats_the_mean_baseline() {
        let frame = synthetic_frame(200, 11);
        let (_, report) = Trainer::new(quiet_params(30)).fit(&frame).unwrap();

        // RMSE of predicting the global mean for every row.
        let mean: f64 =
            frame.targets.iter().map(|&t| t as f64).sum::<f64>() / frame.targets.len() as f64;
        let baseline: f64 = (frame
            .targets
            .iter()
            .map(|&t| (t as f64 - mean) * (t as f64 - mean))
            .sum::<f64>()
            / frame.targets.len() as f64)
            .sqrt();

        assert!(
            report.rmse < baseline,
            "rmse {} should beat baseline {}",
            report.rmse,
            baseline
        );
    }
}
