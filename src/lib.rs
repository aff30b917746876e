//! footprint: lifestyle-survey carbon emission estimation.
//!
//! This crate turns a typed lifestyle survey into a monthly CO2 estimate:
//! responses are one-hot encoded against a versioned feature schema,
//! standardized with a fitted scaler, and scored by a random forest
//! regressor trained on survey data.
//!
//! # Key Types
//!
//! - [`SurveyResponse`] - One respondent's typed answers
//! - [`FeatureSchema`] / [`FeatureEncoder`] - Column layout and one-hot encoding
//! - [`Trainer`] / [`TrainerParams`] - Fit a scaler and forest from a CSV
//! - [`Artifact`] - The persistable schema + scaler + forest bundle
//! - [`Estimator`] - Score responses against a loaded artifact
//!
//! # Training
//!
//! Load a survey CSV with [`data::load_training_csv`], then fit with
//! [`Trainer::fit`]. The resulting [`Artifact`] saves to three files via
//! [`Artifact::save`] and reloads with [`Artifact::load`].
//!
//! # Prediction
//!
//! Wrap a loaded [`Artifact`] in an [`Estimator`] and call
//! [`Estimator::estimate`] to get kilograms of CO2 per month and the
//! equivalent number of trees.

pub mod artifact;
pub mod cli;
pub mod commands;
pub mod data;
pub mod encode;
pub mod estimate;
pub mod forest;
pub mod io;
pub mod scaler;
pub mod schema;
pub mod survey;
pub mod testing;
pub mod training;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Survey and feature layout
pub use encode::{FeatureEncoder, FeatureVector};
pub use schema::FeatureSchema;
pub use survey::SurveyResponse;

// Model components
pub use artifact::{Artifact, ArtifactMeta, TargetTransform};
pub use forest::{ForestParams, RandomForest};
pub use scaler::StandardScaler;

// Training and scoring
pub use data::TrainingFrame;
pub use estimate::{Estimator, PredictionResult};
pub use training::{TrainReport, Trainer, TrainerParams};
