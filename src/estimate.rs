//! Prediction: survey response to monthly carbon emission.
//!
//! The [`Estimator`] owns a loaded [`Artifact`] and an encoder built from
//! its schema. Every prediction re-checks that the feature row actually
//! belongs to this model before it touches the scaler or the forest.
//!
//! # Example
//!
//! ```ignore
//! use footprint::estimate::Estimator;
//! use footprint::io::ArtifactPaths;
//! use footprint::Artifact;
//!
//! let artifact = Artifact::load(&ArtifactPaths::in_dir("models"))?;
//! let estimator = Estimator::new(artifact)?;
//! let result = estimator.estimate(&response)?;
//! println!("{} kg CO2, {} trees", result.kilograms, result.trees_owed);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::artifact::{Artifact, ArtifactMeta};
use crate::encode::{FeatureEncoder, FeatureVector};
use crate::scaler::ScalerError;
use crate::schema::{FeatureSchema, SchemaError};
use crate::survey::SurveyResponse;

/// Kilograms of CO2 offset by one tree, used for the trees-owed
/// equivalence.
pub const TREE_ABSORPTION_KG: f64 = 411.4;

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug)]
pub enum PredictError {
    /// The feature vector was encoded against a different schema.
    #[error(
        "feature vector fingerprint {got:#010x} does not match model schema {expected:#010x}"
    )]
    FingerprintMismatch { expected: u32, got: u32 },

    /// The feature vector has the wrong width.
    #[error("feature width mismatch: model expects {expected} columns, got {got}")]
    WidthMismatch { expected: usize, got: usize },

    /// Standardization failed.
    #[error(transparent)]
    Scaler(#[from] ScalerError),
}

// ============================================================================
// PredictionResult
// ============================================================================

/// One prediction, in reporting units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Estimated emission in kg CO2 per month, rounded and floored at zero.
    pub kilograms: u32,
    /// Trees needed to offset the estimate: `round(kilograms / 411.4)`.
    pub trees_owed: u32,
    /// Unrounded model output after the target transform is inverted.
    pub raw: f32,
}

// ============================================================================
// Estimator
// ============================================================================

/// A loaded model ready to score survey responses.
#[derive(Debug, Clone)]
pub struct Estimator {
    artifact: Artifact,
    encoder: FeatureEncoder,
}

impl Estimator {
    /// Build an estimator from a loaded artifact.
    ///
    /// Fails if the schema is unusable or the artifact pieces disagree on
    /// feature width.
    pub fn new(artifact: Artifact) -> Result<Self, SchemaError> {
        let encoder = FeatureEncoder::for_schema(&artifact.schema)?;

        let scaler_width = artifact.scaler.num_features().unwrap_or(0);
        if scaler_width != encoder.width() {
            return Err(SchemaError::WidthMismatch {
                expected: encoder.width(),
                got: scaler_width,
            });
        }
        let model_width = artifact.forest.num_features() as usize;
        if model_width != encoder.width() {
            return Err(SchemaError::WidthMismatch {
                expected: encoder.width(),
                got: model_width,
            });
        }

        Ok(Self { artifact, encoder })
    }

    /// Schema the model was fitted against.
    pub fn schema(&self) -> &FeatureSchema {
        &self.artifact.schema
    }

    /// Model metadata.
    pub fn meta(&self) -> &ArtifactMeta {
        &self.artifact.meta
    }

    /// Encode a response with this model's schema.
    pub fn encode(&self, response: &SurveyResponse) -> FeatureVector {
        self.encoder.encode(response)
    }

    /// Score a survey response.
    pub fn estimate(&self, response: &SurveyResponse) -> Result<PredictionResult, PredictError> {
        self.estimate_vector(&self.encode(response))
    }

    /// Score an already encoded feature vector.
    pub fn estimate_vector(
        &self,
        features: &FeatureVector,
    ) -> Result<PredictionResult, PredictError> {
        if features.fingerprint() != self.encoder.fingerprint() {
            return Err(PredictError::FingerprintMismatch {
                expected: self.encoder.fingerprint(),
                got: features.fingerprint(),
            });
        }
        if features.len() != self.encoder.width() {
            return Err(PredictError::WidthMismatch {
                expected: self.encoder.width(),
                got: features.len(),
            });
        }

        let mut row = features.values().to_vec();
        self.artifact.scaler.transform_row(&mut row)?;

        let output = self.artifact.forest.predict_row(&row);
        let raw = self.artifact.meta.target_transform.decode(output);

        let kilograms = raw.round().max(0.0) as u32;
        let trees_owed = (kilograms as f64 / TREE_ABSORPTION_KG).round() as u32;

        Ok(PredictionResult {
            kilograms,
            trees_owed,
            raw,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
