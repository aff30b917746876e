//! The trained artifact bundle: schema, scaler, forest, and metadata.

use serde::{Deserialize, Serialize};

use crate::forest::RandomForest;
use crate::scaler::StandardScaler;
use crate::schema::FeatureSchema;

// ============================================================================
// Target transform
// ============================================================================

/// Transform applied to emission targets before fitting.
///
/// The forest is fitted in encoded space; predictions pass through
/// [`TargetTransform::decode`] to return to kilograms. The choice is
/// recorded in [`ArtifactMeta`] so prediction always inverts what training
/// actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetTransform {
    /// Fit on raw kilograms.
    Identity,
    /// Fit on `ln(1 + y)`, predict through `exp(v) - 1`. Cannot represent
    /// negative targets, which the trainer rejects up front.
    #[default]
    Log1p,
}

impl TargetTransform {
    /// Map a raw target into fitting space.
    pub fn encode(self, y: f32) -> f32 {
        match self {
            Self::Identity => y,
            Self::Log1p => y.ln_1p(),
        }
    }

    /// Map a model output back to kilograms.
    pub fn decode(self, value: f32) -> f32 {
        match self {
            Self::Identity => value,
            Self::Log1p => value.exp_m1(),
        }
    }
}

// ============================================================================
// Artifact
// ============================================================================

/// Metadata stored with the model payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMeta {
    /// Target transform the forest was fitted under.
    pub target_transform: TargetTransform,
    /// Fingerprint of the schema the model was fitted against.
    pub schema_fingerprint: u32,
    /// Feature width at fit time.
    pub num_features: u32,
    /// Number of training rows the forest saw.
    pub trained_rows: u32,
}

/// Everything needed to turn a survey response into a prediction.
///
/// The three pieces are persisted as separate files (see [`crate::io`]);
/// loading cross-checks that they came from the same training run.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub schema: FeatureSchema,
    pub scaler: StandardScaler,
    pub forest: RandomForest,
    pub meta: ArtifactMeta,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn log1p_roundtrips() {
        let transform = TargetTransform::Log1p;
        for y in [0.0f32, 1.0, 100.0, 2500.0, 80000.0] {
            let back = transform.decode(transform.encode(y));
            assert_approx_eq!(back, y, y.max(1.0) * 1e-5);
        }
    }

    #[test]
    fn identity_is_passthrough() {
        let transform = TargetTransform::Identity;
        assert_eq!(transform.encode(123.5), 123.5);
        assert_eq!(transform.decode(-4.0), -4.0);
    }

    #[test]
    fn log1p_of_zero_is_zero() {
        let transform = TargetTransform::Log1p;
        assert_eq!(transform.encode(0.0), 0.0);
        assert_eq!(transform.decode(0.0), 0.0);
    }

    #[test]
    fn default_is_log1p() {
        assert_eq!(TargetTransform::default(), TargetTransform::Log1p);
    }
}
