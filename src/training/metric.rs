//! Evaluation metrics for model quality.

// =============================================================================
// Metric trait
// =============================================================================

/// A scalar quality metric over predictions and labels.
pub trait Metric {
    /// Compute the metric. Both slices must have the same length; empty
    /// input evaluates to 0.
    fn evaluate(&self, predictions: &[f32], labels: &[f32]) -> f64;

    /// Short name used in log output.
    fn name(&self) -> &str;
}

// =============================================================================
// RMSE (Root Mean Squared Error)
// =============================================================================

/// Root Mean Squared Error: sqrt(mean((pred - label)²))
///
/// Lower is better.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rmse;

impl Metric for Rmse {
    fn evaluate(&self, predictions: &[f32], labels: &[f32]) -> f64 {
        debug_assert_eq!(predictions.len(), labels.len());

        if predictions.is_empty() {
            return 0.0;
        }

        let mse: f64 = predictions
            .iter()
            .zip(labels.iter())
            .map(|(p, l)| {
                let diff = (*p as f64) - (*l as f64);
                diff * diff
            })
            .sum::<f64>()
            / predictions.len() as f64;

        mse.sqrt()
    }

    fn name(&self) -> &str {
        "rmse"
    }
}

// =============================================================================
// MAE (Mean Absolute Error)
// =============================================================================

/// Mean Absolute Error: mean(|pred - label|)
///
/// Lower is better. More robust to outliers than RMSE.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mae;

impl Metric for Mae {
    fn evaluate(&self, predictions: &[f32], labels: &[f32]) -> f64 {
        debug_assert_eq!(predictions.len(), labels.len());

        if predictions.is_empty() {
            return 0.0;
        }

        predictions
            .iter()
            .zip(labels.iter())
            .map(|(p, l)| ((*p as f64) - (*l as f64)).abs())
            .sum::<f64>()
            / predictions.len() as f64
    }

    fn name(&self) -> &str {
        "mae"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq_f64;

    #[test]
    fn rmse_of_perfect_predictions_is_zero() {
        let values = [1.0f32, 2.0, 3.0];
        assert_eq!(Rmse.evaluate(&values, &values), 0.0);
    }

    #[test]
    fn rmse_known_value() {
        let predictions = [1.0f32, 2.0, 3.0];
        let labels = [2.0f32, 2.0, 5.0];
        // Squared errors: 1, 0, 4 → mean 5/3.
        assert_approx_eq_f64!(
            Rmse.evaluate(&predictions, &labels),
            (5.0f64 / 3.0).sqrt(),
            1e-12
        );
    }

    #[test]
    fn mae_known_value() {
        let predictions = [1.0f32, 2.0, 3.0];
        let labels = [2.0f32, 2.0, 5.0];
        // Absolute errors: 1, 0, 2 → mean 1.
        assert_approx_eq_f64!(Mae.evaluate(&predictions, &labels), 1.0, 1e-12);
    }

    #[test]
    fn empty_input_evaluates_to_zero() {
        assert_eq!(Rmse.evaluate(&[], &[]), 0.0);
        assert_eq!(Mae.evaluate(&[], &[]), 0.0);
    }

    #[test]
    fn metric_names() {
        assert_eq!(Rmse.name(), "rmse");
        assert_eq!(Mae.name(), "mae");
    }
}
