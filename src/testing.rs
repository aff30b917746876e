//! Testing utilities.
//!
//! Assertion helpers and deterministic data generators shared by unit
//! tests, integration tests, and benches.
//!
//! # Usage
//!
//! ```ignore
//! use footprint::testing::{sample_response, synthetic_frame};
//! use footprint::assert_approx_eq;
//! ```

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::data::TrainingFrame;
use crate::survey::{
    AirTravel, Category, CookingAppliance, Diet, EnergyEfficiency, HeatingSource, Recyclable, Sex,
    ShowerFrequency, SocialActivity, SurveyResponse, Transport, VehicleType, WasteBagSize,
};

// =============================================================================
// Constants
// =============================================================================

/// Default tolerance for floating point comparisons.
/// This is appropriate for most predictions where values are O(1).
pub const DEFAULT_TOLERANCE: f32 = 1e-5;

/// Same tolerance as f64 for compatibility with test expected values.
pub const DEFAULT_TOLERANCE_F64: f64 = 1e-5;

// =============================================================================
// Floating Point Assertions
// =============================================================================

/// Assert that two f32 values are approximately equal.
///
/// Uses absolute difference comparison; without an explicit tolerance,
/// [`DEFAULT_TOLERANCE`] applies.
///
/// # Panics
///
/// Panics if the absolute difference exceeds tolerance.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr) => {
        $crate::assert_approx_eq!($left, $right, $crate::testing::DEFAULT_TOLERANCE)
    };
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let left_val = $left;
        let right_val = $right;
        let tol = $tolerance;
        let diff = (left_val - right_val).abs();
        if diff > tol {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                left_val, right_val, diff, tol
            );
        }
    }};
    ($left:expr, $right:expr, $tolerance:expr, $($arg:tt)+) => {{
        let left_val = $left;
        let right_val = $right;
        let tol = $tolerance;
        let diff = (left_val - right_val).abs();
        if diff > tol {
            panic!(
                "assertion failed: `(left ≈ right)` - {}\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                format_args!($($arg)+), left_val, right_val, diff, tol
            );
        }
    }};
}

/// Assert that two f64 values are approximately equal.
///
/// Uses absolute difference comparison with the given tolerance.
#[macro_export]
macro_rules! assert_approx_eq_f64 {
    ($left:expr, $right:expr) => {
        $crate::assert_approx_eq_f64!($left, $right, $crate::testing::DEFAULT_TOLERANCE_F64)
    };
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let left_val: f64 = $left;
        let right_val: f64 = $right;
        let tol: f64 = $tolerance;
        let diff = (left_val - right_val).abs();
        if diff > tol {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                left_val, right_val, diff, tol
            );
        }
    }};
    ($left:expr, $right:expr, $tolerance:expr, $($arg:tt)+) => {{
        let left_val: f64 = $left;
        let right_val: f64 = $right;
        let tol: f64 = $tolerance;
        let diff = (left_val - right_val).abs();
        if diff > tol {
            panic!(
                "assertion failed: `(left ≈ right)` - {}\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                format_args!($($arg)+), left_val, right_val, diff, tol
            );
        }
    }};
}

// =============================================================================
// Survey Generators
// =============================================================================

/// A fixed, typical survey response.
pub fn sample_response() -> SurveyResponse {
    SurveyResponse {
        height_cm: Some(175),
        weight_kg: Some(75),
        body_type: None,
        sex: Sex::Female,
        diet: Diet::Pescatarian,
        shower: ShowerFrequency::Daily,
        social_activity: SocialActivity::Sometimes,
        transport: Transport::Public,
        vehicle_type: VehicleType::None,
        vehicle_monthly_km: 210,
        air_travel: AirTravel::Frequently,
        waste_bag_size: WasteBagSize::Large,
        waste_bags_weekly: 4,
        recycles: vec![Recyclable::Metal],
        heating_source: HeatingSource::Coal,
        cooking_with: vec![CookingAppliance::Stove, CookingAppliance::Oven],
        energy_efficiency: EnergyEfficiency::No,
        tv_pc_daily_hours: 7,
        internet_daily_hours: 1,
        grocery_bill_monthly: 230,
        clothes_monthly: 26,
    }
}

fn pick<C: Category, R: Rng>(rng: &mut R) -> C {
    *C::ALL.choose(rng).unwrap()
}

fn pick_many<C: Category, R: Rng>(rng: &mut R) -> Vec<C> {
    C::ALL
        .iter()
        .copied()
        .filter(|_| rng.gen_bool(0.5))
        .collect()
}

/// A random but valid survey response.
pub fn random_response<R: Rng>(rng: &mut R) -> SurveyResponse {
    SurveyResponse {
        height_cm: Some(rng.gen_range(150..=200)),
        weight_kg: Some(rng.gen_range(45..=120)),
        body_type: None,
        sex: pick(rng),
        diet: pick(rng),
        shower: pick(rng),
        social_activity: pick(rng),
        transport: pick(rng),
        vehicle_type: pick(rng),
        vehicle_monthly_km: rng.gen_range(0..=2000),
        air_travel: pick(rng),
        waste_bag_size: pick(rng),
        waste_bags_weekly: rng.gen_range(1..=7),
        recycles: pick_many(rng),
        heating_source: pick(rng),
        cooking_with: pick_many(rng),
        energy_efficiency: pick(rng),
        tv_pc_daily_hours: rng.gen_range(0..=16),
        internet_daily_hours: rng.gen_range(0..=16),
        grocery_bill_monthly: rng.gen_range(50..=300),
        clothes_monthly: rng.gen_range(0..=30),
    }
}

// =============================================================================
// Dataset Generators
// =============================================================================

/// A deterministic synthetic training frame.
///
/// Targets follow a known monotone signal over driving distance, grocery
/// spending, and waste, plus bounded noise, so fitted models have real
/// structure to recover.
pub fn synthetic_frame(rows: usize, seed: u64) -> TrainingFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut responses = Vec::with_capacity(rows);
    let mut targets = Vec::with_capacity(rows);

    for _ in 0..rows {
        let response = random_response(&mut rng);
        let signal = 800.0
            + 0.35 * response.effective_vehicle_km() as f64
            + 1.2 * response.grocery_bill_monthly as f64
            + 60.0 * response.waste_bags_weekly as f64;
        let noise: f64 = rng.gen_range(-60.0..60.0);
        targets.push((signal + noise).max(0.0) as f32);
        responses.push(response);
    }

    TrainingFrame { responses, targets }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approx_eq_macro() {
        assert_approx_eq!(1.0f32, 1.0001f32, 0.001);
        assert_approx_eq!(0.0f32, 0.0f32);
        assert_approx_eq!(-1.5f32, -1.5001f32, 0.001, "testing value");
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn approx_eq_macro_fails() {
        assert_approx_eq!(1.0f32, 2.0f32, 0.1);
    }

    #[test]
    fn approx_eq_f64_macro() {
        assert_approx_eq_f64!(1.0f64, 1.0001f64, 0.001);
        assert_approx_eq_f64!(2.0f64, 2.0f64);
    }

    #[test]
    fn synthetic_frame_is_deterministic() {
        let a = synthetic_frame(20, 5);
        let b = synthetic_frame(20, 5);
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
    }

    #[test]
    fn synthetic_targets_are_valid() {
        let frame = synthetic_frame(50, 1);
        for &target in &frame.targets {
            assert!(target.is_finite());
            assert!(target >= 0.0);
        }
    }

    #[test]
    fn random_responses_vary() {
        let mut rng = StdRng::seed_from_u64(0);
        let a = random_response(&mut rng);
        let b = random_response(&mut rng);
        assert_ne!(a, b);
    }
}
