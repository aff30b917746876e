//! Feature schema: the ordered column list a model was fitted against.
//!
//! The schema is persisted alongside the scaler and forest so that encoding
//! at prediction time reproduces the training-time layout exactly, even if
//! the built-in vocabulary changes between releases.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::survey::{
    AirTravel, BodyType, Category, CookingAppliance, Diet, EnergyEfficiency, HeatingSource,
    Recyclable, Sex, ShowerFrequency, SocialActivity, Transport, VehicleType, WasteBagSize,
};

/// Schema layout version understood by this crate.
pub const CURRENT_VERSION: u16 = 1;

/// Numeric column names.
pub const VEHICLE_KM: &str = "vehicle_monthly_km";
pub const WASTE_BAGS: &str = "waste_bags_weekly";
pub const TV_PC_HOURS: &str = "tv_pc_daily_hours";
pub const INTERNET_HOURS: &str = "internet_daily_hours";
pub const GROCERY_BILL: &str = "grocery_bill_monthly";
pub const CLOTHES_MONTHLY: &str = "clothes_monthly";

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("unsupported schema version {got} (this build supports up to {supported})")]
    UnsupportedVersion { supported: u16, got: u16 },
    #[error("schema has no columns")]
    Empty,
    #[error("feature width mismatch: schema has {expected} columns, got {got}")]
    WidthMismatch { expected: usize, got: usize },
}

// ============================================================================
// FeatureSchema
// ============================================================================

/// Ordered list of feature columns.
///
/// Categorical columns are named `field=token`; numeric columns carry the
/// bare field name. Order is significant: position in this list is the
/// feature index seen by the scaler and the forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    version: u16,
    columns: Vec<String>,
}

impl FeatureSchema {
    /// The schema of the built-in survey vocabulary.
    pub fn builtin() -> Self {
        let mut columns = Vec::new();
        push_block(&mut columns, BodyType::ALL);
        push_block(&mut columns, Sex::ALL);
        push_block(&mut columns, Diet::ALL);
        push_block(&mut columns, ShowerFrequency::ALL);
        push_block(&mut columns, SocialActivity::ALL);
        push_block(&mut columns, Transport::ALL);
        // "none" is deliberately absent: no vehicle encodes as all zeros.
        push_block(&mut columns, VehicleType::FUELED);
        columns.push(VEHICLE_KM.to_string());
        push_block(&mut columns, AirTravel::ALL);
        push_block(&mut columns, WasteBagSize::ALL);
        columns.push(WASTE_BAGS.to_string());
        push_block(&mut columns, Recyclable::ALL);
        push_block(&mut columns, HeatingSource::ALL);
        push_block(&mut columns, CookingAppliance::ALL);
        push_block(&mut columns, EnergyEfficiency::ALL);
        columns.push(TV_PC_HOURS.to_string());
        columns.push(INTERNET_HOURS.to_string());
        columns.push(GROCERY_BILL.to_string());
        columns.push(CLOTHES_MONTHLY.to_string());

        Self {
            version: CURRENT_VERSION,
            columns,
        }
    }

    /// Build a schema from a persisted column list.
    pub fn from_columns(version: u16, columns: Vec<String>) -> Self {
        Self { version, columns }
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Index of a column by name.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Stable fingerprint over version and column order. Two schemas agree
    /// on feature layout iff their fingerprints match.
    pub fn fingerprint(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&self.version.to_le_bytes());
        for column in &self.columns {
            hasher.update(column.as_bytes());
            hasher.update(b"\n");
        }
        hasher.finalize()
    }
}

fn push_block<C: Category>(columns: &mut Vec<String>, variants: &[C]) {
    for variant in variants {
        columns.push(variant.column());
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_width() {
        let schema = FeatureSchema::builtin();
        // 4+2+4+4+3+3 one-hots, 5 fueled vehicles, 4+4 one-hots,
        // 4+4+5+3 one-hots, 6 numeric columns.
        assert_eq!(schema.len(), 55);
        assert_eq!(schema.version(), CURRENT_VERSION);
    }

    #[test]
    fn vehicle_none_has_no_column() {
        let schema = FeatureSchema::builtin();
        assert!(schema.position("vehicle_type=none").is_none());
        assert!(schema.position("vehicle_type=petrol").is_some());
    }

    #[test]
    fn numeric_columns_present() {
        let schema = FeatureSchema::builtin();
        for name in [
            VEHICLE_KM,
            WASTE_BAGS,
            TV_PC_HOURS,
            INTERNET_HOURS,
            GROCERY_BILL,
            CLOTHES_MONTHLY,
        ] {
            assert!(schema.position(name).is_some(), "missing column {name}");
        }
    }

    #[test]
    fn columns_are_unique() {
        let schema = FeatureSchema::builtin();
        let mut seen = std::collections::HashSet::new();
        for column in schema.columns() {
            assert!(seen.insert(column.clone()), "duplicate column {column}");
        }
    }

    #[test]
    fn fingerprint_is_order_sensitive() {
        let schema = FeatureSchema::builtin();
        let mut reversed: Vec<String> = schema.columns().to_vec();
        reversed.reverse();
        let other = FeatureSchema::from_columns(schema.version(), reversed);
        assert_ne!(schema.fingerprint(), other.fingerprint());
    }

    #[test]
    fn fingerprint_is_stable() {
        let a = FeatureSchema::builtin();
        let b = FeatureSchema::builtin();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn serde_roundtrip_preserves_fingerprint() {
        let schema = FeatureSchema::builtin();
        let bytes = postcard::to_allocvec(&schema).unwrap();
        let back: FeatureSchema = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(back, schema);
        assert_eq!(back.fingerprint(), schema.fingerprint());
    }
}
