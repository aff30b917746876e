//! Survey-to-feature encoding.
//!
//! The encoder turns a typed [`SurveyResponse`] into the dense row layout a
//! model was fitted against. Each response first becomes a sparse set of
//! `(column, value)` pairs, which is then aligned to the schema: pairs whose
//! column the schema does not know are dropped, columns the response does
//! not activate stay zero.
//!
//! # Example
//!
//! ```ignore
//! use footprint::encode::FeatureEncoder;
//! use footprint::schema::FeatureSchema;
//!
//! let schema = FeatureSchema::builtin();
//! let encoder = FeatureEncoder::for_schema(&schema)?;
//! let features = encoder.encode(&response);
//! assert_eq!(features.len(), schema.len());
//! ```

use std::collections::HashMap;

use crate::schema::{self, FeatureSchema, SchemaError, CURRENT_VERSION};
use crate::survey::{Category, SurveyResponse};

// ============================================================================
// FeatureVector
// ============================================================================

/// A dense encoded row, stamped with the fingerprint of the schema that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f32>,
    fingerprint: u32,
}

impl FeatureVector {
    pub fn new(values: Vec<f32>, fingerprint: u32) -> Self {
        Self {
            values,
            fingerprint,
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fingerprint of the schema this row was encoded against.
    pub fn fingerprint(&self) -> u32 {
        self.fingerprint
    }
}

// ============================================================================
// FeatureEncoder
// ============================================================================

/// Encodes survey responses into the row layout of one fixed schema.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    index: HashMap<String, usize>,
    width: usize,
    fingerprint: u32,
}

impl FeatureEncoder {
    /// Build an encoder for a schema.
    ///
    /// Fails only when the schema is unusable outright: empty, or written
    /// by a newer layout version than this build understands. Columns the
    /// built-in vocabulary no longer produces are simply left at zero.
    pub fn for_schema(schema: &FeatureSchema) -> Result<Self, SchemaError> {
        if schema.version() > CURRENT_VERSION {
            return Err(SchemaError::UnsupportedVersion {
                supported: CURRENT_VERSION,
                got: schema.version(),
            });
        }
        if schema.is_empty() {
            return Err(SchemaError::Empty);
        }

        let index = schema
            .columns()
            .iter()
            .enumerate()
            .map(|(i, column)| (column.clone(), i))
            .collect();

        Ok(Self {
            index,
            width: schema.len(),
            fingerprint: schema.fingerprint(),
        })
    }

    /// Width of the rows this encoder produces.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Fingerprint of the schema this encoder was built from.
    pub fn fingerprint(&self) -> u32 {
        self.fingerprint
    }

    /// Encode one response.
    pub fn encode(&self, response: &SurveyResponse) -> FeatureVector {
        let mut values = vec![0.0f32; self.width];
        for (column, value) in self.raw_pairs(response) {
            if let Some(&i) = self.index.get(&column) {
                values[i] = value;
            }
        }
        FeatureVector::new(values, self.fingerprint)
    }

    /// Sparse feature pairs for a response, before schema alignment.
    ///
    /// Note this can emit columns the schema drops: `vehicle_type=none` is
    /// produced for respondents without a vehicle and discarded during
    /// alignment, leaving the vehicle block all zero.
    fn raw_pairs(&self, response: &SurveyResponse) -> Vec<(String, f32)> {
        let mut pairs = Vec::with_capacity(24);

        pairs.push((response.effective_body_type().column(), 1.0));
        pairs.push((response.sex.column(), 1.0));
        pairs.push((response.diet.column(), 1.0));
        pairs.push((response.shower.column(), 1.0));
        pairs.push((response.social_activity.column(), 1.0));
        pairs.push((response.transport.column(), 1.0));
        pairs.push((response.effective_vehicle().column(), 1.0));
        pairs.push((
            schema::VEHICLE_KM.to_string(),
            response.effective_vehicle_km() as f32,
        ));
        pairs.push((response.air_travel.column(), 1.0));
        pairs.push((response.waste_bag_size.column(), 1.0));
        pairs.push((
            schema::WASTE_BAGS.to_string(),
            response.waste_bags_weekly as f32,
        ));
        for material in &response.recycles {
            pairs.push((material.column(), 1.0));
        }
        pairs.push((response.heating_source.column(), 1.0));
        for appliance in &response.cooking_with {
            pairs.push((appliance.column(), 1.0));
        }
        pairs.push((response.energy_efficiency.column(), 1.0));
        pairs.push((
            schema::TV_PC_HOURS.to_string(),
            response.tv_pc_daily_hours as f32,
        ));
        pairs.push((
            schema::INTERNET_HOURS.to_string(),
            response.internet_daily_hours as f32,
        ));
        pairs.push((
            schema::GROCERY_BILL.to_string(),
            response.grocery_bill_monthly as f32,
        ));
        pairs.push((
            schema::CLOTHES_MONTHLY.to_string(),
            response.clothes_monthly as f32,
        ));

        pairs
    }
}

// ============================================================================
// Tests
// ============================================================================
