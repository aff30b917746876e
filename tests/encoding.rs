//! Integration tests for the survey-to-feature-vector path.

use footprint::encode::FeatureEncoder;
use footprint::schema::{self, FeatureSchema};
use footprint::survey::{Category, SurveyResponse, Transport, VehicleType};
use footprint::testing::sample_response;

fn encode(response: &SurveyResponse) -> (FeatureSchema, Vec<f32>) {
    let schema = FeatureSchema::builtin();
    let encoder = FeatureEncoder::for_schema(&schema).unwrap();
    let values = encoder.encode(response).into_values();
    (schema, values)
}

fn value_at(schema: &FeatureSchema, values: &[f32], column: &str) -> f32 {
    let idx = schema
        .position(column)
        .unwrap_or_else(|| panic!("column {column} not in schema"));
    values[idx]
}

// ============================================================================
// Column Placement
// ============================================================================

#[test]
fn categorical_and_numeric_columns_line_up() {
    let (schema, values) = encode(&sample_response());
    assert_eq!(values.len(), schema.len());

    assert_eq!(value_at(&schema, &values, "sex=female"), 1.0);
    assert_eq!(value_at(&schema, &values, "sex=male"), 0.0);
    assert_eq!(value_at(&schema, &values, "diet=pescatarian"), 1.0);
    assert_eq!(value_at(&schema, &values, "transport=public"), 1.0);
    assert_eq!(value_at(&schema, &values, "recycles=metal"), 1.0);
    assert_eq!(value_at(&schema, &values, "recycles=plastic"), 0.0);
    assert_eq!(value_at(&schema, &values, "cooking_with=stove"), 1.0);
    assert_eq!(value_at(&schema, &values, "cooking_with=oven"), 1.0);
    assert_eq!(value_at(&schema, &values, "cooking_with=microwave"), 0.0);

    assert_eq!(value_at(&schema, &values, schema::VEHICLE_KM), 210.0);
    assert_eq!(value_at(&schema, &values, schema::WASTE_BAGS), 4.0);
    assert_eq!(value_at(&schema, &values, schema::GROCERY_BILL), 230.0);
    assert_eq!(value_at(&schema, &values, schema::CLOTHES_MONTHLY), 26.0);
}

// ============================================================================
// Derived Fields
// ============================================================================

#[test]
fn bmi_buckets_drive_the_body_type_block() {
    let mut response = sample_response();
    response.height_cm = Some(175);
    response.weight_kg = Some(75);
    let (schema, values) = encode(&response);
    // 75 kg at 1.75 m is a BMI just under 25.
    assert_eq!(value_at(&schema, &values, "body_type=normal"), 1.0);
    assert_eq!(value_at(&schema, &values, "body_type=obese"), 0.0);

    // 95 kg at 1.75 m is a BMI just over 31.
    response.weight_kg = Some(95);
    let (schema, values) = encode(&response);
    assert_eq!(value_at(&schema, &values, "body_type=obese"), 1.0);
    assert_eq!(value_at(&schema, &values, "body_type=normal"), 0.0);
}

#[test]
fn absent_body_measurements_fall_to_obese() {
    let mut response = sample_response();
    response.height_cm = None;
    response.weight_kg = None;
    let (schema, values) = encode(&response);
    assert_eq!(value_at(&schema, &values, "body_type=obese"), 1.0);
    assert_eq!(value_at(&schema, &values, "body_type=normal"), 0.0);
}

#[test]
fn vehicle_block_follows_transport_mode() {
    let mut response = sample_response();
    response.transport = Transport::Private;
    response.vehicle_type = VehicleType::Petrol;
    response.vehicle_monthly_km = 500;

    let (schema, values) = encode(&response);
    assert_eq!(value_at(&schema, &values, "vehicle_type=petrol"), 1.0);
    assert_eq!(value_at(&schema, &values, schema::VEHICLE_KM), 500.0);

    // Public transport voids the vehicle but keeps the distance.
    response.transport = Transport::Public;
    let (schema, values) = encode(&response);
    for vehicle in VehicleType::FUELED {
        let column = format!("vehicle_type={}", vehicle.key());
        assert_eq!(value_at(&schema, &values, &column), 0.0);
    }
    assert_eq!(value_at(&schema, &values, schema::VEHICLE_KM), 500.0);

    // Walking or cycling also zeroes the distance.
    response.transport = Transport::WalkBicycle;
    let (schema, values) = encode(&response);
    assert_eq!(value_at(&schema, &values, schema::VEHICLE_KM), 0.0);
}

#[test]
fn vectors_carry_the_schema_fingerprint() {
    let schema = FeatureSchema::builtin();
    let encoder = FeatureEncoder::for_schema(&schema).unwrap();
    let vector = encoder.encode(&sample_response());
    assert_eq!(vector.fingerprint(), schema.fingerprint());
    assert_eq!(encoder.fingerprint(), schema.fingerprint());
}
