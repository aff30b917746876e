//! Training dataset loading.
//!
//! Reads the survey CSV export (original column headers, Python-list
//! multi-select cells) into typed rows. Columns are resolved by name, so
//! the file may order them freely; unknown extra columns are ignored.

use std::path::Path;

use thiserror::Error;

use crate::survey::{
    AirTravel, BodyType, Category, CookingAppliance, Diet, EnergyEfficiency, HeatingSource,
    Recyclable, Sex, ShowerFrequency, SocialActivity, SurveyResponse, Transport, VehicleType,
    WasteBagSize,
};

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug)]
pub enum DatasetLoadError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),
    #[error("invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("dataset contains no rows")]
    Empty,
}

// ============================================================================
// TrainingFrame
// ============================================================================

/// Parsed training data: one response and one emission target per row.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingFrame {
    pub responses: Vec<SurveyResponse>,
    pub targets: Vec<f32>,
}

impl TrainingFrame {
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

// ============================================================================
// CSV loading
// ============================================================================

const COL_BODY_TYPE: &str = "Body Type";
const COL_SEX: &str = "Sex";
const COL_DIET: &str = "Diet";
const COL_SHOWER: &str = "How Often Shower";
const COL_HEATING: &str = "Heating Energy Source";
const COL_TRANSPORT: &str = "Transport";
const COL_VEHICLE_TYPE: &str = "Vehicle Type";
const COL_SOCIAL: &str = "Social Activity";
const COL_GROCERY: &str = "Monthly Grocery Bill";
const COL_AIR_TRAVEL: &str = "Frequency of Traveling by Air";
const COL_VEHICLE_KM: &str = "Vehicle Monthly Distance Km";
const COL_BAG_SIZE: &str = "Waste Bag Size";
const COL_BAG_COUNT: &str = "Waste Bag Weekly Count";
const COL_TV_PC: &str = "How Long TV PC Daily Hour";
const COL_CLOTHES: &str = "How Many New Clothes Monthly";
const COL_INTERNET: &str = "How Long Internet Daily Hour";
const COL_EFFICIENCY: &str = "Energy efficiency";
const COL_RECYCLING: &str = "Recycling";
const COL_COOKING: &str = "Cooking_With";
const COL_TARGET: &str = "CarbonEmission";

struct ColumnMap {
    body_type: usize,
    sex: usize,
    diet: usize,
    shower: usize,
    heating: usize,
    transport: usize,
    vehicle_type: usize,
    social: usize,
    grocery: usize,
    air_travel: usize,
    vehicle_km: usize,
    bag_size: usize,
    bag_count: usize,
    tv_pc: usize,
    clothes: usize,
    internet: usize,
    efficiency: usize,
    recycling: usize,
    cooking: usize,
    target: usize,
}

impl ColumnMap {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, DatasetLoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DatasetLoadError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            body_type: find(COL_BODY_TYPE)?,
            sex: find(COL_SEX)?,
            diet: find(COL_DIET)?,
            shower: find(COL_SHOWER)?,
            heating: find(COL_HEATING)?,
            transport: find(COL_TRANSPORT)?,
            vehicle_type: find(COL_VEHICLE_TYPE)?,
            social: find(COL_SOCIAL)?,
            grocery: find(COL_GROCERY)?,
            air_travel: find(COL_AIR_TRAVEL)?,
            vehicle_km: find(COL_VEHICLE_KM)?,
            bag_size: find(COL_BAG_SIZE)?,
            bag_count: find(COL_BAG_COUNT)?,
            tv_pc: find(COL_TV_PC)?,
            clothes: find(COL_CLOTHES)?,
            internet: find(COL_INTERNET)?,
            efficiency: find(COL_EFFICIENCY)?,
            recycling: find(COL_RECYCLING)?,
            cooking: find(COL_COOKING)?,
            target: find(COL_TARGET)?,
        })
    }
}

/// Load the survey training CSV.
///
/// Rows in error messages are 1-based file lines, so the first data row is
/// row 2.
pub fn load_training_csv<P: AsRef<Path>>(path: P) -> Result<TrainingFrame, DatasetLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;
    let columns = ColumnMap::resolve(reader.headers()?)?;

    let mut responses = Vec::new();
    let mut targets = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 2;
        responses.push(parse_response(row, &record, &columns)?);
        targets.push(parse_target(
            row,
            COL_TARGET,
            record.get(columns.target).unwrap_or(""),
        )?);
    }

    if responses.is_empty() {
        return Err(DatasetLoadError::Empty);
    }
    Ok(TrainingFrame { responses, targets })
}

fn parse_response(
    row: usize,
    record: &csv::StringRecord,
    columns: &ColumnMap,
) -> Result<SurveyResponse, DatasetLoadError> {
    let field = |idx: usize| record.get(idx).unwrap_or("");

    Ok(SurveyResponse {
        // Labeled rows carry the bucket directly; measurements are not
        // part of the dataset.
        height_cm: None,
        weight_kg: None,
        body_type: Some(parse_category::<BodyType>(
            row,
            COL_BODY_TYPE,
            field(columns.body_type),
        )?),
        sex: parse_category::<Sex>(row, COL_SEX, field(columns.sex))?,
        diet: parse_category::<Diet>(row, COL_DIET, field(columns.diet))?,
        shower: parse_category::<ShowerFrequency>(row, COL_SHOWER, field(columns.shower))?,
        social_activity: parse_category::<SocialActivity>(row, COL_SOCIAL, field(columns.social))?,
        transport: parse_category::<Transport>(row, COL_TRANSPORT, field(columns.transport))?,
        vehicle_type: parse_vehicle(row, field(columns.vehicle_type))?,
        vehicle_monthly_km: parse_count(row, COL_VEHICLE_KM, field(columns.vehicle_km))?,
        air_travel: parse_category::<AirTravel>(row, COL_AIR_TRAVEL, field(columns.air_travel))?,
        waste_bag_size: parse_category::<WasteBagSize>(row, COL_BAG_SIZE, field(columns.bag_size))?,
        waste_bags_weekly: parse_count(row, COL_BAG_COUNT, field(columns.bag_count))?,
        recycles: parse_multi::<Recyclable>(row, COL_RECYCLING, field(columns.recycling))?,
        heating_source: parse_category::<HeatingSource>(row, COL_HEATING, field(columns.heating))?,
        cooking_with: parse_multi::<CookingAppliance>(row, COL_COOKING, field(columns.cooking))?,
        energy_efficiency: parse_category::<EnergyEfficiency>(
            row,
            COL_EFFICIENCY,
            field(columns.efficiency),
        )?,
        tv_pc_daily_hours: parse_count(row, COL_TV_PC, field(columns.tv_pc))?,
        internet_daily_hours: parse_count(row, COL_INTERNET, field(columns.internet))?,
        grocery_bill_monthly: parse_count(row, COL_GROCERY, field(columns.grocery))?,
        clothes_monthly: parse_count(row, COL_CLOTHES, field(columns.clothes))?,
    })
}

fn parse_category<C: Category>(
    row: usize,
    column: &'static str,
    value: &str,
) -> Result<C, DatasetLoadError> {
    C::from_label(value).ok_or_else(|| DatasetLoadError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    })
}

/// Vehicle type cells are blank (pandas NaN) for respondents without a
/// private vehicle.
fn parse_vehicle(row: usize, value: &str) -> Result<VehicleType, DatasetLoadError> {
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Ok(VehicleType::None);
    }
    parse_category::<VehicleType>(row, COL_VEHICLE_TYPE, value)
}

fn parse_count(row: usize, column: &'static str, value: &str) -> Result<u32, DatasetLoadError> {
    let invalid = || DatasetLoadError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    };
    let parsed: f64 = value.parse().map_err(|_| invalid())?;
    if !parsed.is_finite() || parsed < 0.0 || parsed > u32::MAX as f64 {
        return Err(invalid());
    }
    Ok(parsed.round() as u32)
}

fn parse_target(row: usize, column: &'static str, value: &str) -> Result<f32, DatasetLoadError> {
    let parsed: f32 = value.parse().map_err(|_| DatasetLoadError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    })?;
    if !parsed.is_finite() {
        return Err(DatasetLoadError::InvalidValue {
            row,
            column,
            value: value.to_string(),
        });
    }
    Ok(parsed)
}

/// Multi-select cells are serialized Python lists: `['Paper', 'Plastic']`.
fn parse_multi<C: Category>(
    row: usize,
    column: &'static str,
    value: &str,
) -> Result<Vec<C>, DatasetLoadError> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '\'' | '"'))
        .collect();
    let mut items = Vec::new();
    for item in cleaned.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        items.push(parse_category::<C>(row, column, item)?);
    }
    Ok(items)
}

// ============================================================================
// Tests
// ============================================================================
