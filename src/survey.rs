//! Typed survey response model.
//!
//! Every categorical answer is a closed enum, so an out-of-vocabulary value
//! is rejected at the deserialization boundary instead of surfacing later as
//! a mis-encoded feature. Numeric answers are unsigned, which makes the
//! non-negativity constraints type invariants.
//!
//! # Example
//!
//! ```ignore
//! use footprint::survey::{SurveyResponse, Transport, VehicleType};
//!
//! let response: SurveyResponse = serde_json::from_str(json)?;
//! assert_eq!(response.effective_vehicle(), VehicleType::None);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Category trait
// ============================================================================

/// A closed categorical answer.
///
/// Categories know their schema field name and a stable token per variant;
/// together these form the one-hot column names (`field=token`).
pub trait Category: Copy + Eq + Sized + 'static {
    /// Schema field this category encodes under.
    const FIELD: &'static str;

    /// All variants, in schema order.
    const ALL: &'static [Self];

    /// Stable token used in column names and JSON.
    fn key(self) -> &'static str;

    /// One-hot column name for this variant.
    fn column(self) -> String {
        format!("{}={}", Self::FIELD, self.key())
    }

    /// Parse a raw label in any common spelling ("walk/bicycle",
    /// "Very Frequently", "natural gas").
    fn from_label(label: &str) -> Option<Self> {
        let token = normalize_label(label);
        Self::ALL.iter().copied().find(|v| v.key() == token)
    }
}

/// Reduce a label to the token alphabet: lowercase ASCII with `_` separators.
fn normalize_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .filter_map(|c| match c {
            ' ' | '/' | '-' | '_' => Some('_'),
            c if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Categorical vocabularies
// ============================================================================

/// Body type bucket derived from BMI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl Category for BodyType {
    const FIELD: &'static str = "body_type";
    const ALL: &'static [Self] = &[
        Self::Underweight,
        Self::Normal,
        Self::Overweight,
        Self::Obese,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Underweight => "underweight",
            Self::Normal => "normal",
            Self::Overweight => "overweight",
            Self::Obese => "obese",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Female,
    Male,
}

impl Category for Sex {
    const FIELD: &'static str = "sex";
    const ALL: &'static [Self] = &[Self::Female, Self::Male];

    fn key(self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diet {
    Omnivore,
    Pescatarian,
    Vegetarian,
    Vegan,
}

impl Category for Diet {
    const FIELD: &'static str = "diet";
    const ALL: &'static [Self] = &[
        Self::Omnivore,
        Self::Pescatarian,
        Self::Vegetarian,
        Self::Vegan,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Omnivore => "omnivore",
            Self::Pescatarian => "pescatarian",
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
        }
    }
}

/// Shower frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowerFrequency {
    Daily,
    TwiceADay,
    MoreFrequently,
    LessFrequently,
}

impl Category for ShowerFrequency {
    const FIELD: &'static str = "shower";
    const ALL: &'static [Self] = &[
        Self::Daily,
        Self::TwiceADay,
        Self::MoreFrequently,
        Self::LessFrequently,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::TwiceADay => "twice_a_day",
            Self::MoreFrequently => "more_frequently",
            Self::LessFrequently => "less_frequently",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialActivity {
    Never,
    Often,
    Sometimes,
}

impl Category for SocialActivity {
    const FIELD: &'static str = "social_activity";
    const ALL: &'static [Self] = &[Self::Never, Self::Often, Self::Sometimes];

    fn key(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Often => "often",
            Self::Sometimes => "sometimes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    Public,
    Private,
    WalkBicycle,
}

impl Category for Transport {
    const FIELD: &'static str = "transport";
    const ALL: &'static [Self] = &[Self::Public, Self::Private, Self::WalkBicycle];

    fn key(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::WalkBicycle => "walk_bicycle",
        }
    }
}

/// Vehicle fuel category.
///
/// `None` is the answer for respondents without a private vehicle; it has no
/// schema column of its own, so it encodes as an all-zero vehicle block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Petrol,
    Diesel,
    Hybrid,
    Lpg,
    Electric,
    #[default]
    None,
}

impl VehicleType {
    /// Variants that exist as schema columns.
    pub const FUELED: &'static [Self] = &[
        Self::Petrol,
        Self::Diesel,
        Self::Hybrid,
        Self::Lpg,
        Self::Electric,
    ];
}

impl Category for VehicleType {
    const FIELD: &'static str = "vehicle_type";
    const ALL: &'static [Self] = &[
        Self::Petrol,
        Self::Diesel,
        Self::Hybrid,
        Self::Lpg,
        Self::Electric,
        Self::None,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Petrol => "petrol",
            Self::Diesel => "diesel",
            Self::Hybrid => "hybrid",
            Self::Lpg => "lpg",
            Self::Electric => "electric",
            Self::None => "none",
        }
    }
}

/// Air travel frequency over the last month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AirTravel {
    Never,
    Rarely,
    Frequently,
    VeryFrequently,
}

impl Category for AirTravel {
    const FIELD: &'static str = "air_travel";
    const ALL: &'static [Self] = &[
        Self::Never,
        Self::Rarely,
        Self::Frequently,
        Self::VeryFrequently,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Rarely => "rarely",
            Self::Frequently => "frequently",
            Self::VeryFrequently => "very_frequently",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WasteBagSize {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl Category for WasteBagSize {
    const FIELD: &'static str = "waste_bag_size";
    const ALL: &'static [Self] = &[Self::Small, Self::Medium, Self::Large, Self::ExtraLarge];

    fn key(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::ExtraLarge => "extra_large",
        }
    }
}

/// Material the respondent recycles (multi-select).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recyclable {
    Plastic,
    Paper,
    Metal,
    Glass,
}

impl Category for Recyclable {
    const FIELD: &'static str = "recycles";
    const ALL: &'static [Self] = &[Self::Plastic, Self::Paper, Self::Metal, Self::Glass];

    fn key(self) -> &'static str {
        match self {
            Self::Plastic => "plastic",
            Self::Paper => "paper",
            Self::Metal => "metal",
            Self::Glass => "glass",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatingSource {
    NaturalGas,
    Electricity,
    Wood,
    Coal,
}

impl Category for HeatingSource {
    const FIELD: &'static str = "heating_source";
    const ALL: &'static [Self] = &[
        Self::NaturalGas,
        Self::Electricity,
        Self::Wood,
        Self::Coal,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::NaturalGas => "natural_gas",
            Self::Electricity => "electricity",
            Self::Wood => "wood",
            Self::Coal => "coal",
        }
    }
}

/// Cooking appliance in regular use (multi-select).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookingAppliance {
    Microwave,
    Oven,
    Grill,
    Airfryer,
    Stove,
}

impl Category for CookingAppliance {
    const FIELD: &'static str = "cooking_with";
    const ALL: &'static [Self] = &[
        Self::Microwave,
        Self::Oven,
        Self::Grill,
        Self::Airfryer,
        Self::Stove,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Microwave => "microwave",
            Self::Oven => "oven",
            Self::Grill => "grill",
            Self::Airfryer => "airfryer",
            Self::Stove => "stove",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyEfficiency {
    No,
    Yes,
    Sometimes,
}

impl Category for EnergyEfficiency {
    const FIELD: &'static str = "energy_efficiency";
    const ALL: &'static [Self] = &[Self::No, Self::Yes, Self::Sometimes];

    fn key(self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Yes => "yes",
            Self::Sometimes => "sometimes",
        }
    }
}

// ============================================================================
// Survey response
// ============================================================================

/// One complete survey response.
///
/// Height and weight feed the BMI-derived body type; labeled training rows
/// carry the bucket directly via `body_type`, which takes precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyResponse {
    /// Height in centimeters. Absent or zero falls back to the BMI guard.
    #[serde(default)]
    pub height_cm: Option<u32>,
    /// Weight in kilograms. Absent or zero falls back to the BMI guard.
    #[serde(default)]
    pub weight_kg: Option<u32>,
    /// Pre-bucketed body type; overrides the height/weight derivation.
    #[serde(default)]
    pub body_type: Option<BodyType>,
    pub sex: Sex,
    pub diet: Diet,
    pub shower: ShowerFrequency,
    pub social_activity: SocialActivity,
    pub transport: Transport,
    /// Raw vehicle answer; use [`Self::effective_vehicle`] for encoding.
    #[serde(default)]
    pub vehicle_type: VehicleType,
    /// Monthly distance driven, in kilometers.
    #[serde(default)]
    pub vehicle_monthly_km: u32,
    pub air_travel: AirTravel,
    pub waste_bag_size: WasteBagSize,
    /// Waste bags filled per week.
    #[serde(default)]
    pub waste_bags_weekly: u32,
    /// Materials the respondent recycles.
    #[serde(default)]
    pub recycles: Vec<Recyclable>,
    pub heating_source: HeatingSource,
    /// Appliances used for cooking.
    #[serde(default)]
    pub cooking_with: Vec<CookingAppliance>,
    pub energy_efficiency: EnergyEfficiency,
    #[serde(default)]
    pub tv_pc_daily_hours: u32,
    #[serde(default)]
    pub internet_daily_hours: u32,
    /// Monthly grocery spending, in dollars.
    #[serde(default)]
    pub grocery_bill_monthly: u32,
    /// New clothing items bought per month.
    #[serde(default)]
    pub clothes_monthly: u32,
}

impl SurveyResponse {
    /// Body mass index. Absent or zero height/weight substitutes 1, so the
    /// division can never fault; both absent yields BMI 10000.
    pub fn bmi(&self) -> f64 {
        let height = self.height_cm.filter(|&h| h > 0).unwrap_or(1) as f64;
        let weight = self.weight_kg.filter(|&w| w > 0).unwrap_or(1) as f64;
        weight / (height / 100.0).powi(2)
    }

    /// Body type bucket: the explicit answer if present, otherwise derived
    /// from BMI. The guard substitution above means a response with neither
    /// height nor weight lands in the `obese` bucket.
    pub fn effective_body_type(&self) -> BodyType {
        if let Some(body_type) = self.body_type {
            return body_type;
        }
        let bmi = self.bmi();
        if bmi < 18.5 {
            BodyType::Underweight
        } else if bmi < 25.0 {
            BodyType::Normal
        } else if bmi < 30.0 {
            BodyType::Overweight
        } else {
            BodyType::Obese
        }
    }

    /// Vehicle type after the transport rule: anyone not driving privately
    /// has no vehicle.
    pub fn effective_vehicle(&self) -> VehicleType {
        if self.transport == Transport::Private {
            self.vehicle_type
        } else {
            VehicleType::None
        }
    }

    /// Vehicle distance after the transport rule: walking or cycling zeroes
    /// the distance regardless of the raw answer.
    pub fn effective_vehicle_km(&self) -> u32 {
        if self.transport == Transport::WalkBicycle {
            0
        } else {
            self.vehicle_monthly_km
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
