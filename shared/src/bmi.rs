//! BMI calculation and adaptive classification
//!
//! Classification shifts the standard cut-offs by gender and activity level,
//! then replaces them outright for minors and seniors.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: All calculations are pure, no side effects
//! 2. **Total**: Invalid input yields a sentinel category, never a panic
//! 3. **Type Safety**: Gender and activity are closed enums

use crate::units::Measurement;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Profile Types
// ============================================================================

/// Gender used to select base thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Value stored in the database and sent to the prediction service
    pub fn db_value(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.db_value())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// Self-reported activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Inactive,
    #[default]
    Moderate,
    Active,
}

impl ActivityLevel {
    /// Shift applied to the Normal and Overweight cut-offs
    pub fn threshold_shift(&self) -> f64 {
        match self {
            ActivityLevel::Inactive => -1.0,
            ActivityLevel::Moderate => 0.0,
            ActivityLevel::Active => 1.0,
        }
    }

    /// Value stored in the `activity` column
    pub fn db_value(&self) -> &'static str {
        match self {
            ActivityLevel::Inactive => "inactive",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Inactive => "Inactive",
            ActivityLevel::Moderate => "Moderate",
            ActivityLevel::Active => "Active",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.db_value())
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inactive" | "sedentary" => Ok(ActivityLevel::Inactive),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            _ => Err(format!("Unknown activity level: {}", s)),
        }
    }
}

// ============================================================================
// Categories
// ============================================================================

/// Outcome of adaptive classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
    /// BMI was NaN
    #[serde(rename = "Unknown BMI")]
    UnknownBmi,
    /// No gender selected
    #[serde(rename = "Invalid Gender")]
    InvalidGender,
    /// Negative age
    #[serde(rename = "Invalid Age")]
    InvalidAge,
}

impl BmiCategory {
    /// Display label; also the value persisted in the `category` column
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
            BmiCategory::UnknownBmi => "Unknown BMI",
            BmiCategory::InvalidGender => "Invalid Gender",
            BmiCategory::InvalidAge => "Invalid Age",
        }
    }

    /// True for the four real weight categories
    pub fn is_valid(&self) -> bool {
        matches!(
            self,
            BmiCategory::Underweight | BmiCategory::Normal | BmiCategory::Overweight | BmiCategory::Obese
        )
    }

    /// Short guidance shown alongside a result
    pub fn health_tip(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => {
                "You may benefit from a nutrient-rich, higher-calorie diet. Consulting a registered \
                 dietitian or healthcare provider can help you create a plan that supports your \
                 overall well-being."
            }
            BmiCategory::Normal => {
                "Great job maintaining a healthy range! Keep focusing on balanced nutrition, regular \
                 activity, and self-care to support your ongoing health."
            }
            BmiCategory::Overweight => {
                "Health is about more than weight. Consider adding enjoyable physical activity and \
                 mindful eating habits. Small, consistent steps matter."
            }
            BmiCategory::Obese => {
                "Working with a healthcare provider can help you explore options tailored to your \
                 needs. Supportive, sustainable changes are key to long-term health."
            }
            BmiCategory::UnknownBmi | BmiCategory::InvalidGender | BmiCategory::InvalidAge => {
                "BMI is just one indicator and may not reflect all aspects of your health. Always \
                 consult with a healthcare provider for personalized insights."
            }
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Thresholds
// ============================================================================

/// Upper bounds (exclusive) of the first three categories
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiThresholds {
    pub underweight: f64,
    pub normal: f64,
    pub overweight: f64,
}

impl BmiThresholds {
    const MALE: Self = Self { underweight: 18.5, normal: 25.0, overweight: 30.0 };
    const FEMALE: Self = Self { underweight: 18.5, normal: 26.0, overweight: 31.0 };
    const SENIOR: Self = Self { underweight: 22.0, normal: 27.0, overweight: 32.0 };
    const MINOR: Self = Self { underweight: 18.0, normal: 23.0, overweight: 28.0 };

    /// Base cut-offs for a gender, before any adjustment
    pub fn base(gender: Gender) -> Self {
        match gender {
            Gender::Male => Self::MALE,
            Gender::Female => Self::FEMALE,
        }
    }

    /// Bucket a BMI using half-open intervals
    pub fn bucket(&self, bmi: f64) -> BmiCategory {
        if bmi < self.underweight {
            BmiCategory::Underweight
        } else if bmi < self.normal {
            BmiCategory::Normal
        } else if bmi < self.overweight {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }
}

/// Age at or above which senior cut-offs apply
pub const SENIOR_AGE: i32 = 60;

/// Age below which minor cut-offs apply
pub const ADULT_AGE: i32 = 18;

/// Compute the cut-offs for a profile.
///
/// Activity shifts the gender baseline. For minors and seniors the age table
/// replaces all three values, so the activity shift does not survive.
pub fn thresholds_for(gender: Gender, age: i32, activity: ActivityLevel) -> BmiThresholds {
    if age >= SENIOR_AGE {
        return BmiThresholds::SENIOR;
    }
    if age < ADULT_AGE {
        return BmiThresholds::MINOR;
    }

    let base = BmiThresholds::base(gender);
    let shift = activity.threshold_shift();
    BmiThresholds {
        underweight: base.underweight,
        normal: base.normal + shift,
        overweight: base.overweight + shift,
    }
}

/// Classify a BMI for a profile
///
/// A NaN or non-positive BMI (the `calculate_bmi` result for an unusable
/// height) is `UnknownBmi`, never a weight class.
pub fn classify(bmi: f64, gender: Option<Gender>, age: i32, activity: ActivityLevel) -> BmiCategory {
    if bmi.is_nan() || bmi <= 0.0 {
        return BmiCategory::UnknownBmi;
    }
    let Some(gender) = gender else {
        return BmiCategory::InvalidGender;
    };
    if age < 0 {
        return BmiCategory::InvalidAge;
    }

    thresholds_for(gender, age, activity).bucket(bmi)
}

// ============================================================================
// BMI Calculations
// ============================================================================

/// Lower BMI bound of the healthy weight range
pub const IDEAL_BMI_MIN: f64 = 18.5;

/// Upper BMI bound of the healthy weight range
pub const IDEAL_BMI_MAX: f64 = 24.9;

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)²
///
/// Returns `0.0` when the height is not positive.
pub fn calculate_bmi(weight_kg: f64, height_m: f64) -> f64 {
    if height_m.is_nan() || height_m <= 0.0 {
        return 0.0;
    }
    weight_kg / (height_m * height_m)
}

/// Weight range in kg for BMI 18.5–24.9 at this height
pub fn ideal_weight_range_kg(height_m: f64) -> (f64, f64) {
    let height_sq = height_m * height_m;
    (IDEAL_BMI_MIN * height_sq, IDEAL_BMI_MAX * height_sq)
}

/// Position of a BMI on a 10–40 gauge, as a fraction in `[0, 1]`
pub fn gauge_fraction(bmi: f64) -> f64 {
    if bmi.is_nan() {
        return 0.0;
    }
    (bmi.clamp(10.0, 40.0) - 10.0) / 30.0
}

/// Complete BMI evaluation for one measurement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiAssessment {
    pub weight_kg: f64,
    pub height_m: f64,
    pub bmi: f64,
    pub category: BmiCategory,
    pub ideal_weight_range_kg: (f64, f64),
}

impl BmiAssessment {
    /// Convert, compute and classify in one go
    pub fn evaluate(
        measurement: &Measurement,
        gender: Option<Gender>,
        age: i32,
        activity: ActivityLevel,
    ) -> Self {
        let weight_kg = measurement.weight_kg();
        let height_m = measurement.height_m();
        let bmi = calculate_bmi(weight_kg, height_m);

        Self {
            weight_kg,
            height_m,
            bmi,
            category: classify(bmi, gender, age, activity),
            ideal_weight_range_kg: ideal_weight_range_kg(height_m),
        }
    }

    /// Whether the inputs were usable for a BMI
    pub fn is_computable(&self) -> bool {
        self.height_m > 0.0 && self.weight_kg > 0.0
    }
}
