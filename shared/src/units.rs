//! Unit conversion and normalization module
//!
//! Measurements are entered in either metric (kg/cm) or imperial (lb/in)
//! and normalized to canonical metric (kg, meters) before any calculation.
//!
//! # Design Principles
//!
//! 1. **Canonical Metric**: BMI logic only ever sees kilograms and meters
//! 2. **Total Conversion**: Unparsable input becomes `0.0`, never an error
//! 3. **Conversion at Boundaries**: Convert on input, not in business logic

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453592;

/// Meters per inch
pub const METERS_PER_INCH: f64 = 0.0254;

/// Centimeters per meter
pub const CM_PER_METER: f64 = 100.0;

// ============================================================================
// Unit System
// ============================================================================

/// Input mode chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Weight in kg, height in cm
    #[default]
    Metric,
    /// Weight in lb, height in inches
    Imperial,
}

impl UnitSystem {
    /// Value stored in the `unit_system` column and sent to RPCs
    pub fn db_value(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    /// Human-readable label for pickers
    pub fn label(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "Metric (kg/cm)",
            UnitSystem::Imperial => "Imperial (lb/in)",
        }
    }

    /// Weight unit used for input in this system
    pub fn weight_unit(&self) -> WeightUnit {
        match self {
            UnitSystem::Metric => WeightUnit::Kg,
            UnitSystem::Imperial => WeightUnit::Lbs,
        }
    }

    /// Height unit used for input in this system
    pub fn height_unit(&self) -> HeightUnit {
        match self {
            UnitSystem::Metric => HeightUnit::Cm,
            UnitSystem::Imperial => HeightUnit::Inches,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.db_value())
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "si" => Ok(UnitSystem::Metric),
            "imperial" | "us" => Ok(UnitSystem::Imperial),
            _ => Err(format!("Unknown unit system: {}", s)),
        }
    }
}

/// Which quantity a raw value represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
    Weight,
    Height,
}

// ============================================================================
// Weight Units
// ============================================================================

/// Weight unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    /// Convert from this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lbs => value * KG_PER_LB,
        }
    }

    /// Convert from kilograms to this unit
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lbs => kg / KG_PER_LB,
        }
    }

    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lb",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kg" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            "lbs" | "lb" | "pound" | "pounds" => Ok(WeightUnit::Lbs),
            _ => Err(format!("Unknown weight unit: {}", s)),
        }
    }
}

// ============================================================================
// Height Units
// ============================================================================

/// Height unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    #[default]
    Cm,
    Inches,
}

impl HeightUnit {
    /// Convert from this unit to meters
    pub fn to_meters(&self, value: f64) -> f64 {
        match self {
            HeightUnit::Cm => value / CM_PER_METER,
            HeightUnit::Inches => value * METERS_PER_INCH,
        }
    }

    /// Convert from meters to this unit
    pub fn from_meters(&self, meters: f64) -> f64 {
        match self {
            HeightUnit::Cm => meters * CM_PER_METER,
            HeightUnit::Inches => meters / METERS_PER_INCH,
        }
    }

    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            HeightUnit::Cm => "cm",
            HeightUnit::Inches => "in",
        }
    }
}

impl fmt::Display for HeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for HeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cm" | "centimeter" | "centimeters" => Ok(HeightUnit::Cm),
            "in" | "inch" | "inches" => Ok(HeightUnit::Inches),
            _ => Err(format!("Unknown height unit: {}", s)),
        }
    }
}

// ============================================================================
// Conversion entry points
// ============================================================================

/// Convert a raw value entered in `system` to canonical metric.
///
/// Weight becomes kilograms, height becomes meters.
pub fn to_metric(value: f64, system: UnitSystem, kind: MeasurementKind) -> f64 {
    match kind {
        MeasurementKind::Weight => system.weight_unit().to_kg(value),
        MeasurementKind::Height => system.height_unit().to_meters(value),
    }
}

/// Parse user-entered numeric text, yielding `0.0` for anything unusable.
pub fn parse_measurement(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Raw weight/height as typed by the user, before conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub weight_raw: String,
    pub height_raw: String,
    pub unit_system: UnitSystem,
}

impl Measurement {
    pub fn new(weight_raw: impl Into<String>, height_raw: impl Into<String>, unit_system: UnitSystem) -> Self {
        Self {
            weight_raw: weight_raw.into(),
            height_raw: height_raw.into(),
            unit_system,
        }
    }

    /// Weight as entered, parsed (0 if unparsable)
    pub fn weight_value(&self) -> f64 {
        parse_measurement(&self.weight_raw)
    }

    /// Height as entered, parsed (0 if unparsable)
    pub fn height_value(&self) -> f64 {
        parse_measurement(&self.height_raw)
    }

    /// Weight in kilograms
    pub fn weight_kg(&self) -> f64 {
        to_metric(self.weight_value(), self.unit_system, MeasurementKind::Weight)
    }

    /// Height in meters; 0 means the height is unusable
    pub fn height_m(&self) -> f64 {
        to_metric(self.height_value(), self.unit_system, MeasurementKind::Height)
    }
}
