//! CookCraft WASM Module
//!
//! This crate provides WebAssembly bindings for the BMI and analytics
//! calculations so they can run in the browser.

use cookcraft_shared::analytics;
use cookcraft_shared::bmi::{self, ActivityLevel, Gender};
use cookcraft_shared::units::{self, MeasurementKind, UnitSystem};
use wasm_bindgen::prelude::*;

/// Gender codes used by the app's pickers: 0 female, 1 male
fn gender_from_code(code: u8) -> Option<Gender> {
    match code {
        0 => Some(Gender::Female),
        1 => Some(Gender::Male),
        _ => None,
    }
}

/// Activity codes: 1 moderate, 2 inactive, 3 active; anything else applies no shift
fn activity_from_code(code: u8) -> ActivityLevel {
    match code {
        2 => ActivityLevel::Inactive,
        3 => ActivityLevel::Active,
        _ => ActivityLevel::Moderate,
    }
}

/// Convert a raw weight (kg/lb) or height (cm/in) to kilograms or meters
#[wasm_bindgen]
pub fn to_metric(value: f64, imperial: bool, is_height: bool) -> f64 {
    let system = if imperial { UnitSystem::Imperial } else { UnitSystem::Metric };
    let kind = if is_height { MeasurementKind::Height } else { MeasurementKind::Weight };
    units::to_metric(value, system, kind)
}

/// Calculate BMI from weight (kg) and height (m); 0 when height is not positive
#[wasm_bindgen]
pub fn calculate_bmi(weight_kg: f64, height_m: f64) -> f64 {
    bmi::calculate_bmi(weight_kg, height_m)
}

/// Classify a BMI.
///
/// `gender_code`: 0 female, 1 male, anything else is treated as missing.
/// `activity_code`: 1 moderate, 2 inactive, 3 active.
#[wasm_bindgen]
pub fn classify_bmi(bmi_value: f64, gender_code: u8, age: i32, activity_code: u8) -> String {
    bmi::classify(bmi_value, gender_from_code(gender_code), age, activity_from_code(activity_code))
        .label()
        .to_string()
}

/// Healthy weight range in kg as `[min, max]`
#[wasm_bindgen]
pub fn ideal_weight_range(height_m: f64) -> Vec<f64> {
    let (min, max) = bmi::ideal_weight_range_kg(height_m);
    vec![min, max]
}

/// Trailing moving average over full windows
#[wasm_bindgen]
pub fn moving_average(values: &[f64], window_size: usize) -> Vec<f64> {
    analytics::moving_average(values, window_size)
}
