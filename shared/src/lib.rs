//! CookCraft Shared Library
//!
//! Pure BMI, unit and analytics logic plus the data types exchanged with
//! the hosted backend and the prediction service. Used by the client and
//! WASM crates.

pub mod analytics;
pub mod bmi;
pub mod errors;
pub mod models;
pub mod types;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use bmi::*;
pub use errors::*;
pub use units::*;

pub use models::{BmiRecord, BmiResultQuery, MealType, NewBmiResult, Recipe};
pub use types::{Meal, PredictRequest, PredictResponse, Prediction};
