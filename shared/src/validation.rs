//! Input validation functions
//!
//! This module provides validation utilities for user input.
//! Uses both custom validators and the `validator` crate for derive macros.

use crate::errors::ValidationError;
use crate::units::Measurement;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// E-mail/password pair submitted to the auth server
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    /// Validate and flatten the first failure into a [`ValidationError`]
    pub fn check(&self) -> Result<(), ValidationError> {
        self.validate().map_err(|errors| {
            let fields = errors.field_errors();
            let field = if fields.contains_key("email") { "email" } else { "password" };
            let message = fields
                .get(field)
                .and_then(|errs| errs.first())
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Invalid value".to_string());
            ValidationError::new(field, message)
        })
    }
}

/// Validate a first or last name for sign-up
pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    if trimmed.chars().count() > 100 {
        return Err("Name too long".to_string());
    }
    Ok(())
}

/// Validate age in years
pub fn validate_age(age: i32) -> Result<(), String> {
    if age < 0 {
        return Err("Age cannot be negative".to_string());
    }
    if age > 150 {
        return Err("Age cannot exceed 150 years".to_string());
    }
    Ok(())
}

/// Validate weight value (in kg)
pub fn validate_weight_kg(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg <= 0.0 {
        return Err("Weight must be greater than zero".to_string());
    }
    if weight_kg > 700.0 {
        return Err("Weight must be at most 700 kg".to_string());
    }
    Ok(())
}

/// Validate height value (in meters)
pub fn validate_height_m(height_m: f64) -> Result<(), String> {
    if height_m.is_nan() || height_m.is_infinite() {
        return Err("Height must be a valid number".to_string());
    }
    if height_m <= 0.0 {
        return Err("Height must be greater than zero".to_string());
    }
    if height_m > 3.0 {
        return Err("Height must be at most 3 m".to_string());
    }
    Ok(())
}

/// Validate a raw measurement and optional age before it is stored
pub fn validate_measurement(measurement: &Measurement, age: Option<i32>) -> Result<(), ValidationError> {
    validate_weight_kg(measurement.weight_kg()).map_err(|m| ValidationError::new("weight", m))?;
    validate_height_m(measurement.height_m()).map_err(|m| ValidationError::new("height", m))?;
    if let Some(age) = age {
        validate_age(age).map_err(|m| ValidationError::new("age", m))?;
    }
    Ok(())
}
