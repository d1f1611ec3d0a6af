//! Data models for the CookCraft application

use crate::bmi::{ActivityLevel, BmiCategory, Gender};
use crate::units::UnitSystem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

// ============================================================================
// BMI history
// ============================================================================

/// Row of `bmi_results_view`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiRecord {
    pub id: i64,
    pub user_id: Uuid,
    pub measured_at: DateTime<Utc>,
    pub gender: Option<String>,
    pub age_years: Option<i32>,
    /// `inactive` | `moderate` | `active`
    pub activity: String,
    /// Unit system the measurement was entered in
    pub unit_system: String,
    pub weight_kg: f64,
    pub height_m: f64,
    pub bmi: f64,
    /// Category label, possibly a sentinel such as `Invalid Gender`
    pub category: String,
    pub ideal_weight_min_kg: f64,
    pub ideal_weight_max_kg: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BmiRecord {
    /// Parsed category, `None` if the stored label is unrecognised
    pub fn category(&self) -> Option<BmiCategory> {
        serde_json::from_value(serde_json::Value::String(self.category.clone())).ok()
    }
}

/// A measurement to persist, with the selections made alongside it
#[derive(Debug, Clone, PartialEq)]
pub struct NewBmiResult {
    pub measured_at: DateTime<Utc>,
    /// Weight as entered, in the units of `unit_system`
    pub weight: f64,
    /// Height as entered, in the units of `unit_system`
    pub height: f64,
    pub unit_system: UnitSystem,
    pub activity: ActivityLevel,
    pub gender: Option<Gender>,
    pub age: Option<i32>,
}

/// Paging/date filter for BMI history
#[derive(Debug, Clone, PartialEq)]
pub struct BmiResultQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for BmiResultQuery {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            limit: 100,
            offset: 0,
        }
    }
}

// ============================================================================
// Recipes
// ============================================================================

/// Meal slot a recipe belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Dessert,
}

impl MealType {
    pub const ALL: [MealType; 5] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
        MealType::Dessert,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
            MealType::Dessert => "Dessert",
        }
    }

    /// Catalogue file holding recipes for this slot
    pub fn catalogue_file(&self) -> String {
        format!("recipes_{}_part0.json", self.label().to_lowercase())
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = fold_label(s);
        MealType::ALL
            .into_iter()
            .find(|m| fold_label(m.label()) == needle)
            .ok_or_else(|| format!("Unknown meal type: {}", s))
    }
}

/// Recipe as stored in the catalogue JSON files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_ingredients")]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub dietary_tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "meal_type")]
    pub meal_type: Option<String>,
}

impl Recipe {
    /// Meal type comparison, trimmed and case-insensitive
    pub fn matches_meal_type(&self, meal_type: MealType) -> bool {
        self.meal_type
            .as_deref()
            .map(|mt| fold_label(mt) == fold_label(meal_type.label()))
            .unwrap_or(false)
    }

    /// Key used to de-duplicate recipes across files
    pub fn dedup_key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Trimmed, lowercased, with width variants and diacritics folded away
fn fold_label(s: &str) -> String {
    s.trim()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Ingredients {
    List(Vec<String>),
    Text(String),
}

fn deserialize_ingredients<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Ingredients> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Ingredients::List(items)) => items,
        Some(Ingredients::Text(text)) => text.split(',').map(|s| s.trim().to_string()).collect(),
        None => Vec::new(),
    })
}

fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
