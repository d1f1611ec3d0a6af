//! Prediction service request and response types
//!
//! The service speaks snake_case JSON in both directions.

use crate::bmi::{ActivityLevel, BmiAssessment, Gender};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of `POST /predict_and_explain/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub age: i32,
    pub gender: String,
    pub bmi: f64,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_conditions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet_preference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_of_study: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooking_skill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internet_access: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cultural_preference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_availability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_followed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl PredictRequest {
    /// Build the required attributes from an evaluated measurement
    pub fn from_assessment(
        assessment: &BmiAssessment,
        age: i32,
        gender: Gender,
        activity: ActivityLevel,
    ) -> Self {
        Self {
            age,
            gender: gender.db_value().to_string(),
            bmi: assessment.bmi,
            height_cm: assessment.height_m * 100.0,
            weight_kg: assessment.weight_kg,
            activity_level: activity.label().to_string(),
            ..Default::default()
        }
    }
}

/// Response of `POST /predict_and_explain/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: Prediction,
    pub explanations: Explanations,
    pub meal_recommendations: MealRecommendations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub bmi_category: String,
    #[serde(default)]
    pub numeric_bmi: Option<f64>,
    #[serde(default)]
    pub class_probabilities: Option<HashMap<String, f64>>,
}

impl Prediction {
    /// Class probabilities, most likely first
    pub fn sorted_probabilities(&self) -> Vec<(String, f64)> {
        let mut probs: Vec<(String, f64)> = self
            .class_probabilities
            .iter()
            .flatten()
            .map(|(class, p)| (class.clone(), *p))
            .collect();
        probs.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        probs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanations {
    pub local: LocalExplanation,
    pub global: GlobalExplanation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalExplanation {
    pub predicted_class: String,
    pub top_features: Vec<ShapFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalExplanation {
    pub top_features: Vec<ShapFeature>,
}

/// Feature attribution from the model explainer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapFeature {
    pub feature: String,
    #[serde(default)]
    pub raw_name: Option<String>,
    #[serde(default)]
    pub shap_value: f64,
    #[serde(default)]
    pub abs_shap: f64,
}

impl ShapFeature {
    /// Stable identifier, the raw model column when known
    pub fn id(&self) -> &str {
        self.raw_name.as_deref().unwrap_or(&self.feature)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecommendations {
    pub story_text: String,
    pub slots: MealSlots,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealSlots {
    #[serde(default)]
    pub breakfast: Vec<Meal>,
    #[serde(default)]
    pub lunch: Vec<Meal>,
    #[serde(default)]
    pub dinner: Vec<Meal>,
    #[serde(default)]
    pub snack: Vec<Meal>,
}

impl MealSlots {
    /// Slots in display order with their names
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[Meal])> {
        [
            ("Breakfast", self.breakfast.as_slice()),
            ("Lunch", self.lunch.as_slice()),
            ("Dinner", self.dinner.as_slice()),
            ("Snack", self.snack.as_slice()),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub meal_type: Option<String>,
    #[serde(default)]
    pub diet_tags: Vec<String>,
    #[serde(default)]
    pub health_score: Option<i32>,
    #[serde(default)]
    pub is_healthy: Option<bool>,
    #[serde(default)]
    pub source: Option<String>,
}

impl Meal {
    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or("Suggested meal")
    }

    /// First diet tag, if any
    pub fn diet_preference(&self) -> Option<&str> {
        self.diet_tags.first().map(String::as_str)
    }
}
