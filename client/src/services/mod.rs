//! Services layer - talks to the network collaborators
//!
//! Each collaborator sits behind a trait so callers (and tests) can swap
//! the transport.

pub mod analytics;
pub mod bmi;
pub mod recipes;
pub mod recommendation;

use crate::error::ClientResult;
use async_trait::async_trait;
use cookcraft_shared::models::{BmiRecord, BmiResultQuery, NewBmiResult};
use cookcraft_shared::types::{PredictRequest, PredictResponse};

pub use analytics::AnalyticsService;
pub use bmi::BmiService;
pub use recipes::RecipeService;
pub use recommendation::RecommendationClient;

/// Persistence of BMI measurements
#[async_trait]
pub trait BmiResultStore: Send + Sync {
    /// Store a measurement and return the row as the server computed it
    async fn save_result(&self, result: &NewBmiResult) -> ClientResult<BmiRecord>;

    /// Page through stored measurements, newest first
    async fn list_results(&self, query: &BmiResultQuery) -> ClientResult<Vec<BmiRecord>>;

    /// Most recent measurement, if any
    async fn latest_result(&self) -> ClientResult<Option<BmiRecord>>;

    async fn delete_result(&self, id: i64) -> ClientResult<()>;
}

/// Remote BMI prediction and meal recommendation
#[async_trait]
pub trait MealRecommender: Send + Sync {
    async fn predict_and_explain(&self, request: &PredictRequest) -> ClientResult<PredictResponse>;
}
