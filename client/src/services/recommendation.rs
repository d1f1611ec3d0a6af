//! Prediction service client
//!
//! Sends derived profile attributes to the ML service and returns the
//! predicted category, SHAP explanations and meal suggestions.

use super::MealRecommender;
use crate::config::RecommenderConfig;
use crate::error::ClientResult;
use crate::supabase::ensure_success;
use async_trait::async_trait;
use cookcraft_shared::types::{PredictRequest, PredictResponse};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// HTTP client for `POST /predict_and_explain/`
#[derive(Clone)]
pub struct RecommendationClient {
    http: Client,
    base_url: String,
}

impl RecommendationClient {
    /// Create a new prediction client
    ///
    /// # Arguments
    /// * `config` - Base URL and request timeout of the service
    pub fn new(config: &RecommenderConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MealRecommender for RecommendationClient {
    async fn predict_and_explain(&self, request: &PredictRequest) -> ClientResult<PredictResponse> {
        let url = format!("{}/predict_and_explain/", self.base_url);
        debug!(bmi = request.bmi, age = request.age, "Requesting prediction");

        let response = self.http.post(&url).json(request).send().await?;
        let response = ensure_success(response).await?;
        let body = response.bytes().await?;
        let prediction: PredictResponse = serde_json::from_slice(&body)?;

        info!(
            category = %prediction.prediction.bmi_category,
            "Prediction received"
        );
        Ok(prediction)
    }
}
