//! Application state management
//!
//! Builds every client once from configuration and hands out cheap clones.
//!
//! # Design Principles
//!
//! 1. **Build once**: HTTP pools are created at startup
//! 2. **Cheap cloning**: All fields use Arc or are already Clone-cheap
//! 3. **One session**: every Supabase-backed service shares the same client

use crate::config::AppConfig;
use crate::error::ClientResult;
use crate::services::{AnalyticsService, BmiService, RecipeService, RecommendationClient};
use crate::supabase::SupabaseClient;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Supabase client holding the session
    pub supabase: SupabaseClient,
    pub bmi: BmiService,
    pub recipes: RecipeService,
    pub analytics: AnalyticsService,
    pub recommender: RecommendationClient,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: AppConfig) -> ClientResult<Self> {
        let supabase = SupabaseClient::new(&config.supabase)?;
        let recommender = RecommendationClient::new(&config.recommender)?;

        Ok(Self {
            bmi: BmiService::new(supabase.clone()),
            recipes: RecipeService::new(supabase.clone(), &config.recipes),
            analytics: AnalyticsService::new(supabase.clone()),
            recommender,
            supabase,
            config: Arc::new(config),
        })
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_state_clone_is_cheap() {
        let state = AppState::new(AppConfig::default()).unwrap();

        // Clone should be O(1) - just Arc increments
        let cloned = state.clone();
        assert!(Arc::ptr_eq(&state.config, &cloned.config));
    }

    #[tokio::test]
    async fn test_services_share_one_session() {
        let state = AppState::new(AppConfig::default()).unwrap();
        assert!(!state.supabase.is_signed_in().await);
        assert_eq!(state.supabase.base_url(), "http://localhost:54321");
        assert!(state.recipes.cache_dir().ends_with("RecipeCache"));
    }
}
