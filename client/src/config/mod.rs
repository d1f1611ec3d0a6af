//! Configuration management for the CookCraft client
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: CC__)

use crate::error::ClientResult;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub supabase: SupabaseConfig,
    pub recommender: RecommenderConfig,
    #[serde(default)]
    pub recipes: RecipesConfig,
}

/// Hosted backend project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    /// Public anon key; row-level security does the rest
    pub anon_key: String,
    pub timeout_secs: u64,
}

/// Prediction/explanation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommenderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Recipe catalogue storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipesConfig {
    pub bucket: String,
    pub cache_dir: PathBuf,
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            bucket: "recipe_enriched".to_string(),
            cache_dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("cookcraft")
        .join("RecipeCache")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase: SupabaseConfig {
                url: "http://localhost:54321".to_string(),
                anon_key: String::new(),
                timeout_secs: 30,
            },
            recommender: RecommenderConfig {
                base_url: "http://localhost:8000".to_string(),
                timeout_secs: 60,
            },
            recipes: RecipesConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with CC__ prefix
    pub fn load() -> ClientResult<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (CC__ prefix)
            // e.g., CC__SUPABASE__URL sets supabase.url
            .add_source(config::Environment::with_prefix("CC").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}
