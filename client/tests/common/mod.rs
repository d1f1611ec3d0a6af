//! Common test utilities for integration tests
//!
//! Every test gets its own mock server standing in for Supabase and the
//! prediction service, plus a fresh recipe cache directory.

#![allow(dead_code)]

use cookcraft_client::config::AppConfig;
use cookcraft_client::supabase::SupabaseClient;
use cookcraft_shared::validation::Credentials;
use serde_json::{json, Value};
use std::path::PathBuf;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ANON_KEY: &str = "test-anon-key";
pub const ACCESS_TOKEN: &str = "access-token";
pub const REFRESH_TOKEN: &str = "refresh-token";
pub const TEST_EMAIL: &str = "cook@example.com";
pub const TEST_PASSWORD: &str = "sufuria123";

/// Configuration with every collaborator pointed at `server`
pub fn test_config(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.supabase.url = server.uri();
    config.supabase.anon_key = ANON_KEY.to_string();
    config.supabase.timeout_secs = 5;
    config.recommender.base_url = server.uri();
    config.recommender.timeout_secs = 5;
    config.recipes.cache_dir = temp_cache_dir();
    config
}

/// Unique, not yet created cache directory
pub fn temp_cache_dir() -> PathBuf {
    std::env::temp_dir().join(format!("cookcraft-test-{}", Uuid::new_v4()))
}

/// GoTrue token response
pub fn token_body(access_token: &str, expires_in: i64) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": expires_in,
        "refresh_token": REFRESH_TOKEN,
        "user": {
            "id": "5f0c6c1e-8d3a-4d5e-9b8f-2a1c3e4d5f60",
            "email": TEST_EMAIL,
            "aud": "authenticated"
        }
    })
}

/// Accept password sign-in with a one-hour session
pub async fn mount_sign_in(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(ACCESS_TOKEN, 3600)))
        .mount(server)
        .await;
}

/// Supabase client that is already signed in
pub async fn signed_in_client(server: &MockServer) -> SupabaseClient {
    mount_sign_in(server).await;
    let client = SupabaseClient::new(&test_config(server).supabase).unwrap();
    client
        .sign_in(&Credentials::new(TEST_EMAIL, TEST_PASSWORD))
        .await
        .unwrap();
    client
}

/// Row of `bmi_results_view`
pub fn bmi_row(id: i64, bmi: f64, category: &str) -> Value {
    json!({
        "id": id,
        "user_id": "5f0c6c1e-8d3a-4d5e-9b8f-2a1c3e4d5f60",
        "measured_at": "2025-10-28T09:15:00Z",
        "gender": "Female",
        "age_years": 24,
        "activity": "active",
        "unit_system": "imperial",
        "weight_kg": 69.85,
        "height_m": 1.778,
        "bmi": bmi,
        "category": category,
        "ideal_weight_min_kg": 58.48,
        "ideal_weight_max_kg": 78.71,
        "created_at": "2025-10-28T09:15:01Z",
        "updated_at": "2025-10-28T09:15:01Z"
    })
}
