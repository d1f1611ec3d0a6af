//! Integration tests for the nutrition timeseries RPC

mod common;

use chrono::NaiveDate;
use common::{signed_in_client, test_config};
use cookcraft_client::error::ClientError;
use cookcraft_client::services::AnalyticsService;
use cookcraft_client::supabase::SupabaseClient;
use cookcraft_shared::analytics::{moving_average, summarize, NutritionMetric};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
}

#[tokio::test]
async fn test_timeseries_fills_gaps() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_my_nutrition_timeseries"))
        .and(body_json(json!({
            "p_start": "2025-10-31T21:00:00.000Z",
            "p_end": "2025-11-03T21:00:00.000Z",
            "p_tz": "Africa/Nairobi"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "day_local": "2025-11-01",
                "calories": 2150.0,
                "protein": 80.0,
                "water": 2.0,
                "carbs_pct": 45.0,
                "protein_pct": 25.0,
                "fat_pct": 30.0
            },
            { "day_local": "2025-11-03", "calories": 1800.0, "protein": null }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let service = AnalyticsService::new(signed_in_client(&server).await);
    let points = service
        .nutrition_timeseries(day(1), day(4), chrono_tz::Africa::Nairobi)
        .await
        .unwrap();

    let days: Vec<NaiveDate> = points.iter().map(|p| p.day).collect();
    assert_eq!(days, vec![day(1), day(2), day(3)]);

    assert_eq!(points[0].carbs_pct, 45.0);
    assert_eq!(points[1].calories, 0.0);
    assert_eq!(points[2].protein, 0.0);
    assert_eq!(points[2].fat_pct, 30.0);

    let summary = summarize(&points, NutritionMetric::Calories);
    assert_eq!(summary.total, 3950.0);
    assert_eq!(summary.adherence_pct, 33);

    let calories: Vec<f64> = points.iter().map(|p| p.calories).collect();
    assert_eq!(moving_average(&calories, 3), vec![3950.0 / 3.0]);
}

#[tokio::test]
async fn test_timeseries_requires_session() {
    let server = MockServer::start().await;
    let client = SupabaseClient::new(&test_config(&server).supabase).unwrap();
    let service = AnalyticsService::new(client);

    let result = service.nutrition_timeseries(day(1), day(8), chrono_tz::Tz::UTC).await;
    assert!(matches!(result, Err(ClientError::NotAuthenticated)));
}
