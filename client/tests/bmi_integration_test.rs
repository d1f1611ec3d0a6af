//! Integration tests for BMI history RPCs

mod common;

use chrono::{TimeZone, Utc};
use common::{bmi_row, signed_in_client, test_config, ACCESS_TOKEN, ANON_KEY};
use cookcraft_client::error::ClientError;
use cookcraft_client::services::{BmiResultStore, BmiService};
use cookcraft_client::supabase::SupabaseClient;
use cookcraft_shared::bmi::{ActivityLevel, BmiCategory, Gender};
use cookcraft_shared::models::{BmiResultQuery, NewBmiResult};
use cookcraft_shared::units::UnitSystem;
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn new_result() -> NewBmiResult {
    NewBmiResult {
        measured_at: Utc.with_ymd_and_hms(2025, 10, 28, 9, 15, 0).unwrap(),
        weight: 154.0,
        height: 70.0,
        unit_system: UnitSystem::Imperial,
        activity: ActivityLevel::Active,
        gender: Some(Gender::Female),
        age: Some(24),
    }
}

#[tokio::test]
async fn test_save_result_sends_entered_values() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/set_my_bmi_result"))
        .and(header("apikey", ANON_KEY))
        .and(header("authorization", format!("Bearer {}", ACCESS_TOKEN).as_str()))
        .and(body_json(json!({
            "p_measured_at": "2025-10-28T09:15:00.000Z",
            "p_weight": 154.0,
            "p_height": 70.0,
            "p_unit": "imperial",
            "p_activity": "active",
            "p_gender": "Female",
            "p_age": 24
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([bmi_row(41, 22.1, "Normal")])))
        .expect(1)
        .mount(&server)
        .await;

    let service = BmiService::new(signed_in_client(&server).await);
    let record = service.save_result(&new_result()).await.unwrap();

    assert_eq!(record.id, 41);
    assert_eq!(record.category(), Some(BmiCategory::Normal));
    assert_eq!(record.unit_system, "imperial");
}

#[tokio::test]
async fn test_save_result_accepts_bare_object() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/set_my_bmi_result"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bmi_row(42, 31.4, "Obese")))
        .mount(&server)
        .await;

    let service = BmiService::new(signed_in_client(&server).await);
    let record = service.save_result(&new_result()).await.unwrap();

    assert_eq!(record.id, 42);
    assert_eq!(record.category(), Some(BmiCategory::Obese));
}

#[tokio::test]
async fn test_save_result_rejects_zero_height_before_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/set_my_bmi_result"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bmi_row(1, 0.0, "Unknown BMI")))
        .expect(0)
        .mount(&server)
        .await;

    let service = BmiService::new(signed_in_client(&server).await);
    let result = NewBmiResult { height: 0.0, ..new_result() };

    assert!(matches!(service.save_result(&result).await, Err(ClientError::Validation(_))));
}

#[tokio::test]
async fn test_save_result_requires_session() {
    let server = MockServer::start().await;
    let client = SupabaseClient::new(&test_config(&server).supabase).unwrap();
    let service = BmiService::new(client);

    assert!(matches!(
        service.save_result(&new_result()).await,
        Err(ClientError::NotAuthenticated)
    ));
}

#[tokio::test]
async fn test_list_results_pages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_my_bmi_results"))
        .and(body_json(json!({
            "p_start": null,
            "p_end": null,
            "p_limit": 2,
            "p_offset": 4
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            bmi_row(9, 27.0, "Overweight"),
            bmi_row(8, 24.0, "Normal")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let service = BmiService::new(signed_in_client(&server).await);
    let records = service
        .list_results(&BmiResultQuery {
            limit: 2,
            offset: 4,
            ..Default::default()
        })
        .await
        .unwrap();

    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![9, 8]);
}

#[tokio::test]
async fn test_list_results_with_date_filter() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_my_bmi_results"))
        .and(body_json(json!({
            "p_start": "2025-10-01T00:00:00.000Z",
            "p_end": "2025-11-01T00:00:00.000Z",
            "p_limit": 100,
            "p_offset": 0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let service = BmiService::new(signed_in_client(&server).await);
    let records = service
        .list_results(&BmiResultQuery {
            start: Some(Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap()),
            end: Some(Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_latest_result_empty_history() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_my_latest_bmi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let service = BmiService::new(signed_in_client(&server).await);
    assert_eq!(service.latest_result().await.unwrap(), None);
}

#[tokio::test]
async fn test_latest_result_returns_row() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_my_latest_bmi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bmi_row(7, 19.0, "Normal")))
        .mount(&server)
        .await;

    let service = BmiService::new(signed_in_client(&server).await);
    let record = service.latest_result().await.unwrap().unwrap();
    assert_eq!(record.id, 7);
    assert_eq!(record.age_years, Some(24));
}

#[tokio::test]
async fn test_delete_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/delete_my_bmi_result"))
        .and(body_json(json!({ "p_id": 41 })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let service = BmiService::new(signed_in_client(&server).await);
    service.delete_result(41).await.unwrap();
}

#[tokio::test]
async fn test_rpc_failure_keeps_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/delete_my_bmi_result"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "row not found" })),
        )
        .mount(&server)
        .await;

    let service = BmiService::new(signed_in_client(&server).await);
    let err = service.delete_result(999).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert!(matches!(err, ClientError::Api { ref body, .. } if body.contains("row not found")));
}
