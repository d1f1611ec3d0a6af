//! BMI history service - stores and reads measurements through RPC

use super::BmiResultStore;
use crate::error::{ClientError, ClientResult};
use crate::supabase::{decode_single, SupabaseClient};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use cookcraft_shared::models::{BmiRecord, BmiResultQuery, NewBmiResult};
use cookcraft_shared::units::{to_metric, MeasurementKind};
use cookcraft_shared::validation::{validate_age, validate_height_m, validate_weight_kg};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

const RPC_SAVE: &str = "set_my_bmi_result";
const RPC_LIST: &str = "get_my_bmi_results";
const RPC_LATEST: &str = "get_my_latest_bmi";
const RPC_DELETE: &str = "delete_my_bmi_result";

#[derive(Debug, Serialize)]
struct SaveParams {
    p_measured_at: String,
    p_weight: f64,
    p_height: f64,
    p_unit: &'static str,
    p_activity: &'static str,
    p_gender: Option<&'static str>,
    p_age: Option<i32>,
}

impl SaveParams {
    fn from_result(result: &NewBmiResult) -> Self {
        Self {
            p_measured_at: timestamp(result.measured_at),
            p_weight: result.weight,
            p_height: result.height,
            p_unit: result.unit_system.db_value(),
            p_activity: result.activity.db_value(),
            p_gender: result.gender.map(|g| g.db_value()),
            p_age: result.age,
        }
    }
}

#[derive(Debug, Serialize)]
struct ListParams {
    p_start: Option<String>,
    p_end: Option<String>,
    p_limit: u32,
    p_offset: u32,
}

/// ISO-8601 with fractional seconds, as the RPCs expect
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Reject results that cannot yield a BMI before touching the network
fn validate_new_result(result: &NewBmiResult) -> ClientResult<()> {
    let weight_kg = to_metric(result.weight, result.unit_system, MeasurementKind::Weight);
    let height_m = to_metric(result.height, result.unit_system, MeasurementKind::Height);
    validate_weight_kg(weight_kg).map_err(ClientError::Validation)?;
    validate_height_m(height_m).map_err(ClientError::Validation)?;
    if let Some(age) = result.age {
        validate_age(age).map_err(ClientError::Validation)?;
    }
    Ok(())
}

/// BMI history backed by Supabase RPC
#[derive(Clone)]
pub struct BmiService {
    client: SupabaseClient,
}

impl BmiService {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BmiResultStore for BmiService {
    async fn save_result(&self, result: &NewBmiResult) -> ClientResult<BmiRecord> {
        validate_new_result(result)?;
        let user = self.client.require_session().await?;

        let body = self
            .client
            .rpc_raw(RPC_SAVE, &SaveParams::from_result(result))
            .await?;
        let record: BmiRecord = decode_single(&body)?.ok_or_else(|| ClientError::Api {
            status: reqwest::StatusCode::NO_CONTENT,
            body: format!("{} returned no row", RPC_SAVE),
        })?;

        info!(
            user_id = %user.id,
            record_id = record.id,
            bmi = record.bmi,
            category = %record.category,
            "BMI result saved"
        );
        Ok(record)
    }

    async fn list_results(&self, query: &BmiResultQuery) -> ClientResult<Vec<BmiRecord>> {
        self.client.require_session().await?;

        let params = ListParams {
            p_start: query.start.map(timestamp),
            p_end: query.end.map(timestamp),
            p_limit: query.limit,
            p_offset: query.offset,
        };
        let records: Vec<BmiRecord> = self.client.rpc(RPC_LIST, &params).await?;
        debug!(count = records.len(), "Fetched BMI history");
        Ok(records)
    }

    async fn latest_result(&self) -> ClientResult<Option<BmiRecord>> {
        self.client.require_session().await?;

        let body = self.client.rpc_raw(RPC_LATEST, &json!({})).await?;
        decode_single(&body)
    }

    async fn delete_result(&self, id: i64) -> ClientResult<()> {
        self.client.require_session().await?;

        self.client.rpc_raw(RPC_DELETE, &json!({ "p_id": id })).await?;
        info!(record_id = id, "BMI result deleted");
        Ok(())
    }
}
