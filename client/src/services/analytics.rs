//! Nutrition analytics service - daily timeseries through RPC

use crate::error::ClientResult;
use crate::supabase::SupabaseClient;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use cookcraft_shared::analytics::{fill_missing_days, NutritionPoint};
use serde::{Deserialize, Serialize};
use tracing::debug;

const RPC_TIMESERIES: &str = "get_my_nutrition_timeseries";

#[derive(Debug, Serialize)]
struct TimeseriesParams {
    p_start: String,
    p_end: String,
    p_tz: &'static str,
}

/// Raw row; every macro may be missing
#[derive(Debug, Clone, Deserialize)]
struct TimeseriesRow {
    day_local: String,
    calories: Option<f64>,
    protein: Option<f64>,
    water: Option<f64>,
    carbs_pct: Option<f64>,
    protein_pct: Option<f64>,
    fat_pct: Option<f64>,
}

impl TimeseriesRow {
    /// `None` when the day is not `YYYY-MM-DD`
    fn into_point(self) -> Option<NutritionPoint> {
        let day = NaiveDate::parse_from_str(&self.day_local, "%Y-%m-%d").ok()?;
        Some(NutritionPoint {
            day,
            calories: self.calories.unwrap_or(0.0),
            protein: self.protein.unwrap_or(0.0),
            water: self.water.unwrap_or(0.0),
            carbs_pct: self.carbs_pct.unwrap_or(50.0),
            protein_pct: self.protein_pct.unwrap_or(20.0),
            fat_pct: self.fat_pct.unwrap_or(30.0),
        })
    }
}

/// First instant of `day` in `tz`.
///
/// Where a DST change skips local midnight the day starts an hour later.
pub fn start_of_day(day: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

/// Calendar date right now in `tz`
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

fn day_bound(day: NaiveDate, tz: Tz) -> String {
    start_of_day(day, tz).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Nutrition analytics backed by Supabase RPC
#[derive(Clone)]
pub struct AnalyticsService {
    client: SupabaseClient,
}

impl AnalyticsService {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Daily totals for local days `[start, end)` in `tz`, one point per day
    pub async fn nutrition_timeseries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        tz: Tz,
    ) -> ClientResult<Vec<NutritionPoint>> {
        self.client.require_session().await?;

        let params = TimeseriesParams {
            p_start: day_bound(start, tz),
            p_end: day_bound(end, tz),
            p_tz: tz.name(),
        };
        let rows: Vec<TimeseriesRow> = self.client.rpc(RPC_TIMESERIES, &params).await?;
        let row_count = rows.len();

        let points: Vec<NutritionPoint> = rows.into_iter().filter_map(TimeseriesRow::into_point).collect();
        debug!(rows = row_count, parsed = points.len(), "Fetched nutrition timeseries");

        Ok(fill_missing_days(start, end, &points))
    }
}
