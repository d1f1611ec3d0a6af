//! Nutrition analytics over daily timeseries
//!
//! Daily rows come back sparse from the server; these helpers densify them,
//! smooth them and score them against a daily goal.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Window of days shown in analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    Week,
    Month,
    Year,
}

impl TimeRange {
    /// Number of days covered
    pub fn days(&self) -> u64 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Year => 365,
        }
    }

    /// Moving-average window used for charts
    pub fn moving_average_window(&self) -> usize {
        match self {
            TimeRange::Year => 14,
            TimeRange::Week | TimeRange::Month => 7,
        }
    }

    /// `[start, end)` ending with `today` inclusive
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = today
            .checked_sub_days(Days::new(self.days() - 1))
            .unwrap_or(today);
        let end = today.checked_add_days(Days::new(1)).unwrap_or(today);
        (start, end)
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "year" => Ok(TimeRange::Year),
            _ => Err(format!("Unknown time range: {}", s)),
        }
    }
}

/// Metric plotted in analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NutritionMetric {
    #[default]
    Calories,
    Protein,
    Water,
}

impl NutritionMetric {
    pub fn unit(&self) -> &'static str {
        match self {
            NutritionMetric::Calories => "kcal",
            NutritionMetric::Protein => "g",
            NutritionMetric::Water => "L",
        }
    }

    /// Daily target
    pub fn goal(&self) -> f64 {
        match self {
            NutritionMetric::Calories => 2200.0,
            NutritionMetric::Protein => 75.0,
            NutritionMetric::Water => 2.0,
        }
    }
}

impl fmt::Display for NutritionMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NutritionMetric::Calories => "Calories",
            NutritionMetric::Protein => "Protein",
            NutritionMetric::Water => "Water",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for NutritionMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "calories" | "kcal" => Ok(NutritionMetric::Calories),
            "protein" => Ok(NutritionMetric::Protein),
            "water" => Ok(NutritionMetric::Water),
            _ => Err(format!("Unknown metric: {}", s)),
        }
    }
}

/// One day of nutrition totals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionPoint {
    pub day: NaiveDate,
    pub calories: f64,
    pub protein: f64,
    pub water: f64,
    pub carbs_pct: f64,
    pub protein_pct: f64,
    pub fat_pct: f64,
}

impl NutritionPoint {
    /// Day with nothing logged
    pub fn empty(day: NaiveDate) -> Self {
        Self {
            day,
            calories: 0.0,
            protein: 0.0,
            water: 0.0,
            carbs_pct: 0.0,
            protein_pct: 0.0,
            fat_pct: 0.0,
        }
    }

    pub fn value(&self, metric: NutritionMetric) -> f64 {
        match metric {
            NutritionMetric::Calories => self.calories,
            NutritionMetric::Protein => self.protein,
            NutritionMetric::Water => self.water,
        }
    }
}

/// One point per day in `[start, end)`, zero-filled where nothing was logged
pub fn fill_missing_days(start: NaiveDate, end: NaiveDate, points: &[NutritionPoint]) -> Vec<NutritionPoint> {
    let by_day: HashMap<NaiveDate, &NutritionPoint> = points.iter().map(|p| (p.day, p)).collect();

    start
        .iter_days()
        .take_while(|day| *day < end)
        .map(|day| by_day.get(&day).map(|p| **p).unwrap_or_else(|| NutritionPoint::empty(day)))
        .collect()
}

/// Trailing mean over each full window.
///
/// Empty when `window <= 1` or there are fewer values than the window.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 || values.len() < window {
        return vec![];
    }

    let mut result = Vec::with_capacity(values.len() - window + 1);
    let mut running: f64 = values[..window].iter().sum();
    result.push(running / window as f64);

    for i in window..values.len() {
        running += values[i] - values[i - window];
        result.push(running / window as f64);
    }

    result
}

/// Percentage of days within ±5 % of the goal, rounded
pub fn adherence_pct(values: &[f64], goal: f64) -> u32 {
    if values.is_empty() {
        return 0;
    }
    let hits = values
        .iter()
        .filter(|v| **v >= goal * 0.95 && **v <= goal * 1.05)
        .count();
    ((hits as f64 / values.len() as f64) * 100.0).round() as u32
}

/// Headline numbers for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub total: f64,
    pub average: f64,
    pub adherence_pct: u32,
}

pub fn summarize(points: &[NutritionPoint], metric: NutritionMetric) -> MetricSummary {
    let values: Vec<f64> = points.iter().map(|p| p.value(metric)).collect();
    let total: f64 = values.iter().sum();
    let average = if values.is_empty() { 0.0 } else { total / values.len() as f64 };

    MetricSummary {
        total,
        average,
        adherence_pct: adherence_pct(&values, metric.goal()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    #[test]
    fn test_bounds_for_week() {
        let (start, end) = TimeRange::Week.bounds(day(10));
        assert_eq!(start, day(4));
        assert_eq!(end, day(11));
    }

    #[test]
    fn test_fill_missing_days() {
        let logged = NutritionPoint { calories: 1800.0, ..NutritionPoint::empty(day(3)) };
        let filled = fill_missing_days(day(1), day(5), &[logged]);

        assert_eq!(filled.len(), 4);
        assert_eq!(filled[0], NutritionPoint::empty(day(1)));
        assert_eq!(filled[2].calories, 1800.0);
        assert!(filled.windows(2).all(|w| w[0].day < w[1].day));
    }

    #[test]
    fn test_fill_ignores_points_outside_range() {
        let outside = NutritionPoint { water: 2.0, ..NutritionPoint::empty(day(20)) };
        let filled = fill_missing_days(day(1), day(3), &[outside]);
        assert_eq!(filled.len(), 2);
        assert!(filled.iter().all(|p| p.water == 0.0));
    }

    #[test]
    fn test_moving_average() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = moving_average(&values, 3);
        assert_eq!(result.len(), 3);
        assert!((result[0] - 2.0).abs() < 0.001); // avg of [1,2,3]
        assert!((result[2] - 4.0).abs() < 0.001); // avg of [3,4,5]
    }

    #[test]
    fn test_moving_average_degenerate_windows() {
        assert!(moving_average(&[1.0, 2.0], 1).is_empty());
        assert!(moving_average(&[1.0, 2.0], 3).is_empty());
        assert!(moving_average(&[], 7).is_empty());
    }

    #[test]
    fn test_adherence() {
        let values = [2200.0, 2100.0, 1000.0, 2300.0];
        // 2100 and 2300 are within 5% of 2200 (2090..=2310)
        assert_eq!(adherence_pct(&values, 2200.0), 100 * 3 / 4);
        assert_eq!(adherence_pct(&[], 2200.0), 0);
    }

    #[test]
    fn test_summarize() {
        let points = vec![
            NutritionPoint { protein: 75.0, ..NutritionPoint::empty(day(1)) },
            NutritionPoint { protein: 25.0, ..NutritionPoint::empty(day(2)) },
        ];
        let summary = summarize(&points, NutritionMetric::Protein);
        assert_eq!(summary.total, 100.0);
        assert_eq!(summary.average, 50.0);
        assert_eq!(summary.adherence_pct, 50);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: one average per full window
        #[test]
        fn prop_moving_average_len(values in prop::collection::vec(0.0f64..5000.0, 0..60), window in 2usize..15) {
            let result = moving_average(&values, window);
            let expected = if values.len() < window { 0 } else { values.len() - window + 1 };
            prop_assert_eq!(result.len(), expected);
        }

        /// Property: averages stay within the input range
        #[test]
        fn prop_moving_average_bounded(values in prop::collection::vec(0.0f64..5000.0, 14..60)) {
            let max = values.iter().cloned().fold(f64::MIN, f64::max);
            for avg in moving_average(&values, 7) {
                prop_assert!(avg <= max + 1e-6);
                prop_assert!(avg >= -1e-6);
            }
        }
    }
}
