//! Summary types produced by the aggregation and insight functions.

use serde::Serialize;
use std::collections::BTreeMap;

/// First and last timestamp in a table, formatted `YYYY-MM-DD HH:MM:SS`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Whole-table statistics. The default value is what an empty table reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverallSummary {
    pub total_ratings: usize,
    pub average_score: f64,
    pub median_score: f64,
    pub std_deviation: f64,
    pub score_distribution: BTreeMap<String, usize>,
    pub category_distribution: BTreeMap<String, usize>,
    pub date_range: DateRange,
}

/// Per-facility statistics with a 1-based rank by average score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilitySummary {
    pub facility: String,
    pub total_ratings: usize,
    pub average_score: f64,
    pub std_deviation: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSummary {
    pub academic_year: String,
    pub total_ratings: usize,
    pub average_score: f64,
    pub std_deviation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MajorSummary {
    pub major: String,
    pub total_ratings: usize,
    pub average_score: f64,
    pub std_deviation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSummary {
    pub total_ratings: usize,
    pub average_score: f64,
}

/// Time-of-day label to its summary, ordered by label.
pub type TimeMetrics = BTreeMap<String, TimeSummary>;

/// Mean score per calendar month, oldest first. `labels` and `scores` are parallel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Performance,
    Improvement,
    Trend,
    Time,
}

/// A short narrative finding with its headline number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub value: f64,
    pub recommendation: String,
}

/// Column name to column name to Pearson coefficient. `None` where undefined.
pub type CorrelationMatrix = BTreeMap<String, BTreeMap<String, Option<f64>>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardOverall {
    #[serde(flatten)]
    pub metrics: OverallSummary,
    pub facilities_count: usize,
}

/// Everything the dashboard renders, in one payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub overall: DashboardOverall,
    pub facilities: Vec<FacilitySummary>,
    pub years: Vec<YearSummary>,
    pub majors: Vec<MajorSummary>,
    pub time_analysis: TimeMetrics,
    pub trends: TrendSeries,
    pub insights: Vec<Insight>,
}
