use crate::analyzers::types::{
    DateRange, FacilitySummary, MajorSummary, OverallSummary, TimeMetrics, TimeSummary,
    YearSummary,
};
use crate::analyzers::utility::{mean, median, round2, stddev};
use crate::parser::TIMESTAMP_FORMAT;
use crate::table::{Rating, Table};
use std::collections::BTreeMap;

/// Maximum number of majors reported by [`major_metrics`].
pub const MAJOR_LIMIT: usize = 10;

/// Count, mean, sample std, min and max of one group's scores, unrounded.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GroupStats {
    pub(crate) count: usize,
    pub(crate) mean: f64,
    pub(crate) std: f64,
    pub(crate) min: f64,
    pub(crate) max: f64,
}

impl GroupStats {
    fn from_scores(scores: &[f64]) -> Self {
        let avg = mean(scores);
        GroupStats {
            count: scores.len(),
            mean: avg,
            std: stddev(scores, avg),
            min: scores.iter().copied().fold(f64::INFINITY, f64::min),
            max: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Groups scores by `key`, skipping rows where it yields `None`.
///
/// Groups come back in ascending key order; that order is the tie-break for
/// every ranking built on top of this.
pub(crate) fn group_stats<'a, K: Ord>(
    rows: &'a [Rating],
    key: impl Fn(&'a Rating) -> Option<K>,
) -> BTreeMap<K, GroupStats> {
    let mut series: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for row in rows {
        if let Some(k) = key(row) {
            series
                .entry(k)
                .or_default()
                .push(row.satisfaction_score as f64);
        }
    }

    series
        .into_iter()
        .map(|(k, scores)| (k, GroupStats::from_scores(&scores)))
        .collect()
}

/// Whole-table statistics. An empty table yields [`OverallSummary::default`].
pub fn overall_metrics(table: &Table) -> OverallSummary {
    if table.is_empty() {
        return OverallSummary::default();
    }

    let scores: Vec<f64> = table
        .rows()
        .iter()
        .map(|r| r.satisfaction_score as f64)
        .collect();
    let avg = mean(&scores);

    let mut score_counts: BTreeMap<u8, usize> = BTreeMap::new();
    let mut category_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for row in table.rows() {
        *score_counts.entry(row.satisfaction_score).or_default() += 1;
        *category_distribution
            .entry(row.derived.satisfaction_category.label().to_string())
            .or_default() += 1;
    }

    let date_range = if table.has_timestamp() {
        let stamps = table.rows().iter().filter_map(|r| r.timestamp);
        let fmt = |t: chrono::NaiveDateTime| t.format(TIMESTAMP_FORMAT).to_string();
        DateRange {
            start: stamps.clone().min().map(fmt),
            end: stamps.max().map(fmt),
        }
    } else {
        DateRange::default()
    };

    OverallSummary {
        total_ratings: table.len(),
        average_score: round2(avg),
        median_score: round2(median(&scores)),
        std_deviation: round2(stddev(&scores, avg)),
        score_distribution: score_counts
            .into_iter()
            .map(|(score, count)| (score.to_string(), count))
            .collect(),
        category_distribution,
        date_range,
    }
}

/// Per-facility statistics, best average first, ranked from 1.
pub fn facility_metrics(table: &Table) -> Vec<FacilitySummary> {
    let mut facilities: Vec<FacilitySummary> =
        group_stats(table.rows(), |r| Some(r.facility_rated.clone()))
            .into_iter()
            .map(|(facility, s)| FacilitySummary {
                facility,
                total_ratings: s.count,
                average_score: round2(s.mean),
                std_deviation: round2(s.std),
                min_score: round2(s.min),
                max_score: round2(s.max),
                rank: 0,
            })
            .collect();

    // stable: equal averages keep label order
    facilities.sort_by(|a, b| b.average_score.total_cmp(&a.average_score));
    for (i, facility) in facilities.iter_mut().enumerate() {
        facility.rank = i + 1;
    }

    facilities
}

/// Per-academic-year statistics in ascending label order.
pub fn year_metrics(table: &Table) -> Vec<YearSummary> {
    group_stats(table.rows(), |r| Some(r.academic_year.clone()))
        .into_iter()
        .map(|(academic_year, s)| YearSummary {
            academic_year,
            total_ratings: s.count,
            average_score: round2(s.mean),
            std_deviation: round2(s.std),
        })
        .collect()
}

/// The [`MAJOR_LIMIT`] most-rated majors, most ratings first.
pub fn major_metrics(table: &Table) -> Vec<MajorSummary> {
    let mut majors: Vec<MajorSummary> = group_stats(table.rows(), |r| Some(r.major.clone()))
        .into_iter()
        .map(|(major, s)| MajorSummary {
            major,
            total_ratings: s.count,
            average_score: round2(s.mean),
            std_deviation: round2(s.std),
        })
        .collect();

    majors.sort_by(|a, b| b.total_ratings.cmp(&a.total_ratings));
    majors.truncate(MAJOR_LIMIT);
    majors
}

/// Count and mean per time-of-day bucket. Empty without a timestamp column.
pub fn time_metrics(table: &Table) -> TimeMetrics {
    if !table.has_timestamp() {
        return TimeMetrics::new();
    }

    group_stats(table.rows(), |r| r.derived.time_of_day.map(|t| t.label()))
        .into_iter()
        .map(|(label, s)| {
            (
                label.to_string(),
                TimeSummary {
                    total_ratings: s.count,
                    average_score: round2(s.mean),
                },
            )
        })
        .collect()
}
