//! Narrative findings, the monthly trend series, and the correlation matrix.
//!
//! All functions take the table they describe, so a filtered view is
//! analysed by passing the filtered table.

use crate::analyzers::aggregate::{GroupStats, group_stats};
use crate::analyzers::types::{CorrelationMatrix, Insight, InsightKind, TrendSeries};
use crate::analyzers::utility::{pearson, round_to, round2};
use crate::table::{Rating, Table};
use std::collections::BTreeMap;

/// Mean score per `YYYY-MM` month, oldest first.
pub fn trend_analysis(table: &Table) -> TrendSeries {
    if !table.has_timestamp() {
        return TrendSeries::default();
    }

    let months = group_stats(table.rows(), |r| {
        r.timestamp.map(|t| t.format("%Y-%m").to_string())
    });

    let (labels, scores) = months
        .into_iter()
        .map(|(label, s)| (label, round2(s.mean)))
        .unzip();

    TrendSeries { labels, scores }
}

/// Highest-mean group; ties go to the first key.
fn best<K>(groups: &BTreeMap<K, GroupStats>) -> Option<(&K, f64)> {
    groups.iter().fold(None, |acc, (k, s)| match acc {
        Some((_, m)) if s.mean <= m => acc,
        _ => Some((k, s.mean)),
    })
}

/// Lowest-mean group; ties go to the first key.
fn worst<K>(groups: &BTreeMap<K, GroupStats>) -> Option<(&K, f64)> {
    groups.iter().fold(None, |acc, (k, s)| match acc {
        Some((_, m)) if s.mean >= m => acc,
        _ => Some((k, s.mean)),
    })
}

/// Builds the fixed sequence of findings for `table`.
///
/// Order: best facility, worst facility, then the academic-year trend when
/// two or more years exist, then the best time of day when timestamps exist.
pub fn insights(table: &Table) -> Vec<Insight> {
    if table.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();

    let facilities = group_stats(table.rows(), |r| Some(r.facility_rated.as_str()));
    if let Some((name, score)) = best(&facilities) {
        out.push(Insight {
            kind: InsightKind::Performance,
            title: "🏆 Best Performing Facility".into(),
            description: format!("{name} has the highest average satisfaction score"),
            value: round2(score),
            recommendation: format!("Replicate best practices from {name}"),
        });
    }
    if let Some((name, score)) = worst(&facilities) {
        out.push(Insight {
            kind: InsightKind::Improvement,
            title: "⚠️ Priority Improvement".into(),
            description: format!("{name} needs immediate attention"),
            value: round2(score),
            recommendation: format!("Focus improvement efforts on {name}"),
        });
    }

    let years = group_stats(table.rows(), |r| Some(r.academic_year.as_str()));
    let mut year_means = years.values().map(|s| s.mean);
    if let (Some(first), Some(last)) = (year_means.next(), year_means.next_back()) {
        let increasing = last > first;
        let direction = if increasing { "increasing" } else { "decreasing" };
        out.push(Insight {
            kind: InsightKind::Trend,
            title: "📈 Satisfaction Trend".into(),
            description: format!("Overall satisfaction is {direction} over the years"),
            value: round2(last),
            recommendation: if increasing {
                "Continue current initiatives".into()
            } else {
                "Review current strategies".into()
            },
        });
    }

    if table.has_timestamp() {
        let periods = group_stats(table.rows(), |r| r.derived.time_of_day.map(|t| t.label()));
        if let Some((period, score)) = best(&periods) {
            out.push(Insight {
                kind: InsightKind::Time,
                title: "⏰ Best Time Period".into(),
                description: format!("Highest satisfaction during {period}"),
                value: round2(score),
                recommendation: format!("Schedule important activities during {period}"),
            });
        }
    }

    out
}

type ColumnFn = fn(&Rating) -> Option<f64>;

fn score_column(r: &Rating) -> Option<f64> {
    Some(r.satisfaction_score as f64)
}

fn year_column(r: &Rating) -> Option<f64> {
    r.derived.year.map(f64::from)
}

fn month_column(r: &Rating) -> Option<f64> {
    r.derived.month.map(f64::from)
}

fn hour_column(r: &Rating) -> Option<f64> {
    r.derived.hour.map(f64::from)
}

/// Numeric columns of the table; the timestamp-derived ones only exist when
/// the source had a timestamp column.
fn numeric_columns(table: &Table) -> Vec<(&'static str, ColumnFn)> {
    let mut columns = vec![("satisfaction_score", score_column as ColumnFn)];
    if table.has_timestamp() {
        columns.push(("year", year_column));
        columns.push(("month", month_column));
        columns.push(("hour", hour_column));
    }
    columns
}

/// Pairwise Pearson correlation across numeric columns, rounded to 3 decimals.
///
/// Each pair uses only rows where both values are present. Empty when the
/// table is empty or has fewer than two numeric columns.
pub fn correlation_analysis(table: &Table) -> CorrelationMatrix {
    let columns = numeric_columns(table);
    if table.is_empty() || columns.len() < 2 {
        return CorrelationMatrix::new();
    }

    let mut matrix = CorrelationMatrix::new();
    for (name_a, col_a) in &columns {
        let row = matrix.entry(name_a.to_string()).or_default();
        for (name_b, col_b) in &columns {
            let (xs, ys): (Vec<f64>, Vec<f64>) = table
                .rows()
                .iter()
                .filter_map(|r| Some((col_a(r)?, col_b(r)?)))
                .unzip();
            row.insert(name_b.to_string(), pearson(&xs, &ys).map(|c| round_to(c, 3)));
        }
    }
    matrix
}
