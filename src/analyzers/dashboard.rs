use crate::analyzers::aggregate::{
    facility_metrics, major_metrics, overall_metrics, time_metrics, year_metrics,
};
use crate::analyzers::insights::{insights, trend_analysis};
use crate::analyzers::types::{DashboardOverall, DashboardSummary};
use crate::table::{FilterCriteria, Table};
use tracing::{debug, info};

/// Filtered views at or below this many rows borrow trends and insights from
/// the full table.
pub const DEFAULT_FILTERED_INSIGHT_MIN_ROWS: usize = 10;

/// Every aggregate, trend and insight for `table`.
#[tracing::instrument(skip_all, fields(rows = table.len()))]
pub fn dashboard_summary(table: &Table) -> DashboardSummary {
    let mut summary = aggregates(table);
    summary.trends = trend_analysis(table);
    summary.insights = insights(table);
    summary
}

/// Dashboard for the rows of `full` matching `criteria`.
///
/// Aggregates always describe the filtered rows. Trends and insights only do
/// when more than `min_rows` rows survive; otherwise they describe `full`.
/// No matching rows yields [`DashboardSummary::default`].
#[tracing::instrument(skip(full), fields(rows = full.len()))]
pub fn filtered_dashboard_summary(
    full: &Table,
    criteria: &FilterCriteria,
    min_rows: usize,
) -> DashboardSummary {
    let filtered = full.filter(criteria);
    if filtered.is_empty() {
        info!("No rows match filters");
        return DashboardSummary::default();
    }

    let mut summary = aggregates(&filtered);
    let source = if filtered.len() > min_rows {
        &filtered
    } else {
        debug!(
            filtered = filtered.len(),
            min_rows, "Filtered view too small, using full table for trends"
        );
        full
    };
    summary.trends = trend_analysis(source);
    summary.insights = insights(source);

    info!(filtered = filtered.len(), "Filtered dashboard built");
    summary
}

fn aggregates(table: &Table) -> DashboardSummary {
    let facilities = facility_metrics(table);
    DashboardSummary {
        overall: DashboardOverall {
            metrics: overall_metrics(table),
            facilities_count: facilities.len(),
        },
        facilities,
        years: year_metrics(table),
        majors: major_metrics(table),
        time_analysis: time_metrics(table),
        ..Default::default()
    }
}
