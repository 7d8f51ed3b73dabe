use campus_pulse::analyzers::aggregate::{
    facility_metrics, major_metrics, overall_metrics, time_metrics, year_metrics,
};
use campus_pulse::analyzers::dashboard::{dashboard_summary, filtered_dashboard_summary};
use campus_pulse::analyzers::insights::{correlation_analysis, insights, trend_analysis};
use campus_pulse::analyzers::types::InsightKind;
use campus_pulse::output::write_ratings;
use campus_pulse::source::{LoadOutcome, load};
use campus_pulse::table::{FilterCriteria, Table};

fn fixture() -> Table {
    match load(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample_ratings.csv")) {
        LoadOutcome::Loaded(table) => table,
        LoadOutcome::Synthesized(_) => panic!("fixture failed to load"),
    }
}

#[test]
fn test_full_pipeline() {
    let table = fixture();
    let overall = overall_metrics(&table);

    assert_eq!(overall.total_ratings, 16);
    assert_eq!(overall.average_score, 3.56);
    assert_eq!(overall.median_score, 4.0);
    assert_eq!(overall.std_deviation, 1.31);
    assert_eq!(overall.score_distribution.values().sum::<usize>(), 16);
    assert_eq!(overall.score_distribution["5"], 5);
    assert_eq!(overall.date_range.start.as_deref(), Some("2022-03-11 11:11:00"));
    assert_eq!(overall.date_range.end.as_deref(), Some("2024-01-08 07:50:00"));
}

#[test]
fn test_group_metrics() {
    let table = fixture();

    let facilities = facility_metrics(&table);
    let names: Vec<_> = facilities.iter().map(|f| f.facility.as_str()).collect();
    assert_eq!(names, vec!["Computer Lab", "Library", "Cafeteria", "Hostel"]);
    assert_eq!(facilities[0].average_score, 4.67);
    assert_eq!(facilities[3].average_score, 2.0);
    assert_eq!(facilities[3].rank, 4);

    let years = year_metrics(&table);
    assert_eq!(years.len(), 3);
    assert_eq!(years[0].academic_year, "2021-2022");
    assert_eq!(years[0].average_score, 3.6);

    let majors = major_metrics(&table);
    assert_eq!(majors[0].total_ratings, 5);

    let time = time_metrics(&table);
    assert_eq!(time["Morning"].total_ratings, 6);
    assert_eq!(time["Morning"].average_score, 4.33);
    assert_eq!(time["Night"].average_score, 1.0);
    // the row without a timestamp is not bucketed
    assert_eq!(time.values().map(|t| t.total_ratings).sum::<usize>(), 15);
}

#[test]
fn test_insights_and_trends() {
    let table = fixture();

    let found = insights(&table);
    assert_eq!(found.len(), 4);
    assert_eq!(found[0].kind, InsightKind::Performance);
    assert_eq!(found[0].value, 4.67);
    assert!(found[0].description.starts_with("Computer Lab"));
    assert_eq!(found[1].kind, InsightKind::Improvement);
    assert!(found[1].description.starts_with("Hostel"));
    assert_eq!(found[2].kind, InsightKind::Trend);
    assert!(found[2].description.contains("increasing"));
    assert_eq!(found[2].value, 4.0);
    assert_eq!(found[3].kind, InsightKind::Time);
    assert!(found[3].description.ends_with("Morning"));

    let trend = trend_analysis(&table);
    assert_eq!(trend.labels.first().map(String::as_str), Some("2022-03"));
    assert_eq!(trend.labels.last().map(String::as_str), Some("2024-01"));
    assert_eq!(trend.labels.len(), trend.scores.len());
    assert_eq!(trend.scores[3], 3.67);

    let matrix = correlation_analysis(&table);
    assert_eq!(matrix.len(), 4);
    assert_eq!(matrix["hour"]["hour"], Some(1.0));
}

#[test]
fn test_filtered_dashboard() {
    let table = fixture();
    let criteria = FilterCriteria {
        year: Some("2023-2024".into()),
        score_range: Some("4-5".into()),
        ..Default::default()
    };

    let summary = filtered_dashboard_summary(&table, &criteria, 10);
    assert_eq!(summary.overall.metrics.total_ratings, 4);
    assert!(summary.facilities.iter().all(|f| f.average_score >= 4.0));
    // four rows is below the threshold, so insights describe the full table
    assert_eq!(summary.insights, insights(&table));
    assert_eq!(summary.trends, trend_analysis(&table));

    let full = dashboard_summary(&table);
    assert_eq!(full.overall.facilities_count, 4);
    assert_eq!(full.insights.len(), 4);
}

#[test]
fn test_export_and_reload() {
    let table = fixture();
    let hostel = table.filter(&FilterCriteria {
        facility: Some("HOSTEL".into()),
        ..Default::default()
    });
    assert_eq!(hostel.len(), 4);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hostel.csv");
    write_ratings(&path, hostel.rows()).unwrap();

    let reloaded = load(&path).into_table();
    assert_eq!(reloaded.rows(), hostel.rows());
    assert_eq!(facility_metrics(&reloaded), facility_metrics(&hostel));
}

#[test]
fn test_missing_source_falls_back() {
    let outcome = load("tests/fixtures/missing.csv");

    assert!(outcome.is_synthesized());
    let table = outcome.table();
    assert_eq!(table.len(), 1000);
    assert_eq!(facility_metrics(table).len(), 5);
    assert!(!insights(table).is_empty());
}
