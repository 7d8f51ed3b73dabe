//! In-memory rating table, per-row derived columns, and filtering.
//!
//! Derived attributes are computed once when a [`Rating`] is built and depend
//! only on that row's source fields, so any subset of a table carries exactly
//! the values the full table had. Filtering always returns a new [`Table`].

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Coarse bucket for a 1–5 satisfaction score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SatisfactionCategory {
    Low,
    Medium,
    High,
}

impl SatisfactionCategory {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s <= 2 => Self::Low,
            3 => Self::Medium,
            _ => Self::High,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Part of the day a rating was submitted in, derived from the hour.
///
/// | Hours   | Bucket    |
/// |---------|-----------|
/// | 5–11    | Morning   |
/// | 12–16   | Afternoon |
/// | 17–21   | Evening   |
/// | other   | Night     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=21 => Self::Evening,
            _ => Self::Night,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
            Self::Night => "Night",
        }
    }
}

/// Columns computed from a row's timestamp and score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Derived {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub hour: Option<u32>,
    pub day_name: Option<String>,
    pub satisfaction_category: SatisfactionCategory,
    pub time_of_day: Option<TimeOfDay>,
}

impl Derived {
    fn compute(score: u8, timestamp: Option<NaiveDateTime>) -> Self {
        Derived {
            year: timestamp.map(|t| t.year()),
            month: timestamp.map(|t| t.month()),
            hour: timestamp.map(|t| t.hour()),
            day_name: timestamp.map(|t| t.format("%A").to_string()),
            satisfaction_category: SatisfactionCategory::from_score(score),
            time_of_day: timestamp.map(|t| TimeOfDay::from_hour(t.hour())),
        }
    }
}

/// One survey response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rating {
    pub student_id: String,
    pub academic_year: String,
    pub major: String,
    pub facility_rated: String,
    pub satisfaction_score: u8,
    pub timestamp: Option<NaiveDateTime>,
    pub comments: Option<String>,
    #[serde(flatten)]
    pub derived: Derived,
}

impl Rating {
    /// Builds a row and computes its derived columns.
    pub fn new(
        student_id: impl Into<String>,
        academic_year: impl Into<String>,
        major: impl Into<String>,
        facility_rated: impl Into<String>,
        satisfaction_score: u8,
        timestamp: Option<NaiveDateTime>,
        comments: Option<String>,
    ) -> Self {
        Rating {
            student_id: student_id.into(),
            academic_year: academic_year.into(),
            major: major.into(),
            facility_rated: facility_rated.into(),
            satisfaction_score,
            timestamp,
            comments: comments.filter(|c| !c.is_empty()),
            derived: Derived::compute(satisfaction_score, timestamp),
        }
    }

    /// Flattens the row back into its source CSV shape.
    pub fn to_record(&self) -> RatingRecord {
        RatingRecord {
            student_id: self.student_id.clone(),
            academic_year: self.academic_year.clone(),
            major: self.major.clone(),
            facility_rated: self.facility_rated.clone(),
            satisfaction_score: self.satisfaction_score as i64,
            timestamp: self
                .timestamp
                .map(|t| t.format(crate::parser::TIMESTAMP_FORMAT).to_string()),
            comments: self.comments.clone(),
        }
    }
}

/// A row exactly as it appears in the source CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub student_id: String,
    pub academic_year: String,
    pub major: String,
    pub facility_rated: String,
    pub satisfaction_score: i64,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Optional narrowing criteria. Every present, non-empty field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub facility: Option<String>,
    pub year: Option<String>,
    pub major: Option<String>,
    pub score_range: Option<String>,
}

impl FilterCriteria {
    /// Parses `"min-max"` into an inclusive bound. Anything else yields `None`.
    pub fn parsed_score_range(&self) -> Option<(i64, i64)> {
        let raw = non_empty(&self.score_range)?;
        let mut parts = raw.split('-');
        let min = parts.next()?.trim().parse().ok()?;
        let max = parts.next()?.trim().parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some((min, max))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn matches_ci(field: &str, wanted: Option<&str>) -> bool {
    match wanted {
        Some(w) => field.to_lowercase() == w.to_lowercase(),
        None => true,
    }
}

/// Immutable snapshot of ratings.
///
/// `has_timestamp` records whether the source carried a timestamp column at
/// all; time-based summaries are empty without it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Rating>,
    has_timestamp: bool,
}

impl Table {
    pub fn new(rows: Vec<Rating>, has_timestamp: bool) -> Self {
        Table {
            rows,
            has_timestamp,
        }
    }

    pub fn rows(&self) -> &[Rating] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_timestamp(&self) -> bool {
        self.has_timestamp
    }

    /// Returns a new table holding only the rows that satisfy every criterion.
    ///
    /// Text criteria are case-insensitive exact matches. A `score_range` that
    /// does not parse as `"min-max"` is ignored.
    pub fn filter(&self, criteria: &FilterCriteria) -> Table {
        let facility = non_empty(&criteria.facility);
        let year = non_empty(&criteria.year);
        let major = non_empty(&criteria.major);
        let range = criteria.parsed_score_range();

        if range.is_none() && non_empty(&criteria.score_range).is_some() {
            debug!(score_range = ?criteria.score_range, "Ignoring malformed score range");
        }

        let rows: Vec<Rating> = self
            .rows
            .iter()
            .filter(|r| matches_ci(&r.facility_rated, facility))
            .filter(|r| matches_ci(&r.academic_year, year))
            .filter(|r| matches_ci(&r.major, major))
            .filter(|r| match range {
                Some((min, max)) => {
                    let s = r.satisfaction_score as i64;
                    s >= min && s <= max
                }
                None => true,
            })
            .cloned()
            .collect();

        debug!(before = self.len(), after = rows.len(), "Applied filter");

        Table::new(rows, self.has_timestamp)
    }

    pub fn distinct_facilities(&self) -> Vec<String> {
        self.distinct(|r| &r.facility_rated)
    }

    pub fn distinct_years(&self) -> Vec<String> {
        self.distinct(|r| &r.academic_year)
    }

    pub fn distinct_majors(&self) -> Vec<String> {
        self.distinct(|r| &r.major)
    }

    fn distinct<'a>(&'a self, key: impl Fn(&'a Rating) -> &'a String) -> Vec<String> {
        self.rows
            .iter()
            .map(key)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(y, m, d).and_then(|date| date.and_hms_opt(h, 0, 0))
    }

    fn rating(facility: &str, score: u8) -> Rating {
        Rating::new("STU1", "2022-2023", "Biology", facility, score, None, None)
    }

    fn sample_table() -> Table {
        Table::new(
            vec![rating("Library", 5), rating("Library", 3), rating("Hostel", 1)],
            false,
        )
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(SatisfactionCategory::from_score(1), SatisfactionCategory::Low);
        assert_eq!(SatisfactionCategory::from_score(2), SatisfactionCategory::Low);
        assert_eq!(SatisfactionCategory::from_score(3), SatisfactionCategory::Medium);
        assert_eq!(SatisfactionCategory::from_score(4), SatisfactionCategory::High);
        assert_eq!(SatisfactionCategory::from_score(5), SatisfactionCategory::High);
    }

    #[test]
    fn test_time_of_day_boundaries() {
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(16), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(22), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Night);
    }

    #[test]
    fn test_derived_from_timestamp() {
        let r = Rating::new("S", "2022-2023", "Biology", "Library", 4, at(2023, 1, 2, 18), None);

        assert_eq!(r.derived.year, Some(2023));
        assert_eq!(r.derived.month, Some(1));
        assert_eq!(r.derived.hour, Some(18));
        assert_eq!(r.derived.day_name.as_deref(), Some("Monday"));
        assert_eq!(r.derived.time_of_day, Some(TimeOfDay::Evening));
        assert_eq!(r.derived.satisfaction_category, SatisfactionCategory::High);
    }

    #[test]
    fn test_derived_without_timestamp() {
        let r = rating("Library", 2);

        assert_eq!(r.derived.year, None);
        assert_eq!(r.derived.hour, None);
        assert_eq!(r.derived.time_of_day, None);
        assert_eq!(r.derived.satisfaction_category, SatisfactionCategory::Low);
    }

    #[test]
    fn test_empty_comment_is_none() {
        let r = Rating::new("S", "Y", "M", "F", 3, None, Some(String::new()));
        assert_eq!(r.comments, None);
    }

    #[test]
    fn test_filter_score_range() {
        let filtered = sample_table().filter(&FilterCriteria {
            score_range: Some("3-5".into()),
            ..Default::default()
        });

        assert_eq!(filtered.len(), 2);
        assert!(filtered.rows().iter().all(|r| r.facility_rated == "Library"));
    }

    #[test]
    fn test_filter_case_insensitive() {
        let filtered = sample_table().filter(&FilterCriteria {
            facility: Some("hOSTEL".into()),
            ..Default::default()
        });

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0].satisfaction_score, 1);
    }

    #[test]
    fn test_filter_major_case_insensitive() {
        let table = Table::new(
            vec![
                Rating::new("S1", "2022-2023", "Computer Science", "Library", 5, None, None),
                Rating::new("S2", "2022-2023", "Biology", "Library", 4, None, None),
                Rating::new("S3", "2021-2022", "Computer Science", "Hostel", 2, None, None),
            ],
            false,
        );
        let filtered = table.filter(&FilterCriteria {
            major: Some("computer SCIENCE".into()),
            ..Default::default()
        });

        assert_eq!(filtered.len(), 2);
        assert!(filtered.rows().iter().all(|r| r.major == "Computer Science"));
    }

    #[test]
    fn test_filter_year_case_insensitive() {
        let table = Table::new(
            vec![
                Rating::new("S1", "AY2022-2023", "Biology", "Library", 5, None, None),
                Rating::new("S2", "AY2021-2022", "Biology", "Library", 4, None, None),
            ],
            false,
        );
        let filtered = table.filter(&FilterCriteria {
            year: Some("ay2022-2023".into()),
            ..Default::default()
        });

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0].student_id, "S1");
    }

    #[test]
    fn test_filter_major_and_year_compose() {
        let table = Table::new(
            vec![
                Rating::new("S1", "2022-2023", "Physics", "Library", 5, None, None),
                Rating::new("S2", "2021-2022", "Physics", "Library", 4, None, None),
                Rating::new("S3", "2022-2023", "Biology", "Library", 3, None, None),
            ],
            false,
        );
        let filtered = table.filter(&FilterCriteria {
            major: Some("PHYSICS".into()),
            year: Some("2022-2023".into()),
            ..Default::default()
        });

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0].student_id, "S1");
    }

    #[test]
    fn test_filter_malformed_range_is_ignored() {
        let table = sample_table();
        for bad in ["abc", "3", "3-", "1-2-3", "x-5"] {
            let filtered = table.filter(&FilterCriteria {
                score_range: Some(bad.into()),
                ..Default::default()
            });
            assert_eq!(filtered, table, "range {bad:?} should be a no-op");
        }
    }

    #[test]
    fn test_filter_empty_criteria_is_noop() {
        let table = sample_table();
        let filtered = table.filter(&FilterCriteria {
            facility: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(filtered, table);
    }

    #[test]
    fn test_filter_composes_as_and() {
        let filtered = sample_table().filter(&FilterCriteria {
            facility: Some("library".into()),
            score_range: Some("1-3".into()),
            ..Default::default()
        });

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0].satisfaction_score, 3);
    }

    #[test]
    fn test_filter_does_not_mutate_source() {
        let table = sample_table();
        let _ = table.filter(&FilterCriteria {
            facility: Some("Hostel".into()),
            ..Default::default()
        });
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_parsed_score_range_trims() {
        let c = FilterCriteria {
            score_range: Some(" 2 - 4 ".into()),
            ..Default::default()
        };
        assert_eq!(c.parsed_score_range(), Some((2, 4)));
    }

    #[test]
    fn test_distinct_values_sorted() {
        assert_eq!(sample_table().distinct_facilities(), vec!["Hostel", "Library"]);
        assert_eq!(sample_table().distinct_years(), vec!["2022-2023"]);
    }

    #[test]
    fn test_to_record_round_trips_fields() {
        let r = Rating::new("S", "2022-2023", "Biology", "Library", 4, at(2023, 1, 2, 18), None);
        let rec = r.to_record();
        assert_eq!(rec.satisfaction_score, 4);
        assert_eq!(rec.timestamp.as_deref(), Some("2023-01-02 18:00:00"));
    }
}
