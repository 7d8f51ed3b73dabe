//! CSV parser for survey rating exports.

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::io::Read;

use crate::table::{Rating, RatingRecord, Table};

/// Canonical timestamp layout used for display and CSV export.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const REQUIRED_COLUMNS: &[&str] = &[
    "student_id",
    "academic_year",
    "major",
    "facility_rated",
    "satisfaction_score",
];

/// Parses a timestamp in any of the layouts survey exports use.
///
/// Accepts `YYYY-MM-DD HH:MM[:SS]`, the ISO `T` separated form (optionally
/// with fractional seconds), RFC 3339 with an offset or `Z` (converted to
/// UTC), and a bare date which is read as midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|d| d.naive_utc()))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Decodes a CSV stream into a [`Table`].
///
/// # Errors
///
/// Returns an error if a required column is missing, a score is not an
/// integer between 1 and 5, or a non-empty timestamp cannot be parsed.
pub fn parse_ratings<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers().context("reading CSV header")?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            bail!("missing required column '{column}'");
        }
    }
    let has_timestamp = headers.iter().any(|h| h == "timestamp");

    let mut rows = Vec::new();
    for (idx, result) in rdr.deserialize().enumerate() {
        let record: RatingRecord = result.with_context(|| format!("decoding row {}", idx + 1))?;
        rows.push(to_rating(record).with_context(|| format!("invalid row {}", idx + 1))?);
    }

    Ok(Table::new(rows, has_timestamp))
}

fn to_rating(record: RatingRecord) -> Result<Rating> {
    let score = u8::try_from(record.satisfaction_score)
        .ok()
        .filter(|s| (1..=5).contains(s))
        .ok_or_else(|| anyhow!("score {} outside 1-5", record.satisfaction_score))?;

    let timestamp = match record.timestamp.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => {
            Some(parse_timestamp(raw).ok_or_else(|| anyhow!("unparsable timestamp '{raw}'"))?)
        }
    };

    Ok(Rating::new(
        record.student_id,
        record.academic_year,
        record.major,
        record.facility_rated,
        score,
        timestamp,
        record.comments,
    ))
}
