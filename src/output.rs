//! Output formatting and persistence for computed summaries.
//!
//! Supports pretty-printing, the JSON response envelope, and CSV export of
//! rating rows.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt::Debug;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::table::{FilterCriteria, Rating};

/// Response wrapper: `{success, data, count?, timestamp?, filters_applied?}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters_applied: Option<FilterCriteria>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Envelope {
            success: true,
            data,
            count: None,
            timestamp: None,
            filters_applied: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_timestamp(mut self) -> Self {
        self.timestamp = Some(Utc::now());
        self
    }

    /// Echoes the criteria a filtered payload was produced with.
    pub fn with_filters(mut self, criteria: FilterCriteria) -> Self {
        self.filters_applied = Some(criteria);
        self
    }
}

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl Debug) {
    debug!("{:#?}", value);
}

/// Writes a value as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut out: W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Prints a value to stdout as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    write_json(std::io::stdout().lock(), value)
}

/// Writes rating rows to a CSV file in their source layout, header first.
///
/// Overwrites the file if it already exists.
pub fn write_ratings(path: impl AsRef<Path>, rows: &[Rating]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;

    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);
    for row in rows {
        writer.serialize(row.to_record())?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "Exported ratings");
    Ok(())
}
