//! Loads the rating table from disk, falling back to synthetic data.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

use crate::parser::parse_ratings;
use crate::table::{Rating, Table};

pub const SYNTHETIC_ROWS: usize = 1000;
pub const SYNTHETIC_SEED: u64 = 42;

const SYNTHETIC_YEARS: &[&str] = &["2021-2022", "2022-2023", "2023-2024"];
const SYNTHETIC_MAJORS: &[&str] = &[
    "Computer Science",
    "Mechanical",
    "Electrical",
    "Civil",
    "Business",
];
const SYNTHETIC_FACILITIES: &[&str] = &["Library", "Hostel", "Cafeteria", "Sports", "Lab"];

/// Result of [`load`]. Both variants carry a usable table.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Loaded(Table),
    Synthesized(Table),
}

impl LoadOutcome {
    pub fn table(&self) -> &Table {
        match self {
            LoadOutcome::Loaded(t) | LoadOutcome::Synthesized(t) => t,
        }
    }

    pub fn into_table(self) -> Table {
        match self {
            LoadOutcome::Loaded(t) | LoadOutcome::Synthesized(t) => t,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self, LoadOutcome::Synthesized(_))
    }
}

/// Reads the CSV at `path`. Any failure is logged and replaced by
/// [`synthetic_table`], so callers always get a table.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>) -> LoadOutcome {
    match read_table(path.as_ref()) {
        Ok(table) => {
            info!(rows = table.len(), "Data loaded successfully");
            LoadOutcome::Loaded(table)
        }
        Err(e) => {
            warn!(error = %format!("{e:#}"), "Error loading data, using synthetic sample");
            let table = synthetic_table();
            info!(rows = table.len(), "Sample data created");
            LoadOutcome::Synthesized(table)
        }
    }
}

fn read_table(path: &Path) -> Result<Table> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_ratings(file)
}

/// Deterministic stand-in table with the same schema as a real export.
pub fn synthetic_table() -> Table {
    let mut rng = StdRng::seed_from_u64(SYNTHETIC_SEED);
    let start = NaiveDate::from_ymd_opt(2021, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();

    let rows = (0..SYNTHETIC_ROWS)
        .map(|i| {
            let year = SYNTHETIC_YEARS[rng.random_range(0..SYNTHETIC_YEARS.len())];
            let major = SYNTHETIC_MAJORS[rng.random_range(0..SYNTHETIC_MAJORS.len())];
            let facility = SYNTHETIC_FACILITIES[rng.random_range(0..SYNTHETIC_FACILITIES.len())];
            let score: u8 = rng.random_range(1..=5);

            Rating::new(
                format!("STU{}", 10000 + i),
                year,
                major,
                facility,
                score,
                Some(start + Duration::hours(i as i64)),
                None,
            )
        })
        .collect();

    Table::new(rows, true)
}
