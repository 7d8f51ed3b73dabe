//! Runtime settings read from the environment (and `.env`, via `dotenvy`).

use crate::analyzers::dashboard::DEFAULT_FILTERED_INSIGHT_MIN_ROWS;

pub const DEFAULT_DATA_FILE_PATH: &str = "data/campus_pulse_student_satisfaction.csv";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/campus_pulse.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// CSV export to load ratings from.
    pub data_file_path: String,
    pub log_file_path: String,
    pub filtered_insight_min_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file_path: DEFAULT_DATA_FILE_PATH.to_string(),
            log_file_path: DEFAULT_LOG_FILE_PATH.to_string(),
            filtered_insight_min_rows: DEFAULT_FILTERED_INSIGHT_MIN_ROWS,
        }
    }
}

impl Config {
    /// Reads `DATA_FILE_PATH`, `LOG_FILE_PATH` and `FILTERED_INSIGHT_MIN_ROWS`,
    /// keeping defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();
        Config {
            data_file_path: lookup("DATA_FILE_PATH").unwrap_or(defaults.data_file_path),
            log_file_path: lookup("LOG_FILE_PATH").unwrap_or(defaults.log_file_path),
            filtered_insight_min_rows: lookup("FILTERED_INSIGHT_MIN_ROWS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.filtered_insight_min_rows),
        }
    }
}
