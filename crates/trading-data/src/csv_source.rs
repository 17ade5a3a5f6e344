//! CSV price history source.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;
use trading_core::error::StorageError;
use trading_core::types::PriceObservation;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: String,
}

/// Directory of `{SYMBOL}.csv` price histories.
#[derive(Debug, Clone)]
pub struct CsvBarSource {
    dir: PathBuf,
}

impl CsvBarSource {
    /// Create a new CSV source rooted at `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// File holding `symbol`'s history.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol.to_uppercase()))
    }

    /// Load `symbol`'s observations, oldest first.
    pub fn load(&self, symbol: &str) -> Result<Vec<PriceObservation>, StorageError> {
        Self::read_file(self.path_for(symbol), symbol)
    }

    /// Load every `.csv` file in the directory, keyed by file stem.
    pub fn load_all(&self) -> Result<Vec<(String, Vec<PriceObservation>)>, StorageError> {
        let mut histories = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let Some(symbol) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let symbol = symbol.to_uppercase();
            let observations = Self::read_file(&path, &symbol)?;
            histories.push((symbol, observations));
        }
        histories.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(histories)
    }

    /// Read observations for `symbol` from a single file.
    pub fn read_file(
        path: impl AsRef<Path>,
        symbol: &str,
    ) -> Result<Vec<PriceObservation>, StorageError> {
        let path = path.as_ref();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| StorageError::Csv(format!("{}: {}", path.display(), e)))?;

        let mut observations = Vec::new();

        for (row, result) in reader.deserialize().enumerate() {
            let record: CsvRecord = result.map_err(|e| StorageError::Csv(e.to_string()))?;

            let timestamp = parse_timestamp(&record.date)?;
            let close = Decimal::from_str(record.close.trim()).map_err(|e| {
                StorageError::Corrupt(format!("{} row {}: close: {}", path.display(), row + 1, e))
            })?;

            observations.push(PriceObservation::new(symbol, timestamp, close));
        }

        observations.sort_by_key(|o| o.timestamp);
        debug!(symbol, path = %path.display(), count = observations.len(), "loaded price history");

        Ok(observations)
    }
}

/// Parse various timestamp formats.
fn parse_timestamp(date_str: &str) -> Result<DateTime<Utc>, StorageError> {
    let date_str = date_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.with_timezone(&Utc));
    }

    let formats = ["%Y-%m-%d", "%Y-%m-%d %H:%M:%S", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc());
        }
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(dt.and_utc());
            }
        }
    }

    // Unix timestamp, milliseconds if more than 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        let parsed = if ts > 10_000_000_000 {
            DateTime::from_timestamp_millis(ts)
        } else {
            DateTime::from_timestamp(ts, 0)
        };
        if let Some(dt) = parsed {
            return Ok(dt);
        }
    }

    Err(StorageError::Corrupt(format!(
        "Could not parse date: {}",
        date_str
    )))
}
