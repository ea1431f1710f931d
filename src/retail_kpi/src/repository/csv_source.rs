//! CSV-backed [`RecordSource`].
//!
//! Reads the dashboard's `retail_dataset.csv` layout. Columns are matched by
//! header name (order does not matter, extra columns are ignored) and every
//! cell is validated before a [`RawRecord`] is produced.

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::Deserialize;

use super::{DataLoadError, RecordSource};
use crate::{channel::Channel, record::RawRecord};

/// Columns every input file must carry.
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "date",
    "channel",
    "footfall_or_sessions",
    "purchases",
    "returns",
    "sales_value",
    "returns_value",
    "weekday",
    "is_weekend",
    "is_holiday",
    "promo_flag",
    "weather_score",
];

/// Accepted `weather_score` values.
pub const WEATHER_SCORES: std::ops::RangeInclusive<u8> = 1..=10;

/// Where the CSV text comes from.
#[derive(Debug, Clone)]
enum Input {
    Path(PathBuf),
    Text(String),
}

/// A CSV file (or in-memory CSV text) in the retail dataset layout.
#[derive(Debug, Clone)]
pub struct CsvSource {
    input: Input,
}

impl CsvSource {
    /// Read from a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            input: Input::Path(path.as_ref().to_path_buf()),
        }
    }

    /// Read from CSV text already in memory.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            input: Input::Text(text.into()),
        }
    }
}

impl RecordSource for CsvSource {
    fn read(&self) -> Result<Vec<RawRecord>, DataLoadError> {
        match &self.input {
            Input::Path(path) => {
                let file = File::open(path).map_err(|source| DataLoadError::Io {
                    path: path.clone(),
                    source,
                })?;
                read_csv(file)
            }
            Input::Text(text) => read_csv(text.trim_start_matches('\u{FEFF}').as_bytes()),
        }
    }
}

/// One row with the numeric columns typed by serde and the rest left as text
/// for explicit validation.
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    channel: String,
    footfall_or_sessions: u64,
    purchases: u64,
    returns: u64,
    sales_value: f64,
    returns_value: f64,
    weekday: String,
    is_weekend: String,
    is_holiday: String,
    promo_flag: String,
    weather_score: u8,
}

/// Parse every row of `reader` into [`RawRecord`]s.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<RawRecord>, DataLoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|source| DataLoadError::Csv { line: 1, source })?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DataLoadError::MissingColumn(column.to_string()));
        }
    }

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|source| DataLoadError::Csv {
            line: source.position().map_or(0, |p| p.line()),
            source,
        })?;
        let line = record.position().map_or(0, |p| p.line());
        let row: CsvRow = record
            .deserialize(Some(&headers))
            .map_err(|source| DataLoadError::Csv { line, source })?;
        out.push(row_to_raw(row, line)?);
    }
    Ok(out)
}

fn row_to_raw(row: CsvRow, line: u64) -> Result<RawRecord, DataLoadError> {
    let date = parse_date(&row.date).ok_or_else(|| DataLoadError::InvalidDate {
        line,
        value: row.date.clone(),
    })?;
    let channel = row
        .channel
        .parse::<Channel>()
        .map_err(|_| DataLoadError::InvalidField {
            line,
            column: "channel",
            value: row.channel.clone(),
        })?;
    let weekday = row
        .weekday
        .parse::<Weekday>()
        .map_err(|_| DataLoadError::InvalidField {
            line,
            column: "weekday",
            value: row.weekday.clone(),
        })?;

    Ok(RawRecord {
        date,
        channel,
        footfall_or_sessions: row.footfall_or_sessions,
        purchases: row.purchases,
        returns: row.returns,
        sales_value: check_money(row.sales_value, "sales_value", line)?,
        returns_value: check_money(row.returns_value, "returns_value", line)?,
        weekday,
        is_weekend: parse_flag(&row.is_weekend, "is_weekend", line)?,
        is_holiday: parse_flag(&row.is_holiday, "is_holiday", line)?,
        promo_flag: parse_flag(&row.promo_flag, "promo_flag", line)?,
        weather_score: check_weather(row.weather_score, line)?,
    })
}

/// Money columns must be finite and non-negative.
fn check_money(value: f64, column: &'static str, line: u64) -> Result<f64, DataLoadError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(DataLoadError::InvalidField {
            line,
            column,
            value: value.to_string(),
        })
    }
}

fn check_weather(score: u8, line: u64) -> Result<u8, DataLoadError> {
    if WEATHER_SCORES.contains(&score) {
        Ok(score)
    } else {
        Err(DataLoadError::InvalidField {
            line,
            column: "weather_score",
            value: score.to_string(),
        })
    }
}

/// ISO date, optionally followed by a time part that is dropped.
fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .ok()
}

/// Flags come as `0`/`1` or as boolean literals, depending on the column.
fn parse_flag(s: &str, column: &'static str, line: u64) -> Result<bool, DataLoadError> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(DataLoadError::InvalidField {
            line,
            column,
            value: s.to_string(),
        }),
    }
}
