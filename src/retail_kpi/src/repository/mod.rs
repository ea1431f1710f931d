//! Record repository.
//!
//! The [`Repository`] is the immutable, fully parsed dataset. It is built once
//! per session from a [`RecordSource`] and then only read: every downstream
//! component works on [`RecordView`]s that borrow from it. Reloading means
//! building a new `Repository`; there is no incremental update and no global
//! cache, the caller owns the value.
//!
//! ```
//! use retail_kpi::repository::{CsvSource, Repository};
//!
//! let csv = "date,channel,footfall_or_sessions,purchases,returns,sales_value,returns_value,weekday,is_weekend,is_holiday,promo_flag,weather_score\n\
//!            2026-01-05,store,1000,100,0,10000,0,Monday,0,0,0,6";
//! let repo = Repository::load(&CsvSource::from_text(csv)).unwrap();
//! assert_eq!(repo.record_count(), 1);
//! assert_eq!(repo.min_date(), repo.max_date());
//! ```

mod csv_source;
mod errors;

use chrono::NaiveDate;

pub use csv_source::{CsvSource, REQUIRED_COLUMNS, WEATHER_SCORES, read_csv};
pub use errors::DataLoadError;

use crate::{
    channel::Channel,
    filter::DateRange,
    record::{RawRecord, Record},
    view::RecordView,
};

/// Anything that can hand over the full set of raw records.
///
/// This is the seam to the data-acquisition side: a CSV file, a database
/// query, a fixture in a test.
pub trait RecordSource {
    /// Read every record. Called exactly once per [`Repository::load`].
    fn read(&self) -> Result<Vec<RawRecord>, DataLoadError>;
}

/// A source over records already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    rows: Vec<RawRecord>,
}

impl InMemorySource {
    /// Wrap a list of rows.
    pub fn new(rows: Vec<RawRecord>) -> Self {
        Self { rows }
    }
}

impl RecordSource for InMemorySource {
    fn read(&self) -> Result<Vec<RawRecord>, DataLoadError> {
        Ok(self.rows.clone())
    }
}

/// The loaded dataset: records sorted by `(date, channel)` with derived fields frozen.
#[derive(Debug, Clone)]
pub struct Repository {
    records: Vec<Record>,
    min_date: NaiveDate,
    max_date: NaiveDate,
}

impl Repository {
    /// Read `source` and build a repository.
    ///
    /// Errors:
    /// - Anything the source reports (I/O, missing column, bad date, ...)
    /// - [`DataLoadError::Empty`] when the source has no rows
    pub fn load<S: RecordSource + ?Sized>(source: &S) -> Result<Self, DataLoadError> {
        Self::from_raw(source.read()?)
    }

    /// Build a repository from rows already parsed.
    pub fn from_raw(rows: Vec<RawRecord>) -> Result<Self, DataLoadError> {
        let mut records: Vec<Record> = rows.into_iter().map(Record::new).collect();
        records.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.channel.cmp(&b.channel)));

        let (Some(first), Some(last)) = (records.first(), records.last()) else {
            return Err(DataLoadError::Empty);
        };
        let (min_date, max_date) = (first.date, last.date);

        tracing::info!(
            records = records.len(),
            %min_date,
            %max_date,
            "loaded retail dataset"
        );
        Ok(Self {
            records,
            min_date,
            max_date,
        })
    }

    /// All records, ordered by date then channel.
    pub fn all(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Earliest record date.
    pub fn min_date(&self) -> NaiveDate {
        self.min_date
    }

    /// Latest record date.
    pub fn max_date(&self) -> NaiveDate {
        self.max_date
    }

    /// `[min_date, max_date]`, the range that selects everything.
    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.min_date, self.max_date)
    }

    /// Distinct channels present, in canonical (name) order.
    pub fn channels(&self) -> Vec<Channel> {
        let mut out: Vec<Channel> = Vec::new();
        for r in &self.records {
            if !out.contains(&r.channel) {
                out.push(r.channel.clone());
            }
        }
        out.sort();
        out
    }

    /// Unfiltered view over every record.
    pub fn view(&self) -> RecordView<'_> {
        RecordView::new(self.records.iter().collect())
    }
}
