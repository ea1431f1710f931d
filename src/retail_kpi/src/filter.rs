//! Filter engine.
//!
//! A [`FilterSpec`] is a conjunction of predicates:
//! - date within the inclusive [`DateRange`]
//! - channel in `channels`, **unless `channels` is empty, in which case every
//!   channel passes** (the dashboard's default "nothing deselected" state)
//! - `promo_flag` set, when `promo_only`
//! - `is_holiday` set, when `holiday_only`
//!
//! The range is not validated: `start > end` simply matches nothing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{channel::Channel, record::Record, repository::Repository, view::RecordView};

/// Inclusive calendar range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included.
    pub start: NaiveDate,
    /// Last day included.
    pub end: NaiveDate,
}

impl DateRange {
    /// Range from `start` through `end`, both inclusive.
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `start <= date <= end`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// User selection applied to the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Inclusive date window.
    pub date_range: DateRange,
    /// Channels to keep; empty keeps all.
    pub channels: Vec<Channel>,
    /// Keep promo days only.
    pub promo_only: bool,
    /// Keep holidays only.
    pub holiday_only: bool,
}

impl FilterSpec {
    /// Selection over `date_range` with no other restriction.
    pub fn new(date_range: DateRange) -> Self {
        Self {
            date_range,
            channels: Vec::new(),
            promo_only: false,
            holiday_only: false,
        }
    }

    /// Default selection for `repo`: its full date range, all channels, no toggles.
    pub fn all(repo: &Repository) -> Self {
        Self::new(repo.date_range())
    }

    /// Restrict to the given channels (empty means all).
    pub fn with_channels(mut self, channels: impl IntoIterator<Item = Channel>) -> Self {
        self.channels = channels.into_iter().collect();
        self
    }

    /// Keep promo days only.
    pub fn promo_only(mut self) -> Self {
        self.promo_only = true;
        self
    }

    /// Keep holidays only.
    pub fn holiday_only(mut self) -> Self {
        self.holiday_only = true;
        self
    }

    /// Whether a single record passes every active predicate.
    pub fn matches(&self, record: &Record) -> bool {
        self.date_range.contains(record.date)
            && (self.channels.is_empty() || self.channels.contains(&record.channel))
            && (!self.promo_only || record.promo_flag)
            && (!self.holiday_only || record.is_holiday)
    }
}

/// Select the records of `repo` that match `spec`.
///
/// Returns an empty view, not an error, when nothing matches.
pub fn apply<'a>(repo: &'a Repository, spec: &FilterSpec) -> RecordView<'a> {
    let view = repo.view().refine(|r| spec.matches(r));
    tracing::debug!(
        matched = view.len(),
        total = repo.record_count(),
        start = %spec.date_range.start,
        end = %spec.date_range.end,
        channels = spec.channels.len(),
        promo_only = spec.promo_only,
        holiday_only = spec.holiday_only,
        "applied filter"
    );
    view
}
