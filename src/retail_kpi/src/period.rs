//! Week-over-week comparison.
//!
//! [`compare_weeks`] anchors on the latest week present in a view and compares
//! it with the week before:
//! 1. `Y` = latest calendar year in the view.
//! 2. `W` = highest ISO week number among the records of year `Y`.
//! 3. current = records with `(year, iso week) == (Y, W)`,
//!    previous = records with `(Y, W - 1)`.
//! 4. Both sides are aggregated and four metrics get a percent change.
//!
//! Weeks are keyed by **calendar** year plus ISO week number ([`WeekKey::of`]).
//! When `W` is 1 there is no week 0; [`WeekRollover`] decides what "previous"
//! means then.
//!
//! Keying by calendar year has two known edges. In years whose 1-3 January
//! fall in ISO week 53 of the year before (2021, 2027), `W` is 53 for the whole
//! year, so the current week stays pinned to those first days. And 29-31
//! December days that belong to ISO week 1 of the next year are keyed
//! `(Y, 1)`, so a week-1 comparison under [`WeekRollover::PriorYear`] never
//! sees them.
//!
//! A delta is `None` whenever the previous value is zero, whatever the current
//! value is. "No data last week" and "nothing this week" are different answers:
//! a drop to zero is reported as `-100.0`.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    kpi::{KpiSnapshot, Metric, aggregate},
    view::RecordView,
};

/// Metrics that get a week-over-week delta, in display order.
pub const COMPARED_METRICS: [Metric; 4] = [
    Metric::Revenue,
    Metric::Purchases,
    Metric::Footfall,
    Metric::ConversionRate,
];

/// A calendar year paired with an ISO week number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WeekKey {
    /// Calendar year of the date (not the ISO week-year).
    pub year: i32,
    /// ISO 8601 week number, 1..=53.
    pub week: u32,
}

impl WeekKey {
    /// Key for the week a date falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            week: date.iso_week().week(),
        }
    }

    /// The last ISO week of `year` (52 or 53). 28 December always falls in it.
    pub fn last_of_year(year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, 12, 28).map(|d| Self {
            year,
            week: d.iso_week().week(),
        })
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

/// What to compare against when the current week is ISO week 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekRollover {
    /// Compare with the last ISO week (52 or 53) of the previous calendar year.
    #[default]
    PriorYear,
    /// Report no previous week: zero snapshot, every delta `None`.
    Unavailable,
}

/// Current vs previous week, with per-metric percent changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyComparison {
    /// Week being reported.
    pub current_week: WeekKey,
    /// Week compared against; `None` if the rollover policy gave up.
    pub previous_week: Option<WeekKey>,
    /// KPIs of the current week.
    pub current: KpiSnapshot,
    /// KPIs of the previous week (all zero if it has no records).
    pub previous: KpiSnapshot,
    /// Percent change per metric of [`COMPARED_METRICS`]; `None` = unavailable.
    pub deltas: IndexMap<Metric, Option<f64>>,
}

impl WeeklyComparison {
    /// Delta for one metric; `None` if unavailable or not compared.
    pub fn delta(&self, metric: Metric) -> Option<f64> {
        self.deltas.get(&metric).copied().flatten()
    }
}

/// `100 * (current - previous) / previous`, or `None` when `previous` is zero.
pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// [`compare_weeks_with`] using [`WeekRollover::default`].
pub fn compare_weeks(view: &RecordView<'_>) -> Option<WeeklyComparison> {
    compare_weeks_with(view, WeekRollover::default())
}

/// Compare the latest week in `view` with the one before it.
///
/// Returns `None` for an empty view (there is no week to anchor on).
pub fn compare_weeks_with(
    view: &RecordView<'_>,
    rollover: WeekRollover,
) -> Option<WeeklyComparison> {
    let year = view.iter().map(|r| r.date.year()).max()?;
    let week = view
        .iter()
        .filter(|r| r.date.year() == year)
        .map(|r| r.date.iso_week().week())
        .max()?;
    let current_week = WeekKey { year, week };

    let previous_week = if week > 1 {
        Some(WeekKey {
            year,
            week: week - 1,
        })
    } else {
        match rollover {
            WeekRollover::PriorYear => WeekKey::last_of_year(year - 1),
            WeekRollover::Unavailable => None,
        }
    };

    let current = aggregate(&view.refine(|r| WeekKey::of(r.date) == current_week));
    let previous = match previous_week {
        Some(key) => aggregate(&view.refine(|r| WeekKey::of(r.date) == key)),
        None => KpiSnapshot::default(),
    };

    let deltas = COMPARED_METRICS
        .into_iter()
        .map(|m| (m, percent_change(current.get(m), previous.get(m))))
        .collect();

    tracing::debug!(
        %current_week,
        previous_week = ?previous_week.map(|k| k.to_string()),
        ?rollover,
        "compared weeks"
    );
    Some(WeeklyComparison {
        current_week,
        previous_week,
        current,
        previous,
        deltas,
    })
}
