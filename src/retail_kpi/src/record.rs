//! Daily per-channel records.
//!
//! [`RawRecord`] is what a [`RecordSource`](crate::repository::RecordSource)
//! yields: one row of the input dataset, already typed. [`Record`] is the
//! frozen form held by the [`Repository`](crate::repository::Repository); it
//! carries the derived fields computed once at load time.

use chrono::{NaiveDate, Weekday};
use serde::Serialize;

use crate::channel::Channel;

/// One channel's trading day, as read from the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRecord {
    /// Calendar day (no time component).
    pub date: NaiveDate,
    /// Channel the figures belong to.
    pub channel: Channel,
    /// Store foot-traffic or online sessions.
    pub footfall_or_sessions: u64,
    /// Number of completed purchases.
    pub purchases: u64,
    /// Number of returned purchases.
    pub returns: u64,
    /// Gross sales value.
    pub sales_value: f64,
    /// Value of returned goods.
    pub returns_value: f64,
    /// Day of week as stored in the source.
    pub weekday: Weekday,
    /// Weekend flag as stored in the source.
    pub is_weekend: bool,
    /// Public holiday flag.
    pub is_holiday: bool,
    /// Promotion running that day.
    pub promo_flag: bool,
    /// Weather score, 1 (bad) to 10 (great). Informational only.
    pub weather_score: u8,
}

/// A loaded record plus its derived fields.
///
/// Only built through [`Record::new`], so `net_revenue` and `atv` always agree
/// with the raw figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Calendar day (no time component).
    pub date: NaiveDate,
    /// Channel the figures belong to.
    pub channel: Channel,
    /// Store foot-traffic or online sessions.
    pub footfall_or_sessions: u64,
    /// Number of completed purchases.
    pub purchases: u64,
    /// Number of returned purchases.
    pub returns: u64,
    /// Gross sales value.
    pub sales_value: f64,
    /// Value of returned goods.
    pub returns_value: f64,
    /// Day of week as stored in the source.
    pub weekday: Weekday,
    /// Weekend flag as stored in the source.
    pub is_weekend: bool,
    /// Public holiday flag.
    pub is_holiday: bool,
    /// Promotion running that day.
    pub promo_flag: bool,
    /// Weather score, 1 (bad) to 10 (great). Informational only.
    pub weather_score: u8,
    net_revenue: f64,
    atv: Option<f64>,
}

impl Record {
    /// Freeze a raw row, computing `net_revenue` and `atv`.
    pub fn new(raw: RawRecord) -> Self {
        let net_revenue = raw.sales_value - raw.returns_value;
        let atv = (raw.purchases > 0).then(|| raw.sales_value / raw.purchases as f64);
        Self {
            date: raw.date,
            channel: raw.channel,
            footfall_or_sessions: raw.footfall_or_sessions,
            purchases: raw.purchases,
            returns: raw.returns,
            sales_value: raw.sales_value,
            returns_value: raw.returns_value,
            weekday: raw.weekday,
            is_weekend: raw.is_weekend,
            is_holiday: raw.is_holiday,
            promo_flag: raw.promo_flag,
            weather_score: raw.weather_score,
            net_revenue,
            atv,
        }
    }

    /// `sales_value - returns_value`. May be negative.
    pub fn net_revenue(&self) -> f64 {
        self.net_revenue
    }

    /// Average transaction value; `None` on days without purchases.
    pub fn atv(&self) -> Option<f64> {
        self.atv
    }
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A store row with no promo/holiday and zero returns.
    pub(crate) fn raw(
        date: &str,
        channel: Channel,
        footfall: u64,
        purchases: u64,
        sales: f64,
    ) -> RawRecord {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        RawRecord {
            date,
            channel,
            footfall_or_sessions: footfall,
            purchases,
            returns: 0,
            sales_value: sales,
            returns_value: 0.0,
            weekday: chrono::Datelike::weekday(&date),
            is_weekend: false,
            is_holiday: false,
            promo_flag: false,
            weather_score: 5,
        }
    }
}
