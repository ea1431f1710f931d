//! Calendar bucketing of record views.
//!
//! - [`bucket_by`]: group by any date-derived key into ordered [`KpiAccumulator`]s.
//! - [`by_month`]: sales per calendar month, always all twelve months, January first.
//! - [`by_date`]: daily totals across channels (the trend series).
//! - [`series`]: totals per day / ISO week (Monday) / calendar month, keyed by bucket start.
//!
//! Months absent from the view are reported as `0.0`, never dropped. Month
//! buckets merge the same month of different years.

use std::{collections::BTreeMap, fmt, str::FromStr};

use anyhow::bail;
use chrono::{Datelike, Duration, Month, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::{
    kpi::{KpiAccumulator, KpiSnapshot},
    period::WeekKey,
    record::Record,
    view::RecordView,
};

/// Bucket width for [`series`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// One bucket per calendar day
    Day,
    /// Monday-based ISO weeks
    Week,
    /// Calendar months
    Month,
}

impl Granularity {
    /// First day of the bucket containing `date`.
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Week => date.week(Weekday::Mon).first_day(),
            Granularity::Month => date - Duration::days(i64::from(date.day0())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        })
    }
}

impl FromStr for Granularity {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "d" | "day" | "daily" => Ok(Granularity::Day),
            "w" | "week" | "weekly" => Ok(Granularity::Week),
            "m" | "month" | "monthly" => Ok(Granularity::Month),
            _ => bail!("unknown granularity: {s}"),
        }
    }
}

/// Sales of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySales {
    /// Month number, 1 = January.
    pub month: u32,
    /// English month name.
    pub name: &'static str,
    /// Sum of `sales_value`; `0.0` when the month has no records.
    pub sales: f64,
}

/// Totals of one bucket in a trend series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Bucket start (the day itself for daily series).
    pub date: NaiveDate,
    /// Sums across channels plus the guarded conversion rate.
    #[serde(flatten)]
    pub kpis: KpiSnapshot,
}

/// Totals of one [`WeekKey`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyPoint {
    /// Calendar year + ISO week.
    pub week: WeekKey,
    /// Sums across channels plus the guarded conversion rate.
    #[serde(flatten)]
    pub kpis: KpiSnapshot,
}

/// Group `view` by `key`, accumulating KPIs per bucket. Buckets come out in key order.
pub fn bucket_by<K, F>(view: &RecordView<'_>, mut key: F) -> BTreeMap<K, KpiAccumulator>
where
    K: Ord,
    F: FnMut(&Record) -> K,
{
    let mut out: BTreeMap<K, KpiAccumulator> = BTreeMap::new();
    for r in view {
        out.entry(key(r)).or_default().push(r);
    }
    out
}

/// Sales per calendar month, January through December.
pub fn by_month(view: &RecordView<'_>) -> Vec<MonthlySales> {
    let buckets = bucket_by(view, |r| r.date.month());

    let mut out = Vec::with_capacity(12);
    let mut month = Month::January;
    for _ in 0..12 {
        let n = month.number_from_month();
        out.push(MonthlySales {
            month: n,
            name: month.name(),
            sales: buckets.get(&n).map_or(0.0, |acc| acc.finish().sales),
        });
        month = month.succ();
    }
    out
}

/// Daily totals across channels, ordered by date. Days without records are absent.
pub fn by_date(view: &RecordView<'_>) -> Vec<TrendPoint> {
    series(view, Granularity::Day)
}

/// Totals per bucket of the given width, ordered by bucket start.
pub fn series(view: &RecordView<'_>, granularity: Granularity) -> Vec<TrendPoint> {
    bucket_by(view, |r| granularity.bucket_start(r.date))
        .into_iter()
        .map(|(date, acc)| TrendPoint {
            date,
            kpis: acc.finish(),
        })
        .collect()
}

/// Totals per [`WeekKey`], the same keys [`compare_weeks`](crate::period::compare_weeks) uses.
pub fn by_iso_week(view: &RecordView<'_>) -> Vec<WeeklyPoint> {
    bucket_by(view, |r| WeekKey::of(r.date))
        .into_iter()
        .map(|(week, acc)| WeeklyPoint {
            week,
            kpis: acc.finish(),
        })
        .collect()
}

// -------------------- tests --------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        channel::Channel,
        kpi::aggregate,
        record::{Record, fixtures::raw},
    };

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn recs() -> Vec<Record> {
        vec![
            Record::new(raw("2026-01-05", Channel::Store, 1000, 100, 10_000.0)),
            Record::new(raw("2026-01-05", Channel::Online, 3000, 0, 0.0)),
            Record::new(raw("2026-03-31", Channel::Store, 800, 40, 4000.0)),
            Record::new(raw("2026-12-01", Channel::Online, 0, 0, 0.0)),
            Record::new(raw("2026-12-01", Channel::Store, 500, 50, 7500.5)),
        ]
    }

    #[test]
    fn month_series_is_fixed_calendar_order_with_zero_fill() {
        let rs = recs();
        let view = RecordView::new(rs.iter().collect());
        let months = by_month(&view);

        assert_eq!(months.len(), 12);
        let names: Vec<_> = months.iter().map(|m| m.name).collect();
        assert_eq!(names[0], "January");
        assert_eq!(names[1], "February");
        assert_eq!(names[11], "December");
        assert_eq!(months[0].sales, 10_000.0);
        assert_eq!(months[1].sales, 0.0);
        assert_eq!(months[2].sales, 4000.0);
        assert_eq!(months[11].sales, 7500.5);

        let total: f64 = months.iter().map(|m| m.sales).sum();
        assert_eq!(total, aggregate(&view).sales);
    }

    #[test]
    fn empty_view_still_has_twelve_months() {
        let months = by_month(&RecordView::empty());
        assert_eq!(months.len(), 12);
        assert!(months.iter().all(|m| m.sales == 0.0));
        assert!(by_date(&RecordView::empty()).is_empty());
    }

    #[test]
    fn daily_totals_sum_channels_and_guard_conversion() {
        let rs = recs();
        let view = RecordView::new(rs.iter().collect());
        let days = by_date(&view);

        assert_eq!(
            days.iter().map(|p| p.date).collect::<Vec<_>>(),
            vec![d("2026-01-05"), d("2026-03-31"), d("2026-12-01")]
        );
        assert_eq!(days[0].kpis.footfall, 4000);
        assert_eq!(days[0].kpis.purchases, 100);
        assert!((days[0].kpis.conversion_rate_pct - 2.5).abs() < 1e-9);
        assert_eq!(days[2].kpis.footfall, 500);
        assert_eq!(days[2].kpis.conversion_rate_pct, 10.0);
    }

    #[test]
    fn zero_traffic_day_has_zero_conversion() {
        let r = Record::new(raw("2026-06-01", Channel::Online, 0, 0, 0.0));
        let days = by_date(&RecordView::new(vec![&r]));
        assert_eq!(days[0].kpis.conversion_rate_pct, 0.0);
    }

    #[test]
    fn week_and_month_bucket_starts() {
        // 2026-01-08 is a Thursday
        assert_eq!(Granularity::Week.bucket_start(d("2026-01-08")), d("2026-01-05"));
        assert_eq!(Granularity::Week.bucket_start(d("2026-01-05")), d("2026-01-05"));
        assert_eq!(Granularity::Month.bucket_start(d("2024-02-29")), d("2024-02-01"));
        assert_eq!(Granularity::Day.bucket_start(d("2024-02-29")), d("2024-02-29"));
        assert_eq!("W".parse::<Granularity>().unwrap(), Granularity::Week);
        assert!("fortnight".parse::<Granularity>().is_err());
    }

    #[test]
    fn monthly_series_and_iso_weeks() {
        let rs = recs();
        let view = RecordView::new(rs.iter().collect());
        let monthly = series(&view, Granularity::Month);
        assert_eq!(
            monthly.iter().map(|p| p.date).collect::<Vec<_>>(),
            vec![d("2026-01-01"), d("2026-03-01"), d("2026-12-01")]
        );

        let weeks = by_iso_week(&view);
        assert_eq!(weeks[0].week, WeekKey { year: 2026, week: 2 });
        assert_eq!(weeks[0].kpis.footfall, 4000);
        assert_eq!(weeks.len(), 3);
    }

    #[test]
    fn bucket_by_custom_key() {
        let rs = recs();
        let view = RecordView::new(rs.iter().collect());
        let by_channel = bucket_by(&view, |r| r.channel.clone());
        assert_eq!(by_channel[&Channel::Store].finish().purchases, 190);
        assert_eq!(by_channel[&Channel::Online].finish().footfall, 3000);
    }
}
