//! KPI aggregation.
//!
//! [`aggregate`] reduces a [`RecordView`] to a [`KpiSnapshot`]. The reduction is
//! a plain sum, so it does not depend on record order and can be split and
//! merged ([`KpiAccumulator::merge`]); the bucketing module relies on that.
//!
//! Division policy: `conversion_rate_pct` is `0` when there is no traffic, and
//! ATV is `None` when there are no purchases. Neither ever yields NaN.

use std::{fmt, str::FromStr};

use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::{record::Record, view::RecordView};

/// Running totals over any number of records.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KpiAccumulator {
    footfall: u64,
    purchases: u64,
    returns: u64,
    sales: f64,
    returns_value: f64,
}

impl KpiAccumulator {
    /// Fold one record in.
    pub fn push(&mut self, r: &Record) {
        self.footfall += r.footfall_or_sessions;
        self.purchases += r.purchases;
        self.returns += r.returns;
        self.sales += r.sales_value;
        self.returns_value += r.returns_value;
    }

    /// Combine with another partial result.
    pub fn merge(&mut self, other: &KpiAccumulator) {
        self.footfall += other.footfall;
        self.purchases += other.purchases;
        self.returns += other.returns;
        self.sales += other.sales;
        self.returns_value += other.returns_value;
    }

    /// Close the accumulator into a snapshot.
    pub fn finish(&self) -> KpiSnapshot {
        let conversion_rate_pct = if self.footfall > 0 {
            100.0 * self.purchases as f64 / self.footfall as f64
        } else {
            0.0
        };
        KpiSnapshot {
            footfall: self.footfall,
            purchases: self.purchases,
            returns: self.returns,
            sales: self.sales,
            returns_value: self.returns_value,
            revenue: self.sales - self.returns_value,
            conversion_rate_pct,
        }
    }
}

impl<'a> Extend<&'a Record> for KpiAccumulator {
    fn extend<I: IntoIterator<Item = &'a Record>>(&mut self, iter: I) {
        for r in iter {
            self.push(r);
        }
    }
}

impl<'a> FromIterator<&'a Record> for KpiAccumulator {
    fn from_iter<I: IntoIterator<Item = &'a Record>>(iter: I) -> Self {
        let mut acc = Self::default();
        acc.extend(iter);
        acc
    }
}

/// Aggregate KPIs over one record view. Immutable once produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KpiSnapshot {
    /// Total footfall / sessions.
    pub footfall: u64,
    /// Total purchases.
    pub purchases: u64,
    /// Total returns.
    pub returns: u64,
    /// Total sales value.
    pub sales: f64,
    /// Total returns value.
    pub returns_value: f64,
    /// `sales - returns_value`; negative when returns outweigh sales.
    pub revenue: f64,
    /// `100 * purchases / footfall`, or `0` without traffic.
    pub conversion_rate_pct: f64,
}

impl KpiSnapshot {
    /// Value of one metric as `f64`.
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Footfall => self.footfall as f64,
            Metric::Purchases => self.purchases as f64,
            Metric::Returns => self.returns as f64,
            Metric::Sales => self.sales,
            Metric::ReturnsValue => self.returns_value,
            Metric::Revenue => self.revenue,
            Metric::ConversionRate => self.conversion_rate_pct,
        }
    }

    /// Sales per purchase across the whole view; `None` without purchases.
    pub fn average_transaction_value(&self) -> Option<f64> {
        (self.purchases > 0).then(|| self.sales / self.purchases as f64)
    }
}

/// Named KPI metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Footfall / sessions.
    Footfall,
    /// Purchases.
    Purchases,
    /// Returns (count).
    Returns,
    /// Gross sales.
    Sales,
    /// Returns value.
    ReturnsValue,
    /// Net revenue.
    Revenue,
    /// Conversion rate, percent.
    ConversionRate,
}

impl Metric {
    /// Every metric, in display order.
    pub const ALL: [Metric; 7] = [
        Metric::Footfall,
        Metric::Purchases,
        Metric::Returns,
        Metric::Sales,
        Metric::ReturnsValue,
        Metric::Revenue,
        Metric::ConversionRate,
    ];

    /// snake_case name, as used in JSON output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Metric::Footfall => "footfall",
            Metric::Purchases => "purchases",
            Metric::Returns => "returns",
            Metric::Sales => "sales",
            Metric::ReturnsValue => "returns_value",
            Metric::Revenue => "revenue",
            Metric::ConversionRate => "conversion_rate",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        match Metric::ALL.into_iter().find(|m| m.as_str() == wanted) {
            Some(m) => Ok(m),
            None => bail!("unknown metric: {s}"),
        }
    }
}

/// Reduce a view to its KPI snapshot. An empty view yields all zeros.
pub fn aggregate(view: &RecordView<'_>) -> KpiSnapshot {
    view.iter().collect::<KpiAccumulator>().finish()
}
