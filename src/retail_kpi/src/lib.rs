//! Retail KPI engine.
//!
//! Loads a daily per-channel retail dataset into an immutable
//! [`Repository`](repository::Repository), then answers questions over
//! filtered [`RecordView`](view::RecordView)s:
//! - [`filter::apply`]: date range / channel / promo / holiday selection
//! - [`kpi::aggregate`]: totals, revenue, conversion rate
//! - [`period::compare_weeks`]: latest week vs the week before
//! - [`bucket`]: monthly contribution and daily trend series
//!
//! ```
//! use retail_kpi::{
//!     channel::Channel,
//!     filter::{self, FilterSpec},
//!     kpi,
//!     record::RawRecord,
//!     repository::{InMemorySource, Repository},
//! };
//! use chrono::{NaiveDate, Weekday};
//!
//! let row = RawRecord {
//!     date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
//!     channel: Channel::Store,
//!     footfall_or_sessions: 1000,
//!     purchases: 100,
//!     returns: 2,
//!     sales_value: 10_000.0,
//!     returns_value: 300.0,
//!     weekday: Weekday::Mon,
//!     is_weekend: false,
//!     is_holiday: false,
//!     promo_flag: false,
//!     weather_score: 6,
//! };
//! let repo = Repository::load(&InMemorySource::new(vec![row])).unwrap();
//! let view = filter::apply(&repo, &FilterSpec::all(&repo));
//! let snap = kpi::aggregate(&view);
//! assert_eq!(snap.revenue, 9_700.0);
//! assert_eq!(snap.conversion_rate_pct, 10.0);
//! ```

#![deny(missing_docs)]

pub mod bucket;
pub mod channel;
pub mod config;
pub mod filter;
pub mod kpi;
pub mod period;
pub mod record;
pub mod repository;
pub mod view;
