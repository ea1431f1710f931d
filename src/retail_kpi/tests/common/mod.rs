#![allow(dead_code)]

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use retail_kpi::{channel::Channel, record::RawRecord};
use std::path::PathBuf;
use tempfile::TempDir;

pub const HEADER: &str = "date,channel,footfall_or_sessions,purchases,returns,sales_value,returns_value,weekday,is_weekend,is_holiday,promo_flag,weather_score";

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("fixture date")
}

/// Plain row: no promo, no holiday, no returns.
pub fn row(d: &str, channel: Channel, footfall: u64, purchases: u64, sales: f64) -> RawRecord {
    let date = date(d);
    RawRecord {
        date,
        channel,
        footfall_or_sessions: footfall,
        purchases,
        returns: 0,
        sales_value: sales,
        returns_value: 0.0,
        weekday: date.weekday(),
        is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
        is_holiday: false,
        promo_flag: false,
        weather_score: 5,
    }
}

/// Store and online rows for `days` days from 2026-01-01. Whole-number money
/// so sums are exact.
pub fn two_channel_days(days: i64) -> Vec<RawRecord> {
    let start = date("2026-01-01");
    let mut out = Vec::new();
    for i in 0..days {
        let d = (start + Duration::days(i)).to_string();
        let n = i as u64;
        for (channel, base) in [(Channel::Store, 800u64), (Channel::Online, 2000u64)] {
            let footfall = base + (n * 37) % 400;
            let purchases = footfall / 10;
            let mut r = row(&d, channel, footfall, purchases, (purchases * 90) as f64);
            r.returns = purchases / 25;
            r.returns_value = (r.returns * 90) as f64;
            r.promo_flag = i % 5 == 0;
            r.is_holiday = i % 11 == 0;
            out.push(r);
        }
    }
    out
}

/// Render rows the way the dataset generator writes them: flags as 0/1,
/// except `is_weekend` which is a boolean literal.
pub fn to_csv(rows: &[RawRecord]) -> String {
    let mut s = String::from(HEADER);
    for r in rows {
        s.push_str(&format!(
            "\n{},{},{},{},{},{},{},{},{},{},{},{}",
            r.date,
            r.channel,
            r.footfall_or_sessions,
            r.purchases,
            r.returns,
            r.sales_value,
            r.returns_value,
            r.weekday,
            if r.is_weekend { "True" } else { "False" },
            u8::from(r.is_holiday),
            u8::from(r.promo_flag),
            r.weather_score,
        ));
    }
    s
}

pub struct TestData {
    _dir: TempDir,  // keep alive for the life of the test
    pub dir: PathBuf,
    pub csv: PathBuf, // <tmpdir>/retail_dataset.csv
}

pub fn write_dataset(rows: &[RawRecord]) -> TestData {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().to_path_buf();
    let csv = path.join("retail_dataset.csv");
    std::fs::write(&csv, to_csv(rows)).expect("write csv");
    TestData {
        _dir: dir,
        dir: path,
        csv,
    }
}
