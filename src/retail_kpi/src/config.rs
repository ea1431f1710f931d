//! Engine configuration: parsing, normalization, and loading.
//!
//! A TOML document describing where the dataset lives, the default filter
//! selection, and the week-1 rollover policy:
//!
//! ```toml
//! [data]
//! path = "retail_dataset.csv"
//!
//! [filters]
//! start = "2026-01-01"   # optional, defaults to the first day in the data
//! end = "2026-12-31"     # optional, defaults to the last day in the data
//! channels = ["store"]   # empty = all channels
//! promo_only = false
//! holiday_only = false
//!
//! [weekly]
//! rollover = "prior_year"   # or "unavailable"
//! ```
//!
//! Every section is optional. Dates are quoted `YYYY-MM-DD` strings.
//!
//! Key behaviors:
//! - Normalization trims and lowercases channel names, drops blank ones, and
//!   de-duplicates while preserving order.
//! - A `start` later than `end` is rejected here. The filter engine itself
//!   does not validate ranges.
//!
//! Entrypoints:
//! - Parse + normalize from a TOML string: [`load_config_str`]
//! - Parse + normalize from a file path: [`load_config_path`]
//! - Normalization alone: [`normalize_config`]

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::NaiveDate;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::{
    channel::Channel,
    filter::{DateRange, FilterSpec},
    period::WeekRollover,
    repository::Repository,
};

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// Dataset location.
    pub data: DataCfg,
    /// Default filter selection.
    pub filters: FiltersCfg,
    /// Week-over-week settings.
    pub weekly: WeeklyCfg,
}

/// `[data]` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct DataCfg {
    /// Path to the CSV dataset. Relative paths resolve against the working directory.
    pub path: Option<PathBuf>,
}

/// `[filters]` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct FiltersCfg {
    /// Inclusive start; `None` = first day in the data.
    pub start: Option<NaiveDate>,
    /// Inclusive end; `None` = last day in the data.
    pub end: Option<NaiveDate>,
    /// Channel names. Normalized to unique lowercase values, order preserved.
    pub channels: Vec<String>,
    /// Keep promo days only.
    pub promo_only: bool,
    /// Keep holidays only.
    pub holiday_only: bool,
}

/// `[weekly]` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct WeeklyCfg {
    /// What "previous week" means when the current week is ISO week 1.
    pub rollover: WeekRollover,
}

/// Summary of changes performed during normalization.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    /// Channel names that changed when trimming/lowercasing.
    pub channels_renamed: usize,
    /// Duplicate channel names removed.
    pub channels_deduped: usize,
    /// Blank channel names dropped.
    pub blank_channels_dropped: usize,
}

impl FiltersCfg {
    /// Resolve against a loaded repository: open ends take the repository's bounds.
    pub fn to_filter_spec(&self, repo: &Repository) -> anyhow::Result<FilterSpec> {
        let range = DateRange::new(
            self.start.unwrap_or_else(|| repo.min_date()),
            self.end.unwrap_or_else(|| repo.max_date()),
        );
        let channels = self
            .channels
            .iter()
            .map(|c| c.parse::<Channel>().with_context(|| format!("bad channel {c:?}")))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(FilterSpec {
            date_range: range,
            channels,
            promo_only: self.promo_only,
            holiday_only: self.holiday_only,
        })
    }
}

/// Normalize a config in place.
///
/// Errors:
/// - `filters.start` later than `filters.end`
pub fn normalize_config(cfg: &mut Config) -> anyhow::Result<NormalizationReport> {
    let mut report = NormalizationReport::default();

    if let (Some(start), Some(end)) = (cfg.filters.start, cfg.filters.end) {
        if start > end {
            bail!("filters.start ({start}) is after filters.end ({end})");
        }
    }

    let mut seen = IndexSet::new();
    for raw in std::mem::take(&mut cfg.filters.channels) {
        let name = raw.trim().to_lowercase();
        if name.is_empty() {
            report.blank_channels_dropped += 1;
            continue;
        }
        if name != raw {
            report.channels_renamed += 1;
        }
        if !seen.insert(name) {
            report.channels_deduped += 1;
        }
    }
    cfg.filters.channels = seen.into_iter().collect();

    Ok(report)
}

/// Parse and normalize a config from a TOML string.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<Config> {
    let mut cfg: Config = toml::from_str(toml_str).context("failed to parse config TOML")?;
    let report = normalize_config(&mut cfg).context("normalize_config failed")?;
    tracing::debug!(?report, "normalized config");
    Ok(cfg)
}

/// Read a config TOML file from disk, parse, and normalize it.
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<Config> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fixtures::raw;

    #[test]
    fn empty_document_is_all_defaults() {
        let cfg = load_config_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.weekly.rollover, WeekRollover::PriorYear);
    }

    #[test]
    fn normalizes_channels() {
        let mut cfg = Config::default();
        cfg.filters.channels = vec![
            " Store".into(),
            "online".into(),
            "STORE".into(),
            "  ".into(),
        ];
        let report = normalize_config(&mut cfg).unwrap();
        assert_eq!(cfg.filters.channels, vec!["store", "online"]);
        assert_eq!(
            report,
            NormalizationReport {
                channels_renamed: 2,
                channels_deduped: 1,
                blank_channels_dropped: 1,
            }
        );
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = load_config_str(
            r#"
            [filters]
            start = "2026-02-01"
            end = "2026-01-01"
        "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("is after"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(load_config_str("[filters]\nchanel = [\"store\"]").is_err());
        assert!(load_config_str("[weekly]\nrollover = \"sometimes\"").is_err());
    }

    #[test]
    fn snapshot_normalized_config() {
        let toml_str = r#"
            [data]
            path = "data/retail.csv"

            [filters]
            start = "2026-01-01"
            channels = [" Store", "ONLINE", "store", "  "]
            promo_only = true

            [weekly]
            rollover = "unavailable"
        "#;

        let cfg = load_config_str(toml_str).unwrap();
        insta::assert_json_snapshot!(&cfg, @r###"
        {
          "data": {
            "path": "data/retail.csv"
          },
          "filters": {
            "start": "2026-01-01",
            "end": null,
            "channels": [
              "store",
              "online"
            ],
            "promo_only": true,
            "holiday_only": false
          },
          "weekly": {
            "rollover": "unavailable"
          }
        }
        "###);
    }

    #[test]
    fn resolves_open_range_against_repository() {
        let repo = Repository::from_raw(vec![
            raw("2026-01-05", Channel::Store, 1, 1, 1.0),
            raw("2026-02-10", Channel::Online, 1, 1, 1.0),
        ])
        .unwrap();
        let cfg = load_config_str(
            r#"
            [filters]
            end = "2026-01-31"
            channels = ["Online"]
        "#,
        )
        .unwrap();
        let spec = cfg.filters.to_filter_spec(&repo).unwrap();
        assert_eq!(spec.date_range.start, repo.min_date());
        assert_eq!(
            spec.date_range.end,
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()
        );
        assert_eq!(spec.channels, vec![Channel::Online]);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn channels_lowercased_and_unique(
            names in proptest::collection::vec("[ a-zA-Z]{0,8}", 0..8),
        ) {
            let mut cfg = Config::default();
            cfg.filters.channels = names;
            normalize_config(&mut cfg).unwrap();

            let chans = &cfg.filters.channels;
            prop_assert!(chans.iter().all(|c| !c.is_empty() && c.trim() == c));
            prop_assert!(chans.iter().all(|c| !c.chars().any(char::is_uppercase)));
            let unique: IndexSet<&String> = chans.iter().collect();
            prop_assert_eq!(unique.len(), chans.len());
        }
    }
}
