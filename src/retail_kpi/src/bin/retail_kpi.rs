use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use shared_utils::env::get_env_path;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use retail_kpi::{
    bucket::{self, Granularity},
    channel::Channel,
    config::{Config, load_config_path},
    filter::{self, DateRange},
    kpi::{self, KpiSnapshot, Metric},
    period::{self, WeekRollover},
    repository::{CsvSource, Repository},
};

const CONFIG_ENV: &str = "RETAIL_KPI_CONFIG";
const DATA_ENV: &str = "RETAIL_KPI_DATA";
const DEFAULT_DATA_PATH: &str = "retail_dataset.csv";

#[derive(Parser)]
#[command(version, about = "Retail KPI CLI")]
struct Cli {
    /// Config TOML (falls back to $RETAIL_KPI_CONFIG, then built-in defaults)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Dataset CSV (overrides $RETAIL_KPI_DATA and data.path)
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    #[command(flatten)]
    filters: FilterArgs,

    #[command(subcommand)]
    cmd: Cmd,
}

/// Overrides for the config's `[filters]` section.
#[derive(Args)]
struct FilterArgs {
    /// First day included (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day included (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Channel to keep; repeat for several. None given = config / all channels
    #[arg(long = "channel", value_name = "NAME")]
    channels: Vec<Channel>,

    /// Promo days only
    #[arg(long)]
    promo_only: bool,

    /// Holidays only
    #[arg(long)]
    holiday_only: bool,
}

#[derive(Subcommand)]
enum Cmd {
    /// KPI snapshot of the filtered data
    Summary {
        /// Print a single metric instead of the full snapshot
        #[arg(long)]
        metric: Option<Metric>,
    },
    /// Latest week vs the week before
    Weekly {
        /// prior_year | unavailable (default from config)
        #[arg(long, value_parser = parse_rollover)]
        rollover: Option<WeekRollover>,
    },
    /// Totals per (calendar year, ISO week), the keys `weekly` compares
    Weeks,
    /// Sales per calendar month, January to December
    Monthly,
    /// Trend series across channels
    Daily {
        /// day | week | month
        #[arg(long, default_value = "day")]
        granularity: Granularity,
    },
    /// Distinct channels in the dataset
    Channels,
}

#[derive(Serialize)]
struct Summary {
    date_range: DateRange,
    records: usize,
    #[serde(flatten)]
    kpis: KpiSnapshot,
    average_transaction_value: Option<f64>,
}

#[derive(Serialize)]
struct MetricValue {
    metric: Metric,
    value: f64,
}

fn parse_rollover(s: &str) -> Result<WeekRollover, String> {
    match s.trim().to_lowercase().as_str() {
        "prior_year" | "prior-year" => Ok(WeekRollover::PriorYear),
        "unavailable" => Ok(WeekRollover::Unavailable),
        other => Err(format!("unknown rollover policy: {other}")),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // 1) Config: flag, then env, then defaults
    let config_path = match cli.config {
        Some(p) => Some(p),
        None => get_env_path(CONFIG_ENV)?,
    };
    let cfg = match &config_path {
        Some(p) => load_config_path(p)?,
        None => Config::default(),
    };

    // 2) Dataset: flag, then env, then config, then the dashboard's default file name
    let data_path = match cli.data {
        Some(p) => p,
        None => match get_env_path(DATA_ENV)? {
            Some(p) => p,
            None => cfg
                .data
                .path
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
        },
    };
    let repo = Repository::load(&CsvSource::from_path(&data_path))
        .with_context(|| format!("load dataset {}", data_path.display()))?;

    // 3) Filter: config defaults, CLI flags on top
    let mut spec = cfg.filters.to_filter_spec(&repo)?;
    let args = cli.filters;
    if let Some(start) = args.start {
        spec.date_range.start = start;
    }
    if let Some(end) = args.end {
        spec.date_range.end = end;
    }
    if !args.channels.is_empty() {
        spec.channels = args.channels;
    }
    spec.promo_only |= args.promo_only;
    spec.holiday_only |= args.holiday_only;
    let view = filter::apply(&repo, &spec);

    match cli.cmd {
        Cmd::Summary { metric: Some(metric) } => print_json(&MetricValue {
            metric,
            value: kpi::aggregate(&view).get(metric),
        }),
        Cmd::Summary { metric: None } => {
            let kpis = kpi::aggregate(&view);
            print_json(&Summary {
                date_range: spec.date_range,
                records: view.len(),
                kpis,
                average_transaction_value: kpis.average_transaction_value(),
            })
        }
        Cmd::Weekly { rollover } => {
            let policy = rollover.unwrap_or(cfg.weekly.rollover);
            print_json(&period::compare_weeks_with(&view, policy))
        }
        Cmd::Weeks => print_json(&bucket::by_iso_week(&view)),
        Cmd::Monthly => print_json(&bucket::by_month(&view)),
        Cmd::Daily { granularity } => print_json(&bucket::series(&view, granularity)),
        Cmd::Channels => print_json(&repo.channels()),
    }
}
