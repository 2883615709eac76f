//! Command implementations for the flood-monitoring CLI.
//!
//! Provides subcommands for forecasting a station measure, inspecting
//! station metadata, and summarizing readings.

use clap::{Subcommand, ValueEnum};
use fmn_api::measure::StationKind;

pub mod forecast;
pub mod station;

/// Station type selector for the CLI, mapped onto the library's
/// parameter/qualifier presets.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    RiverLevel,
    RiverFlow,
    TidalLevel,
    Temperature,
}

impl From<KindArg> for StationKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::RiverLevel => StationKind::RiverLevel,
            KindArg::RiverFlow => StationKind::RiverFlow,
            KindArg::TidalLevel => StationKind::TidalLevel,
            KindArg::Temperature => StationKind::Temperature,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Forecast a measure and evaluate against held-out readings
    Forecast {
        /// Station reference, e.g. F1906
        #[arg(short, long)]
        station: String,

        /// Station type to filter measures by
        #[arg(short, long, value_enum)]
        kind: KindArg,

        /// Explicit measure notation (defaults to the station's first
        /// matching measure)
        #[arg(short, long)]
        measure: Option<String>,

        /// Start date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        end: Option<String>,

        /// Number of lag features
        #[arg(long, default_value_t = 3)]
        lag_features: usize,

        /// Size of the held-out test set
        #[arg(long, default_value_t = 5)]
        split_size: usize,

        /// Split on a cutoff date instead of a trailing count
        /// (YYYY-MM-DD, takes precedence over --split-size)
        #[arg(long)]
        split_date: Option<String>,

        /// Write predictions to this CSV path
        #[arg(short, long)]
        output_csv: Option<String>,
    },

    /// Print station metadata and its matching measures
    StationInfo {
        /// Station reference, e.g. F1906
        #[arg(short, long)]
        station: String,

        /// Station type to filter measures by
        #[arg(short, long, value_enum)]
        kind: KindArg,
    },

    /// Print the latest reading for each matching measure
    Latest {
        /// Station reference, e.g. F1906
        #[arg(short, long)]
        station: String,

        /// Station type to filter measures by
        #[arg(short, long, value_enum)]
        kind: KindArg,
    },

    /// Summarize readings over a date range (mean and spread)
    Stats {
        /// Station reference, e.g. F1906
        #[arg(short, long)]
        station: String,

        /// Station type to filter measures by
        #[arg(short, long, value_enum)]
        kind: KindArg,

        /// Start date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        end: Option<String>,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Forecast {
            station,
            kind,
            measure,
            start,
            end,
            lag_features,
            split_size,
            split_date,
            output_csv,
        } => {
            forecast::run_forecast(forecast::ForecastArgs {
                station,
                kind: kind.into(),
                measure,
                start,
                end,
                lag_features,
                split_size,
                split_date,
                output_csv,
            })
            .await
        }
        Command::StationInfo { station, kind } => {
            station::run_station_info(&station, kind.into()).await
        }
        Command::Latest { station, kind } => station::run_latest(&station, kind.into()).await,
        Command::Stats {
            station,
            kind,
            start,
            end,
        } => station::run_stats(&station, kind.into(), start.as_deref(), end.as_deref()).await,
    }
}

/// Resolve optional CLI dates into a validated range; no dates means
/// today's readings.
pub(crate) fn resolve_range(
    start: Option<&str>,
    end: Option<&str>,
) -> anyhow::Result<fmn_api::date_range::DateRange> {
    use fmn_api::date_range::DateRange;
    match (start, end) {
        (Some(start), Some(end)) => Ok(DateRange::parse(start, end)?),
        (None, None) => Ok(DateRange::today()),
        _ => anyhow::bail!("--start and --end must be supplied together"),
    }
}
