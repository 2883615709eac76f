//! Forecast command: fetch readings for one measure, run the
//! forecasting pipeline, and present predicted-vs-actual results.

use anyhow::Context;
use chrono::NaiveDate;
use fmn_api::date_range::{DateRange, DATE_FORMAT};
use fmn_api::measure::StationKind;
use fmn_api::reading::{Reading, TIMESTAMP_FORMAT};
use fmn_api::station::FloodApiClient;
use fmn_forecast::{ForecastConfig, ForecastOutcome, ForecastPipeline, ReadingProvider, SplitMode};
use log::info;

pub struct ForecastArgs {
    pub station: String,
    pub kind: StationKind,
    pub measure: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub lag_features: usize,
    pub split_size: usize,
    pub split_date: Option<String>,
    pub output_csv: Option<String>,
}

/// Readings fetched ahead of the pipeline run, adapted to the
/// pipeline's provider seam.
struct FetchedReadings {
    notation: String,
    readings: Vec<Reading>,
}

impl ReadingProvider for FetchedReadings {
    fn get_readings(
        &self,
        measure_notation: &str,
        _range: &DateRange,
    ) -> anyhow::Result<Vec<Reading>> {
        anyhow::ensure!(
            measure_notation == self.notation,
            "no readings cached for measure {}",
            measure_notation
        );
        Ok(self.readings.clone())
    }
}

/// Build the split mode from CLI flags; a cutoff date wins over the
/// trailing count when both are present.
fn resolve_split(split_date: Option<&str>, split_size: usize) -> anyhow::Result<SplitMode> {
    if let Some(raw) = split_date {
        let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .with_context(|| format!("invalid --split-date {}", raw))?;
        let cutoff = date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid")
            .and_utc();
        return Ok(SplitMode::ByDate(cutoff));
    }
    Ok(SplitMode::ByCount(split_size))
}

pub async fn run_forecast(args: ForecastArgs) -> anyhow::Result<()> {
    let range = crate::resolve_range(args.start.as_deref(), args.end.as_deref())?;
    let client = FloodApiClient::new()?;

    let notation = match args.measure {
        Some(notation) => notation,
        None => {
            let measures = client
                .get_measures(&args.station, &args.kind.filter())
                .await?;
            info!(
                "{} {} measures at {}; forecasting the first",
                measures.len(),
                args.kind.label(),
                args.station
            );
            measures[0].notation.clone()
        }
    };

    let readings = client.get_readings(&notation, &range, None).await?;
    info!(
        "Fetched {} readings for {} ({} to {})",
        readings.len(),
        notation,
        range.start(),
        range.end()
    );

    let provider = FetchedReadings {
        notation: notation.clone(),
        readings,
    };
    let pipeline = ForecastPipeline::new(ForecastConfig {
        lag_features: args.lag_features,
        split: resolve_split(args.split_date.as_deref(), args.split_size)?,
    });
    let outcome = pipeline.forecast_measure(&provider, &notation, &range)?;

    print_outcome(&notation, &outcome);

    if let Some(path) = args.output_csv {
        write_predictions_csv(&path, &outcome)?;
        info!("Predictions written to {}", path);
    }
    Ok(())
}

fn print_outcome(notation: &str, outcome: &ForecastOutcome) {
    println!("Forecast for {}", notation);
    println!("{}", outcome.metrics);
    println!("{:<22}{:>12}{:>12}", "timestamp", "predicted", "actual");
    for ((timestamp, predicted), actual) in outcome
        .test_timestamps
        .iter()
        .zip(outcome.predictions.iter())
        .zip(outcome.ground_truth.iter())
    {
        println!(
            "{:<22}{:>12.3}{:>12.3}",
            timestamp.format(TIMESTAMP_FORMAT),
            predicted,
            actual
        );
    }
}

/// Write `timestamp,predicted,actual` rows for downstream charting.
fn write_predictions_csv(path: &str, outcome: &ForecastOutcome) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["timestamp", "predicted", "actual"])?;
    for ((timestamp, predicted), actual) in outcome
        .test_timestamps
        .iter()
        .zip(outcome.predictions.iter())
        .zip(outcome.ground_truth.iter())
    {
        writer.write_record([
            timestamp.format(TIMESTAMP_FORMAT).to_string(),
            format!("{}", predicted),
            format!("{}", actual),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::resolve_split;
    use fmn_forecast::SplitMode;

    #[test]
    fn test_split_date_takes_precedence() {
        let mode = resolve_split(Some("2025-06-05"), 5).unwrap();
        match mode {
            SplitMode::ByDate(cutoff) => {
                let expected: chrono::DateTime<chrono::Utc> =
                    "2025-06-05T00:00:00Z".parse().unwrap();
                assert_eq!(cutoff, expected);
            }
            SplitMode::ByCount(_) => panic!("expected a date split"),
        }
    }

    #[test]
    fn test_split_size_fallback() {
        assert_eq!(resolve_split(None, 7).unwrap(), SplitMode::ByCount(7));
    }

    #[test]
    fn test_bad_split_date() {
        assert!(resolve_split(Some("05/06/2025"), 5).is_err());
    }
}
