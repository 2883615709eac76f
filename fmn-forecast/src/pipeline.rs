use crate::dataset::Dataset;
use crate::error::Result;
use crate::metrics::MetricsReport;
use crate::model::Forecaster;
use crate::split::{Split, SplitMode};
use chrono::{DateTime, Utc};
use fmn_api::date_range::DateRange;
use fmn_api::reading::Reading;
use log::info;

/// Capability for fetching the readings of one measure over a date
/// range. The pipeline composes with a provider instead of inheriting
/// retrieval behavior; the HTTP client adapts to this at the command
/// layer and tests plug in fixtures.
pub trait ReadingProvider {
    fn get_readings(
        &self,
        measure_notation: &str,
        range: &DateRange,
    ) -> anyhow::Result<Vec<Reading>>;
}

/// Explicit pipeline parameters; no defaults are baked into the logic
/// below, they all live here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastConfig {
    /// Number of prior values used as model inputs.
    pub lag_features: usize,
    /// Train/test partition strategy.
    pub split: SplitMode,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            lag_features: 3,
            split: SplitMode::default(),
        }
    }
}

/// Everything presentation code needs from one forecasting run: the
/// prediction sequence, accuracy metrics, the held-out targets, and
/// their timestamps aligned one-to-one with the predictions.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOutcome {
    pub predictions: Vec<f64>,
    pub metrics: MetricsReport,
    pub ground_truth: Vec<f64>,
    pub test_timestamps: Vec<DateTime<Utc>>,
}

/// Orchestrates transform -> split -> fit -> predict -> evaluate for a
/// collaborator-supplied reading sequence. Each run builds its own
/// dataset, split, and forecaster; nothing is shared across runs.
#[derive(Debug, Clone, Default)]
pub struct ForecastPipeline {
    config: ForecastConfig,
}

impl ForecastPipeline {
    pub fn new(config: ForecastConfig) -> Self {
        ForecastPipeline { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Run the full evaluation over an ordered reading sequence.
    ///
    /// The first failing step propagates unchanged; forecasting on
    /// malformed or too-sparse data is a configuration error, not a
    /// transient condition, so nothing is retried or masked.
    pub fn evaluate_forecast(&self, readings: &[Reading]) -> Result<ForecastOutcome> {
        let dataset = Dataset::from_readings(readings, self.config.lag_features)?;
        let split = Split::new(&dataset, self.config.split)?;
        info!(
            "Forecasting with {} training rows, {} test rows, {} lag features",
            split.train.len(),
            split.test.len(),
            self.config.lag_features
        );

        let mut forecaster = Forecaster::new();
        forecaster.fit(&split.train.x(), &split.train.y())?;

        let predictions = forecaster.predict(&split.seed, split.test.len())?;
        let ground_truth = split.test.y();
        let metrics = MetricsReport::evaluate(&predictions, &ground_truth)?;

        Ok(ForecastOutcome {
            predictions,
            metrics,
            ground_truth,
            test_timestamps: split.test_timestamps(),
        })
    }

    /// Pull readings through a provider, then run the evaluation.
    pub fn forecast_measure<P: ReadingProvider>(
        &self,
        provider: &P,
        measure_notation: &str,
        range: &DateRange,
    ) -> anyhow::Result<ForecastOutcome> {
        let readings = provider.get_readings(measure_notation, range)?;
        info!(
            "Retrieved {} readings for {} between {} and {}",
            readings.len(),
            measure_notation,
            range.start(),
            range.end()
        );
        Ok(self.evaluate_forecast(&readings)?)
    }
}
