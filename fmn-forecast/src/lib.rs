//! Single-measure time-series forecasting over flood-monitoring readings.
//!
//! Turns a chronological reading sequence into a supervised-learning
//! problem via lag features, fits a least-squares linear model, and
//! produces multi-step forecasts by feeding each prediction back in as
//! an input (autoregressive rollout).

pub mod dataset;
pub mod error;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod split;

pub use dataset::{Dataset, FeatureRow};
pub use error::{ForecastError, Result};
pub use metrics::MetricsReport;
pub use model::{Forecaster, LinearModel};
pub use pipeline::{ForecastConfig, ForecastOutcome, ForecastPipeline, ReadingProvider};
pub use split::{Split, SplitMode};
