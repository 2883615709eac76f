/// Error types for the forecasting core
use thiserror::Error;

/// Failures surfaced by the forecasting pipeline and its parts.
///
/// All are caller configuration errors, not transient conditions; the
/// pipeline propagates the first failure unchanged with no retry.
#[derive(Error, Debug, PartialEq)]
pub enum ForecastError {
    /// Not enough readings for the requested lag depth
    #[error("Insufficient data: {readings} readings for {lag_features} lag features")]
    InsufficientData {
        readings: usize,
        lag_features: usize,
    },

    /// A split boundary left one side empty
    #[error("Empty split: {train} training rows, {test} test rows")]
    EmptySplit { train: usize, test: usize },

    /// Feature/target length mismatch at fit time
    #[error("Dimension mismatch: {rows} feature rows, {targets} targets")]
    Dimension { rows: usize, targets: usize },

    /// Predict called before fit
    #[error("Model is not fitted")]
    NotFitted,

    /// Metrics called on unequal-length sequences
    #[error("Length mismatch: {predictions} predictions, {ground_truth} ground truth values")]
    LengthMismatch {
        predictions: usize,
        ground_truth: usize,
    },
}

/// Type alias for Results using ForecastError
pub type Result<T> = std::result::Result<T, ForecastError>;
