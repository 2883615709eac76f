use crate::error::{ForecastError, Result};
use serde::Serialize;
use std::fmt;

/// Accuracy report comparing a prediction sequence to held-out ground
/// truth. Values are rounded to 2 decimal places for display; the
/// computation itself runs at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsReport {
    pub mse: f64,
    pub mae: f64,
}

impl MetricsReport {
    /// Mean squared and mean absolute error over two equal-length,
    /// non-empty sequences.
    pub fn evaluate(predictions: &[f64], ground_truth: &[f64]) -> Result<MetricsReport> {
        if predictions.is_empty() || predictions.len() != ground_truth.len() {
            return Err(ForecastError::LengthMismatch {
                predictions: predictions.len(),
                ground_truth: ground_truth.len(),
            });
        }
        let n = predictions.len() as f64;
        let mut squared = 0.0;
        let mut absolute = 0.0;
        for (p, t) in predictions.iter().zip(ground_truth.iter()) {
            let diff = p - t;
            squared += diff * diff;
            absolute += diff.abs();
        }
        Ok(MetricsReport {
            mse: round2(squared / n),
            mae: round2(absolute / n),
        })
    }
}

impl fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mean Squared Error : {:.2}\nMean Absolute Error : {:.2}",
            self.mse, self.mae
        )
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
