use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use fmn_api::reading::Reading;

/// One supervised row: the `k` values preceding a reading (most recent
/// lag first) and the reading itself as the target.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub timestamp: DateTime<Utc>,
    pub lags: Vec<f64>,
    pub target: f64,
}

/// An ordered collection of feature rows, built fresh per pipeline run
/// and never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<FeatureRow>,
}

impl Dataset {
    /// Build lag features from a chronological reading sequence.
    ///
    /// For each index `i >= lag_features` the row carries lags
    /// `[v(i-1), v(i-2), ..., v(i-k)]` and target `v(i)`. A row exists
    /// only when the target and every lag value are present; rows
    /// touching a missing value are dropped, never zero-filled. With
    /// `L` gap-free readings the result has exactly `L - k` rows.
    pub fn from_readings(readings: &[Reading], lag_features: usize) -> Result<Dataset> {
        if lag_features == 0 || readings.len() <= lag_features {
            return Err(ForecastError::InsufficientData {
                readings: readings.len(),
                lag_features,
            });
        }

        let mut rows = Vec::with_capacity(readings.len() - lag_features);
        for i in lag_features..readings.len() {
            let Some(target) = readings[i].value else {
                continue;
            };
            let lags: Option<Vec<f64>> = (1..=lag_features)
                .map(|offset| readings[i - offset].value)
                .collect();
            if let Some(lags) = lags {
                rows.push(FeatureRow {
                    timestamp: readings[i].datetime,
                    lags,
                    target,
                });
            }
        }

        Ok(Dataset { rows })
    }

    pub fn from_rows(rows: Vec<FeatureRow>) -> Dataset {
        Dataset { rows }
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The feature matrix, one lag vector per row.
    pub fn x(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(|r| r.lags.clone()).collect()
    }

    /// The target vector.
    pub fn y(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.target).collect()
    }

    /// Target timestamps, in row order.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.rows.iter().map(|r| r.timestamp).collect()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{hourly_readings, hourly_values};
    use super::Dataset;
    use crate::error::ForecastError;

    #[test]
    fn test_row_count_is_len_minus_lags() {
        for k in 1..=4 {
            let readings = hourly_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
            let dataset = Dataset::from_readings(&readings, k).unwrap();
            assert_eq!(dataset.len(), readings.len() - k);
        }
    }

    #[test]
    fn test_lag_layout_most_recent_first() {
        let readings = hourly_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        let dataset = Dataset::from_readings(&readings, 2).unwrap();
        assert_eq!(dataset.len(), 8);

        let first = &dataset.rows()[0];
        assert_eq!(first.lags, vec![2.0, 1.0]);
        assert_eq!(first.target, 3.0);

        let last = &dataset.rows()[7];
        assert_eq!(last.lags, vec![9.0, 8.0]);
        assert_eq!(last.target, 10.0);
    }

    #[test]
    fn test_missing_values_drop_touching_rows() {
        // v(3) missing: drops the rows where it is the target or a lag
        let readings = hourly_readings(&[
            Some(1.0),
            Some(2.0),
            Some(3.0),
            None,
            Some(5.0),
            Some(6.0),
            Some(7.0),
        ]);
        let dataset = Dataset::from_readings(&readings, 2).unwrap();
        // candidates: targets v(2)..v(6); v(3) target dropped,
        // v(4) and v(5) lose a lag to the gap
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.y(), vec![3.0, 7.0]);
    }

    #[test]
    fn test_insufficient_data() {
        let readings = hourly_values(&[1.0, 2.0, 3.0]);
        let err = Dataset::from_readings(&readings, 3).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InsufficientData {
                readings: 3,
                lag_features: 3
            }
        );
        assert!(Dataset::from_readings(&readings, 0).is_err());
    }

    #[test]
    fn test_parallel_arrays_align() {
        let readings = hourly_values(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let dataset = Dataset::from_readings(&readings, 1).unwrap();
        assert_eq!(dataset.x().len(), dataset.y().len());
        assert_eq!(dataset.timestamps().len(), dataset.len());
        assert_eq!(dataset.x()[0], vec![1.0]);
        assert_eq!(dataset.y()[0], 2.0);
    }
}
