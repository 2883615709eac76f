use crate::dataset::Dataset;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// How to partition a dataset into training and evaluation subsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitMode {
    /// The test set is the `n` chronologically last rows.
    ByCount(usize),
    /// Test rows have target timestamps strictly after the cutoff,
    /// training rows strictly before; rows exactly on the cutoff land
    /// in neither set.
    ByDate(DateTime<Utc>),
}

impl Default for SplitMode {
    fn default() -> Self {
        SplitMode::ByCount(5)
    }
}

/// A train/test partition with the seed vector that starts the
/// autoregressive rollout.
///
/// The seed is the earliest training row's lags minus their first
/// element, with the earliest training target appended. Note the
/// rollout therefore starts from the beginning of the training window,
/// not from the newest pre-test observation; anchoring on the newest
/// window is a candidate change, deliberately not applied here.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
    pub seed: Vec<f64>,
}

impl Split {
    /// Partition a dataset, failing when either side comes out empty.
    pub fn new(dataset: &Dataset, mode: SplitMode) -> Result<Split> {
        let (train_rows, test_rows) = match mode {
            SplitMode::ByCount(n) => {
                let cut = dataset.len().saturating_sub(n);
                let rows = dataset.rows();
                (rows[..cut].to_vec(), rows[cut..].to_vec())
            }
            SplitMode::ByDate(cutoff) => {
                let train = dataset
                    .rows()
                    .iter()
                    .filter(|r| r.timestamp < cutoff)
                    .cloned()
                    .collect();
                let test = dataset
                    .rows()
                    .iter()
                    .filter(|r| r.timestamp > cutoff)
                    .cloned()
                    .collect();
                (train, test)
            }
        };

        let train = Dataset::from_rows(train_rows);
        let test = Dataset::from_rows(test_rows);
        if train.is_empty() || test.is_empty() {
            return Err(ForecastError::EmptySplit {
                train: train.len(),
                test: test.len(),
            });
        }

        let first = &train.rows()[0];
        let mut seed: Vec<f64> = first.lags[1..].to_vec();
        seed.push(first.target);

        Ok(Split { train, test, seed })
    }

    /// Target timestamps of the test rows, aligned one-to-one with the
    /// prediction sequence.
    pub fn test_timestamps(&self) -> Vec<DateTime<Utc>> {
        self.test.timestamps()
    }
}

#[cfg(test)]
mod tests {
    use super::{Split, SplitMode};
    use crate::dataset::test_support::hourly_values;
    use crate::dataset::Dataset;
    use crate::error::ForecastError;
    use std::collections::HashSet;

    fn scenario_dataset() -> Dataset {
        let readings = hourly_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        Dataset::from_readings(&readings, 2).unwrap()
    }

    #[test]
    fn test_by_count() {
        let dataset = scenario_dataset();
        let split = Split::new(&dataset, SplitMode::ByCount(2)).unwrap();
        assert_eq!(split.train.y(), vec![3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(split.test.y(), vec![9.0, 10.0]);
    }

    #[test]
    fn test_by_count_disjoint_timestamps() {
        let dataset = scenario_dataset();
        let split = Split::new(&dataset, SplitMode::ByCount(3)).unwrap();
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), dataset.len() - 3);
        let train: HashSet<_> = split.train.timestamps().into_iter().collect();
        let test: HashSet<_> = split.test.timestamps().into_iter().collect();
        assert!(train.is_disjoint(&test));
    }

    #[test]
    fn test_by_date_strict_bounds() {
        let dataset = scenario_dataset();
        // cutoff exactly on the row with target 7.0
        let cutoff = dataset.rows()[4].timestamp;
        let split = Split::new(&dataset, SplitMode::ByDate(cutoff)).unwrap();
        assert!(split.train.timestamps().iter().all(|t| *t < cutoff));
        assert!(split.test.timestamps().iter().all(|t| *t > cutoff));
        // the boundary row appears in neither set
        assert_eq!(split.train.len() + split.test.len(), dataset.len() - 1);
        assert!(!split.train.y().contains(&7.0));
        assert!(!split.test.y().contains(&7.0));
    }

    #[test]
    fn test_empty_split_errors() {
        let dataset = scenario_dataset();
        assert_eq!(
            Split::new(&dataset, SplitMode::ByCount(0)).unwrap_err(),
            ForecastError::EmptySplit { train: 8, test: 0 }
        );
        assert!(matches!(
            Split::new(&dataset, SplitMode::ByCount(20)).unwrap_err(),
            ForecastError::EmptySplit { train: 0, .. }
        ));

        let before_all: chrono::DateTime<chrono::Utc> = "2020-01-01T00:00:00Z".parse().unwrap();
        assert!(matches!(
            Split::new(&dataset, SplitMode::ByDate(before_all)).unwrap_err(),
            ForecastError::EmptySplit { train: 0, .. }
        ));
    }

    #[test]
    fn test_seed_vector() {
        let dataset = scenario_dataset();
        let split = Split::new(&dataset, SplitMode::ByCount(2)).unwrap();
        // earliest training row: lags [2, 1], target 3
        // seed = lags[1..] ++ [target]
        assert_eq!(split.seed, vec![1.0, 3.0]);
        assert_eq!(split.seed.len(), 2);
    }

    #[test]
    fn test_test_timestamps_align() {
        let dataset = scenario_dataset();
        let split = Split::new(&dataset, SplitMode::ByCount(2)).unwrap();
        assert_eq!(split.test_timestamps(), split.test.timestamps());
        assert_eq!(split.test_timestamps().len(), 2);
    }
}
