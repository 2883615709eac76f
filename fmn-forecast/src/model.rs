use crate::error::{ForecastError, Result};

/// Small ridge term keeping the normal equations solvable on
/// degenerate (collinear) training data.
const RIDGE: f64 = 1e-8;

/// An ordinary least-squares linear model over lag features.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    /// Fit by solving the normal equations `(X'X + λI) β = X'y` for the
    /// design matrix augmented with an intercept column, via Gaussian
    /// elimination with partial pivoting.
    pub fn fit(x: &[Vec<f64>], y: &[f64]) -> Result<LinearModel> {
        if x.is_empty() || x.len() != y.len() {
            return Err(ForecastError::Dimension {
                rows: x.len(),
                targets: y.len(),
            });
        }
        let k = x[0].len();
        if x.iter().any(|row| row.len() != k) {
            return Err(ForecastError::Dimension {
                rows: x.len(),
                targets: y.len(),
            });
        }

        // Intercept column appended as feature index k.
        let p = k + 1;
        let mut xtx = vec![vec![0.0; p]; p];
        let mut xty = vec![0.0; p];
        for (row, &target) in x.iter().zip(y.iter()) {
            for a in 0..p {
                let xa = if a < k { row[a] } else { 1.0 };
                xty[a] += xa * target;
                for b in 0..p {
                    let xb = if b < k { row[b] } else { 1.0 };
                    xtx[a][b] += xa * xb;
                }
            }
        }
        for d in 0..p {
            xtx[d][d] += RIDGE;
        }

        let beta = solve(xtx, xty);
        let intercept = beta[k];
        let coefficients = beta[..k].to_vec();
        Ok(LinearModel {
            coefficients,
            intercept,
        })
    }

    /// Predict a single target from one feature vector.
    pub fn predict_one(&self, features: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(features.iter())
            .map(|(c, f)| c * f)
            .sum::<f64>()
            + self.intercept
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Solve `A β = b` in place via Gauss-Jordan elimination with partial
/// pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Vec<f64> {
    let p = b.len();
    for i in 0..p {
        let mut max_r = i;
        let mut max_v = a[i][i].abs();
        for r in (i + 1)..p {
            if a[r][i].abs() > max_v {
                max_v = a[r][i].abs();
                max_r = r;
            }
        }
        if max_r != i {
            a.swap(i, max_r);
            b.swap(i, max_r);
        }
        let pivot = a[i][i];
        if pivot.abs() < 1e-12 {
            continue;
        }
        let inv = 1.0 / pivot;
        for j in i..p {
            a[i][j] *= inv;
        }
        b[i] *= inv;
        for r in 0..p {
            if r == i {
                continue;
            }
            let factor = a[r][i];
            if factor == 0.0 {
                continue;
            }
            for j in i..p {
                a[r][j] -= factor * a[i][j];
            }
            b[r] -= factor * b[i];
        }
    }
    b
}

/// One-way Unfitted -> Fitted forecaster owning the linear model; a
/// fresh instance is created per pipeline run, never re-fitted in
/// place.
#[derive(Debug, Clone, Default)]
pub struct Forecaster {
    model: Option<LinearModel>,
}

impl Forecaster {
    pub fn new() -> Self {
        Forecaster { model: None }
    }

    /// Whether `fit` has succeeded.
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&LinearModel> {
        self.model.as_ref()
    }

    /// Fit the linear model on the training matrix and targets.
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        self.model = Some(LinearModel::fit(x, y)?);
        Ok(())
    }

    /// Autoregressive rollout: predict from the current window, append
    /// the prediction, and slide the window by dropping its first
    /// element and pushing the prediction.
    ///
    /// Every step after the first feeds on generated predictions only;
    /// there is no re-anchoring to real observations mid-rollout, so
    /// error compounds with the horizon. That is the intended property
    /// of this forecaster.
    pub fn predict(&self, seed: &[f64], n_predictions: usize) -> Result<Vec<f64>> {
        let model = self.model.as_ref().ok_or(ForecastError::NotFitted)?;

        let mut window = seed.to_vec();
        let mut predictions = Vec::with_capacity(n_predictions);
        for _ in 0..n_predictions {
            let prediction = model.predict_one(&window);
            predictions.push(prediction);
            window.remove(0);
            window.push(prediction);
        }
        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::{Forecaster, LinearModel};
    use crate::error::ForecastError;

    /// Lag pairs with targets on the plane y = 2*lag1 - 1*lag2.
    fn linear_plane() -> (Vec<Vec<f64>>, Vec<f64>) {
        let x = vec![
            vec![1.0, 2.0],
            vec![2.0, 1.0],
            vec![3.0, 5.0],
            vec![5.0, 3.0],
            vec![8.0, 4.0],
            vec![4.0, 9.0],
            vec![7.0, 6.0],
        ];
        let y = x.iter().map(|r| 2.0 * r[0] - r[1]).collect();
        (x, y)
    }

    #[test]
    fn test_fit_recovers_plane() {
        let (x, y) = linear_plane();
        let model = LinearModel::fit(&x, &y).unwrap();
        assert_eq!(model.coefficients().len(), 2);
        assert!((model.coefficients()[0] - 2.0).abs() < 1e-4);
        assert!((model.coefficients()[1] + 1.0).abs() < 1e-4);
        assert!(model.intercept().abs() < 1e-4);

        // zero residual on the training rows
        for (row, target) in x.iter().zip(y.iter()) {
            assert!((model.predict_one(row) - target).abs() < 1e-4);
        }
    }

    #[test]
    fn test_fit_with_intercept() {
        let x = vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]];
        let y = vec![5.0, 7.0, 9.0, 11.0]; // y = 2x + 3
        let model = LinearModel::fit(&x, &y).unwrap();
        assert!((model.coefficients()[0] - 2.0).abs() < 1e-4);
        assert!((model.intercept() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_fit_dimension_errors() {
        let err = LinearModel::fit(&[], &[]).unwrap_err();
        assert_eq!(
            err,
            ForecastError::Dimension {
                rows: 0,
                targets: 0
            }
        );

        let x = vec![vec![1.0, 2.0], vec![2.0, 3.0]];
        let y = vec![1.0];
        assert!(matches!(
            LinearModel::fit(&x, &y).unwrap_err(),
            ForecastError::Dimension { rows: 2, targets: 1 }
        ));
    }

    #[test]
    fn test_predict_before_fit() {
        let forecaster = Forecaster::new();
        assert_eq!(
            forecaster.predict(&[1.0, 2.0], 3).unwrap_err(),
            ForecastError::NotFitted
        );
    }

    #[test]
    fn test_predict_zero_horizon() {
        let (x, y) = linear_plane();
        let mut forecaster = Forecaster::new();
        forecaster.fit(&x, &y).unwrap();
        assert!(forecaster.predict(&[1.0, 2.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_rollout_feeds_predictions_back() {
        // y = lag1 + lag2 fitted exactly; seeded with [1, 1] the
        // rollout walks the Fibonacci sequence.
        let x = vec![
            vec![2.0, 1.0],
            vec![3.0, 2.0],
            vec![5.0, 3.0],
            vec![8.0, 5.0],
            vec![13.0, 8.0],
        ];
        let y: Vec<f64> = x.iter().map(|r| r[0] + r[1]).collect();
        let mut forecaster = Forecaster::new();
        forecaster.fit(&x, &y).unwrap();

        let predictions = forecaster.predict(&[1.0, 1.0], 5).unwrap();
        let expected = [2.0, 3.0, 5.0, 8.0, 13.0];
        for (got, want) in predictions.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-3, "{} vs {}", got, want);
        }
    }

    #[test]
    fn test_rollout_deterministic() {
        let (x, y) = linear_plane();
        let mut forecaster = Forecaster::new();
        forecaster.fit(&x, &y).unwrap();
        let first = forecaster.predict(&[3.0, 1.0], 10).unwrap();
        let second = forecaster.predict(&[3.0, 1.0], 10).unwrap();
        assert_eq!(first, second);
    }
}
