//! Monthly variable-expense forecasting
//!
//! [`forecast`] never fails: short histories fall back to their mean and a
//! model that cannot be fitted falls back to repeating the last observation.

pub mod holt_winters;
pub mod nelder_mead;

pub use holt_winters::{HoltWinters, ModelFitError, SmoothingParams};

use tracing::debug;

/// Months in one seasonal cycle
pub const SEASONAL_PERIOD: usize = 12;

/// Histories shorter than this are forecast by their mean
pub const MIN_HISTORY: usize = 6;

/// Default number of months forecast ahead
pub const DEFAULT_HORIZON: usize = 12;

/// How a forecast was produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForecastMethod {
    /// Fewer than [`MIN_HISTORY`] observations; every step is the mean
    Mean,
    /// Additive Holt-Winters with the fitted coefficients
    HoltWinters(SmoothingParams),
    /// The model could not be fitted; every step repeats the last value
    LastValue,
}

impl std::fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mean => write!(f, "mean of history"),
            Self::HoltWinters(p) => write!(
                f,
                "Holt-Winters (alpha={:.3}, beta={:.3}, gamma={:.3})",
                p.alpha, p.beta, p.gamma
            ),
            Self::LastValue => write!(f, "last value repeated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    /// One value per forecast step
    pub predicted: Vec<f64>,
    /// In-sample estimates aligned with the input history
    pub fitted: Vec<f64>,
    /// Root-mean-square error of `fitted` against the history
    pub rmse: f64,
    pub method: ForecastMethod,
}

/// Forecast the next `horizon` values of a monthly series
pub fn forecast(values: &[f64], horizon: usize) -> ForecastResult {
    if values.len() < MIN_HISTORY {
        let mean = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };
        return ForecastResult {
            predicted: vec![mean; horizon],
            fitted: values.to_vec(),
            rmse: 0.0,
            method: ForecastMethod::Mean,
        };
    }

    match HoltWinters::fit(values, SEASONAL_PERIOD) {
        Ok(model) => {
            let fitted = model.fitted().to_vec();
            ForecastResult {
                predicted: model.forecast(horizon),
                rmse: rmse(values, &fitted),
                fitted,
                method: ForecastMethod::HoltWinters(model.params()),
            }
        }
        Err(err) => {
            debug!(%err, observations = values.len(), "falling back to last observed value");
            let last = values[values.len() - 1];
            ForecastResult {
                predicted: vec![last; horizon],
                fitted: values.to_vec(),
                rmse: 0.0,
                method: ForecastMethod::LastValue,
            }
        }
    }
}

/// Root-mean-square error over the overlapping prefix; zero when empty
pub fn rmse(actual: &[f64], fitted: &[f64]) -> f64 {
    let n = actual.len().min(fitted.len());
    if n == 0 {
        return 0.0;
    }
    let sse: f64 = actual
        .iter()
        .zip(fitted)
        .map(|(a, f)| (a - f).powi(2))
        .sum();
    (sse / n as f64).sqrt()
}
