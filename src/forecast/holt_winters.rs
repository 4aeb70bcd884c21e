//! Additive Holt-Winters smoothing (additive trend, additive seasonality)
//!
//! Initial states come from the first two seasons of history; the smoothing
//! coefficients are chosen by minimizing the in-sample sum of squared one-step
//! errors with a bounded simplex search.

use thiserror::Error;

use super::nelder_mead::{self, OptimizeError, Options};

/// Why a model could not be fitted to a series
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelFitError {
    #[error("need at least {needed} observations for two seasonal cycles, got {got}")]
    InsufficientCycles { needed: usize, got: usize },

    #[error("series contains a non-finite observation")]
    NonFiniteInput,

    #[error("fitted model produced non-finite values")]
    NonFiniteModel,

    #[error("parameter search failed: {0}")]
    Optimizer(#[from] OptimizeError),
}

/// Smoothing coefficients, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl SmoothingParams {
    fn from_slice(p: &[f64]) -> Self {
        Self {
            alpha: p[0],
            beta: p[1],
            gamma: p[2],
        }
    }

    fn to_vec(self) -> Vec<f64> {
        vec![self.alpha, self.beta, self.gamma]
    }
}

/// Level, trend and one seasonal term per position in the cycle
#[derive(Debug, Clone)]
struct State {
    level: f64,
    trend: f64,
    seasonals: Vec<f64>,
}

impl State {
    /// Level is the mean of the first season, trend the mean per-step change
    /// between the first two seasons, and each seasonal term the first
    /// season's deviation from that level.
    fn initial(values: &[f64], period: usize) -> Self {
        let m = period as f64;
        let level = values[..period].iter().sum::<f64>() / m;
        let trend = (0..period)
            .map(|i| (values[i + period] - values[i]) / m)
            .sum::<f64>()
            / m;
        let seasonals = values[..period].iter().map(|y| y - level).collect();

        Self {
            level,
            trend,
            seasonals,
        }
    }

    fn is_finite(&self) -> bool {
        self.level.is_finite()
            && self.trend.is_finite()
            && self.seasonals.iter().all(|s| s.is_finite())
    }
}

struct Pass {
    state: State,
    fitted: Vec<f64>,
    sse: f64,
}

/// Run the smoothing recursions over `values` from `initial`
fn smooth(values: &[f64], initial: &State, params: SmoothingParams) -> Pass {
    let SmoothingParams { alpha, beta, gamma } = params;
    let period = initial.seasonals.len();
    let mut state = initial.clone();
    let mut fitted = Vec::with_capacity(values.len());
    let mut sse = 0.0;

    for (t, &y) in values.iter().enumerate() {
        let slot = t % period;
        let season = state.seasonals[slot];
        let base = state.level + state.trend;

        let estimate = base + season;
        fitted.push(estimate);
        sse += (y - estimate).powi(2);

        let level = alpha * (y - season) + (1.0 - alpha) * base;
        state.trend = beta * (level - state.level) + (1.0 - beta) * state.trend;
        state.seasonals[slot] = gamma * (y - base) + (1.0 - gamma) * season;
        state.level = level;
    }

    Pass { state, fitted, sse }
}

/// A fitted additive Holt-Winters model
#[derive(Debug, Clone)]
pub struct HoltWinters {
    params: SmoothingParams,
    state: State,
    observations: usize,
    fitted: Vec<f64>,
}

impl HoltWinters {
    /// Fit to `values` with seasonal cycle length `period`
    pub fn fit(values: &[f64], period: usize) -> Result<Self, ModelFitError> {
        let needed = 2 * period.max(1);
        if values.len() < needed {
            return Err(ModelFitError::InsufficientCycles {
                needed,
                got: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ModelFitError::NonFiniteInput);
        }

        let initial = State::initial(values, period);
        let objective = |p: &[f64]| {
            let sse = smooth(values, &initial, SmoothingParams::from_slice(p)).sse;
            if sse.is_finite() {
                sse
            } else {
                f64::INFINITY
            }
        };

        let start = coarse_grid_start(&objective);
        let minimum = nelder_mead::minimize(
            objective,
            &start.to_vec(),
            &[(0.0, 1.0); 3],
            &Options::default(),
        )?;

        let params = SmoothingParams::from_slice(&minimum.point);
        let pass = smooth(values, &initial, params);
        if !pass.state.is_finite() || pass.fitted.iter().any(|v| !v.is_finite()) {
            return Err(ModelFitError::NonFiniteModel);
        }

        Ok(Self {
            params,
            state: pass.state,
            observations: values.len(),
            fitted: pass.fitted,
        })
    }

    pub fn params(&self) -> SmoothingParams {
        self.params
    }

    /// One-step-ahead in-sample estimates, aligned with the input
    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    /// Point forecasts for the next `horizon` steps
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        let period = self.state.seasonals.len();
        (1..=horizon)
            .map(|h| {
                let slot = (self.observations + h - 1) % period;
                self.state.level + h as f64 * self.state.trend + self.state.seasonals[slot]
            })
            .collect()
    }
}

/// Best point of a coarse grid over the unit cube, first wins on ties
fn coarse_grid_start(objective: &impl Fn(&[f64]) -> f64) -> SmoothingParams {
    const STEPS: [f64; 5] = [0.1, 0.3, 0.5, 0.7, 0.9];

    let mut best = SmoothingParams {
        alpha: STEPS[0],
        beta: STEPS[0],
        gamma: STEPS[0],
    };
    let mut best_value = f64::INFINITY;
    for &alpha in &STEPS {
        for &beta in &STEPS {
            for &gamma in &STEPS {
                let value = objective(&[alpha, beta, gamma]);
                if value < best_value {
                    best_value = value;
                    best = SmoothingParams { alpha, beta, gamma };
                }
            }
        }
    }
    best
}
