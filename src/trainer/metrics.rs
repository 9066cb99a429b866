//! Progressive validation: every prediction is scored before the model sees the rating.

use crate::prelude::*;

/// Root mean squared error.
#[derive(Default, Debug, Copy, Clone)]
pub struct Rmse {
    error: f64,
    count: usize,
}

impl Rmse {
    pub fn push(&mut self, residual_error: f64) {
        self.error += residual_error * residual_error;
        self.count += 1;
    }

    #[must_use]
    pub fn average(&self) -> f64 {
        (self.error / self.count.max(1) as f64).sqrt()
    }
}

/// Mean absolute error.
#[derive(Default, Debug, Copy, Clone)]
pub struct Mae {
    sum: f64,
    count: usize,
}

impl Mae {
    pub fn push(&mut self, residual_error: f64) {
        self.count += 1;
        self.sum += residual_error.abs();
    }

    #[must_use]
    pub fn average(&self) -> f64 {
        self.sum / self.count.max(1) as f64
    }
}

#[derive(Default, Debug, Copy, Clone)]
pub struct Metrics {
    pub n_observations: usize,
    pub n_queries: usize,
    pub mae: Mae,
    pub rmse: Rmse,
}

impl Metrics {
    /// Observations and queries processed so far, blank lines excluded.
    #[must_use]
    pub const fn n_entries(&self) -> usize {
        self.n_observations + self.n_queries
    }

    pub fn push_residual(&mut self, residual_error: f64) {
        self.n_observations += 1;
        self.mae.push(residual_error);
        self.rmse.push(residual_error);
    }

    pub fn log(&self) {
        info!(
            n_observations = self.n_observations,
            n_queries = self.n_queries,
            mae = format!("{:.4}", self.mae.average()).as_str(),
            rmse = format!("{:.4}", self.rmse.average()).as_str(),
        );
    }
}
