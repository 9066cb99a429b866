//! Regression losses.

/// Loss of a single prediction.
pub trait Loss: Send + Sync {
    fn eval(&self, target: f64, prediction: f64) -> f64;

    /// Derivative of the loss with respect to the prediction.
    fn gradient(&self, target: f64, prediction: f64) -> f64;
}

/// Squared error.
#[derive(Debug, Copy, Clone, Default)]
pub struct Squared;

impl Loss for Squared {
    #[inline]
    fn eval(&self, target: f64, prediction: f64) -> f64 {
        (prediction - target).powi(2)
    }

    #[inline]
    fn gradient(&self, target: f64, prediction: f64) -> f64 {
        2.0 * (prediction - target)
    }
}

/// Absolute error.
#[derive(Debug, Copy, Clone, Default)]
pub struct Absolute;

impl Loss for Absolute {
    #[inline]
    fn eval(&self, target: f64, prediction: f64) -> f64 {
        (prediction - target).abs()
    }

    #[inline]
    fn gradient(&self, target: f64, prediction: f64) -> f64 {
        let difference = prediction - target;
        if difference > 0.0 {
            1.0
        } else if difference < 0.0 {
            -1.0
        } else {
            0.0
        }
    }
}

/// Cauchy loss, robust to outliers.
#[derive(Debug, Copy, Clone)]
pub struct Cauchy {
    pub c: f64,
}

impl Default for Cauchy {
    fn default() -> Self {
        Self { c: 80.0 }
    }
}

impl Loss for Cauchy {
    fn eval(&self, target: f64, prediction: f64) -> f64 {
        let scaled = (prediction - target) / self.c;
        self.c * self.c / 2.0 * scaled.mul_add(scaled, 1.0).ln()
    }

    fn gradient(&self, target: f64, prediction: f64) -> f64 {
        let difference = prediction - target;
        let scaled = difference / self.c;
        difference / scaled.mul_add(scaled, 1.0)
    }
}
