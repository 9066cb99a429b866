/// Learning rate schedule advanced on every optimizer step.
///
/// The rate is `initial / (1 + decay * step)` and never falls below `minimal`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LearningRate {
    initial: f64,
    decay: f64,
    factor: f64,
    minimal: f64,
}

impl From<f64> for LearningRate {
    fn from(rate: f64) -> Self {
        Self::constant(rate)
    }
}

impl LearningRate {
    #[must_use]
    pub fn new(initial: f64, decay: f64, minimal: f64) -> Self {
        debug_assert!(initial >= 0.0);
        debug_assert!(decay >= 0.0);
        LearningRate {
            initial,
            decay,
            minimal,
            factor: 1.0,
        }
    }

    #[must_use]
    pub fn constant(rate: f64) -> Self {
        Self::new(rate, 0.0, 0.0)
    }

    /// Returns the current rate and advances the schedule.
    pub fn next_rate(&mut self) -> f64 {
        let rate = self.initial / self.factor;
        if rate >= self.minimal {
            self.factor += self.decay;
            rate
        } else {
            self.minimal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_ok() {
        let mut rate = LearningRate::constant(0.1);
        for _ in 0..10 {
            assert_eq!(rate.next_rate(), 0.1);
        }
    }

    #[test]
    fn decay_ok() {
        let mut rate = LearningRate::new(1.0, 1.0, 0.3);
        assert!((rate.next_rate() - 1.0).abs() < f64::EPSILON);
        assert!((rate.next_rate() - 0.5).abs() < f64::EPSILON);
        assert!((rate.next_rate() - 1.0 / 3.0).abs() < f64::EPSILON);
        assert!((rate.next_rate() - 0.3).abs() < f64::EPSILON);
        assert!((rate.next_rate() - 0.3).abs() < f64::EPSILON);
    }
}
