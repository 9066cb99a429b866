//! Sequential optimizers updating the latent vectors one observation at a time.

use crate::math::Vector;
use crate::prelude::*;
use crate::reco::latents::Latents;
use crate::reco::Key;

pub use self::ada_grad::AdaGrad;
pub use self::learning_rate::LearningRate;
pub use self::momentum::Momentum;
pub use self::sgd::Sgd;

pub mod ada_grad;
pub mod learning_rate;
pub mod momentum;
pub mod sgd;

/// Sparse gradients: only the keys being updated.
pub type Gradients<K> = AHashMap<K, Vector>;

pub trait Optimizer<K>: Send {
    /// Subtracts a step from every latent vector which has a gradient.
    /// Other vectors stay untouched.
    ///
    /// The optimizer keeps its own per-key state, so the same instance must serve
    /// the same key space for the whole stream.
    fn update(&mut self, latents: &mut Latents<K>, gradients: &Gradients<K>) -> Result;
}

/// Validates all the gradients before any vector gets mutated.
pub fn check_gradients<K: Key>(latents: &Latents<K>, gradients: &Gradients<K>) -> Result {
    for (key, gradient) in gradients {
        ensure!(latents.contains(key), "invalid input: gradient for a key without latent factors");
        ensure!(
            gradient.len() == latents.n_factors(),
            "invalid input: expected a gradient of length {}, got {}",
            latents.n_factors(),
            gradient.len(),
        );
        ensure!(
            gradient.0.iter().all(|gi| gi.is_finite()),
            "invalid input: gradient contains non-finite values",
        );
    }
    Ok(())
}

/// Optimizer settings, each call to [`OptimizerConfig::build`] creates an independent instance.
#[derive(Debug, Copy, Clone)]
pub enum OptimizerConfig {
    Sgd {
        learning_rate: LearningRate,
    },
    Momentum {
        learning_rate: LearningRate,
        rho: f64,
    },
    AdaGrad {
        learning_rate: LearningRate,
        epsilon: f64,
    },
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::sgd(Sgd::DEFAULT_LEARNING_RATE)
    }
}

impl OptimizerConfig {
    #[must_use]
    pub fn sgd(learning_rate: impl Into<LearningRate>) -> Self {
        Self::Sgd {
            learning_rate: learning_rate.into(),
        }
    }

    #[must_use]
    pub fn momentum(learning_rate: impl Into<LearningRate>, rho: f64) -> Self {
        Self::Momentum {
            learning_rate: learning_rate.into(),
            rho,
        }
    }

    #[must_use]
    pub fn ada_grad(learning_rate: impl Into<LearningRate>, epsilon: f64) -> Self {
        Self::AdaGrad {
            learning_rate: learning_rate.into(),
            epsilon,
        }
    }

    #[must_use]
    pub fn build<K: Key + 'static>(self) -> Box<dyn Optimizer<K>> {
        match self {
            Self::Sgd { learning_rate } => Box::new(Sgd::new(learning_rate)),
            Self::Momentum { learning_rate, rho } => Box::new(Momentum::new(learning_rate, rho)),
            Self::AdaGrad {
                learning_rate,
                epsilon,
            } => Box::new(AdaGrad::new(learning_rate, epsilon)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initializers::Constant;

    #[test]
    fn check_gradients_ok() -> Result {
        let mut latents = Latents::new(2);
        latents.get_or_init(&"a", &mut Constant::zeros())?;

        let mut gradients = Gradients::default();
        gradients.insert("a", Vector::from(vec![1.0, 2.0]));
        check_gradients(&latents, &gradients)
    }

    #[test]
    fn check_gradients_shape_mismatch_fails() -> Result {
        let mut latents = Latents::new(2);
        latents.get_or_init(&"a", &mut Constant::zeros())?;

        let mut gradients = Gradients::default();
        gradients.insert("a", Vector::from(vec![1.0]));
        assert!(check_gradients(&latents, &gradients).is_err());
        Ok(())
    }

    #[test]
    fn check_gradients_unknown_key_fails() {
        let latents = Latents::new(1);
        let mut gradients = Gradients::default();
        gradients.insert("a", Vector::from(vec![1.0]));
        assert!(check_gradients(&latents, &gradients).is_err());
    }

    #[test]
    fn check_gradients_nan_fails() -> Result {
        let mut latents = Latents::new(1);
        latents.get_or_init(&"a", &mut Constant::zeros())?;

        let mut gradients = Gradients::default();
        gradients.insert("a", Vector::from(vec![f64::NAN]));
        assert!(check_gradients(&latents, &gradients).is_err());
        Ok(())
    }

    #[test]
    fn build_creates_independent_instances_ok() -> Result {
        let config = OptimizerConfig::momentum(0.1, 0.9);
        let mut first = config.build::<&str>();
        let mut second = config.build::<&str>();

        let mut first_latents = Latents::new(1);
        let mut second_latents = Latents::new(1);
        first_latents.get_or_init(&"a", &mut Constant::zeros())?;
        second_latents.get_or_init(&"a", &mut Constant::zeros())?;

        let mut gradients = Gradients::default();
        gradients.insert("a", Vector::from(vec![1.0]));
        first.update(&mut first_latents, &gradients)?;
        first.update(&mut first_latents, &gradients)?;
        second.update(&mut second_latents, &gradients)?;

        // The second instance has not seen the first one's velocity.
        assert!((second_latents.get(&"a").unwrap().0[0] + 0.1).abs() < 1e-12);
        assert!((first_latents.get(&"a").unwrap().0[0] + 0.29).abs() < 1e-12);
        Ok(())
    }
}
