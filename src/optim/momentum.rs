use itertools::izip;

use crate::math::Vector;
use crate::optim::{check_gradients, Gradients, LearningRate, Optimizer};
use crate::prelude::*;
use crate::reco::latents::Latents;
use crate::reco::Key;

/// Momentum: `s = rho * s + lr * g; w -= s`.
///
/// Velocities are kept per key and start at zero.
#[derive(Debug, Clone)]
pub struct Momentum<K> {
    learning_rate: LearningRate,
    rho: f64,
    velocities: AHashMap<K, Vector>,
}

impl<K: Key> Momentum<K> {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
    pub const DEFAULT_RHO: f64 = 0.9;

    #[must_use]
    pub fn new(learning_rate: impl Into<LearningRate>, rho: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&rho));
        Self {
            learning_rate: learning_rate.into(),
            rho,
            velocities: AHashMap::default(),
        }
    }

    #[must_use]
    pub fn velocity(&self, key: &K) -> Option<&Vector> {
        self.velocities.get(key)
    }
}

impl<K: Key> Default for Momentum<K> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEARNING_RATE, Self::DEFAULT_RHO)
    }
}

impl<K: Key> Optimizer<K> for Momentum<K> {
    fn update(&mut self, latents: &mut Latents<K>, gradients: &Gradients<K>) -> Result {
        check_gradients(latents, gradients)?;
        let learning_rate = self.learning_rate.next_rate();
        for (key, gradient) in gradients {
            let velocity = self
                .velocities
                .entry(key.clone())
                .or_insert_with(|| Vector::zeros(gradient.len()));
            if let Some(weights) = latents.get_mut(key) {
                for (wi, si, gi) in izip!(&mut weights.0, &mut velocity.0, &gradient.0) {
                    *si = self.rho * *si + learning_rate * gi;
                    *wi -= *si;
                }
            }
        }
        Ok(())
    }
}
