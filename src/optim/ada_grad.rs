use itertools::izip;

use crate::math::Vector;
use crate::optim::{check_gradients, Gradients, LearningRate, Optimizer};
use crate::prelude::*;
use crate::reco::latents::Latents;
use crate::reco::Key;

/// AdaGrad: per-factor rates shrinking with the accumulated squared gradients.
#[derive(Debug, Clone)]
pub struct AdaGrad<K> {
    learning_rate: LearningRate,
    epsilon: f64,
    accumulators: AHashMap<K, Vector>,
}

impl<K: Key> AdaGrad<K> {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
    pub const DEFAULT_EPSILON: f64 = 1e-8;

    #[must_use]
    pub fn new(learning_rate: impl Into<LearningRate>, epsilon: f64) -> Self {
        debug_assert!(epsilon >= 0.0);
        Self {
            learning_rate: learning_rate.into(),
            epsilon,
            accumulators: AHashMap::default(),
        }
    }
}

impl<K: Key> Default for AdaGrad<K> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEARNING_RATE, Self::DEFAULT_EPSILON)
    }
}

impl<K: Key> Optimizer<K> for AdaGrad<K> {
    fn update(&mut self, latents: &mut Latents<K>, gradients: &Gradients<K>) -> Result {
        check_gradients(latents, gradients)?;
        let learning_rate = self.learning_rate.next_rate();
        for (key, gradient) in gradients {
            let accumulator = self
                .accumulators
                .entry(key.clone())
                .or_insert_with(|| Vector::zeros(gradient.len()));
            if let Some(weights) = latents.get_mut(key) {
                for (wi, g2i, gi) in izip!(&mut weights.0, &mut accumulator.0, &gradient.0) {
                    *g2i += gi * gi;
                    *wi -= learning_rate / (*g2i + self.epsilon).sqrt() * gi;
                }
            }
        }
        Ok(())
    }
}
