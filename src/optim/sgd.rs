use crate::optim::{check_gradients, Gradients, LearningRate, Optimizer};
use crate::prelude::*;
use crate::reco::latents::Latents;
use crate::reco::Key;

/// Plain stochastic gradient descent: `w -= lr * g`.
#[derive(Debug, Clone)]
pub struct Sgd {
    learning_rate: LearningRate,
}

impl Sgd {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.01;

    #[must_use]
    pub fn new(learning_rate: impl Into<LearningRate>) -> Self {
        Self {
            learning_rate: learning_rate.into(),
        }
    }
}

impl Default for Sgd {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEARNING_RATE)
    }
}

impl<K: Key> Optimizer<K> for Sgd {
    fn update(&mut self, latents: &mut Latents<K>, gradients: &Gradients<K>) -> Result {
        check_gradients(latents, gradients)?;
        let learning_rate = self.learning_rate.next_rate();
        for (key, gradient) in gradients {
            if let Some(weights) = latents.get_mut(key) {
                weights.sub_assign_scaled(gradient, learning_rate);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initializers::Constant;
    use crate::math::Vector;

    fn latents() -> Result<Latents<&'static str>> {
        let mut latents = Latents::new(3);
        latents.get_or_init(&"a", &mut Constant { value: 1.0 })?;
        latents.get_or_init(&"b", &mut Constant { value: 1.0 })?;
        Ok(latents)
    }

    #[test]
    fn update_ok() -> Result {
        let mut latents = latents()?;
        let mut gradients = Gradients::default();
        gradients.insert("a", Vector::from(vec![1.0, 2.0, -1.0]));

        Sgd::new(0.1).update(&mut latents, &gradients)?;

        let updated = latents.get(&"a").unwrap();
        assert!((updated.0[0] - 0.9).abs() < 1e-12);
        assert!((updated.0[1] - 0.8).abs() < 1e-12);
        assert!((updated.0[2] - 1.1).abs() < 1e-12);
        assert_eq!(latents.get(&"b"), Some(&Vector::from(vec![1.0; 3])));
        Ok(())
    }

    #[test]
    fn update_shape_mismatch_leaves_latents_intact() -> Result {
        let mut latents = latents()?;
        let mut gradients = Gradients::default();
        gradients.insert("a", Vector::from(vec![1.0, 2.0, 3.0]));
        gradients.insert("b", Vector::from(vec![1.0]));

        assert!(Sgd::default().update(&mut latents, &gradients).is_err());
        assert_eq!(latents.get(&"a"), Some(&Vector::from(vec![1.0; 3])));
        assert_eq!(latents.get(&"b"), Some(&Vector::from(vec![1.0; 3])));
        Ok(())
    }

    #[test]
    fn update_decays_learning_rate_ok() -> Result {
        let mut latents = latents()?;
        let mut gradients = Gradients::default();
        gradients.insert("a", Vector::from(vec![1.0, 1.0, 1.0]));

        let mut optimizer = Sgd::new(LearningRate::new(0.2, 1.0, 0.0));
        optimizer.update(&mut latents, &gradients)?;
        optimizer.update(&mut latents, &gradients)?;

        assert!((latents.get(&"a").unwrap().0[0] - 0.7).abs() < 1e-12);
        Ok(())
    }
}
