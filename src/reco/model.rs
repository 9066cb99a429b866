//! Funk matrix factorization trained online, one observation at a time.
//!
//! The prediction is the dot product of the user and item latent vectors.
//! See: https://sifter.org/~simon/journal/20061211.html.

use crate::initializers::{Initializer, Normal};
use crate::loss::{Loss, Squared};
use crate::math::Vector;
use crate::optim::{check_gradients, Gradients, Optimizer, OptimizerConfig};
use crate::prelude::*;
use crate::reco::latents::Latents;
use crate::reco::Key;

pub struct OnlineMf<U, I = U> {
    l2: f64,
    clip_gradient: f64,
    loss: Box<dyn Loss>,
    initializer: Box<dyn Initializer>,

    user_latents: Latents<U>,
    item_latents: Latents<I>,

    /// Separate instances: optimizers keep per-key state which must not leak between the sides.
    user_optimizer: Box<dyn Optimizer<U>>,
    item_optimizer: Box<dyn Optimizer<I>>,
}

impl<U: Key + 'static, I: Key + 'static> OnlineMf<U, I> {
    #[must_use]
    pub fn builder() -> OnlineMfBuilder<U, I> {
        OnlineMfBuilder::default()
    }
}

impl<U: Key, I: Key> OnlineMf<U, I> {
    #[must_use]
    pub fn n_factors(&self) -> usize {
        self.user_latents.n_factors()
    }

    #[must_use]
    pub fn l2(&self) -> f64 {
        self.l2
    }

    #[must_use]
    pub fn clip_gradient(&self) -> f64 {
        self.clip_gradient
    }

    #[must_use]
    pub fn user_latents(&self) -> &Latents<U> {
        &self.user_latents
    }

    #[must_use]
    pub fn item_latents(&self) -> &Latents<I> {
        &self.item_latents
    }

    /// Predicts the rating. Initializes the latent vectors of unseen keys.
    pub fn predict(&mut self, user: &U, item: &I) -> Result<f64> {
        let user_latent = self
            .user_latents
            .get_or_init(user, self.initializer.as_mut())?;
        let item_latent = self
            .item_latents
            .get_or_init(item, self.initializer.as_mut())?;
        Ok(user_latent.dot(item_latent))
    }

    /// Updates the user and item latent vectors with a single observation.
    ///
    /// Both gradients are computed from the vectors as they were before the update,
    /// and both are validated before either side gets updated.
    pub fn fit_one(&mut self, user: &U, item: &I, target: f64) -> Result<&mut Self> {
        ensure!(target.is_finite(), "invalid input: target must be finite, got {}", target);

        let prediction = self.predict(user, item)?;
        let loss_gradient = self
            .loss
            .gradient(target, prediction)
            .clamp(-self.clip_gradient, self.clip_gradient);
        ensure!(
            loss_gradient.is_finite(),
            "invalid input: loss gradient is {} (target: {}, prediction: {})",
            loss_gradient,
            target,
            prediction,
        );

        let (user_gradients, item_gradients) = {
            let user_latent = self
                .user_latents
                .get(user)
                .ok_or_else(|| anyhow!("user latent vector is missing"))?;
            let item_latent = self
                .item_latents
                .get(item)
                .ok_or_else(|| anyhow!("item latent vector is missing"))?;
            let user_gradient = latent_gradient(loss_gradient, item_latent, self.l2, user_latent);
            let item_gradient = latent_gradient(loss_gradient, user_latent, self.l2, item_latent);
            (
                [(user.clone(), user_gradient)].into_iter().collect::<Gradients<U>>(),
                [(item.clone(), item_gradient)].into_iter().collect::<Gradients<I>>(),
            )
        };
        check_gradients(&self.user_latents, &user_gradients)?;
        check_gradients(&self.item_latents, &item_gradients)?;

        self.user_optimizer
            .update(&mut self.user_latents, &user_gradients)
            .context("failed to update the user latent vector")?;
        self.item_optimizer
            .update(&mut self.item_latents, &item_gradients)
            .context("failed to update the item latent vector")?;

        Ok(self)
    }

    /// Ranks the items seen so far by the predicted rating, best first.
    pub fn recommend(&mut self, user: &U, n_items: usize) -> Result<Vec<(I, f64)>> {
        let user_latent = self
            .user_latents
            .get_or_init(user, self.initializer.as_mut())?;
        let mut predictions = self
            .item_latents
            .iter()
            .map(|(item, item_latent)| (item.clone(), user_latent.dot(item_latent)))
            .collect::<Vec<_>>();
        predictions.sort_unstable_by(|(_, lhs), (_, rhs)| rhs.total_cmp(lhs));
        predictions.truncate(n_items);
        Ok(predictions)
    }
}

/// `loss_gradient * other + l2 * this`.
fn latent_gradient(loss_gradient: f64, other: &Vector, l2: f64, this: &Vector) -> Vector {
    other.mul(loss_gradient).add(&this.mul(l2))
}

pub struct OnlineMfBuilder<U, I> {
    n_factors: usize,
    optimizer: OptimizerConfig,
    optimizers: Option<(Box<dyn Optimizer<U>>, Box<dyn Optimizer<I>>)>,
    loss: Option<Box<dyn Loss>>,
    l2: f64,
    initializer: Option<Box<dyn Initializer>>,
    clip_gradient: f64,
    random_state: Option<u64>,
}

impl<U, I> Default for OnlineMfBuilder<U, I> {
    fn default() -> Self {
        Self {
            n_factors: Self::DEFAULT_N_FACTORS,
            optimizer: OptimizerConfig::default(),
            optimizers: None,
            loss: None,
            l2: 0.0,
            initializer: None,
            clip_gradient: Self::DEFAULT_CLIP_GRADIENT,
            random_state: None,
        }
    }
}

impl<U, I> OnlineMfBuilder<U, I> {
    pub const DEFAULT_N_FACTORS: usize = 10;
    pub const DEFAULT_CLIP_GRADIENT: f64 = 1e12;
    pub const DEFAULT_INIT_STD: f64 = 0.1;
}

impl<U: Key + 'static, I: Key + 'static> OnlineMfBuilder<U, I> {
    #[must_use]
    pub fn n_factors(mut self, n_factors: usize) -> Self {
        self.n_factors = n_factors;
        self
    }

    /// Each side gets its own optimizer instance built from the config.
    #[must_use]
    pub fn optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Explicit optimizer instances, overrides [`OnlineMfBuilder::optimizer`].
    ///
    /// The user side is updated first. If the item optimizer then fails,
    /// the user side update stays applied.
    #[must_use]
    pub fn optimizers(
        mut self,
        user_optimizer: impl Optimizer<U> + 'static,
        item_optimizer: impl Optimizer<I> + 'static,
    ) -> Self {
        self.optimizers = Some((Box::new(user_optimizer), Box::new(item_optimizer)));
        self
    }

    #[must_use]
    pub fn loss(mut self, loss: impl Loss + 'static) -> Self {
        self.loss = Some(Box::new(loss));
        self
    }

    #[must_use]
    pub fn l2(mut self, l2: f64) -> Self {
        self.l2 = l2;
        self
    }

    #[must_use]
    pub fn initializer(mut self, initializer: impl Initializer + 'static) -> Self {
        self.initializer = Some(Box::new(initializer));
        self
    }

    #[must_use]
    pub fn clip_gradient(mut self, clip_gradient: f64) -> Self {
        self.clip_gradient = clip_gradient;
        self
    }

    /// Seeds the default initializer. Ignored when the initializer is set explicitly.
    #[must_use]
    pub fn random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn build(self) -> Result<OnlineMf<U, I>> {
        ensure!(
            self.l2.is_finite() && self.l2 >= 0.0,
            "invalid input: L2 must be non-negative, got {}",
            self.l2,
        );
        ensure!(
            self.clip_gradient > 0.0,
            "invalid input: gradient clip bound must be positive, got {}",
            self.clip_gradient,
        );

        let initializer: Box<dyn Initializer> = match self.initializer {
            Some(initializer) => initializer,
            None => Box::new(Normal::new(0.0, Self::DEFAULT_INIT_STD, self.random_state)?),
        };
        let (user_optimizer, item_optimizer) = match self.optimizers {
            Some(optimizers) => optimizers,
            None => (self.optimizer.build(), self.optimizer.build()),
        };
        let loss: Box<dyn Loss> = match self.loss {
            Some(loss) => loss,
            None => Box::new(Squared),
        };
        debug!(
            n_factors = self.n_factors,
            l2 = self.l2,
            clip_gradient = self.clip_gradient,
            optimizer = ?self.optimizer,
            "built",
        );

        Ok(OnlineMf {
            l2: self.l2,
            clip_gradient: self.clip_gradient,
            loss,
            initializer,
            user_latents: Latents::new(self.n_factors),
            item_latents: Latents::new(self.n_factors),
            user_optimizer,
            item_optimizer,
        })
    }
}
