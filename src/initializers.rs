//! Latent vector initialization schemes.

use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use statrs::distribution::{Normal as NormalDistribution, Uniform as UniformDistribution};

use crate::math::Vector;
use crate::prelude::*;

/// Produces fresh latent vectors for previously unseen keys.
pub trait Initializer: Send {
    fn initialize(&mut self, n_factors: usize) -> Vector;
}

/// Creates the random generator, falling back to the OS entropy if no seed is given.
fn new_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

/// Draws the factors from the normal distribution.
#[derive(Debug)]
pub struct Normal {
    distribution: NormalDistribution,
    rng: StdRng,
}

impl Normal {
    pub fn new(mean: f64, std: f64, seed: Option<u64>) -> Result<Self> {
        ensure!(mean.is_finite(), "invalid input: mean must be finite, got {}", mean);
        ensure!(
            std.is_finite() && std > 0.0,
            "invalid input: standard deviation must be positive, got {}",
            std,
        );
        let distribution = NormalDistribution::new(mean, std)
            .map_err(|error| anyhow!("failed to create the normal distribution: {:?}", error))?;
        Ok(Self {
            distribution,
            rng: new_rng(seed),
        })
    }
}

impl Initializer for Normal {
    fn initialize(&mut self, n_factors: usize) -> Vector {
        (0..n_factors)
            .map(|_| self.distribution.sample(&mut self.rng))
            .collect::<Vec<f64>>()
            .into()
    }
}

/// Draws the factors uniformly from `[low, high]`.
#[derive(Debug)]
pub struct Uniform {
    distribution: UniformDistribution,
    rng: StdRng,
}

impl Uniform {
    pub fn new(low: f64, high: f64, seed: Option<u64>) -> Result<Self> {
        ensure!(
            low.is_finite() && high.is_finite() && low < high,
            "invalid input: expected finite `low < high`, got [{}, {})",
            low,
            high,
        );
        let distribution = UniformDistribution::new(low, high)
            .map_err(|error| anyhow!("failed to create the uniform distribution: {:?}", error))?;
        Ok(Self {
            distribution,
            rng: new_rng(seed),
        })
    }
}

impl Initializer for Uniform {
    fn initialize(&mut self, n_factors: usize) -> Vector {
        (0..n_factors)
            .map(|_| self.distribution.sample(&mut self.rng))
            .collect::<Vec<f64>>()
            .into()
    }
}

/// Fills the factors with the same value.
#[derive(Debug, Copy, Clone, Default)]
pub struct Constant {
    pub value: f64,
}

impl Constant {
    #[must_use]
    pub const fn zeros() -> Self {
        Self { value: 0.0 }
    }
}

impl Initializer for Constant {
    fn initialize(&mut self, n_factors: usize) -> Vector {
        vec![self.value; n_factors].into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_seeded_ok() -> Result {
        let mut left = Normal::new(0.0, 0.1, Some(11))?;
        let mut right = Normal::new(0.0, 0.1, Some(11))?;
        let vector = left.initialize(10);
        assert_eq!(vector.len(), 10);
        assert_eq!(vector, right.initialize(10));
        assert_ne!(vector, left.initialize(10));
        Ok(())
    }

    #[test]
    fn normal_invalid_std_fails() {
        assert!(Normal::new(0.0, 0.0, None).is_err());
        assert!(Normal::new(0.0, -1.0, None).is_err());
        assert!(Normal::new(f64::NAN, 0.1, None).is_err());
    }

    #[test]
    fn uniform_bounds_ok() -> Result {
        let mut initializer = Uniform::new(-0.5, 0.5, Some(42))?;
        let vector = initializer.initialize(1000);
        assert!(vector.0.iter().all(|xi| (-0.5..=0.5).contains(xi)));
        Ok(())
    }

    #[test]
    fn uniform_invalid_bounds_fails() {
        assert!(Uniform::new(1.0, 1.0, None).is_err());
        assert!(Uniform::new(1.0, -1.0, None).is_err());
    }

    #[test]
    fn zeros_ok() {
        assert_eq!(Constant::zeros().initialize(3), Vector::zeros(3));
    }
}
