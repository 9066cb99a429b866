use std::collections::hash_map::{Entry, Iter};

use crate::initializers::Initializer;
use crate::math::Vector;
use crate::prelude::*;
use crate::reco::Key;

/// Latent vectors of a single key space, created on first access.
///
/// Every vector is exactly `n_factors` long. Nothing is ever evicted.
#[derive(Debug, Clone)]
pub struct Latents<K> {
    n_factors: usize,
    vectors: AHashMap<K, Vector>,
}

impl<K: Key> Latents<K> {
    #[must_use]
    pub fn new(n_factors: usize) -> Self {
        Self {
            n_factors,
            vectors: AHashMap::default(),
        }
    }

    #[must_use]
    #[inline]
    pub const fn n_factors(&self) -> usize {
        self.n_factors
    }

    /// Borrows the key's vector, asking the factory for a new one if the key is unknown.
    ///
    /// A new vector of the wrong length is rejected and not stored.
    pub fn get_or_insert_with<F>(&mut self, key: &K, factory: F) -> Result<&mut Vector>
    where
        F: FnOnce(usize) -> Vector,
    {
        let n_factors = self.n_factors;
        match self.vectors.entry(key.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let vector = factory(n_factors);
                ensure!(
                    vector.len() == n_factors,
                    "invalid input: expected a new latent vector of length {}, got {}",
                    n_factors,
                    vector.len(),
                );
                Ok(entry.insert(vector))
            }
        }
    }

    /// Borrows the key's vector, initializing it if the key is unknown.
    pub fn get_or_init(
        &mut self,
        key: &K,
        initializer: &mut dyn Initializer,
    ) -> Result<&mut Vector> {
        self.get_or_insert_with(key, |n_factors| initializer.initialize(n_factors))
    }

    #[must_use]
    #[inline]
    pub fn get(&self, key: &K) -> Option<&Vector> {
        self.vectors.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut Vector> {
        self.vectors.get_mut(key)
    }

    #[must_use]
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.vectors.contains_key(key)
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, K, Vector> {
        self.vectors.iter()
    }
}
