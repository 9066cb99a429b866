use serde::{Deserialize, Serialize};

/// Dense latent vector.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Vector(pub Vec<f64>);

impl From<Vec<f64>> for Vector {
    fn from(vec: Vec<f64>) -> Self {
        Self(vec)
    }
}

impl Vector {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn zeros(length: usize) -> Self {
        Self(vec![0.0; length])
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn norm(&self) -> f64 {
        self.0.iter().map(|xi| xi * xi).sum::<f64>().sqrt()
    }

    #[must_use]
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        debug_assert_eq!(self.len(), other.len());
        self.0
            .iter()
            .zip(&other.0)
            .fold(0.0, |dot, (xi, yi)| dot + xi * yi)
    }

    #[must_use]
    pub fn mul(&self, rhs: f64) -> Self {
        Self(self.0.iter().map(|xi| xi * rhs).collect())
    }

    #[must_use]
    pub fn add(&self, rhs: &Self) -> Self {
        debug_assert_eq!(self.len(), rhs.len());
        Self(self.0.iter().zip(&rhs.0).map(|(xi, yi)| xi + yi).collect())
    }

    /// Subtracts the right vector from this one inplace.
    /// The scaling is applied to the subtrahend.
    pub fn sub_assign_scaled(&mut self, subtrahend: &Self, scaling: f64) {
        debug_assert_eq!(self.len(), subtrahend.len());
        for (left, right) in self.0.iter_mut().zip(&subtrahend.0) {
            *left -= scaling * right;
        }
    }
}
