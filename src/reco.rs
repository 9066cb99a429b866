//! Recommender models.

use std::hash::Hash;

pub mod latents;
pub mod model;

/// User or item identifier: any hashable value which may be sent to another thread.
pub trait Key: Hash + Eq + Clone + Send {}

impl<T: Hash + Eq + Clone + Send> Key for T {}
