//! Online matrix factorization recommender.
//!
//! Latent user and item vectors are created lazily and updated after every single
//! observation by a pluggable sequential optimizer.

pub mod helpers;
pub mod initializers;
pub mod loss;
pub mod math;
pub mod optim;
pub mod prelude;
pub mod reco;
pub mod trainer;

pub use crate::prelude::Result;
pub use crate::reco::model::{OnlineMf, OnlineMfBuilder};
