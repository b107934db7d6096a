//! Utilities for adding transformations to data
//!
//! Data can be transformed by anything implementing the [`Transform`] trait, which applies the
//! transformation over a set of values. [`Transformable`] applies one to the Y channel of an
//! (X, Y) dataset.
//!
//! # Noise: [`NoiseTransform`] / [`ApplyNoise`]
//! - Gaussian noise: [`NoiseTransform::Gaussian`]
//!   - Adds independent `N(0, σ²)` noise to every value.
//!   - [`ApplyNoise::apply_normal_noise`] applies it to the Y channel of an (X, Y) dataset.
//!   - σ is either absolute, or relative to the spread of the data; see [`Strength`].
use crate::{error::Result, value::Value};

mod noise;
pub use noise::{ApplyNoise, NoiseTransform, Strength};

/// Trait for applying transformations to data.
pub trait Transform<T: Value> {
    /// Applies the transformation to the given data.
    ///
    /// # Errors
    /// Returns an error if the transform's parameters are invalid.
    fn apply<'a>(&self, data: impl Iterator<Item = &'a mut T>) -> Result<()>;
}

/// Trait for transforming data.
pub trait Transformable<T: Value> {
    /// Transforms the data in place.
    ///
    /// # Errors
    /// Returns an error if the transform's parameters are invalid.
    fn transform<R: Transform<T>>(&mut self, transform: &R) -> Result<()>;
}
impl<T: Value> Transformable<T> for Vec<(T, T)> {
    fn transform<R: Transform<T>>(&mut self, transform: &R) -> Result<()> {
        transform.apply(self.iter_mut().map(|(_, y)| y))
    }
}
