use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::{
    error::{Error, Result},
    statistics,
    transforms::{Transform, Transformable},
    value::Value,
};

/// How strong a noise transform is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strength<T: Value> {
    /// The standard deviation of the noise, in the units of the data.
    Absolute(T),

    /// A multiple of the standard deviation of the data the noise is applied to.
    ///
    /// If the data has no spread, the multiple is used as an absolute value.
    Relative(T),
}
impl<T: Value> Strength<T> {
    /// Resolves the strength to a standard deviation for the given values.
    fn resolve(&self, values: &[T]) -> T {
        match *self {
            Strength::Absolute(s) => s,
            Strength::Relative(s) => {
                let (std_dev, _) = statistics::stddev_and_mean(values.iter().copied());
                if std_dev == T::zero() {
                    s
                } else {
                    std_dev * s
                }
            }
        }
    }
}

/// Types of noise based transforms for data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseTransform<T: Value> {
    /// Adds independent Gaussian noise to a signal or dataset.
    ///
    /// Gaussian noise is the familiar "bell curve" distribution, and the usual model of
    /// measurement error around a true relationship.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// ```math
    /// xₙ = xₙ + εₙ
    /// where
    ///   εₙ ~ N(0, σ²), independent per value
    /// ```
    /// </div>
    Gaussian {
        /// Standard deviation (spread) of the Gaussian distribution.
        strength: Strength<T>,

        /// Fixes the RNG seed for reproducibility.
        /// If not provided, a system RNG will be used each run.
        seed: Option<u64>,
    },
}
impl<T: Value> NoiseTransform<T> {
    fn seed(&self) -> Option<u64> {
        match self {
            NoiseTransform::Gaussian { seed, .. } => *seed,
        }
    }

    fn rng(seed: Option<u64>) -> rand::rngs::SmallRng {
        match seed {
            Some(s) => rand::rngs::SmallRng::seed_from_u64(s),
            None => rand::rngs::SmallRng::from_rng(&mut rand::rng()),
        }
    }
}
impl<T: Value> Transform<T> for NoiseTransform<T>
where
    T: num_traits::Float,
    rand_distr::StandardNormal: rand_distr::Distribution<T>,
{
    fn apply<'a>(&self, data: impl Iterator<Item = &'a mut T>) -> Result<()> {
        let mut rng = Self::rng(self.seed());
        match self {
            NoiseTransform::Gaussian { strength, .. } => {
                let mut data = data.collect::<Vec<_>>();
                let values: Vec<T> = data.iter().map(|v| **v).collect();
                let std_dev = strength.resolve(&values);

                if !num_traits::Float::is_finite(std_dev) || std_dev < T::zero() {
                    return Err(Error::InvalidConfig(format!(
                        "noise standard deviation must be finite and non-negative, got {std_dev}"
                    )));
                }

                let gaussian = Normal::new(T::zero(), std_dev)
                    .map_err(|e| Error::InvalidConfig(e.to_string()))?;
                for v in &mut data {
                    **v += gaussian.sample(&mut rng);
                }
            }
        }

        Ok(())
    }
}

/// Trait for applying noise to the Y channel of an (X, Y) dataset.
pub trait ApplyNoise<T: Value>: Sized {
    /// Adds independent Gaussian noise to every `y`.
    ///
    /// # Parameters
    /// - `strength`: Standard deviation of the noise, absolute or relative to the spread of `y`.
    /// - `seed`: Fixes the RNG for reproducibility. `None` draws a fresh seed.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if the resolved standard deviation is negative or not finite.
    ///
    /// # Example
    /// ```rust
    /// # use biasvar::transforms::{ApplyNoise, Strength};
    /// let data = vec![(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)];
    /// let a = data.clone().apply_normal_noise(Strength::Absolute(0.5), Some(7)).unwrap();
    /// let b = data.apply_normal_noise(Strength::Absolute(0.5), Some(7)).unwrap();
    /// assert_eq!(a, b);
    /// ```
    fn apply_normal_noise(self, strength: Strength<T>, seed: Option<u64>) -> Result<Self>;
}
impl<T: Value> ApplyNoise<T> for Vec<(T, T)>
where
    T: num_traits::Float,
    rand_distr::StandardNormal: rand_distr::Distribution<T>,
{
    fn apply_normal_noise(mut self, strength: Strength<T>, seed: Option<u64>) -> Result<Self> {
        self.transform(&NoiseTransform::Gaussian { strength, seed })?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diffs(clean: &[(f64, f64)], noisy: &[(f64, f64)]) -> Vec<f64> {
        clean
            .iter()
            .zip(noisy)
            .map(|((_, y1), (_, y2))| y2 - y1)
            .collect()
    }

    #[test]
    fn test_gaussian_absolute() {
        let data = vec![(1.0, 2.0); 2000];
        let noisy = data
            .clone()
            .apply_normal_noise(Strength::Absolute(0.5), Some(42))
            .unwrap();

        let (std_dev, mean) = statistics::stddev_and_mean(diffs(&data, &noisy).into_iter());
        assert!(mean.abs() < 0.05, "mean = {mean}");
        assert!((std_dev - 0.5).abs() < 0.05, "std_dev = {std_dev}");

        // x is untouched
        assert!(noisy.iter().all(|(x, _)| *x == 1.0));
    }

    #[test]
    fn test_gaussian_relative() {
        let data: Vec<(f64, f64)> = (0..2000)
            .map(|i| (f64::from(i), f64::from(i % 2) * 2.0))
            .collect();
        // y has a standard deviation of 1
        let noisy = data
            .clone()
            .apply_normal_noise(Strength::Relative(0.1), Some(3))
            .unwrap();

        let (std_dev, _) = statistics::stddev_and_mean(diffs(&data, &noisy).into_iter());
        assert!((std_dev - 0.1).abs() < 0.02, "std_dev = {std_dev}");
    }

    #[test]
    fn test_gaussian_seeded_is_reproducible() {
        let data = vec![(0.0, 0.0); 30];
        let a = data.clone().apply_normal_noise(Strength::Absolute(2.0), Some(9)).unwrap();
        let b = data.clone().apply_normal_noise(Strength::Absolute(2.0), Some(9)).unwrap();
        let c = data.apply_normal_noise(Strength::Absolute(2.0), Some(10)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_gaussian_zero_strength_is_identity() {
        let data = vec![(0.0, 1.5), (1.0, -2.0)];
        let noisy = data.clone().apply_normal_noise(Strength::Absolute(0.0), Some(1)).unwrap();
        assert_eq!(noisy, data);
    }

    #[test]
    fn test_gaussian_rejects_bad_strength() {
        let data = vec![(0.0, 1.0)];
        assert!(matches!(
            data.clone().apply_normal_noise(Strength::Absolute(-1.0), None),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            data.apply_normal_noise(Strength::Absolute(f64::NAN), None),
            Err(Error::InvalidConfig(_))
        ));
    }
}
