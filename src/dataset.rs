//! Synthetic noisy linear data and its train/test split
//!
//! A [`Dataset`] is generated once from a [`DatasetConfig`] and never changes afterwards:
//! every regime is fit to the same training points and judged on the same held-out points.
//!
//! ```rust
//! # use biasvar::dataset::{Dataset, DatasetConfig};
//! let data = Dataset::generate(&DatasetConfig::default()).unwrap();
//! assert_eq!(data.len(), 30);
//! assert_eq!(data.test().len(), 6);
//! assert_eq!(data.train().len(), 24);
//! ```
use std::ops::RangeInclusive;

use rand::{seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    transforms::{ApplyNoise, Strength},
    value::{CoordExt, Linspace},
};

/// Mixed into the seed so the split does not replay the noise generator's stream.
const SPLIT_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// Parameters of the synthetic dataset.
///
/// Targets are `slope * x + intercept + ε` with `ε ~ N(0, noise²)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Number of evenly spaced inputs.
    pub samples: usize,

    /// Smallest input.
    pub x_min: f64,

    /// Largest input.
    pub x_max: f64,

    /// Slope of the true relationship.
    pub slope: f64,

    /// Intercept of the true relationship.
    pub intercept: f64,

    /// Standard deviation of the additive Gaussian noise.
    pub noise: f64,

    /// Seed for the noise. The split draws from its own stream derived from it.
    pub seed: u64,

    /// Share of the points held out for testing, in `(0, 1)`.
    pub test_ratio: f64,
}
impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            samples: 30,
            x_min: 0.0,
            x_max: 10.0,
            slope: 2.0,
            intercept: 1.0,
            noise: 2.0,
            seed: 42,
            test_ratio: 0.2,
        }
    }
}
impl DatasetConfig {
    /// Returns a copy of this configuration with a different seed.
    #[must_use]
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }

    /// Seed of the shuffle that picks the held-out points.
    pub fn split_seed(&self) -> u64 {
        self.seed ^ SPLIT_STREAM
    }

    /// Checks that the configuration can produce a dataset.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.samples < 2 {
            return Err(Error::InvalidConfig(format!(
                "samples must be at least 2, got {}",
                self.samples
            )));
        }

        if !self.x_min.is_finite() || !self.x_max.is_finite() || self.x_min >= self.x_max {
            return Err(Error::InvalidConfig(format!(
                "x range {}..={} must be finite and non-empty",
                self.x_min, self.x_max
            )));
        }

        if !self.slope.is_finite() || !self.intercept.is_finite() {
            return Err(Error::InvalidConfig(
                "slope and intercept must be finite".to_string(),
            ));
        }

        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "noise must be finite and non-negative, got {}",
                self.noise
            )));
        }

        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "test_ratio must be strictly between 0 and 1, got {}",
                self.test_ratio
            )));
        }

        Ok(())
    }

    /// Number of held-out points: `ceil(samples * test_ratio)`, leaving at least one of each.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn test_size(&self) -> usize {
        let n = (self.samples as f64 * self.test_ratio).ceil() as usize;
        n.clamp(1, self.samples.saturating_sub(1).max(1))
    }
}

/// Noisy linear data split into a training and a test partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    config: DatasetConfig,
    points: Vec<(f64, f64)>,
    train_indices: Vec<usize>,
    test_indices: Vec<usize>,
    train: Vec<(f64, f64)>,
    test: Vec<(f64, f64)>,
}
impl Dataset {
    /// Generates the dataset described by `config`.
    ///
    /// The output is fully determined by `config`; the same seed always gives bit-identical
    /// points and the same split.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if the configuration is invalid.
    pub fn generate(config: &DatasetConfig) -> Result<Self> {
        config.validate()?;

        let points: Vec<(f64, f64)> = Linspace::new(config.x_min..=config.x_max, config.samples)
            .map(|x| (x, config.slope * x + config.intercept))
            .collect::<Vec<_>>()
            .apply_normal_noise(Strength::Absolute(config.noise), Some(config.seed))?;

        let mut order: Vec<usize> = (0..points.len()).collect();
        let mut rng = rand::rngs::SmallRng::seed_from_u64(config.split_seed());
        order.shuffle(&mut rng);

        let (test_indices, train_indices) = order.split_at(config.test_size());
        let mut test_indices = test_indices.to_vec();
        let mut train_indices = train_indices.to_vec();
        test_indices.sort_unstable();
        train_indices.sort_unstable();

        let train = train_indices.iter().map(|&i| points[i]).collect();
        let test = test_indices.iter().map(|&i| points[i]).collect();

        log::debug!(
            "generated {} points (seed {}): {} train / {} test",
            points.len(),
            config.seed,
            train_indices.len(),
            test_indices.len()
        );

        Ok(Self {
            config: config.clone(),
            points,
            train_indices,
            test_indices,
            train,
            test,
        })
    }

    /// The configuration the dataset was generated from.
    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Every point, in input order.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// The training partition, in input order.
    pub fn train(&self) -> &[(f64, f64)] {
        &self.train
    }

    /// The held-out partition, in input order.
    pub fn test(&self) -> &[(f64, f64)] {
        &self.test
    }

    /// Indices into [`Dataset::points`] of the training partition, ascending.
    pub fn train_indices(&self) -> &[usize] {
        &self.train_indices
    }

    /// Indices into [`Dataset::points`] of the held-out partition, ascending.
    pub fn test_indices(&self) -> &[usize] {
        &self.test_indices
    }

    /// The full input domain: every `x`, in order.
    pub fn inputs(&self) -> Vec<f64> {
        self.points.x()
    }

    /// The noisy targets, in input order.
    pub fn targets(&self) -> Vec<f64> {
        self.points.y()
    }

    /// The range spanned by the inputs.
    pub fn domain(&self) -> RangeInclusive<f64> {
        self.config.x_min..=self.config.x_max
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no points. Never true for a generated dataset.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{assert_all_close, assert_close};

    #[test]
    fn test_default_shape() {
        let data = Dataset::generate(&DatasetConfig::default()).unwrap();
        assert_eq!(data.len(), 30);
        assert_eq!(data.test().len(), 6);
        assert_eq!(data.train().len(), 24);

        let xs = data.inputs();
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[29], 10.0);
        assert_close!(xs[1] - xs[0], 10.0 / 29.0, tol = 1e-12);
    }

    #[test]
    fn test_split_is_a_partition() {
        let data = Dataset::generate(&DatasetConfig::default()).unwrap();
        let mut all: Vec<usize> = data
            .train_indices()
            .iter()
            .chain(data.test_indices())
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..30).collect::<Vec<_>>());

        for (&i, p) in data.test_indices().iter().zip(data.test()) {
            assert_eq!(data.points()[i], *p);
        }
        for (&i, p) in data.train_indices().iter().zip(data.train()) {
            assert_eq!(data.points()[i], *p);
        }
    }

    #[test]
    fn test_same_seed_same_data() {
        let config = DatasetConfig::default();
        let a = Dataset::generate(&config).unwrap();
        let b = Dataset::generate(&config).unwrap();
        assert_eq!(a, b);

        let c = Dataset::generate(&config.with_seed(7)).unwrap();
        assert_ne!(a.targets(), c.targets());
        assert_eq!(a.inputs(), c.inputs());
    }

    #[test]
    fn test_split_independent_of_noise_stream() {
        for seed in 0..20 {
            let config = DatasetConfig::default().with_seed(seed);
            assert_ne!(config.split_seed(), config.seed);

            let data = Dataset::generate(&config).unwrap();

            // The held-out points a shuffle on the noise seed itself would pick
            let mut order: Vec<usize> = (0..data.len()).collect();
            order.shuffle(&mut rand::rngs::SmallRng::seed_from_u64(config.seed));
            let mut shared = order[..config.test_size()].to_vec();
            shared.sort_unstable();
            let shared: Vec<(f64, f64)> = shared.iter().map(|&i| data.points()[i]).collect();

            assert_ne!(data.test(), shared.as_slice(), "seed {seed}");
        }
    }

    #[test]
    fn test_noise_free_is_exact_line() {
        let config = DatasetConfig {
            noise: 0.0,
            ..DatasetConfig::default()
        };
        let data = Dataset::generate(&config).unwrap();
        let expected: Vec<f64> = data.inputs().iter().map(|x| 2.0 * x + 1.0).collect();
        assert_all_close!(data.targets(), expected);
    }

    #[test]
    fn test_test_size_rounds_up() {
        let config = DatasetConfig {
            samples: 11,
            ..DatasetConfig::default()
        };
        assert_eq!(config.test_size(), 3);

        let tiny = DatasetConfig {
            samples: 2,
            test_ratio: 0.9,
            ..DatasetConfig::default()
        };
        assert_eq!(tiny.test_size(), 1);
    }

    #[test]
    fn test_invalid_configs() {
        let base = DatasetConfig::default();
        let bad = [
            DatasetConfig {
                samples: 1,
                ..base.clone()
            },
            DatasetConfig {
                x_min: 5.0,
                x_max: 5.0,
                ..base.clone()
            },
            DatasetConfig {
                x_max: f64::INFINITY,
                ..base.clone()
            },
            DatasetConfig {
                noise: -0.1,
                ..base.clone()
            },
            DatasetConfig {
                noise: f64::NAN,
                ..base.clone()
            },
            DatasetConfig {
                test_ratio: 0.0,
                ..base.clone()
            },
            DatasetConfig {
                test_ratio: 1.0,
                ..base.clone()
            },
        ];
        for config in &bad {
            assert!(
                matches!(Dataset::generate(config), Err(Error::InvalidConfig(_))),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: DatasetConfig =
            serde_json::from_str(r#"{ "samples": 50, "seed": 1 }"#).unwrap();
        assert_eq!(config.samples, 50);
        assert_eq!(config.seed, 1);
        assert_eq!(config.test_ratio, 0.2);
    }
}
