//! Everything the binary can be told, loaded from JSON with `key=value` overrides on top
//!
//! Every section and field is optional in the file; missing values take their defaults.
//!
//! ```json
//! {
//!     "dataset": { "samples": 40, "noise": 3.0, "seed": 7 },
//!     "fit": { "basis": "monomial", "regime": "overfitting" },
//!     "plot": { "output": "out/frame.png", "size": [1024, 768] },
//!     "view": { "show_test": false }
//! }
//! ```
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    dataset::DatasetConfig,
    error::{Error, Result},
    model::BasisKind,
    plotting::{PlotConfig, ViewState},
    regime::Regime,
    session::Toggle,
};

/// How models are fit, and the starting selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Polynomial basis for every fit
    pub basis: BasisKind,

    /// Regime selected at start-up
    pub regime: Regime,

    /// Highest degree in the error-vs-degree sweep
    pub sweep_max_degree: usize,

    /// Number of datasets the sweep averages over
    pub sweep_seeds: u64,
}
impl Default for FitConfig {
    fn default() -> Self {
        Self {
            basis: BasisKind::default(),
            regime: Regime::default(),
            sweep_max_degree: 15,
            sweep_seeds: 25,
        }
    }
}

/// Full configuration of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The synthetic data
    pub dataset: DatasetConfig,

    /// Fitting and sweep parameters
    pub fit: FitConfig,

    /// Output files and chart appearance
    pub plot: PlotConfig,

    /// Highlights at start-up
    pub view: ViewState,
}
impl Config {
    /// Reads a configuration from a JSON file and validates it
    ///
    /// # Errors
    /// - [`Error::Io`] if the file cannot be read.
    /// - [`Error::Json`] if it is not a valid configuration.
    /// - [`Error::InvalidConfig`] if a value is out of range.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;

        log::debug!("loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Checks every section
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        self.dataset.validate()?;

        if self.fit.sweep_max_degree == 0 || self.fit.sweep_seeds == 0 {
            return Err(Error::InvalidConfig(
                "sweep_max_degree and sweep_seeds must be at least 1".to_string(),
            ));
        }

        if self.plot.size.0 == 0 || self.plot.size.1 == 0 {
            return Err(Error::InvalidConfig(format!(
                "plot size {}x{} is empty",
                self.plot.size.0, self.plot.size.1
            )));
        }

        Ok(())
    }

    /// Applies one `key=value` override
    ///
    /// Keys: `seed`, `samples`, `noise`, `test_ratio`, `regime`, `basis`, `train`, `test`,
    /// `output`, `sweep_output`, `max_degree` and `seeds`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] for an unknown key or a value that does not parse,
    /// and [`Error::UnknownRegime`] for an unknown regime.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key.trim() {
            "seed" => self.dataset.seed = parse(key, value)?,
            "samples" => self.dataset.samples = parse(key, value)?,
            "noise" => self.dataset.noise = parse(key, value)?,
            "test_ratio" => self.dataset.test_ratio = parse(key, value)?,
            "regime" => self.fit.regime = value.parse()?,
            "basis" => self.fit.basis = value.parse()?,
            "max_degree" => self.fit.sweep_max_degree = parse(key, value)?,
            "seeds" => self.fit.sweep_seeds = parse(key, value)?,
            "train" => self.view.show_train = toggle(key, value)?.apply(self.view.show_train),
            "test" => self.view.show_test = toggle(key, value)?.apply(self.view.show_test),
            "output" => self.plot.output = PathBuf::from(value),
            "sweep_output" => self.plot.sweep_output = PathBuf::from(value),
            _ => return Err(Error::InvalidConfig(format!("unknown setting `{key}`"))),
        }

        Ok(())
    }

    /// The seeds the sweep regenerates the dataset with, starting at the configured seed
    #[must_use]
    pub fn sweep_seeds(&self) -> Vec<u64> {
        (0..self.fit.sweep_seeds)
            .map(|i| self.dataset.seed.wrapping_add(i))
            .collect()
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("`{value}` is not a valid value for `{key}`")))
}

fn toggle(key: &str, value: &str) -> Result<Toggle> {
    value
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("`{key}` must be on or off, got `{value}`")))
}
