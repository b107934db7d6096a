//! The three model-complexity presets the user chooses between
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A model-complexity preset, mapped to a fixed polynomial degree.
///
/// | Regime | Degree |
/// |---|---|
/// | [`Regime::Underfitting`] | 1 |
/// | [`Regime::Balanced`] | 5 |
/// | [`Regime::Overfitting`] | 15 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Too simple to capture the data: high bias.
    Underfitting,

    /// Enough flexibility for the signal, not enough to chase the noise.
    #[default]
    Balanced,

    /// Flexible enough to follow the noise in the training points: high variance.
    Overfitting,
}
impl Regime {
    /// Every regime, in menu order.
    pub const ALL: [Regime; 3] = [Regime::Underfitting, Regime::Balanced, Regime::Overfitting];

    /// The polynomial degree fit for this regime.
    #[must_use]
    pub const fn degree(self) -> usize {
        match self {
            Regime::Underfitting => 1,
            Regime::Balanced => 5,
            Regime::Overfitting => 15,
        }
    }

    /// The label shown in the selector and the plot title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Regime::Underfitting => "Underfitting",
            Regime::Balanced => "Balanced",
            Regime::Overfitting => "Overfitting",
        }
    }

    /// Short description of what the regime demonstrates.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Regime::Underfitting => "the simplest model; high bias, low variance",
            Regime::Balanced => "follows the trend without chasing the noise",
            Regime::Overfitting => "threads the training points; low bias, high variance",
        }
    }

    /// 1-based position in [`Regime::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Regime::Underfitting => 1,
            Regime::Balanced => 2,
            Regime::Overfitting => 3,
        }
    }
}
impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (degree {})", self.label(), self.degree())
    }
}
impl FromStr for Regime {
    type Err = Error;

    /// Accepts the label (`Overfitting`), a short name (`over`), or the menu index (`3`),
    /// ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        match key.as_str() {
            "1" | "underfitting" | "underfit" | "under" => Ok(Regime::Underfitting),
            "2" | "balanced" | "balance" | "good" => Ok(Regime::Balanced),
            "3" | "overfitting" | "overfit" | "over" => Ok(Regime::Overfitting),
            _ => Err(Error::UnknownRegime(s.trim().to_string())),
        }
    }
}
