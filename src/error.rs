//! Error types for the bias-variance demo
//!
//! This module defines the common errors encountered when generating data,
//! fitting the regime models, parsing user input, and drawing frames, along
//! with a convenient `Result` alias.

/// Errors that can occur while generating, fitting or rendering.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Cannot perform curve fitting because there is no data.
    #[error("No data available for fitting")]
    NoData,

    /// The requested polynomial degree is too high for the dataset.
    ///
    /// The degree must be less than the number of training points.
    #[error("Polynomial degree `{degree}` is too high for {n} training points")]
    DegreeTooHigh {
        /// Requested degree
        degree: usize,
        /// Number of points available
        n: usize,
    },

    /// An x-value lies outside the domain a fit was built for.
    #[error("x = {0} is outside the fitted domain {1}")]
    DataRange(String, String),

    /// Failed to solve the algebraic system during fitting.
    ///
    /// Contains a static string describing the solver error.
    #[error("Failed to solve: {0}")]
    Algebra(&'static str),

    /// A numeric value could not be cast to the target type. This is usually a custom type much smaller than f64/f32
    #[error("Failed to cast value to target type")]
    CastFailed,

    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The category label does not name one of the three regimes.
    #[error("Unknown regime `{0}`; expected underfitting, balanced or overfitting")]
    UnknownRegime(String),

    /// A line typed at the prompt could not be understood.
    #[error("Unknown command `{0}`; type `help` for the list of commands")]
    UnknownCommand(String),

    /// A frame could not be drawn.
    #[error("Failed to render frame: {0}")]
    Render(String),

    /// Reading or writing a file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A configuration file is not valid JSON for [`crate::config::Config`].
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type for the bias-variance demo
pub type Result<T> = std::result::Result<T, Error>;
