//! # biasvar
//! ## Watch a polynomial go from too stiff to too wiggly
//!
//! A small teaching tool for the bias-variance trade-off. It generates one noisy linear
//! dataset, holds a fifth of it out, and fits polynomials of three fixed degrees to the rest:
//! - **Underfitting**, degree 1: the simplest model. It cannot chase the noise, and cannot bend either.
//! - **Balanced**, degree 5: follows the trend without reaching for individual points.
//! - **Overfitting**, degree 15: threads the training points and wiggles between them.
//!
//! Each model predicts over the whole input domain and is drawn over the data, with the
//! training and held-out points highlighted on request. The `biasvar` binary wraps this in a
//! prompt where every selection or toggle re-fits and redraws the chart.
//!
//! ```rust
//! use biasvar::{dataset::{Dataset, DatasetConfig}, model::{fit_regime, BasisKind}, regime::Regime};
//!
//! let data = Dataset::generate(&DatasetConfig::default()).unwrap();
//! let stiff = fit_regime(&data, Regime::Underfitting, BasisKind::Chebyshev).unwrap();
//! let wiggly = fit_regime(&data, Regime::Overfitting, BasisKind::Chebyshev).unwrap();
//!
//! // More freedom always fits the training points at least as well
//! assert!(stiff.train_sse() > wiggly.train_sse());
//! ```
//!
//! # Core Concepts
//! - A [`dataset::Dataset`] is generated once from a seed, and split into training and test partitions.
//! - A [`regime::Regime`] is one of the three presets, each mapped to a polynomial degree.
//! - A [`model::RegimeFit`] is a least-squares fit to the training partition, with its
//!   predictions over every input and its train/test error.
//! - A [`basis::Basis`] is how the polynomial is represented:
//!     - [`MonomialFit`] is the plain `y = Ax² + Bx + C`.
//!         - It is poorly conditioned at degree 15 over `[0, 10]`.
//!     - [`ChebyshevFit`] maps the domain to `[-1, 1]` first, and is the default.
//! - [`plotting::render`] draws a fit through a [`plotting::PlotBackend`].
//! - [`session::Session`] binds the selector and toggles to a draw callback.
//!
//! # Implementation Details
//!
//! The least-squares problems are solved with an SVD from `nalgebra`. Noise comes from
//! `rand`/`rand_distr` with a fixed seed, so every run with the same configuration produces
//! the same data, split and coefficients.
//!
//! # Testing utilities
//!
//! [`assert_close!`], [`assert_all_close!`] and [`assert_r_squared!`] are exported for tests. See [`test`].
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::needless_range_loop)] // The worst clippy lint
#![allow(clippy::cast_precision_loss)] // Degrees and sample counts are small
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod test;

pub mod basis;
pub mod config;
pub mod dataset;
pub mod display;
pub mod error;
pub mod model;
pub mod plotting;
pub mod regime;
pub mod session;
pub mod statistics;
pub mod transforms;
pub mod value;

mod fit;
mod polynomial;

pub use fit::*;
pub use polynomial::{MonomialPolynomial, Polynomial};

pub use nalgebra;
