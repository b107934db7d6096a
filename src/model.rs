//! Fitting the regime models and comparing their errors
//!
//! [`fit_regime`] is the heart of the demo: it fits the selected degree to the training
//! partition only, then predicts at every input of the domain so the curve can be drawn
//! through the held-out points too.
//!
//! [`sweep`] repeats that over every degree and many seeds, averaging the train and test
//! errors into the classic U-shaped [`ErrorCurve`].
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    dataset::{Dataset, DatasetConfig},
    error::{Error, Result},
    regime::Regime,
    statistics,
    ChebyshevFit, MonomialFit,
};

/// The polynomial basis the regimes are fit in.
///
/// Both describe the same family of curves; they differ in how well conditioned the
/// least-squares problem is, and in how the equation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasisKind {
    /// `1, x, x², …`
    Monomial,

    /// Chebyshev polynomials over the domain mapped to `[-1, 1]`.
    #[default]
    Chebyshev,
}
impl std::fmt::Display for BasisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BasisKind::Monomial => write!(f, "monomial"),
            BasisKind::Chebyshev => write!(f, "chebyshev"),
        }
    }
}
impl FromStr for BasisKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monomial" | "mono" => Ok(BasisKind::Monomial),
            "chebyshev" | "cheb" => Ok(BasisKind::Chebyshev),
            other => Err(Error::InvalidConfig(format!(
                "unknown basis `{other}`; expected monomial or chebyshev"
            ))),
        }
    }
}

/// A least-squares fit in one of the supported bases.
#[derive(Debug, Clone, PartialEq)]
pub enum FittedCurve {
    /// Fit in the monomial basis
    Monomial(MonomialFit<'static>),

    /// Fit in the Chebyshev basis
    Chebyshev(ChebyshevFit<'static>),
}
impl FittedCurve {
    /// Fits `degree` to `data` in the given basis, valid over all of `domain`.
    ///
    /// # Errors
    /// See [`crate::CurveFit::with_domain`].
    pub fn fit(
        data: &[(f64, f64)],
        degree: usize,
        domain: std::ops::RangeInclusive<f64>,
        basis: BasisKind,
    ) -> Result<Self> {
        let data = data.to_vec();
        Ok(match basis {
            BasisKind::Monomial => Self::Monomial(MonomialFit::with_domain(data, degree, domain)?),
            BasisKind::Chebyshev => {
                Self::Chebyshev(ChebyshevFit::with_domain(data, degree, domain)?)
            }
        })
    }

    /// Evaluates the fitted polynomial at `x`, inside or outside the fitted domain.
    pub fn y(&self, x: f64) -> f64 {
        match self {
            Self::Monomial(fit) => fit.as_polynomial().y(x),
            Self::Chebyshev(fit) => fit.as_polynomial().y(x),
        }
    }

    /// The fitted coefficients, in the curve's own basis.
    pub fn coefficients(&self) -> &[f64] {
        match self {
            Self::Monomial(fit) => fit.coefficients(),
            Self::Chebyshev(fit) => fit.coefficients(),
        }
    }

    /// The degree of the fitted polynomial.
    pub fn degree(&self) -> usize {
        match self {
            Self::Monomial(fit) => fit.degree(),
            Self::Chebyshev(fit) => fit.degree(),
        }
    }

    /// The fitted equation.
    pub fn equation(&self) -> String {
        match self {
            Self::Monomial(fit) => fit.equation(),
            Self::Chebyshev(fit) => fit.equation(),
        }
    }

    /// Sum of squared errors on the training data.
    pub fn sum_squared_error(&self) -> f64 {
        match self {
            Self::Monomial(fit) => fit.sum_squared_error(),
            Self::Chebyshev(fit) => fit.sum_squared_error(),
        }
    }

    /// Mean squared error on the training data.
    pub fn train_mean_squared_error(&self) -> f64 {
        match self {
            Self::Monomial(fit) => fit.mean_squared_error(),
            Self::Chebyshev(fit) => fit.mean_squared_error(),
        }
    }

    /// Unbiased estimate of the noise variance left in the training data.
    pub fn residual_variance(&self) -> f64 {
        match self {
            Self::Monomial(fit) => fit.residual_variance(),
            Self::Chebyshev(fit) => fit.residual_variance(),
        }
    }

    /// Mean squared error against any set of points, such as a held-out partition.
    pub fn mean_squared_error(&self, points: &[(f64, f64)]) -> f64 {
        match self {
            Self::Monomial(fit) => fit.as_polynomial().mean_squared_error(points),
            Self::Chebyshev(fit) => fit.as_polynomial().mean_squared_error(points),
        }
    }

    /// R² against any set of points.
    pub fn r_squared(&self, points: &[(f64, f64)]) -> f64 {
        match self {
            Self::Monomial(fit) => fit.r_squared(points),
            Self::Chebyshev(fit) => fit.r_squared(points),
        }
    }

    /// Evaluates the curve at `n` evenly spaced points across its domain.
    pub fn solve_linspace(&self, n: usize) -> Vec<(f64, f64)> {
        match self {
            Self::Monomial(fit) => fit.solve_linspace(n),
            Self::Chebyshev(fit) => fit.solve_linspace(n),
        }
    }
}

/// One regime's model, fit to the training partition and evaluated over the whole domain.
#[derive(Debug, Clone, PartialEq)]
pub struct RegimeFit {
    regime: Regime,
    basis: BasisKind,
    curve: FittedCurve,
    predictions: Vec<(f64, f64)>,
    train_mse: f64,
    test_mse: f64,
    train_r_squared: f64,
}
impl RegimeFit {
    /// The regime that selected the degree.
    pub fn regime(&self) -> Regime {
        self.regime
    }

    /// The basis the model was fit in.
    pub fn basis(&self) -> BasisKind {
        self.basis
    }

    /// The polynomial degree of the model.
    pub fn degree(&self) -> usize {
        self.curve.degree()
    }

    /// The fitted coefficients.
    pub fn coefficients(&self) -> &[f64] {
        self.curve.coefficients()
    }

    /// One `(x, ŷ)` per input of the dataset, in input order.
    pub fn predictions(&self) -> &[(f64, f64)] {
        &self.predictions
    }

    /// The underlying fit.
    pub fn curve(&self) -> &FittedCurve {
        &self.curve
    }

    /// Human-readable equation of the model.
    pub fn equation(&self) -> String {
        self.curve.equation()
    }

    /// Mean squared error on the training partition.
    pub fn train_mse(&self) -> f64 {
        self.train_mse
    }

    /// Mean squared error on the held-out partition.
    pub fn test_mse(&self) -> f64 {
        self.test_mse
    }

    /// R² on the training partition.
    pub fn train_r_squared(&self) -> f64 {
        self.train_r_squared
    }

    /// Sum of squared errors on the training partition.
    pub fn train_sse(&self) -> f64 {
        self.curve.sum_squared_error()
    }

    /// Estimated noise variance, from the training residuals and the model's parameter count.
    pub fn noise_variance(&self) -> f64 {
        self.curve.residual_variance()
    }

    /// `n` evenly spaced `(x, ŷ)` pairs across the domain, for drawing a smooth curve.
    pub fn dense_curve(&self, n: usize) -> Vec<(f64, f64)> {
        self.curve.solve_linspace(n)
    }

    /// One-line summary of the fit.
    pub fn summary(&self) -> String {
        format!(
            "{}: train MSE {:.3}, test MSE {:.3}, train R² {:.3}, σ̂² {:.3}",
            self.regime,
            self.train_mse,
            self.test_mse,
            self.train_r_squared,
            self.noise_variance()
        )
    }
}

/// Fits the regime's degree to the training partition, and predicts over every input.
///
/// # Errors
/// - [`Error::NoData`] if the training partition is empty.
/// - [`Error::DegreeTooHigh`] if the degree is not below the number of training points.
/// - [`Error::Algebra`] if the least-squares system cannot be solved.
///
/// # Example
/// ```rust
/// # use biasvar::{dataset::{Dataset, DatasetConfig}, model::{fit_regime, BasisKind}, regime::Regime};
/// let data = Dataset::generate(&DatasetConfig::default()).unwrap();
/// let fit = fit_regime(&data, Regime::Overfitting, BasisKind::Chebyshev).unwrap();
/// assert_eq!(fit.degree(), 15);
/// assert_eq!(fit.predictions().len(), data.len());
/// ```
pub fn fit_regime(data: &Dataset, regime: Regime, basis: BasisKind) -> Result<RegimeFit> {
    let curve = FittedCurve::fit(data.train(), regime.degree(), data.domain(), basis)?;

    let predictions: Vec<(f64, f64)> = data
        .inputs()
        .into_iter()
        .map(|x| (x, curve.y(x)))
        .collect();
    let train_mse = curve.train_mean_squared_error();
    let test_mse = curve.mean_squared_error(data.test());
    let train_r_squared = curve.r_squared(data.train());

    log::debug!(
        "{regime} in {basis} basis: train MSE {train_mse:.4}, test MSE {test_mse:.4}"
    );

    Ok(RegimeFit {
        regime,
        basis,
        curve,
        predictions,
        train_mse,
        test_mse,
        train_r_squared,
    })
}

/// Average train and test error of one degree across the sweep's seeds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DegreeError {
    /// Polynomial degree
    pub degree: usize,

    /// Mean of the training MSE over all seeds
    pub train_mse: f64,

    /// Mean of the held-out MSE over all seeds
    pub test_mse: f64,
}

/// Train and test error as a function of degree, averaged over several datasets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorCurve {
    basis: BasisKind,
    seeds: usize,
    points: Vec<DegreeError>,
}
impl ErrorCurve {
    /// One entry per degree, ascending.
    pub fn points(&self) -> &[DegreeError] {
        &self.points
    }

    /// Number of datasets each entry is averaged over.
    pub fn seeds(&self) -> usize {
        self.seeds
    }

    /// The basis every fit in the sweep used.
    pub fn basis(&self) -> BasisKind {
        self.basis
    }

    /// `(degree, train MSE)` pairs, for plotting.
    #[allow(clippy::cast_precision_loss)]
    pub fn train_curve(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.degree as f64, p.train_mse)).collect()
    }

    /// `(degree, test MSE)` pairs, for plotting.
    #[allow(clippy::cast_precision_loss)]
    pub fn test_curve(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.degree as f64, p.test_mse)).collect()
    }

    /// The degree with the lowest average held-out error.
    pub fn best_degree(&self) -> Option<usize> {
        self.points
            .iter()
            .min_by(|a, b| a.test_mse.total_cmp(&b.test_mse))
            .map(|p| p.degree)
    }

    /// The entry for `degree`, if it was swept.
    pub fn get(&self, degree: usize) -> Option<&DegreeError> {
        self.points.iter().find(|p| p.degree == degree)
    }
}
impl std::fmt::Display for ErrorCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "degree | train MSE  | test MSE   ({} seeds, {} basis)",
            self.seeds, self.basis
        )?;
        let best = self.best_degree();
        for p in &self.points {
            let marker = if Some(p.degree) == best { "  <- best" } else { "" };
            writeln!(f, "{:>6} | {:>10.4} | {:>10.4}{marker}", p.degree, p.train_mse, p.test_mse)?;
        }
        Ok(())
    }
}

/// Sweeps degrees `1..=max_degree`, regenerating the dataset for every seed and averaging
/// the train and held-out MSE per degree.
///
/// Only the seed of `config` changes between datasets.
///
/// # Errors
/// - [`Error::InvalidConfig`] if `seeds` is empty, `max_degree` is zero, or `config` is invalid.
/// - Any fitting error, e.g. [`Error::DegreeTooHigh`] if `max_degree` leaves too few training points.
pub fn sweep(
    config: &DatasetConfig,
    max_degree: usize,
    seeds: &[u64],
    basis: BasisKind,
) -> Result<ErrorCurve> {
    if seeds.is_empty() || max_degree == 0 {
        return Err(Error::InvalidConfig(
            "a sweep needs at least one seed and one degree".to_string(),
        ));
    }

    let datasets = seeds
        .iter()
        .map(|&seed| Dataset::generate(&config.with_seed(seed)))
        .collect::<Result<Vec<_>>>()?;

    let mut points = Vec::with_capacity(max_degree);
    for degree in 1..=max_degree {
        let mut train = Vec::with_capacity(datasets.len());
        let mut test = Vec::with_capacity(datasets.len());
        for data in &datasets {
            let curve = FittedCurve::fit(data.train(), degree, data.domain(), basis)?;
            train.push(curve.mean_squared_error(data.train()));
            test.push(curve.mean_squared_error(data.test()));
        }

        points.push(DegreeError {
            degree,
            train_mse: statistics::mean(train.into_iter()),
            test_mse: statistics::mean(test.into_iter()),
        });
    }

    log::debug!("swept degrees 1..={max_degree} over {} seeds", seeds.len());
    Ok(ErrorCurve {
        basis,
        seeds: seeds.len(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_close;

    fn default_data() -> Dataset {
        Dataset::generate(&DatasetConfig::default()).unwrap()
    }

    #[test]
    fn test_fit_regime_degrees() {
        let data = default_data();
        for regime in Regime::ALL {
            let fit = fit_regime(&data, regime, BasisKind::Chebyshev).unwrap();
            assert_eq!(fit.degree(), regime.degree());
            assert_eq!(fit.coefficients().len(), regime.degree() + 1);
            assert_eq!(fit.regime(), regime);
        }
    }

    #[test]
    fn test_predictions_cover_domain() {
        let data = default_data();
        let fit = fit_regime(&data, Regime::Balanced, BasisKind::Chebyshev).unwrap();
        assert_eq!(fit.predictions().len(), data.len());
        for ((px, _), x) in fit.predictions().iter().zip(data.inputs()) {
            assert_eq!(*px, x);
        }
    }

    #[test]
    fn test_underfit_recovers_line() {
        let data = default_data();
        let fit = fit_regime(&data, Regime::Underfitting, BasisKind::Monomial).unwrap();
        let [intercept, slope] = fit.coefficients() else {
            panic!("expected 2 coefficients");
        };
        assert!((slope - 2.0).abs() < 0.6, "slope = {slope}");
        assert!((intercept - 1.0).abs() < 3.0, "intercept = {intercept}");
        assert!(fit.equation().starts_with("y(x) = "));
    }

    #[test]
    fn test_training_error_falls_with_degree() {
        let data = default_data();
        let under = fit_regime(&data, Regime::Underfitting, BasisKind::Chebyshev).unwrap();
        let balanced = fit_regime(&data, Regime::Balanced, BasisKind::Chebyshev).unwrap();
        let over = fit_regime(&data, Regime::Overfitting, BasisKind::Chebyshev).unwrap();

        // Nested models: more freedom never increases the least-squares residual
        assert!(under.train_sse() > over.train_sse());
        assert!(under.train_sse() >= balanced.train_sse() - 1e-9);
        assert!(balanced.train_sse() >= over.train_sse() - 1e-9);
        assert!(over.train_r_squared() > under.train_r_squared());
    }

    #[test]
    fn test_errors_measured_on_their_partition() {
        use crate::value::CoordExt;

        let data = default_data();
        let fit = fit_regime(&data, Regime::Balanced, BasisKind::Chebyshev).unwrap();

        let direct = |points: &[(f64, f64)]| {
            let y_fit = points.x_iter().map(|x| fit.curve().y(x));
            statistics::mean_squared_error(points.y_iter(), y_fit)
        };
        assert_close!(fit.train_mse(), direct(data.train()), tol = 1e-9);
        assert_close!(fit.test_mse(), direct(data.test()), tol = 1e-9);

        let n = data.train().len() as f64;
        let k = (fit.degree() + 1) as f64;
        assert_close!(fit.noise_variance(), fit.train_sse() / (n - k), tol = 1e-9);
        assert!(fit.summary().contains("σ̂²"));
    }

    #[test]
    fn test_bases_agree_at_moderate_degree() {
        let data = default_data();
        let mono = fit_regime(&data, Regime::Balanced, BasisKind::Monomial).unwrap();
        let cheb = fit_regime(&data, Regime::Balanced, BasisKind::Chebyshev).unwrap();
        for (m, c) in mono.predictions().iter().zip(cheb.predictions()) {
            assert_close!(m.1, c.1, tol = 1e-6);
        }
        assert_close!(mono.test_mse(), cheb.test_mse(), tol = 1e-6);
    }

    #[test]
    fn test_degree_too_high() {
        let config = DatasetConfig {
            samples: 10,
            ..DatasetConfig::default()
        };
        let data = Dataset::generate(&config).unwrap();
        assert!(matches!(
            fit_regime(&data, Regime::Overfitting, BasisKind::Chebyshev),
            Err(Error::DegreeTooHigh { degree: 15, n: 8 })
        ));
    }

    #[test]
    fn test_sweep_shape() {
        let seeds: Vec<u64> = (0..5).collect();
        let curve = sweep(&DatasetConfig::default(), 8, &seeds, BasisKind::Chebyshev).unwrap();
        assert_eq!(curve.points().len(), 8);
        assert_eq!(curve.seeds(), 5);
        assert_eq!(curve.train_curve().len(), 8);
        assert!(curve.best_degree().is_some());

        // Averaged training error is non-increasing in degree
        for w in curve.points().windows(2) {
            assert!(w[1].train_mse <= w[0].train_mse + 1e-9);
        }

        let table = curve.to_string();
        assert!(table.contains("<- best"));
        assert_eq!(table.lines().count(), 9);
    }

    #[test]
    fn test_sweep_rejects_empty() {
        assert!(matches!(
            sweep(&DatasetConfig::default(), 5, &[], BasisKind::Monomial),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_basis_kind_parse() {
        assert_eq!("Chebyshev".parse::<BasisKind>().unwrap(), BasisKind::Chebyshev);
        assert_eq!("mono".parse::<BasisKind>().unwrap(), BasisKind::Monomial);
        assert!("legendre".parse::<BasisKind>().is_err());
    }
}
