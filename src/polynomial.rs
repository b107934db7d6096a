use crate::{
    basis::{Basis, MonomialBasis},
    display::PolynomialDisplay,
    error::{Error, Result},
    statistics,
    value::{CoordExt, Linspace, Value},
};

/// Represents a polynomial function in a given basis.
///
/// Unlike [`crate::CurveFit`], this struct is **not tied to any dataset**; it can be
/// evaluated at any `x`. A fitted regime hands one of these to the renderer to draw the
/// prediction curve across the whole domain.
///
/// # Type Parameters
/// - `B`: The polynomial basis (e.g., [`crate::basis::MonomialBasis`], [`crate::basis::ChebyshevBasis`]).
/// - `T`: Numeric type for the coefficients, default is `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial<B, T: Value = f64>
where
    B: Basis<T>,
    B: PolynomialDisplay<T>,
{
    degree: usize,
    basis: B,
    coefficients: Vec<T>,
}

/// A polynomial of the form `y = a_n * x^n + ... + a_1 * x + a_0`.
pub type MonomialPolynomial<T = f64> = Polynomial<MonomialBasis<T>, T>;

impl<B, T: Value> Polynomial<B, T>
where
    B: Basis<T>,
    B: PolynomialDisplay<T>,
{
    /// Creates a new polynomial from a basis and coefficients, inferring the degree.
    ///
    /// # Errors
    /// Returns [`Error::NoData`] if there are no coefficients.
    pub fn from_basis(basis: B, coefficients: impl Into<Vec<T>>) -> Result<Self> {
        let coefficients = coefficients.into();
        let degree = basis.degree(coefficients.len()).ok_or(Error::NoData)?;
        Ok(Self {
            degree,
            basis,
            coefficients,
        })
    }

    /// Returns a reference to the polynomial's basis.
    pub fn basis(&self) -> &B {
        &self.basis
    }

    /// Returns the polynomial's coefficients.
    ///
    /// The coefficient at index `j` multiplies the jth basis function, so for the
    /// monomial `y(x) = 2x² - 3x + 1` the coefficients are `[1.0, -3.0, 2.0]`.
    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    /// Returns the degree of the polynomial.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Evaluates the polynomial at a given x-value.
    ///
    /// ```math
    /// y(x) = Σ (c_j * B_j(x))
    /// ```
    ///
    /// # Example
    /// ```
    /// # use biasvar::{basis::MonomialBasis, Polynomial};
    /// let poly = Polynomial::from_basis(MonomialBasis::new(), [1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(poly.y(2.0), 17.0);
    /// ```
    pub fn y(&self, x: T) -> T {
        let x = self.basis.normalize_x(x);
        self.coefficients
            .iter()
            .enumerate()
            .fold(T::zero(), |y, (j, &coef)| {
                y + coef * self.basis.solve_function(j, x)
            })
    }

    /// Evaluates the polynomial at multiple x-values, returning `(x, y)` pairs.
    pub fn solve(&self, x: impl IntoIterator<Item = T>) -> Vec<(T, T)> {
        x.into_iter().map(|x| (x, self.y(x))).collect()
    }

    /// Evaluates the polynomial at `n` evenly spaced points across `range`, endpoints included.
    pub fn solve_linspace(&self, range: std::ops::RangeInclusive<T>, n: usize) -> Vec<(T, T)> {
        self.solve(Linspace::new(range, n))
    }

    /// Calculates the R-squared value for the polynomial compared to the provided data.
    ///
    /// See [`statistics::r_squared`] for more details.
    pub fn r_squared(&self, data: &[(T, T)]) -> T {
        let y_fit = data.x_iter().map(|x| self.y(x));
        statistics::r_squared(data.y_iter(), y_fit)
    }

    /// Calculates the mean squared error of the polynomial against the provided data.
    ///
    /// See [`statistics::mean_squared_error`] for more details.
    pub fn mean_squared_error(&self, data: &[(T, T)]) -> T {
        let y_fit = data.x_iter().map(|x| self.y(x));
        statistics::mean_squared_error(data.y_iter(), y_fit)
    }

    /// Returns a human-readable string of the polynomial equation.
    ///
    /// # Example
    /// ```
    /// # use biasvar::{basis::MonomialBasis, Polynomial};
    /// let poly = Polynomial::from_basis(MonomialBasis::new(), [1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(poly.equation(), "y(x) = 3.00x² + 2.00x + 1.00");
    /// ```
    #[must_use]
    pub fn equation(&self) -> String {
        self.basis.equation(&self.coefficients)
    }
}

impl<B, T: Value> std::fmt::Display for Polynomial<B, T>
where
    B: Basis<T>,
    B: PolynomialDisplay<T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.basis.format_polynomial(f, &self.coefficients)
    }
}
