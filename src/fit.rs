use std::{borrow::Cow, ops::RangeInclusive};

use nalgebra::{DMatrix, DVector, SVD};

use crate::{
    basis::Basis,
    display::PolynomialDisplay,
    error::{Error, Result},
    statistics,
    value::{CoordExt, Value},
    Polynomial,
};

/// Normalized Chebyshev polynomial curve
///
/// Uses the Chebyshev polynomials, which are orthogonal polynomials defined on the interval \[-1, 1\].
/// The overfitting regime relies on it to keep a degree-15 design matrix well conditioned.
pub type ChebyshevFit<'data, T = f64> = CurveFit<'data, crate::basis::ChebyshevBasis<T>, T>;

/// Non-normalized monomial polynomial curve
///
/// Uses the standard monomial basis `1, x, x², …`, so the coefficients read like a textbook equation.
pub type MonomialFit<'data, T = f64> = CurveFit<'data, crate::basis::MonomialBasis<T>, T>;

/// Condition number past which a fit is reported as ill-conditioned
const ILL_CONDITIONED: f64 = 1e12;

/// A least-squares polynomial fit to a set of points.
///
/// The fit owns (or borrows) the points it was trained on, and remembers the domain it
/// is valid over. That domain is the x-range of the training data for [`CurveFit::new`],
/// or any wider range given to [`CurveFit::with_domain`]; evaluating outside it is an error.
///
/// # Example
/// ```
/// # use biasvar::MonomialFit;
/// let data = &[(0.0, 1.0), (1.0, 3.0), (2.0, 7.0)];
/// let fit = MonomialFit::<f64>::new(data, 2).unwrap();
/// println!("Coefficients: {:?}", fit.coefficients());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CurveFit<'data, B, T: Value = f64>
where
    B: Basis<T>,
    B: PolynomialDisplay<T>,
{
    data: Cow<'data, [(T, T)]>,
    x_range: RangeInclusive<T>,
    function: Polynomial<B, T>,
    k: T,
}
impl<'data, T: Value, B> CurveFit<'data, B, T>
where
    B: Basis<T>,
    B: PolynomialDisplay<T>,
{
    /// Turns a dataset into a basis matrix and y-values vector.
    fn create_matrix(data: &[(T, T)], basis: &B, k: usize) -> (DMatrix<T>, DVector<T>) {
        let mut bigx = DMatrix::zeros(data.len(), k);
        let b = DVector::from_iterator(data.len(), data.iter().map(|&(_, y)| y));

        for (row, (x, _)) in bigx.row_iter_mut().zip(data.iter()) {
            let x = basis.normalize_x(*x);
            basis.fill_matrix_row(0, x, row);
        }

        (bigx, b)
    }

    /// Solves the linear system in the least-squares sense using SVD.
    fn solve_matrix(matrix: DMatrix<T>, b: &DVector<T>) -> Result<Vec<T>> {
        let size = matrix.shape();

        let decomp = SVD::new_unordered(matrix, true, true);

        // ~= machine_epsilon * max(size) * max_singular
        let machine_epsilon = T::epsilon();
        let max_size = size.0.max(size.1);
        let sigma_max = decomp.singular_values.max();
        let sigma_min = decomp.singular_values.min();
        let epsilon = machine_epsilon * T::try_cast(max_size)? * sigma_max;

        if sigma_min <= T::zero() || sigma_max / sigma_min > T::try_cast(ILL_CONDITIONED)? {
            log::warn!(
                "ill-conditioned design matrix ({}x{}): singular values span {sigma_min:e}..{sigma_max:e}",
                size.0,
                size.1
            );
        }

        let big_x = decomp.solve(b, epsilon).map_err(Error::Algebra)?;
        let coefficients: Vec<_> = big_x.data.into();

        if coefficients.iter().any(|c| c.is_nan()) {
            return Err(Error::Algebra("NaN in coefficients"));
        }

        Ok(coefficients)
    }

    /// Creates a new polynomial curve fit for the given data and degree.
    ///
    /// The fit is valid over the x-range of `data`.
    ///
    /// # Errors
    /// - `Error::NoData`: `data` is empty.
    /// - `Error::DegreeTooHigh`: `degree >= data.len()`.
    /// - `Error::Algebra`: the linear system could not be solved.
    /// - `Error::CastFailed`: a numeric value could not be cast to the target type.
    ///
    /// # Example
    /// ```
    /// # use biasvar::ChebyshevFit;
    /// let data = &[(0.0, 1.0), (1.0, 3.0), (2.0, 7.0)];
    /// let fit = ChebyshevFit::<f64>::new(data, 2).unwrap();
    /// assert!((fit.y(1.0).unwrap() - 3.0).abs() < 1e-12);
    /// ```
    pub fn new(data: impl Into<Cow<'data, [(T, T)]>>, degree: usize) -> Result<Self> {
        let data: Cow<_> = data.into();
        let x_range = data.x_range().ok_or(Error::NoData)?;
        Self::with_domain(data, degree, x_range)
    }

    /// Creates a new polynomial curve fit that is valid over `domain` instead of only the
    /// x-range of `data`.
    ///
    /// The basis is built from `domain`, so a fit to a training subset can be evaluated
    /// at every input of the full dataset. `domain` is widened if any training point
    /// falls outside it.
    ///
    /// # Errors
    /// Same as [`CurveFit::new`].
    pub fn with_domain(
        data: impl Into<Cow<'data, [(T, T)]>>,
        degree: usize,
        domain: RangeInclusive<T>,
    ) -> Result<Self> {
        let data: Cow<_> = data.into();

        if data.is_empty() {
            return Err(Error::NoData);
        } else if degree >= data.len() {
            return Err(Error::DegreeTooHigh {
                degree,
                n: data.len(),
            });
        }

        let x_range = match data.x_range() {
            Some(r) => {
                let start = nalgebra::RealField::min(*domain.start(), *r.start());
                let end = nalgebra::RealField::max(*domain.end(), *r.end());
                start..=end
            }
            None => domain,
        };

        let basis = B::from_range(x_range.clone());
        let k = basis.k(degree);

        let (m, b) = Self::create_matrix(&data, &basis, k);
        let coefs = Self::solve_matrix(m, &b)?;
        log::debug!(
            "fitted degree {degree} over {} points ({k} coefficients)",
            data.len()
        );

        let k = T::try_cast(coefs.len())?;
        let function = Polynomial::from_basis(basis, coefs)?;
        Ok(Self {
            data,
            x_range,
            function,
            k,
        })
    }

    /// Returns the basis the fit is expressed in.
    pub fn basis(&self) -> &B {
        self.function.basis()
    }

    /// Unbiased estimate of the noise variance remaining after the fit.
    ///
    /// See [`statistics::residual_variance`].
    pub fn residual_variance(&self) -> T {
        let y = self.data.y_iter();
        let y_fit = self.solution().into_iter().map(|(_, y)| y);
        statistics::residual_variance(y, y_fit, self.k)
    }

    /// Computes the mean squared error (MSE) of this fit against its source data.
    ///
    /// See [`statistics::mean_squared_error`].
    pub fn mean_squared_error(&self) -> T {
        let y = self.data.y_iter();
        let y_fit = self.solution().into_iter().map(|(_, y)| y);
        statistics::mean_squared_error(y, y_fit)
    }

    /// Computes the sum of squared errors of this fit against its source data.
    pub fn sum_squared_error(&self) -> T {
        let y = self.data.y_iter();
        let y_fit = self.solution().into_iter().map(|(_, y)| y);
        statistics::sum_squared_error(y, y_fit)
    }

    /// Calculates the R-squared value for the model compared to provided data.
    ///
    /// `data` does not have to be the training data; R² on held-out points can be negative.
    ///
    /// See [`statistics::r_squared`] for more details.
    ///
    /// # Example
    /// ```
    /// # use biasvar::ChebyshevFit;
    /// let data = &[(0.0, 1.0), (1.0, 3.0), (2.0, 7.0)];
    /// let fit = ChebyshevFit::<f64>::new(data, 2).unwrap();
    /// let r2 = fit.r_squared(data);
    /// assert!(r2 > 0.999);
    /// ```
    pub fn r_squared(&self, data: &[(T, T)]) -> T {
        self.function.r_squared(data)
    }

    /// Returns the degree of the polynomial.
    pub fn degree(&self) -> usize {
        self.function.degree()
    }

    /// Returns the fitted coefficients; index `j` multiplies the jth basis function.
    pub fn coefficients(&self) -> &[T] {
        self.function.coefficients()
    }

    /// Returns the data points used for fitting.
    pub fn data(&self) -> &[(T, T)] {
        &self.data
    }

    /// Returns the inclusive range of x-values the fit is valid over.
    pub fn x_range(&self) -> RangeInclusive<T> {
        self.x_range.clone()
    }

    /// Evaluates the polynomial at a given x-value.
    ///
    /// # Errors
    /// Returns [`Error::DataRange`] if `x` is outside the fitted domain.
    /// Use [`CurveFit::as_polynomial`] to evaluate anywhere.
    pub fn y(&self, x: T) -> Result<T> {
        if !self.x_range.contains(&x) {
            return Err(Error::DataRange(
                format!("{x}"),
                format!("{}..={}", self.x_range.start(), self.x_range.end()),
            ));
        }

        Ok(self.function.y(x))
    }

    /// Returns the fitted y-values at the x-values of the source data.
    pub fn solution(&self) -> Vec<(T, T)> {
        self.function.solve(self.data.x_iter())
    }

    /// Evaluates the curve at multiple x-values.
    ///
    /// # Errors
    /// Returns [`Error::DataRange`] if any `x` is outside the fitted domain.
    pub fn solve(&self, x: impl IntoIterator<Item = T>) -> Result<Vec<(T, T)>> {
        x.into_iter().map(|x| Ok((x, self.y(x)?))).collect()
    }

    /// Evaluates the curve at `n` evenly spaced points across its whole domain.
    pub fn solve_linspace(&self, n: usize) -> Vec<(T, T)> {
        self.function.solve_linspace(self.x_range(), n)
    }

    /// Returns the underlying polynomial, which can be evaluated anywhere.
    pub fn as_polynomial(&self) -> &Polynomial<B, T> {
        &self.function
    }

    /// Returns a human-readable string of the fitted equation.
    #[must_use]
    pub fn equation(&self) -> String {
        self.function.equation()
    }
}

impl<T: Value, B> std::fmt::Display for CurveFit<'_, B, T>
where
    B: Basis<T>,
    B: PolynomialDisplay<T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.function)
    }
}
