//! Polynomial bases used to build the least-squares design matrix
//!
//! Every regime fits the same kind of model, a polynomial of fixed degree, but the
//! numbers the solver sees depend on which functions the polynomial is written in.
//!
//! # Provided Bases
//! - [`MonomialBasis`]: The standard monomial basis, i.e., 1, x, x², … xⁿ. Readable, but
//!   the columns of its design matrix grow like `10¹⁵` at degree 15 over `[0, 10]`.
//! - [`ChebyshevBasis`]: Chebyshev polynomials on `[-1, 1]`, with `x` mapped onto that
//!   interval first. This keeps the overfitting regime well conditioned.
//!
//! Both are generic over [`Value`] so the fitter never needs to know which one it has.
use nalgebra::MatrixViewMut;

use crate::value::Value;

pub(crate) mod monomial;
pub use monomial::MonomialBasis;

pub(crate) mod chebyshev;
pub use chebyshev::ChebyshevBasis;

/// A trait representing a polynomial basis.
///
/// Assumes a Vandermonde structure for the basis functions: row `i` of the design matrix
/// holds `φ₀(xᵢ), φ₁(xᵢ), …, φₖ(xᵢ)`.
///
/// It is not meant to be used on its own, but through [`crate::Polynomial`] or
/// [`crate::CurveFit`], which are generic over basis.
pub trait Basis<T: Value>: Sized + Clone + std::fmt::Debug + Send + Sync {
    /// Create a new basis for the given input domain
    ///
    /// Initializes any needed metadata for normalization
    fn from_range(x_range: std::ops::RangeInclusive<T>) -> Self;

    /// Returns the number of basis functions needed for a polynomial of a given degree.
    #[inline(always)]
    fn k(&self, degree: usize) -> usize {
        degree + 1
    }

    /// Returns the polynomial degree corresponding to a given number of basis functions.
    ///
    /// Returns `None` if `k` is zero.
    #[inline(always)]
    fn degree(&self, k: usize) -> Option<usize> {
        k.checked_sub(1)
    }

    /// Populates a row of a Vandermonde matrix with this basis evaluated at `x`.
    ///
    /// Columns from `start_index` to the end of `row` are written.
    /// `x` will be normalized by the caller using the `normalize_x` method.
    fn fill_matrix_row<R: nalgebra::Dim, C: nalgebra::Dim, RS: nalgebra::Dim, CS: nalgebra::Dim>(
        &self,
        start_index: usize,
        x: T,
        row: MatrixViewMut<T, R, C, RS, CS>,
    );

    /// Normalizes the input value `x` for this basis.
    fn normalize_x(&self, x: T) -> T;

    /// Evaluates the jth basis function `φⱼ(x)`.
    ///
    /// `x` will be normalized by the caller using the `normalize_x` method.
    fn solve_function(&self, j: usize, x: T) -> T;
}
