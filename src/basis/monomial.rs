use crate::{
    basis::Basis,
    display::{self, Sign, DEFAULT_PRECISION},
    value::Value,
};
use nalgebra::MatrixViewMut;

/// Standard (non-normalized) monomial basis for polynomials.
///
/// The monomial basis represents polynomials using the familiar powers of `x`:
///
/// ```text
/// 1, x, x², …, xⁿ
/// ```
///
/// This is the basis people picture when they hear "polynomial", and its equation is
/// the one printed in textbooks. It is **not normalized**, so high degrees over a wide
/// domain lose precision quickly.
///
/// # When to use
/// - To show the textbook form `y(x) = a + bx + cx²…` of a low-degree fit.
/// - For comparison against [`crate::basis::ChebyshevBasis`] in the overfitting regime.
#[derive(Debug, Clone, PartialEq)]
pub struct MonomialBasis<T: Value = f64>(std::marker::PhantomData<T>);
impl<T: Value> MonomialBasis<T> {
    /// Creates a new monomial basis.
    #[must_use]
    pub const fn new() -> Self {
        Self(std::marker::PhantomData)
    }
}
impl<T: Value> Default for MonomialBasis<T> {
    fn default() -> Self {
        Self::new()
    }
}
impl<T: Value> Basis<T> for MonomialBasis<T> {
    fn from_range(_x_range: std::ops::RangeInclusive<T>) -> Self {
        Self::new()
    }

    #[inline(always)]
    fn normalize_x(&self, x: T) -> T {
        x
    }

    #[inline(always)]
    fn fill_matrix_row<R: nalgebra::Dim, C: nalgebra::Dim, RS: nalgebra::Dim, CS: nalgebra::Dim>(
        &self,
        start_index: usize,
        x: T,
        mut row: MatrixViewMut<T, R, C, RS, CS>,
    ) {
        // Each power is the previous one times x
        for j in start_index..row.ncols() {
            row[j] = match j {
                0 => T::one(),
                _ if j == start_index => self.solve_function(j, x),
                _ => row[j - 1] * x,
            };
        }
    }

    #[inline(always)]
    fn solve_function(&self, j: usize, x: T) -> T {
        match j {
            0 => T::one(),
            1 => x,
            _ => Value::powi(x, i32::try_from(j).unwrap_or(i32::MAX)),
        }
    }
}

impl<T: Value> display::PolynomialDisplay<T> for MonomialBasis<T> {
    fn format_term(&self, degree: i32, coef: T) -> Option<display::Term> {
        let sign = Sign::from_coef(coef);

        let base = display::format_variable("x", None, degree);
        let coef = display::format_coefficient(coef, degree, DEFAULT_PRECISION)?;

        let body = format!("{coef}{base}");
        Some(display::Term::new(sign, body))
    }
}
