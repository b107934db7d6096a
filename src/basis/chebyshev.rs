use nalgebra::MatrixViewMut;

use crate::{
    basis::Basis,
    display::{self, Sign, DEFAULT_PRECISION},
    statistics::DomainNormalizer,
    value::Value,
};

/// Normalized Chebyshev basis for polynomial curves.
///
/// This basis uses the Chebyshev polynomials of the first kind, which form an
/// orthogonal family on the interval [-1, 1]:
///
/// ```text
/// T₀(x) = 1, T₁(x) = x, Tₙ(x) = 2x·Tₙ₋₁(x) - Tₙ₋₂(x)
/// ```
///
/// Inputs are normalized so that the domain [`x_min`, `x_max`] maps onto [-1, 1]. Every
/// column of the design matrix then stays within [-1, 1] on the domain, which keeps a
/// degree-15 fit solvable without losing most of the available precision.
///
/// Values outside the domain are extrapolated, not clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct ChebyshevBasis<T: Value = f64> {
    normalizer: DomainNormalizer<T>,
}
impl<T: Value> ChebyshevBasis<T> {
    /// Creates a new Chebyshev basis that normalizes inputs from the given range to [-1, 1].
    pub fn new(x_min: T, x_max: T) -> Self {
        let normalizer = DomainNormalizer::new((x_min, x_max), (-T::one(), T::one()));
        Self { normalizer }
    }

    /// The mapping from the data domain onto [-1, 1].
    pub fn normalizer(&self) -> &DomainNormalizer<T> {
        &self.normalizer
    }
}
impl<T: Value> Basis<T> for ChebyshevBasis<T> {
    fn from_range(x_range: std::ops::RangeInclusive<T>) -> Self {
        let normalizer = DomainNormalizer::from_range(x_range, (-T::one(), T::one()));
        Self { normalizer }
    }

    #[inline(always)]
    fn fill_matrix_row<R: nalgebra::Dim, C: nalgebra::Dim, RS: nalgebra::Dim, CS: nalgebra::Dim>(
        &self,
        start_index: usize,
        x: T,
        mut row: MatrixViewMut<'_, T, R, C, RS, CS>,
    ) {
        for j in start_index..row.ncols() {
            row[j] = match j {
                0 => T::one(),
                1 => x,
                _ if j < start_index + 2 => self.solve_function(j, x),
                _ => T::two() * x * row[j - 1] - row[j - 2],
            }
        }
    }

    #[inline(always)]
    fn normalize_x(&self, x: T) -> T {
        self.normalizer.normalize(x)
    }

    #[inline(always)]
    fn solve_function(&self, j: usize, x: T) -> T {
        match j {
            0 => T::one(),
            1 => x,
            _ => {
                let mut t0 = T::one();
                let mut t1 = x;
                for _ in 2..=j {
                    let t = T::two() * x * t1 - t0;
                    t0 = t1;
                    t1 = t;
                }
                t1
            }
        }
    }
}

impl<T: Value> display::PolynomialDisplay<T> for ChebyshevBasis<T> {
    fn format_term(&self, degree: i32, coef: T) -> Option<display::Term> {
        let sign = Sign::from_coef(coef);

        let x = format!("x{}", display::unicode::subscript("s"));
        let func = if degree > 0 {
            format!("{}({x})", display::format_variable("T", Some(&degree.to_string()), 1))
        } else {
            String::new()
        };
        let coef = display::format_coefficient(coef, degree, DEFAULT_PRECISION)?;

        let glue = if coef.is_empty() || func.is_empty() {
            ""
        } else {
            "·"
        };

        let body = format!("{coef}{glue}{func}");
        Some(display::Term::new(sign, body))
    }

    fn format_scaling_formula(&self) -> Option<String> {
        let x = format!("x{}", display::unicode::subscript("s"));
        Some(format!("{x} = {}", self.normalizer))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{assert_close, basis::tests::assert_basis_row, display::PolynomialDisplay};

    #[test]
    fn test_chebyshev_rows() {
        let basis = ChebyshevBasis::<f64>::from_range(0.0..=10.0);

        // Domain endpoints and midpoint land on -1, 1 and 0
        assert_basis_row(&basis, 0.0, &[1.0, -1.0, 1.0, -1.0]);
        assert_basis_row(&basis, 10.0, &[1.0, 1.0, 1.0, 1.0]);
        assert_basis_row(&basis, 5.0, &[1.0, 0.0, -1.0, 0.0]);

        let x = basis.normalize_x(2.5);
        assert_close!(x, -0.5);
        assert_basis_row(&basis, 2.5, &[1.0, x, 2.0 * x * x - 1.0, 4.0 * x * x * x - 3.0 * x]);
    }

    #[test]
    fn test_chebyshev_stays_bounded() {
        let basis = ChebyshevBasis::<f64>::new(0.0, 10.0);
        for i in 0..=100 {
            let x = basis.normalize_x(f64::from(i) / 10.0);
            for j in 0..=15 {
                assert!(basis.solve_function(j, x).abs() <= 1.0 + 1e-9);
            }
        }
    }

    #[test]
    fn test_chebyshev_extrapolates() {
        let basis = ChebyshevBasis::<f64>::new(0.0, 10.0);
        assert_close!(basis.normalize_x(12.5), 1.5);
        assert_close!(basis.normalize_x(-2.5), -1.5);
    }

    #[test]
    fn test_chebyshev_equation() {
        let basis = ChebyshevBasis::<f64>::new(0.0, 10.0);
        let eq = basis.equation(&[1.0, 0.0, 0.0, -2.5]);
        assert_eq!(eq, "xₛ = T[ 0..10 -> -1..1 ], y(x) = -2.50·T₃(xₛ) + 1.00");

        let eq = basis.equation(&[0.0, 1.0]);
        assert!(eq.ends_with("y(x) = T₁(xₛ)"), "{eq}");
    }
}
