//! Human-readable equations for fitted curves
//!
//! Each regime's fit is printed, and used as a legend label, as an equation like
//! `y(x) = 2.07x + 0.83`. Bases control how their own terms look through
//! [`PolynomialDisplay`]; this module assembles the terms into a full equation.
//!
//! # Helpers
//! - [`format_coefficient`]: Formats a numeric coefficient, skipping zeros.
//! - [`format_variable`]: Builds `x²`, `T₃` and friends with unicode sub/superscripts.
#![allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]

use crate::value::Value;

pub mod unicode;

/// Default precision for formatting used by the provided implementations of [`PolynomialDisplay`]
pub const DEFAULT_PRECISION: usize = 2;

/// Default range in which scientific notation is not used
#[must_use]
pub fn default_fixed_range<T: Value>() -> Option<std::ops::Range<T>> {
    const RANGE: std::ops::Range<f64> = 1e-3..1e3;
    let s = T::try_cast(RANGE.start).ok()?;
    let e = T::try_cast(RANGE.end).ok()?;
    Some(s..e)
}

/// Trait for formatting and displaying polynomial expressions.
///
/// Implementors control how individual terms are displayed,
/// while a default implementation assembles them into a full equation.
pub trait PolynomialDisplay<T: Value> {
    /// Formats a single polynomial term for display.
    ///
    /// Returning `None` indicates the term should be skipped
    /// (typically when the coefficient is zero).
    fn format_term(&self, degree: i32, coef: T) -> Option<Term>;

    /// Formats the scaling formula for the polynomial, if the basis rescales `x`.
    fn format_scaling_formula(&self) -> Option<String> {
        None
    }

    /// Writes the full polynomial expression into the provided buffer.
    ///
    /// - `coefficients[j]` is the coefficient of the jth basis function; the
    ///   highest degree is written first.
    /// - Zero coefficients are skipped.
    /// - The first written term has no leading `+`.
    ///
    /// # Errors
    /// Returns an error if writing to `buffer` fails.
    fn format_polynomial<B: std::fmt::Write>(
        &self,
        buffer: &mut B,
        coefficients: &[T],
    ) -> std::fmt::Result {
        let mut terms = coefficients
            .iter()
            .enumerate()
            .rev()
            .filter_map(|(j, &coef)| self.format_term(j as i32, coef));

        if let Some(scaling) = self.format_scaling_formula() {
            write!(buffer, "{scaling}, ")?;
        }

        write!(buffer, "y(x) = ")?;
        let Some(first) = terms.next() else {
            return write!(buffer, "0");
        };

        if first.sign == Sign::Negative {
            write!(buffer, "{}", first.sign.char())?;
        }
        write!(buffer, "{}", first.body)?;

        for term in terms {
            write!(buffer, " {} {}", term.sign.char(), term.body)?;
        }

        Ok(())
    }

    /// Convenience wrapper around [`PolynomialDisplay::format_polynomial`] returning a `String`.
    fn equation(&self, coefficients: &[T]) -> String {
        let mut buffer = String::new();
        if self.format_polynomial(&mut buffer, coefficients).is_err() {
            buffer.clear();
        }
        buffer
    }
}

/// Represents the sign of a polynomial term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Positive sign (`+` when displayed).
    Positive,

    /// Negative sign (`-` when displayed).
    Negative,
}

impl Sign {
    /// Determines the sign from a numeric coefficient.
    ///
    /// # Example
    /// ```
    /// # use biasvar::display::Sign;
    /// assert_eq!(Sign::from_coef(3.0), Sign::Positive);
    /// assert_eq!(Sign::from_coef(-2.0), Sign::Negative);
    /// ```
    pub fn from_coef<T: Value>(coef: T) -> Self {
        if coef < T::zero() {
            Self::Negative
        } else {
            Self::Positive
        }
    }

    /// Returns the character representation of the sign.
    #[must_use]
    pub fn char(&self) -> char {
        match self {
            Sign::Positive => '+',
            Sign::Negative => '-',
        }
    }
}

/// A single term of a polynomial: its sign, and its unsigned body (`"2.00x²"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// The sign of the term (positive or negative).
    pub sign: Sign,

    /// The body of the term (e.g., `"2x²"`, `"3.14"`, `"x"`).
    pub body: String,
}

impl Term {
    /// Creates a new polynomial term with the given sign and body.
    #[must_use]
    pub fn new(sign: Sign, body: String) -> Self {
        Self { sign, body }
    }
}

/// Formats a numeric coefficient for display in a polynomial term.
///
/// - Returns `None` if the coefficient is zero or effectively zero (≤ epsilon).
/// - Returns an empty string for a unit coefficient on a non-constant term (`x`, not `1.00x`).
/// - Formats as a decimal if the absolute value is between `1e-3` and `1e3`, scientific otherwise.
///
/// # Example
/// ```
/// # use biasvar::display::format_coefficient;
/// assert_eq!(format_coefficient(0.0, 1, 2), None);
/// assert_eq!(format_coefficient(2.5, 1, 2), Some("2.50".to_string()));
/// assert_eq!(format_coefficient(1e5, 1, 2), Some("1.00e5".to_string()));
/// ```
pub fn format_coefficient<T: Value>(coef: T, degree: i32, precision: usize) -> Option<String> {
    let abs = Value::abs(coef);

    if abs <= T::epsilon() {
        return None;
    }

    if Value::abs_sub(abs, T::one()) <= T::epsilon() && degree != 0 {
        return Some(String::new());
    }

    Some(unicode::float(abs, default_fixed_range(), precision))
}

/// Formats the variable part of a polynomial term.
///
/// - `exp == 0` gives an empty string.
/// - `exp == 1` gives `base` with its subscript.
/// - Otherwise the exponent is appended as a unicode superscript.
///
/// # Examples
/// ```
/// # use biasvar::display::format_variable;
/// assert_eq!(format_variable("x", None, 0), "");
/// assert_eq!(format_variable("x", None, 1), "x");
/// assert_eq!(format_variable("x", None, 2), "x²");
/// ```
#[must_use]
pub fn format_variable(base: &str, subscript: Option<&str>, exp: i32) -> String {
    let lbl = unicode::subscript(subscript.unwrap_or_default());
    match exp {
        0 => String::new(),
        1 => format!("{base}{lbl}"),
        _ => {
            let sup = unicode::superscript(&exp.to_string());
            format!("{base}{lbl}{sup}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DummyBasis;

    impl PolynomialDisplay<f64> for DummyBasis {
        fn format_term(&self, degree: i32, coef: f64) -> Option<Term> {
            let sign = Sign::from_coef(coef);
            let coef_str = format_coefficient(coef, degree, DEFAULT_PRECISION)?;
            let body = if degree == 0 {
                coef_str
            } else {
                format!("{coef_str}{}", format_variable("x", None, degree))
            };
            Some(Term::new(sign, body))
        }
    }

    #[test]
    fn test_sign_from_coef() {
        assert_eq!(Sign::from_coef(1.0), Sign::Positive);
        assert_eq!(Sign::from_coef(-1.0), Sign::Negative);
        assert_eq!(Sign::from_coef(0.0), Sign::Positive);
    }

    #[test]
    fn test_format_coefficient_unit() {
        assert_eq!(format_coefficient(1.0, 2, 2), Some(String::new()));
        assert_eq!(format_coefficient(-1.0, 0, 2), Some("1.00".to_string()));
    }

    #[test]
    fn test_format_coefficient_scientific() {
        assert_eq!(format_coefficient(1e-5, 2, 2), Some("1.00e-5".to_string()));
    }

    #[test]
    fn test_format_variable_subscript() {
        assert_eq!(format_variable("T", Some("3"), 1), "T₃");
        assert_eq!(format_variable("x", Some("1"), 2), "x₁²");
        assert_eq!(format_variable("x", None, 15), "x¹⁵");
    }

    #[test]
    fn test_format_polynomial_basic() {
        let eq = DummyBasis.equation(&[2.0, -3.0, 0.0, 4.0]);
        assert_eq!(eq, "y(x) = 4.00x³ - 3.00x + 2.00");
    }

    #[test]
    fn test_format_polynomial_unit_constant() {
        assert_eq!(DummyBasis.equation(&[1.0, 1.0]), "y(x) = x + 1.00");
        assert_eq!(DummyBasis.equation(&[-1.0, 0.0, -1.0]), "y(x) = -x² - 1.00");
    }

    #[test]
    fn test_format_polynomial_all_zero() {
        assert_eq!(DummyBasis.equation(&[0.0, 0.0, 0.0]), "y(x) = 0");
    }

    #[test]
    fn test_format_polynomial_leading_negative() {
        assert_eq!(DummyBasis.equation(&[1.0, -2.0]), "y(x) = -2.00x + 1.00");
    }
}
