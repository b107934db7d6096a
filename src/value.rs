//! Numeric types and iteration utilities for polynomial curves.
//!
//! This module defines the [`Value`] trait, which abstracts the numeric
//! types that can be used in polynomial fitting and evaluation, ensuring
//! compatibility with nalgebra, floating-point operations, and formatting.
//!
//! # Traits
//!
//! - [`Value`]: Extends `Float`, `Scalar`, and `ComplexField` to provide:
//!   - A canonical `two()` constant.
//!   - `try_cast` for safe type conversion with error handling.
//!   - `powi` for integer exponentiation.
//! - [`CoordExt`]: Accessors for the `x` and `y` channels of a set of points.
//!
//! # Iterators
//!
//! - [`Linspace`]: `n` evenly spaced values over an inclusive range, endpoints included.
//!
//! # Example
//!
//! ```rust
//! use biasvar::value::{Linspace, Value};
//!
//! // 11 values from 0.0 to 1.0
//! let xs: Vec<f64> = Linspace::new(0.0..=1.0, 11).collect();
//! assert_eq!(xs.len(), 11);
//!
//! let two = f64::two();
//! assert_eq!(Value::powi(two, 3), 8.0);
//! ```
use std::ops::{Range, RangeInclusive};

use crate::error::Error;

/// Numeric type for curves
pub trait Value:
    nalgebra::Scalar
    + nalgebra::ComplexField<RealField = Self>
    + nalgebra::RealField
    + num_traits::float::FloatCore
    + std::fmt::LowerExp
{
    /// Returns the value 2.0
    #[must_use]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Tries to cast a value to the target type
    ///
    /// # Errors
    /// Returns an error if the cast fails
    fn try_cast<U: num_traits::NumCast>(n: U) -> Result<Self, Error> {
        num_traits::cast(n).ok_or(Error::CastFailed)
    }

    /// Raises the value to the power of an integer
    #[must_use]
    fn powi(self, n: i32) -> Self {
        nalgebra::ComplexField::powi(self, n)
    }

    /// Get the absolute value for a numeric type
    #[must_use]
    fn abs(self) -> Self {
        nalgebra::ComplexField::abs(self)
    }

    /// Returns the absolute difference between two values.
    #[must_use]
    fn abs_sub(self, other: Self) -> Self {
        nalgebra::ComplexField::abs(self - other)
    }
}

impl<T> Value for T where
    T: nalgebra::Scalar
        + nalgebra::ComplexField<RealField = Self>
        + nalgebra::RealField
        + num_traits::float::FloatCore
        + std::fmt::LowerExp
{
}

/// Iterator over `n` evenly spaced values in an inclusive range.
///
/// The first value is `range.start()` and the last is exactly `range.end()`.
/// With `n == 1` only the start is yielded, and with `n == 0` nothing is.
#[derive(Debug, Clone)]
pub struct Linspace<T: Value> {
    start: T,
    end: T,
    step: T,
    n: usize,
    index: usize,
}
impl<T: Value> Linspace<T> {
    /// Creates a new iterator over `n` evenly spaced values in `range`
    pub fn new(range: RangeInclusive<T>, n: usize) -> Self {
        let (start, end) = range.into_inner();
        let step = match n {
            0 | 1 => T::zero(),
            _ => (end - start) / T::try_cast(n - 1).unwrap_or(T::one()),
        };

        Self {
            start,
            end,
            step,
            n,
            index: 0,
        }
    }
}
impl<T: Value> Iterator for Linspace<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.n {
            return None;
        }

        // Pin the last value to `end` so accumulated rounding never leaves the range
        let value = if self.index + 1 == self.n && self.n > 1 {
            self.end
        } else {
            self.start + T::try_cast(self.index).unwrap_or(T::zero()) * self.step
        };

        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.n - self.index;
        (remaining, Some(remaining))
    }
}
impl<T: Value> ExactSizeIterator for Linspace<T> {}

/// Extension trait for accessing the `x` and `y` coordinates of a set of points.
///
/// # Examples
///
/// ```
/// # use biasvar::value::CoordExt;
/// let data = vec![(1.5, -2.0), (2.0, 3.0), (0.0, 1.0)];
/// assert_eq!(data.y(), vec![-2.0, 3.0, 1.0]);
/// ```
pub trait CoordExt<T: Value> {
    /// Returns an iterator over the x-coordinates of this value.
    fn x_iter(&self) -> impl Iterator<Item = T>;

    /// Returns an iterator over the y-coordinates of this value.
    fn y_iter(&self) -> impl Iterator<Item = T>;

    /// Returns the x-coordinates of this value.
    fn x(&self) -> Vec<T> {
        self.x_iter().collect()
    }

    /// Returns the y-coordinates of this value.
    fn y(&self) -> Vec<T> {
        self.y_iter().collect()
    }

    /// Returns the inclusive range of x-coordinates of this value.
    fn x_range(&self) -> Option<RangeInclusive<T>> {
        min_max(self.x_iter()).map(|(start, end)| start..=end)
    }

    /// Returns the range of y-coordinates of this value.
    fn y_range(&self) -> Option<Range<T>> {
        min_max(self.y_iter()).map(|(start, end)| start..end)
    }

    /// Converts the coordinates of this value to `f64`.
    ///
    /// # Errors
    /// Returns an error if any of the coordinates cannot be converted to `f64`.
    fn as_f64(&self) -> crate::error::Result<Vec<(f64, f64)>> {
        self.x_iter()
            .zip(self.y_iter())
            .map(|(x, y)| Ok((f64::try_cast(x)?, f64::try_cast(y)?)))
            .collect()
    }
}
impl<T: Value> CoordExt<T> for Vec<(T, T)> {
    fn x_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(x, _)| *x)
    }

    fn y_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(_, y)| *y)
    }
}
impl<T: Value> CoordExt<T> for [(T, T)] {
    fn x_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(x, _)| *x)
    }

    fn y_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(_, y)| *y)
    }
}

fn min_max<T: Value>(values: impl Iterator<Item = T>) -> Option<(T, T)> {
    values.fold(None, |acc: Option<(T, T)>, v| {
        Some(match acc {
            Some((min, max)) => (
                nalgebra::RealField::min(min, v),
                nalgebra::RealField::max(max, v),
            ),
            None => (v, v),
        })
    })
}
