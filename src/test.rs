//! Assertions for tests of fitted curves and numeric output.
//!
//! ### [`crate::assert_close`]
//! Asserts that two floating-point values are approximately equal.
//! - Uses the machine epsilon for the floating-point type as the tolerance, unless `tol = ..` is given.
//! - `assert_eq!` equivalent for floats.
//!
//! ### [`crate::assert_all_close`]
//! Element-wise [`crate::assert_close`] over two slices of the same length.
//!
//! ### [`crate::assert_r_squared`]
//! Asserts that a fit explains at least a given share of the variance of its training data.
//! See [`crate::CurveFit::r_squared`] for more details.
use crate::value::Value;

mod assertions;

/// Default tolerance used by [`crate::assert_close`] for values of type `T`.
#[doc(hidden)]
pub fn default_tolerance<T: Value>(_: T) -> T {
    T::epsilon()
}
