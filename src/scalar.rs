//! The numeric scalar seam.
//!
//! Every algorithm in this crate is written once against [`Scalar`] and
//! monomorphizes for real and complex floating-point types. The scalar type
//! is fixed when a polynomial or config is built, so the hot evaluation path
//! carries no runtime type checks or dynamic dispatch.

use core::iter::Sum;
use core::ops::{AddAssign, MulAssign, SubAssign};

use num_complex::ComplexFloat;
use num_traits::NumCast;

/// Scalar type over which polynomials are stored and evaluated.
///
/// Implemented for `f32`, `f64`, `Complex<f32>` and `Complex<f64>` through
/// the blanket impl. The associated [`ComplexFloat::Real`] type is the real
/// counterpart used by norms and combinatorial weights.
pub trait Scalar: ComplexFloat + AddAssign + SubAssign + MulAssign + Sum + 'static {}

impl<T> Scalar for T where T: ComplexFloat + AddAssign + SubAssign + MulAssign + Sum + 'static {}

/// Converts a term exponent into the scalar type.
///
/// Exponents are small non-negative integers, so the conversion is exact for
/// every scalar this crate supports.
#[inline]
pub(crate) fn scalar_from_exp<T: Scalar>(e: u32) -> T {
    T::from(e).expect("exponent representable in the scalar type")
}

/// Converts a real weight into the scalar type.
#[inline]
pub(crate) fn scalar_from_real<T: Scalar>(r: T::Real) -> T {
    T::from(r).expect("real value representable in the scalar type")
}

/// Converts an `f64` into the real counterpart of the scalar type.
#[inline]
pub(crate) fn real_from_f64<R: num_traits::Float>(x: f64) -> R {
    <R as NumCast>::from(x).expect("f64 representable in the real type")
}
