//! Pre-allocated value-plus-derivative output buffers.
//!
//! During a gradient or Jacobian pass the value comes almost for free, so
//! the combined entry points fill one of these buffers in a single
//! traversal instead of two.

use num_traits::Zero;

use crate::errors::PolyError;
use crate::eval::config::{GradientConfig, JacobianConfig};
use crate::scalar::Scalar;

/// Holds a polynomial value and its gradient, overwritten in place by
/// [`GradientConfig::gradient_diff`].
#[derive(Debug, Clone, PartialEq)]
pub struct GradientDiffResult<T> {
    pub(crate) value: T,
    pub(crate) gradient: Vec<T>,
}

impl<T: Scalar> GradientDiffResult<T> {
    /// Allocates a result sized for `config`.
    #[must_use]
    pub fn new(config: &GradientConfig<'_, T>) -> Self {
        Self::from_buffer(vec![T::zero(); config.nvariables()])
    }

    /// Wraps a caller-provided gradient buffer; its length fixes the
    /// variable count the result accepts.
    #[must_use]
    pub fn from_buffer(gradient: Vec<T>) -> Self {
        Self {
            value: T::zero(),
            gradient,
        }
    }

    /// The value stored by the last combined pass.
    #[must_use]
    #[inline]
    pub fn value(&self) -> T {
        self.value
    }

    /// The gradient stored by the last combined pass.
    #[must_use]
    #[inline]
    pub fn gradient(&self) -> &[T] {
        &self.gradient
    }
}

/// Holds a system's value vector and its Jacobian, overwritten in place by
/// [`JacobianConfig::jacobian_diff`].
#[derive(Debug, Clone, PartialEq)]
pub struct JacobianDiffResult<T> {
    pub(crate) value: Vec<T>,
    /// Row-major `ncomponents × nvariables`.
    pub(crate) jacobian: Vec<T>,
    pub(crate) nvariables: usize,
}

impl<T: Scalar> JacobianDiffResult<T> {
    /// Allocates a result sized for `config`.
    #[must_use]
    pub fn new(config: &JacobianConfig<'_, T>) -> Self {
        let m = config.ncomponents();
        let n = config.nvariables();
        Self {
            value: vec![T::zero(); m],
            jacobian: vec![T::zero(); m * n],
            nvariables: n,
        }
    }

    /// Wraps caller-provided buffers. `jacobian` is row-major with
    /// `nvariables` columns and one row per entry of `value`.
    pub fn from_buffers(
        value: Vec<T>,
        jacobian: Vec<T>,
        nvariables: usize,
    ) -> Result<Self, PolyError> {
        if jacobian.len() != value.len() * nvariables {
            return Err(PolyError::DimensionMismatch {
                expected: value.len() * nvariables,
                got: jacobian.len(),
            });
        }
        Ok(Self {
            value,
            jacobian,
            nvariables,
        })
    }

    /// The value vector stored by the last combined pass.
    #[must_use]
    #[inline]
    pub fn value(&self) -> &[T] {
        &self.value
    }

    /// The row-major Jacobian stored by the last combined pass.
    #[must_use]
    #[inline]
    pub fn jacobian(&self) -> &[T] {
        &self.jacobian
    }

    /// One row of the Jacobian: the gradient of component `row`.
    #[must_use]
    #[inline]
    pub fn jacobian_row(&self, row: usize) -> &[T] {
        &self.jacobian[row * self.nvariables..(row + 1) * self.nvariables]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_buffers_validates_shape() {
        let err = JacobianDiffResult::from_buffers(vec![0.0; 2], vec![0.0; 5], 3).unwrap_err();
        assert_eq!(err, PolyError::DimensionMismatch { expected: 6, got: 5 });

        let ok = JacobianDiffResult::from_buffers(vec![0.0; 2], vec![0.0; 6], 3).unwrap();
        assert_eq!(ok.jacobian_row(1).len(), 3);
    }
}
