//! Batched evaluation of polynomial collections.

use itertools::Itertools;
use num_traits::Zero;
use tracing::instrument;

use crate::errors::PolyError;
use crate::eval::horner::horner_value;
use crate::eval::powers::PowerTable;
use crate::poly::Polynomial;
use crate::scalar::Scalar;

/// A rectangular (possibly N-dimensional) collection of polynomials sharing
/// one variable ordering, evaluated through a single shared power table.
///
/// [`Self::precompute`] fills, once per point, the table of `x_i^k` for
/// every exponent `k` appearing in *any* stored polynomial. Evaluating the
/// whole array then costs only table lookups and additions per entry, which
/// beats independent evaluation whenever the polynomials overlap in
/// variables and exponents.
#[derive(Debug)]
pub struct PolynomialEvaluationArray<'p, T> {
    polys: &'p [Polynomial<T>],
    shape: Vec<usize>,
    /// Row-major strides matching `shape`.
    strides: Vec<usize>,
    powers: PowerTable<T>,
    /// Whether `powers` holds a completed precompute. Guards the unchecked
    /// accessor in debug builds.
    primed: bool,
}

impl<'p, T: Scalar> PolynomialEvaluationArray<'p, T> {
    /// Builds an array over `polys` arranged in row-major order with the
    /// given shape.
    ///
    /// Fails when the shape does not multiply out to `polys.len()`, on an
    /// empty collection, or when the polynomials do not share an identical
    /// variable ordering.
    #[instrument(skip_all, level = "debug", fields(len = polys.len(), shape = ?shape))]
    pub fn new(polys: &'p [Polynomial<T>], shape: &[usize]) -> Result<Self, PolyError> {
        if polys.is_empty() {
            return Err(PolyError::EmptySystem);
        }
        if shape.iter().product::<usize>() != polys.len() {
            return Err(PolyError::ShapeMismatch {
                shape: shape.to_vec(),
                len: polys.len(),
            });
        }
        if !polys.iter().map(Polynomial::variables).all_equal() {
            return Err(PolyError::VariableMismatch);
        }
        let mut strides = vec![1; shape.len()];
        for axis in (0..shape.len().saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1] * shape[axis + 1];
        }
        Ok(Self {
            polys,
            shape: shape.to_vec(),
            strides,
            powers: PowerTable::sized_for(polys),
            primed: false,
        })
    }

    /// The array shape.
    #[must_use]
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Total number of stored polynomials.
    #[must_use]
    #[inline]
    pub const fn len(&self) -> usize {
        self.polys.len()
    }

    /// Whether the array is empty. Construction rejects empty collections,
    /// so this is always false.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.polys.is_empty()
    }

    /// Number of variables every stored polynomial expects.
    #[must_use]
    #[inline]
    pub fn nvariables(&self) -> usize {
        self.polys[0].nvariables()
    }

    /// Fills the shared power table for `x`, covering every exponent any
    /// stored polynomial needs. Must be called (directly, or via
    /// [`Self::evaluate_into`]) before [`Self::evaluate_unchecked`].
    pub fn precompute(&mut self, x: &[T]) -> Result<(), PolyError> {
        if x.len() != self.nvariables() {
            return Err(PolyError::DimensionMismatch {
                expected: self.nvariables(),
                got: x.len(),
            });
        }
        self.powers.fill(x);
        self.primed = true;
        Ok(())
    }

    /// Precomputes for `x`, then evaluates every stored polynomial into
    /// `out` (row-major, matching the construction order). Allocation-free.
    pub fn evaluate_into(&mut self, out: &mut [T], x: &[T]) -> Result<(), PolyError> {
        if out.len() != self.polys.len() {
            return Err(PolyError::DimensionMismatch {
                expected: self.polys.len(),
                got: out.len(),
            });
        }
        self.precompute(x)?;
        for (o, p) in out.iter_mut().zip(self.polys) {
            *o = horner_value(p, &self.powers);
        }
        Ok(())
    }

    /// Precomputes for `x`, then evaluates every entry into a fresh vector.
    pub fn evaluate(&mut self, x: &[T]) -> Result<Vec<T>, PolyError> {
        let mut out = vec![T::zero(); self.polys.len()];
        self.evaluate_into(&mut out, x)?;
        Ok(out)
    }

    /// Evaluates the single entry at `index` using the power table from the
    /// *last* [`Self::precompute`] call, without re-validating the point.
    ///
    /// This lets a caller read a handful of entries of a large array without
    /// paying the full-array cost while still sharing the table.
    ///
    /// # Contract
    /// The result is undefined if the point has changed since the last
    /// `precompute`. Debug builds assert that a precompute happened at all.
    ///
    /// # Panics
    /// Panics if `index` does not match the array shape.
    #[must_use]
    pub fn evaluate_unchecked(&self, index: &[usize]) -> T {
        debug_assert!(self.primed, "evaluate_unchecked before precompute");
        assert_eq!(index.len(), self.shape.len(), "index rank mismatch");
        let mut flat = 0;
        for (axis, (&i, &stride)) in index.iter().zip(&self.strides).enumerate() {
            assert!(i < self.shape[axis], "index out of bounds on axis {axis}");
            flat += i * stride;
        }
        horner_value(&self.polys[flat], &self.powers)
    }
}
