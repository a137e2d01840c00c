//! The multivariate Horner evaluation scheme.
//!
//! Columns are processed in canonical order (total degree descending, then
//! lexicographic), grouped into consecutive runs with equal exponent on the
//! first remaining variable:
//!
//! ```text
//! p(x_0, …, x_{n-1}) = Σ_runs x_0^e · q_run(x_1, …, x_{n-1})
//! ```
//!
//! where each run's tail `q_run` is evaluated recursively on the remaining
//! variables. All variable powers come from a [`PowerTable`], so each power
//! is computed at most once per evaluation regardless of how many runs
//! share it.

use core::ops::Range;

use num_traits::Zero;

use crate::errors::PolyError;
use crate::eval::powers::PowerTable;
use crate::poly::Polynomial;
use crate::scalar::{Scalar, scalar_from_exp};

impl<T: Scalar> Polynomial<T> {
    /// Evaluates the polynomial at `x` via the multivariate Horner scheme.
    ///
    /// `x` must have one coordinate per variable, in the order of
    /// [`Self::variables`]. A polynomial with no terms evaluates to zero;
    /// a constant polynomial evaluates trivially.
    ///
    /// This form builds a transient power table on every call. For repeated
    /// evaluation at many points, build a [`crate::GradientConfig`],
    /// [`crate::JacobianConfig`] or [`crate::PolynomialEvaluationArray`]
    /// once and reuse it; those paths allocate nothing per call.
    ///
    /// # Precision
    ///
    /// For polynomials containing a term of total degree greater than 43 the
    /// scheme does not guarantee an error below 1 unit in the last place.
    /// This is a documented accuracy ceiling of the multivariate Horner
    /// variant, not a defect; the error still degrades gracefully with
    /// degree.
    pub fn evaluate(&self, x: &[T]) -> Result<T, PolyError> {
        if x.len() != self.nvariables() {
            return Err(PolyError::DimensionMismatch {
                expected: self.nvariables(),
                got: x.len(),
            });
        }
        let mut powers = PowerTable::sized_for([self]);
        powers.fill(x);
        Ok(horner_value(self, &powers))
    }
}

/// Evaluates `poly` against an already-filled power table.
#[must_use]
pub(crate) fn horner_value<T: Scalar>(poly: &Polynomial<T>, powers: &PowerTable<T>) -> T {
    if poly.nterms() == 0 {
        return T::zero();
    }
    value_rec(poly, powers, 0..poly.nterms(), 0)
}

fn value_rec<T: Scalar>(
    poly: &Polynomial<T>,
    powers: &PowerTable<T>,
    cols: Range<usize>,
    var: usize,
) -> T {
    if var == poly.nvariables() {
        // All exponents consumed; the no-duplicate-column invariant leaves
        // exactly one term.
        debug_assert_eq!(cols.len(), 1);
        return poly.coefficients[cols.start];
    }
    let mut acc = T::zero();
    let mut i = cols.start;
    while i < cols.end {
        let e = poly.exponent(var, i);
        let mut j = i + 1;
        while j < cols.end && poly.exponent(var, j) == e {
            j += 1;
        }
        let tail = value_rec(poly, powers, i..j, var + 1);
        acc += powers.get(var, e) * tail;
        i = j;
    }
    acc
}

/// Width of one scratch row for the combined pass: value plus one partial
/// per variable.
#[inline]
pub(crate) const fn grad_row_width(nvars: usize) -> usize {
    nvars + 1
}

/// Scratch length the combined pass needs: one row per recursion depth.
#[inline]
pub(crate) const fn grad_scratch_len(nvars: usize) -> usize {
    (nvars + 1) * grad_row_width(nvars)
}

/// Computes value and all partial derivatives in a single traversal.
///
/// Each recursion depth tracks, for its group of columns, both the running
/// value and the running partials: with `p = x_v^e` and child tail `q`,
///
/// ```text
/// value   += p · q
/// ∂_k     += p · ∂_k q          (k > v)
/// ∂_v     += e · x_v^{e-1} · q
/// ```
///
/// so the gradient shares the grouped-by-degree traversal with the value
/// instead of requiring one pass per derivative.
///
/// On return `scratch[0]` holds the value and `scratch[1..=nvars]` the
/// gradient. `scratch` must be at least [`grad_scratch_len`] long.
pub(crate) fn horner_value_grad<T: Scalar>(
    poly: &Polynomial<T>,
    powers: &PowerTable<T>,
    scratch: &mut [T],
) {
    let width = grad_row_width(poly.nvariables());
    debug_assert!(scratch.len() >= grad_scratch_len(poly.nvariables()));
    if poly.nterms() == 0 {
        scratch[..width].fill(T::zero());
        return;
    }
    grad_rec(poly, powers, 0..poly.nterms(), 0, scratch);
}

fn grad_rec<T: Scalar>(
    poly: &Polynomial<T>,
    powers: &PowerTable<T>,
    cols: Range<usize>,
    var: usize,
    scratch: &mut [T],
) {
    let nvars = poly.nvariables();
    let width = grad_row_width(nvars);
    let (row, rest) = scratch.split_at_mut(width);
    row.fill(T::zero());
    if var == nvars {
        debug_assert_eq!(cols.len(), 1);
        row[0] = poly.coefficients[cols.start];
        return;
    }
    let mut i = cols.start;
    while i < cols.end {
        let e = poly.exponent(var, i);
        let mut j = i + 1;
        while j < cols.end && poly.exponent(var, j) == e {
            j += 1;
        }
        grad_rec(poly, powers, i..j, var + 1, rest);
        let child = &rest[..width];
        let p = powers.get(var, e);
        row[0] += p * child[0];
        for k in (var + 1)..nvars {
            row[1 + k] += p * child[1 + k];
        }
        if e > 0 {
            row[1 + var] += scalar_from_exp::<T>(e) * powers.get(var, e - 1) * child[0];
        }
        i = j;
    }
}
