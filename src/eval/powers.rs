//! Precomputed variable-power tables.

use num_traits::{One, Zero};

use crate::poly::Polynomial;
use crate::scalar::Scalar;

/// Per-variable tables of `x_i^k`, sized once and refilled for every point.
///
/// The table for variable `i` holds `x_i^0 ..= x_i^max_i`, where `max_i` is
/// the maximum exponent of variable `i` across every polynomial the table
/// was sized for. Filling costs one multiplication per entry, so each
/// variable power is computed at most once per evaluation, no matter how
/// many terms or polynomials share it.
#[derive(Debug, Clone)]
pub(crate) struct PowerTable<T> {
    /// Start of each variable's block in `powers`; one extra entry holds the
    /// total length.
    offsets: Vec<usize>,
    /// Concatenated per-variable power tables.
    powers: Vec<T>,
}

impl<T: Scalar> PowerTable<T> {
    /// Sizes a table for every polynomial in `polys`, which must share one
    /// variable ordering.
    pub(crate) fn sized_for<'p>(polys: impl IntoIterator<Item = &'p Polynomial<T>>) -> Self {
        let mut maxima: Vec<u32> = Vec::new();
        for poly in polys {
            if maxima.is_empty() {
                maxima = vec![0; poly.nvariables()];
            }
            poly.max_exponents(&mut maxima);
        }
        let mut offsets = Vec::with_capacity(maxima.len() + 1);
        let mut total = 0;
        for &m in &maxima {
            offsets.push(total);
            total += m as usize + 1;
        }
        offsets.push(total);
        Self {
            offsets,
            powers: vec![T::zero(); total],
        }
    }

    /// Number of variables the table covers.
    #[inline]
    pub(crate) fn nvariables(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Overwrites the table with the powers of `x`. The caller has already
    /// checked that `x` has one coordinate per variable.
    pub(crate) fn fill(&mut self, x: &[T]) {
        debug_assert_eq!(x.len(), self.nvariables());
        for (var, &xi) in x.iter().enumerate() {
            let block = &mut self.powers[self.offsets[var]..self.offsets[var + 1]];
            let mut p = T::one();
            for entry in block {
                *entry = p;
                p *= xi;
            }
        }
    }

    /// Looks up `x_var^e` from the last fill.
    #[must_use]
    #[inline]
    pub(crate) fn get(&self, var: usize, e: u32) -> T {
        self.powers[self.offsets[var] + e as usize]
    }
}
