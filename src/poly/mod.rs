//! Fixed-structure polynomial term stores.
//!
//! A [`Polynomial`] is an immutable list of terms optimized for repeated
//! evaluation, not for algebraic manipulation. Construct it once from a
//! normalized term list (typically produced by a general-purpose polynomial
//! library), then evaluate it at many points through the configs in
//! [`crate::eval`].

mod diff;
mod homogenize;

use core::cmp::Ordering;

use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::errors::PolyError;
use crate::scalar::Scalar;

/// A multivariate polynomial stored as a dense exponent grid plus a
/// coefficient vector.
///
/// The exponent grid has one row per variable and one column per term;
/// column `j` is the exponent vector of term `j`. Columns are kept in
/// *canonical order*: total degree descending, ties broken by descending
/// lexicographic comparison of the exponent vectors. The evaluation
/// algorithms rely on this ordering; it is established by every constructor
/// and by every derivative-producing transform, and never altered in place.
///
/// ### Example
///
/// `3x²yz² − 2x³y` over `[x, y, z]` has the columns `(2,1,2)` and `(3,1,0)`,
/// both of total degree 5:
///
/// ```
/// use polyeval::Polynomial;
///
/// let f = Polynomial::new(
///     vec![vec![2, 1, 2], vec![3, 1, 0]],
///     vec![3.0, -2.0],
///     vec!["x".into(), "y".into(), "z".into()],
/// )
/// .unwrap();
/// assert_eq!(f.evaluate(&[1.0, 2.0, 3.0]).unwrap(), 50.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial<T> {
    /// Exponent grid, term-major: `exponents[j * nvars + i]` is the exponent
    /// of variable `i` in term `j`.
    pub(crate) exponents: Vec<u32>,
    /// One coefficient per column, index-aligned with the grid.
    pub(crate) coefficients: Vec<T>,
    /// Variable names, in the coordinate order every evaluation call expects.
    pub(crate) variables: Vec<String>,
    /// Whether variable 0 is a synthetic homogenization variable.
    pub(crate) homogenized: bool,
}

/// Canonical column comparison: total degree descending, then descending
/// lexicographic on the exponent vector. Sorting ascending under this
/// comparator puts the leading term first.
#[inline]
pub(crate) fn cmp_columns(a: &[u32], b: &[u32]) -> Ordering {
    let da: u32 = a.iter().sum();
    let db: u32 = b.iter().sum();
    db.cmp(&da).then_with(|| b.cmp(a))
}

impl<T: Scalar> Polynomial<T> {
    /// Builds a polynomial from one exponent column per term, a coefficient
    /// vector and an ordered variable list.
    ///
    /// Columns are sorted into canonical order; the caller may pass them in
    /// any order. Input must be a normalized term list: every column must
    /// have one row per variable, and no two columns may be identical.
    pub fn new(
        columns: Vec<Vec<u32>>,
        coefficients: Vec<T>,
        variables: Vec<String>,
    ) -> Result<Self, PolyError> {
        let nvars = variables.len();
        if coefficients.len() != columns.len() {
            return Err(PolyError::CoefficientCountMismatch {
                coefficients: coefficients.len(),
                terms: columns.len(),
            });
        }
        let mut exponents = Vec::with_capacity(nvars * columns.len());
        for (term, column) in columns.iter().enumerate() {
            if column.len() != nvars {
                return Err(PolyError::RaggedExponents {
                    term,
                    expected: nvars,
                    got: column.len(),
                });
            }
            exponents.extend_from_slice(column);
        }
        Self::from_grid(exponents, coefficients, variables, false)
    }

    /// Builds a polynomial from a normalized `(exponent vector, coefficient)`
    /// term list, as produced by an external construction layer.
    pub fn from_terms(
        terms: impl IntoIterator<Item = (Vec<u32>, T)>,
        variables: Vec<String>,
    ) -> Result<Self, PolyError> {
        let (columns, coefficients): (Vec<_>, Vec<_>) = terms.into_iter().unzip();
        Self::new(columns, coefficients, variables)
    }

    /// Builds from an already-flattened term-major grid, sorting into
    /// canonical order and rejecting duplicate columns.
    pub(crate) fn from_grid(
        exponents: Vec<u32>,
        coefficients: Vec<T>,
        variables: Vec<String>,
        homogenized: bool,
    ) -> Result<Self, PolyError> {
        let nvars = variables.len();
        let (exponents, coefficients) = sort_columns(nvars, exponents, coefficients);
        for term in 1..coefficients.len() {
            let prev = &exponents[(term - 1) * nvars..term * nvars];
            let cur = &exponents[term * nvars..(term + 1) * nvars];
            if prev == cur {
                return Err(PolyError::DuplicateTerm { term });
            }
        }
        Ok(Self {
            exponents,
            coefficients,
            variables,
            homogenized,
        })
    }

    /// Builds the output of a derivative-producing transform: sorts into
    /// canonical order, merges columns that became duplicates and drops
    /// exact-zero coefficients. Infallible; only called with grids whose
    /// rows already agree with `variables`.
    pub(crate) fn from_transform(
        exponents: Vec<u32>,
        coefficients: Vec<T>,
        variables: Vec<String>,
        homogenized: bool,
    ) -> Self {
        let nvars = variables.len();
        let (sorted_exps, sorted_coeffs) = sort_columns(nvars, exponents, coefficients);
        let mut exponents = Vec::with_capacity(sorted_exps.len());
        let mut coefficients: Vec<T> = Vec::with_capacity(sorted_coeffs.len());
        for (term, &coeff) in sorted_coeffs.iter().enumerate() {
            let column = &sorted_exps[term * nvars..(term + 1) * nvars];
            let is_dup = !coefficients.is_empty()
                && &exponents[exponents.len() - nvars..] == column;
            if is_dup {
                *coefficients.last_mut().expect("duplicate implies a prior column") += coeff;
            } else {
                exponents.extend_from_slice(column);
                coefficients.push(coeff);
            }
            // A merged column can cancel to exactly zero; drop it.
            if coefficients.last().is_some_and(|c| c.is_zero()) && is_dup {
                coefficients.pop();
                exponents.truncate(exponents.len() - nvars);
            }
        }
        Self {
            exponents,
            coefficients,
            variables,
            homogenized,
        }
    }

    /// Number of terms (columns of the exponent grid).
    #[must_use]
    #[inline]
    pub const fn nterms(&self) -> usize {
        self.coefficients.len()
    }

    /// Number of variables (rows of the exponent grid).
    #[must_use]
    #[inline]
    pub const fn nvariables(&self) -> usize {
        self.variables.len()
    }

    /// The ordered variable names; evaluation points use this coordinate
    /// order.
    #[must_use]
    #[inline]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// The coefficient vector, index-aligned with the exponent columns.
    #[must_use]
    #[inline]
    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    /// The flat term-major exponent grid: `exponents()[j * nvariables() + i]`
    /// is the exponent of variable `i` in term `j`.
    #[must_use]
    #[inline]
    pub fn exponents(&self) -> &[u32] {
        &self.exponents
    }

    /// The exponent of variable `var` in term `term`.
    #[must_use]
    #[inline]
    pub fn exponent(&self, var: usize, term: usize) -> u32 {
        self.exponents[term * self.nvariables() + var]
    }

    /// The exponent vector of term `term`.
    #[must_use]
    #[inline]
    pub fn term(&self, term: usize) -> &[u32] {
        let nvars = self.nvariables();
        &self.exponents[term * nvars..(term + 1) * nvars]
    }

    /// The total degree of term `term`.
    #[must_use]
    #[inline]
    pub(crate) fn term_degree(&self, term: usize) -> u32 {
        self.term(term).iter().sum()
    }

    /// The total degree: the maximum column degree sum, or 0 for a
    /// polynomial with no terms.
    #[must_use]
    pub fn degree(&self) -> u32 {
        // Canonical order puts the highest-degree column first.
        if self.nterms() == 0 { 0 } else { self.term_degree(0) }
    }

    /// Whether every term has the same total degree. Computed from the
    /// grid; unaffected by [`Self::is_homogenized`].
    #[must_use]
    pub fn is_homogeneous(&self) -> bool {
        match self.nterms() {
            0 | 1 => true,
            n => {
                let first = self.term_degree(0);
                // Canonical order is degree-descending, so comparing the
                // first and last columns suffices.
                first == self.term_degree(n - 1)
            }
        }
    }

    /// Whether variable 0 is a synthetic homogenization variable.
    #[must_use]
    #[inline]
    pub const fn is_homogenized(&self) -> bool {
        self.homogenized
    }

    /// Scales every coefficient by `factor`, in place.
    ///
    /// This is the only permitted in-place mutation; it does not disturb the
    /// canonical column order.
    pub fn scale_coefficients(&mut self, factor: T) {
        for c in &mut self.coefficients {
            *c *= factor;
        }
    }

    /// The maximum exponent of each variable across all terms.
    pub(crate) fn max_exponents(&self, maxima: &mut [u32]) {
        let nvars = self.nvariables();
        debug_assert_eq!(maxima.len(), nvars);
        for term in 0..self.nterms() {
            for (m, &e) in maxima.iter_mut().zip(self.term(term)) {
                *m = (*m).max(e);
            }
        }
    }
}

/// Applies the canonical column permutation to a flat term-major grid and
/// its coefficient vector.
fn sort_columns<T: Scalar>(
    nvars: usize,
    exponents: Vec<u32>,
    coefficients: Vec<T>,
) -> (Vec<u32>, Vec<T>) {
    let nterms = coefficients.len();
    debug_assert_eq!(exponents.len(), nvars * nterms);
    let mut order: Vec<usize> = (0..nterms).collect();
    order.sort_by(|&a, &b| {
        cmp_columns(
            &exponents[a * nvars..(a + 1) * nvars],
            &exponents[b * nvars..(b + 1) * nvars],
        )
    });
    let mut sorted_exps = Vec::with_capacity(exponents.len());
    let mut sorted_coeffs = Vec::with_capacity(nterms);
    for &j in &order {
        sorted_exps.extend_from_slice(&exponents[j * nvars..(j + 1) * nvars]);
        sorted_coeffs.push(coefficients[j]);
    }
    (sorted_exps, sorted_coeffs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xyz() -> Vec<String> {
        vec!["x".into(), "y".into(), "z".into()]
    }

    #[test]
    fn test_construction_sorts_canonically() {
        // 1 + y + x + x^2, passed in ascending order.
        let f = Polynomial::new(
            vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![2, 0]],
            vec![1.0, 2.0, 3.0, 4.0],
            vec!["x".into(), "y".into()],
        )
        .unwrap();

        // Canonical: x^2, then x (lex above y), then y, then the constant.
        assert_eq!(f.term(0), &[2, 0]);
        assert_eq!(f.term(1), &[1, 0]);
        assert_eq!(f.term(2), &[0, 1]);
        assert_eq!(f.term(3), &[0, 0]);
        assert_eq!(f.coefficients(), &[4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_degree_ties_broken_lexicographically() {
        // Both terms of 3x^2yz^2 - 2x^3y have total degree 5; the
        // lex-greater column (3,1,0) leads.
        let f = Polynomial::new(
            vec![vec![2, 1, 2], vec![3, 1, 0]],
            vec![3.0, -2.0],
            xyz(),
        )
        .unwrap();
        assert_eq!(f.term(0), &[3, 1, 0]);
        assert_eq!(f.term(1), &[2, 1, 2]);
        assert_eq!(f.degree(), 5);
    }

    #[test]
    fn test_accessors() {
        let f = Polynomial::new(
            vec![vec![1, 0, 0], vec![0, 2, 1]],
            vec![2.0, 5.0],
            xyz(),
        )
        .unwrap();
        assert_eq!(f.nterms(), 2);
        assert_eq!(f.nvariables(), 3);
        assert_eq!(f.variables(), &["x", "y", "z"]);
        assert_eq!(f.exponent(1, 0), 2);
        assert_eq!(f.exponent(0, 1), 1);
        assert!(!f.is_homogenized());
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let err = Polynomial::new(
            vec![vec![1, 1], vec![1, 1]],
            vec![1.0, 2.0],
            vec!["x".into(), "y".into()],
        )
        .unwrap_err();
        assert_eq!(err, PolyError::DuplicateTerm { term: 1 });
    }

    #[test]
    fn test_ragged_column_rejected() {
        let err = Polynomial::new(
            vec![vec![1, 0], vec![1]],
            vec![1.0, 2.0],
            vec!["x".into(), "y".into()],
        )
        .unwrap_err();
        assert_eq!(
            err,
            PolyError::RaggedExponents {
                term: 1,
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn test_coefficient_count_mismatch_rejected() {
        let err = Polynomial::new(
            vec![vec![1, 0]],
            vec![1.0, 2.0],
            vec!["x".into(), "y".into()],
        )
        .unwrap_err();
        assert_eq!(
            err,
            PolyError::CoefficientCountMismatch {
                coefficients: 2,
                terms: 1
            }
        );
    }

    #[test]
    fn test_is_homogeneous_is_computed() {
        let hom = Polynomial::new(
            vec![vec![2, 0], vec![1, 1], vec![0, 2]],
            vec![1.0, -1.0, 1.0],
            vec!["x".into(), "y".into()],
        )
        .unwrap();
        assert!(hom.is_homogeneous());
        assert!(!hom.is_homogenized());

        let inhom = Polynomial::new(
            vec![vec![2, 0], vec![1, 0]],
            vec![1.0, 1.0],
            vec!["x".into(), "y".into()],
        )
        .unwrap();
        assert!(!inhom.is_homogeneous());
    }

    #[test]
    fn test_empty_and_constant_stores() {
        let empty = Polynomial::<f64>::new(vec![], vec![], vec!["x".into()]).unwrap();
        assert_eq!(empty.nterms(), 0);
        assert_eq!(empty.degree(), 0);
        assert!(empty.is_homogeneous());

        let constant =
            Polynomial::new(vec![vec![0]], vec![7.5], vec!["x".into()]).unwrap();
        assert_eq!(constant.degree(), 0);
        assert!(constant.is_homogeneous());
    }

    #[test]
    fn test_scale_coefficients_in_place() {
        let mut f = Polynomial::new(
            vec![vec![2, 0], vec![0, 1]],
            vec![1.5, -3.0],
            vec!["x".into(), "y".into()],
        )
        .unwrap();
        f.scale_coefficients(-2.0);
        assert_eq!(f.coefficients(), &[-3.0, 6.0]);
        // Order is untouched.
        assert_eq!(f.term(0), &[2, 0]);
    }

    #[test]
    fn test_from_terms_matches_new() {
        let a = Polynomial::from_terms(
            vec![(vec![1, 0], 2.0), (vec![0, 3], -1.0)],
            vec!["x".into(), "y".into()],
        )
        .unwrap();
        let b = Polynomial::new(
            vec![vec![1, 0], vec![0, 3]],
            vec![2.0, -1.0],
            vec!["x".into(), "y".into()],
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_max_exponents() {
        let f = Polynomial::new(
            vec![vec![2, 1, 2], vec![3, 1, 0]],
            vec![3.0, -2.0],
            xyz(),
        )
        .unwrap();
        let mut maxima = [0u32; 3];
        f.max_exponents(&mut maxima);
        assert_eq!(maxima, [3, 1, 2]);
    }
}
