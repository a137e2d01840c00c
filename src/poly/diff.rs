//! Partial derivatives of term stores.

use crate::poly::Polynomial;
use crate::scalar::{Scalar, scalar_from_exp};

impl<T: Scalar> Polynomial<T> {
    /// The partial derivative with respect to variable `var`, as a new,
    /// independently owned polynomial in canonical order.
    ///
    /// Terms with a zero exponent on `var` vanish; every other term has that
    /// exponent decremented and its coefficient multiplied by the original
    /// exponent. The source polynomial is never mutated.
    ///
    /// # Panics
    /// Panics if `var` is not a valid variable index.
    #[must_use]
    pub fn differentiate(&self, var: usize) -> Self {
        let nvars = self.nvariables();
        assert!(var < nvars, "variable index {var} out of range for {nvars} variables");

        let mut exponents = Vec::with_capacity(self.exponents.len());
        let mut coefficients = Vec::with_capacity(self.nterms());
        for term in 0..self.nterms() {
            let e = self.exponent(var, term);
            if e == 0 {
                continue;
            }
            let start = exponents.len();
            exponents.extend_from_slice(self.term(term));
            exponents[start + var] = e - 1;
            coefficients.push(self.coefficients[term] * scalar_from_exp::<T>(e));
        }
        // Every degree drops by exactly one, but formerly distinct ties can
        // collide into a new order, so the canonical sort is re-established.
        Self::from_transform(exponents, coefficients, self.variables.clone(), self.homogenized)
    }

    /// All partial derivatives, one polynomial per variable: the gradient of
    /// `self` as a vector of term stores.
    #[must_use]
    pub fn gradient_polynomials(&self) -> Vec<Self> {
        (0..self.nvariables()).map(|var| self.differentiate(var)).collect()
    }
}
