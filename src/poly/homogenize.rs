//! Homogenization and dehomogenization.

use tracing::instrument;

use crate::errors::PolyError;
use crate::poly::Polynomial;
use crate::scalar::Scalar;

impl<T: Scalar> Polynomial<T> {
    /// Makes the polynomial homogeneous by prepending a synthetic variable.
    ///
    /// Each term's exponent on the new variable is raised to the difference
    /// between the polynomial's total degree and the term's own degree, so
    /// every column reaches the same total degree. The homogenization
    /// variable is always variable 0 of the result, and the result's
    /// [`Self::is_homogenized`] flag is set.
    ///
    /// If the polynomial is already homogenized this is the identity.
    #[instrument(skip_all, level = "debug", fields(terms = self.nterms()))]
    pub fn homogenize(&self, variable: impl Into<String>) -> Result<Self, PolyError> {
        if self.homogenized {
            return Ok(self.clone());
        }
        if self.nterms() == 0 {
            return Err(PolyError::EmptyPolynomial);
        }

        let nvars = self.nvariables();
        let degree = self.degree();
        let mut exponents = Vec::with_capacity((nvars + 1) * self.nterms());
        for term in 0..self.nterms() {
            exponents.push(degree - self.term_degree(term));
            exponents.extend_from_slice(self.term(term));
        }
        let mut variables = Vec::with_capacity(nvars + 1);
        variables.push(variable.into());
        variables.extend_from_slice(&self.variables);

        Ok(Self::from_transform(
            exponents,
            self.coefficients.clone(),
            variables,
            true,
        ))
    }

    /// Substitutes 1 for the homogenization variable, dropping its row and
    /// clearing the flag. Coefficients are unchanged, though columns that
    /// become identical after the substitution are merged.
    ///
    /// If the polynomial is not homogenized this is the identity.
    #[must_use]
    pub fn dehomogenize(&self) -> Self {
        if !self.homogenized {
            return self.clone();
        }

        let nvars = self.nvariables();
        let mut exponents = Vec::with_capacity((nvars - 1) * self.nterms());
        for term in 0..self.nterms() {
            exponents.extend_from_slice(&self.term(term)[1..]);
        }
        Self::from_transform(
            exponents,
            self.coefficients.clone(),
            self.variables[1..].to_vec(),
            false,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(columns: Vec<Vec<u32>>, coefficients: Vec<f64>, vars: &[&str]) -> Polynomial<f64> {
        Polynomial::new(
            columns,
            coefficients,
            vars.iter().map(|v| (*v).into()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_homogenize_reaches_uniform_degree() {
        // x^2 + y + 1, total degree 2.
        let f = poly(
            vec![vec![2, 0], vec![0, 1], vec![0, 0]],
            vec![1.0, 1.0, 1.0],
            &["x", "y"],
        );
        let h = f.homogenize("x0").unwrap();

        assert!(h.is_homogenized());
        assert!(h.is_homogeneous());
        assert_eq!(h.variables(), &["x0", "x", "y"]);
        assert_eq!(h.degree(), 2);
        for term in 0..h.nterms() {
            assert_eq!(h.term(term).iter().sum::<u32>(), 2);
        }
    }

    #[test]
    fn test_homogenize_already_homogenized_is_identity() {
        let f = poly(vec![vec![1, 1], vec![0, 2]], vec![1.0, 2.0], &["x", "y"]);
        let h = f.homogenize("x0").unwrap();
        let again = h.homogenize("t").unwrap();
        assert_eq!(h, again);
    }

    #[test]
    fn test_homogenize_empty_fails() {
        let empty = Polynomial::<f64>::new(vec![], vec![], vec!["x".into()]).unwrap();
        assert_eq!(empty.homogenize("x0").unwrap_err(), PolyError::EmptyPolynomial);
    }

    #[test]
    fn test_dehomogenize_round_trip() {
        let f = poly(
            vec![vec![2, 1], vec![1, 0], vec![0, 0]],
            vec![3.0, -1.0, 0.5],
            &["x", "y"],
        );
        let back = f.homogenize("x0").unwrap().dehomogenize();
        assert_eq!(back, f);
    }

    #[test]
    fn test_dehomogenize_not_homogenized_is_identity() {
        let f = poly(vec![vec![1, 0]], vec![2.0], &["x", "y"]);
        assert_eq!(f.dehomogenize(), f);
    }

    #[test]
    fn test_dehomogenize_merges_collapsed_columns() {
        // x0^2 + x0 x + x^2 is homogeneous in (x0, x); substituting x0 = 1
        // leaves 1 + x + x^2 with no collisions, while x0 x + x (impossible
        // from homogenize, but constructible directly) collapses.
        let direct = Polynomial::from_grid(
            vec![1, 1, 0, 1],
            vec![2.0, 3.0],
            vec!["x0".into(), "x".into()],
            true,
        )
        .unwrap();
        let d = direct.dehomogenize();
        assert_eq!(d.nterms(), 1);
        assert_eq!(d.term(0), &[1]);
        assert_eq!(d.coefficients(), &[5.0]);
    }

    #[test]
    fn test_rehomogenize_preserves_evaluation() {
        // dehomogenize then homogenize reconstructs evaluation behavior on
        // the affine chart x0 = 1.
        let f = poly(
            vec![vec![2, 0], vec![1, 1], vec![0, 0]],
            vec![1.0, -2.0, 4.0],
            &["x", "y"],
        );
        let h = f.homogenize("x0").unwrap();
        let re = h.dehomogenize().homogenize("x0").unwrap();
        let x = [0.7, -1.3, 2.1];
        let a = h.evaluate(&x).unwrap();
        let b = re.evaluate(&x).unwrap();
        approx::assert_abs_diff_eq!(a, b, epsilon = 1e-12);
    }
}
