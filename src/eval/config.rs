//! Precomputed evaluation configs for gradients and Jacobians.
//!
//! A config is built once per polynomial (or system) and reused across many
//! evaluation calls: construction eagerly differentiates the polynomial and
//! allocates every scratch buffer the evaluation paths need, so the repeated
//! calls themselves are allocation-free. Each config borrows the exact term
//! store(s) it was built from; using it against an unrelated polynomial is
//! unrepresentable.
//!
//! Configs are single-threaded by design: all mutation is confined to the
//! scratch a config exclusively owns. For parallel pipelines, give every
//! worker its own config over the same shared, immutable polynomials.

use itertools::Itertools;
use num_traits::Zero;
use tracing::instrument;

use crate::errors::PolyError;
use crate::eval::diff_result::{GradientDiffResult, JacobianDiffResult};
use crate::eval::horner::{grad_scratch_len, horner_value, horner_value_grad};
use crate::eval::powers::PowerTable;
use crate::poly::Polynomial;
use crate::scalar::Scalar;

/// Reusable state for evaluating one polynomial and its gradient.
#[derive(Debug)]
pub struct GradientConfig<'p, T> {
    poly: &'p Polynomial<T>,
    /// One derivative store per variable, in canonical order.
    derivatives: Vec<Polynomial<T>>,
    powers: PowerTable<T>,
    scratch: Vec<T>,
}

impl<'p, T: Scalar> GradientConfig<'p, T> {
    /// Builds a config for `poly`: differentiates it once per variable and
    /// sizes the power table and scratch rows.
    #[instrument(skip_all, level = "debug", fields(terms = poly.nterms(), vars = poly.nvariables()))]
    pub fn new(poly: &'p Polynomial<T>) -> Self {
        let derivatives = poly.gradient_polynomials();
        // The derivative exponents are bounded by the source's, so sizing
        // the table for `poly` covers every store this config evaluates.
        let powers = PowerTable::sized_for([poly]);
        let scratch = vec![T::zero(); grad_scratch_len(poly.nvariables())];
        Self {
            poly,
            derivatives,
            powers,
            scratch,
        }
    }

    /// The polynomial this config was built from.
    #[must_use]
    #[inline]
    pub const fn polynomial(&self) -> &'p Polynomial<T> {
        self.poly
    }

    /// Number of variables, i.e. the expected coordinate count.
    #[must_use]
    #[inline]
    pub fn nvariables(&self) -> usize {
        self.poly.nvariables()
    }

    #[inline]
    fn check_point(&self, x: &[T]) -> Result<(), PolyError> {
        if x.len() == self.nvariables() {
            Ok(())
        } else {
            Err(PolyError::DimensionMismatch {
                expected: self.nvariables(),
                got: x.len(),
            })
        }
    }

    /// Evaluates the polynomial at `x` using the precomputed state.
    pub fn evaluate(&mut self, x: &[T]) -> Result<T, PolyError> {
        self.check_point(x)?;
        self.powers.fill(x);
        Ok(horner_value(self.poly, &self.powers))
    }

    /// Computes the gradient at `x` into a fresh vector.
    pub fn gradient(&mut self, x: &[T]) -> Result<Vec<T>, PolyError> {
        let mut out = vec![T::zero(); self.nvariables()];
        self.gradient_into(&mut out, x)?;
        Ok(out)
    }

    /// Computes the gradient at `x` into `out`, evaluating the cached
    /// derivative stores against one shared power-table fill. Allocation-free.
    pub fn gradient_into(&mut self, out: &mut [T], x: &[T]) -> Result<(), PolyError> {
        self.check_point(x)?;
        if out.len() != self.nvariables() {
            return Err(PolyError::DimensionMismatch {
                expected: self.nvariables(),
                got: out.len(),
            });
        }
        self.powers.fill(x);
        for (o, d) in out.iter_mut().zip(&self.derivatives) {
            *o = horner_value(d, &self.powers);
        }
        Ok(())
    }

    /// Computes value and gradient at `x` together, in a single traversal,
    /// overwriting `result` in place. Allocation-free, and strictly cheaper
    /// than calling [`Self::evaluate`] and [`Self::gradient_into`]
    /// separately.
    pub fn gradient_diff(
        &mut self,
        result: &mut GradientDiffResult<T>,
        x: &[T],
    ) -> Result<(), PolyError> {
        self.check_point(x)?;
        if result.gradient.len() != self.nvariables() {
            return Err(PolyError::DimensionMismatch {
                expected: self.nvariables(),
                got: result.gradient.len(),
            });
        }
        self.powers.fill(x);
        horner_value_grad(self.poly, &self.powers, &mut self.scratch);
        result.value = self.scratch[0];
        result
            .gradient
            .copy_from_slice(&self.scratch[1..=self.nvariables()]);
        Ok(())
    }
}

/// Reusable state for evaluating a system of polynomials and its Jacobian.
///
/// All components must share one variable ordering; the power table is sized
/// by the maximum exponent per variable across the whole system and filled
/// once per call, no matter how many components there are.
#[derive(Debug)]
pub struct JacobianConfig<'p, T> {
    system: &'p [Polynomial<T>],
    /// Derivative stores, row-major: `derivatives[i * nvars + k]` is
    /// `∂ system[i] / ∂ x_k`.
    derivatives: Vec<Polynomial<T>>,
    powers: PowerTable<T>,
    scratch: Vec<T>,
}

impl<'p, T: Scalar> JacobianConfig<'p, T> {
    /// Builds a config for `system`.
    ///
    /// Fails on an empty system or when the components do not share an
    /// identical variable ordering.
    #[instrument(skip_all, level = "debug", fields(components = system.len()))]
    pub fn new(system: &'p [Polynomial<T>]) -> Result<Self, PolyError> {
        let first = system.first().ok_or(PolyError::EmptySystem)?;
        if !system.iter().map(Polynomial::variables).all_equal() {
            return Err(PolyError::VariableMismatch);
        }
        let derivatives = system
            .iter()
            .flat_map(Polynomial::gradient_polynomials)
            .collect();
        let powers = PowerTable::sized_for(system);
        let scratch = vec![T::zero(); grad_scratch_len(first.nvariables())];
        Ok(Self {
            system,
            derivatives,
            powers,
            scratch,
        })
    }

    /// The system this config was built from.
    #[must_use]
    #[inline]
    pub const fn system(&self) -> &'p [Polynomial<T>] {
        self.system
    }

    /// Number of components (rows of the Jacobian).
    #[must_use]
    #[inline]
    pub const fn ncomponents(&self) -> usize {
        self.system.len()
    }

    /// Number of variables (columns of the Jacobian).
    #[must_use]
    #[inline]
    pub fn nvariables(&self) -> usize {
        self.system[0].nvariables()
    }

    #[inline]
    fn check_point(&self, x: &[T]) -> Result<(), PolyError> {
        if x.len() == self.nvariables() {
            Ok(())
        } else {
            Err(PolyError::DimensionMismatch {
                expected: self.nvariables(),
                got: x.len(),
            })
        }
    }

    #[inline]
    fn check_len(len: usize, expected: usize) -> Result<(), PolyError> {
        if len == expected {
            Ok(())
        } else {
            Err(PolyError::DimensionMismatch { expected, got: len })
        }
    }

    /// Evaluates every component at `x` into a fresh vector.
    pub fn evaluate(&mut self, x: &[T]) -> Result<Vec<T>, PolyError> {
        let mut out = vec![T::zero(); self.ncomponents()];
        self.evaluate_into(&mut out, x)?;
        Ok(out)
    }

    /// Evaluates every component at `x` into `out` from one shared
    /// power-table fill. Allocation-free.
    pub fn evaluate_into(&mut self, out: &mut [T], x: &[T]) -> Result<(), PolyError> {
        self.check_point(x)?;
        Self::check_len(out.len(), self.ncomponents())?;
        self.powers.fill(x);
        for (o, p) in out.iter_mut().zip(self.system) {
            *o = horner_value(p, &self.powers);
        }
        Ok(())
    }

    /// Computes the Jacobian at `x` into a fresh row-major
    /// `ncomponents × nvariables` vector.
    pub fn jacobian(&mut self, x: &[T]) -> Result<Vec<T>, PolyError> {
        let mut out = vec![T::zero(); self.ncomponents() * self.nvariables()];
        self.jacobian_into(&mut out, x)?;
        Ok(out)
    }

    /// Computes the Jacobian at `x` into `out` (row-major,
    /// `ncomponents × nvariables`), evaluating the cached derivative stores
    /// against one shared power-table fill. Allocation-free.
    pub fn jacobian_into(&mut self, out: &mut [T], x: &[T]) -> Result<(), PolyError> {
        self.check_point(x)?;
        Self::check_len(out.len(), self.ncomponents() * self.nvariables())?;
        self.powers.fill(x);
        for (o, d) in out.iter_mut().zip(&self.derivatives) {
            *o = horner_value(d, &self.powers);
        }
        Ok(())
    }

    /// Computes values and Jacobian at `x` together, one single-pass
    /// traversal per component, overwriting `result` in place.
    /// Allocation-free.
    pub fn jacobian_diff(
        &mut self,
        result: &mut JacobianDiffResult<T>,
        x: &[T],
    ) -> Result<(), PolyError> {
        self.check_point(x)?;
        let n = self.nvariables();
        Self::check_len(result.value.len(), self.ncomponents())?;
        Self::check_len(result.jacobian.len(), self.ncomponents() * n)?;
        self.powers.fill(x);
        for (i, p) in self.system.iter().enumerate() {
            horner_value_grad(p, &self.powers, &mut self.scratch);
            result.value[i] = self.scratch[0];
            result.jacobian[i * n..(i + 1) * n].copy_from_slice(&self.scratch[1..=n]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn poly(columns: Vec<Vec<u32>>, coefficients: Vec<f64>, vars: &[&str]) -> Polynomial<f64> {
        Polynomial::new(
            columns,
            coefficients,
            vars.iter().map(|v| (*v).into()).collect(),
        )
        .unwrap()
    }

    /// x^2 + y^3 z - 2 x y over [x, y, z].
    fn sample() -> Polynomial<f64> {
        poly(
            vec![vec![2, 0, 0], vec![0, 3, 1], vec![1, 1, 0]],
            vec![1.0, 1.0, -2.0],
            &["x", "y", "z"],
        )
    }

    #[test]
    fn test_config_evaluate_matches_standalone() {
        let f = sample();
        let mut cfg = GradientConfig::new(&f);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let x: Vec<f64> = (0..3).map(|_| rng.random_range(-2.0..2.0)).collect();
            assert_relative_eq!(
                cfg.evaluate(&x).unwrap(),
                f.evaluate(&x).unwrap(),
                max_relative = 1e-13
            );
        }
    }

    #[test]
    fn test_gradient_matches_differentiate_then_evaluate() {
        let f = sample();
        let mut cfg = GradientConfig::new(&f);
        let x = [0.8, -1.1, 1.9];
        let grad = cfg.gradient(&x).unwrap();
        for (var, g) in f.gradient_polynomials().iter().enumerate() {
            assert_relative_eq!(grad[var], g.evaluate(&x).unwrap(), max_relative = 1e-12);
        }
    }

    #[test]
    fn test_gradient_matches_finite_differences() {
        let f = sample();
        let mut cfg = GradientConfig::new(&f);
        let x = [0.4, 1.2, -0.9];
        let grad = cfg.gradient(&x).unwrap();

        let h = 1e-6;
        for var in 0..3 {
            let mut hi = x;
            let mut lo = x;
            hi[var] += h;
            lo[var] -= h;
            let fd = (f.evaluate(&hi).unwrap() - f.evaluate(&lo).unwrap()) / (2.0 * h);
            assert_abs_diff_eq!(grad[var], fd, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_gradient_diff_combines_value_and_gradient() {
        let f = sample();
        let mut cfg = GradientConfig::new(&f);
        let mut r = GradientDiffResult::new(&cfg);
        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..25 {
            let x: Vec<f64> = (0..3).map(|_| rng.random_range(-1.5..1.5)).collect();
            cfg.gradient_diff(&mut r, &x).unwrap();
            assert_relative_eq!(r.value(), cfg.evaluate(&x).unwrap(), max_relative = 1e-12);
            let grad = cfg.gradient(&x).unwrap();
            for var in 0..3 {
                assert_abs_diff_eq!(r.gradient()[var], grad[var], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_gradient_config_dimension_errors() {
        let f = sample();
        let mut cfg = GradientConfig::new(&f);
        assert_eq!(
            cfg.evaluate(&[1.0]).unwrap_err(),
            PolyError::DimensionMismatch { expected: 3, got: 1 }
        );
        let mut short = [0.0; 2];
        assert_eq!(
            cfg.gradient_into(&mut short, &[1.0, 2.0, 3.0]).unwrap_err(),
            PolyError::DimensionMismatch { expected: 3, got: 2 }
        );
    }

    #[test]
    fn test_jacobian_rows_are_component_gradients() {
        let f = sample();
        let g = poly(
            vec![vec![1, 0, 2], vec![0, 1, 0]],
            vec![4.0, -3.0],
            &["x", "y", "z"],
        );
        let system = [f.clone(), g.clone()];
        let mut cfg = JacobianConfig::new(&system).unwrap();
        let x = [1.1, 0.3, -0.6];
        let jac = cfg.jacobian(&x).unwrap();

        let mut gcfg_f = GradientConfig::new(&f);
        let mut gcfg_g = GradientConfig::new(&g);
        let grad_f = gcfg_f.gradient(&x).unwrap();
        let grad_g = gcfg_g.gradient(&x).unwrap();
        for var in 0..3 {
            assert_relative_eq!(jac[var], grad_f[var], max_relative = 1e-12);
            assert_relative_eq!(jac[3 + var], grad_g[var], max_relative = 1e-12);
        }
    }

    #[test]
    fn test_jacobian_evaluate_matches_componentwise() {
        let system = [
            sample(),
            poly(vec![vec![0, 0, 3]], vec![2.0], &["x", "y", "z"]),
        ];
        let mut cfg = JacobianConfig::new(&system).unwrap();
        let x = [0.5, 0.25, 2.0];
        let values = cfg.evaluate(&x).unwrap();
        for (v, p) in values.iter().zip(&system) {
            assert_relative_eq!(*v, p.evaluate(&x).unwrap(), max_relative = 1e-13);
        }
    }

    #[test]
    fn test_jacobian_diff_combines_values_and_jacobian() {
        let system = [
            sample(),
            poly(vec![vec![2, 1, 0]], vec![-1.5], &["x", "y", "z"]),
        ];
        let mut cfg = JacobianConfig::new(&system).unwrap();
        let mut r = JacobianDiffResult::new(&cfg);
        let x = [1.4, -0.2, 0.7];
        cfg.jacobian_diff(&mut r, &x).unwrap();

        let values = cfg.evaluate(&x).unwrap();
        let jac = cfg.jacobian(&x).unwrap();
        for i in 0..2 {
            assert_relative_eq!(r.value()[i], values[i], max_relative = 1e-12);
            for var in 0..3 {
                assert_abs_diff_eq!(
                    r.jacobian_row(i)[var],
                    jac[i * 3 + var],
                    epsilon = 1e-10
                );
            }
        }
    }

    #[test]
    fn test_jacobian_config_rejects_mixed_variables() {
        let f = poly(vec![vec![1, 0]], vec![1.0], &["x", "y"]);
        let g = poly(vec![vec![1, 0]], vec![1.0], &["x", "z"]);
        let system = [f, g];
        assert_eq!(
            JacobianConfig::new(&system).unwrap_err(),
            PolyError::VariableMismatch
        );
    }

    #[test]
    fn test_jacobian_config_rejects_empty_system() {
        let system: [Polynomial<f64>; 0] = [];
        assert_eq!(
            JacobianConfig::new(&system).unwrap_err(),
            PolyError::EmptySystem
        );
    }
}
