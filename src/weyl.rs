//! The Bombieri–Weyl inner product and norm.
//!
//! Both are computed directly from the term lists, without evaluating
//! anything:
//!
//! ```text
//! ⟨f, g⟩ = Σ_α  c_f(α) · conj(c_g(α)) · d! / (α_1! ⋯ α_n!)
//! ```
//!
//! summed over the exponent columns α the two polynomials share, where `d`
//! is their common total degree. The product is only defined for
//! homogeneous polynomials of equal degree over one variable set.

use core::cmp::Ordering;

use num_complex::ComplexFloat;
use num_traits::{Float, One, Zero};

use crate::errors::PolyError;
use crate::poly::{Polynomial, cmp_columns};
use crate::scalar::{Scalar, real_from_f64, scalar_from_real};

/// Computes the Bombieri–Weyl dot product of two homogeneous polynomials of
/// equal total degree over an identical variable ordering.
pub fn weyldot<T: Scalar>(f: &Polynomial<T>, g: &Polynomial<T>) -> Result<T, PolyError> {
    if f.variables() != g.variables() {
        return Err(PolyError::VariableMismatch);
    }
    if f.nterms() == 0 || g.nterms() == 0 {
        return Err(PolyError::EmptyPolynomial);
    }
    if !f.is_homogeneous() || !g.is_homogeneous() {
        return Err(PolyError::NotHomogeneous { operation: "weyldot" });
    }
    if f.degree() != g.degree() {
        return Err(PolyError::DegreeMismatch {
            lhs: f.degree(),
            rhs: g.degree(),
        });
    }

    // Both column lists are canonically sorted, so the matching columns come
    // out of a single merge walk.
    let mut acc = T::zero();
    let (mut i, mut j) = (0, 0);
    while i < f.nterms() && j < g.nterms() {
        match cmp_columns(f.term(i), g.term(j)) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                let w: T::Real = multinomial_weight(f.term(i));
                acc += f.coefficients()[i]
                    * g.coefficients()[j].conj()
                    * scalar_from_real::<T>(w);
                i += 1;
                j += 1;
            }
        }
    }
    Ok(acc)
}

/// Computes the Bombieri–Weyl norm `sqrt(⟨f, f⟩)` of a homogeneous
/// polynomial.
pub fn weylnorm<T: Scalar>(f: &Polynomial<T>) -> Result<T::Real, PolyError> {
    // ⟨f, f⟩ is real and non-negative by construction.
    Ok(Float::sqrt(weyldot(f, f)?.re()))
}

/// Componentwise Bombieri–Weyl dot product of two equally long polynomial
/// vectors: the sum of the scalar products.
pub fn weyldot_system<T: Scalar>(
    f: &[Polynomial<T>],
    g: &[Polynomial<T>],
) -> Result<T, PolyError> {
    if f.len() != g.len() {
        return Err(PolyError::LengthMismatch {
            expected: f.len(),
            got: g.len(),
        });
    }
    let mut acc = T::zero();
    for (a, b) in f.iter().zip(g) {
        acc += weyldot(a, b)?;
    }
    Ok(acc)
}

/// The Bombieri–Weyl norm of a polynomial vector.
pub fn weylnorm_system<T: Scalar>(f: &[Polynomial<T>]) -> Result<T::Real, PolyError> {
    Ok(Float::sqrt(weyldot_system(f, f)?.re()))
}

/// The combinatorial weight `d! / ∏ αᵢ!` of one exponent column, computed
/// as a product of binomials over the running exponent sums:
///
/// ```text
/// d! / ∏ αᵢ!  =  ∏_k C(α₁ + ⋯ + α_k, α_k)
/// ```
fn multinomial_weight<R: Float>(exponents: &[u32]) -> R {
    let mut sum = 0;
    let mut weight = 1.0;
    for &e in exponents {
        sum += e;
        weight *= binomial(sum, e);
    }
    real_from_f64(weight)
}

fn binomial(n: u32, k: u32) -> f64 {
    let k = k.min(n - k);
    let mut result = f64::one();
    for i in 0..k {
        result = result * f64::from(n - i) / f64::from(i + 1);
    }
    result
}
