//! Fast evaluation of fixed multivariate polynomials and their derivatives.
//!
//! This crate is optimized for numeric pipelines (root-finding, homotopy
//! continuation) that evaluate the same polynomial system at thousands of
//! points: the polynomial structure is fixed at construction, everything
//! derivable from it (derivative term stores, power tables, scratch
//! buffers) is precomputed once, and the repeated calls are allocation-free.
//!
//! A [`Polynomial`] is not suited for algebraic manipulation; construct the
//! normalized term list with a general-purpose polynomial library and hand
//! it over once.
//!
//! ```
//! use polyeval::{GradientConfig, Polynomial};
//!
//! // f = x^2 + y^3 z - 2 x y
//! let f = Polynomial::new(
//!     vec![vec![2, 0, 0], vec![0, 3, 1], vec![1, 1, 0]],
//!     vec![1.0, 1.0, -2.0],
//!     vec!["x".into(), "y".into(), "z".into()],
//! )
//! .unwrap();
//!
//! // Build once, evaluate many times with no per-call allocation.
//! let mut cfg = GradientConfig::new(&f);
//! let x = [1.0, 2.0, 3.0];
//! assert_eq!(cfg.evaluate(&x).unwrap(), f.evaluate(&x).unwrap());
//! let grad = cfg.gradient(&x).unwrap();
//! assert_eq!(grad[0], 2.0 * x[0] - 2.0 * x[1]);
//! ```
//!
//! # Precision
//!
//! Evaluation uses a multivariate variant of Horner's method. For
//! polynomials containing a term of total degree greater than 43, an error
//! below 1 unit in the last place is not guaranteed.

pub mod errors;
pub mod eval;
pub mod poly;
pub mod scalar;
pub mod weyl;

pub use errors::PolyError;
pub use eval::{
    GradientConfig, GradientDiffResult, JacobianConfig, JacobianDiffResult,
    PolynomialEvaluationArray,
};
pub use poly::Polynomial;
pub use scalar::Scalar;
pub use weyl::{weyldot, weyldot_system, weylnorm, weylnorm_system};
