//! Error types for polynomial construction and evaluation.

use thiserror::Error;

/// Everything that can go wrong when building or evaluating polynomials.
///
/// All variants are surfaced synchronously at construction or call time;
/// there is no transient failure mode and nothing is retried internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolyError {
    /// The coordinate vector does not match the polynomial's variable count,
    /// or an output buffer does not match the expected result size.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// The length the operation requires.
        expected: usize,
        /// The length the caller supplied.
        got: usize,
    },

    /// An exponent column has the wrong number of rows.
    #[error("exponent column {term} has {got} rows, expected {expected}")]
    RaggedExponents {
        /// Index of the offending column.
        term: usize,
        /// The variable count every column must match.
        expected: usize,
        /// The row count the column actually has.
        got: usize,
    },

    /// The coefficient vector is not index-aligned with the exponent columns.
    #[error("{coefficients} coefficients for {terms} exponent columns")]
    CoefficientCountMismatch {
        /// Number of coefficients supplied.
        coefficients: usize,
        /// Number of exponent columns supplied.
        terms: usize,
    },

    /// Two exponent columns are identical. Input must be a normalized term
    /// list with like terms already combined.
    #[error("duplicate exponent column at term {term}")]
    DuplicateTerm {
        /// Index (after sorting) of the repeated column.
        term: usize,
    },

    /// Polynomials combined into a system or array do not share an identical
    /// variable ordering.
    #[error("polynomials do not share an identical variable ordering")]
    VariableMismatch,

    /// The array shape does not multiply out to the number of polynomials.
    #[error("shape {shape:?} does not match {len} polynomials")]
    ShapeMismatch {
        /// The requested array shape.
        shape: Vec<usize>,
        /// The number of polynomials supplied.
        len: usize,
    },

    /// A system or array was built from an empty polynomial collection.
    #[error("the collection contains no polynomials")]
    EmptySystem,

    /// The operation is only defined for homogeneous polynomials.
    #[error("{operation} requires homogeneous polynomials")]
    NotHomogeneous {
        /// Name of the operation that was attempted.
        operation: &'static str,
    },

    /// Two polynomials were expected to have equal total degree.
    #[error("total degrees differ: {lhs} vs {rhs}")]
    DegreeMismatch {
        /// Total degree of the left operand.
        lhs: u32,
        /// Total degree of the right operand.
        rhs: u32,
    },

    /// A degree-based operation was applied to a polynomial with no terms.
    #[error("operation is undefined for a polynomial with no terms")]
    EmptyPolynomial,

    /// Componentwise operations require equally long polynomial vectors.
    #[error("expected {expected} polynomials, got {got}")]
    LengthMismatch {
        /// Length of the left vector.
        expected: usize,
        /// Length of the right vector.
        got: usize,
    },
}
