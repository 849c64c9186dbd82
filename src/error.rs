//! Error types for csr-spmm

use thiserror::Error;

/// Result type alias using the crate's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sparse kernel calls
///
/// Every kernel detects these before any numeric work begins, so an error
/// never comes with a partial result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Operand dimensions are incompatible for the requested product
    #[error("Invalid dimension for {op}: {lhs} vs {rhs}")]
    InvalidDimension {
        /// Which pair of dimensions was compared
        op: &'static str,
        /// Dimension taken from the left-hand (sparse) operand
        lhs: usize,
        /// Dimension taken from the right-hand operand
        rhs: usize,
    },

    /// A derived size cannot be computed because it does not divide evenly
    #[error("Invalid shape for {op}: size {size} is not divisible by {factor}")]
    InvalidShape {
        /// Which derived quantity was being computed
        op: &'static str,
        /// The size being divided
        size: usize,
        /// The expected factor
        factor: usize,
    },

    /// An index points outside the valid range of an operand
    #[error("Index {index} out of range for dimension of size {size}")]
    IndexOutOfRange {
        /// The offending index
        index: i64,
        /// Size of the dimension it indexes
        size: usize,
    },

    /// Compressed-row structure violates its invariants
    #[error("Malformed CSR structure: {reason}")]
    MalformedStructure {
        /// Which invariant was violated
        reason: String,
    },

    /// Buffer length does not match the requested tensor shape
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

impl Error {
    /// Create a dimension mismatch error
    pub fn invalid_dimension(op: &'static str, lhs: usize, rhs: usize) -> Self {
        Self::InvalidDimension { op, lhs, rhs }
    }

    /// Create a malformed structure error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedStructure {
            reason: reason.into(),
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }
}
