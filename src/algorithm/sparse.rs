//! Sparse algorithm contracts
//!
//! This module defines the kernel contract every backend client implements,
//! together with the shape validation shared by all of them. Validation runs
//! in full before any output is allocated, so a failing call never produces a
//! partial result.

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::sparse::CsrData;
use crate::tensor::Tensor;

/// Algorithmic contract for compressed-row multiplication kernels
///
/// # Algorithms Defined
///
/// - **Row/head-owned SpMM**: sparse × dense aggregation
///   - Output is cut into disjoint `(row, head)` slices of `head_dim` elements
///   - Each slice is written by exactly one worker; no locks, no atomics
///   - 2-D, 3-D multi-head and flattened multi-head products all run this
///     one traversal with a different [`HeadLayout`]
///
/// - **Row-wise SpGEMM**: sparse × sparse multiplication (Gustavson)
///   - For each row i of A, for each A[i,k], for each B[k,j]: acc[j] += A[i,k] * B[k,j]
///   - Accumulator is a per-row map keyed by output column (see [`SpgemmAccumulator`])
///   - Output columns sorted ascending; exact-zero sums are dropped
///
/// # Precision
///
/// Every kernel accumulates in `T` itself.
pub trait SparseAlgorithms<T: Element> {
    /// Sparse `[R, K]` × dense `[K, C]` → dense `[R, C]`
    ///
    /// ```text
    /// out[i][:] = Σ_{e in row i} values[e] * dense[col[e]][:]
    /// ```
    ///
    /// # Errors
    ///
    /// - `InvalidDimension` if `K` differs from the dense row count, or the
    ///   sparse matrix carries more than one head
    /// - `MalformedStructure` / `IndexOutOfRange` if `a` is malformed
    fn spmm_csr_dense(&self, a: &CsrData<T>, dense: &Tensor<T>) -> Result<Tensor<T>>;

    /// Multi-head sparse × dense `[N, H, D]` → dense `[R, H, D]`
    ///
    /// ```text
    /// out[i][h][d] = Σ_{e in row i} weights[e][h] * dense[col[e]][h][d]
    /// ```
    ///
    /// `a.heads()` supplies `H`. Heads never interact.
    ///
    /// # Errors
    ///
    /// - `InvalidDimension` if `dense` is not 3-D or its head axis differs from `a.heads()`
    /// - `IndexOutOfRange` if a column index is `>= N`
    fn spmm_csr_multihead(&self, a: &CsrData<T>, dense: &Tensor<T>) -> Result<Tensor<T>>;

    /// Multi-head product with the head and feature axes packed: `[N, H*D]` → `[R, H*D]`
    ///
    /// Per-head slices are located with `head_stride = width / H`. Produces the
    /// same numbers as [`Self::spmm_csr_multihead`] on the equivalent 3-D input.
    ///
    /// # Errors
    ///
    /// - `InvalidShape` if the packed width is not divisible by `a.heads()`
    /// - `InvalidDimension` if `dense` is not 2-D
    /// - `IndexOutOfRange` if a column index is `>= N`
    fn spmm_csr_multihead_flat(&self, a: &CsrData<T>, dense: &Tensor<T>) -> Result<Tensor<T>>;

    /// Sparse `[R, K]` × sparse `[K, C]` → sparse `[R, C]` with the hash accumulator
    fn spgemm_csr(&self, a: &CsrData<T>, b: &CsrData<T>) -> Result<CsrData<T>> {
        self.spgemm_csr_with_accumulator(a, b, SpgemmAccumulator::Hash)
    }

    /// Sparse × sparse with an explicit row accumulator
    ///
    /// # Errors
    ///
    /// - `InvalidDimension` if A's column count differs from B's row count, or
    ///   either operand carries more than one head
    fn spgemm_csr_with_accumulator(
        &self,
        a: &CsrData<T>,
        b: &CsrData<T>,
        accumulator: SpgemmAccumulator,
    ) -> Result<CsrData<T>>;
}

/// Per-row accumulator used by sparse × sparse multiplication
///
/// Both produce identical output; they differ only in cost profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SpgemmAccumulator {
    /// `HashMap<column, sum>` per row. Memory proportional to the row's output nnz.
    #[default]
    Hash,
    /// Dense scratch array of `ncols` slots per worker, cleared lazily through a
    /// touched-index list. No hashing; better when output rows are dense-ish.
    Dense,
}

/// How one row of a dense operand splits into heads
///
/// A `[N, H, D]` tensor and a `[N, H*D]` tensor share the same buffer layout,
/// so both are described by `heads = H, head_dim = D`. A plain `[N, C]`
/// operand is `heads = 1, head_dim = C`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadLayout {
    /// Number of independent heads
    pub heads: usize,
    /// Features per head
    pub head_dim: usize,
}

impl HeadLayout {
    /// Elements in one full row (`heads * head_dim`)
    #[inline]
    pub fn row_width(&self) -> usize {
        self.heads * self.head_dim
    }
}

// ============================================================================
// Validation Helpers (Shared across backends)
// ============================================================================

/// Validate shapes for sparse × 2-D dense
///
/// Returns the output shape `[R, C]` and the head layout to run with.
pub fn validate_spmm_shapes<T: Element>(
    a: &CsrData<T>,
    dense_shape: &[usize],
) -> Result<([usize; 2], HeadLayout)> {
    if a.heads() != 1 {
        return Err(Error::invalid_dimension("sparse heads vs 1", a.heads(), 1));
    }

    let &[k, c] = dense_shape else {
        return Err(Error::invalid_dimension(
            "dense rank vs 2",
            dense_shape.len(),
            2,
        ));
    };

    if a.ncols() != k {
        return Err(Error::invalid_dimension(
            "sparse cols vs dense rows",
            a.ncols(),
            k,
        ));
    }

    Ok((
        [a.nrows(), c],
        HeadLayout {
            heads: 1,
            head_dim: c,
        },
    ))
}

/// Validate shapes for multi-head sparse × 3-D dense `[N, H, D]`
///
/// Returns the dense node count `N` and the head layout.
pub fn validate_multihead_shapes<T: Element>(
    a: &CsrData<T>,
    dense_shape: &[usize],
) -> Result<(usize, HeadLayout)> {
    let &[n, h, d] = dense_shape else {
        return Err(Error::invalid_dimension(
            "dense rank vs 3",
            dense_shape.len(),
            3,
        ));
    };

    if a.heads() != h {
        return Err(Error::invalid_dimension("sparse heads vs dense heads", a.heads(), h));
    }

    Ok((
        n,
        HeadLayout {
            heads: h,
            head_dim: d,
        },
    ))
}

/// Validate shapes for multi-head sparse × packed dense `[N, H*D]`
///
/// Derives `head_stride = width / H`. Returns the dense node count `N` and
/// the head layout.
pub fn validate_multihead_flat_shapes<T: Element>(
    a: &CsrData<T>,
    dense_shape: &[usize],
) -> Result<(usize, HeadLayout)> {
    let &[n, width] = dense_shape else {
        return Err(Error::invalid_dimension(
            "dense rank vs 2",
            dense_shape.len(),
            2,
        ));
    };

    let heads = a.heads();
    if width % heads != 0 {
        return Err(Error::InvalidShape {
            op: "head stride",
            size: width,
            factor: heads,
        });
    }

    Ok((
        n,
        HeadLayout {
            heads,
            head_dim: width / heads,
        },
    ))
}

/// Validate CSR matrix dimensions for SpGEMM
///
/// Returns the output shape `[R, C]`.
pub fn validate_spgemm_shapes<T: Element>(a: &CsrData<T>, b: &CsrData<T>) -> Result<[usize; 2]> {
    if a.heads() != 1 || b.heads() != 1 {
        return Err(Error::invalid_dimension(
            "sparse heads vs 1",
            a.heads().max(b.heads()),
            1,
        ));
    }

    let [m, k_a] = a.shape();
    let [k_b, n] = b.shape();

    if k_a != k_b {
        return Err(Error::invalid_dimension("lhs cols vs rhs rows", k_a, k_b));
    }

    Ok([m, n])
}

/// Check every column index against a dense node count
///
/// Column indices are already known to be `< a.ncols()`, so the scan only
/// runs when the sparse column count exceeds the node count.
pub fn validate_column_bounds<T: Element>(a: &CsrData<T>, nodes: usize) -> Result<()> {
    if a.ncols() <= nodes {
        return Ok(());
    }

    match a.col_indices().iter().find(|&&c| c as usize >= nodes) {
        Some(&c) => Err(Error::IndexOutOfRange {
            index: c,
            size: nodes,
        }),
        None => Ok(()),
    }
}
