//! Sparse × Dense Matrix Multiplication (SpMM) - CPU implementation
//!
//! One traversal serves the 2-D, 3-D multi-head and flattened multi-head
//! products. They differ only in the [`HeadLayout`] used to address the
//! dense operand.
//!
//! # Algorithm
//!
//! Output-owned partitioning over `(row, head)` slices:
//! ```text
//! For each output slice s = row * H + head (in parallel):
//!   out[row, head, :] = 0
//!   For each entry e in row:
//!     w = values[e * H + head]
//!     out[row, head, :] += w * dense[col[e], head, :]
//! ```
//!
//! Slices are disjoint `head_dim`-wide chunks of the output buffer, so every
//! output element has exactly one writer.

use crate::algorithm::sparse::{
    HeadLayout, validate_column_bounds, validate_multihead_flat_shapes,
    validate_multihead_shapes, validate_spmm_shapes,
};
use crate::dtype::Element;
use crate::error::Result;
use crate::runtime::cpu::CpuClient;
use crate::sparse::CsrData;
use crate::tensor::Tensor;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::{debug, trace};

/// Sparse `[R, K]` × dense `[K, C]`
pub(super) fn spmm_csr_dense<T: Element>(
    client: &CpuClient,
    a: &CsrData<T>,
    dense: &Tensor<T>,
) -> Result<Tensor<T>> {
    a.validate()?;
    let ([m, c], layout) = validate_spmm_shapes(a, dense.shape())?;

    debug!(
        rows = m,
        cols = a.ncols(),
        nnz = a.nnz(),
        features = c,
        dtype = %T::DTYPE,
        "spmm_csr_dense"
    );

    let out = spmm_rows(client, a, dense.as_slice(), layout);
    Tensor::from_vec(out, &[m, c])
}

/// Multi-head sparse × dense `[N, H, D]`
pub(super) fn spmm_csr_multihead<T: Element>(
    client: &CpuClient,
    a: &CsrData<T>,
    dense: &Tensor<T>,
) -> Result<Tensor<T>> {
    a.validate()?;
    let (nodes, layout) = validate_multihead_shapes(a, dense.shape())?;
    validate_column_bounds(a, nodes)?;

    debug!(
        rows = a.nrows(),
        nodes,
        nnz = a.nnz(),
        heads = layout.heads,
        head_dim = layout.head_dim,
        dtype = %T::DTYPE,
        "spmm_csr_multihead"
    );

    let out = spmm_rows(client, a, dense.as_slice(), layout);
    Tensor::from_vec(out, &[a.nrows(), layout.heads, layout.head_dim])
}

/// Multi-head sparse × packed dense `[N, H*D]`
pub(super) fn spmm_csr_multihead_flat<T: Element>(
    client: &CpuClient,
    a: &CsrData<T>,
    dense: &Tensor<T>,
) -> Result<Tensor<T>> {
    a.validate()?;
    let (nodes, layout) = validate_multihead_flat_shapes(a, dense.shape())?;
    validate_column_bounds(a, nodes)?;

    debug!(
        rows = a.nrows(),
        nodes,
        nnz = a.nnz(),
        heads = layout.heads,
        head_stride = layout.head_dim,
        dtype = %T::DTYPE,
        "spmm_csr_multihead_flat"
    );

    let out = spmm_rows(client, a, dense.as_slice(), layout);
    Tensor::from_vec(out, &[a.nrows(), layout.row_width()])
}

/// Shared traversal: fills a fresh `[R, H * head_dim]` buffer
///
/// Callers must have validated `a` against `dense` and `layout`.
fn spmm_rows<T: Element>(
    client: &CpuClient,
    a: &CsrData<T>,
    dense: &[T],
    layout: HeadLayout,
) -> Vec<T> {
    let mut out = vec![T::zero(); a.nrows() * layout.row_width()];
    if out.is_empty() {
        return out;
    }

    let fill = |(slot, out_slice): (usize, &mut [T])| {
        accumulate_slice(
            a,
            dense,
            layout,
            slot / layout.heads,
            slot % layout.heads,
            out_slice,
        );
    };

    #[cfg(feature = "rayon")]
    {
        let min_len = client.rayon_min_len();
        client.install_parallelism(|| {
            out.par_chunks_mut(layout.head_dim)
                .enumerate()
                .with_min_len(min_len)
                .for_each(fill);
        });
    }

    #[cfg(not(feature = "rayon"))]
    {
        let _ = client;
        out.chunks_mut(layout.head_dim).enumerate().for_each(fill);
    }

    trace!(output_len = out.len(), "spmm slices filled");
    out
}

/// Accumulate one `(row, head)` output slice
#[inline]
fn accumulate_slice<T: Element>(
    a: &CsrData<T>,
    dense: &[T],
    layout: HeadLayout,
    row: usize,
    head: usize,
    out: &mut [T],
) {
    let stride = layout.row_width();
    let offset = head * layout.head_dim;
    let (cols, weights) = a.row(row);

    for (e, &col) in cols.iter().enumerate() {
        let w = weights[e * layout.heads + head];
        let base = col as usize * stride + offset;
        let src = &dense[base..base + layout.head_dim];

        for (o, &x) in out.iter_mut().zip(src) {
            *o = o.mul_acc(w, x);
        }
    }
}
