//! Row-wise SpGEMM (Gustavson) - CPU implementation
//!
//! # Algorithm
//!
//! ```text
//! For each block of rows (in parallel, one accumulator per block, one block per worker):
//!   For each row i in the block:
//!     For each non-zero A[i,k]:
//!       For each non-zero B[k,j]:
//!         acc[j] += A[i,k] * B[k,j]
//!     Emit acc sorted by column, dropping exact zeros
//! Concatenate rows; row_ptrs is the running count of emitted entries
//! ```

use super::accumulator::{DenseAccumulator, HashAccumulator, RowAccumulator};
use crate::algorithm::sparse::{SpgemmAccumulator, validate_spgemm_shapes};
use crate::dtype::Element;
use crate::error::Result;
use crate::runtime::cpu::CpuClient;
use crate::sparse::CsrData;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "rayon")]
use std::ops::Range;
use tracing::{debug, trace};

/// Sparse `[M, K]` × sparse `[K, N]` → sparse `[M, N]`
pub(super) fn spgemm_csr<T: Element>(
    client: &CpuClient,
    a: &CsrData<T>,
    b: &CsrData<T>,
    accumulator: SpgemmAccumulator,
) -> Result<CsrData<T>> {
    a.validate()?;
    b.validate()?;
    let [m, n] = validate_spgemm_shapes(a, b)?;

    debug!(
        rows = m,
        inner = a.ncols(),
        cols = n,
        lhs_nnz = a.nnz(),
        rhs_nnz = b.nnz(),
        ?accumulator,
        dtype = %T::DTYPE,
        "spgemm_csr"
    );

    let rows = match accumulator {
        SpgemmAccumulator::Hash => multiply_rows(client, a, b, HashAccumulator::new),
        SpgemmAccumulator::Dense => multiply_rows(client, a, b, || DenseAccumulator::new(n)),
    };

    let total: usize = rows.iter().map(|(cols, _)| cols.len()).sum();
    let mut row_ptrs: Vec<i64> = Vec::with_capacity(m + 1);
    let mut col_indices: Vec<i64> = Vec::with_capacity(total);
    let mut values: Vec<T> = Vec::with_capacity(total);

    row_ptrs.push(0);
    for (cols, vals) in rows {
        col_indices.extend(cols);
        values.extend(vals);
        row_ptrs.push(col_indices.len() as i64);
    }

    trace!(nnz = total, "spgemm rows concatenated");

    Ok(CsrData {
        row_ptrs,
        col_indices,
        values,
        shape: [m, n],
        heads: 1,
    })
}

/// Compute every output row, in row order
///
/// Rows are split into contiguous blocks, at most one per worker, and each
/// block owns a single accumulator. The dense accumulator's `ncols` scratch
/// is therefore allocated at most once per worker.
fn multiply_rows<T, A, F>(
    client: &CpuClient,
    a: &CsrData<T>,
    b: &CsrData<T>,
    make_accumulator: F,
) -> Vec<(Vec<i64>, Vec<T>)>
where
    T: Element,
    A: RowAccumulator<T>,
    F: Fn() -> A + Sync + Send,
{
    #[cfg(feature = "rayon")]
    {
        let min_len = client.rayon_min_len();
        client.install_parallelism(|| {
            let blocks = row_blocks(a.nrows(), rayon::current_num_threads(), min_len);
            let per_block: Vec<Vec<(Vec<i64>, Vec<T>)>> = blocks
                .into_par_iter()
                .map(|rows| {
                    let mut acc = make_accumulator();
                    rows.map(|row| multiply_row(a, b, row, &mut acc)).collect()
                })
                .collect();
            per_block.into_iter().flatten().collect()
        })
    }

    #[cfg(not(feature = "rayon"))]
    {
        let _ = client;
        let mut acc = make_accumulator();
        (0..a.nrows())
            .map(|row| multiply_row(a, b, row, &mut acc))
            .collect()
    }
}

/// Split `0..nrows` into at most `workers` contiguous blocks of at least `min_len` rows
#[cfg(feature = "rayon")]
pub(super) fn row_blocks(nrows: usize, workers: usize, min_len: usize) -> Vec<Range<usize>> {
    if nrows == 0 {
        return Vec::new();
    }

    let block_len = nrows.div_ceil(workers.max(1)).max(min_len).max(1);
    (0..nrows)
        .step_by(block_len)
        .map(|start| start..(start + block_len).min(nrows))
        .collect()
}

#[inline]
fn multiply_row<T: Element, A: RowAccumulator<T>>(
    a: &CsrData<T>,
    b: &CsrData<T>,
    row: usize,
    acc: &mut A,
) -> (Vec<i64>, Vec<T>) {
    let (a_cols, a_vals) = a.row(row);

    for (&k, &a_val) in a_cols.iter().zip(a_vals) {
        let (b_cols, b_vals) = b.row(k as usize);
        for (&j, &b_val) in b_cols.iter().zip(b_vals) {
            acc.accumulate(j as usize, a_val * b_val);
        }
    }

    acc.drain_sorted()
}
