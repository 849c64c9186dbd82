//! Property-based tests for the sparse kernels.
//!
//! Key invariants tested:
//! - `A · I` reproduces the dense expansion of `A`
//! - a one-head multi-head product equals the plain dense product
//! - the packed `[N, H*D]` variant equals the 3-D variant, in `f64` and `f32`
//! - multi-head results match a naive reference when `N != K`
//! - results do not depend on the worker count
//! - SpGEMM equals the dense product of the densified operands
//! - hash and dense-scratch accumulators produce the same matrix

mod common;

use common::{
    assert_allclose_f64, create_cpu_client, create_cpu_client_with_threads, reference_dense,
    reference_matmul, reference_multihead,
};
use csr_spmm::prelude::*;
use proptest::prelude::*;

// ── strategies ───────────────────────────────────────────────────────────────

/// Random `[rows, cols]` CSR matrix with `heads` values per entry.
///
/// Coordinates may repeat and rows may be empty.
fn arb_csr(rows: usize, cols: usize, heads: usize) -> impl Strategy<Value = CsrData<f64>> {
    arb_csr_bounded(rows, cols, cols, heads)
}

/// Like [`arb_csr`], with every column index below `col_limit` (`1 <= col_limit <= cols`).
fn arb_csr_bounded(
    rows: usize,
    cols: usize,
    col_limit: usize,
    heads: usize,
) -> impl Strategy<Value = CsrData<f64>> {
    let entry = (0..rows as i64, 0..col_limit as i64);
    prop::collection::vec(entry, 0..=rows * cols + 2).prop_flat_map(move |coords| {
        let nnz = coords.len();
        prop::collection::vec(-4.0f64..4.0, nnz * heads).prop_map(move |values| {
            let (r, c): (Vec<i64>, Vec<i64>) = coords.iter().copied().unzip();
            let pattern = CsrData::from_coo(&r, &c, &vec![0.0; r.len()], [rows, cols]).unwrap();
            CsrData::with_heads(
                pattern.row_ptrs().to_vec(),
                pattern.col_indices().to_vec(),
                values,
                [rows, cols],
                heads,
            )
            .unwrap()
        })
    })
}

/// Random dense tensor of the given shape.
fn arb_tensor(shape: Vec<usize>) -> impl Strategy<Value = Tensor<f64>> {
    let numel = shape.iter().product::<usize>();
    prop::collection::vec(-4.0f64..4.0, numel)
        .prop_map(move |data| Tensor::from_vec(data, &shape).unwrap())
}

/// Sparse `[R, K]` plus dense `[K, C]`.
fn arb_spmm_case() -> impl Strategy<Value = (CsrData<f64>, Tensor<f64>)> {
    (1usize..8, 1usize..8, 1usize..6)
        .prop_flat_map(|(r, k, c)| (arb_csr(r, k, 1), arb_tensor(vec![k, c])))
}

/// Multi-head sparse `[R, K]` plus dense `[N, H, D]`.
///
/// `K` and `N` vary independently; column indices stay below both.
fn arb_multihead_case() -> impl Strategy<Value = (CsrData<f64>, Tensor<f64>)> {
    (1usize..7, 1usize..7, 1usize..7, 1usize..4, 1usize..5).prop_flat_map(|(r, k, n, h, d)| {
        (arb_csr_bounded(r, k, k.min(n), h), arb_tensor(vec![n, h, d]))
    })
}

/// Narrow a multi-head case to `f32`.
fn to_f32_case(a: &CsrData<f64>, b: &Tensor<f64>) -> (CsrData<f32>, Tensor<f32>) {
    let a32 = CsrData::with_heads(
        a.row_ptrs().to_vec(),
        a.col_indices().to_vec(),
        a.values().iter().map(|&v| v as f32).collect(),
        a.shape(),
        a.heads(),
    )
    .unwrap();
    let b32 = Tensor::from_vec(b.as_slice().iter().map(|&v| v as f32).collect(), b.shape()).unwrap();
    (a32, b32)
}

/// Sparse `[M, K]` plus sparse `[K, N]`.
fn arb_spgemm_case() -> impl Strategy<Value = (CsrData<f64>, CsrData<f64>)> {
    (1usize..7, 1usize..7, 1usize..7)
        .prop_flat_map(|(m, k, n)| (arb_csr(m, k, 1), arb_csr(k, n, 1)))
}

// ── dense kernel ─────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Multiplying by the identity expands A, summing repeated coordinates.
    #[test]
    fn prop_identity_expands_matrix(a in (1usize..8, 1usize..8).prop_flat_map(|(r, k)| arb_csr(r, k, 1))) {
        let client = create_cpu_client();
        let out = client.spmm_csr_dense(&a, &Tensor::eye(a.ncols())).unwrap();

        prop_assert_eq!(out.shape(), &[a.nrows(), a.ncols()]);
        assert_allclose_f64(out.as_slice(), &reference_dense(&a), 1e-12, 1e-12, "A * I");
    }

    /// The kernel agrees with a triple-loop product of the densified matrix.
    #[test]
    fn prop_spmm_matches_dense_reference((a, b) in arb_spmm_case()) {
        let client = create_cpu_client();
        let out = client.spmm_csr_dense(&a, &b).unwrap();

        let [r, k] = a.shape();
        let c = b.shape()[1];
        let expected = reference_matmul(&reference_dense(&a), b.as_slice(), r, k, c);
        assert_allclose_f64(out.as_slice(), &expected, 1e-9, 1e-9, "spmm");
    }

    /// One worker or four, every output element is bitwise identical.
    #[test]
    fn prop_spmm_independent_of_worker_count((a, b) in arb_spmm_case()) {
        let single = create_cpu_client_with_threads(1).spmm_csr_dense(&a, &b).unwrap();
        let multi = create_cpu_client_with_threads(4).spmm_csr_dense(&a, &b).unwrap();
        prop_assert_eq!(single.as_slice(), multi.as_slice());
    }
}

// ── multi-head kernels ───────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// With a single head the 3-D kernel is the dense kernel on `[N, D]`.
    #[test]
    fn prop_single_head_matches_dense(
        (a, b) in (1usize..7, 1usize..7, 1usize..5)
            .prop_flat_map(|(r, n, d)| (arb_csr(r, n, 1), arb_tensor(vec![n, 1, d])))
    ) {
        let client = create_cpu_client();
        let [n, _, d] = [b.shape()[0], b.shape()[1], b.shape()[2]];

        let multi = client.spmm_csr_multihead(&a, &b).unwrap();
        let dense = client.spmm_csr_dense(&a, &b.reshape(&[n, d]).unwrap()).unwrap();

        prop_assert_eq!(multi.shape(), &[a.nrows(), 1, d]);
        prop_assert_eq!(multi.as_slice(), dense.as_slice());
    }

    /// The packed variant is the 3-D variant with the last two axes merged.
    #[test]
    fn prop_flat_matches_3d((a, b) in arb_multihead_case()) {
        let client = create_cpu_client();
        let [n, h, d] = [b.shape()[0], b.shape()[1], b.shape()[2]];

        let out_3d = client.spmm_csr_multihead(&a, &b).unwrap();
        let out_flat = client
            .spmm_csr_multihead_flat(&a, &b.reshape(&[n, h * d]).unwrap())
            .unwrap();

        prop_assert_eq!(out_flat.shape(), &[a.nrows(), h * d]);
        prop_assert_eq!(out_flat.as_slice(), out_3d.as_slice());
    }

    /// The 3-D result matches a naive per-head reference, whether the node
    /// count is smaller or larger than the sparse column count.
    #[test]
    fn prop_multihead_matches_reference((a, b) in arb_multihead_case()) {
        let client = create_cpu_client();
        let [h, d] = [b.shape()[1], b.shape()[2]];
        let out = client.spmm_csr_multihead(&a, &b).unwrap();

        let expected = reference_multihead(&a, b.as_slice(), h, d);
        assert_allclose_f64(out.as_slice(), &expected, 1e-9, 1e-9, "multihead");
    }

    /// Packed and 3-D layouts agree in `f32` as well.
    #[test]
    fn prop_flat_matches_3d_f32((a, b) in arb_multihead_case()) {
        let (a, b) = to_f32_case(&a, &b);
        let client = create_cpu_client();
        let [n, h, d] = [b.shape()[0], b.shape()[1], b.shape()[2]];

        let out_3d = client.spmm_csr_multihead(&a, &b).unwrap();
        let out_flat = client
            .spmm_csr_multihead_flat(&a, &b.reshape(&[n, h * d]).unwrap())
            .unwrap();

        prop_assert_eq!(out_flat.as_slice(), out_3d.as_slice());
    }

    /// Worker count never changes multi-head results.
    #[test]
    fn prop_multihead_independent_of_worker_count((a, b) in arb_multihead_case()) {
        let single = create_cpu_client_with_threads(1).spmm_csr_multihead(&a, &b).unwrap();
        let multi = create_cpu_client_with_threads(3).spmm_csr_multihead(&a, &b).unwrap();
        prop_assert_eq!(single.as_slice(), multi.as_slice());
    }
}

// ── SpGEMM ───────────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Densifying the sparse product gives the dense product.
    #[test]
    fn prop_spgemm_matches_dense((a, b) in arb_spgemm_case()) {
        let client = create_cpu_client();
        let c = client.spgemm_csr(&a, &b).unwrap();

        let [m, k] = a.shape();
        let n = b.ncols();
        prop_assert_eq!(c.shape(), [m, n]);

        let expected = reference_matmul(&reference_dense(&a), &reference_dense(&b), m, k, n);
        assert_allclose_f64(&reference_dense(&c), &expected, 1e-9, 1e-9, "spgemm");
    }

    /// Output rows are strictly increasing in column and hold no exact zeros.
    #[test]
    fn prop_spgemm_rows_sorted_without_zeros((a, b) in arb_spgemm_case()) {
        let c = create_cpu_client().spgemm_csr(&a, &b).unwrap();

        prop_assert!(c.validate().is_ok());
        for row in 0..c.nrows() {
            let (cols, vals) = c.row(row);
            prop_assert!(cols.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(vals.iter().all(|&v| v != 0.0));
        }
    }

    /// Both accumulators and any worker count give the same matrix.
    #[test]
    fn prop_spgemm_accumulators_agree((a, b) in arb_spgemm_case()) {
        let hash = create_cpu_client_with_threads(1)
            .spgemm_csr_with_accumulator(&a, &b, SpgemmAccumulator::Hash)
            .unwrap();
        let dense = create_cpu_client_with_threads(4)
            .spgemm_csr_with_accumulator(&a, &b, SpgemmAccumulator::Dense)
            .unwrap();
        prop_assert_eq!(hash, dense);
    }
}
