//! Common test utilities
#![allow(dead_code)]

use csr_spmm::prelude::*;

/// Create a client on the global pool
pub fn create_cpu_client() -> CpuClient {
    CpuClient::new()
}

/// Create a client with a dedicated pool of `threads` workers and one slice per task
pub fn create_cpu_client_with_threads(threads: usize) -> CpuClient {
    CpuClient::new().with_parallelism(ParallelismConfig::new(Some(threads), Some(1)))
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert two f32 slices are close within tolerance
pub fn assert_allclose_f32(a: &[f32], b: &[f32], rtol: f32, atol: f32, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Reference dense expansion: `[i][j]` is the sum of all entries at (i, j)
pub fn reference_dense(csr: &CsrData<f64>) -> Vec<f64> {
    let [nrows, ncols] = csr.shape();
    let mut out = vec![0.0; nrows * ncols];
    for row in 0..nrows {
        let (cols, vals) = csr.row(row);
        for (&c, &v) in cols.iter().zip(vals) {
            out[row * ncols + c as usize] += v;
        }
    }
    out
}

/// Reference triple-loop dense product `[m, k] x [k, n]`
pub fn reference_matmul(a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Vec<f64> {
    let mut out = vec![0.0; m * n];
    for i in 0..m {
        for p in 0..k {
            let av = a[i * k + p];
            for j in 0..n {
                out[i * n + j] += av * b[p * n + j];
            }
        }
    }
    out
}

/// Reference multi-head aggregation over a row-major `[N, heads * head_dim]` buffer
pub fn reference_multihead(
    csr: &CsrData<f64>,
    dense: &[f64],
    heads: usize,
    head_dim: usize,
) -> Vec<f64> {
    let width = heads * head_dim;
    let mut out = vec![0.0; csr.nrows() * width];
    for row in 0..csr.nrows() {
        let (cols, weights) = csr.row(row);
        for (e, &c) in cols.iter().enumerate() {
            for h in 0..heads {
                let w = weights[e * heads + h];
                let src = c as usize * width + h * head_dim;
                let dst = row * width + h * head_dim;
                for d in 0..head_dim {
                    out[dst + d] += w * dense[src + d];
                }
            }
        }
    }
    out
}

/// Collect (row, col, value) triples of a CSR matrix
pub fn triples(csr: &CsrData<f64>) -> Vec<(usize, i64, f64)> {
    let mut out = Vec::with_capacity(csr.nnz());
    for row in 0..csr.nrows() {
        let (cols, vals) = csr.row(row);
        out.extend(cols.iter().zip(vals).map(|(&c, &v)| (row, c, v)));
    }
    out
}
