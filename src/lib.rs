//! # csr-spmm
//!
//! **Compressed-row sparse matrix multiplication kernels for graph aggregation.**
//!
//! Each sparse row is a node's incoming edges and each dense row a node
//! feature vector, so `A · X` is weighted neighbour aggregation. The
//! multi-head variants give every edge one weight per attention head, as
//! multi-head graph-attention layers do.
//!
//! ## Kernels
//!
//! - **CSR × dense**: `[R, K] · [K, C] → [R, C]`
//! - **Multi-head CSR × dense**: `[R, K] (H weights per edge) · [N, H, D] → [R, H, D]`
//! - **Multi-head CSR × packed dense**: same, with `[N, H*D]` operands
//! - **CSR × CSR**: row-wise Gustavson SpGEMM with a hash or dense-scratch accumulator
//!
//! Kernels are pure: inputs are borrowed, results are freshly allocated, and
//! every shape or structure error is reported before any work starts.
//!
//! ## Quick Start
//!
//! ```rust
//! use csr_spmm::prelude::*;
//!
//! // A = [[1, 2], [3, 4]]
//! let a = CsrData::from_slices(&[0, 2, 4], &[0, 1, 0, 1], &[1.0f64, 2.0, 3.0, 4.0], [2, 2])?;
//! let x = Tensor::from_slice(&[1.0f64, 0.0, 0.0, 1.0], &[2, 2]);
//!
//! let client = CpuClient::new().with_parallelism(ParallelismConfig::new(Some(2), None));
//! let y = client.spmm_csr_dense(&a, &x)?;
//! assert_eq!(y.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
//! # Ok::<(), csr_spmm::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): Multi-threaded kernels

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod algorithm;
pub mod dtype;
pub mod error;
pub mod runtime;
pub mod sparse;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithm::{HeadLayout, SparseAlgorithms, SpgemmAccumulator};
    pub use crate::dtype::{DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::runtime::ParallelismConfig;
    pub use crate::runtime::cpu::CpuClient;
    pub use crate::sparse::CsrData;
    pub use crate::tensor::{Layout, Tensor};
}
