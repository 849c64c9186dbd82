//! Compressed-row sparse matrices
//!
//! CSR is the only storage format: row pointers + column indices + values.
//! It is the natural layout for neighbourhood aggregation, where each row is
//! a node and its entries are the node's incoming edges.
//!
//! # Usage
//!
//! ```
//! use csr_spmm::sparse::CsrData;
//!
//! // Edge list of a 3-node graph
//! let src = [0i64, 0, 1, 2];
//! let dst = [1i64, 2, 2, 0];
//! let adj = CsrData::<f32>::from_edges(&src, &dst, [3, 3])?;
//!
//! assert_eq!(adj.row_ptrs(), &[0, 2, 3, 4]);
//! assert_eq!(adj.row_nnz(0), 2);
//! # Ok::<(), csr_spmm::error::Error>(())
//! ```

mod csr;

pub use csr::CsrData;
