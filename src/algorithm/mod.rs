//! Algorithm contracts for runtime backends
//!
//! Every kernel is defined as a trait first, with its exact algorithm written
//! down in the trait docs, then implemented by each backend client. The CPU
//! client in [`crate::runtime::cpu`] is the reference implementation.
//!
//! # Available Algorithm Contracts
//!
//! - [`sparse::SparseAlgorithms`] - CSR × dense, multi-head CSR × dense, CSR × CSR

pub mod sparse;

pub use sparse::{HeadLayout, SparseAlgorithms, SpgemmAccumulator};
