//! CPU runtime implementation
//!
//! The CPU client is the reference implementation of every kernel contract.
//! Kernels fan out over rayon (behind the default `rayon` feature) and fall
//! back to a sequential loop without it; both paths run the same per-slice
//! code, so results do not depend on the worker count.

mod client;
pub(crate) mod sparse;

pub use client::CpuClient;
