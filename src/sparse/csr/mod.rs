//! CSR (Compressed Sparse Row) format

mod conversion;
mod core;

pub use core::CsrData;
