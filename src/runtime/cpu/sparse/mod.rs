//! Sparse kernels for the CPU client
//!
//! This module implements the [`SparseAlgorithms`] contract for [`CpuClient`].

use super::CpuClient;
use crate::algorithm::sparse::{SparseAlgorithms, SpgemmAccumulator};
use crate::dtype::Element;
use crate::error::Result;
use crate::sparse::CsrData;
use crate::tensor::Tensor;

// Submodules
mod accumulator;
mod spgemm;
mod spmm;

// ============================================================================
// SparseAlgorithms Trait Implementation
// ============================================================================

impl<T: Element> SparseAlgorithms<T> for CpuClient {
    fn spmm_csr_dense(&self, a: &CsrData<T>, dense: &Tensor<T>) -> Result<Tensor<T>> {
        spmm::spmm_csr_dense(self, a, dense)
    }

    fn spmm_csr_multihead(&self, a: &CsrData<T>, dense: &Tensor<T>) -> Result<Tensor<T>> {
        spmm::spmm_csr_multihead(self, a, dense)
    }

    fn spmm_csr_multihead_flat(&self, a: &CsrData<T>, dense: &Tensor<T>) -> Result<Tensor<T>> {
        spmm::spmm_csr_multihead_flat(self, a, dense)
    }

    fn spgemm_csr_with_accumulator(
        &self,
        a: &CsrData<T>,
        b: &CsrData<T>,
        accumulator: SpgemmAccumulator,
    ) -> Result<CsrData<T>> {
        spgemm::spgemm_csr(self, a, b, accumulator)
    }
}
