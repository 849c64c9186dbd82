//! Core CSR implementation: struct, validation, getters

use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::tensor::Tensor;
use std::ops::Range;

/// CSR (Compressed Sparse Row) sparse matrix data
///
/// Row `i` owns the half-open entry range `row_ptrs[i]..row_ptrs[i + 1]`.
/// Column indices within a row need not be sorted, and a column may repeat;
/// kernels sum repeated entries.
///
/// Each entry carries `heads` consecutive values (`heads == 1` for an
/// ordinary scalar matrix). Entry `e`, head `h` is `values[e * heads + h]`,
/// which is exactly the row-major layout of an `[nnz, heads]` edge-weight
/// tensor.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrData<T: Element> {
    pub(crate) row_ptrs: Vec<i64>,
    pub(crate) col_indices: Vec<i64>,
    pub(crate) values: Vec<T>,
    pub(crate) shape: [usize; 2],
    pub(crate) heads: usize,
}

impl<T: Element> CsrData<T> {
    /// Create a new CSR matrix from components
    ///
    /// # Arguments
    ///
    /// * `row_ptrs` - Row pointers (length: nrows + 1)
    /// * `col_indices` - Column index of each non-zero
    /// * `values` - Value of each non-zero
    /// * `shape` - Matrix shape [nrows, ncols]
    ///
    /// # Errors
    ///
    /// Returns error if any structural invariant fails; see [`Self::validate`].
    pub fn new(
        row_ptrs: Vec<i64>,
        col_indices: Vec<i64>,
        values: Vec<T>,
        shape: [usize; 2],
    ) -> Result<Self> {
        Self::with_heads(row_ptrs, col_indices, values, shape, 1)
    }

    /// Create a CSR matrix whose entries each carry `heads` weights
    ///
    /// `values` holds `nnz * heads` elements, head-minor.
    pub fn with_heads(
        row_ptrs: Vec<i64>,
        col_indices: Vec<i64>,
        values: Vec<T>,
        shape: [usize; 2],
        heads: usize,
    ) -> Result<Self> {
        let csr = Self {
            row_ptrs,
            col_indices,
            values,
            shape,
            heads,
        };
        csr.validate()?;
        Ok(csr)
    }

    /// Create CSR matrix from host slices
    pub fn from_slices(
        row_ptrs: &[i64],
        col_indices: &[i64],
        values: &[T],
        shape: [usize; 2],
    ) -> Result<Self> {
        Self::new(row_ptrs.to_vec(), col_indices.to_vec(), values.to_vec(), shape)
    }

    /// Create a multi-head CSR matrix from an `[E, H]` edge-weight tensor
    ///
    /// The row count is taken from `row_ptrs.len() - 1`.
    pub fn from_edge_weights(
        row_ptrs: Vec<i64>,
        col_indices: Vec<i64>,
        edge_weights: &Tensor<T>,
        ncols: usize,
    ) -> Result<Self> {
        let &[edges, heads] = edge_weights.shape() else {
            return Err(Error::InvalidArgument {
                arg: "edge_weights",
                reason: format!("expected 2D [E, H] tensor, got {:?}", edge_weights.shape()),
            });
        };
        if edges != col_indices.len() {
            return Err(Error::malformed(format!(
                "edge_weights has {} rows but there are {} column indices",
                edges,
                col_indices.len()
            )));
        }
        let nrows = row_ptrs.len().checked_sub(1).ok_or_else(|| {
            Error::malformed("row_ptrs must contain at least one element")
        })?;

        Self::with_heads(
            row_ptrs,
            col_indices,
            edge_weights.to_vec(),
            [nrows, ncols],
            heads,
        )
    }

    /// Create an empty CSR matrix
    ///
    /// # Panics
    ///
    /// Panics if the `nrows + 1` row pointers cannot be allocated.
    pub fn empty(shape: [usize; 2]) -> Self {
        let [nrows, _ncols] = shape;
        // Row pointers are all zeros for empty matrix
        Self {
            row_ptrs: vec![0; nrows.saturating_add(1)],
            col_indices: Vec::new(),
            values: Vec::new(),
            shape,
            heads: 1,
        }
    }

    /// Check every structural invariant
    ///
    /// - `heads >= 1`
    /// - `row_ptrs.len() == nrows + 1`, `row_ptrs[0] == 0`, non-decreasing,
    ///   `row_ptrs[nrows] == nnz`
    /// - `values.len() == nnz * heads`
    /// - every column index lies in `[0, ncols)`
    pub fn validate(&self) -> Result<()> {
        let [nrows, ncols] = self.shape;
        let nnz = self.col_indices.len();

        if self.heads == 0 {
            return Err(Error::InvalidArgument {
                arg: "heads",
                reason: "must be at least 1".to_string(),
            });
        }

        let ptrs_len = nrows
            .checked_add(1)
            .ok_or_else(|| Error::malformed(format!("nrows {} overflows row_ptrs length", nrows)))?;
        if self.row_ptrs.len() != ptrs_len {
            return Err(Error::malformed(format!(
                "row_ptrs length {} does not match nrows + 1 = {}",
                self.row_ptrs.len(),
                ptrs_len
            )));
        }

        if self.row_ptrs[0] != 0 {
            return Err(Error::malformed(format!(
                "row_ptrs[0] must be 0, got {}",
                self.row_ptrs[0]
            )));
        }

        if let Some(row) = self.row_ptrs.windows(2).position(|w| w[1] < w[0]) {
            return Err(Error::malformed(format!(
                "row_ptrs decreases at row {}: {} > {}",
                row,
                self.row_ptrs[row],
                self.row_ptrs[row + 1]
            )));
        }

        if self.row_ptrs[nrows] != nnz as i64 {
            return Err(Error::malformed(format!(
                "row_ptrs[{}] = {} does not match {} column indices",
                nrows, self.row_ptrs[nrows], nnz
            )));
        }

        let expected_values = nnz.checked_mul(self.heads).ok_or_else(|| {
            Error::malformed(format!(
                "{} entries x {} heads overflows the value count",
                nnz, self.heads
            ))
        })?;
        if self.values.len() != expected_values {
            return Err(Error::malformed(format!(
                "expected {} values ({} entries x {} heads), got {}",
                expected_values,
                nnz,
                self.heads,
                self.values.len()
            )));
        }

        if let Some(&c) = self
            .col_indices
            .iter()
            .find(|&&c| c < 0 || c as usize >= ncols)
        {
            return Err(Error::IndexOutOfRange {
                index: c,
                size: ncols,
            });
        }

        Ok(())
    }

    // ===== Getters =====

    /// Returns the row pointers
    pub fn row_ptrs(&self) -> &[i64] {
        &self.row_ptrs
    }

    /// Returns the column indices
    pub fn col_indices(&self) -> &[i64] {
        &self.col_indices
    }

    /// Returns the values (`nnz * heads` elements)
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Returns the shape as [nrows, ncols]
    #[inline]
    pub fn shape(&self) -> [usize; 2] {
        self.shape
    }

    /// Returns the number of rows
    #[inline]
    pub fn nrows(&self) -> usize {
        self.shape[0]
    }

    /// Returns the number of columns
    #[inline]
    pub fn ncols(&self) -> usize {
        self.shape[1]
    }

    /// Returns the number of stored entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.col_indices.len()
    }

    /// Returns the number of weights carried by each entry
    #[inline]
    pub fn heads(&self) -> usize {
        self.heads
    }

    /// Returns the data type of values
    #[inline]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Returns true if the matrix has no stored entries
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nnz() == 0
    }

    /// Entry range of one row
    #[inline]
    pub(crate) fn row_range(&self, row: usize) -> Range<usize> {
        self.row_ptrs[row] as usize..self.row_ptrs[row + 1] as usize
    }

    /// Returns the number of entries in a specific row
    ///
    /// # Panics
    ///
    /// Panics if row >= nrows
    pub fn row_nnz(&self, row: usize) -> usize {
        self.row_range(row).len()
    }

    /// Column indices and values of one row
    ///
    /// The value slice holds `row_nnz(row) * heads` elements.
    ///
    /// # Panics
    ///
    /// Panics if row >= nrows
    pub fn row(&self, row: usize) -> (&[i64], &[T]) {
        let range = self.row_range(row);
        let values = &self.values[range.start * self.heads..range.end * self.heads];
        (&self.col_indices[range], values)
    }

    /// Returns the sparsity ratio (fraction of zeros)
    ///
    /// Sparsity = 1.0 - (nnz / total_elements)
    pub fn sparsity(&self) -> f64 {
        let total = (self.nrows() * self.ncols()) as f64;
        if total == 0.0 {
            0.0
        } else {
            1.0 - (self.nnz() as f64 / total)
        }
    }

    /// Returns the density ratio (fraction of non-zeros)
    pub fn density(&self) -> f64 {
        1.0 - self.sparsity()
    }

    /// Returns the memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        // row_ptrs (I64) + col_indices (I64) + values
        let ptr_size = (self.nrows() + 1) * std::mem::size_of::<i64>();
        let index_size = self.nnz() * std::mem::size_of::<i64>();
        let value_size = self.values.len() * self.dtype().size_in_bytes();
        ptr_size + index_size + value_size
    }
}
