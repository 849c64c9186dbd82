//! CSR format conversion: from COO triplets / edge lists, to dense, per-head split

use super::CsrData;
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::tensor::Tensor;

impl<T: Element> CsrData<T> {
    /// Build a CSR matrix from (row, col, value) triplets
    ///
    /// Uses a counting sort on the row index, so entries keep their input
    /// order inside each row. Duplicate coordinates are kept as separate
    /// entries; kernels sum them.
    ///
    /// # Errors
    ///
    /// - `MalformedStructure` if the three slices differ in length
    /// - `IndexOutOfRange` if a row or column index is negative or outside `shape`
    pub fn from_coo(
        row_indices: &[i64],
        col_indices: &[i64],
        values: &[T],
        shape: [usize; 2],
    ) -> Result<Self> {
        let [nrows, ncols] = shape;
        let nnz = values.len();

        if row_indices.len() != nnz || col_indices.len() != nnz {
            return Err(Error::malformed(format!(
                "COO arrays differ in length: {} rows, {} cols, {} values",
                row_indices.len(),
                col_indices.len(),
                nnz
            )));
        }

        if let Some(&r) = row_indices
            .iter()
            .find(|&&r| r < 0 || r as usize >= nrows)
        {
            return Err(Error::IndexOutOfRange {
                index: r,
                size: nrows,
            });
        }

        // Histogram of entries per row, shifted by one so the prefix sum
        // lands directly in row_ptrs
        let ptrs_len = nrows
            .checked_add(1)
            .ok_or_else(|| Error::malformed(format!("nrows {} overflows row_ptrs length", nrows)))?;
        let mut row_ptrs = vec![0i64; ptrs_len];
        for &r in row_indices {
            row_ptrs[r as usize + 1] += 1;
        }
        for i in 0..nrows {
            row_ptrs[i + 1] += row_ptrs[i];
        }

        // Scatter into place, advancing a per-row cursor
        let mut cursor: Vec<usize> = row_ptrs[..nrows].iter().map(|&p| p as usize).collect();
        let mut csr_cols = vec![0i64; nnz];
        let mut csr_values = vec![T::zero(); nnz];
        for ((&r, &c), &v) in row_indices.iter().zip(col_indices).zip(values) {
            let slot = &mut cursor[r as usize];
            csr_cols[*slot] = c;
            csr_values[*slot] = v;
            *slot += 1;
        }

        // Column bounds are checked by validate()
        Self::new(row_ptrs, csr_cols, csr_values, [nrows, ncols])
    }

    /// Build an unweighted adjacency matrix from an edge list
    ///
    /// Every edge `(rows[i], cols[i])` gets weight one.
    pub fn from_edges(rows: &[i64], cols: &[i64], shape: [usize; 2]) -> Result<Self> {
        let ones = vec![T::one(); rows.len()];
        Self::from_coo(rows, cols, &ones, shape)
    }

    /// Expand to a dense `[nrows, ncols]` tensor
    ///
    /// Duplicate entries are summed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimension` for a multi-head matrix; split it with
    /// [`Self::head`] first.
    pub fn to_dense(&self) -> Result<Tensor<T>> {
        if self.heads != 1 {
            return Err(Error::invalid_dimension("to_dense heads", self.heads, 1));
        }

        let [nrows, ncols] = self.shape;
        let mut dense = vec![T::zero(); nrows * ncols];
        for row in 0..nrows {
            let (cols, vals) = self.row(row);
            for (&c, &v) in cols.iter().zip(vals) {
                let slot = &mut dense[row * ncols + c as usize];
                *slot = *slot + v;
            }
        }

        Tensor::from_vec(dense, &[nrows, ncols])
    }

    /// Extract the weights of one head as a scalar CSR matrix
    ///
    /// The result shares this matrix's sparsity structure.
    pub fn head(&self, head: usize) -> Result<Self> {
        if head >= self.heads {
            return Err(Error::IndexOutOfRange {
                index: head as i64,
                size: self.heads,
            });
        }

        let values = self
            .values
            .iter()
            .skip(head)
            .step_by(self.heads)
            .copied()
            .collect();

        Ok(Self {
            row_ptrs: self.row_ptrs.clone(),
            col_indices: self.col_indices.clone(),
            values,
            shape: self.shape,
            heads: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_coo_unsorted_rows() {
        // Matrix:
        // [1, 0, 2]
        // [0, 0, 3]
        // [4, 5, 0]
        let rows = [2i64, 0, 1, 0, 2];
        let cols = [0i64, 0, 2, 2, 1];
        let vals = [4.0f32, 1.0, 3.0, 2.0, 5.0];

        let csr = CsrData::from_coo(&rows, &cols, &vals, [3, 3]).unwrap();
        assert_eq!(csr.row_ptrs(), &[0, 2, 3, 5]);
        // Input order is preserved within each row
        assert_eq!(csr.col_indices(), &[0, 2, 2, 0, 1]);
        assert_eq!(csr.values(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_from_coo_keeps_duplicates() {
        let csr = CsrData::from_coo(&[0, 0], &[2, 2], &[3.0f64, 4.0], [1, 3]).unwrap();
        assert_eq!(csr.nnz(), 2);
        let dense = csr.to_dense().unwrap();
        assert_eq!(dense.as_slice(), &[0.0, 0.0, 7.0]);
    }

    #[test]
    fn test_from_coo_errors() {
        assert!(matches!(
            CsrData::from_coo(&[0], &[0, 1], &[1.0f64], [2, 2]),
            Err(Error::MalformedStructure { .. })
        ));
        assert_eq!(
            CsrData::from_coo(&[5], &[0], &[1.0f64], [2, 2]),
            Err(Error::IndexOutOfRange { index: 5, size: 2 })
        );
        assert_eq!(
            CsrData::from_coo(&[0], &[9], &[1.0f64], [2, 2]),
            Err(Error::IndexOutOfRange { index: 9, size: 2 })
        );
        assert!(matches!(
            CsrData::<f64>::from_coo(&[], &[], &[], [usize::MAX, 1]),
            Err(Error::MalformedStructure { .. })
        ));
    }

    #[test]
    fn test_from_edges_unit_weights() {
        let csr = CsrData::<f32>::from_edges(&[0, 1, 1], &[1, 0, 2], [2, 3]).unwrap();
        assert_eq!(csr.row_ptrs(), &[0, 1, 3]);
        assert_eq!(csr.values(), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_to_dense() {
        let csr = CsrData::from_slices(
            &[0, 2, 4, 6],
            &[0, 2, 1, 2, 0, 1],
            &[1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0],
            [3, 3],
        )
        .unwrap();
        let dense = csr.to_dense().unwrap();
        assert_eq!(dense.shape(), &[3, 3]);
        assert_eq!(
            dense.as_slice(),
            &[1.0, 0.0, 2.0, 0.0, 3.0, 4.0, 5.0, 6.0, 0.0]
        );
    }

    #[test]
    fn test_head_split() {
        let csr = CsrData::with_heads(
            vec![0, 1, 2],
            vec![1, 0],
            vec![1.0f32, 10.0, 2.0, 20.0],
            [2, 2],
            2,
        )
        .unwrap();

        assert!(matches!(
            csr.to_dense(),
            Err(Error::InvalidDimension { .. })
        ));

        let h1 = csr.head(1).unwrap();
        assert_eq!(h1.heads(), 1);
        assert_eq!(h1.values(), &[10.0, 20.0]);
        assert_eq!(h1.to_dense().unwrap().as_slice(), &[0.0, 10.0, 20.0, 0.0]);

        assert!(matches!(
            csr.head(2),
            Err(Error::IndexOutOfRange { index: 2, size: 2 })
        ));
    }
}
