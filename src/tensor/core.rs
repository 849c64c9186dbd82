//! Core Tensor type

use super::Layout;
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use bytemuck::Zeroable;
use std::fmt;

/// Dense n-dimensional array in row-major order
///
/// A `Tensor` owns its buffer outright; kernels read operands through shared
/// references and hand back freshly allocated results with no link to their
/// inputs. Two shapes matter to the kernels:
/// - `[N, F]` for single-head aggregation
/// - `[N, H, D]`, or the same buffer viewed as `[N, H*D]`, for multi-head aggregation
///
/// # Example
///
/// ```
/// use csr_spmm::tensor::Tensor;
///
/// let a = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], &[1, 2, 3]);
/// let flat = a.reshape(&[1, 6])?;
/// assert_eq!(flat.as_slice(), a.as_slice());
/// # Ok::<(), csr_spmm::error::Error>(())
/// ```
#[derive(Clone, PartialEq)]
pub struct Tensor<T: Element> {
    data: Vec<T>,
    layout: Layout,
}

impl<T: Element> Tensor<T> {
    /// Create a tensor from a slice of data
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not equal the product of the `shape` dimensions.
    /// For a fallible alternative, use [`Self::try_from_slice`].
    pub fn from_slice(data: &[T], shape: &[usize]) -> Self {
        Self::try_from_slice(data, shape).expect("Tensor::from_slice failed")
    }

    /// Create a tensor from a slice of data (fallible version)
    ///
    /// Returns an error if `data.len()` does not equal the product of the `shape` dimensions.
    pub fn try_from_slice(data: &[T], shape: &[usize]) -> Result<Self> {
        Self::from_vec(data.to_vec(), shape)
    }

    /// Create a tensor taking ownership of an existing buffer
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let expected_len: usize = shape.iter().product();
        if data.len() != expected_len {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
            });
        }

        Ok(Self {
            data,
            layout: Layout::contiguous(shape),
        })
    }

    /// Create a tensor filled with zeros
    pub fn zeros(shape: &[usize]) -> Self {
        let layout = Layout::contiguous(shape);
        Self {
            data: vec![T::zeroed(); layout.elem_count()],
            layout,
        }
    }

    /// Create an `n × n` identity matrix
    pub fn eye(n: usize) -> Self {
        let mut out = Self::zeros(&[n, n]);
        for i in 0..n {
            out.data[i * n + i] = T::one();
        }
        out
    }

    // ===== Metadata =====

    /// Get the layout
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Element type tag
    #[inline]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    // ===== Views =====

    /// Reinterpret the buffer under a new shape with the same element count
    ///
    /// Used to move between the `[N, H, D]` and `[N, H*D]` head layouts.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` with the current shape as `expected` and the requested
    /// shape as `got` when their element counts differ.
    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        let layout = self
            .layout
            .reshape(shape)
            .ok_or_else(|| Error::shape_mismatch(self.shape(), shape))?;

        Ok(Self {
            data: self.data.clone(),
            layout,
        })
    }

    // ===== Data Access =====

    /// Borrow the row-major buffer
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Copy the buffer into a Vec
    pub fn to_vec(&self) -> Vec<T> {
        self.data.clone()
    }

    /// Read one element, or None if the indices are out of bounds
    pub fn get(&self, indices: &[usize]) -> Option<T> {
        self.layout.index(indices).map(|i| self.data[i])
    }
}

impl<T: Element> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape())
            .field("dtype", &self.dtype())
            .finish()
    }
}

impl<T: Element> fmt::Display for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor({:?}, dtype={})", self.shape(), self.dtype())
    }
}
