//! Layout: shape and row-major strides of a dense tensor

use smallvec::SmallVec;
use std::fmt;

/// Stack allocation threshold for dimensions
/// Kernel operands are rank 2 or 3, so 4 covers every case without a heap hit
const STACK_DIMS: usize = 4;

/// Shape type: dimensions of a tensor
pub type Shape = SmallVec<[usize; STACK_DIMS]>;

/// Strides type: element offsets between consecutive elements along each dimension
pub type Strides = SmallVec<[usize; STACK_DIMS]>;

/// Row-major (C-order) layout of a dense tensor
///
/// Tensors in this crate always own a contiguous buffer, so the layout is
/// fully determined by the shape. Address of element `[i0, i1, ..., in]`:
///   `i0 * strides[0] + i1 * strides[1] + ... + in * strides[n]`
#[derive(Clone, PartialEq, Eq)]
pub struct Layout {
    shape: Shape,
    strides: Strides,
}

impl Layout {
    /// Create a contiguous layout from a shape
    ///
    /// # Example
    /// ```
    /// use csr_spmm::tensor::Layout;
    /// let layout = Layout::contiguous(&[2, 3, 4]);
    /// assert_eq!(layout.shape(), &[2, 3, 4]);
    /// assert_eq!(layout.strides(), &[12, 4, 1]);
    /// ```
    pub fn contiguous(shape: &[usize]) -> Self {
        let shape: Shape = shape.iter().copied().collect();
        let strides = Self::compute_contiguous_strides(&shape);
        Self { shape, strides }
    }

    fn compute_contiguous_strides(shape: &[usize]) -> Strides {
        let mut strides: Strides = SmallVec::with_capacity(shape.len());
        let mut stride = 1usize;

        for &dim in shape.iter().rev() {
            strides.push(stride);
            stride *= dim;
        }

        strides.reverse();
        strides
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.shape.iter().product()
    }

    /// Compute the linear index (element offset) for given indices
    pub fn index(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.ndim() {
            return None;
        }

        let mut linear = 0usize;
        for ((&idx, &dim), &stride) in indices.iter().zip(&self.shape).zip(&self.strides) {
            if idx >= dim {
                return None;
            }
            linear += idx * stride;
        }

        Some(linear)
    }

    /// Create a reshaped layout
    ///
    /// Returns None if the element counts differ
    pub fn reshape(&self, new_shape: &[usize]) -> Option<Self> {
        let new_count: usize = new_shape.iter().product();
        if new_count != self.elem_count() {
            return None;
        }

        Some(Self::contiguous(new_shape))
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layout({:?}, strides={:?})", self.shape, self.strides)
    }
}
