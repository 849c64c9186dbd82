//! Element trait for mapping Rust types to DType

use super::DType;
use bytemuck::{Pod, Zeroable};
use std::fmt::Debug;
use std::ops::{Add, Mul};

/// Trait for types that can be values of a sparse matrix or dense tensor
///
/// Kernels accumulate directly in `Self`: an `f32` operand is summed in `f32`
/// and an `f64` operand in `f64`. There is no hidden widening.
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - shared read-only across workers
/// - `Pod + Zeroable` - zero-initialised result buffers (bytemuck)
/// - `Add + Mul` - multiply-accumulate (Output = Self)
/// - `PartialEq` - exact-zero checks when dropping cancelled sums
pub trait Element:
    Copy
    + Clone
    + Debug
    + Send
    + Sync
    + Pod
    + Zeroable
    + 'static
    + Add<Output = Self>
    + Mul<Output = Self>
    + PartialEq
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;

    /// `self + a * b`
    #[inline]
    fn mul_acc(self, a: Self, b: Self) -> Self {
        self + a * b
    }
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }
}
