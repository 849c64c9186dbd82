//! Data type system for kernel operands
//!
//! Kernels are generic over [`Element`]; `DType` is the runtime tag used in
//! diagnostics and memory accounting.

mod element;

pub use element::Element;

use std::fmt;

/// Element type of a tensor or sparse value buffer
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    /// 64-bit floating point
    F64,
    /// 32-bit floating point (most common)
    F32,
}

impl DType {
    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 => 8,
            Self::F32 => 4,
        }
    }

    /// Short lowercase name, as used in log output
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}
