//! Dense tensor types
//!
//! This module provides the owned, row-major `Tensor` used as the dense
//! operand and result of every kernel.

mod core;
mod layout;

pub use core::Tensor;
pub use layout::{Layout, Shape, Strides};
