//! Implements symmetric second- and fourth-order tensors in 3D

mod elasticity;
mod sym_tensor;
pub use crate::tensor::elasticity::*;
pub use crate::tensor::sym_tensor::*;
