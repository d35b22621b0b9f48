//! Implements the incremental kinematics: strain increments and incremental rotations

mod decomposition;
mod displacement;
mod engine;
pub use crate::kinematics::decomposition::*;
pub use crate::kinematics::displacement::*;
pub use crate::kinematics::engine::*;
