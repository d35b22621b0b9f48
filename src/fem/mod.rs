//! Implements the loop over finite elements evaluating the material response

mod material_loop;
pub use crate::fem::material_loop::*;
