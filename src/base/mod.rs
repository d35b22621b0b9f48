//! Implements the base structures: parameters, settings, and auxiliary functions

mod elastic_constants;
mod enums;
mod idealization;
mod parameters;
mod piecewise_linear;
mod samples;
mod settings;
pub use crate::base::elastic_constants::*;
pub use crate::base::enums::*;
pub use crate::base::idealization::*;
pub use crate::base::parameters::*;
pub use crate::base::piecewise_linear::*;
pub use crate::base::samples::*;
pub use crate::base::settings::*;
