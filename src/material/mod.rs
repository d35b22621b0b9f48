//! Implements the constitutive models and the persisted quadrature-point states

mod combined;
mod elasticity_model;
mod inelastic;
mod isotropic_plasticity;
mod loading_path;
mod power_law_creep;
mod qp_state;
mod return_mapping;
mod smeared_cracking;
mod state_store;
mod stress_strain;
mod temp_dep_hardening;
pub use crate::material::combined::*;
pub use crate::material::elasticity_model::*;
pub use crate::material::inelastic::*;
pub use crate::material::isotropic_plasticity::*;
pub use crate::material::loading_path::*;
pub use crate::material::power_law_creep::*;
pub use crate::material::qp_state::*;
pub use crate::material::return_mapping::*;
pub use crate::material::smeared_cracking::*;
pub use crate::material::state_store::*;
pub use crate::material::stress_strain::*;
pub use crate::material::temp_dep_hardening::*;
