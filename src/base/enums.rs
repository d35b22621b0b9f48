use serde::{Deserialize, Serialize};

/// Defines the kinematic formulation used to compute strain increments
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum Formulation {
    /// Infinitesimal (or total Green-Lagrange when `large_strain` is set) strain
    SmallStrain,

    /// Incremental finite strain with objective rotation of the stress
    FiniteStrain,
}

/// Defines the algorithm that decomposes the incremental deformation gradient
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum Decomposition {
    /// Closed-form approximation of the polar decomposition (Rashid, 1993)
    Rashid,

    /// Exact polar decomposition from the eigen-decomposition of F̂ᵀ F̂
    Eigen,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
