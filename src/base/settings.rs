use super::{Decomposition, Formulation, Idealization};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Holds the kinematic and output settings shared by all material blocks
///
/// # Default values
///
/// * 3D small-strain formulation without the quadratic (large-strain) term
/// * Rashid decomposition (only used by the finite-strain formulation)
/// * No volumetric locking correction
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Geometry idealization
    pub idealization: Idealization,

    /// Kinematic formulation
    pub formulation: Formulation,

    /// Adds the quadratic term ½ ∇uᵀ ∇u to the small strain (total Green-Lagrange strain)
    pub large_strain: bool,

    /// Decomposition of the incremental deformation gradient (finite strain only)
    pub decomposition: Decomposition,

    /// Replaces the volumetric strain at each quadrature point by the element average
    pub volumetric_locking_correction: bool,

    /// Prints the return-mapping iterations
    pub verbose: bool,
}

impl Settings {
    /// Allocates a new instance
    pub fn new() -> Self {
        Settings {
            idealization: Idealization::ThreeD,
            formulation: Formulation::SmallStrain,
            large_strain: false,
            decomposition: Decomposition::Rashid,
            volumetric_locking_correction: false,
            verbose: false,
        }
    }

    /// Sets the geometry idealization
    pub fn set_idealization(&mut self, idealization: Idealization) -> &mut Self {
        self.idealization = idealization;
        self
    }

    /// Selects the small-strain formulation (with or without the quadratic term)
    pub fn set_small_strain(&mut self, large_strain: bool) -> &mut Self {
        self.formulation = Formulation::SmallStrain;
        self.large_strain = large_strain;
        self
    }

    /// Selects the incremental finite-strain formulation with the given decomposition
    pub fn set_finite_strain(&mut self, decomposition: Decomposition) -> &mut Self {
        self.formulation = Formulation::FiniteStrain;
        self.large_strain = false;
        self.decomposition = decomposition;
        self
    }

    /// Enables or disables the volumetric locking correction
    pub fn set_volumetric_locking_correction(&mut self, flag: bool) -> &mut Self {
        self.volumetric_locking_correction = flag;
        self
    }

    /// Enables or disables the printing of iterations
    pub fn set_verbose(&mut self, flag: bool) -> &mut Self {
        self.verbose = flag;
        self
    }

    /// Checks the consistency of the settings
    pub fn validate(&self) -> Result<()> {
        if self.large_strain && self.formulation == Formulation::FiniteStrain {
            return Err(Error::config(
                "large_strain applies to the small-strain formulation only",
            ));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::new()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
