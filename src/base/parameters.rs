use super::{ElasticConstants, PiecewiseLinear};
use crate::tensor::SymTensor;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Holds the parameters of the scalar Newton iteration of radial-return laws
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParamReturnMapping {
    /// Maximum number of iterations
    pub max_iterations: usize,

    /// Absolute tolerance on the residual
    pub abs_tol: f64,

    /// Relative tolerance on the residual (normalized by the reference value)
    pub rel_tol: f64,

    /// Maximum inelastic strain increment per step used to compute the timestep limit
    pub max_inelastic_increment: f64,
}

impl Default for ParamReturnMapping {
    fn default() -> Self {
        ParamReturnMapping {
            max_iterations: 30,
            abs_tol: 1e-11,
            rel_tol: 1e-8,
            max_inelastic_increment: 1e-4,
        }
    }
}

/// Holds parameters for the isotropic elasticity
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind")]
pub enum ParamElasticity {
    /// Constant elastic constants (the tensor is computed once and cached)
    Constant(ElasticConstants),

    /// Temperature-dependent Young's modulus and Poisson's coefficient (recomputed at every call)
    Variable {
        /// Young's modulus as a function of temperature
        young: PiecewiseLinear,

        /// Poisson's coefficient as a function of temperature
        poisson: PiecewiseLinear,
    },
}

/// Holds the initial yield stress σy
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind")]
pub enum YieldStress {
    /// Constant value
    Constant {
        /// Yield stress
        value: f64,
    },

    /// Function of the temperature
    Temperature {
        /// Yield stress as a function of temperature
        table: PiecewiseLinear,
    },
}

/// Holds the isotropic hardening rule h(εp) where εp is the effective plastic strain
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind")]
pub enum Hardening {
    /// Linear hardening: h = H εp
    Linear {
        /// Hardening modulus H
        slope: f64,
    },

    /// Tabulated hardening: h = curve(εp)
    Curve {
        /// Hardening value as a function of the effective plastic strain (usually h(0) = 0)
        curve: PiecewiseLinear,
    },
}

/// Holds parameters for the von Mises plasticity with isotropic hardening
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParamPlasticity {
    /// Initial yield stress
    pub yield_stress: YieldStress,

    /// Hardening rule
    pub hardening: Hardening,
}

/// Holds parameters for the power-law creep
///
/// ```text
/// dεc/dt = A q^n exp(-Q / (R T)) (t - t0)^m
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParamCreep {
    /// Coefficient A
    pub coefficient: f64,

    /// Stress exponent n
    pub exponent: f64,

    /// Activation energy Q
    #[serde(default)]
    pub activation_energy: f64,

    /// Universal gas constant R
    #[serde(default = "default_gas_constant")]
    pub gas_constant: f64,

    /// Time exponent m
    #[serde(default)]
    pub time_exponent: f64,

    /// Start time t0
    #[serde(default)]
    pub start_time: f64,
}

fn default_gas_constant() -> f64 {
    8.3143
}

impl ParamCreep {
    /// Allocates a new instance without temperature and time dependence
    pub fn new(coefficient: f64, exponent: f64) -> Self {
        ParamCreep {
            coefficient,
            exponent,
            activation_energy: 0.0,
            gas_constant: default_gas_constant(),
            time_exponent: 0.0,
            start_time: 0.0,
        }
    }
}

/// Holds parameters for the plasticity with temperature-dependent hardening curves
///
/// Each curve gives the flow stress as a function of the effective plastic strain at the
/// corresponding temperature. The yield stress is the value of the curve at zero plastic strain.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParamTempDepHardening {
    /// Temperatures (strictly increasing)
    pub temperatures: Vec<f64>,

    /// Flow stress curves (one per temperature)
    pub curves: Vec<PiecewiseLinear>,
}

/// Defines the softening behavior after cracking
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind")]
pub enum CrackRelease {
    /// Abrupt drop to a residual fraction of the cracking stress
    Abrupt {
        /// Residual stress as a fraction of the cracking stress
        residual_fraction: f64,
    },

    /// Exponential decay toward a residual fraction of the cracking stress
    Exponential {
        /// Residual stress as a fraction of the cracking stress
        residual_fraction: f64,

        /// Initial softening slope (default = -E)
        #[serde(default)]
        alpha: Option<f64>,
    },

    /// Power-law decay: s = σc (εc / ε)ᵝ
    Power {
        /// Exponent β
        exponent: f64,
    },
}

/// Holds parameters for the smeared cracking model
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParamCracking {
    /// Tensile stress that initiates a crack
    pub cracking_stress: f64,

    /// Softening behavior
    pub release: CrackRelease,

    /// Maximum number of crack directions (1, 2, or 3)
    #[serde(default = "default_max_cracks")]
    pub max_cracks: usize,

    /// Minimum stiffness retention ratio
    #[serde(default = "default_min_retention")]
    pub min_retention: f64,
}

fn default_max_cracks() -> usize {
    3
}

fn default_min_retention() -> f64 {
    1e-6
}

/// Holds parameters for one inelastic mechanism of a combined model
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "law")]
pub enum ParamInelastic {
    /// Isotropic plasticity
    Plasticity(ParamPlasticity),

    /// Power-law creep
    Creep(ParamCreep),

    /// Plasticity with temperature-dependent hardening curves
    TempDepHardening(ParamTempDepHardening),
}

/// Holds the parameters of the outer (Picard) iteration of combined models
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParamStressIteration {
    /// Maximum number of iterations
    pub max_iterations: usize,

    /// Absolute tolerance on the norm of the stress change
    pub abs_tol: f64,

    /// Relative tolerance on the norm of the stress change (relative to the first change)
    pub rel_tol: f64,
}

impl Default for ParamStressIteration {
    fn default() -> Self {
        ParamStressIteration {
            max_iterations: 30,
            abs_tol: 1e-5,
            rel_tol: 1e-5,
        }
    }
}

/// Holds parameters for stress-strain relations
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "model")]
pub enum ParamStressStrain {
    /// Linear elastic model
    LinearElastic,

    /// von Mises plasticity with isotropic hardening
    IsotropicPlasticity(ParamPlasticity),

    /// Power-law creep
    PowerLawCreep(ParamCreep),

    /// Plasticity with temperature-dependent hardening curves
    TempDepHardening(ParamTempDepHardening),

    /// Several inelastic mechanisms combined by a fixed-point iteration
    CombinedCreepPlasticity {
        /// Sub-models (evaluated in this order)
        models: Vec<ParamInelastic>,

        /// Outer iteration parameters
        #[serde(default)]
        iteration: ParamStressIteration,
    },

    /// Smeared cracking (elastic with degraded stiffness)
    SmearedCracking(ParamCracking),
}

/// Holds parameters for solid media mechanics
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParamSolid {
    /// Elasticity
    pub elasticity: ParamElasticity,

    /// Stress-strain model
    pub stress_strain: ParamStressStrain,

    /// Return-mapping (local Newton) parameters
    #[serde(default)]
    pub return_mapping: ParamReturnMapping,

    /// Initial stress [xx, yy, zz, xy, yz, zx]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_stress: Option<Vec<f64>>,
}

impl ParamSolid {
    /// Returns the initial stress tensor
    ///
    /// # Errors
    ///
    /// Returns [Error::Config] if the initial stress vector does not have 6 components.
    pub fn initial_stress(&self) -> Result<SymTensor> {
        match &self.initial_stress {
            None => Ok(SymTensor::zero()),
            Some(values) => {
                if values.len() != 6 {
                    return Err(Error::config(format!(
                        "initial stress must have 6 components (xx, yy, zz, xy, yz, zx); found {}",
                        values.len()
                    )));
                }
                let mut v = [0.0; 6];
                v.copy_from_slice(values);
                Ok(SymTensor::from_array(v))
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
