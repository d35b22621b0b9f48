use super::{CombinedCreepPlasticity, CombinedReturn, CrackState, ElasticityModel, InelasticModel, LawContext};
use super::{IsotropicPlasticity, PowerLawCreep, TempDepHardening};
use super::{QpState, ReturnMappingSolver, SmearedCracking, N_INTERNAL_PER_MODEL};
use crate::base::{ParamSolid, ParamStressStrain, Settings};
use crate::kinematics::QpKinematics;
use crate::tensor::{SymElasticityTensor, SymTensor};
use crate::{Error, Result};
use nalgebra::Matrix3;
use std::slice;

/// Implements the constitutive models (closed set of laws)
#[derive(Clone, Debug)]
pub enum ConstitutiveModel {
    /// Linear elasticity
    LinearElastic,

    /// A single radial-return mechanism
    Inelastic(InelasticModel),

    /// Several radial-return mechanisms combined by a Picard iteration
    Combined(CombinedCreepPlasticity),

    /// Elasticity with stiffness degraded by smeared cracks
    SmearedCracking(SmearedCracking),
}

impl ConstitutiveModel {
    /// Allocates a new instance
    pub fn new(param: &ParamStressStrain) -> Result<Self> {
        Ok(match param {
            ParamStressStrain::LinearElastic => ConstitutiveModel::LinearElastic,
            ParamStressStrain::IsotropicPlasticity(p) => {
                ConstitutiveModel::Inelastic(InelasticModel::IsotropicPlasticity(IsotropicPlasticity::new(p)?))
            }
            ParamStressStrain::PowerLawCreep(p) => {
                ConstitutiveModel::Inelastic(InelasticModel::PowerLawCreep(PowerLawCreep::new(p)?))
            }
            ParamStressStrain::TempDepHardening(p) => {
                ConstitutiveModel::Inelastic(InelasticModel::TempDepHardening(TempDepHardening::new(p)?))
            }
            ParamStressStrain::CombinedCreepPlasticity { models, iteration } => {
                ConstitutiveModel::Combined(CombinedCreepPlasticity::new(models, iteration)?)
            }
            ParamStressStrain::SmearedCracking(p) => ConstitutiveModel::SmearedCracking(SmearedCracking::new(p)?),
        })
    }

    /// Returns the name of the model
    pub fn name(&self) -> &'static str {
        match self {
            ConstitutiveModel::LinearElastic => "LinearElastic",
            ConstitutiveModel::Inelastic(m) => m.name(),
            ConstitutiveModel::Combined(_) => "CombinedCreepPlasticity",
            ConstitutiveModel::SmearedCracking(_) => "SmearedCracking",
        }
    }

    /// Returns the radial-return mechanisms (empty for elastic and cracking models)
    pub fn mechanisms(&self) -> &[InelasticModel] {
        match self {
            ConstitutiveModel::Inelastic(m) => slice::from_ref(m),
            ConstitutiveModel::Combined(m) => m.models(),
            _ => &[],
        }
    }
}

/// Holds the input of the update at one quadrature point
#[derive(Clone, Copy, Debug)]
pub struct QpInput {
    /// Strain increment Δε
    pub strain_increment: SymTensor,

    /// Incremental rotation R̂ (finite strain only)
    pub rotation_increment: Option<Matrix3<f64>>,

    /// Temperature at the end of the step
    pub temperature: f64,

    /// Time at the end of the step
    pub time: f64,

    /// Timestep size Δt
    pub dt: f64,

    /// Size of the previous timestep Δt_old (equal to Δt on the first step)
    pub dt_old: f64,
}

impl QpInput {
    /// Allocates a new instance (small strain, zero temperature)
    pub fn new(strain_increment: SymTensor, time: f64, dt: f64) -> Self {
        QpInput {
            strain_increment,
            rotation_increment: None,
            temperature: 0.0,
            time,
            dt,
            dt_old: dt,
        }
    }

    /// Allocates a new instance from the output of the kinematics engine
    pub fn from_kinematics(kinematics: &QpKinematics, finite_strain: bool, time: f64, dt: f64) -> Self {
        QpInput {
            strain_increment: kinematics.strain_increment,
            rotation_increment: if finite_strain {
                Some(kinematics.rotation_increment)
            } else {
                None
            },
            temperature: 0.0,
            time,
            dt,
            dt_old: dt,
        }
    }
}

/// Holds the output of the update at one quadrature point (besides the new state)
#[derive(Clone, Copy, Debug)]
pub struct QpOutput {
    /// Consistent tangent operator dσ/dε
    pub tangent: SymElasticityTensor,

    /// Largest timestep keeping the inelastic increment below the allowed value
    pub timestep_limit: f64,

    /// Number of iterations of the outermost loop
    pub iterations: usize,
}

/// Implements the stress update of a material block
#[derive(Clone, Debug)]
pub struct StressStrain {
    /// Holds the elasticity model
    pub elasticity: ElasticityModel,

    /// Holds the constitutive model
    pub model: ConstitutiveModel,

    /// Holds the return-mapping solver
    pub solver: ReturnMappingSolver,

    /// Holds the initial stress
    pub initial_stress: SymTensor,
}

impl StressStrain {
    /// Allocates a new instance
    pub fn new(param: &ParamSolid, settings: &Settings) -> Result<Self> {
        settings.validate()?;
        Ok(StressStrain {
            elasticity: ElasticityModel::new(&param.elasticity)?,
            model: ConstitutiveModel::new(&param.stress_strain)?,
            solver: ReturnMappingSolver::new(&param.return_mapping, settings.verbose)?,
            initial_stress: param.initial_stress()?,
        })
    }

    /// Returns the number of internal values
    pub fn n_internal_values(&self) -> usize {
        self.model.mechanisms().len() * N_INTERNAL_PER_MODEL
    }

    /// Returns the state at t = 0
    pub fn initial_state(&self) -> QpState {
        let with_crack = matches!(self.model, ConstitutiveModel::SmearedCracking(_));
        let mut state = QpState::new(self.n_internal_values(), with_crack);
        state.stress = self.initial_stress;
        state
    }

    /// Updates the state at one quadrature point
    ///
    /// The current state is entirely recomputed from the old state; thus, repeated calls
    /// with the same input give the same result.
    ///
    /// # Errors
    ///
    /// * [Error::ReturnMapping] or [Error::StressIteration] if the local iterations fail
    /// * [Error::Config] if the old state does not match the model (e.g., a wrong checkpoint)
    pub fn update(&self, input: &QpInput, old: &QpState, current: &mut QpState) -> Result<QpOutput> {
        let n_iv = self.n_internal_values();
        if old.internal_values.len() != n_iv {
            return Err(Error::config(format!(
                "{}: the state has {} internal values; expected {}",
                self.model.name(),
                old.internal_values.len(),
                n_iv
            )));
        }
        let c = self.elasticity.tensor(input.temperature)?;
        let lame = self.elasticity.lame(input.temperature)?;
        let deps = input.strain_increment;
        current.clone_from(old);
        current.total_strain = old.total_strain + deps;

        let mut output = match &self.model {
            ConstitutiveModel::LinearElastic => {
                current.stress = old.stress + c.multiply(&deps);
                current.elastic_strain = old.elastic_strain + deps;
                QpOutput {
                    tangent: c,
                    timestep_limit: f64::INFINITY,
                    iterations: 0,
                }
            }
            ConstitutiveModel::SmearedCracking(model) => {
                let old_crack = old
                    .crack
                    .as_ref()
                    .ok_or_else(|| Error::config("SmearedCracking: the state has no crack data"))?;
                let total = current.total_strain;
                let new_crack = current.crack.get_or_insert_with(CrackState::new);
                let (stress, tangent) = model.update(&c, lame.young(), &total, old_crack, new_crack);
                current.stress = self.initial_stress + stress;
                current.elastic_strain = total;
                QpOutput {
                    tangent,
                    timestep_limit: f64::INFINITY,
                    iterations: 0,
                }
            }
            ConstitutiveModel::Inelastic(model) => {
                let ctx = self.context(input, lame.mu);
                let trial = old.stress + c.multiply(&deps);
                let ret = model.radial_return(&self.solver, &ctx, &trial, &old.internal_values)?;
                let iterations = ret.iterations;
                let res = CombinedReturn {
                    returns: vec![ret],
                    iterations,
                };
                self.finalize(&res, &c, lame.mu, input, old, current)
            }
            ConstitutiveModel::Combined(model) => {
                let ctx = self.context(input, lame.mu);
                let res = model.update(&self.solver, &ctx, &c, &old.stress, &deps, &old.internal_values)?;
                self.finalize(&res, &c, lame.mu, input, old, current)
            }
        };

        if let Some(r) = &input.rotation_increment {
            current.rotate(r);
            output.tangent = output.tangent.rotated(r);
        }
        Ok(output)
    }

    /// Returns the data needed by the inelastic laws
    fn context(&self, input: &QpInput, shear: f64) -> LawContext {
        LawContext {
            shear,
            temperature: input.temperature,
            time: input.time,
            dt: input.dt,
        }
    }

    /// Commits the results of the radial-return mechanisms to the current state
    fn finalize(
        &self,
        res: &CombinedReturn,
        c: &SymElasticityTensor,
        shear: f64,
        input: &QpInput,
        old: &QpState,
        current: &mut QpState,
    ) -> QpOutput {
        let deps = input.strain_increment;
        let inelastic = res.inelastic_increment();
        current.stress = old.stress + c.multiply(&(deps - inelastic));
        current.elastic_strain = old.elastic_strain + deps - inelastic;
        current.hardening_variable = 0.0;
        for (m, (model, ret)) in self.model.mechanisms().iter().zip(&res.returns).enumerate() {
            let range = m * N_INTERNAL_PER_MODEL..(m + 1) * N_INTERNAL_PER_MODEL;
            ret.write_internal_values(&old.internal_values[range.clone()], &mut current.internal_values[range]);
            if model.is_creep() {
                current.creep_strain += ret.inelastic_increment;
            } else {
                current.plastic_strain += ret.inelastic_increment;
                current.hardening_variable += ret.hardening;
            }
            current.effective_inelastic_strain += ret.scalar;
        }
        QpOutput {
            tangent: res.tangent(c, shear),
            timestep_limit: res.timestep_limit(input.dt, self.solver.param.max_inelastic_increment),
            iterations: res.iterations,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
