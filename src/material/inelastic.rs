use super::{IsotropicPlasticity, PowerLawCreep, PreparedLaw, ReturnMappingSolver, TempDepHardening};
use super::{IV_EFFECTIVE_STRAIN, IV_HARDENING};
use crate::base::ParamInelastic;
use crate::tensor::{SymElasticityTensor, SymTensor};
use crate::Result;

/// Defines the floor of the effective trial stress used in the flow direction
pub const EFFECTIVE_STRESS_FLOOR: f64 = 0.01;

/// Holds the data of the current step needed to evaluate a law
#[derive(Clone, Copy, Debug)]
pub struct LawContext {
    /// Shear modulus G
    pub shear: f64,

    /// Temperature
    pub temperature: f64,

    /// Time at the end of the step
    pub time: f64,

    /// Timestep size Δt
    pub dt: f64,
}

/// Implements the radial-return inelastic mechanisms
#[derive(Clone, Debug)]
pub enum InelasticModel {
    IsotropicPlasticity(IsotropicPlasticity),
    PowerLawCreep(PowerLawCreep),
    TempDepHardening(TempDepHardening),
}

impl InelasticModel {
    /// Allocates a new instance
    pub fn new(param: &ParamInelastic) -> Result<Self> {
        Ok(match param {
            ParamInelastic::Plasticity(p) => InelasticModel::IsotropicPlasticity(IsotropicPlasticity::new(p)?),
            ParamInelastic::Creep(p) => InelasticModel::PowerLawCreep(PowerLawCreep::new(p)?),
            ParamInelastic::TempDepHardening(p) => InelasticModel::TempDepHardening(TempDepHardening::new(p)?),
        })
    }

    /// Returns the name of the law (used in error messages)
    pub fn name(&self) -> &'static str {
        match self {
            InelasticModel::IsotropicPlasticity(_) => "IsotropicPlasticity",
            InelasticModel::PowerLawCreep(_) => "PowerLawCreep",
            InelasticModel::TempDepHardening(_) => "TempDepHardening",
        }
    }

    /// Indicates that the inelastic strain is creep (otherwise plastic)
    pub fn is_creep(&self) -> bool {
        matches!(self, InelasticModel::PowerLawCreep(_))
    }

    /// Evaluates the law constants (Uninitialized → Initialized)
    ///
    /// `old_iv` holds the two internal values of this mechanism at the previous step.
    pub fn prepare(&self, ctx: &LawContext, old_iv: &[f64]) -> Result<PreparedLaw<'_>> {
        let three_shear = 3.0 * ctx.shear;
        let ep_old = old_iv[IV_EFFECTIVE_STRAIN];
        match self {
            InelasticModel::IsotropicPlasticity(m) => Ok(m.prepare(three_shear, ctx.temperature, ep_old)),
            InelasticModel::PowerLawCreep(m) => m.prepare(three_shear, ctx.temperature, ctx.time, ctx.dt),
            InelasticModel::TempDepHardening(m) => Ok(m.prepare(three_shear, ctx.temperature, ep_old)),
        }
    }

    /// Performs the radial return of a trial stress
    ///
    /// The inelastic strain increment is `Δp n` with `n = 1.5 s* / q*`. An inactive law
    /// returns immediately with Δp = 0.
    pub fn radial_return(
        &self,
        solver: &ReturnMappingSolver,
        ctx: &LawContext,
        trial: &SymTensor,
        old_iv: &[f64],
    ) -> Result<RadialReturn> {
        let law = self.prepare(ctx, old_iv)?;
        let q_trial = trial.von_mises();
        if !law.activated(q_trial) {
            return Ok(RadialReturn::elastic(q_trial, old_iv[IV_HARDENING]));
        }
        let solution = solver.solve(self.name(), &law, q_trial)?;
        let dp = solution.scalar;
        let q = if q_trial < EFFECTIVE_STRESS_FLOOR {
            log::warn!(
                "{}: effective trial stress {:e} clamped to {}",
                self.name(),
                q_trial,
                EFFECTIVE_STRESS_FLOOR
            );
            EFFECTIVE_STRESS_FLOOR
        } else {
            q_trial
        };
        let direction = trial.deviator().scaled(1.5 / q);
        let d_dp = law.derivative(q_trial, dp);
        let beta = if d_dp != 0.0 {
            -law.d_residual_d_trial(q_trial, dp) / d_dp
        } else {
            0.0
        };
        Ok(RadialReturn {
            inelastic_increment: direction.scaled(dp),
            scalar: dp,
            q_trial: q,
            direction,
            beta,
            hardening: law.hardening_value(dp),
            iterations: solution.iterations,
        })
    }
}

/// Holds the results of a radial return
#[derive(Clone, Copy, Debug)]
pub struct RadialReturn {
    /// Inelastic strain increment Δp n
    pub inelastic_increment: SymTensor,

    /// Effective inelastic strain increment Δp
    pub scalar: f64,

    /// Effective trial stress q* (clamped to the floor when flowing)
    pub q_trial: f64,

    /// Flow direction n = 1.5 s* / q*
    pub direction: SymTensor,

    /// Sensitivity dΔp/dq*
    pub beta: f64,

    /// Hardening variable at the end of the step
    pub hardening: f64,

    /// Number of Newton iterations
    pub iterations: usize,
}

impl RadialReturn {
    /// Returns the results of an inactive law
    pub(crate) fn elastic(q_trial: f64, hardening: f64) -> Self {
        RadialReturn {
            inelastic_increment: SymTensor::zero(),
            scalar: 0.0,
            q_trial,
            direction: SymTensor::zero(),
            beta: 0.0,
            hardening,
            iterations: 0,
        }
    }

    /// Writes the internal values of this mechanism at the end of the step
    pub fn write_internal_values(&self, old_iv: &[f64], new_iv: &mut [f64]) {
        new_iv[IV_HARDENING] = self.hardening;
        new_iv[IV_EFFECTIVE_STRAIN] = old_iv[IV_EFFECTIVE_STRAIN] + self.scalar;
    }

    /// Adds the stiffness reduction of this mechanism to a tangent
    ///
    /// ```text
    /// D += -(6G²Δp/q*) Pdev + 4G² (Δp/q* - β) n ⊗ n
    /// ```
    pub fn add_stiffness_reduction(&self, tangent: &mut SymElasticityTensor, shear: f64) {
        if self.scalar == 0.0 && self.beta == 0.0 {
            return;
        }
        let gg = shear * shear;
        let ratio = self.scalar / self.q_trial;
        tangent.add_scaled(-6.0 * gg * ratio, &SymElasticityTensor::deviatoric_projector());
        tangent.add_scaled(4.0 * gg * (ratio - self.beta), &SymElasticityTensor::dyad(&self.direction));
    }

    /// Returns the consistent tangent operator given the elasticity tensor
    pub fn tangent(&self, elasticity: &SymElasticityTensor, shear: f64) -> SymElasticityTensor {
        let mut dd = *elasticity;
        self.add_stiffness_reduction(&mut dd, shear);
        dd
    }

    /// Returns the timestep limit Δt · max_increment / Δp (∞ if Δp = 0)
    pub fn timestep_limit(&self, dt: f64, max_increment: f64) -> f64 {
        if self.scalar > 0.0 {
            dt * max_increment / self.scalar
        } else {
            f64::INFINITY
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
