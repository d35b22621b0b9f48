use super::{InelasticModel, LawContext, RadialReturn, ReturnMappingSolver, IV_HARDENING, N_INTERNAL_PER_MODEL};
use crate::base::{ParamInelastic, ParamStressIteration};
use crate::tensor::{SymElasticityTensor, SymTensor};
use crate::{Error, QpLocation, Result};

/// Holds the results of the combined update
#[derive(Clone, Debug)]
pub struct CombinedReturn {
    /// Radial-return results of each sub-model (same order as the sub-models)
    pub returns: Vec<RadialReturn>,

    /// Number of outer iterations (the Newton iterations with a single sub-model)
    pub iterations: usize,
}

impl CombinedReturn {
    /// Returns the sum of the inelastic strain increments
    pub fn inelastic_increment(&self) -> SymTensor {
        self.returns
            .iter()
            .fold(SymTensor::zero(), |acc, r| acc + r.inelastic_increment)
    }

    /// Returns the consistent tangent C + Σ (Dₘ - C)
    pub fn tangent(&self, elasticity: &SymElasticityTensor, shear: f64) -> SymElasticityTensor {
        let mut dd = *elasticity;
        for r in &self.returns {
            r.add_stiffness_reduction(&mut dd, shear);
        }
        dd
    }

    /// Returns the smallest timestep limit of the sub-models
    pub fn timestep_limit(&self, dt: f64, max_increment: f64) -> f64 {
        self.returns
            .iter()
            .map(|r| r.timestep_limit(dt, max_increment))
            .fold(f64::INFINITY, f64::min)
    }
}

/// Implements the combination of several inelastic mechanisms by a Picard iteration
///
/// At each outer iteration, the sub-models are visited in the given order. Each
/// sub-model sees the trial stress computed from the total strain increment minus the
/// inelastic increments of all other sub-models (from their latest evaluation).
#[derive(Clone, Debug)]
pub struct CombinedCreepPlasticity {
    models: Vec<InelasticModel>,
    param: ParamStressIteration,
}

impl CombinedCreepPlasticity {
    /// Allocates a new instance
    pub fn new(models: &[ParamInelastic], param: &ParamStressIteration) -> Result<Self> {
        if models.is_empty() {
            return Err(Error::config("the combined model requires at least one sub-model"));
        }
        if param.max_iterations == 0 {
            return Err(Error::config("the stress iteration requires max_iterations > 0"));
        }
        if param.abs_tol < 0.0 || param.rel_tol < 0.0 {
            return Err(Error::config("stress-iteration tolerances must be non-negative"));
        }
        let models = models.iter().map(InelasticModel::new).collect::<Result<Vec<_>>>()?;
        Ok(CombinedCreepPlasticity { models, param: *param })
    }

    /// Returns the sub-models
    pub fn models(&self) -> &[InelasticModel] {
        &self.models
    }

    /// Performs the combined update
    ///
    /// # Input
    ///
    /// * `elasticity` -- the elasticity tensor C
    /// * `old_stress` -- the stress at the end of the previous step
    /// * `strain_increment` -- the total strain increment Δε
    /// * `old_iv` -- the internal values of all sub-models at the end of the previous step
    pub fn update(
        &self,
        solver: &ReturnMappingSolver,
        ctx: &LawContext,
        elasticity: &SymElasticityTensor,
        old_stress: &SymTensor,
        strain_increment: &SymTensor,
        old_iv: &[f64],
    ) -> Result<CombinedReturn> {
        let iv = |m: usize| &old_iv[m * N_INTERNAL_PER_MODEL..(m + 1) * N_INTERNAL_PER_MODEL];
        let trial = *old_stress + elasticity.multiply(strain_increment);

        // single mechanism: no outer iteration
        if self.models.len() == 1 {
            let ret = self.models[0].radial_return(solver, ctx, &trial, iv(0))?;
            return Ok(CombinedReturn {
                iterations: ret.iterations,
                returns: vec![ret],
            });
        }

        let mut returns: Vec<RadialReturn> = (0..self.models.len())
            .map(|m| RadialReturn::elastic(0.0, iv(m)[IV_HARDENING]))
            .collect();
        let mut last = trial;
        let mut first_delta = 0.0;
        let mut delta = 0.0;
        for it in 0..self.param.max_iterations {
            for (m, model) in self.models.iter().enumerate() {
                let others = returns
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| *k != m)
                    .fold(SymTensor::zero(), |acc, (_, r)| acc + r.inelastic_increment);
                let trial_m = *old_stress + elasticity.multiply(&(*strain_increment - others));
                returns[m] = model.radial_return(solver, ctx, &trial_m, iv(m))?;
            }
            let inelastic = returns
                .iter()
                .fold(SymTensor::zero(), |acc, r| acc + r.inelastic_increment);
            let stress = *old_stress + elasticity.multiply(&(*strain_increment - inelastic));
            delta = (stress - last).norm();
            if it == 0 {
                first_delta = delta;
            }
            log::debug!("CombinedCreepPlasticity: iteration {}: |Δσ| = {:e}", it, delta);
            if delta <= self.param.abs_tol || (first_delta > 0.0 && delta / first_delta <= self.param.rel_tol) {
                return Ok(CombinedReturn {
                    returns,
                    iterations: it + 1,
                });
            }
            last = stress;
        }
        Err(Error::StressIteration {
            law: "CombinedCreepPlasticity",
            location: QpLocation::unknown(),
            iterations: self.param.max_iterations,
            delta_stress: delta,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
