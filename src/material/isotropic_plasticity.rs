use super::{HardeningFn, PreparedLaw};
use crate::base::{Hardening, ParamPlasticity, YieldStress};
use crate::{Error, Result};
use std::borrow::Cow;

/// Implements the von Mises plasticity with isotropic hardening
///
/// ```text
/// f = q - h(εp) - σy(T)
/// ```
#[derive(Clone, Debug)]
pub struct IsotropicPlasticity {
    yield_stress: YieldStress,
    hardening: Hardening,
}

impl IsotropicPlasticity {
    /// Allocates a new instance
    pub fn new(param: &ParamPlasticity) -> Result<Self> {
        let min_yield = match &param.yield_stress {
            YieldStress::Constant { value } => *value,
            YieldStress::Temperature { table } => table.y().iter().copied().fold(f64::INFINITY, f64::min),
        };
        if !(min_yield >= 0.0) {
            return Err(Error::config("the yield stress must be non-negative"));
        }
        if let Hardening::Linear { slope } = param.hardening {
            if !slope.is_finite() {
                return Err(Error::config("the hardening slope must be finite"));
            }
        }
        Ok(IsotropicPlasticity {
            yield_stress: param.yield_stress.clone(),
            hardening: param.hardening.clone(),
        })
    }

    /// Returns the yield stress at the given temperature
    pub fn yield_stress(&self, temperature: f64) -> f64 {
        match &self.yield_stress {
            YieldStress::Constant { value } => *value,
            YieldStress::Temperature { table } => table.value(temperature),
        }
    }

    /// Evaluates the law constants at the current temperature
    pub fn prepare(&self, three_shear: f64, temperature: f64, ep_old: f64) -> PreparedLaw<'_> {
        let hardening = match &self.hardening {
            Hardening::Linear { slope } => HardeningFn::Linear(*slope),
            Hardening::Curve { curve } => HardeningFn::Curve {
                curve: Cow::Borrowed(curve),
                offset: 0.0,
            },
        };
        PreparedLaw::Yield {
            three_shear,
            yield_stress: self.yield_stress(temperature),
            ep_old,
            hardening,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
