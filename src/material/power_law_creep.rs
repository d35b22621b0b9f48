use super::PreparedLaw;
use crate::base::ParamCreep;
use crate::{Error, Result};

/// Implements the power-law creep with Arrhenius temperature dependence and time hardening
///
/// ```text
/// dεc/dt = A qⁿ exp(-Q / (R T)) (t - t0)ᵐ
/// ```
#[derive(Clone, Copy, Debug)]
pub struct PowerLawCreep {
    param: ParamCreep,
}

impl PowerLawCreep {
    /// Allocates a new instance
    pub fn new(param: &ParamCreep) -> Result<Self> {
        if !(param.coefficient >= 0.0) {
            return Err(Error::config("the creep coefficient must be non-negative"));
        }
        if !(param.exponent > 0.0) {
            return Err(Error::config("the creep exponent must be positive"));
        }
        if !(param.gas_constant > 0.0) {
            return Err(Error::config("the gas constant must be positive"));
        }
        Ok(PowerLawCreep { param: *param })
    }

    /// Evaluates the rate factor multiplying qⁿ, integrated over the timestep
    pub fn factor(&self, temperature: f64, time: f64, dt: f64) -> Result<f64> {
        let p = &self.param;
        let arrhenius = if p.activation_energy == 0.0 {
            1.0
        } else {
            if !(temperature > 0.0) {
                return Err(Error::config(format!(
                    "the temperature (T = {}) must be positive for the Arrhenius factor",
                    temperature
                )));
            }
            f64::exp(-p.activation_energy / (p.gas_constant * temperature))
        };
        let elapsed = time - p.start_time;
        let time_hardening = if p.time_exponent == 0.0 {
            1.0
        } else if elapsed > 0.0 {
            f64::powf(elapsed, p.time_exponent)
        } else {
            0.0
        };
        Ok(p.coefficient * arrhenius * time_hardening * dt)
    }

    /// Evaluates the law constants at the current temperature and time
    pub fn prepare(&self, three_shear: f64, temperature: f64, time: f64, dt: f64) -> Result<PreparedLaw<'static>> {
        Ok(PreparedLaw::Rate {
            three_shear,
            factor: self.factor(temperature, time, dt)?,
            exponent: self.param.exponent,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
