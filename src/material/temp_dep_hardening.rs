use super::{HardeningFn, PreparedLaw};
use crate::base::{ParamTempDepHardening, PiecewiseLinear};
use crate::{Error, Result};
use std::borrow::Cow;

/// Implements the von Mises plasticity with temperature-dependent hardening curves
///
/// At every update, a proxy flow-stress curve is built by interpolating the ordinates of
/// the two curves bracketing the current temperature. Outside the range of temperatures,
/// the first (or last) curve is used as is.
#[derive(Clone, Debug)]
pub struct TempDepHardening {
    temperatures: Vec<f64>,
    curves: Vec<PiecewiseLinear>,
}

impl TempDepHardening {
    /// Allocates a new instance
    pub fn new(param: &ParamTempDepHardening) -> Result<Self> {
        if param.temperatures.is_empty() {
            return Err(Error::config("at least one hardening curve is required"));
        }
        if param.temperatures.len() != param.curves.len() {
            return Err(Error::config(format!(
                "{} temperatures were given for {} hardening curves",
                param.temperatures.len(),
                param.curves.len()
            )));
        }
        if param.temperatures.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(Error::config("the temperatures of the hardening curves must be strictly increasing"));
        }
        Ok(TempDepHardening {
            temperatures: param.temperatures.clone(),
            curves: param.curves.clone(),
        })
    }

    /// Returns the flow-stress curve at the given temperature
    pub fn proxy_curve(&self, temperature: f64) -> Cow<'_, PiecewiseLinear> {
        let n = self.temperatures.len();
        if temperature <= self.temperatures[0] {
            return Cow::Borrowed(&self.curves[0]);
        }
        if temperature >= self.temperatures[n - 1] {
            return Cow::Borrowed(&self.curves[n - 1]);
        }
        let hi = self.temperatures.partition_point(|&t| t <= temperature);
        let lo = hi - 1;
        let f = (temperature - self.temperatures[lo]) / (self.temperatures[hi] - self.temperatures[lo]);
        Cow::Owned(PiecewiseLinear::interpolate(&self.curves[lo], &self.curves[hi], f))
    }

    /// Evaluates the law constants at the current temperature
    pub fn prepare(&self, three_shear: f64, temperature: f64, ep_old: f64) -> PreparedLaw<'_> {
        let curve = self.proxy_curve(temperature);
        let yield_stress = curve.value(0.0);
        PreparedLaw::Yield {
            three_shear,
            yield_stress,
            ep_old,
            hardening: HardeningFn::Curve {
                curve,
                offset: yield_stress,
            },
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
