use crate::base::{ParamReturnMapping, PiecewiseLinear};
use crate::{Error, QpLocation, Result};
use std::borrow::Cow;

/// Holds the isotropic hardening function h(εp) of a prepared yield law
#[derive(Clone, Debug)]
pub enum HardeningFn<'a> {
    /// h = H εp
    Linear(f64),

    /// h = curve(εp) - offset
    Curve {
        curve: Cow<'a, PiecewiseLinear>,
        offset: f64,
    },
}

impl<'a> HardeningFn<'a> {
    /// Returns h(εp)
    pub fn value(&self, ep: f64) -> f64 {
        match self {
            HardeningFn::Linear(slope) => slope * ep,
            HardeningFn::Curve { curve, offset } => curve.value(ep) - offset,
        }
    }

    /// Returns dh/dεp
    pub fn slope(&self, ep: f64) -> f64 {
        match self {
            HardeningFn::Linear(slope) => *slope,
            HardeningFn::Curve { curve, .. } => curve.derivative(ep),
        }
    }
}

/// Holds a radial-return law with all constants evaluated at the current temperature and time
///
/// The scalar unknown Δp is the effective inelastic strain increment and q* is the
/// effective (von Mises) trial stress. Both residuals are written in strain units.
#[derive(Clone, Debug)]
pub enum PreparedLaw<'a> {
    /// Yield-surface law (plasticity):
    ///
    /// ```text
    /// r(Δp) = (q* - h(εp_old + Δp) - σy) / 3G - Δp
    /// ```
    Yield {
        three_shear: f64,
        yield_stress: f64,
        ep_old: f64,
        hardening: HardeningFn<'a>,
    },

    /// Rate law (power-law creep):
    ///
    /// ```text
    /// r(Δp) = factor (q* - 3G Δp)ⁿ - Δp       factor = A exp(-Q/RT) (t - t0)ᵐ Δt
    /// ```
    Rate {
        three_shear: f64,
        factor: f64,
        exponent: f64,
    },
}

impl<'a> PreparedLaw<'a> {
    /// Returns 3G
    pub fn three_shear(&self) -> f64 {
        match self {
            PreparedLaw::Yield { three_shear, .. } | PreparedLaw::Rate { three_shear, .. } => *three_shear,
        }
    }

    /// Evaluates the activation condition with the effective trial stress
    ///
    /// Returns false if the trial state is admissible (no inelastic flow).
    pub fn activated(&self, q_trial: f64) -> bool {
        match self {
            PreparedLaw::Yield {
                yield_stress,
                ep_old,
                hardening,
                ..
            } => q_trial - hardening.value(*ep_old) - yield_stress > 0.0,
            PreparedLaw::Rate { factor, .. } => *factor > 0.0 && q_trial > 0.0,
        }
    }

    /// Returns the updated hardening variable h(εp_old + Δp) (zero for rate laws)
    pub fn hardening_value(&self, dp: f64) -> f64 {
        match self {
            PreparedLaw::Yield { ep_old, hardening, .. } => hardening.value(ep_old + dp),
            PreparedLaw::Rate { .. } => 0.0,
        }
    }

    /// Evaluates the residual r(Δp)
    pub fn residual(&self, q_trial: f64, dp: f64) -> f64 {
        match self {
            PreparedLaw::Yield {
                three_shear,
                yield_stress,
                ep_old,
                hardening,
            } => (q_trial - hardening.value(ep_old + dp) - yield_stress) / three_shear - dp,
            PreparedLaw::Rate {
                three_shear,
                factor,
                exponent,
            } => {
                let q = q_trial - three_shear * dp;
                if q <= 0.0 {
                    return -dp;
                }
                factor * f64::powf(q, *exponent) - dp
            }
        }
    }

    /// Evaluates the derivative ∂r/∂Δp
    pub fn derivative(&self, q_trial: f64, dp: f64) -> f64 {
        match self {
            PreparedLaw::Yield {
                three_shear,
                ep_old,
                hardening,
                ..
            } => -hardening.slope(ep_old + dp) / three_shear - 1.0,
            PreparedLaw::Rate {
                three_shear,
                factor,
                exponent,
            } => {
                let q = q_trial - three_shear * dp;
                if q <= 0.0 {
                    return -1.0;
                }
                -three_shear * exponent * factor * f64::powf(q, exponent - 1.0) - 1.0
            }
        }
    }

    /// Evaluates the derivative ∂r/∂q* (used by the consistent tangent)
    pub fn d_residual_d_trial(&self, q_trial: f64, dp: f64) -> f64 {
        match self {
            PreparedLaw::Yield { three_shear, .. } => 1.0 / three_shear,
            PreparedLaw::Rate {
                three_shear,
                factor,
                exponent,
            } => {
                let q = q_trial - three_shear * dp;
                if q <= 0.0 {
                    return 0.0;
                }
                exponent * factor * f64::powf(q, exponent - 1.0)
            }
        }
    }
}

/// Holds the results of the scalar return-mapping iteration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalarSolution {
    /// Converged effective inelastic strain increment Δp
    pub scalar: f64,

    /// Number of iterations
    pub iterations: usize,

    /// Final residual
    pub residual: f64,
}

/// Implements the scalar Newton iteration of radial-return laws
///
/// The unknown is bracketed by [0, q*/3G] (no flow / full relaxation of the trial
/// deviatoric stress). A Newton update leaving the bracket is replaced by bisection.
#[derive(Clone, Copy, Debug)]
pub struct ReturnMappingSolver {
    /// Holds the iteration parameters
    pub param: ParamReturnMapping,

    /// Prints the iterations
    pub verbose: bool,
}

impl ReturnMappingSolver {
    /// Allocates a new instance
    pub fn new(param: &ParamReturnMapping, verbose: bool) -> Result<Self> {
        if param.abs_tol < 0.0 || param.rel_tol < 0.0 {
            return Err(Error::config("return-mapping tolerances must be non-negative"));
        }
        if param.max_inelastic_increment <= 0.0 {
            return Err(Error::config("max_inelastic_increment must be positive"));
        }
        Ok(ReturnMappingSolver { param: *param, verbose })
    }

    /// Indicates that the residual satisfies the tolerances
    fn converged(&self, residual: f64, reference: f64) -> bool {
        let r = f64::abs(residual);
        r < self.param.abs_tol || (reference > 0.0 && r / reference < self.param.rel_tol)
    }

    /// Solves r(Δp) = 0 for an activated law
    ///
    /// # Errors
    ///
    /// Returns [Error::ReturnMapping] if the iteration cap is exceeded.
    pub fn solve(&self, law: &'static str, prepared: &PreparedLaw, q_trial: f64) -> Result<ScalarSolution> {
        let reference = q_trial / prepared.three_shear();
        let (mut lower, mut upper) = (0.0, reference);
        let mut dp = 0.0;
        let mut r = prepared.residual(q_trial, dp);
        self.print_header(law, q_trial);
        for it in 0..self.param.max_iterations {
            self.print_iteration(it, dp, r, reference);
            if self.converged(r, reference) {
                return Ok(ScalarSolution {
                    scalar: dp,
                    iterations: it,
                    residual: r,
                });
            }
            // r is decreasing in Δp
            if r > 0.0 {
                lower = dp;
            } else {
                upper = dp;
            }
            let dr = prepared.derivative(q_trial, dp);
            let mut next = dp - r / dr;
            if !next.is_finite() || next <= lower || next >= upper {
                next = 0.5 * (lower + upper);
            }
            dp = next;
            r = prepared.residual(q_trial, dp);
            log::debug!("{}: iteration {}: Δp = {:e}, r = {:e}", law, it + 1, dp, r);
        }
        let n = self.param.max_iterations;
        self.print_iteration(n, dp, r, reference);
        if self.converged(r, reference) {
            return Ok(ScalarSolution {
                scalar: dp,
                iterations: n,
                residual: r,
            });
        }
        Err(Error::ReturnMapping {
            law,
            location: QpLocation::unknown(),
            iterations: n,
            residual: f64::abs(r),
        })
    }

    /// Prints the header of the table with iteration data
    fn print_header(&self, law: &str, q_trial: f64) {
        if self.verbose {
            println!("{}: q* = {:.6e}", law, q_trial);
            println!("{:>5} {:>13} {:>10}", "iter", "Δp", "|r|");
        }
    }

    /// Prints iteration data
    fn print_iteration(&self, it: usize, dp: f64, r: f64, reference: f64) {
        if !self.verbose {
            return;
        }
        let flag = if !r.is_finite() {
            "😱" // found NaN or Inf
        } else if self.converged(r, reference) {
            "✅"
        } else {
            "  "
        };
        println!("{:>5} {:>13.6e} {:>10.2e}{}", it, dp, f64::abs(r), flag);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{HardeningFn, PreparedLaw, ReturnMappingSolver};
    use crate::base::{ParamReturnMapping, PiecewiseLinear};
    use approx::assert_relative_eq;
    use std::borrow::Cow;

    const G: f64 = 200e9 / 2.6;

    fn linear_law(slope: f64) -> PreparedLaw<'static> {
        PreparedLaw::Yield {
            three_shear: 3.0 * G,
            yield_stress: 250e6,
            ep_old: 0.0,
            hardening: HardeningFn::Linear(slope),
        }
    }

    #[test]
    fn new_captures_errors() {
        let mut param = ParamReturnMapping::default();
        param.abs_tol = -1.0;
        assert!(ReturnMappingSolver::new(&param, false).is_err());
        let mut param = ParamReturnMapping::default();
        param.max_inelastic_increment = 0.0;
        assert!(ReturnMappingSolver::new(&param, false).is_err());
    }

    #[test]
    fn linear_hardening_converges_in_one_iteration() {
        let solver = ReturnMappingSolver::new(&ParamReturnMapping::default(), true).unwrap();
        let law = linear_law(1e9);
        let q_trial = 1e9;
        assert!(law.activated(q_trial));
        let sol = solver.solve("IsotropicPlasticity", &law, q_trial).unwrap();
        assert_eq!(sol.iterations, 1);
        assert_relative_eq!(sol.scalar, (q_trial - 250e6) / (3.0 * G + 1e9), max_relative = 1e-12);
    }

    #[test]
    fn elastic_trial_is_not_activated() {
        let law = linear_law(1e9);
        assert!(!law.activated(250e6));
        assert!(!law.activated(100e6));
    }

    #[test]
    fn curve_hardening_works() {
        let solver = ReturnMappingSolver::new(&ParamReturnMapping::default(), false).unwrap();
        let curve = PiecewiseLinear::new(vec![0.0, 0.001, 1.0], vec![0.0, 10e6, 20e6]).unwrap();
        let law = PreparedLaw::Yield {
            three_shear: 3.0 * G,
            yield_stress: 250e6,
            ep_old: 0.0,
            hardening: HardeningFn::Curve {
                curve: Cow::Owned(curve.clone()),
                offset: 0.0,
            },
        };
        let q_trial = 600e6;
        let sol = solver.solve("IsotropicPlasticity", &law, q_trial).unwrap();
        let dp = sol.scalar;
        let q = q_trial - 3.0 * G * dp;
        assert_relative_eq!(q, 250e6 + curve.value(dp), max_relative = 1e-7);
    }

    #[test]
    fn creep_converges() {
        let solver = ReturnMappingSolver::new(&ParamReturnMapping::default(), false).unwrap();
        let (a, n, dt) = (1e-40, 4.0, 100.0);
        let law = PreparedLaw::Rate {
            three_shear: 3.0 * G,
            factor: a * dt,
            exponent: n,
        };
        let q_trial = 400e6;
        let sol = solver.solve("PowerLawCreep", &law, q_trial).unwrap();
        let dp = sol.scalar;
        let q = q_trial - 3.0 * G * dp;
        assert_relative_eq!(dp, a * dt * q.powf(n), max_relative = 1e-7);
        assert!(dp > 0.0 && dp < q_trial / (3.0 * G));
    }

    #[test]
    fn stiff_creep_converges() {
        let solver = ReturnMappingSolver::new(&ParamReturnMapping::default(), false).unwrap();
        let law = PreparedLaw::Rate {
            three_shear: 3.0,
            factor: 1e3,
            exponent: 5.0,
        };
        let sol = solver.solve("PowerLawCreep", &law, 10.0).unwrap();
        assert!(sol.scalar > 0.0 && sol.scalar < 10.0 / 3.0);
        assert!(f64::abs(sol.residual) < 1e-8 * 10.0 / 3.0 || f64::abs(sol.residual) < 1e-11);
    }

    #[test]
    fn failure_is_captured() {
        let mut param = ParamReturnMapping::default();
        param.max_iterations = 1;
        let solver = ReturnMappingSolver::new(&param, false).unwrap();
        let law = PreparedLaw::Rate {
            three_shear: 3.0,
            factor: 1e3,
            exponent: 5.0,
        };
        let err = solver.solve("PowerLawCreep", &law, 10.0).err().unwrap();
        assert!(err.to_string().starts_with("PowerLawCreep: return mapping did not converge after 1 iterations"));
        assert!(err.is_recoverable());
    }
}
