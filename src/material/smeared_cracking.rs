use super::CrackState;
use crate::base::{CrackRelease, ParamCracking};
use crate::tensor::{SymElasticityTensor, SymTensor};
use crate::{Error, Result};

/// Maps the Voigt index to the pair of local directions
const VOIGT_PAIRS: [(usize, usize); 6] = [(0, 0), (1, 1), (2, 2), (0, 1), (1, 2), (2, 0)];

/// Implements the smeared cracking model (elasticity with degraded stiffness)
///
/// The crack directions are the principal directions of the total strain when the first
/// crack initiates; afterwards they are fixed (and only rotated with the material in
/// finite strain). In each crack direction, the stiffness is scaled by a retention
/// ratio that never increases. A crack under compression is closed (full stiffness).
#[derive(Clone, Copy, Debug)]
pub struct SmearedCracking {
    param: ParamCracking,
}

impl SmearedCracking {
    /// Allocates a new instance
    pub fn new(param: &ParamCracking) -> Result<Self> {
        if !(param.cracking_stress > 0.0) {
            return Err(Error::config("the cracking stress must be positive"));
        }
        if param.max_cracks < 1 || param.max_cracks > 3 {
            return Err(Error::config(format!(
                "max_cracks must be 1, 2, or 3; found {}",
                param.max_cracks
            )));
        }
        if !(param.min_retention > 0.0 && param.min_retention <= 1.0) {
            return Err(Error::config("min_retention must be in (0, 1]"));
        }
        match param.release {
            CrackRelease::Abrupt { residual_fraction } | CrackRelease::Exponential { residual_fraction, .. } => {
                if !(0.0..=1.0).contains(&residual_fraction) {
                    return Err(Error::config("the residual fraction must be in [0, 1]"));
                }
            }
            CrackRelease::Power { exponent } => {
                if !(exponent > 0.0) {
                    return Err(Error::config("the release exponent must be positive"));
                }
            }
        }
        Ok(SmearedCracking { param: *param })
    }

    /// Returns the softened crack-normal stress for a maximum strain beyond the cracking strain
    fn released_stress(&self, young: f64, max_strain: f64) -> f64 {
        let sc = self.param.cracking_stress;
        let ec = sc / young;
        match self.param.release {
            CrackRelease::Abrupt { residual_fraction } => residual_fraction * sc,
            CrackRelease::Exponential {
                residual_fraction: r,
                alpha,
            } => {
                let alpha = alpha.unwrap_or(-young);
                sc * (r + (1.0 - r) * f64::exp(alpha * (max_strain - ec) / sc))
            }
            CrackRelease::Power { exponent } => sc * f64::powf(ec / max_strain, exponent),
        }
    }

    /// Updates the crack state and computes the stress and tangent
    ///
    /// Returns `(stress, tangent)` with σ = C_deg : ε where ε is the total strain.
    pub fn update(
        &self,
        elasticity: &SymElasticityTensor,
        young: f64,
        total_strain: &SymTensor,
        old: &CrackState,
        new: &mut CrackState,
    ) -> (SymTensor, SymElasticityTensor) {
        new.clone_from(old);
        let sc = self.param.cracking_stress;
        if !new.initiated {
            let (values, vectors) = total_strain.eigen();
            if young * values[0] <= sc {
                return (elasticity.multiply(total_strain), *elasticity);
            }
            new.initiated = true;
            new.set_rotation(&vectors);
            log::debug!("SmearedCracking: crack initiated with strain {:e}", values[0]);
        }

        // crack-normal strains in the local frame
        let rr = new.rotation();
        let local = total_strain.rotated(&rr.transpose());
        let ec = sc / young;
        let mut factors = [1.0; 3];
        for k in 0..self.param.max_cracks {
            let e = local.get(k, k);
            if e > new.max_strain[k] {
                new.max_strain[k] = e;
            }
            let e_max = new.max_strain[k];
            if e_max > ec {
                let retention = self.released_stress(young, e_max) / (young * e_max);
                new.retention[k] = retention.max(self.param.min_retention).min(old.retention[k]);
            }
            if e > 0.0 {
                factors[k] = new.retention[k];
            }
        }
        if factors.iter().all(|&f| f == 1.0) {
            return (elasticity.multiply(total_strain), *elasticity);
        }

        // degrade the local tensor and rotate back
        let scale: [f64; 6] = VOIGT_PAIRS.map(|(i, j)| f64::powf(factors[i] * factors[j], 0.25));
        let mut voigt = elasticity.rotated(&rr.transpose()).to_voigt();
        for a in 0..6 {
            for b in 0..6 {
                voigt[a][b] *= scale[a] * scale[b];
            }
        }
        let degraded = SymElasticityTensor::from_voigt(&voigt).rotated(&rr);
        (degraded.multiply(total_strain), degraded)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SmearedCracking;
    use crate::base::{CrackRelease, ParamCracking};
    use crate::material::CrackState;
    use crate::tensor::{Lame, SymElasticityTensor, SymTensor};
    use approx::assert_abs_diff_eq;

    const E: f64 = 1000.0;

    fn model(release: CrackRelease) -> SmearedCracking {
        SmearedCracking::new(&ParamCracking {
            cracking_stress: 1.0,
            release,
            max_cracks: 3,
            min_retention: 1e-6,
        })
        .unwrap()
    }

    fn elasticity() -> SymElasticityTensor {
        // ν = 0
        SymElasticityTensor::new_isotropic(Lame {
            lambda: 0.0,
            mu: E / 2.0,
        })
    }

    fn uniaxial(e: f64) -> SymTensor {
        SymTensor::new(e, 0.0, 0.0, 0.0, 0.0, 0.0)
    }

    #[test]
    fn new_captures_errors() {
        let mut param = ParamCracking {
            cracking_stress: 0.0,
            release: CrackRelease::Abrupt { residual_fraction: 0.0 },
            max_cracks: 3,
            min_retention: 1e-6,
        };
        assert!(SmearedCracking::new(&param).is_err());
        param.cracking_stress = 1.0;
        param.max_cracks = 4;
        assert_eq!(
            SmearedCracking::new(&param).err().unwrap().to_string(),
            "configuration error: max_cracks must be 1, 2, or 3; found 4"
        );
        param.max_cracks = 1;
        param.release = CrackRelease::Power { exponent: 0.0 };
        assert!(SmearedCracking::new(&param).is_err());
    }

    #[test]
    fn uncracked_is_elastic() {
        let m = model(CrackRelease::Abrupt { residual_fraction: 0.0 });
        let (old, mut new) = (CrackState::new(), CrackState::new());
        let (stress, tangent) = m.update(&elasticity(), E, &uniaxial(0.5e-3), &old, &mut new);
        assert_abs_diff_eq!(stress.get(0, 0), 0.5, epsilon = 1e-14);
        assert_eq!(tangent, elasticity());
        assert!(!new.initiated);
    }

    #[test]
    fn exponential_release_works() {
        let m = model(CrackRelease::Exponential {
            residual_fraction: 0.0,
            alpha: None,
        });
        let c = elasticity();
        let mut state = CrackState::new();

        // loading beyond the cracking strain
        let mut new = CrackState::new();
        let (stress, _) = m.update(&c, E, &uniaxial(2e-3), &state, &mut new);
        assert!(new.initiated);
        assert_eq!(new.n_cracks(), 1);
        let softened = f64::exp(-1.0);
        assert_abs_diff_eq!(stress.get(0, 0), softened, epsilon = 1e-12);
        assert_abs_diff_eq!(new.max_strain[0], 2e-3, epsilon = 1e-15);
        state = new.clone();

        // unloading follows the secant
        let (stress, tangent) = m.update(&c, E, &uniaxial(1e-3), &state, &mut new);
        assert_abs_diff_eq!(stress.get(0, 0), softened / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(tangent.get(0, 0), softened / 2e-3, epsilon = 1e-9);
        assert_eq!(new.retention, state.retention);

        // the crack closes under compression
        let (stress, _) = m.update(&c, E, &uniaxial(-1e-3), &state, &mut new);
        assert_abs_diff_eq!(stress.get(0, 0), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn abrupt_and_power_release_work() {
        let c = elasticity();
        let m = model(CrackRelease::Abrupt { residual_fraction: 0.0 });
        let mut new = CrackState::new();
        let (stress, _) = m.update(&c, E, &uniaxial(2e-3), &CrackState::new(), &mut new);
        assert_abs_diff_eq!(new.retention[0], 1e-6, epsilon = 1e-20);
        assert_abs_diff_eq!(stress.get(0, 0), 2e-6, epsilon = 1e-12);

        let m = model(CrackRelease::Power { exponent: 1.0 });
        let mut new = CrackState::new();
        let (stress, _) = m.update(&c, E, &uniaxial(2e-3), &CrackState::new(), &mut new);
        assert_abs_diff_eq!(stress.get(0, 0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn retention_never_increases() {
        let m = model(CrackRelease::Power { exponent: 1.0 });
        let c = elasticity();
        let mut old = CrackState::new();
        let mut new = CrackState::new();
        m.update(&c, E, &uniaxial(4e-3), &old, &mut new);
        let retention = new.retention[0];
        old = new.clone();
        // a smaller maximum strain would give a larger retention
        old.max_strain[0] = 0.0;
        m.update(&c, E, &uniaxial(2e-3), &old, &mut new);
        assert_eq!(new.retention[0], retention);
    }
}
