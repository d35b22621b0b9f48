use super::{
    CrackRelease, ElasticConstants, Hardening, ParamCracking, ParamCreep, ParamElasticity, ParamInelastic,
    ParamPlasticity, ParamReturnMapping, ParamSolid, ParamStressIteration, ParamStressStrain, ParamTempDepHardening,
    PiecewiseLinear, YieldStress,
};

/// Holds some sample material parameters
pub struct Samples;

impl Samples {
    /// Returns parameters for a linear-elastic solid
    pub fn param_elastic(young: f64, poisson: f64) -> ParamSolid {
        ParamSolid {
            elasticity: ParamElasticity::Constant(ElasticConstants::young_poisson(young, poisson)),
            stress_strain: ParamStressStrain::LinearElastic,
            return_mapping: ParamReturnMapping::default(),
            initial_stress: None,
        }
    }

    /// Returns parameters for von Mises plasticity with linear hardening
    pub fn param_linear_hardening(young: f64, poisson: f64, yield_stress: f64, slope: f64) -> ParamSolid {
        ParamSolid {
            elasticity: ParamElasticity::Constant(ElasticConstants::young_poisson(young, poisson)),
            stress_strain: ParamStressStrain::IsotropicPlasticity(ParamPlasticity {
                yield_stress: YieldStress::Constant { value: yield_stress },
                hardening: Hardening::Linear { slope },
            }),
            return_mapping: ParamReturnMapping::default(),
            initial_stress: None,
        }
    }

    /// Returns parameters for a steel-like material (SI units)
    ///
    /// E = 200 GPa, ν = 0.3, σy = 250 MPa, H = 1 GPa
    pub fn param_steel() -> ParamSolid {
        Samples::param_linear_hardening(200e9, 0.3, 250e6, 1e9)
    }

    /// Returns parameters for power-law creep without temperature and time dependence
    pub fn param_creep(young: f64, poisson: f64, coefficient: f64, exponent: f64) -> ParamSolid {
        ParamSolid {
            elasticity: ParamElasticity::Constant(ElasticConstants::young_poisson(young, poisson)),
            stress_strain: ParamStressStrain::PowerLawCreep(ParamCreep::new(coefficient, exponent)),
            return_mapping: ParamReturnMapping::default(),
            initial_stress: None,
        }
    }

    /// Returns parameters for the combination of power-law creep and linear-hardening plasticity
    pub fn param_creep_plasticity(young: f64, poisson: f64, creep: ParamCreep, plasticity: ParamPlasticity) -> ParamSolid {
        ParamSolid {
            elasticity: ParamElasticity::Constant(ElasticConstants::young_poisson(young, poisson)),
            stress_strain: ParamStressStrain::CombinedCreepPlasticity {
                models: vec![ParamInelastic::Creep(creep), ParamInelastic::Plasticity(plasticity)],
                iteration: ParamStressIteration::default(),
            },
            return_mapping: ParamReturnMapping::default(),
            initial_stress: None,
        }
    }

    /// Returns the temperature-dependent hardening curves at 300 and 500
    ///
    /// * at 300: σ(εp) from (0, 100) to (0.1, 200)
    /// * at 500: σ(εp) from (0, 50) to (0.1, 100)
    pub fn param_temp_dep_curves() -> ParamTempDepHardening {
        ParamTempDepHardening {
            temperatures: vec![300.0, 500.0],
            curves: vec![
                PiecewiseLinear::new_unchecked(vec![0.0, 0.1], vec![100.0, 200.0]),
                PiecewiseLinear::new_unchecked(vec![0.0, 0.1], vec![50.0, 100.0]),
            ],
        }
    }

    /// Returns parameters for plasticity with temperature-dependent hardening curves
    pub fn param_temp_dep_hardening(young: f64, poisson: f64) -> ParamSolid {
        ParamSolid {
            elasticity: ParamElasticity::Constant(ElasticConstants::young_poisson(young, poisson)),
            stress_strain: ParamStressStrain::TempDepHardening(Samples::param_temp_dep_curves()),
            return_mapping: ParamReturnMapping::default(),
            initial_stress: None,
        }
    }

    /// Returns parameters for smeared cracking (Poisson's coefficient = 0)
    pub fn param_cracking(young: f64, cracking_stress: f64, release: CrackRelease) -> ParamSolid {
        ParamSolid {
            elasticity: ParamElasticity::Constant(ElasticConstants::young_poisson(young, 0.0)),
            stress_strain: ParamStressStrain::SmearedCracking(ParamCracking {
                cracking_stress,
                release,
                max_cracks: 3,
                min_retention: 1e-6,
            }),
            return_mapping: ParamReturnMapping::default(),
            initial_stress: None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Samples;
    use crate::base::{ParamStressStrain, YieldStress};

    #[test]
    fn samples_work() {
        let steel = Samples::param_steel();
        match steel.stress_strain {
            ParamStressStrain::IsotropicPlasticity(p) => {
                assert_eq!(p.yield_stress, YieldStress::Constant { value: 250e6 })
            }
            _ => panic!("wrong model"),
        }
        let tdh = Samples::param_temp_dep_curves();
        assert_eq!(tdh.curves[0].value(0.05), 150.0);
        assert_eq!(tdh.curves[1].value(0.05), 75.0);
    }
}
