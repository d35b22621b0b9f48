use approx::assert_relative_eq;
use pmsolid::base::{Hardening, ParamCreep, ParamInelastic, ParamPlasticity, ParamStressIteration};
use pmsolid::base::{ParamStressStrain, Samples, Settings, YieldStress};
use pmsolid::material::{LoadingPath, StressStrain};
use pmsolid::tensor::SymTensor;
use pmsolid::Error;

fn plasticity() -> ParamPlasticity {
    ParamPlasticity {
        yield_stress: YieldStress::Constant { value: 1.0 },
        hardening: Hardening::Linear { slope: 100.0 },
    }
}

fn path() -> LoadingPath {
    LoadingPath::new_linear(5, &SymTensor::new(2e-3, 0.0, 0.0, 1e-3, 0.0, 0.0), 1.0, 0.0)
}

#[test]
fn test_combined_with_one_model_equals_the_model() -> Result<(), Error> {
    let direct = Samples::param_linear_hardening(1000.0, 0.25, 1.0, 100.0);
    let mut combined = direct.clone();
    combined.stress_strain = ParamStressStrain::CombinedCreepPlasticity {
        models: vec![ParamInelastic::Plasticity(plasticity())],
        iteration: ParamStressIteration::default(),
    };
    let direct = StressStrain::new(&direct, &Settings::new())?;
    let combined = StressStrain::new(&combined, &Settings::new())?;
    let a = path().follow(&direct)?;
    let b = path().follow(&combined)?;
    for (pa, pb) in a.iter().zip(&b) {
        assert_eq!(pa.state, pb.state);
        assert_eq!(pa.output.tangent, pb.output.tangent);
        assert_eq!(pb.output.iterations, pa.output.iterations);
    }
    assert!(a[4].state.effective_inelastic_strain > 0.0);
    Ok(())
}

#[test]
fn test_combined_creep_plasticity() -> Result<(), Error> {
    let mut param = Samples::param_creep_plasticity(1000.0, 0.25, ParamCreep::new(1e-4, 1.0), plasticity());
    param.return_mapping.abs_tol = 1e-18;
    param.return_mapping.rel_tol = 1e-13;
    if let ParamStressStrain::CombinedCreepPlasticity { iteration, .. } = &mut param.stress_strain {
        iteration.abs_tol = 1e-12;
        iteration.rel_tol = 1e-10;
    }
    let model = StressStrain::new(&param, &Settings::new())?;
    let points = path().follow(&model)?;
    let last = points.last().unwrap();
    let s = &last.state;

    // both mechanisms are active
    let (ec, ep) = (s.internal_values[1], s.internal_values[3]);
    assert!(ec > 0.0);
    assert!(ep > 0.0);
    assert!(last.output.iterations > 1);
    assert_relative_eq!(s.effective_inelastic_strain, ec + ep, max_relative = 1e-12);
    assert_relative_eq!(s.hardening_variable, 100.0 * ep, max_relative = 1e-12);

    // the stress lies on the yield surface
    assert_relative_eq!(s.stress.von_mises(), 1.0 + s.hardening_variable, max_relative = 1e-8);

    // additive decomposition
    let sum = s.elastic_strain + s.plastic_strain + s.creep_strain;
    for (a, b) in sum.as_array().iter().zip(s.total_strain.as_array()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-15);
    }

    // the creep strain limits the timestep
    assert!(last.output.timestep_limit.is_finite());
    assert!(last.output.timestep_limit > 0.0);
    Ok(())
}
