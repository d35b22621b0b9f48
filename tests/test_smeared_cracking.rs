use approx::assert_abs_diff_eq;
use pmsolid::base::{CrackRelease, Samples, Settings};
use pmsolid::material::{LoadingPath, StressStrain};
use pmsolid::tensor::SymTensor;
use pmsolid::Error;

fn uniaxial(e: f64) -> SymTensor {
    SymTensor::new(e, 0.0, 0.0, 0.0, 0.0, 0.0)
}

#[test]
fn test_smeared_cracking_cycle() -> Result<(), Error> {
    let release = CrackRelease::Exponential {
        residual_fraction: 0.0,
        alpha: None,
    };
    let model = StressStrain::new(&Samples::param_cracking(1000.0, 1.0, release), &Settings::new())?;
    let mut path = LoadingPath::new();
    path.push_strain(&uniaxial(0.5e-3), 1.0, 0.0)
        .push_strain(&uniaxial(2e-3), 1.0, 0.0)
        .push_strain(&uniaxial(1e-3), 1.0, 0.0)
        .push_strain(&uniaxial(-1e-3), 1.0, 0.0)
        .push_strain(&uniaxial(3e-3), 1.0, 0.0);
    let points = path.follow(&model)?;
    let sxx: Vec<f64> = points.iter().map(|p| p.state.stress.get(0, 0)).collect();
    let softened = f64::exp(-1.0);

    // uncracked
    assert_abs_diff_eq!(sxx[0], 0.5, epsilon = 1e-12);
    assert!(!points[0].state.crack.as_ref().unwrap().initiated);

    // softening
    assert_abs_diff_eq!(sxx[1], softened, epsilon = 1e-12);
    assert_eq!(points[1].state.crack.as_ref().unwrap().n_cracks(), 1);

    // secant unloading
    assert_abs_diff_eq!(sxx[2], softened / 2.0, epsilon = 1e-12);

    // closed crack
    assert_abs_diff_eq!(sxx[3], -1.0, epsilon = 1e-12);

    // reloading beyond the maximum strain continues the softening curve
    assert_abs_diff_eq!(sxx[4], f64::exp(-2.0), epsilon = 1e-12);

    // lateral stresses remain zero (ν = 0)
    for p in &points {
        assert_abs_diff_eq!(p.state.stress.get(1, 1), 0.0, epsilon = 1e-12);
    }
    Ok(())
}
