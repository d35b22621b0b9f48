use approx::assert_abs_diff_eq;
use nalgebra::{Matrix3, Rotation3, Vector3};
use pmsolid::base::{Decomposition, Samples, Settings};
use pmsolid::kinematics::{KinematicsEngine, QpDisplacement};
use pmsolid::material::{QpInput, StressStrain};
use pmsolid::tensor::SymTensor;
use pmsolid::Error;

fn assert_tensor_eq(a: &SymTensor, b: &SymTensor, tol: f64) {
    for (x, y) in a.as_array().iter().zip(b.as_array()) {
        assert_abs_diff_eq!(*x, *y, epsilon = tol);
    }
}

// A rigid rotation superposed on a plastically stretched state rotates the stress
// and the strains without changing any invariant.
#[test]
fn test_finite_strain_objectivity() -> Result<(), Error> {
    let mut settings = Settings::new();
    settings.set_finite_strain(Decomposition::Eigen);
    let engine = KinematicsEngine::new(&settings)?;
    let model = StressStrain::new(&Samples::param_linear_hardening(1000.0, 0.25, 1.0, 10.0), &settings)?;

    // stretch
    let stretch = Matrix3::from_diagonal(&Vector3::new(1.01, 1.0, 1.0));
    let disp_0 = QpDisplacement::zero();
    let disp_1 = QpDisplacement::new(stretch - Matrix3::identity());
    let kin = engine.compute_qp(&disp_1, &disp_0)?;
    assert_abs_diff_eq!(kin.strain_increment.get(0, 0), f64::ln(1.01), epsilon = 1e-14);
    let old = model.initial_state();
    let mut stretched = old.clone();
    let input = QpInput::from_kinematics(&kin, engine.finite_strain(), 1.0, 1.0);
    model.update(&input, &old, &mut stretched)?;
    assert!(stretched.effective_inelastic_strain > 0.0);

    // rotate
    let rr = Rotation3::from_axis_angle(&Vector3::z_axis(), std::f64::consts::PI / 6.0).into_inner();
    let disp_2 = QpDisplacement::new(rr * stretch - Matrix3::identity());
    let kin = engine.compute_qp(&disp_2, &disp_1)?;
    assert_tensor_eq(&kin.strain_increment, &SymTensor::zero(), 1e-14);
    let mut rotated = stretched.clone();
    let input = QpInput::from_kinematics(&kin, engine.finite_strain(), 2.0, 1.0);
    model.update(&input, &stretched, &mut rotated)?;

    // check
    assert_tensor_eq(&rotated.stress, &stretched.stress.rotated(&rr), 1e-9);
    assert_tensor_eq(&rotated.plastic_strain, &stretched.plastic_strain.rotated(&rr), 1e-12);
    assert_tensor_eq(&rotated.total_strain, &stretched.total_strain.rotated(&rr), 1e-12);
    assert_abs_diff_eq!(rotated.stress.von_mises(), stretched.stress.von_mises(), epsilon = 1e-9);
    assert_abs_diff_eq!(rotated.stress.trace(), stretched.stress.trace(), epsilon = 1e-9);
    assert_abs_diff_eq!(
        rotated.effective_inelastic_strain,
        stretched.effective_inelastic_strain,
        epsilon = 1e-14
    );
    Ok(())
}

#[test]
fn test_small_strain_ignores_rotations() -> Result<(), Error> {
    let settings = Settings::new();
    let engine = KinematicsEngine::new(&settings)?;
    let gg = Matrix3::new(0.0, -1e-3, 0.0, 1e-3, 0.0, 0.0, 0.0, 0.0, 0.0);
    let kin = engine.compute_qp(&QpDisplacement::new(gg), &QpDisplacement::zero())?;
    assert_tensor_eq(&kin.strain_increment, &SymTensor::zero(), 1e-15);
    assert_eq!(kin.rotation_increment, Matrix3::identity());
    let input = QpInput::from_kinematics(&kin, engine.finite_strain(), 1.0, 1.0);
    assert!(input.rotation_increment.is_none());
    Ok(())
}
