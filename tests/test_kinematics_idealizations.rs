use approx::assert_abs_diff_eq;
use nalgebra::Matrix3;
use pmsolid::base::{Idealization, Settings};
use pmsolid::kinematics::{KinematicsEngine, QpDisplacement};
use pmsolid::Error;

#[test]
fn test_axisymmetric_hoop_strain() -> Result<(), Error> {
    let mut settings = Settings::new();
    settings.set_idealization(Idealization::Axisymmetric);
    let engine = KinematicsEngine::new(&settings)?;
    let gg = Matrix3::new(1e-3, 2e-3, 7.0, 0.0, -1e-3, 7.0, 7.0, 7.0, 7.0);

    // off the axis: εθθ = u_r / r
    let kin = engine.compute_qp(&QpDisplacement::with_radial(gg, 1e-3, 2.0), &QpDisplacement::zero())?;
    let eps = kin.strain_increment;
    assert_abs_diff_eq!(eps.get(0, 0), 1e-3, epsilon = 1e-15);
    assert_abs_diff_eq!(eps.get(1, 1), -1e-3, epsilon = 1e-15);
    assert_abs_diff_eq!(eps.get(0, 1), 1e-3, epsilon = 1e-15);
    assert_abs_diff_eq!(eps.get(2, 2), 5e-4, epsilon = 1e-15);
    assert_eq!(eps.get(1, 2), 0.0);
    assert_eq!(eps.get(2, 0), 0.0);

    // on the axis: the hoop strain is zero
    let kin = engine.compute_qp(&QpDisplacement::with_radial(gg, 1e-3, 0.0), &QpDisplacement::zero())?;
    assert_eq!(kin.strain_increment.get(2, 2), 0.0);
    assert!(kin.strain_increment.is_finite());
    Ok(())
}

#[test]
fn test_spherical_and_plane_strain() -> Result<(), Error> {
    let gg = Matrix3::new(1e-3, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0);

    let mut settings = Settings::new();
    settings.set_idealization(Idealization::Spherical);
    let engine = KinematicsEngine::new(&settings)?;
    let kin = engine.compute_qp(&QpDisplacement::with_radial(gg, 2e-3, 4.0), &QpDisplacement::zero())?;
    let eps = kin.strain_increment;
    assert_eq!(eps.as_array(), &[1e-3, 5e-4, 5e-4, 0.0, 0.0, 0.0]);

    settings.set_idealization(Idealization::PlaneStrain);
    let engine = KinematicsEngine::new(&settings)?;
    let kin = engine.compute_qp(&QpDisplacement::new(gg), &QpDisplacement::zero())?;
    let eps = kin.strain_increment;
    assert_eq!(eps.get(2, 2), 0.0);
    assert_eq!(eps.get(1, 2), 0.0);
    assert_eq!(eps.get(1, 1), 5.0);
    Ok(())
}

#[test]
fn test_volumetric_locking_correction() -> Result<(), Error> {
    let mut settings = Settings::new();
    settings.set_volumetric_locking_correction(true);
    let engine = KinematicsEngine::new(&settings)?;
    let g1 = Matrix3::new(4e-3, 1e-3, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    let g2 = Matrix3::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    let qps = [
        (QpDisplacement::new(g1), QpDisplacement::zero()),
        (QpDisplacement::new(g2), QpDisplacement::zero()),
    ];
    let kin = engine.compute_element(&qps, &[1.0, 3.0])?;
    // average volumetric strain = (4e-3 × 1 + 0 × 3) / 4
    for k in &kin {
        assert_abs_diff_eq!(k.strain_increment.trace(), 1e-3, epsilon = 1e-15);
    }
    // the deviatoric part is kept
    assert_abs_diff_eq!(kin[0].strain_increment.get(0, 1), 5e-4, epsilon = 1e-15);
    assert_abs_diff_eq!(
        kin[0].strain_increment.get(0, 0) - kin[0].strain_increment.get(1, 1),
        4e-3,
        epsilon = 1e-15
    );

    // mismatched arrays
    assert_eq!(
        engine.compute_element(&qps, &[1.0]).err().unwrap().to_string(),
        "configuration error: the number of quadrature points (2) must equal the number of weights (1)"
    );
    Ok(())
}
