use super::{eigen, rashid, Decomposed, QpDisplacement};
use crate::base::{Decomposition, Formulation, Idealization, Settings};
use crate::tensor::SymTensor;
use crate::{Error, Result};
use nalgebra::Matrix3;

/// Holds the kinematic quantities at one quadrature point for one time increment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QpKinematics {
    /// Strain increment Δε (in the unrotated frame for finite strain)
    pub strain_increment: SymTensor,

    /// Incremental rotation R̂ (identity for small strain)
    pub rotation_increment: Matrix3<f64>,
}

/// Computes strain increments and incremental rotations from displacement gradients
///
/// The formulation and the decomposition algorithm are selected once, at construction.
#[derive(Clone, Copy, Debug)]
pub struct KinematicsEngine {
    idealization: Idealization,
    formulation: Formulation,
    large_strain: bool,
    decomposition: Decomposition,
    locking_correction: bool,
}

impl KinematicsEngine {
    /// Allocates a new instance
    pub fn new(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        Ok(KinematicsEngine {
            idealization: settings.idealization,
            formulation: settings.formulation,
            large_strain: settings.large_strain,
            decomposition: settings.decomposition,
            locking_correction: settings.volumetric_locking_correction,
        })
    }

    /// Indicates that the stress must be rotated by the incremental rotation
    pub fn finite_strain(&self) -> bool {
        self.formulation == Formulation::FiniteStrain
    }

    /// Computes the (total) small strain ε = sym(∇u) [+ ½ ∇uᵀ ∇u]
    fn small_strain(&self, disp: &QpDisplacement) -> SymTensor {
        let gg = disp.full_gradient(self.idealization);
        let mut eps = SymTensor::from_matrix(&gg);
        if self.large_strain {
            eps += SymTensor::from_matrix(&(0.5 * gg.transpose() * gg));
        }
        eps
    }

    /// Computes the incremental deformation gradient F̂ = (I + ∇u_new)(I + ∇u_old)⁻¹
    fn incremental_gradient(&self, current: &QpDisplacement, old: &QpDisplacement) -> Result<Matrix3<f64>> {
        let ff_new = Matrix3::identity() + current.full_gradient(self.idealization);
        let ff_old = Matrix3::identity() + old.full_gradient(self.idealization);
        let inv_old = ff_old
            .try_inverse()
            .ok_or_else(|| Error::kinematics("previous deformation gradient is singular"))?;
        let f_hat = ff_new * inv_old;
        let det = f_hat.determinant();
        if !(det > 0.0) {
            return Err(Error::kinematics(format!(
                "non-positive Jacobian of the incremental deformation gradient ({:e})",
                det
            )));
        }
        Ok(f_hat)
    }

    fn decompose(&self, f_hat: &Matrix3<f64>) -> Result<Decomposed> {
        match self.decomposition {
            Decomposition::Rashid => rashid(f_hat),
            Decomposition::Eigen => eigen(f_hat),
        }
    }

    /// Computes the kinematics at a single quadrature point (no locking correction)
    pub fn compute_qp(&self, current: &QpDisplacement, old: &QpDisplacement) -> Result<QpKinematics> {
        match self.formulation {
            Formulation::SmallStrain => Ok(QpKinematics {
                strain_increment: self.small_strain(current) - self.small_strain(old),
                rotation_increment: Matrix3::identity(),
            }),
            Formulation::FiniteStrain => {
                let f_hat = self.incremental_gradient(current, old)?;
                let res = self.decompose(&f_hat)?;
                Ok(QpKinematics {
                    strain_increment: res.strain_increment,
                    rotation_increment: res.rotation_increment,
                })
            }
        }
    }

    /// Computes the kinematics at all quadrature points of an element
    ///
    /// # Input
    ///
    /// * `qps` -- (current, old) displacement data at each quadrature point
    /// * `weights` -- integration weights times the Jacobian determinant (and 2πr if axisymmetric)
    ///
    /// With the volumetric locking correction, the volumetric part of the strain (or of F̂ for
    /// finite strain) at each point is replaced by the element average.
    pub fn compute_element(&self, qps: &[(QpDisplacement, QpDisplacement)], weights: &[f64]) -> Result<Vec<QpKinematics>> {
        if qps.len() != weights.len() {
            return Err(Error::config(format!(
                "the number of quadrature points ({}) must equal the number of weights ({})",
                qps.len(),
                weights.len()
            )));
        }
        if !self.locking_correction || qps.is_empty() {
            return qps.iter().map(|(current, old)| self.compute_qp(current, old)).collect();
        }
        let volume: f64 = weights.iter().sum();
        if !(volume > 0.0) {
            return Err(Error::kinematics("element volume must be positive"));
        }
        match self.formulation {
            Formulation::SmallStrain => {
                let mut eps_new: Vec<SymTensor> = qps.iter().map(|(c, _)| self.small_strain(c)).collect();
                let mut eps_old: Vec<SymTensor> = qps.iter().map(|(_, o)| self.small_strain(o)).collect();
                for strains in [&mut eps_new, &mut eps_old] {
                    let avg = strains.iter().zip(weights).map(|(e, w)| e.trace() * w).sum::<f64>() / volume;
                    for eps in strains.iter_mut() {
                        let tr = eps.trace();
                        eps.add_diagonal((avg - tr) / 3.0);
                    }
                }
                Ok(eps_new
                    .into_iter()
                    .zip(eps_old)
                    .map(|(e_new, e_old)| QpKinematics {
                        strain_increment: e_new - e_old,
                        rotation_increment: Matrix3::identity(),
                    })
                    .collect())
            }
            Formulation::FiniteStrain => {
                let mut f_hats = Vec::with_capacity(qps.len());
                for (current, old) in qps {
                    f_hats.push(self.incremental_gradient(current, old)?);
                }
                let dets: Vec<f64> = f_hats.iter().map(|f| f.determinant()).collect();
                let avg = dets.iter().zip(weights).map(|(d, w)| d * w).sum::<f64>() / volume;
                f_hats
                    .iter()
                    .zip(dets)
                    .map(|(f_hat, det)| {
                        let corrected = f_hat * f64::cbrt(avg / det);
                        let res = self.decompose(&corrected)?;
                        Ok(QpKinematics {
                            strain_increment: res.strain_increment,
                            rotation_increment: res.rotation_increment,
                        })
                    })
                    .collect()
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
