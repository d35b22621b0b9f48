use crate::tensor::SymTensor;
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Defines the number of internal values owned by each inelastic mechanism
///
/// The values are `[hardening variable, effective inelastic strain]`.
pub const N_INTERNAL_PER_MODEL: usize = 2;

/// Holds the index of the hardening variable within the internal values of a mechanism
pub(crate) const IV_HARDENING: usize = 0;

/// Holds the index of the effective inelastic strain within the internal values of a mechanism
pub(crate) const IV_EFFECTIVE_STRAIN: usize = 1;

/// Holds the state of the smeared cracks at a quadrature point
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrackState {
    /// Indicates that the crack directions have been fixed (first crack initiated)
    pub initiated: bool,

    /// Crack normal directions (row k holds direction k)
    pub directions: [[f64; 3]; 3],

    /// Maximum crack-normal strain reached so far in each direction
    pub max_strain: [f64; 3],

    /// Stiffness retention ratio in each direction (0 < retention ≤ 1)
    pub retention: [f64; 3],
}

impl CrackState {
    /// Allocates a new (uncracked) instance
    pub fn new() -> Self {
        CrackState {
            initiated: false,
            directions: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            max_strain: [0.0; 3],
            retention: [1.0; 3],
        }
    }

    /// Returns the rotation matrix whose columns are the crack directions (local to global)
    pub fn rotation(&self) -> Matrix3<f64> {
        let d = &self.directions;
        Matrix3::new(
            d[0][0], d[1][0], d[2][0], //
            d[0][1], d[1][1], d[2][1], //
            d[0][2], d[1][2], d[2][2],
        )
    }

    /// Sets the crack directions from the columns of a matrix
    pub fn set_rotation(&mut self, r: &Matrix3<f64>) {
        for k in 0..3 {
            for i in 0..3 {
                self.directions[k][i] = r[(i, k)];
            }
        }
    }

    /// Returns the number of cracked directions
    pub fn n_cracks(&self) -> usize {
        self.retention.iter().filter(|&&f| f < 1.0).count()
    }
}

/// Holds the persisted state at one quadrature point
///
/// The tensors are expressed in the current configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QpState {
    /// Cauchy stress σ
    pub stress: SymTensor,

    /// Total (mechanical) strain ε
    pub total_strain: SymTensor,

    /// Elastic strain εe
    pub elastic_strain: SymTensor,

    /// Plastic strain εp (sum over the plastic mechanisms)
    pub plastic_strain: SymTensor,

    /// Creep strain εc (sum over the creep mechanisms)
    pub creep_strain: SymTensor,

    /// Hardening variable (sum over the plastic mechanisms)
    pub hardening_variable: f64,

    /// Effective inelastic strain (sum over all mechanisms)
    pub effective_inelastic_strain: f64,

    /// Internal values of each inelastic mechanism (see [N_INTERNAL_PER_MODEL])
    pub internal_values: Vec<f64>,

    /// Smeared crack data (cracking model only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crack: Option<CrackState>,
}

impl QpState {
    /// Allocates a new instance
    pub fn new(n_internal_values: usize, with_crack: bool) -> Self {
        QpState {
            stress: SymTensor::zero(),
            total_strain: SymTensor::zero(),
            elastic_strain: SymTensor::zero(),
            plastic_strain: SymTensor::zero(),
            creep_strain: SymTensor::zero(),
            hardening_variable: 0.0,
            effective_inelastic_strain: 0.0,
            internal_values: vec![0.0; n_internal_values],
            crack: if with_crack { Some(CrackState::new()) } else { None },
        }
    }

    /// Rotates all tensors (and crack directions) by R: A ← R A Rᵀ
    pub fn rotate(&mut self, r: &Matrix3<f64>) {
        self.stress = self.stress.rotated(r);
        self.total_strain = self.total_strain.rotated(r);
        self.elastic_strain = self.elastic_strain.rotated(r);
        self.plastic_strain = self.plastic_strain.rotated(r);
        self.creep_strain = self.creep_strain.rotated(r);
        if let Some(crack) = self.crack.as_mut() {
            let rotated = r * crack.rotation();
            crack.set_rotation(&rotated);
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{CrackState, QpState};
    use crate::tensor::SymTensor;
    use approx::assert_abs_diff_eq;
    use nalgebra::{Matrix3, Rotation3, Vector3};

    #[test]
    fn new_works() {
        let state = QpState::new(4, false);
        assert_eq!(state.internal_values, vec![0.0; 4]);
        assert_eq!(state.stress, SymTensor::zero());
        assert!(state.crack.is_none());
        let state = QpState::new(0, true);
        assert_eq!(state.crack.as_ref().unwrap().n_cracks(), 0);
    }

    #[test]
    fn crack_rotation_works() {
        let mut crack = CrackState::new();
        let r = Rotation3::from_axis_angle(&Vector3::z_axis(), 0.4).into_inner();
        crack.set_rotation(&r);
        assert_eq!(crack.rotation(), r);
        assert_eq!(crack.directions[0], [r[(0, 0)], r[(1, 0)], r[(2, 0)]]);
    }

    #[test]
    fn rotate_works() {
        let mut state = QpState::new(2, true);
        state.stress = SymTensor::new(1.0, 2.0, 3.0, 0.5, 0.0, 0.0);
        state.internal_values[0] = 7.0;
        let r = Rotation3::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2).into_inner();
        state.rotate(&r);
        assert_abs_diff_eq!(state.stress.get(0, 0), 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(state.stress.get(1, 1), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(state.stress.get(0, 1), -0.5, epsilon = 1e-15);
        assert_eq!(state.internal_values[0], 7.0);
        let dirs = state.crack.as_ref().unwrap().rotation();
        assert_abs_diff_eq!(dirs, r * Matrix3::identity(), epsilon = 1e-15);
    }
}
