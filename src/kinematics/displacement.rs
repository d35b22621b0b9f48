use crate::base::Idealization;
use nalgebra::Matrix3;

/// Defines the radius below which a quadrature point is considered on the symmetry axis (or center)
pub const RADIUS_TOLERANCE: f64 = 1e-14;

/// Holds the displacement data delivered by the element at one quadrature point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QpDisplacement {
    /// Displacement gradient ∇u (the hoop entries are computed from `u_r` and `radius`)
    pub grad_u: Matrix3<f64>,

    /// Radial displacement (axisymmetric and spherical idealizations only)
    pub u_r: f64,

    /// Radial coordinate of the quadrature point (axisymmetric and spherical idealizations only)
    pub radius: f64,
}

impl QpDisplacement {
    /// Allocates a new instance with the displacement gradient only
    pub fn new(grad_u: Matrix3<f64>) -> Self {
        QpDisplacement {
            grad_u,
            u_r: 0.0,
            radius: 0.0,
        }
    }

    /// Allocates a new instance with the displacement gradient and radial data
    pub fn with_radial(grad_u: Matrix3<f64>, u_r: f64, radius: f64) -> Self {
        QpDisplacement { grad_u, u_r, radius }
    }

    /// Returns the zero displacement (e.g., the reference configuration)
    pub fn zero() -> Self {
        QpDisplacement::new(Matrix3::zeros())
    }

    /// Returns the hoop term u_r / r, or zero on the axis (r = 0)
    pub fn hoop(&self) -> f64 {
        if f64::abs(self.radius) < RADIUS_TOLERANCE {
            if self.u_r != 0.0 {
                log::warn!(
                    "quadrature point on the symmetry axis (r = {:e}); hoop strain set to zero",
                    self.radius
                );
            }
            return 0.0;
        }
        self.u_r / self.radius
    }

    /// Returns the full 3×3 displacement gradient for the given idealization
    ///
    /// * `ThreeD`: ∇u as given
    /// * `PlaneStrain`: the out-of-plane row and column are zero
    /// * `Axisymmetric`: as plane-strain plus (2,2) = u_r / r
    /// * `Spherical`: only (0,0) = ∂u_r/∂r is kept plus (1,1) = (2,2) = u_r / r
    pub fn full_gradient(&self, idealization: Idealization) -> Matrix3<f64> {
        let mut gg = self.grad_u;
        match idealization {
            Idealization::ThreeD => (),
            Idealization::PlaneStrain | Idealization::Axisymmetric => {
                for k in 0..3 {
                    gg[(2, k)] = 0.0;
                    gg[(k, 2)] = 0.0;
                }
            }
            Idealization::Spherical => {
                let du_dr = gg[(0, 0)];
                gg = Matrix3::zeros();
                gg[(0, 0)] = du_dr;
            }
        }
        if idealization.has_hoop_terms() {
            let hoop = self.hoop();
            for &k in idealization.hoop_indices() {
                gg[(k, k)] = hoop;
            }
        }
        gg
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
