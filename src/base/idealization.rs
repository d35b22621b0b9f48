use serde::{Deserialize, Serialize};

/// Defines the geometry idealization (3D, plane-strain, axisymmetric, spherical)
///
/// The displacement gradient delivered by the element is always a 3×3 matrix. The reduced
/// formulations add the "hoop" terms that depend on the radial displacement and radius:
///
/// * `Axisymmetric` (RZ with x = r, y = z, z = θ): `∂u_θ/∂θ = u_r / r` at (2,2)
/// * `Spherical` (1D radial with x = r): `u_r / r` at (1,1) and (2,2)
///
/// At r = 0 the hoop terms are defined as zero.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum Idealization {
    /// General 3D analysis
    ThreeD,

    /// 2D plane-strain (the out-of-plane gradient terms are zero)
    PlaneStrain,

    /// 2D axisymmetric analysis in the (r, z) plane
    Axisymmetric,

    /// 1D spherically symmetric analysis along r
    Spherical,
}

impl Idealization {
    /// Indicates that the idealization carries hoop terms depending on u_r / r
    pub fn has_hoop_terms(&self) -> bool {
        matches!(self, Idealization::Axisymmetric | Idealization::Spherical)
    }

    /// Returns the diagonal entries of the displacement gradient that hold the hoop terms
    pub fn hoop_indices(&self) -> &'static [usize] {
        match self {
            Idealization::ThreeD | Idealization::PlaneStrain => &[],
            Idealization::Axisymmetric => &[2],
            Idealization::Spherical => &[1, 2],
        }
    }
}

impl Default for Idealization {
    fn default() -> Self {
        Idealization::ThreeD
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Idealization;

    #[test]
    fn derive_works() {
        let ideal = Idealization::Axisymmetric;
        let clone = ideal.clone();
        assert_eq!(format!("{:?}", clone), "Axisymmetric");
        assert_eq!(Idealization::default(), Idealization::ThreeD);
        let json = serde_json::to_string(&Idealization::Spherical).unwrap();
        assert_eq!(json, "\"Spherical\"");
    }

    #[test]
    fn hoop_indices_work() {
        assert!(!Idealization::ThreeD.has_hoop_terms());
        assert!(!Idealization::PlaneStrain.has_hoop_terms());
        assert_eq!(Idealization::PlaneStrain.hoop_indices(), &[] as &[usize]);
        assert_eq!(Idealization::Axisymmetric.hoop_indices(), &[2]);
        assert_eq!(Idealization::Spherical.hoop_indices(), &[1, 2]);
    }
}
