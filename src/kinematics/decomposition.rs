use crate::tensor::SymTensor;
use crate::{Error, Result};
use nalgebra::{Matrix3, Vector3};

/// Holds the result of the decomposition of the incremental deformation gradient F̂ = R̂ Û
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decomposed {
    /// Logarithmic strain increment ln Û (in the unrotated frame)
    pub strain_increment: SymTensor,

    /// Incremental rotation R̂
    pub rotation_increment: Matrix3<f64>,
}

/// Decomposes F̂ using the closed-form approximation of Rashid (1993)
///
/// With A = I - F̂⁻¹ and X = A Aᵀ - A - Aᵀ = Ĉ⁻¹ - I, the strain increment is
///
/// ```text
/// Δε = -½ X + ¼ X²  ≈  ½ ln Ĉ
/// ```
///
/// and the rotation is built from the skew part of A.
pub fn rashid(f_hat: &Matrix3<f64>) -> Result<Decomposed> {
    let inv_f = f_hat
        .try_inverse()
        .ok_or_else(|| Error::kinematics("incremental deformation gradient is singular"))?;
    let aa = Matrix3::identity() - inv_f;
    let xx = aa * aa.transpose() - aa - aa.transpose();
    let strain = -0.5 * xx + 0.25 * xx * xx;

    let a = [
        aa[(1, 2)] - aa[(2, 1)],
        aa[(2, 0)] - aa[(0, 2)],
        aa[(0, 1)] - aa[(1, 0)],
    ];
    let q = (a[0] * a[0] + a[1] * a[1] + a[2] * a[2]) / 4.0;
    let tr_minus_one = inv_f.trace() - 1.0;
    let p = tr_minus_one * tr_minus_one / 4.0;
    let pq = p + q;
    if pq <= 0.0 {
        return Err(Error::kinematics("Rashid decomposition failed: p + q ≤ 0"));
    }
    let omp = 1.0 - pq;
    let c1_squared = p + 3.0 * p * p * omp / (pq * pq) - 2.0 * p * p * p * omp / (pq * pq * pq);
    if c1_squared <= 0.0 {
        return Err(Error::kinematics(format!(
            "Rashid decomposition failed: C1² = {:e} ≤ 0 (rotation increment too large)",
            c1_squared
        )));
    }
    let c1 = f64::sqrt(c1_squared);
    let c2 = if q > 0.0 { (1.0 - c1) / (4.0 * q) } else { 0.125 };
    let c3 = 0.5 * f64::sqrt((p * q * (3.0 - q) + p * p * p + q * q) / (pq * pq * pq));

    let rotation = Matrix3::new(
        c1 + c2 * a[0] * a[0],
        c2 * a[0] * a[1] + c3 * a[2],
        c2 * a[0] * a[2] - c3 * a[1],
        c2 * a[1] * a[0] - c3 * a[2],
        c1 + c2 * a[1] * a[1],
        c2 * a[1] * a[2] + c3 * a[0],
        c2 * a[2] * a[0] + c3 * a[1],
        c2 * a[2] * a[1] - c3 * a[0],
        c1 + c2 * a[2] * a[2],
    );
    Ok(Decomposed {
        strain_increment: SymTensor::from_matrix(&strain),
        rotation_increment: rotation,
    })
}

/// Decomposes F̂ exactly using the eigen-decomposition of Ĉ = F̂ᵀ F̂
///
/// ```text
/// Ĉ = Σ cᵢ Nᵢ ⊗ Nᵢ     λᵢ = √cᵢ
/// Û = Σ λᵢ Nᵢ ⊗ Nᵢ     R̂ = F̂ Û⁻¹     Δε = Σ ln(λᵢ) Nᵢ ⊗ Nᵢ
/// ```
pub fn eigen(f_hat: &Matrix3<f64>) -> Result<Decomposed> {
    let cc = SymTensor::from_matrix(&(f_hat.transpose() * f_hat));
    let (c, nn) = cc.eigen();
    if c[2] <= 0.0 {
        return Err(Error::kinematics(format!(
            "eigen decomposition failed: non-positive principal stretch squared ({:e})",
            c[2]
        )));
    }
    let lambda = Vector3::new(f64::sqrt(c[0]), f64::sqrt(c[1]), f64::sqrt(c[2]));
    let inv_u = nn * Matrix3::from_diagonal(&lambda.map(|l| 1.0 / l)) * nn.transpose();
    let strain = nn * Matrix3::from_diagonal(&lambda.map(f64::ln)) * nn.transpose();
    Ok(Decomposed {
        strain_increment: SymTensor::from_matrix(&strain),
        rotation_increment: f_hat * inv_u,
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
