use nalgebra::{Matrix3, SymmetricEigen};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Index, Mul, Neg, Sub, SubAssign};

/// Maps the index pair (i,j) of a symmetric second-order tensor to the storage position
pub(crate) const IJ_TO_M: [[usize; 3]; 3] = [[0, 3, 5], [3, 1, 4], [5, 4, 2]];

/// Maps the storage position to the index pair (i,j) of a symmetric second-order tensor
pub(crate) const M_TO_IJ: [(usize, usize); 6] = [(0, 0), (1, 1), (2, 2), (0, 1), (1, 2), (2, 0)];

/// Holds the multiplicity of each stored component in a double contraction (1 for normal, 2 for shear)
pub(crate) const WEIGHT: [f64; 6] = [1.0, 1.0, 1.0, 2.0, 2.0, 2.0];

/// Implements a symmetric second-order tensor in 3D (e.g., Cauchy stress or infinitesimal strain)
///
/// The six independent components are stored in the order:
///
/// ```text
/// [xx, yy, zz, xy, yz, zx]
/// ```
///
/// The off-diagonal components hold the **tensor** values (not the engineering shear strain),
/// thus the mirrored entries (yx, zy, xz) coincide with (xy, yz, zx) by construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymTensor {
    v: [f64; 6],
}

impl SymTensor {
    /// Returns a new tensor with the given components
    pub fn new(xx: f64, yy: f64, zz: f64, xy: f64, yz: f64, zx: f64) -> Self {
        SymTensor {
            v: [xx, yy, zz, xy, yz, zx],
        }
    }

    /// Returns the zero tensor
    pub fn zero() -> Self {
        SymTensor { v: [0.0; 6] }
    }

    /// Returns the identity tensor
    pub fn identity() -> Self {
        SymTensor {
            v: [1.0, 1.0, 1.0, 0.0, 0.0, 0.0],
        }
    }

    /// Returns a new tensor from the array `[xx, yy, zz, xy, yz, zx]`
    pub fn from_array(v: [f64; 6]) -> Self {
        SymTensor { v }
    }

    /// Returns the components as `[xx, yy, zz, xy, yz, zx]`
    pub fn as_array(&self) -> &[f64; 6] {
        &self.v
    }

    /// Returns a new tensor from the symmetric part of a 3×3 matrix: ½ (A + Aᵀ)
    pub fn from_matrix(a: &Matrix3<f64>) -> Self {
        SymTensor {
            v: [
                a[(0, 0)],
                a[(1, 1)],
                a[(2, 2)],
                0.5 * (a[(0, 1)] + a[(1, 0)]),
                0.5 * (a[(1, 2)] + a[(2, 1)]),
                0.5 * (a[(2, 0)] + a[(0, 2)]),
            ],
        }
    }

    /// Returns the full 3×3 matrix
    pub fn to_matrix(&self) -> Matrix3<f64> {
        let v = &self.v;
        Matrix3::new(v[0], v[3], v[5], v[3], v[1], v[4], v[5], v[4], v[2])
    }

    /// Returns the component (i,j), noting that (i,j) and (j,i) are the same entry
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.v[IJ_TO_M[i][j]]
    }

    /// Sets the component (i,j), which also sets (j,i)
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.v[IJ_TO_M[i][j]] = value;
    }

    /// Returns the trace
    pub fn trace(&self) -> f64 {
        self.v[0] + self.v[1] + self.v[2]
    }

    /// Returns the double contraction
    ///
    /// ```text
    /// A : B = Axx Bxx + Ayy Byy + Azz Bzz + 2 (Axy Bxy + Ayz Byz + Azx Bzx)
    /// ```
    pub fn ddot(&self, other: &SymTensor) -> f64 {
        let mut sum = 0.0;
        for m in 0..6 {
            sum += WEIGHT[m] * self.v[m] * other.v[m];
        }
        sum
    }

    /// Returns the Frobenius norm √(A : A)
    pub fn norm(&self) -> f64 {
        f64::sqrt(self.ddot(self))
    }

    /// Adds a scalar to each diagonal entry
    pub fn add_diagonal(&mut self, value: f64) {
        self.v[0] += value;
        self.v[1] += value;
        self.v[2] += value;
    }

    /// Returns the deviatoric part: dev(A) = A - ⅓ tr(A) I
    pub fn deviator(&self) -> SymTensor {
        let mut dev = *self;
        dev.add_diagonal(-self.trace() / 3.0);
        dev
    }

    /// Returns the mean (hydrostatic) value ⅓ tr(A)
    pub fn mean(&self) -> f64 {
        self.trace() / 3.0
    }

    /// Returns the von Mises (effective) stress √(3/2 s : s) with s = dev(σ)
    pub fn von_mises(&self) -> f64 {
        let s = self.deviator();
        f64::sqrt(1.5 * s.ddot(&s))
    }

    /// Returns the effective strain √(2/3 e : e) of a deviatoric (e.g., inelastic) strain
    pub fn effective_strain(&self) -> f64 {
        f64::sqrt(2.0 * self.ddot(self) / 3.0)
    }

    /// Returns the scaled tensor α A
    pub fn scaled(&self, alpha: f64) -> SymTensor {
        let mut res = *self;
        res.v.iter_mut().for_each(|x| *x *= alpha);
        res
    }

    /// Returns the rotated tensor R · A · Rᵀ
    pub fn rotated(&self, r: &Matrix3<f64>) -> SymTensor {
        SymTensor::from_matrix(&(r * self.to_matrix() * r.transpose()))
    }

    /// Computes the eigenvalues and eigenvectors sorted in descending order of eigenvalue
    ///
    /// Returns `(values, vectors)` where the eigenvectors are the columns of `vectors`.
    pub fn eigen(&self) -> ([f64; 3], Matrix3<f64>) {
        let eig = SymmetricEigen::new(self.to_matrix());
        let mut order = [0, 1, 2];
        order.sort_by(|&a, &b| eig.eigenvalues[b].total_cmp(&eig.eigenvalues[a]));
        let mut values = [0.0; 3];
        let mut vectors = Matrix3::zeros();
        for (k, &p) in order.iter().enumerate() {
            values[k] = eig.eigenvalues[p];
            vectors.set_column(k, &eig.eigenvectors.column(p));
        }
        (values, vectors)
    }

    /// Indicates that all components are finite (not NaN or Inf)
    pub fn is_finite(&self) -> bool {
        self.v.iter().all(|x| x.is_finite())
    }
}

impl Index<(usize, usize)> for SymTensor {
    type Output = f64;
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.v[IJ_TO_M[i][j]]
    }
}

impl Add for SymTensor {
    type Output = SymTensor;
    fn add(mut self, rhs: SymTensor) -> SymTensor {
        self += rhs;
        self
    }
}

impl Sub for SymTensor {
    type Output = SymTensor;
    fn sub(mut self, rhs: SymTensor) -> SymTensor {
        self -= rhs;
        self
    }
}

impl AddAssign for SymTensor {
    fn add_assign(&mut self, rhs: SymTensor) {
        for m in 0..6 {
            self.v[m] += rhs.v[m];
        }
    }
}

impl SubAssign for SymTensor {
    fn sub_assign(&mut self, rhs: SymTensor) {
        for m in 0..6 {
            self.v[m] -= rhs.v[m];
        }
    }
}

impl Neg for SymTensor {
    type Output = SymTensor;
    fn neg(self) -> SymTensor {
        self.scaled(-1.0)
    }
}

impl Mul<f64> for SymTensor {
    type Output = SymTensor;
    fn mul(self, alpha: f64) -> SymTensor {
        self.scaled(alpha)
    }
}

impl Mul<SymTensor> for f64 {
    type Output = SymTensor;
    fn mul(self, tensor: SymTensor) -> SymTensor {
        tensor.scaled(self)
    }
}

impl fmt::Display for SymTensor {
    /// Prints the components as `[xx, yy, zz, xy, yz, zx]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for m in 0..6 {
            if m > 0 {
                write!(f, ", ")?;
            }
            match f.precision() {
                Some(p) => write!(f, "{:.1$}", self.v[m], p)?,
                None => write!(f, "{:?}", self.v[m])?,
            }
        }
        write!(f, "]")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
