use super::sym_tensor::{IJ_TO_M, M_TO_IJ, WEIGHT};
use super::SymTensor;
use nalgebra::{Matrix3, SMatrix};
use serde::{Deserialize, Serialize};

/// Holds the Lamé parameters of an isotropic elastic material
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lame {
    /// First Lamé parameter λ
    pub lambda: f64,

    /// Shear modulus μ (second Lamé parameter, G)
    pub mu: f64,
}

impl Lame {
    /// Returns the bulk modulus K = λ + ⅔ μ
    pub fn bulk(&self) -> f64 {
        self.lambda + 2.0 * self.mu / 3.0
    }

    /// Returns Young's modulus E = μ (3λ + 2μ) / (λ + μ)
    pub fn young(&self) -> f64 {
        self.mu * (3.0 * self.lambda + 2.0 * self.mu) / (self.lambda + self.mu)
    }

    /// Returns Poisson's ratio ν = λ / (2 (λ + μ))
    pub fn poisson(&self) -> f64 {
        self.lambda / (2.0 * (self.lambda + self.mu))
    }
}

/// Returns the position of the Voigt entry (I,J) among the 21 upper-triangle entries
#[inline]
fn upper(i: usize, j: usize) -> usize {
    let (a, b) = if i <= j { (i, j) } else { (j, i) };
    a * (13 - a) / 2 + (b - a)
}

/// Implements a fourth-order elasticity tensor with minor and major symmetries
///
/// The tensor is stored as the 21 entries of the upper triangle of the 6×6 Voigt matrix
/// whose rows and columns follow the [SymTensor] ordering `[xx, yy, zz, xy, yz, zx]`:
///
/// ```text
/// C[I][J] = Cᵢⱼₖₗ  with  I ↔ (i,j)  and  J ↔ (k,l)
/// ```
///
/// Because the strain holds tensor (not engineering) shear components, the product reads:
///
/// ```text
/// σ_I = Σ_J C[I][J] w_J ε_J     with  w = [1, 1, 1, 2, 2, 2]
/// ```
///
/// The isotropic specialization remembers the Lamé pair and uses the closed-form product
/// `σ = λ tr(ε) I + 2μ ε`, which is exact even when λ or μ is zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymElasticityTensor {
    c: [f64; 21],
    isotropic: Option<Lame>,
}

impl SymElasticityTensor {
    /// Returns the zero tensor
    pub fn zero() -> Self {
        SymElasticityTensor {
            c: [0.0; 21],
            isotropic: None,
        }
    }

    /// Returns a new isotropic tensor from the Lamé parameters
    pub fn new_isotropic(lame: Lame) -> Self {
        let Lame { lambda, mu } = lame;
        let mut dd = SymElasticityTensor::zero();
        for i in 0..3 {
            for j in i..3 {
                let value = if i == j { lambda + 2.0 * mu } else { lambda };
                dd.c[upper(i, j)] = value;
            }
            dd.c[upper(i + 3, i + 3)] = mu;
        }
        dd.isotropic = Some(lame);
        dd
    }

    /// Returns a new (generally anisotropic) tensor from the 21 upper-triangle entries
    ///
    /// The entries are ordered row by row: C11, C12, ..., C16, C22, ..., C26, ..., C66.
    pub fn from_entries(entries: [f64; 21]) -> Self {
        SymElasticityTensor {
            c: entries,
            isotropic: None,
        }
    }

    /// Returns a new tensor from a 6×6 Voigt matrix (only the upper triangle is read)
    pub fn from_voigt(matrix: &[[f64; 6]; 6]) -> Self {
        let mut dd = SymElasticityTensor::zero();
        for i in 0..6 {
            for j in i..6 {
                dd.c[upper(i, j)] = matrix[i][j];
            }
        }
        dd
    }

    /// Returns the deviatoric projector Pdev = Isym - ⅓ I ⊗ I
    pub fn deviatoric_projector() -> Self {
        let mut pp = SymElasticityTensor::zero();
        for i in 0..3 {
            for j in i..3 {
                pp.c[upper(i, j)] = if i == j { 2.0 / 3.0 } else { -1.0 / 3.0 };
            }
            pp.c[upper(i + 3, i + 3)] = 0.5;
        }
        pp
    }

    /// Returns the dyadic product a ⊗ a
    pub fn dyad(a: &SymTensor) -> Self {
        let v = a.as_array();
        let mut dd = SymElasticityTensor::zero();
        for i in 0..6 {
            for j in i..6 {
                dd.c[upper(i, j)] = v[i] * v[j];
            }
        }
        dd
    }

    /// Returns the 21 upper-triangle entries
    pub fn entries(&self) -> &[f64; 21] {
        &self.c
    }

    /// Returns the Voigt entry (I,J)
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.c[upper(i, j)]
    }

    /// Returns the component Cᵢⱼₖₗ
    pub fn get_ijkl(&self, i: usize, j: usize, k: usize, l: usize) -> f64 {
        self.c[upper(IJ_TO_M[i][j], IJ_TO_M[k][l])]
    }

    /// Sets the Voigt entry (I,J), which also sets (J,I)
    ///
    /// The isotropic specialization is dropped.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.c[upper(i, j)] = value;
        self.isotropic = None;
    }

    /// Returns the full 6×6 Voigt matrix
    pub fn to_voigt(&self) -> [[f64; 6]; 6] {
        let mut mat = [[0.0; 6]; 6];
        for i in 0..6 {
            for j in 0..6 {
                mat[i][j] = self.get(i, j);
            }
        }
        mat
    }

    /// Returns the Lamé parameters if the tensor is (known to be) isotropic
    pub fn lame(&self) -> Option<Lame> {
        self.isotropic
    }

    /// Computes σ = C : ε
    pub fn multiply(&self, eps: &SymTensor) -> SymTensor {
        if let Some(Lame { lambda, mu }) = self.isotropic {
            let mut sigma = eps.scaled(2.0 * mu);
            sigma.add_diagonal(lambda * eps.trace());
            return sigma;
        }
        let e = eps.as_array();
        let mut s = [0.0; 6];
        for i in 0..6 {
            for j in 0..6 {
                s[i] += self.c[upper(i, j)] * WEIGHT[j] * e[j];
            }
        }
        SymTensor::from_array(s)
    }

    /// Performs the update self += α other
    ///
    /// The isotropic specialization survives only if both tensors are isotropic.
    pub fn add_scaled(&mut self, alpha: f64, other: &SymElasticityTensor) {
        for m in 0..21 {
            self.c[m] += alpha * other.c[m];
        }
        self.isotropic = match (self.isotropic, other.isotropic) {
            (Some(a), Some(b)) => Some(Lame {
                lambda: a.lambda + alpha * b.lambda,
                mu: a.mu + alpha * b.mu,
            }),
            _ => None,
        };
    }

    /// Returns the 9×9 matrix representation with rows/columns ordered as (11,12,13,21,...,33)
    fn to_full(&self) -> SMatrix<f64, 9, 9> {
        let mut full = SMatrix::<f64, 9, 9>::zeros();
        for i in 0..3 {
            for j in 0..3 {
                for k in 0..3 {
                    for l in 0..3 {
                        full[(3 * i + j, 3 * k + l)] = self.get_ijkl(i, j, k, l);
                    }
                }
            }
        }
        full
    }

    /// Returns the tensor rotated by R: C'ᵢⱼₖₗ = Rᵢₚ Rⱼq Rₖᵣ Rₗₛ Cₚqᵣₛ
    ///
    /// The rotation is performed on the 9×9 representation using the Kronecker product
    /// Q = R ⊗ R, i.e., C' = Q C Qᵀ, and the result is condensed back to 21 entries by
    /// averaging the entries related by the minor and major symmetries.
    pub fn rotated(&self, r: &Matrix3<f64>) -> SymElasticityTensor {
        if self.isotropic.is_some() {
            return *self;
        }
        let mut q = SMatrix::<f64, 9, 9>::zeros();
        for i in 0..3 {
            for j in 0..3 {
                for p in 0..3 {
                    for s in 0..3 {
                        q[(3 * i + j, 3 * p + s)] = r[(i, p)] * r[(j, s)];
                    }
                }
            }
        }
        let full = q * self.to_full() * q.transpose();
        let mut res = SymElasticityTensor::zero();
        for a in 0..6 {
            for b in a..6 {
                let (i, j) = M_TO_IJ[a];
                let (k, l) = M_TO_IJ[b];
                let sum = full[(3 * i + j, 3 * k + l)]
                    + full[(3 * j + i, 3 * k + l)]
                    + full[(3 * i + j, 3 * l + k)]
                    + full[(3 * j + i, 3 * l + k)]
                    + full[(3 * k + l, 3 * i + j)]
                    + full[(3 * l + k, 3 * i + j)]
                    + full[(3 * k + l, 3 * j + i)]
                    + full[(3 * l + k, 3 * j + i)];
                res.c[upper(a, b)] = sum / 8.0;
            }
        }
        res
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
