use crate::tensor::Lame;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Holds the isotropic elastic constants
///
/// Exactly two of the five constants must be given. The Lamé pair is derived from the
/// given pair using the standard conversion table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ElasticConstants {
    /// Young's modulus E
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub young: Option<f64>,

    /// Poisson's coefficient ν
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poisson: Option<f64>,

    /// Shear modulus μ (G)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shear: Option<f64>,

    /// Bulk modulus K
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk: Option<f64>,

    /// First Lamé parameter λ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lambda: Option<f64>,
}

impl ElasticConstants {
    /// Allocates a new instance from Young's modulus and Poisson's coefficient
    pub fn young_poisson(young: f64, poisson: f64) -> Self {
        ElasticConstants {
            young: Some(young),
            poisson: Some(poisson),
            ..Default::default()
        }
    }

    /// Allocates a new instance from the bulk modulus and Poisson's coefficient
    pub fn bulk_poisson(bulk: f64, poisson: f64) -> Self {
        ElasticConstants {
            bulk: Some(bulk),
            poisson: Some(poisson),
            ..Default::default()
        }
    }

    /// Allocates a new instance from the Lamé parameters
    pub fn lambda_shear(lambda: f64, shear: f64) -> Self {
        ElasticConstants {
            lambda: Some(lambda),
            shear: Some(shear),
            ..Default::default()
        }
    }

    /// Returns the number of given constants
    pub fn count(&self) -> usize {
        [self.young, self.poisson, self.shear, self.bulk, self.lambda]
            .iter()
            .filter(|c| c.is_some())
            .count()
    }

    /// Derives the Lamé parameters (λ, μ) from the two given constants
    ///
    /// # Errors
    ///
    /// Returns [Error::Config] if the number of given constants is not two, if a pair
    /// does not determine the Lamé parameters, or if the resulting material is outside
    /// the physical range: K > 0, -1 < ν < 0.5, μ ≥ 0, E > 0.
    pub fn lame(&self) -> Result<Lame> {
        let n = self.count();
        if n != 2 {
            return Err(Error::config(format!(
                "exactly two elastic constants must be given (found {})",
                n
            )));
        }
        let (lambda, mu) = match (self.young, self.poisson, self.shear, self.bulk, self.lambda) {
            (None, None, Some(mu), None, Some(lambda)) => (lambda, mu),
            (Some(e), None, None, None, Some(lambda)) => {
                let r = f64::sqrt(e * e + 9.0 * lambda * lambda + 2.0 * e * lambda);
                (lambda, (e - 3.0 * lambda + r) / 4.0)
            }
            (None, Some(nu), None, None, Some(lambda)) => {
                if nu == 0.0 {
                    return Err(Error::config("λ and ν = 0 do not determine the shear modulus"));
                }
                (lambda, lambda * (1.0 - 2.0 * nu) / (2.0 * nu))
            }
            (None, None, None, Some(k), Some(lambda)) => (lambda, 3.0 * (k - lambda) / 2.0),
            (Some(e), None, Some(mu), None, None) => {
                if 3.0 * mu == e {
                    return Err(Error::config("E = 3μ corresponds to ν = 0.5 (incompressible)"));
                }
                (mu * (e - 2.0 * mu) / (3.0 * mu - e), mu)
            }
            (None, Some(nu), Some(mu), None, None) => {
                Self::check_poisson(nu)?;
                (2.0 * mu * nu / (1.0 - 2.0 * nu), mu)
            }
            (None, None, Some(mu), Some(k), None) => (k - 2.0 * mu / 3.0, mu),
            (Some(e), Some(nu), None, None, None) => {
                Self::check_poisson(nu)?;
                (e * nu / ((1.0 + nu) * (1.0 - 2.0 * nu)), e / (2.0 * (1.0 + nu)))
            }
            (Some(e), None, None, Some(k), None) => {
                if 9.0 * k == e {
                    return Err(Error::config("E = 9K corresponds to a vanishing shear modulus limit"));
                }
                (3.0 * k * (3.0 * k - e) / (9.0 * k - e), 3.0 * k * e / (9.0 * k - e))
            }
            (None, Some(nu), None, Some(k), None) => {
                Self::check_poisson(nu)?;
                (3.0 * k * nu / (1.0 + nu), 3.0 * k * (1.0 - 2.0 * nu) / (2.0 * (1.0 + nu)))
            }
            _ => return Err(Error::config("unsupported pair of elastic constants")),
        };
        let lame = Lame { lambda, mu };
        Self::check_range(&lame)?;
        Ok(lame)
    }

    fn check_poisson(nu: f64) -> Result<()> {
        if nu <= -1.0 || nu >= 0.5 {
            return Err(Error::config(format!("Poisson's coefficient ν = {} must be in (-1, 0.5)", nu)));
        }
        Ok(())
    }

    fn check_range(lame: &Lame) -> Result<()> {
        if !lame.lambda.is_finite() || !lame.mu.is_finite() {
            return Err(Error::config("the elastic constants yield non-finite Lamé parameters"));
        }
        if lame.mu < 0.0 {
            return Err(Error::config(format!("shear modulus μ = {} must be non-negative", lame.mu)));
        }
        let k = lame.bulk();
        if k <= 0.0 {
            return Err(Error::config(format!("bulk modulus K = {} must be positive", k)));
        }
        if lame.mu == 0.0 {
            // fluid-like material: E = 0 and ν = 0.5
            return Err(Error::config("Young's modulus must be positive (μ = 0)"));
        }
        let e = lame.young();
        if e <= 0.0 {
            return Err(Error::config(format!("Young's modulus E = {} must be positive", e)));
        }
        Self::check_poisson(lame.poisson())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
