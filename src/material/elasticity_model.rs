use crate::base::{ElasticConstants, ParamElasticity, PiecewiseLinear};
use crate::tensor::{Lame, SymElasticityTensor};
use crate::Result;

/// Implements the isotropic elasticity of a material block
///
/// A constant tensor is computed once (at setup). A variable tensor depends on the
/// temperature and is recomputed at every call.
#[derive(Clone, Debug)]
pub enum ElasticityModel {
    /// Cached tensor
    Constant { lame: Lame, tensor: SymElasticityTensor },

    /// Temperature-dependent Young's modulus and Poisson's coefficient
    Variable {
        young: PiecewiseLinear,
        poisson: PiecewiseLinear,
    },
}

impl ElasticityModel {
    /// Allocates a new instance
    ///
    /// For the variable model, the constants are checked at all table points (the extreme
    /// values of piecewise-linear functions are attained at the table points).
    pub fn new(param: &ParamElasticity) -> Result<Self> {
        match param {
            ParamElasticity::Constant(constants) => {
                let lame = constants.lame()?;
                Ok(ElasticityModel::Constant {
                    lame,
                    tensor: SymElasticityTensor::new_isotropic(lame),
                })
            }
            ParamElasticity::Variable { young, poisson } => {
                let union = PiecewiseLinear::interpolate(young, poisson, 0.0);
                for &t in union.x() {
                    ElasticConstants::young_poisson(young.value(t), poisson.value(t)).lame()?;
                }
                Ok(ElasticityModel::Variable {
                    young: young.clone(),
                    poisson: poisson.clone(),
                })
            }
        }
    }

    /// Indicates that the tensor does not depend on the temperature
    pub fn is_constant(&self) -> bool {
        matches!(self, ElasticityModel::Constant { .. })
    }

    /// Returns the Lamé parameters at the given temperature
    pub fn lame(&self, temperature: f64) -> Result<Lame> {
        match self {
            ElasticityModel::Constant { lame, .. } => Ok(*lame),
            ElasticityModel::Variable { young, poisson } => {
                ElasticConstants::young_poisson(young.value(temperature), poisson.value(temperature)).lame()
            }
        }
    }

    /// Returns the elasticity tensor at the given temperature
    pub fn tensor(&self, temperature: f64) -> Result<SymElasticityTensor> {
        match self {
            ElasticityModel::Constant { tensor, .. } => Ok(*tensor),
            ElasticityModel::Variable { .. } => Ok(SymElasticityTensor::new_isotropic(self.lame(temperature)?)),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ElasticityModel;
    use crate::base::{ElasticConstants, ParamElasticity, PiecewiseLinear};
    use approx::assert_relative_eq;

    #[test]
    fn constant_works() {
        let model = ElasticityModel::new(&ParamElasticity::Constant(ElasticConstants::young_poisson(1000.0, 0.25))).unwrap();
        assert!(model.is_constant());
        let a = model.tensor(0.0).unwrap();
        let b = model.tensor(1000.0).unwrap();
        assert_eq!(a, b);
        assert_relative_eq!(model.lame(0.0).unwrap().mu, 400.0, max_relative = 1e-15);
    }

    #[test]
    fn variable_works() {
        let param = ParamElasticity::Variable {
            young: PiecewiseLinear::new(vec![300.0, 500.0], vec![2000.0, 1000.0]).unwrap(),
            poisson: PiecewiseLinear::constant(0.25),
        };
        let model = ElasticityModel::new(&param).unwrap();
        assert!(!model.is_constant());
        assert_relative_eq!(model.lame(400.0).unwrap().mu, 1500.0 / 2.5, max_relative = 1e-15);
        assert_relative_eq!(model.tensor(600.0).unwrap().get(3, 3), 1000.0 / 2.5, max_relative = 1e-15);
    }

    #[test]
    fn new_captures_errors() {
        let param = ParamElasticity::Variable {
            young: PiecewiseLinear::new(vec![300.0, 500.0], vec![2000.0, -1.0]).unwrap(),
            poisson: PiecewiseLinear::constant(0.25),
        };
        assert!(ElasticityModel::new(&param).is_err());
    }
}
