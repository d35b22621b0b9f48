use std::fmt;
use thiserror::Error;

/// Defines the result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Holds the (optional) location of a quadrature point in the mesh
///
/// The constitutive routines do not know where they are evaluated; the element loop
/// stamps the location into the error with [Error::at].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QpLocation {
    /// Holds the (element id, quadrature point index) pair, if known
    pub key: Option<(usize, usize)>,
}

impl QpLocation {
    /// Returns an unknown location
    pub fn unknown() -> Self {
        QpLocation { key: None }
    }

    /// Returns the location of quadrature point `qp` of element `element`
    pub fn new(element: usize, qp: usize) -> Self {
        QpLocation {
            key: Some((element, qp)),
        }
    }
}

impl fmt::Display for QpLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key {
            Some((element, qp)) => write!(f, " at element {}, quadrature point {}", element, qp),
            None => Ok(()),
        }
    }
}

/// Defines the errors of the stress-update subsystem
///
/// * [Error::Config] is fatal and detected at setup
/// * [Error::ReturnMapping], [Error::StressIteration], and [Error::Kinematics] are fatal for
///   the current evaluation but recoverable at the timestep level (cut Δt and retry)
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or inconsistent configuration (wrong elastic constants, missing parameters, ...)
    #[error("configuration error: {0}")]
    Config(String),

    /// The local Newton iteration (return mapping) did not converge
    #[error(
        "{law}: return mapping did not converge{location} after {iterations} iterations; |residual| = {residual:e}"
    )]
    ReturnMapping {
        law: &'static str,
        location: QpLocation,
        iterations: usize,
        residual: f64,
    },

    /// The outer (Picard) stress iteration of a combined model did not converge
    #[error(
        "{law}: stress iteration did not converge{location} after {iterations} iterations; |Δσ| = {delta_stress:e}"
    )]
    StressIteration {
        law: &'static str,
        location: QpLocation,
        iterations: usize,
        delta_stress: f64,
    },

    /// The deformation is too distorted to compute strain or rotation increments
    #[error("kinematics failure{location}: {message}")]
    Kinematics { location: QpLocation, message: String },

    /// Input/output error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config(message.into())
    }

    /// Returns a new kinematics error with an unknown location
    pub fn kinematics<S: Into<String>>(message: S) -> Self {
        Error::Kinematics {
            location: QpLocation::unknown(),
            message: message.into(),
        }
    }

    /// Stamps the location of the quadrature point into the error (if applicable)
    pub fn at(self, element: usize, qp: usize) -> Self {
        let here = QpLocation::new(element, qp);
        match self {
            Error::ReturnMapping {
                law,
                iterations,
                residual,
                ..
            } => Error::ReturnMapping {
                law,
                location: here,
                iterations,
                residual,
            },
            Error::StressIteration {
                law,
                iterations,
                delta_stress,
                ..
            } => Error::StressIteration {
                law,
                location: here,
                iterations,
                delta_stress,
            },
            Error::Kinematics { message, .. } => Error::Kinematics { location: here, message },
            other => other,
        }
    }

    /// Indicates that the failure may be cured by retrying the timestep with a smaller Δt
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::ReturnMapping { .. } | Error::StressIteration { .. } | Error::Kinematics { .. } => true,
            _ => false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{Error, QpLocation};

    #[test]
    fn display_works() {
        let err = Error::config("Poisson's ratio must be in (-1, 0.5)");
        assert_eq!(
            format!("{}", err),
            "configuration error: Poisson's ratio must be in (-1, 0.5)"
        );
        let err = Error::ReturnMapping {
            law: "PowerLawCreep",
            location: QpLocation::unknown(),
            iterations: 30,
            residual: 0.5,
        };
        assert_eq!(
            format!("{}", err),
            "PowerLawCreep: return mapping did not converge after 30 iterations; |residual| = 5e-1"
        );
    }

    #[test]
    fn at_stamps_the_location() {
        let err = Error::ReturnMapping {
            law: "IsotropicPlasticity",
            location: QpLocation::unknown(),
            iterations: 3,
            residual: 1.25e-3,
        }
        .at(7, 2);
        assert_eq!(
            format!("{}", err),
            "IsotropicPlasticity: return mapping did not converge at element 7, quadrature point 2 after 3 iterations; |residual| = 1.25e-3"
        );
        assert!(err.is_recoverable());

        let err = Error::kinematics("negative Jacobian").at(1, 0);
        assert_eq!(
            format!("{}", err),
            "kinematics failure at element 1, quadrature point 0: negative Jacobian"
        );

        let err = Error::config("missing yield stress").at(1, 0);
        assert_eq!(format!("{}", err), "configuration error: missing yield stress");
        assert!(!err.is_recoverable());
    }
}
