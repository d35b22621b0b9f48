use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Holds the raw (unchecked) table read from the input file
#[derive(Clone, Debug, Deserialize)]
pub struct PiecewiseLinearTable {
    /// Abscissas
    pub x: Vec<f64>,

    /// Ordinates
    pub y: Vec<f64>,
}

/// Implements a piecewise-linear function y(x) defined by a table of points
///
/// Outside the range of abscissas, the function is extended with constant values
/// (and zero derivative).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PiecewiseLinearTable")]
pub struct PiecewiseLinear {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl TryFrom<PiecewiseLinearTable> for PiecewiseLinear {
    type Error = Error;
    fn try_from(table: PiecewiseLinearTable) -> Result<Self> {
        PiecewiseLinear::new(table.x, table.y)
    }
}

impl PiecewiseLinear {
    /// Allocates a new instance
    ///
    /// # Errors
    ///
    /// The table must have at least one point, matching lengths, and strictly increasing abscissas.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.is_empty() {
            return Err(Error::config("piecewise-linear table must have at least one point"));
        }
        if x.len() != y.len() {
            return Err(Error::config(format!(
                "piecewise-linear table has {} abscissas but {} ordinates",
                x.len(),
                y.len()
            )));
        }
        if x.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(Error::config("piecewise-linear abscissas must be strictly increasing"));
        }
        Ok(PiecewiseLinear { x, y })
    }

    /// Allocates a new instance from a table known to be valid
    pub(crate) fn new_unchecked(x: Vec<f64>, y: Vec<f64>) -> Self {
        debug_assert!(!x.is_empty() && x.len() == y.len());
        PiecewiseLinear { x, y }
    }

    /// Returns a function with a single constant value
    pub fn constant(value: f64) -> Self {
        PiecewiseLinear {
            x: vec![0.0],
            y: vec![value],
        }
    }

    /// Returns the abscissas
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Returns the ordinates
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Returns the index i of the segment [x_i, x_{i+1}) containing t, if t is inside the range
    fn segment(&self, t: f64) -> Option<usize> {
        let n = self.x.len();
        if n < 2 || t < self.x[0] || t >= self.x[n - 1] {
            return None;
        }
        // the first abscissa strictly greater than t is the right end
        let right = self.x.partition_point(|&xi| xi <= t);
        Some(right - 1)
    }

    /// Evaluates y(t)
    pub fn value(&self, t: f64) -> f64 {
        let n = self.x.len();
        match self.segment(t) {
            Some(i) => {
                let f = (t - self.x[i]) / (self.x[i + 1] - self.x[i]);
                self.y[i] + f * (self.y[i + 1] - self.y[i])
            }
            None => {
                if t < self.x[0] {
                    self.y[0]
                } else {
                    self.y[n - 1]
                }
            }
        }
    }

    /// Evaluates dy/dt (the slope of the segment to the right of t)
    pub fn derivative(&self, t: f64) -> f64 {
        match self.segment(t) {
            Some(i) => (self.y[i + 1] - self.y[i]) / (self.x[i + 1] - self.x[i]),
            None => 0.0,
        }
    }

    /// Returns the function (1 - f) lo + f hi built on the union of abscissas of lo and hi
    pub fn interpolate(lo: &PiecewiseLinear, hi: &PiecewiseLinear, f: f64) -> PiecewiseLinear {
        let mut x: Vec<f64> = lo.x.iter().chain(hi.x.iter()).copied().collect();
        x.sort_by(|a, b| a.total_cmp(b));
        x.dedup();
        let y = x.iter().map(|&t| (1.0 - f) * lo.value(t) + f * hi.value(t)).collect();
        PiecewiseLinear { x, y }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::PiecewiseLinear;
    use approx::assert_abs_diff_eq;

    #[test]
    fn new_captures_errors() {
        assert_eq!(
            PiecewiseLinear::new(vec![], vec![]).err().unwrap().to_string(),
            "configuration error: piecewise-linear table must have at least one point"
        );
        assert_eq!(
            PiecewiseLinear::new(vec![0.0, 1.0], vec![0.0]).err().unwrap().to_string(),
            "configuration error: piecewise-linear table has 2 abscissas but 1 ordinates"
        );
        assert_eq!(
            PiecewiseLinear::new(vec![0.0, 0.0], vec![0.0, 1.0]).err().unwrap().to_string(),
            "configuration error: piecewise-linear abscissas must be strictly increasing"
        );
    }

    #[test]
    fn value_and_derivative_work() {
        let fun = PiecewiseLinear::new(vec![0.0, 1.0, 3.0], vec![10.0, 20.0, 0.0]).unwrap();
        assert_eq!(fun.value(-1.0), 10.0);
        assert_eq!(fun.value(0.0), 10.0);
        assert_eq!(fun.value(0.5), 15.0);
        assert_eq!(fun.value(1.0), 20.0);
        assert_eq!(fun.value(2.0), 10.0);
        assert_eq!(fun.value(3.0), 0.0);
        assert_eq!(fun.value(5.0), 0.0);
        assert_eq!(fun.derivative(-1.0), 0.0);
        assert_eq!(fun.derivative(0.0), 10.0);
        assert_eq!(fun.derivative(1.0), -10.0);
        assert_eq!(fun.derivative(3.0), 0.0);

        let one = PiecewiseLinear::constant(7.0);
        assert_eq!(one.value(-3.0), 7.0);
        assert_eq!(one.value(3.0), 7.0);
        assert_eq!(one.derivative(0.0), 0.0);
    }

    #[test]
    fn interpolate_works() {
        let lo = PiecewiseLinear::new(vec![0.0, 0.1], vec![100.0, 200.0]).unwrap();
        let hi = PiecewiseLinear::new(vec![0.0, 0.05, 0.2], vec![50.0, 60.0, 100.0]).unwrap();
        let mid = PiecewiseLinear::interpolate(&lo, &hi, 0.5);
        assert_eq!(mid.x(), &[0.0, 0.05, 0.1, 0.2]);
        assert_abs_diff_eq!(mid.value(0.0), 75.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mid.value(0.05), 0.5 * 150.0 + 0.5 * 60.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mid.value(0.2), 0.5 * 200.0 + 0.5 * 100.0, epsilon = 1e-12);
        let same = PiecewiseLinear::interpolate(&lo, &hi, 0.0);
        assert_abs_diff_eq!(same.value(0.07), lo.value(0.07), epsilon = 1e-12);
    }

    #[test]
    fn serde_works() {
        let fun: PiecewiseLinear = serde_json::from_str(r#"{"x":[0.0,1.0],"y":[1.0,2.0]}"#).unwrap();
        assert_eq!(fun.value(0.5), 1.5);
        let json = serde_json::to_string(&fun).unwrap();
        assert_eq!(json, r#"{"x":[0.0,1.0],"y":[1.0,2.0]}"#);
        let res: Result<PiecewiseLinear, _> = serde_json::from_str(r#"{"x":[1.0,0.0],"y":[1.0,2.0]}"#);
        assert!(res.is_err());
    }
}
