use super::{QpInput, QpOutput, QpState, StressStrain};
use crate::tensor::SymTensor;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Holds a strain-driven loading path for material-point simulations
///
/// The first strain is the reference (usually zero); each subsequent strain defines one
/// increment with its timestep size and temperature.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadingPath {
    /// Holds the strain states
    pub strains: Vec<SymTensor>,

    /// Holds the timestep size of each increment (len = strains.len() - 1)
    pub dts: Vec<f64>,

    /// Holds the temperature at the end of each increment (len = strains.len() - 1)
    pub temperatures: Vec<f64>,
}

/// Holds the results of one increment of a material-point simulation
#[derive(Clone, Debug)]
pub struct PathPoint {
    /// Time at the end of the increment
    pub time: f64,

    /// Temperature at the end of the increment
    pub temperature: f64,

    /// State at the end of the increment
    pub state: QpState,

    /// Output of the update
    pub output: QpOutput,
}

impl LoadingPath {
    /// Allocates a new instance starting at zero strain
    pub fn new() -> Self {
        LoadingPath {
            strains: vec![SymTensor::zero()],
            dts: Vec::new(),
            temperatures: Vec::new(),
        }
    }

    /// Generates a linear path with constant strain increments
    ///
    /// # Input
    ///
    /// * `n_increments` -- number of increments
    /// * `delta_strain` -- the strain increment
    /// * `dt` -- the timestep size
    /// * `temperature` -- the (constant) temperature
    pub fn new_linear(n_increments: usize, delta_strain: &SymTensor, dt: f64, temperature: f64) -> Self {
        let mut path = LoadingPath::new();
        for i in 0..n_increments {
            let m = (i + 1) as f64;
            path.push_strain(&delta_strain.scaled(m), dt, temperature);
        }
        path
    }

    /// Pushes a new strain state
    pub fn push_strain(&mut self, strain: &SymTensor, dt: f64, temperature: f64) -> &mut Self {
        self.strains.push(*strain);
        self.dts.push(dt);
        self.temperatures.push(temperature);
        self
    }

    /// Pushes a new strain state given the volumetric and deviatoric strain invariants
    ///
    /// The strain is `εv/3 I + εd diag(1, -½, -½)` (triaxial extension along x), thus
    /// trace(ε) = εv and the effective deviatoric strain equals εd.
    pub fn push_strain_vd(&mut self, eps_v: f64, eps_d: f64, dt: f64, temperature: f64) -> &mut Self {
        let mut strain = SymTensor::new(eps_d, -0.5 * eps_d, -0.5 * eps_d, 0.0, 0.0, 0.0);
        strain.add_diagonal(eps_v / 3.0);
        self.push_strain(&strain, dt, temperature)
    }

    /// Returns the number of increments
    pub fn n_increments(&self) -> usize {
        self.dts.len()
    }

    /// Checks the consistency of the array lengths
    pub fn validate(&self) -> Result<()> {
        if self.strains.is_empty() {
            return Err(Error::config("the loading path requires at least the reference strain"));
        }
        let n = self.strains.len() - 1;
        if self.dts.len() != n || self.temperatures.len() != n {
            return Err(Error::config(format!(
                "the loading path has {} increments but {} timestep sizes and {} temperatures",
                n,
                self.dts.len(),
                self.temperatures.len()
            )));
        }
        if self.dts.iter().any(|dt| !(*dt > 0.0)) {
            return Err(Error::config("the timestep sizes must be positive"));
        }
        Ok(())
    }

    /// Runs a material-point simulation along the path (small strain)
    ///
    /// Returns one point per increment.
    pub fn follow(&self, model: &StressStrain) -> Result<Vec<PathPoint>> {
        self.validate()?;
        let mut old = model.initial_state();
        let mut current = old.clone();
        let mut time = 0.0;
        let mut points = Vec::with_capacity(self.n_increments());
        for i in 0..self.n_increments() {
            time += self.dts[i];
            let mut input = QpInput::new(self.strains[i + 1] - self.strains[i], time, self.dts[i]);
            input.temperature = self.temperatures[i];
            if i > 0 {
                input.dt_old = self.dts[i - 1];
            }
            let output = model.update(&input, &old, &mut current)?;
            points.push(PathPoint {
                time,
                temperature: input.temperature,
                state: current.clone(),
                output,
            });
            std::mem::swap(&mut old, &mut current);
        }
        Ok(points)
    }

    /// Reads a JSON file containing the path
    pub fn read_json<P>(full_path: &P) -> Result<Self>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let input = File::open(path)?;
        let buffered = BufReader::new(input);
        let path: LoadingPath = serde_json::from_reader(buffered)?;
        path.validate()?;
        Ok(path)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
