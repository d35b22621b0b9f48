use crate::base::{ParamSolid, Settings};
use crate::kinematics::{KinematicsEngine, QpDisplacement};
use crate::material::{MaterialStateStore, QpInput, StressStrain};
use crate::tensor::{SymElasticityTensor, SymTensor};
use crate::{Error, Result};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Mutex;

/// Holds the input data of one element for one evaluation
#[derive(Clone, Debug)]
pub struct ElementInput {
    /// Element identifier
    pub element_id: usize,

    /// Subdomain (material block) identifier
    pub subdomain: usize,

    /// (current, old) displacement data at each quadrature point
    pub qps: Vec<(QpDisplacement, QpDisplacement)>,

    /// Integration weights times the Jacobian determinant at each quadrature point
    pub weights: Vec<f64>,

    /// Temperature at each quadrature point (empty means zero everywhere)
    pub temperatures: Vec<f64>,
}

impl ElementInput {
    /// Returns the temperature at a quadrature point
    fn temperature(&self, qp: usize) -> f64 {
        self.temperatures.get(qp).copied().unwrap_or(0.0)
    }
}

/// Holds the output of one element, passed to the scatter function
#[derive(Clone, Debug)]
pub struct ElementOutput {
    /// Element identifier
    pub element_id: usize,

    /// Stress at each quadrature point
    pub stresses: Vec<SymTensor>,

    /// Consistent tangent at each quadrature point
    pub tangents: Vec<SymElasticityTensor>,
}

/// Holds a summary of one evaluation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopSummary {
    /// Number of elements
    pub n_elements: usize,

    /// Number of quadrature points
    pub n_qps: usize,

    /// Smallest timestep limit over all quadrature points
    pub timestep_limit: f64,

    /// Largest number of local iterations
    pub max_iterations: usize,
}

/// Implements the loop over elements computing the stress update at all quadrature points
///
/// The elements are processed in parallel. Each element owns its quadrature-point
/// records, thus the states are updated without locks; only the scatter of element
/// results into the shared accumulator is protected by a mutex.
pub struct MaterialLoop {
    /// Holds the kinematics engine
    pub engine: KinematicsEngine,

    /// Maps subdomain to the stress-strain model
    blocks: HashMap<usize, StressStrain>,
}

impl MaterialLoop {
    /// Allocates a new instance
    ///
    /// # Input
    ///
    /// * `settings` -- the kinematic settings shared by all blocks
    /// * `blocks` -- the (subdomain, parameters) pairs
    pub fn new(settings: &Settings, blocks: &[(usize, ParamSolid)]) -> Result<Self> {
        let engine = KinematicsEngine::new(settings)?;
        let mut map = HashMap::new();
        for (subdomain, param) in blocks {
            if map.insert(*subdomain, StressStrain::new(param, settings)?).is_some() {
                return Err(Error::config(format!(
                    "subdomain {} has more than one material block",
                    subdomain
                )));
            }
        }
        Ok(MaterialLoop { engine, blocks: map })
    }

    /// Returns the model of a subdomain
    pub fn model(&self, subdomain: usize) -> Result<&StressStrain> {
        self.blocks
            .get(&subdomain)
            .ok_or_else(|| Error::config(format!("cannot find the material block of subdomain {}", subdomain)))
    }

    /// Allocates the states of an element
    pub fn allocate(&self, store: &mut MaterialStateStore, element_id: usize, subdomain: usize, n_qp: usize) -> Result<()> {
        let model = self.model(subdomain)?;
        store.allocate_element(element_id, n_qp, &model.initial_state())
    }

    /// Evaluates all elements
    ///
    /// # Input
    ///
    /// * `store` -- the states; the `current` states are written
    /// * `inputs` -- the input data of all elements in the store
    /// * `time` -- the time at the end of the step
    /// * `dt` -- the timestep size
    /// * `accumulator` -- the shared data receiving the element results
    /// * `scatter` -- the function adding the results of one element to the accumulator
    ///
    /// # Errors
    ///
    /// The first error found is returned with the element and quadrature point stamped in it.
    pub fn evaluate<A, F>(
        &self,
        store: &mut MaterialStateStore,
        inputs: &[ElementInput],
        time: f64,
        dt: f64,
        accumulator: &Mutex<A>,
        scatter: F,
    ) -> Result<LoopSummary>
    where
        A: Send,
        F: Fn(&mut A, &ElementOutput) + Sync,
    {
        let lookup: HashMap<usize, &ElementInput> = inputs.iter().map(|e| (e.element_id, e)).collect();
        let finite_strain = self.engine.finite_strain();
        let results = store
            .elements_mut()
            .par_iter_mut()
            .map(|element| {
                let id = element.element_id;
                let input = lookup
                    .get(&id)
                    .ok_or_else(|| Error::config(format!("cannot find the input data of element {}", id)))?;
                let model = self.model(input.subdomain)?;
                if input.qps.len() != element.qps.len() {
                    return Err(Error::config(format!(
                        "element {} has {} quadrature points but the input has {}",
                        id,
                        element.qps.len(),
                        input.qps.len()
                    )));
                }
                let kinematics = match self.engine.compute_element(&input.qps, &input.weights) {
                    Ok(k) => k,
                    Err(e) => {
                        let qp = input
                            .qps
                            .iter()
                            .position(|(c, o)| self.engine.compute_qp(c, o).is_err())
                            .unwrap_or(0);
                        return Err(e.at(id, qp));
                    }
                };
                let mut output = ElementOutput {
                    element_id: id,
                    stresses: Vec::with_capacity(element.qps.len()),
                    tangents: Vec::with_capacity(element.qps.len()),
                };
                let mut limit = f64::INFINITY;
                let mut iterations = 0;
                for (p, record) in element.qps.iter_mut().enumerate() {
                    let mut qp_input = QpInput::from_kinematics(&kinematics[p], finite_strain, time, dt);
                    qp_input.temperature = input.temperature(p);
                    let res = model
                        .update(&qp_input, &record.old, &mut record.current)
                        .map_err(|e| e.at(id, p))?;
                    output.stresses.push(record.current.stress);
                    output.tangents.push(res.tangent);
                    limit = f64::min(limit, res.timestep_limit);
                    iterations = usize::max(iterations, res.iterations);
                }
                let mut acc = accumulator.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                scatter(&mut acc, &output);
                Ok((limit, iterations, output.stresses.len()))
            })
            .collect::<Result<Vec<_>>>()?;

        let summary = results.iter().fold(
            LoopSummary {
                n_elements: results.len(),
                n_qps: 0,
                timestep_limit: f64::INFINITY,
                max_iterations: 0,
            },
            |mut s, &(limit, iterations, n_qps)| {
                s.n_qps += n_qps;
                s.timestep_limit = f64::min(s.timestep_limit, limit);
                s.max_iterations = usize::max(s.max_iterations, iterations);
                s
            },
        );
        log::info!(
            "material loop: {} elements, {} quadrature points, timestep limit = {:e}, max iterations = {}",
            summary.n_elements,
            summary.n_qps,
            summary.timestep_limit,
            summary.max_iterations
        );
        Ok(summary)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
