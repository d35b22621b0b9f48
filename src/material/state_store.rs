use super::QpState;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the current, old, and older states of one quadrature point
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QpRecord {
    /// State being computed in the current timestep
    pub current: QpState,

    /// State at the end of the last accepted timestep (never mutated within a timestep)
    pub old: QpState,

    /// State at the end of the timestep before the last accepted one
    pub older: QpState,
}

impl QpRecord {
    /// Allocates a new instance with all three states equal to `initial`
    pub fn new(initial: &QpState) -> Self {
        QpRecord {
            current: initial.clone(),
            old: initial.clone(),
            older: initial.clone(),
        }
    }
}

/// Holds the records of all quadrature points of one element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementStates {
    /// Element identifier
    pub element_id: usize,

    /// One record per quadrature point
    pub qps: Vec<QpRecord>,
}

/// Implements the arena of quadrature-point states indexed by (element id, qp index)
///
/// Besides the evaluation (which writes the `current` states), the only mutating
/// operations are [MaterialStateStore::commit] and [MaterialStateStore::rollback].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MaterialStateStore {
    /// Element states in allocation order
    elements: Vec<ElementStates>,

    /// Maps element id to the position in `elements`
    #[serde(skip)]
    positions: HashMap<usize, usize>,
}

impl MaterialStateStore {
    /// Allocates a new (empty) instance
    pub fn new() -> Self {
        MaterialStateStore {
            elements: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Allocates the states of an element
    ///
    /// # Errors
    ///
    /// Returns [Error::Config] if the element has already been allocated.
    pub fn allocate_element(&mut self, element_id: usize, n_qp: usize, initial: &QpState) -> Result<()> {
        if self.positions.contains_key(&element_id) {
            return Err(Error::config(format!("element {} is already allocated", element_id)));
        }
        self.positions.insert(element_id, self.elements.len());
        self.elements.push(ElementStates {
            element_id,
            qps: (0..n_qp).map(|_| QpRecord::new(initial)).collect(),
        });
        Ok(())
    }

    /// Returns the number of elements
    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    /// Returns the states of an element
    pub fn element(&self, element_id: usize) -> Option<&ElementStates> {
        self.positions.get(&element_id).map(|&p| &self.elements[p])
    }

    /// Returns the record of a quadrature point
    pub fn get(&self, element_id: usize, qp: usize) -> Option<&QpRecord> {
        self.element(element_id).and_then(|e| e.qps.get(qp))
    }

    /// Returns all element states (for the parallel evaluation)
    pub(crate) fn elements_mut(&mut self) -> &mut [ElementStates] {
        &mut self.elements
    }

    /// Accepts the timestep: older ← old and old ← current
    pub fn commit(&mut self) {
        for element in &mut self.elements {
            for record in &mut element.qps {
                std::mem::swap(&mut record.older, &mut record.old);
                record.old.clone_from(&record.current);
            }
        }
    }

    /// Rejects the timestep: current ← old
    pub fn rollback(&mut self) {
        for element in &mut self.elements {
            for record in &mut element.qps {
                record.current.clone_from(&record.old);
            }
        }
    }

    /// Rebuilds the element index (after deserialization)
    fn rebuild_positions(&mut self) -> Result<()> {
        self.positions.clear();
        for (p, element) in self.elements.iter().enumerate() {
            if self.positions.insert(element.element_id, p).is_some() {
                return Err(Error::config(format!(
                    "element {} appears more than once in the checkpoint",
                    element.element_id
                )));
            }
        }
        Ok(())
    }

    /// Returns a JSON string with all states
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self)?)
    }

    /// Allocates a new instance from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let mut store: MaterialStateStore = serde_json::from_str(json)?;
        store.rebuild_positions()?;
        Ok(store)
    }

    /// Writes a checkpoint file (JSON)
    pub fn write_json<P>(&self, full_path: &P) -> Result<()>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path);
        if let Some(p) = path.parent() {
            fs::create_dir_all(p)?;
        }
        let mut file = File::create(path)?;
        serde_json::to_writer(&mut file, &self)?;
        Ok(())
    }

    /// Reads a checkpoint file (JSON)
    pub fn read_json<P>(full_path: &P) -> Result<Self>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let input = File::open(path)?;
        let buffered = BufReader::new(input);
        let mut store: MaterialStateStore = serde_json::from_reader(buffered)?;
        store.rebuild_positions()?;
        Ok(store)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::MaterialStateStore;
    use crate::material::QpState;
    use crate::tensor::SymTensor;

    fn sample_store() -> MaterialStateStore {
        let mut store = MaterialStateStore::new();
        let mut initial = QpState::new(2, false);
        initial.stress = SymTensor::new(-1.0, -1.0, -2.0, 0.0, 0.0, 0.0);
        store.allocate_element(10, 2, &initial).unwrap();
        store.allocate_element(3, 1, &initial).unwrap();
        store
    }

    #[test]
    fn allocate_and_get_work() {
        let mut store = sample_store();
        assert_eq!(store.n_elements(), 2);
        assert_eq!(store.element(10).unwrap().qps.len(), 2);
        assert_eq!(store.get(3, 0).unwrap().old.stress.get(2, 2), -2.0);
        assert!(store.get(3, 1).is_none());
        assert!(store.get(4, 0).is_none());
        assert_eq!(
            store.allocate_element(3, 1, &QpState::new(0, false)).err().unwrap().to_string(),
            "configuration error: element 3 is already allocated"
        );
    }

    #[test]
    fn commit_and_rollback_work() {
        let mut store = sample_store();
        store.elements_mut()[0].qps[0].current.hardening_variable = 1.0;
        store.commit();
        let rec = store.get(10, 0).unwrap();
        assert_eq!(rec.old.hardening_variable, 1.0);
        assert_eq!(rec.older.hardening_variable, 0.0);

        store.elements_mut()[0].qps[0].current.hardening_variable = 2.0;
        store.rollback();
        let rec = store.get(10, 0).unwrap();
        assert_eq!(rec.current.hardening_variable, 1.0);
        assert_eq!(rec.old.hardening_variable, 1.0);

        store.elements_mut()[0].qps[0].current.hardening_variable = 3.0;
        store.commit();
        let rec = store.get(10, 0).unwrap();
        assert_eq!(rec.older.hardening_variable, 1.0);
        assert_eq!(rec.old.hardening_variable, 3.0);
        assert_eq!(rec.current.hardening_variable, 3.0);
    }

    #[test]
    fn json_works() {
        let store = sample_store();
        let json = store.to_json().unwrap();
        let back = MaterialStateStore::from_json(&json).unwrap();
        assert_eq!(back.get(10, 1), store.get(10, 1));
        assert_eq!(back.element(3), store.element(3));
        assert!(MaterialStateStore::from_json("{").is_err());
    }

    #[test]
    fn json_restores_all_bits() {
        let mut initial = QpState::new(2, false);
        initial.stress = SymTensor::new(2.6181510297594254e4, -1.0 / 3.0, 0.1 + 0.2, 1e-300, 0.0, 0.0);
        initial.hardening_variable = 1.2345678901234567e-7;
        initial.internal_values[1] = 2.4692108337079862e5;
        let mut store = MaterialStateStore::new();
        store.allocate_element(7, 1, &initial).unwrap();
        store.elements_mut()[0].qps[0].current.effective_inelastic_strain = std::f64::consts::PI * 1e-3;
        let back = MaterialStateStore::from_json(&store.to_json().unwrap()).unwrap();
        let (a, b) = (back.get(7, 0).unwrap(), store.get(7, 0).unwrap());
        assert_eq!(a.current.stress.get(0, 0).to_bits(), 2.6181510297594254e4_f64.to_bits());
        assert_eq!(a.old.internal_values[1].to_bits(), 2.4692108337079862e5_f64.to_bits());
        assert_eq!(a, b);
    }
}
