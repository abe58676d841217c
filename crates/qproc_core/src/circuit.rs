//! Quantum circuit structure for QPROC
//!
//! Gantree: L1_Circuit → Circuit
//!
//! An ordered gate list over a fixed qubit register. Circuits are consumed
//! read-only by processors.

use crate::error::{QprocError, QprocResult};
use crate::gate::{Gate, GateKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quantum circuit
/// Gantree: Circuit // 회로 구조체
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Number of qubits
    num_qubits: usize,

    /// Gate sequence
    gates: Vec<Gate>,

    /// Optional circuit name
    name: Option<String>,
}

impl Circuit {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a new empty circuit
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
            name: None,
        }
    }

    /// Create a circuit with a name
    pub fn with_name(num_qubits: usize, name: impl Into<String>) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
            name: Some(name.into()),
        }
    }

    /// Create from a vector of gates
    pub fn from_gates(num_qubits: usize, gates: Vec<Gate>) -> QprocResult<Self> {
        let mut circuit = Self::new(num_qubits);
        circuit.add_gates(gates)?;
        Ok(circuit)
    }

    /// Load a circuit from JSON
    pub fn from_json(json: &str) -> QprocResult<Self> {
        let circuit: Self = serde_json::from_str(json)?;
        circuit.validate()?;
        Ok(circuit)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> QprocResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // ========================================================================
    // Basic Operations
    // ========================================================================

    /// Add a gate to the circuit
    /// Gantree: add_gate(&mut, Gate) -> Result // 게이트 추가
    pub fn add_gate(&mut self, gate: Gate) -> QprocResult<()> {
        self.check_gate(&gate)?;
        self.gates.push(gate);
        Ok(())
    }

    /// Add multiple gates
    pub fn add_gates(&mut self, gates: impl IntoIterator<Item = Gate>) -> QprocResult<()> {
        for gate in gates {
            self.add_gate(gate)?;
        }
        Ok(())
    }

    fn check_gate(&self, gate: &Gate) -> QprocResult<()> {
        gate.validate()?;
        for qubit in gate.qubits() {
            if qubit >= self.num_qubits {
                return Err(QprocError::GateQubitMismatch {
                    qubit,
                    num_qubits: self.num_qubits,
                });
            }
        }
        Ok(())
    }

    /// Validate every gate against the register
    pub fn validate(&self) -> QprocResult<()> {
        self.gates.iter().try_for_each(|g| self.check_gate(g))
    }

    /// Clear all gates
    pub fn clear(&mut self) {
        self.gates.clear();
    }

    /// Get number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get gates
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Get circuit name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set circuit name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Check if circuit is empty
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Get total gate count
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Count gates of a given kind
    pub fn count_kind(&self, kind: GateKind) -> usize {
        self.gates.iter().filter(|g| g.kind() == kind).count()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => writeln!(f, "Circuit '{}' ({} qubits):", name, self.num_qubits)?,
            None => writeln!(f, "Circuit ({} qubits):", self.num_qubits)?,
        }
        for gate in &self.gates {
            writeln!(f, "  {}", gate)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_gate_in_range() {
        let mut circuit = Circuit::new(2);
        assert!(circuit.add_gate(Gate::x(1)).is_ok());
        assert!(circuit.add_gate(Gate::iswap(0, 1)).is_ok());
        assert_eq!(circuit.gate_count(), 2);
    }

    #[test]
    fn test_add_gate_out_of_range() {
        let mut circuit = Circuit::new(2);
        let err = circuit.add_gate(Gate::cnot(0, 2)).unwrap_err();
        assert_eq!(
            err,
            QprocError::GateQubitMismatch {
                qubit: 2,
                num_qubits: 2
            }
        );
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_global_phase_needs_no_qubits() {
        let mut circuit = Circuit::new(1);
        assert!(circuit.add_gate(Gate::global_phase(0.5)).is_ok());
    }

    #[test]
    fn test_count_kind() {
        let circuit =
            Circuit::from_gates(2, vec![Gate::x(0), Gate::x(1), Gate::rz(0, 0.1)]).unwrap();
        assert_eq!(circuit.count_kind(GateKind::X), 2);
        assert_eq!(circuit.count_kind(GateKind::Rz), 1);
    }

    #[test]
    fn test_json_roundtrip() {
        let circuit = Circuit::from_gates(3, vec![Gate::h(0), Gate::iswap(1, 2)]).unwrap();
        let parsed = Circuit::from_json(&circuit.to_json().unwrap()).unwrap();
        assert_eq!(circuit, parsed);
    }

    #[test]
    fn test_json_rejects_out_of_range() {
        let mut circuit = Circuit::new(3);
        circuit.add_gate(Gate::x(2)).unwrap();
        let json = circuit.to_json().unwrap().replace("\"num_qubits\": 3", "\"num_qubits\": 2");
        assert!(Circuit::from_json(&json).is_err());
    }
}
