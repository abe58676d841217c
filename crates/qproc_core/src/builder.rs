//! Circuit builder for QPROC
//!
//! Gantree: L1_Circuit → CircuitBuilder
//!
//! Fluent builder for circuits. Gates that reference qubits outside the
//! register are dropped, as with [`Circuit::add_gate`] returning an error.

use crate::circuit::Circuit;
use crate::gate::Gate;
use crate::types::{Angle, QubitId};

/// Fluent circuit builder (consuming self pattern)
/// Gantree: CircuitBuilder // 빌더 패턴
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Create a new circuit builder
    pub fn new(num_qubits: usize) -> Self {
        Self {
            circuit: Circuit::new(num_qubits),
        }
    }

    /// Create with circuit name
    pub fn with_name(num_qubits: usize, name: impl Into<String>) -> Self {
        Self {
            circuit: Circuit::with_name(num_qubits, name),
        }
    }

    /// Add an arbitrary gate
    pub fn gate(mut self, gate: Gate) -> Self {
        let _ = self.circuit.add_gate(gate);
        self
    }

    // ========================================================================
    // Single-Qubit Gates
    // ========================================================================

    /// Add Rx rotation
    pub fn rx(self, qubit: QubitId, angle: Angle) -> Self {
        self.gate(Gate::rx(qubit, angle))
    }

    /// Add Ry rotation
    pub fn ry(self, qubit: QubitId, angle: Angle) -> Self {
        self.gate(Gate::ry(qubit, angle))
    }

    /// Add Rz rotation
    pub fn rz(self, qubit: QubitId, angle: Angle) -> Self {
        self.gate(Gate::rz(qubit, angle))
    }

    /// Add Pauli-X gate
    pub fn x(self, qubit: QubitId) -> Self {
        self.gate(Gate::x(qubit))
    }

    /// Add Pauli-Y gate
    pub fn y(self, qubit: QubitId) -> Self {
        self.gate(Gate::y(qubit))
    }

    /// Add Pauli-Z gate
    pub fn z(self, qubit: QubitId) -> Self {
        self.gate(Gate::z(qubit))
    }

    /// Add Hadamard gate
    pub fn h(self, qubit: QubitId) -> Self {
        self.gate(Gate::h(qubit))
    }

    /// Add Hadamard on every qubit
    pub fn h_layer(self) -> Self {
        let n = self.circuit.num_qubits();
        (0..n).fold(self, |b, q| b.h(q))
    }

    // ========================================================================
    // Two-Qubit Gates
    // ========================================================================

    /// Add CNOT gate
    pub fn cnot(self, control: QubitId, target: QubitId) -> Self {
        self.gate(Gate::cnot(control, target))
    }

    /// Add CZ gate
    pub fn cz(self, control: QubitId, target: QubitId) -> Self {
        self.gate(Gate::cz(control, target))
    }

    /// Add SWAP gate
    pub fn swap(self, q1: QubitId, q2: QubitId) -> Self {
        self.gate(Gate::swap(q1, q2))
    }

    /// Add iSWAP gate
    pub fn iswap(self, q1: QubitId, q2: QubitId) -> Self {
        self.gate(Gate::iswap(q1, q2))
    }

    /// Add sqrt(iSWAP) gate
    pub fn sqrt_iswap(self, q1: QubitId, q2: QubitId) -> Self {
        self.gate(Gate::sqrt_iswap(q1, q2))
    }

    /// Add iSWAP on every neighbouring pair (0-1, 1-2, ...)
    pub fn iswap_chain(self) -> Self {
        let n = self.circuit.num_qubits();
        (0..n.saturating_sub(1)).fold(self, |b, q| b.iswap(q, q + 1))
    }

    // ========================================================================
    // Special
    // ========================================================================

    /// Add global phase
    pub fn global_phase(self, phase: Angle) -> Self {
        self.gate(Gate::global_phase(phase))
    }

    /// Build the circuit
    pub fn build(self) -> Circuit {
        self.circuit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateKind;

    #[test]
    fn test_builder_chain() {
        let circuit = CircuitBuilder::new(3)
            .h(0)
            .rx(1, 0.5)
            .iswap(0, 1)
            .global_phase(0.1)
            .build();

        assert_eq!(circuit.gate_count(), 4);
        assert_eq!(circuit.gates()[2].kind(), GateKind::ISwap);
    }

    #[test]
    fn test_layers() {
        let circuit = CircuitBuilder::new(4).h_layer().iswap_chain().build();
        assert_eq!(circuit.count_kind(GateKind::H), 4);
        assert_eq!(circuit.count_kind(GateKind::ISwap), 3);
    }

    #[test]
    fn test_out_of_range_dropped() {
        let circuit = CircuitBuilder::new(2).x(0).x(5).build();
        assert_eq!(circuit.gate_count(), 1);
    }

    #[test]
    fn test_named() {
        let circuit = CircuitBuilder::with_name(1, "flip").x(0).build();
        assert_eq!(circuit.name(), Some("flip"));
    }
}
