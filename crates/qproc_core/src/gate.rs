//! Gate instructions for QPROC
//!
//! Gantree: L1_Circuit → Gate
//!
//! A gate instruction is a closed [`GateKind`] plus its target qubits,
//! control qubits, and an optional angle argument.

use crate::error::{QprocError, QprocResult};
use crate::types::{Angle, QubitId};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

// ============================================================================
// Gate Kind
// ============================================================================

/// Closed set of gate kinds understood by the decomposers
/// Gantree: GateKind // 게이트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GateKind {
    /// Rotation around X
    Rx,
    /// Rotation around Y
    Ry,
    /// Rotation around Z
    Rz,
    /// Pauli-X
    X,
    /// Pauli-Y
    Y,
    /// Pauli-Z
    Z,
    /// Hadamard
    H,
    /// Controlled-NOT
    Cnot,
    /// Controlled-Z
    Cz,
    /// SWAP
    Swap,
    /// iSWAP
    ISwap,
    /// Square root of iSWAP
    SqrtISwap,
    /// Global phase e^{iφ} on the whole register
    GlobalPhase,
}

impl GateKind {
    /// All gate kinds
    pub const ALL: [GateKind; 13] = [
        GateKind::Rx,
        GateKind::Ry,
        GateKind::Rz,
        GateKind::X,
        GateKind::Y,
        GateKind::Z,
        GateKind::H,
        GateKind::Cnot,
        GateKind::Cz,
        GateKind::Swap,
        GateKind::ISwap,
        GateKind::SqrtISwap,
        GateKind::GlobalPhase,
    ];

    /// Canonical gate name
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Rx => "RX",
            GateKind::Ry => "RY",
            GateKind::Rz => "RZ",
            GateKind::X => "X",
            GateKind::Y => "Y",
            GateKind::Z => "Z",
            GateKind::H => "SNOT",
            GateKind::Cnot => "CNOT",
            GateKind::Cz => "CSIGN",
            GateKind::Swap => "SWAP",
            GateKind::ISwap => "ISWAP",
            GateKind::SqrtISwap => "SQRTISWAP",
            GateKind::GlobalPhase => "GLOBALPHASE",
        }
    }

    /// Parse from a gate name (case-insensitive, common aliases accepted)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "RX" => Some(GateKind::Rx),
            "RY" => Some(GateKind::Ry),
            "RZ" => Some(GateKind::Rz),
            "X" => Some(GateKind::X),
            "Y" => Some(GateKind::Y),
            "Z" => Some(GateKind::Z),
            "H" | "SNOT" | "HADAMARD" => Some(GateKind::H),
            "CNOT" | "CX" => Some(GateKind::Cnot),
            "CZ" | "CSIGN" => Some(GateKind::Cz),
            "SWAP" => Some(GateKind::Swap),
            "ISWAP" => Some(GateKind::ISwap),
            "SQRTISWAP" => Some(GateKind::SqrtISwap),
            "GLOBALPHASE" => Some(GateKind::GlobalPhase),
            _ => None,
        }
    }

    /// Whether the kind carries an angle argument
    pub fn takes_argument(&self) -> bool {
        matches!(
            self,
            GateKind::Rx | GateKind::Ry | GateKind::Rz | GateKind::GlobalPhase
        )
    }

    /// Number of target qubits
    pub fn num_targets(&self) -> usize {
        match self {
            GateKind::GlobalPhase => 0,
            GateKind::Swap | GateKind::ISwap | GateKind::SqrtISwap => 2,
            _ => 1,
        }
    }

    /// Number of control qubits
    pub fn num_controls(&self) -> usize {
        match self {
            GateKind::Cnot | GateKind::Cz => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Gate Instruction
// ============================================================================

/// A gate applied to specific qubits
/// Gantree: Gate // 게이트 명령
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    kind: GateKind,
    targets: Vec<QubitId>,
    controls: Vec<QubitId>,
    arg: Option<Angle>,
}

impl Gate {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a gate with validation of arity and argument
    /// Gantree: new(kind,targets,controls,arg) -> Result<Self> // 생성+검증
    pub fn new(
        kind: GateKind,
        targets: Vec<QubitId>,
        controls: Vec<QubitId>,
        arg: Option<Angle>,
    ) -> QprocResult<Self> {
        let gate = Self {
            kind,
            targets,
            controls,
            arg,
        };
        gate.validate()?;
        Ok(gate)
    }

    fn unchecked(kind: GateKind, targets: Vec<QubitId>, controls: Vec<QubitId>, arg: Option<Angle>) -> Self {
        Self {
            kind,
            targets,
            controls,
            arg,
        }
    }

    /// Rotation around X
    pub fn rx(target: QubitId, angle: Angle) -> Self {
        Self::unchecked(GateKind::Rx, vec![target], vec![], Some(angle))
    }

    /// Rotation around Y
    pub fn ry(target: QubitId, angle: Angle) -> Self {
        Self::unchecked(GateKind::Ry, vec![target], vec![], Some(angle))
    }

    /// Rotation around Z
    pub fn rz(target: QubitId, angle: Angle) -> Self {
        Self::unchecked(GateKind::Rz, vec![target], vec![], Some(angle))
    }

    /// Pauli-X
    pub fn x(target: QubitId) -> Self {
        Self::unchecked(GateKind::X, vec![target], vec![], None)
    }

    /// Pauli-Y
    pub fn y(target: QubitId) -> Self {
        Self::unchecked(GateKind::Y, vec![target], vec![], None)
    }

    /// Pauli-Z
    pub fn z(target: QubitId) -> Self {
        Self::unchecked(GateKind::Z, vec![target], vec![], None)
    }

    /// Hadamard
    pub fn h(target: QubitId) -> Self {
        Self::unchecked(GateKind::H, vec![target], vec![], None)
    }

    /// Controlled-NOT
    pub fn cnot(control: QubitId, target: QubitId) -> Self {
        Self::unchecked(GateKind::Cnot, vec![target], vec![control], None)
    }

    /// Controlled-Z
    pub fn cz(control: QubitId, target: QubitId) -> Self {
        Self::unchecked(GateKind::Cz, vec![target], vec![control], None)
    }

    /// SWAP
    pub fn swap(q1: QubitId, q2: QubitId) -> Self {
        Self::unchecked(GateKind::Swap, vec![q1, q2], vec![], None)
    }

    /// iSWAP
    pub fn iswap(q1: QubitId, q2: QubitId) -> Self {
        Self::unchecked(GateKind::ISwap, vec![q1, q2], vec![], None)
    }

    /// Square root of iSWAP
    pub fn sqrt_iswap(q1: QubitId, q2: QubitId) -> Self {
        Self::unchecked(GateKind::SqrtISwap, vec![q1, q2], vec![], None)
    }

    /// Global phase e^{iφ}
    pub fn global_phase(phase: Angle) -> Self {
        Self::unchecked(GateKind::GlobalPhase, vec![], vec![], Some(phase))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Gate kind
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Gate name
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Target qubits
    pub fn targets(&self) -> &[QubitId] {
        &self.targets
    }

    /// Control qubits
    pub fn controls(&self) -> &[QubitId] {
        &self.controls
    }

    /// Angle argument, if any
    pub fn arg(&self) -> Option<Angle> {
        self.arg
    }

    /// Angle argument, failing if absent
    pub fn require_arg(&self) -> QprocResult<Angle> {
        self.arg.ok_or_else(|| QprocError::InvalidGateArgument {
            gate: self.name().to_string(),
            reason: "missing angle".to_string(),
        })
    }

    /// First target qubit
    pub fn target(&self) -> QprocResult<QubitId> {
        self.targets
            .first()
            .copied()
            .ok_or_else(|| QprocError::InvalidGateArgument {
                gate: self.name().to_string(),
                reason: "missing target".to_string(),
            })
    }

    /// All qubits touched (controls first, then targets)
    pub fn qubits(&self) -> Vec<QubitId> {
        self.controls
            .iter()
            .chain(self.targets.iter())
            .copied()
            .collect()
    }

    /// Check if gate acts on two qubits
    pub fn is_two_qubit(&self) -> bool {
        self.qubits().len() == 2
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check arity and argument against the gate kind
    pub fn validate(&self) -> QprocResult<()> {
        let invalid = |reason: String| QprocError::InvalidGateArgument {
            gate: self.name().to_string(),
            reason,
        };

        if self.targets.len() != self.kind.num_targets() {
            return Err(invalid(format!(
                "expected {} target(s), got {}",
                self.kind.num_targets(),
                self.targets.len()
            )));
        }
        if self.controls.len() != self.kind.num_controls() {
            return Err(invalid(format!(
                "expected {} control(s), got {}",
                self.kind.num_controls(),
                self.controls.len()
            )));
        }

        match (self.kind.takes_argument(), self.arg) {
            (true, None) => return Err(invalid("missing angle".to_string())),
            (true, Some(a)) if !a.is_finite() => {
                return Err(invalid(format!("angle {} is not finite", a)))
            }
            (false, Some(_)) => return Err(invalid("unexpected angle".to_string())),
            _ => {}
        }

        let qubits = self.qubits();
        for (i, q) in qubits.iter().enumerate() {
            if qubits[i + 1..].contains(q) {
                return Err(invalid(format!("qubit {} used twice", q)));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        if let Some(arg) = self.arg {
            if (arg.abs() - PI).abs() < 1e-12 {
                write!(f, "({}π)", arg.signum())?;
            } else {
                write!(f, "({:.4})", arg)?;
            }
        }
        if !self.controls.is_empty() {
            write!(f, " c{:?}", self.controls)?;
        }
        if !self.targets.is_empty() {
            write!(f, " t{:?}", self.targets)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
