//! Error types for QPROC
//!
//! Gantree: L0_Foundation → Errors
//!
//! One error enum shared by every QPROC crate, from parameter setup
//! through decomposition to evolution dispatch.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for QPROC
/// Gantree: QprocError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QprocError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Device parameter rejected by the device's parameter setup
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Parameter requested but never configured
    #[error("Missing parameter '{0}'")]
    MissingParameter(String),

    /// Qubit index out of range
    #[error("Qubit {qubit} out of range: max is {max}")]
    QubitOutOfRange { qubit: usize, max: usize },

    /// Invalid T2 value (must be <= 2*T1)
    #[error("Invalid T2 ({t2:.4}) on qubit {qubit}: must be <= 2*T1 ({t1:.4})")]
    InvalidT2 { qubit: usize, t2: f64, t1: f64 },

    /// Malformed decoherence description
    #[error("Invalid decoherence: {0}")]
    InvalidDecoherence(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Circuit Errors
    // ========================================================================
    /// Gate kind without a registered decomposition
    /// Gantree: UnsupportedGate(String) // 미등록 게이트
    #[error("Unsupported gate {0}")]
    UnsupportedGate(String),

    /// Gate on non-existent qubit
    #[error("Gate references qubit {qubit} but circuit has only {num_qubits} qubits")]
    GateQubitMismatch { qubit: usize, num_qubits: usize },

    /// Gate argument missing or not finite
    #[error("Invalid argument for gate {gate}: {reason}")]
    InvalidGateArgument { gate: String, reason: String },

    /// Two-qubit gate on qubits the device does not couple
    #[error("Topology violation: qubits {q1} and {q2} are not coupled")]
    TopologyViolation { q1: usize, q2: usize },

    // ========================================================================
    // Pulse Errors
    // ========================================================================
    /// Malformed pulse segment or timeline
    #[error("Invalid pulse: {0}")]
    InvalidPulse(String),

    /// Array shape disagreement
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Evolution requested without a loaded pulse schedule
    #[error("No pulses loaded: supply a circuit or set a timeline before evolving")]
    NoPulses,

    /// State or operator dimension disagreement
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    // ========================================================================
    // Solver Errors
    // ========================================================================
    /// External solver failure
    #[error("Solver error: {0}")]
    SolverError(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// File I/O error
    #[error("File error: {0}")]
    FileError(String),
}

/// Result type alias for QPROC operations
/// Gantree: QprocResult<T> // type alias
pub type QprocResult<T> = Result<T, QprocError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for QprocError {
    fn from(err: serde_json::Error) -> Self {
        QprocError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for QprocError {
    fn from(err: std::io::Error) -> Self {
        QprocError::FileError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl QprocError {
    /// Shorthand for [`QprocError::InvalidParameter`]
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        QprocError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Check if error is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            QprocError::InvalidParameter { .. }
                | QprocError::MissingParameter(_)
                | QprocError::QubitOutOfRange { .. }
                | QprocError::InvalidT2 { .. }
                | QprocError::InvalidDecoherence(_)
                | QprocError::InvalidConfig(_)
        )
    }

    /// Check if error is a circuit error
    pub fn is_circuit_error(&self) -> bool {
        matches!(
            self,
            QprocError::UnsupportedGate(_)
                | QprocError::GateQubitMismatch { .. }
                | QprocError::InvalidGateArgument { .. }
                | QprocError::TopologyViolation { .. }
        )
    }

    /// Check if error concerns pulse data
    pub fn is_pulse_error(&self) -> bool {
        matches!(
            self,
            QprocError::InvalidPulse(_)
                | QprocError::ShapeMismatch { .. }
                | QprocError::NoPulses
                | QprocError::DimensionMismatch { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
