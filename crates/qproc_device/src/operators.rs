//! Operators on the qubit register for QPROC
//!
//! Gantree: L4_Device → Operators
//!
//! Dense complex matrices over the full `2^N` register. Qubit 0 is the
//! leftmost tensor factor.

use ndarray::Array2;
use num_complex::Complex64;
use qproc_core::error::{QprocError, QprocResult};
use qproc_core::{register_dim, QubitId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense complex square matrix
pub type Operator = Array2<Complex64>;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

// ============================================================================
// Single-qubit matrices
// ============================================================================

/// Identity of dimension `dim`
pub fn identity(dim: usize) -> Operator {
    Array2::from_diag_elem(dim, ONE)
}

/// Pauli X
pub fn sigma_x() -> Operator {
    ndarray::array![[ZERO, ONE], [ONE, ZERO]]
}

/// Pauli Y
pub fn sigma_y() -> Operator {
    ndarray::array![[ZERO, -I], [I, ZERO]]
}

/// Pauli Z
pub fn sigma_z() -> Operator {
    ndarray::array![[ONE, ZERO], [ZERO, -ONE]]
}

/// Lowering operator |0⟩⟨1|
pub fn sigma_minus() -> Operator {
    ndarray::array![[ZERO, ONE], [ZERO, ZERO]]
}

// ============================================================================
// Products and embedding
// ============================================================================

/// Kronecker product `a ⊗ b`
pub fn kron(a: &Operator, b: &Operator) -> Operator {
    let (ar, ac) = a.dim();
    let (br, bc) = b.dim();
    Array2::from_shape_fn((ar * br, ac * bc), |(i, j)| {
        a[[i / br, j / bc]] * b[[i % br, j % bc]]
    })
}

/// Place single-qubit factors on the given qubits, identity elsewhere
/// Gantree: embed_factors(factors,n) -> Result<Operator> // 텐서 확장
pub fn embed_factors(factors: &[(QubitId, &Operator)], num_qubits: usize) -> QprocResult<Operator> {
    for &(qubit, op) in factors {
        if qubit >= num_qubits {
            return Err(QprocError::QubitOutOfRange {
                qubit,
                max: num_qubits.saturating_sub(1),
            });
        }
        if op.dim() != (2, 2) {
            return Err(QprocError::DimensionMismatch {
                expected: 2,
                actual: op.nrows(),
            });
        }
    }

    let eye = identity(2);
    let mut result = identity(1);
    for q in 0..num_qubits {
        let factor = factors
            .iter()
            .find(|(target, _)| *target == q)
            .map(|(_, op)| *op)
            .unwrap_or(&eye);
        result = kron(&result, factor);
    }
    Ok(result)
}

/// Single-qubit operator acting on `target`
pub fn embed(op: &Operator, target: QubitId, num_qubits: usize) -> QprocResult<Operator> {
    embed_factors(&[(target, op)], num_qubits)
}

/// Hermitian conjugate
pub fn dagger(op: &Operator) -> Operator {
    op.t().mapv(|z| z.conj())
}

/// Check `op† == op` within `tol`
pub fn is_hermitian(op: &Operator, tol: f64) -> bool {
    op.is_square() && (op - &dagger(op)).iter().all(|z| z.norm() <= tol)
}

/// Check `U†U == I` within `tol`
pub fn is_unitary(op: &Operator, tol: f64) -> bool {
    if !op.is_square() {
        return false;
    }
    let product = dagger(op).dot(op);
    (&product - &identity(op.nrows()))
        .iter()
        .all(|z| z.norm() <= tol)
}

/// Max-abs distance between two operators after removing a global phase.
///
/// The phase is taken from the largest entry of `b`.
pub fn distance_up_to_phase(a: &Operator, b: &Operator) -> f64 {
    if a.dim() != b.dim() {
        return f64::INFINITY;
    }
    let pivot = b
        .indexed_iter()
        .max_by(|x, y| x.1.norm().total_cmp(&y.1.norm()))
        .map(|(idx, _)| idx);
    let phase = match pivot {
        Some(idx) if a[idx].norm() > 0.0 && b[idx].norm() > 0.0 => {
            (b[idx] / a[idx]) / (b[idx] / a[idx]).norm()
        }
        _ => ONE,
    };
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x * phase - y).norm())
        .fold(0.0, f64::max)
}

// ============================================================================
// Control operator
// ============================================================================

/// Labelled control Hamiltonian term
/// Gantree: ControlOperator // 제어 해밀토니안
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlOperator {
    /// Label used in rasters and plots
    label: String,

    /// Matrix on the full register
    matrix: Operator,
}

impl ControlOperator {
    /// Create a control operator; the matrix must be square and `2^N` sized
    pub fn new(label: impl Into<String>, matrix: Operator, num_qubits: usize) -> QprocResult<Self> {
        let dim = register_dim(num_qubits);
        if !matrix.is_square() || matrix.nrows() != dim {
            return Err(QprocError::DimensionMismatch {
                expected: dim,
                actual: matrix.nrows(),
            });
        }
        Ok(Self {
            label: label.into(),
            matrix,
        })
    }

    /// Label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Matrix
    pub fn matrix(&self) -> &Operator {
        &self.matrix
    }

    /// Register dimension
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }
}

impl fmt::Display for ControlOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x{})", self.label, self.dim(), self.dim())
    }
}

// ============================================================================
// Tests
// ============================================================================
