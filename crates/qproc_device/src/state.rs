//! Quantum states for QPROC
//!
//! Gantree: L5_Evolution → QuantumState

use crate::operators::{dagger, Operator};
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use qproc_core::error::{QprocError, QprocResult};
use qproc_core::register_dim;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State vector or density matrix
/// Gantree: QuantumState // 상태
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuantumState {
    /// Pure state vector
    Ket(Array1<Complex64>),
    /// Density matrix
    Density(Array2<Complex64>),
}

impl QuantumState {
    /// Computational basis state |index⟩ on `num_qubits` qubits
    pub fn basis(num_qubits: usize, index: usize) -> QprocResult<Self> {
        let dim = register_dim(num_qubits);
        if index >= dim {
            return Err(QprocError::DimensionMismatch {
                expected: dim,
                actual: index + 1,
            });
        }
        let mut ket = Array1::zeros(dim);
        ket[index] = Complex64::new(1.0, 0.0);
        Ok(QuantumState::Ket(ket))
    }

    /// |00…0⟩
    pub fn ground(num_qubits: usize) -> Self {
        let mut ket = Array1::zeros(register_dim(num_qubits));
        ket[0] = Complex64::new(1.0, 0.0);
        QuantumState::Ket(ket)
    }

    /// Hilbert space dimension
    pub fn dim(&self) -> usize {
        match self {
            QuantumState::Ket(ket) => ket.len(),
            QuantumState::Density(rho) => rho.nrows(),
        }
    }

    /// Check if this is a density matrix
    pub fn is_density(&self) -> bool {
        matches!(self, QuantumState::Density(_))
    }

    /// Check shape against a register dimension
    pub fn check_dim(&self, expected: usize) -> QprocResult<()> {
        let square = match self {
            QuantumState::Ket(_) => true,
            QuantumState::Density(rho) => rho.is_square(),
        };
        if !square || self.dim() != expected {
            return Err(QprocError::DimensionMismatch {
                expected,
                actual: self.dim(),
            });
        }
        Ok(())
    }

    /// Apply a unitary: `Uψ` or `UρU†`
    pub fn evolve(&self, unitary: &Operator) -> QprocResult<Self> {
        self.check_dim(unitary.nrows())?;
        Ok(match self {
            QuantumState::Ket(ket) => QuantumState::Ket(unitary.dot(ket)),
            QuantumState::Density(rho) => {
                QuantumState::Density(unitary.dot(rho).dot(&dagger(unitary)))
            }
        })
    }

    /// Density matrix form
    pub fn to_density(&self) -> Array2<Complex64> {
        match self {
            QuantumState::Ket(ket) => {
                let n = ket.len();
                Array2::from_shape_fn((n, n), |(i, j)| ket[i] * ket[j].conj())
            }
            QuantumState::Density(rho) => rho.clone(),
        }
    }

    /// Probability of each basis state
    pub fn probabilities(&self) -> Vec<f64> {
        match self {
            QuantumState::Ket(ket) => ket.iter().map(|a| a.norm_sqr()).collect(),
            QuantumState::Density(rho) => rho.diag().iter().map(|p| p.re).collect(),
        }
    }

    /// Fidelity with a pure target: `|⟨φ|ψ⟩|²` or `⟨φ|ρ|φ⟩`
    pub fn fidelity_with(&self, target: &Array1<Complex64>) -> QprocResult<f64> {
        self.check_dim(target.len())?;
        Ok(match self {
            QuantumState::Ket(ket) => target
                .iter()
                .zip(ket.iter())
                .map(|(t, a)| t.conj() * a)
                .sum::<Complex64>()
                .norm_sqr(),
            QuantumState::Density(rho) => {
                let rho_phi = rho.dot(target);
                target
                    .iter()
                    .zip(rho_phi.iter())
                    .map(|(t, a)| t.conj() * a)
                    .sum::<Complex64>()
                    .re
            }
        })
    }
}

impl fmt::Display for QuantumState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantumState::Ket(_) => write!(f, "Ket(dim={})", self.dim()),
            QuantumState::Density(_) => write!(f, "Density(dim={})", self.dim()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::sigma_x;
    use approx::assert_relative_eq;

    #[test]
    fn test_basis_and_ground() {
        let s = QuantumState::basis(2, 3).unwrap();
        assert_eq!(s.probabilities(), vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(QuantumState::ground(3).dim(), 8);
        assert!(QuantumState::basis(1, 2).is_err());
    }

    #[test]
    fn test_evolve_ket_and_density() {
        let ket = QuantumState::ground(1);
        let flipped = ket.evolve(&sigma_x()).unwrap();
        assert_eq!(flipped.probabilities(), vec![0.0, 1.0]);

        let rho = QuantumState::Density(ket.to_density());
        let flipped_rho = rho.evolve(&sigma_x()).unwrap();
        assert!(flipped_rho.is_density());
        assert_relative_eq!(flipped_rho.probabilities()[1], 1.0);
    }

    #[test]
    fn test_dimension_check() {
        let ket = QuantumState::ground(2);
        let err = ket.evolve(&sigma_x()).unwrap_err();
        assert_eq!(err, QprocError::DimensionMismatch { expected: 2, actual: 4 });
    }

    #[test]
    fn test_fidelity() {
        let one = QuantumState::basis(1, 1).unwrap();
        let target = match &one {
            QuantumState::Ket(k) => k.clone(),
            _ => unreachable!(),
        };
        assert_relative_eq!(one.fidelity_with(&target).unwrap(), 1.0);
        assert_relative_eq!(QuantumState::ground(1).fidelity_with(&target).unwrap(), 0.0);

        let rho = QuantumState::Density(one.to_density());
        assert_relative_eq!(rho.fidelity_with(&target).unwrap(), 1.0);
    }
}
