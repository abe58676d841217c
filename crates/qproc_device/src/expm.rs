//! Matrix exponential for QPROC
//!
//! Gantree: L5_Evolution → Expm
//!
//! Scaling and squaring around a truncated Taylor series. The operators
//! handled here are small (a few qubits), so a dense series is adequate.

use crate::operators::{identity, Operator};
use num_complex::Complex64;
use qproc_core::error::{QprocError, QprocResult};

/// Norm bound after scaling
const SCALED_NORM: f64 = 0.5;

/// Maximum series order
const MAX_ORDER: usize = 30;

/// Series terms below this norm are dropped
const TERM_TOLERANCE: f64 = 1e-18;

/// Maximum absolute column sum
fn one_norm(a: &Operator) -> f64 {
    a.columns()
        .into_iter()
        .map(|col| col.iter().map(|z| z.norm()).sum::<f64>())
        .fold(0.0, f64::max)
}

/// Compute `exp(A)` for a square matrix
/// Gantree: expm(A) -> Result<Operator> // 행렬 지수
pub fn expm(a: &Operator) -> QprocResult<Operator> {
    if !a.is_square() {
        return Err(QprocError::DimensionMismatch {
            expected: a.nrows(),
            actual: a.ncols(),
        });
    }
    let n = a.nrows();
    if n == 0 {
        return Ok(identity(0));
    }
    if a.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
        return Err(QprocError::SolverError(
            "matrix exponential of non-finite matrix".to_string(),
        ));
    }

    let norm = one_norm(a);
    let squarings = if norm > SCALED_NORM {
        (norm / SCALED_NORM).log2().ceil() as i32
    } else {
        0
    };
    let scaled = a.mapv(|z| z / 2f64.powi(squarings));

    let mut result = identity(n);
    let mut term = identity(n);
    for k in 1..=MAX_ORDER {
        term = term.dot(&scaled).mapv(|z| z / k as f64);
        result = result + &term;
        if one_norm(&term) < TERM_TOLERANCE {
            break;
        }
    }

    for _ in 0..squarings {
        result = result.dot(&result);
    }
    Ok(result)
}

/// Propagator `exp(-i H dt)` of a time-independent Hamiltonian
pub fn propagator(hamiltonian: &Operator, dt: f64) -> QprocResult<Operator> {
    let factor = Complex64::new(0.0, -dt);
    expm(&hamiltonian.mapv(|z| z * factor))
}

// ============================================================================
// Tests
// ============================================================================
