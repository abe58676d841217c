//! Per-qubit decoherence for QPROC
//!
//! Gantree: L2_Noise → Decoherence
//!
//! T1 (amplitude damping) and T2 (dephasing) times for each qubit of a
//! processor, in the same time unit as the pulse timeline. Either may be
//! absent, in which case that channel is not simulated.

use qproc_core::error::{QprocError, QprocResult};
use qproc_core::{ParamValue, QubitId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-qubit T1/T2 description
/// Gantree: Decoherence // 큐비트별 T1/T2
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoherence {
    /// Number of qubits covered
    num_qubits: usize,

    /// Amplitude damping times, one per qubit
    t1: Option<Vec<f64>>,

    /// Dephasing times, one per qubit
    t2: Option<Vec<f64>>,
}

impl Decoherence {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Noiseless description
    /// Gantree: ideal(n) -> Self // 이상적
    pub fn ideal(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            t1: None,
            t2: None,
        }
    }

    /// Build from optional raw T1/T2 values with validation.
    /// Gantree: from_params(n,t1,t2) -> Result<Self> // 생성+검증
    ///
    /// Scalars are broadcast to every qubit; lists must have one entry per qubit.
    pub fn from_params(
        num_qubits: usize,
        t1: Option<&ParamValue>,
        t2: Option<&ParamValue>,
    ) -> QprocResult<Self> {
        let decoherence = Self {
            num_qubits,
            t1: t1.map(|v| v.expand(num_qubits)),
            t2: t2.map(|v| v.expand(num_qubits)),
        };
        decoherence.validate()?;
        Ok(decoherence)
    }

    /// Uniform T1 and T2 for every qubit
    pub fn uniform(num_qubits: usize, t1: f64, t2: f64) -> QprocResult<Self> {
        Self::from_params(
            num_qubits,
            Some(&ParamValue::Scalar(t1)),
            Some(&ParamValue::Scalar(t2)),
        )
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate lengths, positivity, and T2 <= 2*T1
    pub fn validate(&self) -> QprocResult<()> {
        for (label, times) in [("t1", &self.t1), ("t2", &self.t2)] {
            let Some(times) = times else { continue };

            if times.len() != self.num_qubits {
                return Err(QprocError::InvalidDecoherence(format!(
                    "{} has {} entries for {} qubits",
                    label,
                    times.len(),
                    self.num_qubits
                )));
            }
            if let Some((q, t)) = times
                .iter()
                .enumerate()
                .find(|(_, t)| t.is_nan() || **t <= 0.0)
            {
                return Err(QprocError::InvalidDecoherence(format!(
                    "{} of qubit {} must be positive, got {}",
                    label, q, t
                )));
            }
        }

        if let (Some(t1), Some(t2)) = (&self.t1, &self.t2) {
            for (qubit, (&t1, &t2)) in t1.iter().zip(t2.iter()).enumerate() {
                if t2 > 2.0 * t1 {
                    return Err(QprocError::InvalidT2 { qubit, t2, t1 });
                }
            }
        }

        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of qubits covered
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// T1 times, if configured
    pub fn t1(&self) -> Option<&[f64]> {
        self.t1.as_deref()
    }

    /// T2 times, if configured
    pub fn t2(&self) -> Option<&[f64]> {
        self.t2.as_deref()
    }

    /// Check whether no channel is configured
    pub fn is_ideal(&self) -> bool {
        self.t1.is_none() && self.t2.is_none()
    }

    // ========================================================================
    // Rates
    // ========================================================================

    /// Amplitude damping rate 1/T1 of a qubit
    /// Gantree: relaxation_rate(q) -> Option<f64> // 1/T1
    pub fn relaxation_rate(&self, qubit: QubitId) -> Option<f64> {
        let t1 = *self.t1.as_ref()?.get(qubit)?;
        rate(t1)
    }

    /// Pure dephasing rate of a qubit: 1/T2 - 1/(2*T1).
    /// Gantree: dephasing_rate(q) -> Option<f64> // 순수 위상 이완
    ///
    /// Returns `None` when T2 is not configured or is entirely explained by
    /// amplitude damping (T2 == 2*T1).
    pub fn dephasing_rate(&self, qubit: QubitId) -> Option<f64> {
        let t2_rate = rate(*self.t2.as_ref()?.get(qubit)?)?;
        let t1_share = self.relaxation_rate(qubit).unwrap_or(0.0) / 2.0;
        let gamma = t2_rate - t1_share;
        (gamma > 0.0).then_some(gamma)
    }
}

fn rate(time: f64) -> Option<f64> {
    (time.is_finite() && time > 0.0).then(|| 1.0 / time)
}

impl fmt::Display for Decoherence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Decoherence({}Q, t1={:?}, t2={:?})",
            self.num_qubits, self.t1, self.t2
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
