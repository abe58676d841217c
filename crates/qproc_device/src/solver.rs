//! Evolution dispatch for QPROC
//!
//! Gantree: L5_Evolution → Solver
//!
//! Two ways to evolve a stored pulse timeline: analytically, as a product
//! of per-segment matrix exponentials, or by handing an
//! [`EvolutionProblem`] to an external [`EvolutionSolver`].

use crate::expm::propagator;
use crate::operators::{embed, identity, sigma_minus, sigma_z, ControlOperator, Operator};
use crate::state::QuantumState;
use num_complex::Complex64;
use qproc_core::error::{QprocError, QprocResult};
use qproc_noise::Decoherence;
use qproc_pulse::{PulseTimeline, SplineKind};
use std::fmt;

// ============================================================================
// External solver seam
// ============================================================================

/// Everything a master-equation solver needs
/// Gantree: EvolutionProblem // 풀이 입력
#[derive(Debug, Clone)]
pub struct EvolutionProblem<'a> {
    /// Control Hamiltonians, indexed like the timeline rows
    pub controls: &'a [ControlOperator],

    /// Pulse schedule
    pub timeline: &'a PulseTimeline,

    /// Lindblad collapse operators built from T1/T2
    pub collapse_operators: Vec<Operator>,

    /// Initial ket or density matrix
    pub initial_state: &'a QuantumState,
}

impl EvolutionProblem<'_> {
    /// Total Hamiltonian on segment `k`: `Σ_m c_mk H_m`
    pub fn segment_hamiltonian(&self, k: usize) -> Option<Operator> {
        let column = self.timeline.segment_coeffs(k)?;
        let dim = self.initial_state.dim();
        let mut h = Operator::zeros((dim, dim));
        for (control, &c) in self.controls.iter().zip(column.iter()) {
            if c != 0.0 {
                h.scaled_add(Complex64::new(c, 0.0), control.matrix());
            }
        }
        Some(h)
    }

    /// Check if the problem carries no dissipation
    pub fn is_closed(&self) -> bool {
        self.collapse_operators.is_empty()
    }
}

/// External numerical integrator
/// Gantree: EvolutionSolver // 외부 솔버
pub trait EvolutionSolver {
    /// Solver result, returned to the caller unmodified
    type Output;

    /// Solver name for logging
    fn name(&self) -> &str {
        "external"
    }

    /// Integrate the problem
    fn solve(&self, problem: &EvolutionProblem<'_>) -> QprocResult<Self::Output>;
}

/// How `run_state` evolves the stored timeline
pub enum EvolutionMode<'a, O> {
    /// Matrix exponentiation per segment
    Analytical,
    /// Delegate to an external solver
    Numerical(&'a dyn EvolutionSolver<Output = O>),
}

impl<O> fmt::Debug for EvolutionMode<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvolutionMode::Analytical => write!(f, "Analytical"),
            EvolutionMode::Numerical(solver) => write!(f, "Numerical({})", solver.name()),
        }
    }
}

/// Outcome of `run_state`
#[derive(Debug, Clone)]
pub enum EvolutionResult<O> {
    /// Propagators and evolved state
    Analytical(AnalyticalEvolution),
    /// Whatever the external solver returned
    Numerical(O),
}

impl<O> EvolutionResult<O> {
    /// Analytical result, if this is one
    pub fn analytical(self) -> Option<AnalyticalEvolution> {
        match self {
            EvolutionResult::Analytical(evolution) => Some(evolution),
            EvolutionResult::Numerical(_) => None,
        }
    }

    /// Solver output, if this is one
    pub fn numerical(self) -> Option<O> {
        match self {
            EvolutionResult::Numerical(output) => Some(output),
            EvolutionResult::Analytical(_) => None,
        }
    }
}

// ============================================================================
// Collapse operators
// ============================================================================

/// Collapse operators for amplitude damping and pure dephasing.
///
/// `√γ1 σ-` per qubit with finite T1, and `√(γφ/2) σz` per qubit whose
/// T2 leaves a positive pure-dephasing rate.
pub fn collapse_operators(decoherence: &Decoherence) -> QprocResult<Vec<Operator>> {
    let n = decoherence.num_qubits();
    let mut ops = Vec::new();
    for q in 0..n {
        if let Some(gamma1) = decoherence.relaxation_rate(q) {
            let lowering = embed(&sigma_minus(), q, n)?;
            ops.push(lowering.mapv(|z| z * gamma1.sqrt()));
        }
        if let Some(gamma_phi) = decoherence.dephasing_rate(q) {
            let dephasing = embed(&sigma_z(), q, n)?;
            ops.push(dephasing.mapv(|z| z * (gamma_phi / 2.0).sqrt()));
        }
    }
    Ok(ops)
}

// ============================================================================
// Analytical evolution
// ============================================================================

/// Result of analytical evolution
/// Gantree: AnalyticalEvolution // 해석적 진화 결과
#[derive(Debug, Clone)]
pub struct AnalyticalEvolution {
    propagators: Vec<Operator>,
    global_phase: f64,
    total: Operator,
    final_state: QuantumState,
}

impl AnalyticalEvolution {
    /// Evolve `initial` through every segment of a step-function timeline.
    /// Gantree: compute(controls,timeline,initial,phase) -> Result<Self> // 해석적 진화
    ///
    /// `U_k = exp(-i Σ_m c_mk H_m Δt_k)`; the total is `e^{iφ} U_K…U_1`.
    pub fn compute(
        controls: &[ControlOperator],
        timeline: &PulseTimeline,
        initial: &QuantumState,
        global_phase: f64,
    ) -> QprocResult<Self> {
        if timeline.spline_kind() != SplineKind::StepFunc {
            return Err(QprocError::InvalidPulse(format!(
                "analytical evolution needs a step_func timeline, got {}",
                timeline.spline_kind()
            )));
        }
        timeline.check_controls(controls.len())?;

        let dim = initial.dim();
        if let Some(control) = controls.iter().find(|c| c.dim() != dim) {
            return Err(QprocError::DimensionMismatch {
                expected: dim,
                actual: control.dim(),
            });
        }

        let problem = EvolutionProblem {
            controls,
            timeline,
            collapse_operators: Vec::new(),
            initial_state: initial,
        };

        let durations = timeline.durations();
        let mut propagators = Vec::with_capacity(durations.len());
        let mut total = identity(dim);
        for (k, &dt) in durations.iter().enumerate() {
            let h = problem
                .segment_hamiltonian(k)
                .unwrap_or_else(|| Operator::zeros((dim, dim)));
            let u = propagator(&h, dt)?;
            total = u.dot(&total);
            propagators.push(u);
        }

        total.mapv_inplace(|z| z * Complex64::from_polar(1.0, global_phase));
        let final_state = initial.evolve(&total)?;

        Ok(Self {
            propagators,
            global_phase,
            total,
            final_state,
        })
    }

    /// One propagator per segment, in time order
    pub fn propagators(&self) -> &[Operator] {
        &self.propagators
    }

    /// Global phase folded into the total
    pub fn global_phase(&self) -> f64 {
        self.global_phase
    }

    /// `e^{iφ} U_K…U_1`
    pub fn total_unitary(&self) -> &Operator {
        &self.total
    }

    /// Initial state evolved by the total unitary
    pub fn final_state(&self) -> &QuantumState {
        &self.final_state
    }
}

// ============================================================================
// Tests
// ============================================================================
