//! Model processor for QPROC
//!
//! Gantree: L5_Evolution → Processor
//!
//! Owns a device, its decoherence description, and the pulse timeline of
//! the last loaded circuit. Global-phase gates never reach the device
//! decomposer; their phases are summed here and applied only in the
//! analytical result.

use crate::config::ProcessorConfig;
use crate::device::{ConfigureParameters, DeviceModel};
use crate::operators::ControlOperator;
use crate::solver::{
    collapse_operators, AnalyticalEvolution, EvolutionMode, EvolutionProblem, EvolutionResult,
    EvolutionSolver,
};
use crate::state::QuantumState;
use log::{debug, info};
use ndarray::Array2;
use qproc_core::error::{QprocError, QprocResult};
use qproc_core::{register_dim, Circuit, Gate, GateKind};
use qproc_noise::Decoherence;
use qproc_pulse::{rasterize, PulseRaster, PulseTimeline};
use std::fmt;

/// Model processor
/// Gantree: Processor // 모델 프로세서
#[derive(Debug, Clone)]
pub struct Processor<D: DeviceModel> {
    /// Physical device
    device: D,

    /// Configuration the processor was built with
    config: ProcessorConfig,

    /// Validated T1/T2
    decoherence: Decoherence,

    /// Pulses of the last loaded circuit
    timeline: Option<PulseTimeline>,

    /// Sum of stripped global-phase gates
    global_phase: f64,
}

impl<D: DeviceModel> Processor<D> {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a processor; the config must describe the device's register
    /// Gantree: new(device,config) -> Result<Self> // 생성+검증
    pub fn new(device: D, config: ProcessorConfig) -> QprocResult<Self> {
        config.validate()?;
        if config.num_qubits != device.num_qubits() {
            return Err(QprocError::InvalidConfig(format!(
                "config has {} qubits but device {} has {}",
                config.num_qubits,
                device.name(),
                device.num_qubits()
            )));
        }
        let decoherence = config.decoherence()?;

        info!(
            "processor ready: {} with {} controls, {}",
            device.name(),
            device.num_controls(),
            decoherence
        );

        Ok(Self {
            device,
            config,
            decoherence,
            timeline: None,
            global_phase: 0.0,
        })
    }

    /// Noiseless processor with default settings
    pub fn ideal(device: D) -> QprocResult<Self> {
        let config = ProcessorConfig::new(device.num_qubits());
        Self::new(device, config)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Device
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Configuration
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Decoherence description
    pub fn decoherence(&self) -> &Decoherence {
        &self.decoherence
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.device.num_qubits()
    }

    /// Global phase accumulated by the last load
    pub fn global_phase(&self) -> f64 {
        self.global_phase
    }

    /// Stored timeline, if any
    pub fn timeline(&self) -> Option<&PulseTimeline> {
        self.timeline.as_ref()
    }

    /// Control labels in row order
    pub fn control_labels(&self) -> Vec<String> {
        self.device.control_labels()
    }

    /// Control operators and the coefficient matrix transposed to
    /// (segments, controls)
    pub fn ops_and_coeffs(&self) -> QprocResult<(&[ControlOperator], Array2<f64>)> {
        let timeline = self.stored_timeline()?;
        Ok((self.device.controls(), timeline.coeffs_by_segment()))
    }

    fn stored_timeline(&self) -> QprocResult<&PulseTimeline> {
        self.timeline.as_ref().ok_or(QprocError::NoPulses)
    }

    // ========================================================================
    // Pulses
    // ========================================================================

    /// Replace the device parameters. Stored pulses were built from the
    /// old values and are dropped.
    pub fn set_up_params(&mut self, raw: &D::Raw) -> QprocResult<()> {
        self.device.set_up_params(raw)?;
        self.clear();
        Ok(())
    }

    /// Compile a circuit into pulses and store them
    /// Gantree: load_circuit(circuit) -> Result<&PulseTimeline> // 회로 적재
    ///
    /// Nothing is stored unless every step succeeds.
    pub fn load_circuit(&mut self, circuit: &Circuit) -> QprocResult<&PulseTimeline> {
        if circuit.num_qubits() != self.num_qubits() {
            return Err(QprocError::InvalidConfig(format!(
                "circuit has {} qubits, processor has {}",
                circuit.num_qubits(),
                self.num_qubits()
            )));
        }
        circuit.validate()?;

        let native = self.device.to_native_gates(circuit.gates())?;
        let (phases, gates): (Vec<Gate>, Vec<Gate>) = native
            .into_iter()
            .partition(|g| g.kind() == GateKind::GlobalPhase);

        let timeline = self.device.decompose(&gates)?;
        let global_phase = if self.config.correct_global_phase {
            phases.iter().filter_map(Gate::arg).sum::<f64>()
        } else {
            0.0
        };

        debug!(
            "loaded {} gates as {} native gates, global phase {:.4}",
            circuit.gate_count(),
            gates.len(),
            global_phase
        );

        self.global_phase = global_phase;
        let stored: &PulseTimeline = self.timeline.insert(timeline);
        Ok(stored)
    }

    /// Store externally produced pulses. The global phase is reset.
    /// Gantree: set_timeline(timeline) -> Result // 외부 펄스
    pub fn set_timeline(&mut self, timeline: PulseTimeline) -> QprocResult<()> {
        timeline.validate()?;
        timeline.check_controls(self.device.num_controls())?;
        self.timeline = Some(timeline);
        self.global_phase = 0.0;
        Ok(())
    }

    /// Drop stored pulses
    pub fn clear(&mut self) {
        self.timeline = None;
        self.global_phase = 0.0;
    }

    /// Sample the stored pulses on the configured raster step
    /// Gantree: pulse_raster() -> Result<PulseRaster> // 래스터
    pub fn pulse_raster(&self) -> QprocResult<PulseRaster> {
        rasterize(
            self.stored_timeline()?,
            &self.control_labels(),
            self.config.raster_step,
        )
    }

    // ========================================================================
    // Evolution
    // ========================================================================

    /// Solver input for the stored pulses
    pub fn evolution_problem<'a>(
        &'a self,
        initial_state: &'a QuantumState,
    ) -> QprocResult<EvolutionProblem<'a>> {
        let timeline = self.stored_timeline()?;
        initial_state.check_dim(register_dim(self.num_qubits()))?;
        Ok(EvolutionProblem {
            controls: self.device.controls(),
            timeline,
            collapse_operators: collapse_operators(&self.decoherence)?,
            initial_state,
        })
    }

    /// Evolve an initial state, loading `circuit` first if given
    /// Gantree: run_state(state,mode,circuit) -> Result<EvolutionResult> // 진화
    pub fn run_state<O>(
        &mut self,
        initial_state: &QuantumState,
        mode: EvolutionMode<'_, O>,
        circuit: Option<&Circuit>,
    ) -> QprocResult<EvolutionResult<O>> {
        if let Some(circuit) = circuit {
            self.load_circuit(circuit)?;
        }
        match mode {
            EvolutionMode::Analytical => {
                self.evolve_analytically(initial_state).map(EvolutionResult::Analytical)
            }
            EvolutionMode::Numerical(solver) => {
                let problem = self.evolution_problem(initial_state)?;
                info!(
                    "dispatching {} segments to solver {} with {} collapse operators",
                    problem.timeline.num_segments(),
                    solver.name(),
                    problem.collapse_operators.len()
                );
                solver.solve(&problem).map(EvolutionResult::Numerical)
            }
        }
    }

    /// Analytical evolution by matrix exponentiation
    pub fn run_analytical(
        &mut self,
        initial_state: &QuantumState,
        circuit: Option<&Circuit>,
    ) -> QprocResult<AnalyticalEvolution> {
        if let Some(circuit) = circuit {
            self.load_circuit(circuit)?;
        }
        self.evolve_analytically(initial_state)
    }

    /// Numerical evolution through an external solver
    pub fn run_numerical<S: EvolutionSolver>(
        &mut self,
        solver: &S,
        initial_state: &QuantumState,
        circuit: Option<&Circuit>,
    ) -> QprocResult<S::Output> {
        let mode: EvolutionMode<'_, S::Output> = EvolutionMode::Numerical(solver);
        self.run_state(initial_state, mode, circuit)?
            .numerical()
            .ok_or_else(|| QprocError::SolverError("solver produced no output".to_string()))
    }

    fn evolve_analytically(&self, initial_state: &QuantumState) -> QprocResult<AnalyticalEvolution> {
        let timeline = self.stored_timeline()?;
        initial_state.check_dim(register_dim(self.num_qubits()))?;
        debug!(
            "analytical evolution over {} segments, duration {:.4}",
            timeline.num_segments(),
            timeline.total_duration()
        );
        AnalyticalEvolution::compute(
            self.device.controls(),
            timeline,
            initial_state,
            self.global_phase,
        )
    }
}

impl<D: DeviceModel> fmt::Display for Processor<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processor({}, {} qubits, ",
            self.device.name(),
            self.num_qubits()
        )?;
        match &self.timeline {
            Some(timeline) => write!(f, "{})", timeline),
            None => write!(f, "no pulses)"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::{distance_up_to_phase, identity, sigma_x};
    use crate::spinchain::{SpinChain, SpinChainParams};
    use approx::assert_relative_eq;
    use ndarray::array;
    use qproc_core::CircuitBuilder;
    use qproc_pulse::SplineKind;
    use std::cell::Cell;
    use std::f64::consts::{FRAC_PI_2, PI};

    /// Records what it was handed and returns a fixed tag
    struct RecordingSolver {
        calls: Cell<usize>,
        segments: Cell<usize>,
        collapse: Cell<usize>,
    }

    impl RecordingSolver {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
                segments: Cell::new(0),
                collapse: Cell::new(0),
            }
        }
    }

    impl EvolutionSolver for RecordingSolver {
        type Output = &'static str;

        fn name(&self) -> &str {
            "recording"
        }

        fn solve(&self, problem: &EvolutionProblem<'_>) -> QprocResult<&'static str> {
            self.calls.set(self.calls.get() + 1);
            self.segments.set(problem.timeline.num_segments());
            self.collapse.set(problem.collapse_operators.len());
            Ok("solver-output")
        }
    }

    fn processor(n: usize) -> Processor<SpinChain> {
        Processor::ideal(SpinChain::linear(n).unwrap()).unwrap()
    }

    #[test]
    fn test_config_must_match_device() {
        let err = Processor::new(SpinChain::linear(2).unwrap(), ProcessorConfig::new(3)).unwrap_err();
        assert!(matches!(err, QprocError::InvalidConfig(_)));

        let config = ProcessorConfig::new(2).with_t1(10.0).with_t2(25.0);
        assert!(Processor::new(SpinChain::linear(2).unwrap(), config).is_err());
    }

    #[test]
    fn test_no_pulses() {
        let mut p = processor(1);
        let initial = QuantumState::ground(1);
        assert_eq!(p.run_analytical(&initial, None).unwrap_err(), QprocError::NoPulses);

        let solver = RecordingSolver::new();
        assert_eq!(p.run_numerical(&solver, &initial, None).unwrap_err(), QprocError::NoPulses);
        assert_eq!(solver.calls.get(), 0);
        assert!(p.pulse_raster().is_err());
        assert!(p.ops_and_coeffs().is_err());
    }

    #[test]
    fn test_load_circuit_tracks_phase() {
        let mut p = processor(1);
        let circuit = CircuitBuilder::new(1).x(0).x(0).build();
        let timeline = p.load_circuit(&circuit).unwrap();
        assert_eq!(timeline.num_segments(), 2);
        assert_relative_eq!(p.global_phase(), PI);

        // Phase is reset on every load
        p.load_circuit(&CircuitBuilder::new(1).rx(0, 1.0).build()).unwrap();
        assert_eq!(p.global_phase(), 0.0);
    }

    #[test]
    fn test_phase_tracking_disabled() {
        let config = ProcessorConfig::new(1).with_global_phase_correction(false);
        let mut p = Processor::new(SpinChain::linear(1).unwrap(), config).unwrap();
        p.load_circuit(&CircuitBuilder::new(1).x(0).build()).unwrap();
        assert_eq!(p.global_phase(), 0.0);
    }

    #[test]
    fn test_failed_load_keeps_previous_state() {
        let mut p = processor(2);
        p.load_circuit(&CircuitBuilder::new(2).x(0).build()).unwrap();
        let before = p.timeline().cloned();

        let err = p.load_circuit(&CircuitBuilder::new(2).cnot(0, 1).build()).unwrap_err();
        assert_eq!(err, QprocError::UnsupportedGate("CNOT".to_string()));
        assert_eq!(p.timeline().cloned(), before);
        assert_relative_eq!(p.global_phase(), FRAC_PI_2);

        assert!(p.load_circuit(&Circuit::new(3)).is_err());
    }

    #[test]
    fn test_x_gate_analytically() {
        let mut p = processor(1);
        let circuit = CircuitBuilder::new(1).x(0).build();
        let evolution = p.run_analytical(&QuantumState::ground(1), Some(&circuit)).unwrap();

        // RX(π) with the π/2 phase is σx exactly
        let total = evolution.total_unitary();
        assert!((total - &sigma_x()).iter().all(|z| z.norm() < 1e-9));
        assert_relative_eq!(evolution.final_state().probabilities()[1], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_circuit_is_identity() {
        let mut p = processor(2);
        let evolution = p
            .run_analytical(&QuantumState::ground(2), Some(&Circuit::new(2)))
            .unwrap();
        assert!(evolution.propagators().is_empty());
        assert_eq!(evolution.total_unitary(), &identity(4));
        assert_eq!(evolution.global_phase(), p.global_phase());
    }

    #[test]
    fn test_run_state_dispatch() {
        let mut p = processor(2);
        let circuit = CircuitBuilder::new(2).iswap(0, 1).build();
        let initial = QuantumState::ground(2);

        let solver = RecordingSolver::new();
        let result = p
            .run_state(&initial, EvolutionMode::Numerical(&solver), Some(&circuit))
            .unwrap();
        assert_eq!(result.numerical(), Some("solver-output"));
        assert_eq!(solver.calls.get(), 1);
        assert_eq!(solver.segments.get(), 1);
        assert_eq!(solver.collapse.get(), 0);

        let result = p
            .run_state::<()>(&initial, EvolutionMode::Analytical, None)
            .unwrap();
        assert_eq!(result.analytical().unwrap().propagators().len(), 1);
    }

    #[test]
    fn test_collapse_operators_reach_solver() {
        let config = ProcessorConfig::new(2).with_t1(100.0).with_t2(80.0);
        let mut p = Processor::new(SpinChain::linear(2).unwrap(), config).unwrap();
        let solver = RecordingSolver::new();
        let circuit = CircuitBuilder::new(2).rx(0, 0.5).build();

        p.run_numerical(&solver, &QuantumState::ground(2), Some(&circuit)).unwrap();
        assert_eq!(solver.collapse.get(), 4);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut p = processor(2);
        p.load_circuit(&CircuitBuilder::new(2).x(1).build()).unwrap();
        let err = p.run_analytical(&QuantumState::ground(1), None).unwrap_err();
        assert_eq!(err, QprocError::DimensionMismatch { expected: 4, actual: 2 });
    }

    #[test]
    fn test_set_timeline() {
        let mut p = processor(1);
        let bad = PulseTimeline::new(array![0.0, 1.0], array![[1.0]], SplineKind::StepFunc).unwrap();
        assert!(matches!(p.set_timeline(bad), Err(QprocError::ShapeMismatch { .. })));

        // sx0 = 1.0 for π/2: exp(-i π/2 σx)
        let timeline =
            PulseTimeline::new(array![0.0, FRAC_PI_2], array![[1.0], [0.0]], SplineKind::StepFunc)
                .unwrap();
        p.set_timeline(timeline).unwrap();
        let evolution = p.run_analytical(&QuantumState::ground(1), None).unwrap();
        assert!(distance_up_to_phase(evolution.total_unitary(), &sigma_x()) < 1e-9);
        assert_eq!(evolution.global_phase(), 0.0);
    }

    #[test]
    fn test_ops_and_coeffs_transposed() {
        let mut p = processor(1);
        p.load_circuit(&CircuitBuilder::new(1).rx(0, 1.0).rz(0, 1.0).build()).unwrap();
        let (ops, coeffs) = p.ops_and_coeffs().unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(coeffs.dim(), (2, 2));
        assert_eq!(coeffs[[1, 0]], 0.0);
        assert!(coeffs[[1, 1]] > 0.0);
    }

    #[test]
    fn test_pulse_raster_uses_labels() {
        let mut p = processor(1);
        p.load_circuit(&CircuitBuilder::new(1).x(0).build()).unwrap();
        let raster = p.pulse_raster().unwrap();
        assert_eq!(raster.labels(), &["sx0".to_string(), "sz0".to_string()]);
        // RX(π) at 0.25·2π lasts 1.0
        assert_eq!(raster.len(), 100);
    }

    #[test]
    fn test_set_up_params_drops_pulses() {
        let mut p = processor(1);
        p.load_circuit(&CircuitBuilder::new(1).x(0).build()).unwrap();
        p.set_up_params(&SpinChainParams::default().with_sx(0.5)).unwrap();
        assert!(p.timeline().is_none());

        let timeline = p.load_circuit(&CircuitBuilder::new(1).x(0).build()).unwrap();
        assert_relative_eq!(timeline.total_duration(), 0.5, epsilon = 1e-12);
    }
}
