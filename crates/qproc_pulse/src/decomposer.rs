//! Gate decomposition for QPROC
//!
//! Gantree: L3_Pulse → GateDecomposer
//!
//! Maps each gate of a circuit to a pulse fragment and concatenates the
//! fragments into one [`PulseTimeline`]. Which gates a device can realize,
//! and how, is fixed by the [`DecompositionRegistry`] the device builds
//! once at construction.

use crate::timeline::PulseTimeline;
use log::debug;
use qproc_core::error::{QprocError, QprocResult};
use qproc_core::{ControlId, Gate, GateKind};
use std::collections::BTreeMap;
use std::fmt;

/// Pulse-emitting function for one gate kind.
///
/// Receives the device parameters, the gate, and the builder to append
/// segments to.
pub type GateHandler<P> = fn(&P, &Gate, &mut PulseBuilder) -> QprocResult<()>;

// ============================================================================
// Pulse Builder
// ============================================================================

/// Per-call segment accumulator
/// Gantree: PulseBuilder // 구간 누적기
#[derive(Debug, Clone)]
pub struct PulseBuilder {
    num_controls: usize,
    durations: Vec<f64>,
    columns: Vec<Vec<f64>>,
}

impl PulseBuilder {
    /// Create an empty builder for `num_controls` controls
    pub fn new(num_controls: usize) -> Self {
        Self {
            num_controls,
            durations: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Append a segment with one coefficient per control
    /// Gantree: add_segment(dt,row) -> Result // 구간 추가
    pub fn add_segment(&mut self, duration: f64, row: Vec<f64>) -> QprocResult<()> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(QprocError::InvalidPulse(format!(
                "segment duration must be finite and non-negative, got {}",
                duration
            )));
        }
        if row.len() != self.num_controls {
            return Err(QprocError::ShapeMismatch {
                expected: format!("{} coefficients", self.num_controls),
                actual: format!("{} coefficients", row.len()),
            });
        }
        if let Some(c) = row.iter().find(|c| !c.is_finite()) {
            return Err(QprocError::InvalidPulse(format!(
                "coefficient {} is not finite",
                c
            )));
        }

        self.durations.push(duration);
        self.columns.push(row);
        Ok(())
    }

    /// Append a segment driving only the listed controls; all others are zero
    pub fn drive(&mut self, duration: f64, amplitudes: &[(ControlId, f64)]) -> QprocResult<()> {
        let mut row = vec![0.0; self.num_controls];
        for &(control, amplitude) in amplitudes {
            let slot = row.get_mut(control).ok_or_else(|| QprocError::ShapeMismatch {
                expected: format!("control index < {}", self.num_controls),
                actual: format!("control index {}", control),
            })?;
            *slot = amplitude;
        }
        self.add_segment(duration, row)
    }

    /// Number of controls per segment
    pub fn num_controls(&self) -> usize {
        self.num_controls
    }

    /// Number of segments appended so far
    pub fn num_segments(&self) -> usize {
        self.durations.len()
    }

    /// Durations appended so far
    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    /// Stack the segments into a step-function timeline
    /// Gantree: finish() -> PulseTimeline // 타임라인 확정
    pub fn finish(self) -> PulseTimeline {
        PulseTimeline::from_segments(self.num_controls, &self.durations, &self.columns)
    }
}

// ============================================================================
// Decomposition Registry
// ============================================================================

/// Gate kind to handler table
/// Gantree: DecompositionRegistry // 분해 등록부
pub struct DecompositionRegistry<P> {
    handlers: BTreeMap<GateKind, GateHandler<P>>,
}

impl<P> DecompositionRegistry<P> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Register a handler, consuming and returning the registry
    pub fn with(mut self, kind: GateKind, handler: GateHandler<P>) -> Self {
        self.register(kind, handler);
        self
    }

    /// Register a handler, replacing any previous one for `kind`
    pub fn register(&mut self, kind: GateKind, handler: GateHandler<P>) {
        self.handlers.insert(kind, handler);
    }

    /// Look up the handler for `kind`
    pub fn get(&self, kind: GateKind) -> Option<GateHandler<P>> {
        self.handlers.get(&kind).copied()
    }

    /// Check if `kind` has a handler
    pub fn supports(&self, kind: GateKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Registered kinds in order
    pub fn kinds(&self) -> impl Iterator<Item = GateKind> + '_ {
        self.handlers.keys().copied()
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<P> Default for DecompositionRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for DecompositionRegistry<P> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<P> fmt::Debug for DecompositionRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.handlers.keys().map(GateKind::name))
            .finish()
    }
}

// ============================================================================
// Gate Decomposer
// ============================================================================

/// Decomposes gate sequences into pulse timelines
/// Gantree: GateDecomposer // 게이트 분해기
#[derive(Debug, Clone)]
pub struct GateDecomposer<P> {
    num_qubits: usize,
    num_controls: usize,
    params: P,
    registry: DecompositionRegistry<P>,
}

impl<P> GateDecomposer<P> {
    /// Create a decomposer; the registry is frozen from here on
    pub fn new(
        num_qubits: usize,
        num_controls: usize,
        params: P,
        registry: DecompositionRegistry<P>,
    ) -> Self {
        Self {
            num_qubits,
            num_controls,
            params,
            registry,
        }
    }

    /// Decompose gates into a pulse timeline.
    /// Gantree: decompose(gates) -> Result<PulseTimeline> // 분해
    ///
    /// Every call starts from an empty [`PulseBuilder`]. The first gate
    /// without a registered handler aborts the call with
    /// [`QprocError::UnsupportedGate`].
    pub fn decompose(&self, gates: &[Gate]) -> QprocResult<PulseTimeline> {
        debug!(
            "decomposing {} gates on {} qubits into {} controls",
            gates.len(),
            self.num_qubits,
            self.num_controls
        );

        let mut builder = PulseBuilder::new(self.num_controls);
        for gate in gates {
            let handler = self
                .registry
                .get(gate.kind())
                .ok_or_else(|| QprocError::UnsupportedGate(gate.name().to_string()))?;
            handler(&self.params, gate, &mut builder)?;
        }

        let timeline = builder.finish();
        debug!("decomposition produced {}", timeline);
        Ok(timeline)
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of control operators
    pub fn num_controls(&self) -> usize {
        self.num_controls
    }

    /// Device parameters
    pub fn params(&self) -> &P {
        &self.params
    }

    /// Handler table
    pub fn registry(&self) -> &DecompositionRegistry<P> {
        &self.registry
    }

    /// Check if a gate kind can be decomposed
    pub fn supports(&self, kind: GateKind) -> bool {
        self.registry.supports(kind)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// X drives control 0 with amplitude 3.0 for 1.0 time unit
    fn x_handler(_: &(), _: &Gate, builder: &mut PulseBuilder) -> QprocResult<()> {
        builder.drive(1.0, &[(0, 3.0)])
    }

    fn rz_handler(scale: &f64, gate: &Gate, builder: &mut PulseBuilder) -> QprocResult<()> {
        let theta = gate.require_arg()?;
        builder.drive(theta.abs() / scale, &[(1, scale * theta.signum())])
    }

    /// Emits nothing
    fn idle_handler(_: &(), _: &Gate, _: &mut PulseBuilder) -> QprocResult<()> {
        Ok(())
    }

    fn x_decomposer() -> GateDecomposer<()> {
        let registry = DecompositionRegistry::new().with(GateKind::X, x_handler as GateHandler<()>);
        GateDecomposer::new(1, 2, (), registry)
    }

    #[test]
    fn test_two_x_gates() {
        let timeline = x_decomposer().decompose(&[Gate::x(0), Gate::x(0)]).unwrap();
        assert_eq!(timeline.tlist().to_vec(), vec![0.0, 1.0, 2.0]);
        assert_eq!(timeline.coeffs(), &array![[3.0, 3.0], [0.0, 0.0]]);
        assert_eq!(timeline.coeffs().dim(), (2, 2));
    }

    #[test]
    fn test_empty_sequence() {
        let timeline = x_decomposer().decompose(&[]).unwrap();
        assert_eq!(timeline.tlist().to_vec(), vec![0.0]);
        assert_eq!(timeline.coeffs().dim(), (2, 0));
    }

    #[test]
    fn test_unsupported_gate() {
        let decomposer = x_decomposer();
        let err = decomposer
            .decompose(&[Gate::x(0), Gate::h(0), Gate::x(0)])
            .unwrap_err();
        assert_eq!(err, QprocError::UnsupportedGate("SNOT".to_string()));
    }

    #[test]
    fn test_no_leak_after_failure() {
        let decomposer = x_decomposer();
        assert!(decomposer.decompose(&[Gate::x(0), Gate::y(0)]).is_err());

        let timeline = decomposer.decompose(&[Gate::x(0)]).unwrap();
        assert_eq!(timeline.tlist().to_vec(), vec![0.0, 1.0]);
        assert_eq!(timeline.coeffs().ncols(), 1);
    }

    #[test]
    fn test_breakpoints_match_columns() {
        let registry = DecompositionRegistry::new()
            .with(GateKind::Rz, rz_handler as GateHandler<f64>);
        let decomposer = GateDecomposer::new(1, 2, 2.0, registry);
        let gates = vec![Gate::rz(0, 1.0), Gate::rz(0, -0.5), Gate::rz(0, 0.25)];

        let timeline = decomposer.decompose(&gates).unwrap();
        assert_eq!(timeline.tlist().len(), timeline.coeffs().ncols() + 1);
        assert_eq!(timeline.tlist().to_vec(), vec![0.0, 0.5, 0.75, 0.875]);
        assert_eq!(timeline.coeffs().row(1).to_vec(), vec![2.0, -2.0, 2.0]);
    }

    #[test]
    fn test_handler_may_emit_nothing() {
        let registry = DecompositionRegistry::new()
            .with(GateKind::X, x_handler as GateHandler<()>)
            .with(GateKind::Z, idle_handler as GateHandler<()>);
        let decomposer = GateDecomposer::new(1, 2, (), registry);

        let timeline = decomposer.decompose(&[Gate::z(0), Gate::x(0)]).unwrap();
        assert_eq!(timeline.num_segments(), 1);
    }

    #[test]
    fn test_builder_rejects_bad_segments() {
        let mut builder = PulseBuilder::new(2);
        assert!(builder.add_segment(-1.0, vec![0.0, 0.0]).is_err());
        assert!(builder.add_segment(f64::NAN, vec![0.0, 0.0]).is_err());
        assert!(builder.add_segment(1.0, vec![0.0]).is_err());
        assert!(builder.drive(1.0, &[(2, 1.0)]).is_err());
        assert_eq!(builder.num_segments(), 0);

        assert!(builder.drive(0.5, &[(1, -1.0)]).is_ok());
        assert_eq!(builder.durations(), &[0.5]);
    }

    #[test]
    fn test_registry_lookup() {
        let registry = DecompositionRegistry::<()>::new()
            .with(GateKind::X, x_handler)
            .with(GateKind::Z, idle_handler);
        assert_eq!(registry.len(), 2);
        assert!(registry.supports(GateKind::X));
        assert!(!registry.supports(GateKind::H));
        assert_eq!(registry.kinds().collect::<Vec<_>>(), vec![GateKind::X, GateKind::Z]);
        assert_eq!(format!("{:?}", registry), "[\"X\", \"Z\"]");
    }
}
