//! Spin chain device for QPROC
//!
//! Gantree: L4_Device → SpinChain
//!
//! Qubits driven individually by σx and σz, with nearest-neighbour
//! σxσx + σyσy exchange. The chain is linear or closes into a ring.

use crate::device::{ConfigureParameters, DeviceModel};
use crate::operators::{embed, embed_factors, sigma_x, sigma_y, sigma_z, ControlOperator};
use log::debug;
use qproc_core::constants::spinchain::{DEFAULT_SX, DEFAULT_SXSY, DEFAULT_SZ, MAX_QUBITS};
use qproc_core::error::{QprocError, QprocResult};
use qproc_core::{ControlId, Gate, GateKind, ParamValue, ParameterSet, QubitId};
use qproc_pulse::{DecompositionRegistry, GateDecomposer, GateHandler, PulseBuilder, PulseTimeline};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

// ============================================================================
// Layout
// ============================================================================

/// Chain connectivity
/// Gantree: ChainLayout // 체인 배치
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChainLayout {
    /// 0-1-2-...-(N-1)
    #[default]
    Linear,
    /// Linear plus (N-1)-0
    Circular,
}

impl ChainLayout {
    /// Coupled pairs in control order
    /// Gantree: couplings(n) -> Vec<(QubitId,QubitId)> // 결합 목록
    pub fn couplings(&self, num_qubits: usize) -> Vec<(QubitId, QubitId)> {
        let mut pairs: Vec<(QubitId, QubitId)> =
            (0..num_qubits.saturating_sub(1)).map(|i| (i, i + 1)).collect();
        if *self == ChainLayout::Circular && num_qubits > 2 {
            pairs.push((num_qubits - 1, 0));
        }
        pairs
    }
}

impl fmt::Display for ChainLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainLayout::Linear => write!(f, "linear"),
            ChainLayout::Circular => write!(f, "circular"),
        }
    }
}

// ============================================================================
// Raw parameters
// ============================================================================

/// Drive and coupling strengths in frequency units
/// Gantree: SpinChainParams // 원시 파라미터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinChainParams {
    /// σx strength, scalar or one per qubit
    pub sx: ParamValue,

    /// σz strength, scalar or one per qubit
    pub sz: ParamValue,

    /// Exchange strength, scalar or one per coupling
    pub sxsy: ParamValue,
}

impl Default for SpinChainParams {
    fn default() -> Self {
        Self {
            sx: ParamValue::Scalar(DEFAULT_SX),
            sz: ParamValue::Scalar(DEFAULT_SZ),
            sxsy: ParamValue::Scalar(DEFAULT_SXSY),
        }
    }
}

impl SpinChainParams {
    /// Set σx strength
    pub fn with_sx(mut self, sx: impl Into<ParamValue>) -> Self {
        self.sx = sx.into();
        self
    }

    /// Set σz strength
    pub fn with_sz(mut self, sz: impl Into<ParamValue>) -> Self {
        self.sz = sz.into();
        self
    }

    /// Set exchange strength
    pub fn with_sxsy(mut self, sxsy: impl Into<ParamValue>) -> Self {
        self.sxsy = sxsy.into();
        self
    }

    /// Normalize to angular units and validate against the chain shape
    /// Gantree: normalize(n,couplings) -> Result<ParameterSet> // 정규화+검증
    pub fn normalize(&self, num_qubits: usize, num_couplings: usize) -> QprocResult<ParameterSet> {
        let mut params = ParameterSet::new();
        for (name, value, len) in [
            ("sx", &self.sx, num_qubits),
            ("sz", &self.sz, num_qubits),
            ("sxsy", &self.sxsy, num_couplings),
        ] {
            if let Some(given) = value.explicit_len() {
                if given != len {
                    return Err(QprocError::invalid_parameter(
                        name,
                        format!("expected {} values, got {}", len, given),
                    ));
                }
            }
            if let Some(bad) = value.expand(len).into_iter().find(|v| !v.is_finite() || *v <= 0.0) {
                return Err(QprocError::invalid_parameter(
                    name,
                    format!("strengths must be positive and finite, got {}", bad),
                ));
            }
            params.insert_scaled(name, value, len);
        }
        Ok(params)
    }
}

// ============================================================================
// Decomposition context
// ============================================================================

/// State shared by the gate handlers
#[derive(Debug, Clone)]
pub struct ChainContext {
    num_qubits: usize,
    couplings: Vec<(QubitId, QubitId)>,
    params: ParameterSet,
}

impl ChainContext {
    fn sx_control(&self, q: QubitId) -> ControlId {
        q
    }

    fn sz_control(&self, q: QubitId) -> ControlId {
        self.num_qubits + q
    }

    fn sxsy_control(&self, k: usize) -> ControlId {
        2 * self.num_qubits + k
    }

    fn check_qubit(&self, q: QubitId) -> QprocResult<()> {
        if q >= self.num_qubits {
            return Err(QprocError::GateQubitMismatch {
                qubit: q,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    /// Index of the coupling between two qubits, in either order
    pub fn coupling_index(&self, q1: QubitId, q2: QubitId) -> QprocResult<usize> {
        self.check_qubit(q1)?;
        self.check_qubit(q2)?;
        self.couplings
            .iter()
            .position(|&(a, b)| (a, b) == (q1, q2) || (a, b) == (q2, q1))
            .ok_or(QprocError::TopologyViolation { q1, q2 })
    }

    /// Normalized parameters
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }
}

// Handlers. Rotations drive sign(θ)·g for |θ|/(2g); exchange drives -g.

fn single_qubit_rotation(
    ctx: &ChainContext,
    gate: &Gate,
    builder: &mut PulseBuilder,
    param: &str,
    control: fn(&ChainContext, QubitId) -> ControlId,
) -> QprocResult<()> {
    let theta = gate.require_arg()?;
    let q = gate.target()?;
    ctx.check_qubit(q)?;
    let g = ctx.params.value_at(param, q)?;
    builder.drive(theta.abs() / (2.0 * g), &[(control(ctx, q), g * theta.signum())])
}

fn rx_pulse(ctx: &ChainContext, gate: &Gate, builder: &mut PulseBuilder) -> QprocResult<()> {
    single_qubit_rotation(ctx, gate, builder, "sx", ChainContext::sx_control)
}

fn rz_pulse(ctx: &ChainContext, gate: &Gate, builder: &mut PulseBuilder) -> QprocResult<()> {
    single_qubit_rotation(ctx, gate, builder, "sz", ChainContext::sz_control)
}

fn exchange(
    ctx: &ChainContext,
    gate: &Gate,
    builder: &mut PulseBuilder,
    angle: f64,
) -> QprocResult<()> {
    let (q1, q2) = match gate.targets() {
        [q1, q2] => (*q1, *q2),
        _ => {
            return Err(QprocError::InvalidGateArgument {
                gate: gate.name().to_string(),
                reason: "expected two targets".to_string(),
            })
        }
    };
    let k = ctx.coupling_index(q1, q2)?;
    let g = ctx.params.value_at("sxsy", k)?;
    builder.drive(angle / g, &[(ctx.sxsy_control(k), -g)])
}

fn iswap_pulse(ctx: &ChainContext, gate: &Gate, builder: &mut PulseBuilder) -> QprocResult<()> {
    exchange(ctx, gate, builder, PI / 4.0)
}

fn sqrt_iswap_pulse(ctx: &ChainContext, gate: &Gate, builder: &mut PulseBuilder) -> QprocResult<()> {
    exchange(ctx, gate, builder, PI / 8.0)
}

fn registry() -> DecompositionRegistry<ChainContext> {
    DecompositionRegistry::new()
        .with(GateKind::Rx, rx_pulse as GateHandler<ChainContext>)
        .with(GateKind::Rz, rz_pulse)
        .with(GateKind::ISwap, iswap_pulse)
        .with(GateKind::SqrtISwap, sqrt_iswap_pulse)
}

// ============================================================================
// Device
// ============================================================================

/// Spin chain model processor
/// Gantree: SpinChain // 스핀 체인 장치
#[derive(Debug, Clone)]
pub struct SpinChain {
    layout: ChainLayout,
    raw: SpinChainParams,
    controls: Vec<ControlOperator>,
    decomposer: GateDecomposer<ChainContext>,
}

impl SpinChain {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Chain with default strengths
    pub fn new(num_qubits: usize, layout: ChainLayout) -> QprocResult<Self> {
        Self::with_params(num_qubits, layout, SpinChainParams::default())
    }

    /// Linear chain with default strengths
    pub fn linear(num_qubits: usize) -> QprocResult<Self> {
        Self::new(num_qubits, ChainLayout::Linear)
    }

    /// Circular chain with default strengths
    pub fn circular(num_qubits: usize) -> QprocResult<Self> {
        Self::new(num_qubits, ChainLayout::Circular)
    }

    /// Chain with explicit strengths
    /// Gantree: with_params(n,layout,params) -> Result<Self> // 생성
    pub fn with_params(
        num_qubits: usize,
        layout: ChainLayout,
        raw: SpinChainParams,
    ) -> QprocResult<Self> {
        if num_qubits == 0 || num_qubits > MAX_QUBITS {
            return Err(QprocError::InvalidConfig(format!(
                "spin chain needs 1..={} qubits, got {}",
                MAX_QUBITS, num_qubits
            )));
        }

        let couplings = layout.couplings(num_qubits);
        let params = raw.normalize(num_qubits, couplings.len())?;
        let controls = build_controls(num_qubits, &couplings)?;
        let context = ChainContext {
            num_qubits,
            couplings,
            params,
        };
        let decomposer = GateDecomposer::new(num_qubits, controls.len(), context, registry());

        debug!(
            "built {} spin chain with {} qubits and {} controls",
            layout,
            num_qubits,
            controls.len()
        );

        Ok(Self {
            layout,
            raw,
            controls,
            decomposer,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Layout
    pub fn layout(&self) -> ChainLayout {
        self.layout
    }

    /// Raw strengths as last configured
    pub fn raw_params(&self) -> &SpinChainParams {
        &self.raw
    }

    /// Coupled pairs
    pub fn couplings(&self) -> &[(QubitId, QubitId)] {
        &self.decomposer.params().couplings
    }

    /// Underlying decomposer
    pub fn decomposer(&self) -> &GateDecomposer<ChainContext> {
        &self.decomposer
    }
}

fn build_controls(
    num_qubits: usize,
    couplings: &[(QubitId, QubitId)],
) -> QprocResult<Vec<ControlOperator>> {
    let (x, y, z) = (sigma_x(), sigma_y(), sigma_z());
    let mut controls = Vec::with_capacity(2 * num_qubits + couplings.len());

    for q in 0..num_qubits {
        controls.push(ControlOperator::new(format!("sx{}", q), embed(&x, q, num_qubits)?, num_qubits)?);
    }
    for q in 0..num_qubits {
        controls.push(ControlOperator::new(format!("sz{}", q), embed(&z, q, num_qubits)?, num_qubits)?);
    }
    for (k, &(a, b)) in couplings.iter().enumerate() {
        let xx = embed_factors(&[(a, &x), (b, &x)], num_qubits)?;
        let yy = embed_factors(&[(a, &y), (b, &y)], num_qubits)?;
        controls.push(ControlOperator::new(format!("sxsy{}", k), xx + yy, num_qubits)?);
    }
    Ok(controls)
}

impl ConfigureParameters for SpinChain {
    type Raw = SpinChainParams;

    fn set_up_params(&mut self, raw: &SpinChainParams) -> QprocResult<()> {
        let n = self.num_qubits();
        let params = raw.normalize(n, self.couplings().len())?;
        let context = ChainContext {
            num_qubits: n,
            couplings: self.couplings().to_vec(),
            params,
        };
        self.decomposer = GateDecomposer::new(n, self.controls.len(), context, registry());
        self.raw = raw.clone();
        Ok(())
    }

    fn params(&self) -> &ParameterSet {
        self.decomposer.params().params()
    }
}

impl DeviceModel for SpinChain {
    fn name(&self) -> &str {
        match self.layout {
            ChainLayout::Linear => "linear_spin_chain",
            ChainLayout::Circular => "circular_spin_chain",
        }
    }

    fn num_qubits(&self) -> usize {
        self.decomposer.num_qubits()
    }

    fn controls(&self) -> &[ControlOperator] {
        &self.controls
    }

    /// X, Y, Z and H become rotations plus a π/2 global phase;
    /// RY is conjugated into RX by RZ(∓π/2).
    fn to_native_gates(&self, gates: &[Gate]) -> QprocResult<Vec<Gate>> {
        let mut native = Vec::with_capacity(gates.len());
        for gate in gates {
            gate.validate()?;
            match gate.kind() {
                GateKind::X => {
                    let q = gate.target()?;
                    native.extend([Gate::rx(q, PI), Gate::global_phase(FRAC_PI_2)]);
                }
                GateKind::Y => {
                    let q = gate.target()?;
                    native.extend(ry_as_rx(q, PI));
                    native.push(Gate::global_phase(FRAC_PI_2));
                }
                GateKind::Z => {
                    let q = gate.target()?;
                    native.extend([Gate::rz(q, PI), Gate::global_phase(FRAC_PI_2)]);
                }
                GateKind::H => {
                    let q = gate.target()?;
                    native.extend(ry_as_rx(q, FRAC_PI_2));
                    native.extend([Gate::rx(q, PI), Gate::global_phase(FRAC_PI_2)]);
                }
                GateKind::Ry => native.extend(ry_as_rx(gate.target()?, gate.require_arg()?)),
                _ => native.push(gate.clone()),
            }
        }
        Ok(native)
    }

    fn decompose(&self, gates: &[Gate]) -> QprocResult<PulseTimeline> {
        self.decomposer.decompose(gates)
    }

    fn supports(&self, kind: GateKind) -> bool {
        self.decomposer.supports(kind)
    }
}

/// RY(θ) = RZ(π/2) RX(θ) RZ(-π/2)
fn ry_as_rx(q: QubitId, theta: f64) -> [Gate; 3] {
    [Gate::rz(q, -FRAC_PI_2), Gate::rx(q, theta), Gate::rz(q, FRAC_PI_2)]
}

impl fmt::Display for SpinChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SpinChain({}, {} qubits, {} controls)",
            self.layout,
            self.num_qubits(),
            self.controls.len()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
