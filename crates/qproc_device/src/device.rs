//! Device model traits for QPROC
//!
//! Gantree: L4_Device → DeviceModel
//!
//! A device fixes its control Hamiltonians and decomposition scheme at
//! construction. The processor only talks to it through these traits.

use crate::operators::ControlOperator;
use qproc_core::error::QprocResult;
use qproc_core::{Gate, GateKind, ParameterSet};
use qproc_pulse::PulseTimeline;

/// Physical parameter setup for a device
/// Gantree: ConfigureParameters // 파라미터 설정
pub trait ConfigureParameters {
    /// Parameters as supplied by the user, before normalization
    type Raw;

    /// Normalize (×2π), validate, and store the parameters.
    /// On error the previous parameters stay in place.
    fn set_up_params(&mut self, raw: &Self::Raw) -> QprocResult<()>;

    /// Normalized parameters
    fn params(&self) -> &ParameterSet;
}

/// A physical device that turns gates into control pulses
/// Gantree: DeviceModel // 장치 모델
pub trait DeviceModel: ConfigureParameters {
    /// Device name
    fn name(&self) -> &str;

    /// Number of qubits
    fn num_qubits(&self) -> usize;

    /// Control Hamiltonians, one per timeline row
    fn controls(&self) -> &[ControlOperator];

    /// Number of controls
    fn num_controls(&self) -> usize {
        self.controls().len()
    }

    /// Control labels in row order
    fn control_labels(&self) -> Vec<String> {
        self.controls()
            .iter()
            .map(|c| c.label().to_string())
            .collect()
    }

    /// Rewrite gates into the kinds this device decomposes directly.
    /// Global-phase gates may be emitted; the processor strips them.
    fn to_native_gates(&self, gates: &[Gate]) -> QprocResult<Vec<Gate>>;

    /// Decompose native gates into a pulse timeline
    fn decompose(&self, gates: &[Gate]) -> QprocResult<PulseTimeline>;

    /// Check if a gate kind decomposes directly
    fn supports(&self, kind: GateKind) -> bool;
}
