//! Processor configuration for QPROC
//!
//! Gantree: L5_Evolution → ProcessorConfig
//!
//! Register size, decoherence times, global-phase tracking, and the
//! raster step, loadable from JSON.

use qproc_core::constants::pulse::RASTER_STEP;
use qproc_core::error::{QprocError, QprocResult};
use qproc_core::ParamValue;
use qproc_noise::Decoherence;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Model processor configuration
/// Gantree: ProcessorConfig // 프로세서 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    // ========================================================================
    // Register
    // ========================================================================
    /// Number of qubits
    pub num_qubits: usize,

    // ========================================================================
    // Decoherence
    // ========================================================================
    /// Amplitude damping time, scalar or one per qubit
    pub t1: Option<ParamValue>,

    /// Dephasing time, scalar or one per qubit
    pub t2: Option<ParamValue>,

    // ========================================================================
    // Evolution
    // ========================================================================
    /// Track global phase in the analytical result
    pub correct_global_phase: bool,

    /// Step used by `pulse_raster`
    pub raster_step: f64,
}

impl ProcessorConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Noiseless configuration for `num_qubits` qubits
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            t1: None,
            t2: None,
            correct_global_phase: true,
            raster_step: RASTER_STEP,
        }
    }

    // ========================================================================
    // Builder
    // ========================================================================

    /// Set T1
    pub fn with_t1(mut self, t1: impl Into<ParamValue>) -> Self {
        self.t1 = Some(t1.into());
        self
    }

    /// Set T2
    pub fn with_t2(mut self, t2: impl Into<ParamValue>) -> Self {
        self.t2 = Some(t2.into());
        self
    }

    /// Enable or disable global-phase tracking
    pub fn with_global_phase_correction(mut self, enabled: bool) -> Self {
        self.correct_global_phase = enabled;
        self
    }

    /// Set the raster step
    pub fn with_raster_step(mut self, step: f64) -> Self {
        self.raster_step = step;
        self
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Validated decoherence description
    /// Gantree: decoherence() -> Result<Decoherence> // T1/T2 변환
    pub fn decoherence(&self) -> QprocResult<Decoherence> {
        Decoherence::from_params(self.num_qubits, self.t1.as_ref(), self.t2.as_ref())
    }

    /// Validate configuration
    pub fn validate(&self) -> QprocResult<()> {
        if self.num_qubits == 0 {
            return Err(QprocError::InvalidConfig(
                "num_qubits must be >= 1".to_string(),
            ));
        }
        if !self.raster_step.is_finite() || self.raster_step <= 0.0 {
            return Err(QprocError::InvalidConfig(format!(
                "raster_step must be positive, got {}",
                self.raster_step
            )));
        }
        self.decoherence()?;
        Ok(())
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> QprocResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate JSON
    pub fn from_json(json: &str) -> QprocResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Write to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> QprocResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read from a JSON file
    pub fn load(path: impl AsRef<Path>) -> QprocResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

impl fmt::Display for ProcessorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processor Configuration")?;
        writeln!(f, "  Qubits: {}", self.num_qubits)?;
        writeln!(f, "  T1: {:?}", self.t1)?;
        writeln!(f, "  T2: {:?}", self.t2)?;
        writeln!(f, "  Global phase correction: {}", self.correct_global_phase)?;
        write!(f, "  Raster step: {}", self.raster_step)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProcessorConfig::new(3);
        assert!(config.correct_global_phase);
        assert_eq!(config.raster_step, RASTER_STEP);
        assert!(config.validate().is_ok());
        assert!(config.decoherence().unwrap().is_ideal());
    }

    #[test]
    fn test_builder() {
        let config = ProcessorConfig::new(2)
            .with_t1(vec![100.0, 80.0])
            .with_t2(50.0)
            .with_global_phase_correction(false);
        assert!(config.validate().is_ok());
        assert!(!config.correct_global_phase);
        assert_eq!(config.decoherence().unwrap().t2(), Some(&[50.0, 50.0][..]));
    }

    #[test]
    fn test_invalid() {
        assert!(ProcessorConfig::new(0).validate().is_err());
        assert!(ProcessorConfig::new(1).with_raster_step(0.0).validate().is_err());

        let err = ProcessorConfig::new(1).with_t1(10.0).with_t2(30.0).validate().unwrap_err();
        assert!(matches!(err, QprocError::InvalidT2 { .. }));

        let err = ProcessorConfig::new(3).with_t1(vec![1.0, 2.0]).validate().unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ProcessorConfig::new(2).with_t1(100.0).with_t2(vec![60.0, 70.0]);
        let parsed = ProcessorConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_json_partial() {
        let config = ProcessorConfig::from_json(r#"{"num_qubits": 4, "t1": 50.0}"#).unwrap();
        assert_eq!(config.num_qubits, 4);
        assert_eq!(config.t1, Some(ParamValue::Scalar(50.0)));
        assert!(config.correct_global_phase);

        assert!(ProcessorConfig::from_json(r#"{"num_qubits": 0}"#).is_err());
        assert!(matches!(
            ProcessorConfig::from_json("not json"),
            Err(QprocError::JsonError(_))
        ));
    }

    #[test]
    fn test_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("qproc_config_{}.json", std::process::id()));
        let config = ProcessorConfig::new(2).with_t1(40.0);
        config.save(&path).unwrap();
        assert_eq!(ProcessorConfig::load(&path).unwrap(), config);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(ProcessorConfig::load(&path), Err(QprocError::FileError(_))));
    }
}
