//! # QPROC Device
//!
//! Model processors: control Hamiltonians of a physical device, circuit
//! compilation into pulses, and evolution of the result.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qproc_device // L4+L5: Device + Evolution
//!     L4_Device
//!         Operators // Pauli matrices, embedding, ControlOperator
//!         DeviceModel // ConfigureParameters + DeviceModel traits
//!         SpinChain // σx/σz drives, σxσx+σyσy exchange
//!     L5_Evolution
//!         Expm // exp(-iHt)
//!         QuantumState // ket or density matrix
//!         Solver // EvolutionSolver seam, AnalyticalEvolution
//!         ProcessorConfig // register, T1/T2, phase tracking
//!         Processor // load_circuit -> run_state
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qproc_core::prelude::*;
//! use qproc_device::prelude::*;
//!
//! let chain = SpinChain::linear(2).unwrap();
//! let mut processor = Processor::ideal(chain).unwrap();
//!
//! let circuit = CircuitBuilder::new(2).x(0).iswap(0, 1).build();
//! let evolution = processor
//!     .run_analytical(&QuantumState::ground(2), Some(&circuit))
//!     .unwrap();
//!
//! // |00⟩ -X-> |10⟩ -iSWAP-> i|01⟩
//! let p = evolution.final_state().probabilities();
//! assert!((p[1] - 1.0).abs() < 1e-8);
//! ```
//!
//! ## External Solvers
//!
//! ```rust
//! use qproc_core::prelude::*;
//! use qproc_device::prelude::*;
//!
//! struct CountSegments;
//!
//! impl EvolutionSolver for CountSegments {
//!     type Output = usize;
//!
//!     fn solve(&self, problem: &EvolutionProblem<'_>) -> QprocResult<usize> {
//!         Ok(problem.timeline.num_segments())
//!     }
//! }
//!
//! let mut processor = Processor::ideal(SpinChain::linear(1).unwrap()).unwrap();
//! let circuit = CircuitBuilder::new(1).h(0).build();
//! let segments = processor
//!     .run_numerical(&CountSegments, &QuantumState::ground(1), Some(&circuit))
//!     .unwrap();
//! assert_eq!(segments, 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Register operators (Gantree: L4_Device → Operators)
pub mod operators;

/// Device traits (Gantree: L4_Device → DeviceModel)
pub mod device;

/// Spin chain (Gantree: L4_Device → SpinChain)
pub mod spinchain;

/// Matrix exponential (Gantree: L5_Evolution → Expm)
pub mod expm;

/// Quantum states (Gantree: L5_Evolution → QuantumState)
pub mod state;

/// Evolution dispatch (Gantree: L5_Evolution → Solver)
pub mod solver;

/// Configuration (Gantree: L5_Evolution → ProcessorConfig)
pub mod config;

/// Processor (Gantree: L5_Evolution → Processor)
pub mod processor;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::ProcessorConfig;
pub use device::{ConfigureParameters, DeviceModel};
pub use operators::{ControlOperator, Operator};
pub use processor::Processor;
pub use solver::{
    AnalyticalEvolution, EvolutionMode, EvolutionProblem, EvolutionResult, EvolutionSolver,
};
pub use spinchain::{ChainLayout, SpinChain, SpinChainParams};
pub use state::QuantumState;

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qproc_device::prelude::*;
    //! ```

    pub use crate::config::ProcessorConfig;
    pub use crate::device::{ConfigureParameters, DeviceModel};
    pub use crate::operators::{ControlOperator, Operator};
    pub use crate::processor::Processor;
    pub use crate::solver::{
        AnalyticalEvolution, EvolutionMode, EvolutionProblem, EvolutionResult, EvolutionSolver,
    };
    pub use crate::spinchain::{ChainLayout, SpinChain, SpinChainParams};
    pub use crate::state::QuantumState;
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::operators::{distance_up_to_phase, Operator};
    use super::prelude::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;
    use qproc_core::prelude::*;
    use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, PI};

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn max_diff(a: &Operator, b: &Operator) -> f64 {
        (a - b).iter().map(|z| z.norm()).fold(0.0, f64::max)
    }

    fn unitary_of(circuit: &Circuit) -> Operator {
        let n = circuit.num_qubits();
        let mut processor = Processor::ideal(SpinChain::linear(n).unwrap()).unwrap();
        processor
            .run_analytical(&QuantumState::ground(n), Some(circuit))
            .unwrap()
            .total_unitary()
            .clone()
    }

    #[test]
    fn test_hadamard_with_global_phase() {
        let u = unitary_of(&CircuitBuilder::new(1).h(0).build());
        let s = FRAC_1_SQRT_2;
        let hadamard = ndarray::array![[c(s, 0.0), c(s, 0.0)], [c(s, 0.0), c(-s, 0.0)]];
        assert!(max_diff(&u, &hadamard) < 1e-8);
    }

    #[test]
    fn test_y_and_z_exact() {
        let y = unitary_of(&CircuitBuilder::new(1).y(0).build());
        let pauli_y = ndarray::array![[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(0.0, 0.0)]];
        assert!(max_diff(&y, &pauli_y) < 1e-8);

        let z = unitary_of(&CircuitBuilder::new(1).z(0).build());
        let pauli_z = ndarray::array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(-1.0, 0.0)]];
        assert!(max_diff(&z, &pauli_z) < 1e-8);
    }

    #[test]
    fn test_ry_resolution() {
        let theta = 0.7;
        let u = unitary_of(&CircuitBuilder::new(1).ry(0, theta).build());
        let (cos, sin) = ((theta / 2.0).cos(), (theta / 2.0).sin());
        let ry = ndarray::array![[c(cos, 0.0), c(-sin, 0.0)], [c(sin, 0.0), c(cos, 0.0)]];
        assert!(distance_up_to_phase(&u, &ry) < 1e-8);
    }

    #[test]
    fn test_iswap_unitary() {
        let u = unitary_of(&CircuitBuilder::new(2).iswap(0, 1).build());
        let mut expected = Operator::zeros((4, 4));
        expected[[0, 0]] = c(1.0, 0.0);
        expected[[1, 2]] = c(0.0, 1.0);
        expected[[2, 1]] = c(0.0, 1.0);
        expected[[3, 3]] = c(1.0, 0.0);
        assert!(max_diff(&u, &expected) < 1e-8);
    }

    #[test]
    fn test_sqrt_iswap_twice_is_iswap() {
        let twice = unitary_of(&CircuitBuilder::new(2).sqrt_iswap(0, 1).sqrt_iswap(0, 1).build());
        let once = unitary_of(&CircuitBuilder::new(2).iswap(0, 1).build());
        assert!(max_diff(&twice, &once) < 1e-8);
    }

    #[test]
    fn test_three_qubit_transfer() {
        // Excitation hops 0 -> 1 -> 2 along the chain
        let circuit = CircuitBuilder::new(3).x(0).iswap(0, 1).iswap(1, 2).build();
        let mut processor = Processor::ideal(SpinChain::linear(3).unwrap()).unwrap();
        let evolution = processor
            .run_analytical(&QuantumState::ground(3), Some(&circuit))
            .unwrap();
        assert_relative_eq!(evolution.final_state().probabilities()[1], 1.0, epsilon = 1e-8);
        assert_relative_eq!(processor.global_phase(), FRAC_PI_2);
    }

    #[test]
    fn test_density_matrix_evolution() {
        let mut processor = Processor::ideal(SpinChain::linear(1).unwrap()).unwrap();
        let rho = QuantumState::Density(QuantumState::ground(1).to_density());
        let circuit = CircuitBuilder::new(1).rx(0, PI).build();
        let evolution = processor.run_analytical(&rho, Some(&circuit)).unwrap();
        assert!(evolution.final_state().is_density());
        assert_relative_eq!(evolution.final_state().probabilities()[1], 1.0, epsilon = 1e-8);
    }

    #[test]
    fn test_config_from_json_builds_processor() {
        let config = ProcessorConfig::from_json(
            r#"{"num_qubits": 2, "t1": [100.0, 90.0], "t2": 60.0, "correct_global_phase": false}"#,
        )
        .unwrap();
        let params: SpinChainParams =
            serde_json::from_str(r#"{"sx": [0.2, 0.3], "sxsy": 0.05}"#).unwrap();
        let chain = SpinChain::with_params(2, ChainLayout::Linear, params).unwrap();
        let processor = Processor::new(chain, config).unwrap();

        assert!(!processor.decoherence().is_ideal());
        assert_relative_eq!(
            processor.device().params().value_at("sz", 0).unwrap(),
            qproc_core::spinchain::DEFAULT_SZ * pulse::TWO_PI
        );
    }
}
