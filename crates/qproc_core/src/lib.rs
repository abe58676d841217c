//! # QPROC Core
//!
//! Core types, parameters, gates, and circuits for the QPROC model
//! processor toolkit.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qproc_core // L0+L1: Foundation + Circuit
//!     L0_Foundation
//!         CoreTypes // QubitId, Angle, ControlId
//!         Constants // pulse + spin chain defaults
//!         Errors // QprocError, QprocResult
//!         Parameters // ParamValue, ParameterSet, to_angular
//!     L1_Circuit
//!         Gate // GateKind + Gate instruction
//!         Circuit // ordered gate list
//!         CircuitBuilder // fluent builder
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qproc_core::prelude::*;
//!
//! let circuit = CircuitBuilder::new(3)
//!     .h(0)
//!     .rx(1, 0.5)
//!     .iswap(1, 2)
//!     .build();
//!
//! assert_eq!(circuit.gate_count(), 3);
//! println!("{}", circuit);
//! ```
//!
//! ## Parameter Normalization
//!
//! ```rust
//! use qproc_core::prelude::*;
//!
//! // Scalars broadcast to every qubit, already multiplied by 2π
//! let sx = to_angular(&ParamValue::Scalar(0.25), 3);
//! assert_eq!(sx.len(), 3);
//! assert!((sx[0] - 0.25 * std::f64::consts::TAU).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Device parameters (Gantree: L0_Foundation → Parameters)
pub mod params;

/// Gate instructions (Gantree: L1_Circuit → Gate)
pub mod gate;

/// Circuit structure (Gantree: L1_Circuit → Circuit)
pub mod circuit;

/// Circuit builder (Gantree: L1_Circuit → CircuitBuilder)
pub mod builder;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::CircuitBuilder;
pub use circuit::Circuit;
pub use constants::{pulse, spinchain};
pub use error::{QprocError, QprocResult};
pub use gate::{Gate, GateKind};
pub use params::{to_angular, ParamValue, ParameterSet};
pub use types::{register_dim, Angle, ControlId, QubitId};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qproc_core::prelude::*;
    //! ```

    pub use crate::builder::CircuitBuilder;
    pub use crate::circuit::Circuit;
    pub use crate::constants::{pulse, spinchain};
    pub use crate::error::{QprocError, QprocResult};
    pub use crate::gate::{Gate, GateKind};
    pub use crate::params::{to_angular, ParamValue, ParameterSet};
    pub use crate::types::{register_dim, Angle, ControlId, QubitId};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================
