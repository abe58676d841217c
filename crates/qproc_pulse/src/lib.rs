//! # QPROC Pulse
//!
//! Gate decomposition into piecewise-constant control pulses.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qproc_pulse // L3: Pulse
//!     PulseTimeline // tlist + coeffs + spline kind
//!     GateDecomposer // gates -> timeline
//!         PulseBuilder // per-call segment accumulator
//!         DecompositionRegistry // GateKind -> handler
//!     PulseRaster // fixed-step samples for display
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qproc_core::prelude::*;
//! use qproc_pulse::prelude::*;
//!
//! fn x_pulse(_: &(), _: &Gate, builder: &mut PulseBuilder) -> QprocResult<()> {
//!     builder.drive(1.0, &[(0, 3.0)])
//! }
//!
//! let registry = DecompositionRegistry::<()>::new().with(GateKind::X, x_pulse);
//! let decomposer = GateDecomposer::new(1, 2, (), registry);
//!
//! let timeline = decomposer.decompose(&[Gate::x(0), Gate::x(0)]).unwrap();
//! assert_eq!(timeline.tlist().to_vec(), vec![0.0, 1.0, 2.0]);
//!
//! let labels = vec!["sx0".to_string(), "sz0".to_string()];
//! let raster = rasterize(&timeline, &labels, pulse::RASTER_STEP).unwrap();
//! assert_eq!(raster.len(), 200);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Pulse timeline (Gantree: L3_Pulse → PulseTimeline)
pub mod timeline;

/// Gate decomposition (Gantree: L3_Pulse → GateDecomposer)
pub mod decomposer;

/// Rasterization (Gantree: L3_Pulse → PulseRaster)
pub mod raster;

// ============================================================================
// Re-exports
// ============================================================================

pub use decomposer::{DecompositionRegistry, GateDecomposer, GateHandler, PulseBuilder};
pub use raster::{rasterize, PulseRaster};
pub use timeline::{PulseTimeline, SplineKind};

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qproc_pulse::prelude::*;
    //! ```

    pub use crate::decomposer::{DecompositionRegistry, GateDecomposer, GateHandler, PulseBuilder};
    pub use crate::raster::{rasterize, PulseRaster};
    pub use crate::timeline::{PulseTimeline, SplineKind};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Integration Tests
// ============================================================================
