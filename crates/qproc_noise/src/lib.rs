//! # QPROC Noise
//!
//! Per-qubit decoherence description for model processors.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qproc_noise // L2: Decoherence
//!     Decoherence // per-qubit T1/T2
//!         ideal(), uniform(), from_params()
//!         validate() // lengths, positivity, T2 <= 2*T1
//!         relaxation_rate(), dephasing_rate()
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qproc_noise::prelude::*;
//!
//! let decoherence = Decoherence::uniform(3, 100.0, 60.0).unwrap();
//! assert!(!decoherence.is_ideal());
//! println!("γ1 = {:.4}", decoherence.relaxation_rate(0).unwrap());
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Per-qubit T1/T2 (Gantree: L2_Noise → Decoherence)
pub mod decoherence;

// ============================================================================
// Re-exports
// ============================================================================

pub use decoherence::Decoherence;

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qproc_noise::prelude::*;
    //! ```

    pub use crate::decoherence::Decoherence;
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use qproc_core::ParamValue;

    #[test]
    fn test_heterogeneous_device() {
        let t1 = ParamValue::PerQubit(vec![80.0, 150.0, 40.0]);
        let t2 = ParamValue::PerQubit(vec![50.0, 100.0, 25.0]);
        let d = Decoherence::from_params(3, Some(&t1), Some(&t2)).unwrap();

        // Longer T1 means slower relaxation
        assert!(d.relaxation_rate(1).unwrap() < d.relaxation_rate(0).unwrap());
        assert!(d.relaxation_rate(2).unwrap() > d.relaxation_rate(0).unwrap());
    }

    #[test]
    fn test_json_roundtrip() {
        let d = Decoherence::uniform(2, 100.0, 60.0).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        let parsed: Decoherence = serde_json::from_str(&json).unwrap();
        assert_eq!(d, parsed);
    }

    #[test]
    fn test_infinite_times_are_noiseless_channels() {
        let d = Decoherence::uniform(1, f64::INFINITY, f64::INFINITY).unwrap();
        assert_eq!(d.relaxation_rate(0), None);
        assert_eq!(d.dephasing_rate(0), None);
    }
}
