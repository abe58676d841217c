//! Constants for QPROC
//!
//! Gantree: L0_Foundation → Constants
//!
//! Unit conversions, pulse defaults, and spin-chain device defaults.

// ============================================================================
// Pulse Constants
// Gantree: pulse // 펄스 상수
// ============================================================================

pub mod pulse {
    //! Pulse timeline and rasterization constants

    /// Factor converting frequency units to angular units
    pub const TWO_PI: f64 = 2.0 * std::f64::consts::PI;

    /// Raster step used when sampling a timeline for display
    /// Gantree: RASTER_STEP: f64 = 0.01
    pub const RASTER_STEP: f64 = 0.01;
}

// ============================================================================
// Spin Chain Defaults
// Gantree: spinchain // 스핀 체인 기본값
// ============================================================================

pub mod spinchain {
    //! Default drive strengths for spin-chain devices (frequency units, before 2π)

    /// Default σx drive strength
    pub const DEFAULT_SX: f64 = 0.25;

    /// Default σz drive strength
    pub const DEFAULT_SZ: f64 = 1.0;

    /// Default σxσx + σyσy coupling strength
    pub const DEFAULT_SXSY: f64 = 0.1;

    /// Largest chain built with dense operators
    pub const MAX_QUBITS: usize = 8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_pi() {
        assert!((pulse::TWO_PI - std::f64::consts::TAU).abs() < 1e-15);
    }

    #[test]
    fn test_raster_step() {
        assert_eq!(pulse::RASTER_STEP, 0.01);
    }
}
