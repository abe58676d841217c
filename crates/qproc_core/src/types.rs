//! Core types for QPROC
//!
//! Gantree: L0_Foundation → CoreTypes

/// Qubit identifier (0-indexed)
/// Gantree: QubitId // pub type QubitId = usize
pub type QubitId = usize;

/// Rotation angle in radians
/// Gantree: Angle // pub type Angle = f64
pub type Angle = f64;

/// Index of a control operator within a device
pub type ControlId = usize;

/// Hilbert-space dimension of an `n`-qubit register
#[inline]
pub fn register_dim(num_qubits: usize) -> usize {
    1usize << num_qubits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_dim() {
        assert_eq!(register_dim(0), 1);
        assert_eq!(register_dim(1), 2);
        assert_eq!(register_dim(3), 8);
    }
}
