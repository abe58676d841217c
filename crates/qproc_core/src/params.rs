//! Device parameters for QPROC
//!
//! Gantree: L0_Foundation → Parameters
//!
//! Raw device parameters arrive in frequency units, either as one value
//! shared by every qubit or as an explicit per-qubit list. They are stored
//! in a [`ParameterSet`] already multiplied by 2π.

use crate::constants::pulse::TWO_PI;
use crate::error::{QprocError, QprocResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Raw Parameter Value
// ============================================================================

/// A raw parameter: scalar broadcast or explicit list
/// Gantree: ParamValue // 스칼라 또는 목록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Same value for every entry
    Scalar(f64),
    /// One value per entry
    PerQubit(Vec<f64>),
}

impl ParamValue {
    /// Expand to exactly `n` values without scaling.
    ///
    /// Lists are returned as given; the caller checks their length.
    pub fn expand(&self, n: usize) -> Vec<f64> {
        match self {
            ParamValue::Scalar(v) => vec![*v; n],
            ParamValue::PerQubit(vs) => vs.clone(),
        }
    }

    /// Number of explicit entries (`None` for scalars)
    pub fn explicit_len(&self) -> Option<usize> {
        match self {
            ParamValue::Scalar(_) => None,
            ParamValue::PerQubit(vs) => Some(vs.len()),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Scalar(value)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(values: Vec<f64>) -> Self {
        ParamValue::PerQubit(values)
    }
}

impl From<&[f64]> for ParamValue {
    fn from(values: &[f64]) -> Self {
        ParamValue::PerQubit(values.to_vec())
    }
}

/// Convert a parameter to list form and multiply by 2π.
/// Gantree: to_angular(value,n) -> Vec<f64> // 2π 스케일
///
/// A scalar is broadcast to `n` entries; a list keeps its own order and length.
pub fn to_angular(value: &ParamValue, n: usize) -> Vec<f64> {
    value.expand(n).into_iter().map(|v| v * TWO_PI).collect()
}

// ============================================================================
// Parameter Set
// ============================================================================

/// Named device parameters, stored in angular units
/// Gantree: ParameterSet // 파라미터 집합
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    values: BTreeMap<String, Vec<f64>>,
}

impl ParameterSet {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `value` to `n` angular entries and store it under `name`
    pub fn insert_scaled(&mut self, name: impl Into<String>, value: &ParamValue, n: usize) {
        self.values.insert(name.into(), to_angular(value, n));
    }

    /// Store already-scaled values
    pub fn insert_raw(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.values.insert(name.into(), values);
    }

    /// Get all values of a parameter
    pub fn get(&self, name: &str) -> QprocResult<&[f64]> {
        self.values
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| QprocError::MissingParameter(name.to_string()))
    }

    /// Get the value of a parameter at a given index
    pub fn value_at(&self, name: &str, index: usize) -> QprocResult<f64> {
        let values = self.get(name)?;
        values
            .get(index)
            .copied()
            .ok_or_else(|| QprocError::QubitOutOfRange {
                qubit: index,
                max: values.len().saturating_sub(1),
            })
    }

    /// Check whether a parameter is present
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Parameter names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParameterSet(")?;
        for (i, (name, values)) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={:?}", name, values)?;
        }
        write!(f, ")")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scalar_broadcast() {
        let scaled = to_angular(&ParamValue::Scalar(0.25), 4);
        assert_eq!(scaled.len(), 4);
        for v in scaled {
            assert_relative_eq!(v, 0.25 * TWO_PI);
        }
    }

    #[test]
    fn test_scalar_zero_qubits() {
        assert!(to_angular(&ParamValue::Scalar(1.0), 0).is_empty());
    }

    #[test]
    fn test_list_elementwise() {
        let scaled = to_angular(&ParamValue::PerQubit(vec![1.0, 0.5, -2.0]), 3);
        assert_eq!(scaled.len(), 3);
        assert_relative_eq!(scaled[0], TWO_PI);
        assert_relative_eq!(scaled[1], 0.5 * TWO_PI);
        assert_relative_eq!(scaled[2], -2.0 * TWO_PI);
    }

    #[test]
    fn test_list_keeps_own_length() {
        let scaled = to_angular(&ParamValue::PerQubit(vec![1.0, 2.0]), 5);
        assert_eq!(scaled.len(), 2);
    }

    #[test]
    fn test_untagged_json() {
        let scalar: ParamValue = serde_json::from_str("0.5").unwrap();
        assert_eq!(scalar, ParamValue::Scalar(0.5));

        let list: ParamValue = serde_json::from_str("[0.1, 0.2]").unwrap();
        assert_eq!(list, ParamValue::PerQubit(vec![0.1, 0.2]));
    }

    #[test]
    fn test_parameter_set_lookup() {
        let mut params = ParameterSet::new();
        params.insert_scaled("sx", &0.25.into(), 3);

        assert!(params.contains("sx"));
        assert_eq!(params.get("sx").unwrap().len(), 3);
        assert_relative_eq!(params.value_at("sx", 2).unwrap(), 0.25 * TWO_PI);

        assert!(matches!(
            params.get("sz"),
            Err(QprocError::MissingParameter(_))
        ));
        assert!(matches!(
            params.value_at("sx", 3),
            Err(QprocError::QubitOutOfRange { qubit: 3, max: 2 })
        ));
    }
}
