//! Pulse timeline for QPROC
//!
//! Gantree: L3_Pulse → PulseTimeline
//!
//! Time breakpoints (`tlist`) paired with a coefficient matrix whose rows
//! are control operators. How many columns the matrix needs depends on the
//! interpolation mode.

use ndarray::{Array1, Array2, ArrayView1};
use qproc_core::error::{QprocError, QprocResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coefficient interpolation mode
/// Gantree: SplineKind // 보간 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SplineKind {
    /// Piecewise constant: column k holds on [t_k, t_{k+1}).
    /// Accepts `len(tlist) - 1` or `len(tlist)` columns.
    #[default]
    StepFunc,
    /// Cubic spline through one sample per breakpoint.
    /// Requires `len(tlist)` columns.
    Cubic,
}

impl SplineKind {
    /// Check whether `columns` is acceptable for `breakpoints` time points
    pub fn accepts(&self, breakpoints: usize, columns: usize) -> bool {
        match self {
            SplineKind::StepFunc => {
                columns == breakpoints || columns + 1 == breakpoints
            }
            SplineKind::Cubic => columns == breakpoints,
        }
    }
}

impl fmt::Display for SplineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplineKind::StepFunc => write!(f, "step_func"),
            SplineKind::Cubic => write!(f, "cubic"),
        }
    }
}

/// Control pulse schedule
/// Gantree: PulseTimeline // 펄스 타임라인
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseTimeline {
    /// Breakpoints, non-decreasing
    tlist: Array1<f64>,

    /// Shape (num_controls, columns)
    coeffs: Array2<f64>,

    /// Interpolation mode
    spline_kind: SplineKind,
}

impl PulseTimeline {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a timeline with validation
    /// Gantree: new(tlist,coeffs,kind) -> Result<Self> // 생성+검증
    pub fn new(
        tlist: Array1<f64>,
        coeffs: Array2<f64>,
        spline_kind: SplineKind,
    ) -> QprocResult<Self> {
        let timeline = Self {
            tlist,
            coeffs,
            spline_kind,
        };
        timeline.validate()?;
        Ok(timeline)
    }

    /// Timeline with a single breakpoint at 0 and no segments
    pub fn empty(num_controls: usize) -> Self {
        Self {
            tlist: Array1::zeros(1),
            coeffs: Array2::zeros((num_controls, 0)),
            spline_kind: SplineKind::StepFunc,
        }
    }

    /// Build a step-function timeline from segment durations and columns.
    ///
    /// `columns[k]` holds one coefficient per control for segment `k`.
    pub(crate) fn from_segments(
        num_controls: usize,
        durations: &[f64],
        columns: &[Vec<f64>],
    ) -> Self {
        let mut t = 0.0;
        let tlist: Array1<f64> = std::iter::once(0.0)
            .chain(durations.iter().map(|dt| {
                t += dt;
                t
            }))
            .collect();
        let coeffs = Array2::from_shape_fn((num_controls, columns.len()), |(m, k)| columns[k][m]);

        Self {
            tlist,
            coeffs,
            spline_kind: SplineKind::StepFunc,
        }
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check breakpoints and coefficient shape
    pub fn validate(&self) -> QprocResult<()> {
        if self.tlist.is_empty() {
            return Err(QprocError::InvalidPulse("tlist is empty".to_string()));
        }
        if self.tlist.iter().any(|t| !t.is_finite()) {
            return Err(QprocError::InvalidPulse(
                "tlist contains non-finite values".to_string(),
            ));
        }
        if self.tlist.iter().zip(self.tlist.iter().skip(1)).any(|(a, b)| b < a) {
            return Err(QprocError::InvalidPulse(
                "tlist must be non-decreasing".to_string(),
            ));
        }
        if self.coeffs.iter().any(|c| !c.is_finite()) {
            return Err(QprocError::InvalidPulse(
                "coeffs contain non-finite values".to_string(),
            ));
        }

        let breakpoints = self.tlist.len();
        let columns = self.coeffs.ncols();
        if !self.spline_kind.accepts(breakpoints, columns) {
            let expected = match self.spline_kind {
                SplineKind::StepFunc => format!("{} or {} columns", breakpoints - 1, breakpoints),
                SplineKind::Cubic => format!("{} columns", breakpoints),
            };
            return Err(QprocError::ShapeMismatch {
                expected: format!("{} ({})", expected, self.spline_kind),
                actual: format!("{} columns", columns),
            });
        }

        Ok(())
    }

    /// Check that the row count matches a control count
    pub fn check_controls(&self, num_controls: usize) -> QprocResult<()> {
        if self.num_controls() != num_controls {
            return Err(QprocError::ShapeMismatch {
                expected: format!("{} coefficient rows", num_controls),
                actual: format!("{} coefficient rows", self.num_controls()),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Breakpoints
    pub fn tlist(&self) -> &Array1<f64> {
        &self.tlist
    }

    /// Coefficient matrix, one row per control
    pub fn coeffs(&self) -> &Array2<f64> {
        &self.coeffs
    }

    /// Interpolation mode
    pub fn spline_kind(&self) -> SplineKind {
        self.spline_kind
    }

    /// Number of control rows
    pub fn num_controls(&self) -> usize {
        self.coeffs.nrows()
    }

    /// Number of time segments between breakpoints
    pub fn num_segments(&self) -> usize {
        self.tlist.len().saturating_sub(1)
    }

    /// Check whether the timeline has no segments
    pub fn is_empty(&self) -> bool {
        self.num_segments() == 0
    }

    /// Segment durations
    pub fn durations(&self) -> Vec<f64> {
        self.tlist
            .iter()
            .zip(self.tlist.iter().skip(1))
            .map(|(a, b)| b - a)
            .collect()
    }

    /// Sum of segment durations
    pub fn total_duration(&self) -> f64 {
        self.durations().iter().sum()
    }

    /// Coefficients of every control on segment `k`
    pub fn segment_coeffs(&self, k: usize) -> Option<ArrayView1<'_, f64>> {
        (k < self.coeffs.ncols()).then(|| self.coeffs.column(k))
    }

    /// Transposed coefficients, one row per segment
    pub fn coeffs_by_segment(&self) -> Array2<f64> {
        self.coeffs.t().to_owned()
    }

    /// Split into breakpoints and coefficients
    pub fn into_parts(self) -> (Array1<f64>, Array2<f64>) {
        (self.tlist, self.coeffs)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> QprocResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load from JSON with validation
    pub fn from_json(json: &str) -> QprocResult<Self> {
        let timeline: Self = serde_json::from_str(json)?;
        timeline.validate()?;
        Ok(timeline)
    }
}

impl fmt::Display for PulseTimeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PulseTimeline({} controls, {} segments, duration={:.4}, {})",
            self.num_controls(),
            self.num_segments(),
            self.total_duration(),
            self.spline_kind
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
