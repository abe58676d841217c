//! Pulse rasterization for QPROC
//!
//! Gantree: L3_Pulse → PulseRaster
//!
//! Samples a timeline on a fixed step for display. Each segment covers
//! `floor(duration / step)` samples; the remainder of a segment is dropped
//! rather than carried into the next one, so short or oddly sized segments
//! may be under-represented.

use crate::timeline::PulseTimeline;
use ndarray::{s, Array1, Array2, ArrayView1};
use qproc_core::error::{QprocError, QprocResult};
use serde::{Deserialize, Serialize};

/// Fixed-step samples of a pulse timeline
/// Gantree: PulseRaster // 고정 간격 샘플
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseRaster {
    /// Sample times, evenly spaced over the total duration
    times: Array1<f64>,

    /// Shape (num_controls, times.len())
    amplitudes: Array2<f64>,

    /// One label per control
    labels: Vec<String>,

    /// Raster step
    step: f64,

    /// Samples actually written
    filled: usize,
}

/// Rasterize a timeline with the given step
/// Gantree: rasterize(timeline,labels,step) -> Result<PulseRaster> // 래스터화
pub fn rasterize(
    timeline: &PulseTimeline,
    labels: &[String],
    step: f64,
) -> QprocResult<PulseRaster> {
    if !step.is_finite() || step <= 0.0 {
        return Err(QprocError::InvalidPulse(format!(
            "raster step must be positive, got {}",
            step
        )));
    }
    if labels.len() != timeline.num_controls() {
        return Err(QprocError::ShapeMismatch {
            expected: format!("{} labels", timeline.num_controls()),
            actual: format!("{} labels", labels.len()),
        });
    }

    let durations = timeline.durations();
    let t_tot: f64 = durations.iter().sum();
    let n_t = (t_tot / step).ceil() as usize;

    let times = Array1::linspace(0.0, t_tot, n_t);
    let mut amplitudes = Array2::zeros((timeline.num_controls(), n_t));

    let mut start = 0;
    for (k, dt) in durations.iter().enumerate() {
        let len = (dt / step).floor() as usize;
        let end = (start + len).min(n_t);
        if end > start {
            if let Some(column) = timeline.segment_coeffs(k) {
                for (m, &c) in column.iter().enumerate() {
                    amplitudes.slice_mut(s![m, start..end]).fill(c);
                }
            }
        }
        start = end;
    }

    Ok(PulseRaster {
        times,
        amplitudes,
        labels: labels.to_vec(),
        step,
        filled: start,
    })
}

impl PulseRaster {
    /// Sample times
    pub fn times(&self) -> &Array1<f64> {
        &self.times
    }

    /// Sampled amplitudes, one row per control
    pub fn amplitudes(&self) -> &Array2<f64> {
        &self.amplitudes
    }

    /// Control labels
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Raster step
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Check if there are no samples
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Number of samples covered by segments; the rest stay at zero
    pub fn filled_len(&self) -> usize {
        self.filled
    }

    /// Samples of the control with the given label
    pub fn control(&self, label: &str) -> Option<ArrayView1<'_, f64>> {
        let idx = self.labels.iter().position(|l| l == label)?;
        Some(self.amplitudes.row(idx))
    }

    /// (label, samples) pairs for plotting collaborators
    pub fn series(&self) -> impl Iterator<Item = (&str, ArrayView1<'_, f64>)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.amplitudes.rows())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use qproc_core::pulse::RASTER_STEP;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("u{}", i)).collect()
    }

    #[test]
    fn test_single_segment() {
        let timeline =
            PulseTimeline::new(array![0.0, 1.0], array![[5.0]], Default::default()).unwrap();
        let raster = rasterize(&timeline, &labels(1), RASTER_STEP).unwrap();

        assert_eq!(raster.len(), 100);
        assert_eq!(raster.filled_len(), 100);
        assert!(raster.amplitudes().iter().all(|&a| a == 5.0));
        assert_eq!(raster.times()[0], 0.0);
        assert_relative_eq!(raster.times()[99], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_two_controls_two_segments() {
        let timeline = PulseTimeline::new(
            array![0.0, 0.5, 1.0],
            array![[1.0, 0.0], [0.0, -2.0]],
            Default::default(),
        )
        .unwrap();
        let raster = rasterize(&timeline, &labels(2), 0.1).unwrap();

        let u0 = raster.control("u0").unwrap();
        let u1 = raster.control("u1").unwrap();
        assert_eq!(u0[0], 1.0);
        assert_eq!(u1[0], 0.0);
        assert_eq!(u0[raster.filled_len() - 1], 0.0);
        assert_eq!(u1[raster.filled_len() - 1], -2.0);
    }

    #[test]
    fn test_remainder_truncated() {
        // 0.015 / 0.01 floors to one sample; the half step is lost
        let timeline =
            PulseTimeline::new(array![0.0, 0.015], array![[1.0]], Default::default()).unwrap();
        let raster = rasterize(&timeline, &labels(1), 0.01).unwrap();

        assert_eq!(raster.len(), 2);
        assert_eq!(raster.filled_len(), 1);
        assert_eq!(raster.amplitudes().row(0).to_vec(), vec![1.0, 0.0]);
        assert!(raster.filled_len() as f64 * raster.step() <= 0.015);
    }

    #[test]
    fn test_empty_timeline() {
        let raster = rasterize(&PulseTimeline::empty(2), &labels(2), RASTER_STEP).unwrap();
        assert!(raster.is_empty());
        assert_eq!(raster.amplitudes().dim(), (2, 0));
    }

    #[test]
    fn test_invalid_inputs() {
        let timeline = PulseTimeline::empty(2);
        assert!(rasterize(&timeline, &labels(2), 0.0).is_err());
        assert!(rasterize(&timeline, &labels(1), RASTER_STEP).is_err());
    }

    #[test]
    fn test_series() {
        let timeline =
            PulseTimeline::new(array![0.0, 0.02], array![[1.0], [2.0]], Default::default())
                .unwrap();
        let raster = rasterize(&timeline, &labels(2), 0.01).unwrap();
        let series: Vec<(&str, Vec<f64>)> =
            raster.series().map(|(l, v)| (l, v.to_vec())).collect();
        assert_eq!(series[0].0, "u0");
        assert_eq!(series[1].1, vec![2.0, 2.0]);
    }
}
