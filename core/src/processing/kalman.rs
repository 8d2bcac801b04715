use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::prelude::PhaseStage;

/// Loop-carried state of the scalar filter for one frequency bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KalmanState {
    pub estimate: f64,
    pub covariance: f64,
}

impl KalmanState {
    pub fn seed(observation: f64) -> Self {
        Self {
            estimate: observation,
            covariance: 1.0,
        }
    }

    /// Constant-state predict followed by a measurement update.
    pub fn step(self, observation: f64, process_variance: f64, measurement_variance: f64) -> Self {
        let predicted_covariance = self.covariance + process_variance;
        let gain = predicted_covariance / (predicted_covariance + measurement_variance);
        Self {
            estimate: self.estimate + gain * (observation - self.estimate),
            covariance: (1.0 - gain) * predicted_covariance,
        }
    }
}

/// Smooths each frequency bin over time with an independent scalar Kalman filter.
#[derive(Debug, Clone, Copy)]
pub struct KalmanSmoother {
    process_variance: f64,
    measurement_variance: f64,
}

impl KalmanSmoother {
    pub fn new(process_variance: f64, measurement_variance: f64) -> Self {
        Self {
            process_variance,
            measurement_variance,
        }
    }

    /// Filtered estimates for one time series; the first estimate is the first observation.
    pub fn smooth_series(&self, series: ArrayView1<f64>) -> Vec<f64> {
        let mut observations = series.iter().copied();
        let Some(first) = observations.next() else {
            return Vec::new();
        };
        let mut estimates = Vec::with_capacity(series.len());
        estimates.push(first);
        estimates.extend(observations.scan(KalmanState::seed(first), |state, observation| {
            *state = state.step(observation, self.process_variance, self.measurement_variance);
            Some(state.estimate)
        }));
        estimates
    }
}

impl Default for KalmanSmoother {
    fn default() -> Self {
        Self::new(1e-5, 1e-2)
    }
}

impl PhaseStage for KalmanSmoother {
    fn name(&self) -> &'static str {
        "kalman"
    }

    fn apply(&self, phase: ArrayView2<f64>) -> Array2<f64> {
        let mut smoothed = Array2::zeros(phase.raw_dim());
        for (column, mut out) in phase
            .axis_iter(Axis(1))
            .zip(smoothed.axis_iter_mut(Axis(1)))
        {
            for (slot, value) in out.iter_mut().zip(self.smooth_series(column)) {
                *slot = value;
            }
        }
        smoothed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn constant_series_is_undistorted() {
        let input = Array2::from_elem((50, 4), 1.234);
        let output = KalmanSmoother::default().apply(input.view());
        assert_eq!(output, input);
    }

    #[test]
    fn single_time_sample_passes_through() {
        let input = array![[0.5, -1.0, 2.0]];
        assert_eq!(KalmanSmoother::default().apply(input.view()), input);
    }

    #[test]
    fn first_update_matches_hand_computation() {
        let smoother = KalmanSmoother::default();
        let estimates = smoother.smooth_series(array![0.0, 1.0].view());
        let predicted = 1.0 + 1e-5;
        let gain = predicted / (predicted + 1e-2);
        assert_eq!(estimates[0], 0.0);
        assert!((estimates[1] - gain).abs() < 1e-15);
    }

    #[test]
    fn covariance_shrinks_toward_steady_state() {
        let state = (0..200).fold(KalmanState::seed(0.0), |state, _| state.step(0.0, 1e-5, 1e-2));
        assert!(state.covariance < 1e-3);
        assert!(state.covariance > 0.0);
    }

    #[test]
    fn step_change_is_followed_gradually() {
        let mut input = Array2::<f64>::zeros((40, 1));
        input.slice_mut(ndarray::s![20.., ..]).fill(1.0);
        let output = KalmanSmoother::default().apply(input.view());
        assert_eq!(output[[19, 0]], 0.0);
        assert!(output[[20, 0]] > 0.0 && output[[20, 0]] < 1.0);
        // no look-ahead: samples before the step are untouched by it
        assert!(output.slice(ndarray::s![..20, ..]).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn columns_are_independent() {
        let input = array![[0.0, 5.0], [1.0, 5.0], [2.0, 5.0]];
        let output = KalmanSmoother::default().apply(input.view());
        assert!(output.column(1).iter().all(|&v| v == 5.0));
    }
}
