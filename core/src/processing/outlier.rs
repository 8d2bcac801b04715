use ndarray::{Array2, ArrayView2, Axis};

use crate::math::matrix::MatrixHelper;
use crate::prelude::PhaseStage;

/// Median passes over time then frequency, followed by a box average.
///
/// The median passes replicate edge samples; the box average mirrors them.
#[derive(Debug, Clone, Copy)]
pub struct OutlierFilter {
    median_kernel: usize,
    uniform_kernel: usize,
}

impl OutlierFilter {
    /// Kernel sizes are expected to be odd and positive; `SanitizerConfig::validate` checks them.
    pub fn new(median_kernel: usize, uniform_kernel: usize) -> Self {
        Self {
            median_kernel,
            uniform_kernel,
        }
    }
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self::new(3, 3)
    }
}

impl PhaseStage for OutlierFilter {
    fn name(&self) -> &'static str {
        "outlier"
    }

    fn apply(&self, phase: ArrayView2<f64>) -> Array2<f64> {
        let over_time = MatrixHelper::median_along(phase, Axis(0), self.median_kernel);
        let over_frequency =
            MatrixHelper::median_along(over_time.view(), Axis(1), self.median_kernel);
        MatrixHelper::uniform_filter(over_frequency.view(), self.uniform_kernel)
    }
}
