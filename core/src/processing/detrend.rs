use ndarray::{Array2, ArrayView1, ArrayView2};
use std::f64::consts::TAU;

use crate::prelude::{DetrendMode, PhaseStage};

/// Removes the per-row linear phase ramp across subcarriers (time of flight).
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearDetrender {
    mode: DetrendMode,
}

impl LinearDetrender {
    pub fn new(mode: DetrendMode) -> Self {
        Self { mode }
    }

    /// Returns `(slope, intercept)` for one row. A single bin has slope 0.
    pub fn fit(&self, row: ArrayView1<f64>) -> (f64, f64) {
        let bins = row.len();
        if bins == 0 {
            return (0.0, 0.0);
        }
        let intercept = row.sum() / bins as f64;
        if bins < 2 {
            return (0.0, intercept);
        }
        let span = row[bins - 1] - row[0];
        let slope = match self.mode {
            DetrendMode::Paper => span / (TAU * bins as f64),
            DetrendMode::EndpointFit => span / (bins - 1) as f64,
        };
        (slope, intercept)
    }
}

impl PhaseStage for LinearDetrender {
    fn name(&self) -> &'static str {
        "detrend"
    }

    fn apply(&self, phase: ArrayView2<f64>) -> Array2<f64> {
        let mut fitted = Array2::zeros(phase.raw_dim());
        for (row, mut out) in phase.rows().into_iter().zip(fitted.rows_mut()) {
            let (slope, intercept) = self.fit(row);
            for (f, (slot, &value)) in out.iter_mut().zip(row.iter()).enumerate() {
                *slot = value - (slope * f as f64 + intercept);
            }
        }
        fitted
    }
}
