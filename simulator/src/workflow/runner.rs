use crate::generator::profile::{build_csi_batch, build_packets};
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use csicore::csi_interface::stack_packets;
use csicore::math::StatsHelper;
use csicore::processing::{PhaseSanitizer, PhaseUnwrapper};
use csicore::{CsiShape, PhaseStage, SanitizedCsi};
use ndarray::{s, Array4, ArrayView4, Axis};
use num_complex::Complex64;
use serde::Serialize;

/// Phase statistics for one antenna pair, averaged over the time rows.
#[derive(Debug, Clone, Serialize)]
pub struct PairSummary {
    pub tx: usize,
    pub rx: usize,
    pub raw_spread: f64,
    pub unwrapped_max_step: f64,
    pub sanitized_spread: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub scenario: Option<String>,
    pub shape: CsiShape,
    pub windows: usize,
    pub mean_amplitude: f64,
    pub pairs: Vec<PairSummary>,
    pub metrics: serde_json::Value,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let sanitizer =
            PhaseSanitizer::new(self.config.sanitizer.clone()).context("building sanitizer")?;
        let generator = &self.config.generator;

        let (raw, sanitized, windows) = if self.config.batch > 1 {
            let batch = build_csi_batch(generator, self.config.batch)
                .context("generating CSI batch")?;
            let output = sanitizer
                .sanitize_batch(batch.view())
                .context("sanitizing CSI batch")?;
            // summaries describe the first window of the batch
            let first = SanitizedCsi {
                amplitude: output.amplitude.index_axis(Axis(0), 0).to_owned(),
                phase: output.phase.index_axis(Axis(0), 0).to_owned(),
            };
            (
                batch.index_axis(Axis(0), 0).to_owned(),
                first,
                output.len(),
            )
        } else {
            let packets = build_packets(generator).context("generating CSI packets")?;
            let raw = stack_packets(&packets).context("stacking CSI packets")?;
            let output = sanitizer
                .sanitize(raw.view())
                .context("sanitizing CSI window")?;
            (raw, output, 1)
        };

        let shape = sanitized.shape();
        log::info!(
            "sanitized {} window(s) of shape {} with {} pairs",
            windows,
            shape,
            shape.pair_count()
        );

        Ok(WorkflowResult {
            scenario: generator.scenario.clone(),
            shape,
            windows,
            mean_amplitude: sanitized.amplitude.mean().unwrap_or(0.0),
            pairs: summarize_pairs(raw.view(), &sanitized),
            metrics: sanitizer.metrics_json(),
        })
    }
}

fn mean_over_rows<F>(matrix: ndarray::ArrayView2<f64>, reduce: F) -> f64
where
    F: Fn(&[f64]) -> f64,
{
    let values: Vec<f64> = matrix.rows().into_iter().map(|row| reduce(&row.to_vec())).collect();
    StatsHelper::mean(&values)
}

fn summarize_pairs(raw: ArrayView4<Complex64>, sanitized: &SanitizedCsi) -> Vec<PairSummary> {
    let (_, _, tx_count, rx_count) = raw.dim();
    let raw_phase: Array4<f64> = raw.mapv(|sample| sample.arg());
    let mut summaries = Vec::with_capacity(tx_count * rx_count);
    for tx in 0..tx_count {
        for rx in 0..rx_count {
            let raw_slice = raw_phase.slice(s![.., .., tx, rx]);
            let unwrapped = PhaseUnwrapper::new().apply(raw_slice);
            summaries.push(PairSummary {
                tx,
                rx,
                raw_spread: mean_over_rows(raw_slice, StatsHelper::spread),
                unwrapped_max_step: mean_over_rows(unwrapped.view(), StatsHelper::max_abs_step),
                sanitized_spread: mean_over_rows(
                    sanitized.phase.slice(s![.., .., tx, rx]),
                    StatsHelper::spread,
                ),
            });
        }
    }
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn runner_executes_single_window() {
        let cfg = WorkflowConfig::from_args(5, 30, 3, 3, 1, 42);
        let result = Runner::new(cfg).execute().unwrap();
        assert_eq!(result.shape, CsiShape::new(5, 30, 3, 3));
        assert_eq!(result.windows, 1);
        assert_eq!(result.pairs.len(), 9);
        assert!(result.mean_amplitude > 10.0 && result.mean_amplitude < 30.0);
        assert_eq!(result.metrics["frames"], 1);
        for pair in &result.pairs {
            assert!(pair.unwrapped_max_step <= PI + 1e-9);
        }
    }

    #[test]
    fn runner_executes_batch() {
        let cfg = WorkflowConfig::from_args(4, 16, 2, 2, 3, 1);
        let result = Runner::new(cfg).execute().unwrap();
        assert_eq!(result.windows, 3);
        assert_eq!(result.pairs.len(), 4);
        assert_eq!(result.metrics["frames"], 3);
        assert_eq!(result.metrics["pairs"], 12);
    }

    #[test]
    fn runner_reports_shape_mismatch() {
        let mut cfg = WorkflowConfig::from_args(5, 30, 3, 3, 1, 0);
        cfg.sanitizer.expected_shape = Some(CsiShape::new(5, 30, 2, 2));
        let err = Runner::new(cfg).execute().unwrap_err();
        assert!(format!("{:#}", err).contains("shape mismatch"));
    }

    #[test]
    fn result_serializes_to_json() {
        let cfg = WorkflowConfig::from_args(3, 8, 1, 1, 1, 5);
        let result = Runner::new(cfg).execute().unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["shape"]["frequency"], 8);
        assert_eq!(json["pairs"].as_array().unwrap().len(), 1);
    }
}
