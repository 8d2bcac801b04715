use ndarray::{s, Array2, Array4, Array5, ArrayView2, ArrayView4, ArrayView5, Axis};
use num_complex::Complex64;
use rayon::prelude::*;

use crate::csi_interface::{stack_packets, CsiPacket, CsiShape, SanitizedBatch, SanitizedCsi};
use crate::prelude::{PhaseStage, SanitizeError, SanitizeResult, SanitizerConfig};
use crate::processing::detrend::LinearDetrender;
use crate::processing::kalman::KalmanSmoother;
use crate::processing::outlier::OutlierFilter;
use crate::processing::unwrap::PhaseUnwrapper;
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};

/// Runs unwrap → outlier filter → Kalman → detrend on every antenna pair.
///
/// Pairs never exchange data, so they are fanned out over the rayon pool when
/// `SanitizerConfig::parallel` is set. Results are written into the output
/// tensor only once every pair has finished.
pub struct PhaseSanitizer {
    config: SanitizerConfig,
    stages: Vec<Box<dyn PhaseStage>>,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl PhaseSanitizer {
    pub fn new(config: SanitizerConfig) -> SanitizeResult<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: SanitizerConfig) -> Self {
        let stages: Vec<Box<dyn PhaseStage>> = vec![
            Box::new(PhaseUnwrapper::new()),
            Box::new(OutlierFilter::new(
                config.median_kernel,
                config.uniform_kernel,
            )),
            Box::new(KalmanSmoother::new(
                config.process_variance,
                config.measurement_variance,
            )),
            Box::new(LinearDetrender::new(config.detrend)),
        ];
        let logger = LogManager::new("sanitizer");
        logger.trace(&format!(
            "stages {:?}",
            stages.iter().map(|stage| stage.name()).collect::<Vec<_>>()
        ));
        Self {
            config,
            stages,
            logger,
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn metrics_json(&self) -> serde_json::Value {
        self.metrics.snapshot_json()
    }

    /// Sanitizes one (time, frequency) phase slice. Pure: no shared state is touched.
    pub fn sanitize_pair(&self, phase: ArrayView2<f64>) -> Array2<f64> {
        let mut stages = self.stages.iter();
        let first = match stages.next() {
            Some(stage) => stage.apply(phase),
            None => return phase.to_owned(),
        };
        stages.fold(first, |current, stage| stage.apply(current.view()))
    }

    /// Splits complex CSI into amplitude and sanitized phase of the same shape.
    pub fn sanitize(&self, csi: ArrayView4<Complex64>) -> SanitizeResult<SanitizedCsi> {
        let shape = CsiShape::from_dim(csi.dim());
        if let Err(err) = self.check_shape(&shape) {
            self.metrics.record_rejected();
            return Err(err);
        }

        let sanitized = self.sanitize_validated(csi);
        self.metrics.record_frame(shape.pair_count());
        self.logger.trace(&format!("sanitized frame {}", shape));
        Ok(sanitized)
    }

    /// Sanitizes every element of a (batch, time, frequency, tx, rx) tensor.
    pub fn sanitize_batch(&self, batch: ArrayView5<Complex64>) -> SanitizeResult<SanitizedBatch> {
        let (count, time, frequency, tx, rx) = batch.dim();
        let shape = CsiShape::new(time, frequency, tx, rx);
        let checked = if count == 0 {
            Err(SanitizeError::EmptyAxis("batch axis has length 0".into()))
        } else {
            self.check_shape(&shape)
        };
        if let Err(err) = checked {
            self.metrics.record_rejected();
            return Err(err);
        }

        let run_element = |index: usize| self.sanitize_validated(batch.index_axis(Axis(0), index));
        let elements: Vec<SanitizedCsi> = if self.config.parallel {
            (0..count).into_par_iter().map(run_element).collect()
        } else {
            (0..count).map(run_element).collect()
        };

        let mut amplitude = Array5::zeros(batch.raw_dim());
        let mut phase = Array5::zeros(batch.raw_dim());
        for (index, element) in elements.into_iter().enumerate() {
            amplitude
                .index_axis_mut(Axis(0), index)
                .assign(&element.amplitude);
            phase.index_axis_mut(Axis(0), index).assign(&element.phase);
            self.metrics.record_frame(shape.pair_count());
        }
        self.logger
            .record(&format!("sanitized batch of {} frames {}", count, shape));
        Ok(SanitizedBatch { amplitude, phase })
    }

    /// Stacks capture packets along time and sanitizes the resulting window.
    pub fn sanitize_packets(&self, packets: &[CsiPacket]) -> SanitizeResult<SanitizedCsi> {
        let csi = stack_packets(packets).map_err(|err| {
            self.metrics.record_rejected();
            err
        })?;
        self.sanitize(csi.view())
    }

    fn check_shape(&self, shape: &CsiShape) -> SanitizeResult<()> {
        if let Some(expected) = &self.config.expected_shape {
            expected.ensure_matches(shape)?;
        }
        shape.ensure_non_empty()
    }

    fn sanitize_validated(&self, csi: ArrayView4<Complex64>) -> SanitizedCsi {
        let (_, _, tx_count, rx_count) = csi.dim();
        let amplitude = csi.mapv(|sample| sample.norm());
        let raw_phase = csi.mapv(|sample| sample.arg());

        let pairs: Vec<(usize, usize)> = (0..tx_count)
            .flat_map(|tx| (0..rx_count).map(move |rx| (tx, rx)))
            .collect();
        let run_pair = |&(tx, rx): &(usize, usize)| {
            self.sanitize_pair(raw_phase.slice(s![.., .., tx, rx]))
        };
        let slices: Vec<Array2<f64>> = if self.config.parallel {
            pairs.par_iter().map(run_pair).collect()
        } else {
            pairs.iter().map(run_pair).collect()
        };

        let mut phase = Array4::zeros(raw_phase.raw_dim());
        for (&(tx, rx), slice) in pairs.iter().zip(slices) {
            phase.slice_mut(s![.., .., tx, rx]).assign(&slice);
        }
        SanitizedCsi { amplitude, phase }
    }
}

impl Default for PhaseSanitizer {
    fn default() -> Self {
        Self::from_validated(SanitizerConfig::default())
    }
}

/// Sanitizes a batch with the default configuration.
pub fn sanitize_csi_batch(batch: ArrayView5<Complex64>) -> SanitizeResult<SanitizedBatch> {
    PhaseSanitizer::default().sanitize_batch(batch)
}
