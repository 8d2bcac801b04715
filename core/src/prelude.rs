use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::csi_interface::CsiShape;

/// How the detrending stage estimates the per-row phase slope.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DetrendMode {
    /// `(phi_F - phi_1) / (2 * pi * F)`, matching the published sanitization.
    #[default]
    Paper,
    /// `(phi_F - phi_1) / (F - 1)`, removes an exact linear ramp completely.
    EndpointFit,
}

/// Shared configuration for the sanitization pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SanitizerConfig {
    pub median_kernel: usize,
    pub uniform_kernel: usize,
    pub process_variance: f64,
    pub measurement_variance: f64,
    pub detrend: DetrendMode,
    /// Spread antenna pairs and batch elements over the rayon pool.
    pub parallel: bool,
    /// When set, every input tensor must match this shape exactly.
    pub expected_shape: Option<CsiShape>,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            median_kernel: 3,
            uniform_kernel: 3,
            process_variance: 1e-5,
            measurement_variance: 1e-2,
            detrend: DetrendMode::Paper,
            parallel: true,
            expected_shape: None,
        }
    }
}

impl SanitizerConfig {
    pub fn validate(&self) -> SanitizeResult<()> {
        validate_kernel("median_kernel", self.median_kernel)?;
        validate_kernel("uniform_kernel", self.uniform_kernel)?;
        validate_variance("process_variance", self.process_variance)?;
        validate_variance("measurement_variance", self.measurement_variance)?;
        if let Some(shape) = &self.expected_shape {
            shape.ensure_non_empty()?;
        }
        Ok(())
    }
}

fn validate_kernel(name: &str, size: usize) -> SanitizeResult<()> {
    if size == 0 || size % 2 == 0 {
        return Err(SanitizeError::InvalidConfig(format!(
            "{} must be an odd positive integer, got {}",
            name, size
        )));
    }
    Ok(())
}

fn validate_variance(name: &str, value: f64) -> SanitizeResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SanitizeError::InvalidConfig(format!(
            "{} must be a positive finite number, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Common error type for the sanitization pipeline.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SanitizeError {
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
    #[error("empty axis: {0}")]
    EmptyAxis(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type SanitizeResult<T> = Result<T, SanitizeError>;

/// One step of the per-antenna-pair phase pipeline.
///
/// Stages read a (time, frequency) phase matrix and return a freshly
/// allocated matrix of the same shape. They hold no per-call state.
pub trait PhaseStage: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, phase: ArrayView2<f64>) -> Array2<f64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SanitizerConfig::default().validate().is_ok());
    }

    #[test]
    fn even_or_zero_kernels_are_rejected() {
        for size in [0, 2, 4] {
            let config = SanitizerConfig {
                median_kernel: size,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(SanitizeError::InvalidConfig(_))
            ));
        }
        let config = SanitizerConfig {
            uniform_kernel: 6,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_variances_are_rejected() {
        for value in [0.0, -1e-3, f64::NAN, f64::INFINITY] {
            let config = SanitizerConfig {
                process_variance: value,
                ..Default::default()
            };
            assert!(config.validate().is_err());
            let config = SanitizerConfig {
                measurement_variance: value,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: SanitizerConfig =
            serde_json::from_str(r#"{"median_kernel": 5, "detrend": "endpoint_fit"}"#).unwrap();
        assert_eq!(config.median_kernel, 5);
        assert_eq!(config.uniform_kernel, 3);
        assert_eq!(config.detrend, DetrendMode::EndpointFit);
        assert!(config.parallel);
    }
}
