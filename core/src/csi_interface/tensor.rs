use ndarray::{Array4, Array5};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::prelude::{SanitizeError, SanitizeResult};

/// Axis counts of a CSI tensor laid out as (time, frequency, tx, rx).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsiShape {
    pub time: usize,
    pub frequency: usize,
    pub tx: usize,
    pub rx: usize,
}

impl CsiShape {
    pub fn new(time: usize, frequency: usize, tx: usize, rx: usize) -> Self {
        Self {
            time,
            frequency,
            tx,
            rx,
        }
    }

    pub fn from_dim(dim: (usize, usize, usize, usize)) -> Self {
        Self::new(dim.0, dim.1, dim.2, dim.3)
    }

    pub fn as_dim(&self) -> (usize, usize, usize, usize) {
        (self.time, self.frequency, self.tx, self.rx)
    }

    pub fn pair_count(&self) -> usize {
        self.tx * self.rx
    }

    /// Every axis needs at least one entry; the Kalman stage seeds from `t = 0`.
    pub fn ensure_non_empty(&self) -> SanitizeResult<()> {
        let axes = [
            ("time", self.time),
            ("frequency", self.frequency),
            ("tx", self.tx),
            ("rx", self.rx),
        ];
        match axes.iter().find(|(_, len)| *len == 0) {
            Some((name, _)) => Err(SanitizeError::EmptyAxis(format!(
                "{} axis has length 0 in {}",
                name, self
            ))),
            None => Ok(()),
        }
    }

    pub fn ensure_matches(&self, actual: &CsiShape) -> SanitizeResult<()> {
        if self != actual {
            return Err(SanitizeError::ShapeMismatch {
                expected: self.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for CsiShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(time={}, frequency={}, tx={}, rx={})",
            self.time, self.frequency, self.tx, self.rx
        )
    }
}

/// Amplitude and sanitized phase for one capture window.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedCsi {
    pub amplitude: Array4<f64>,
    pub phase: Array4<f64>,
}

impl SanitizedCsi {
    pub fn shape(&self) -> CsiShape {
        CsiShape::from_dim(self.phase.dim())
    }
}

/// Amplitude and sanitized phase with a leading batch axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedBatch {
    pub amplitude: Array5<f64>,
    pub phase: Array5<f64>,
}

impl SanitizedBatch {
    pub fn len(&self) -> usize {
        self.phase.len_of(ndarray::Axis(0))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
