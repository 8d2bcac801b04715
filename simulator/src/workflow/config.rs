use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use csicore::prelude::SanitizerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub sanitizer: SanitizerConfig,
    pub generator: GeneratorConfig,
    /// Number of windows per run; 0 or 1 uses the single-window path.
    pub batch: usize,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .sanitizer
            .validate()
            .with_context(|| format!("validating sanitizer in {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        samples: usize,
        subcarriers: usize,
        tx: usize,
        rx: usize,
        batch: usize,
        seed: u64,
    ) -> Self {
        let mut generator = GeneratorConfig {
            samples,
            seed,
            ..Default::default()
        };
        generator.capture.num_subcarriers = subcarriers;
        generator.capture.num_tx_antennas = tx;
        generator.capture.num_rx_antennas = rx;
        Self {
            sanitizer: SanitizerConfig::default(),
            generator,
            batch,
        }
    }
}
