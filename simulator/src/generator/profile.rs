use anyhow::Context;
use csicore::csi_interface::{stack_packets, CaptureConfig, CsiPacket};
use ndarray::{Array3, Array4, Array5, Axis};
use num_complex::Complex64;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Configuration for synthesizing raw CSI windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub capture: CaptureConfig,
    pub samples: usize,
    pub amplitude_min: f64,
    pub amplitude_max: f64,
    /// Time-of-flight phase ramp in radians per subcarrier.
    pub tof_slope: f64,
    /// Uniform phase jitter half-width in radians.
    pub phase_noise: f64,
    /// Probability that a sample carries an impulsive phase spike.
    pub spike_probability: f64,
    /// Apply a per-subcarrier phase shift shared by all antenna pairs.
    pub correlated: bool,
    pub seed: u64,
    pub scenario: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            samples: 5,
            amplitude_min: 10.0,
            amplitude_max: 30.0,
            tof_slope: 0.35,
            phase_noise: 0.05,
            spike_probability: 0.01,
            correlated: true,
            seed: 0,
            scenario: None,
        }
    }
}

impl GeneratorConfig {
    fn amplitude_bounds(&self) -> (f64, f64) {
        let low = self.amplitude_min.max(0.0);
        let high = self.amplitude_max.max(low);
        (low, high)
    }
}

fn sample_range(rng: &mut StdRng, low: f64, high: f64) -> f64 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}

fn build_packet(
    config: &GeneratorConfig,
    rng: &mut StdRng,
    index: usize,
) -> anyhow::Result<CsiPacket> {
    let capture = &config.capture;
    let (amp_low, amp_high) = config.amplitude_bounds();
    let dim = (
        capture.num_subcarriers,
        capture.num_tx_antennas,
        capture.num_rx_antennas,
    );
    let timestamp = index as f64 / capture.sampling_rate_hz.max(1) as f64;
    // carrier and sampling offsets shift the whole packet by a random phase
    let packet_offset = rng.gen_range(-PI..PI);

    let mut csi = Array3::<Complex64>::zeros(dim);
    for subcarrier in 0..dim.0 {
        let shared = if config.correlated {
            0.5 * rng.gen_range(-PI..PI)
        } else {
            0.0
        };
        for tx in 0..dim.1 {
            for rx in 0..dim.2 {
                let amplitude = sample_range(rng, amp_low, amp_high);
                let jitter = sample_range(rng, -config.phase_noise, config.phase_noise);
                let spike = if rng.gen_bool(config.spike_probability.clamp(0.0, 1.0)) {
                    rng.gen_range(-PI..PI)
                } else {
                    0.0
                };
                let pair_offset = 0.3 * (tx * dim.2 + rx) as f64;
                let phase = config.tof_slope * subcarrier as f64
                    + packet_offset
                    + pair_offset
                    + shared
                    + jitter
                    + spike;
                csi[[subcarrier, tx, rx]] = Complex64::from_polar(amplitude, phase);
            }
        }
    }

    let mut packet = CsiPacket::new(timestamp, csi);
    packet.rssi = -50.0 + rng.gen_range(-5.0f32..5.0);
    packet.rate = 65;
    packet.channel = capture.channel;
    packet.bandwidth_mhz = capture.bandwidth_mhz;
    anyhow::ensure!(
        packet.csi.iter().all(|sample| sample.norm().is_finite()),
        "generated non-finite CSI at sample {}",
        index
    );
    Ok(packet)
}

pub fn build_packets(config: &GeneratorConfig) -> anyhow::Result<Vec<CsiPacket>> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    (0..config.samples.max(1))
        .map(|index| build_packet(config, &mut rng, index))
        .collect()
}

pub fn build_csi_window(config: &GeneratorConfig) -> anyhow::Result<Array4<Complex64>> {
    let packets = build_packets(config)?;
    stack_packets(&packets).context("stacking generated packets")
}

/// Builds `batch` consecutive windows, each seeded from `config.seed + index`.
pub fn build_csi_batch(config: &GeneratorConfig, batch: usize) -> anyhow::Result<Array5<Complex64>> {
    let windows = (0..batch.max(1))
        .map(|index| {
            let window_config = GeneratorConfig {
                seed: config.seed.wrapping_add(index as u64),
                ..config.clone()
            };
            build_csi_window(&window_config)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let views: Vec<_> = windows.iter().map(|window| window.view()).collect();
    ndarray::stack(Axis(0), &views).context("stacking generated windows into a batch")
}
