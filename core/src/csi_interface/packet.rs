use ndarray::{s, Array3, Array4};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::csi_interface::tensor::CsiShape;
use crate::prelude::{SanitizeError, SanitizeResult};

/// Capture-session parameters reported by the upstream CSI source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    pub num_tx_antennas: usize,
    pub num_rx_antennas: usize,
    pub num_subcarriers: usize,
    pub channel: u16,
    pub bandwidth_mhz: u16,
    pub sampling_rate_hz: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            num_tx_antennas: 3,
            num_rx_antennas: 3,
            num_subcarriers: 30,
            channel: 6,
            bandwidth_mhz: 40,
            sampling_rate_hz: 100,
        }
    }
}

impl CaptureConfig {
    /// Tensor shape of a window holding `time_samples` packets.
    pub fn window_shape(&self, time_samples: usize) -> CsiShape {
        CsiShape::new(
            time_samples,
            self.num_subcarriers,
            self.num_tx_antennas,
            self.num_rx_antennas,
        )
    }
}

/// A single time sample of complex CSI, laid out as (frequency, tx, rx).
#[derive(Debug, Clone, PartialEq)]
pub struct CsiPacket {
    pub timestamp: f64,
    pub csi: Array3<Complex64>,
    pub rssi: f32,
    pub rate: u32,
    pub channel: u16,
    pub bandwidth_mhz: u16,
}

impl CsiPacket {
    pub fn new(timestamp: f64, csi: Array3<Complex64>) -> Self {
        Self {
            timestamp,
            csi,
            rssi: 0.0,
            rate: 0,
            channel: 0,
            bandwidth_mhz: 0,
        }
    }
}

/// Stacks consecutive packets into a (time, frequency, tx, rx) tensor.
///
/// Every packet must share the (frequency, tx, rx) layout of the first one.
pub fn stack_packets(packets: &[CsiPacket]) -> SanitizeResult<Array4<Complex64>> {
    let first = packets
        .first()
        .ok_or_else(|| SanitizeError::EmptyAxis("time axis has no packets".into()))?;
    let (frequency, tx, rx) = first.csi.dim();
    let expected = CsiShape::new(packets.len(), frequency, tx, rx);
    expected.ensure_non_empty()?;

    for packet in packets.iter().skip(1) {
        let (f, t, r) = packet.csi.dim();
        expected.ensure_matches(&CsiShape::new(packets.len(), f, t, r))?;
    }

    let mut tensor = Array4::zeros(expected.as_dim());
    for (index, packet) in packets.iter().enumerate() {
        tensor.slice_mut(s![index, .., .., ..]).assign(&packet.csi);
    }
    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(value: f64, frequency: usize, tx: usize, rx: usize) -> CsiPacket {
        CsiPacket::new(value, Array3::from_elem((frequency, tx, rx), Complex64::new(value, 0.0)))
    }

    #[test]
    fn packets_stack_along_time_axis() {
        let packets: Vec<_> = (0..4).map(|i| packet(i as f64, 30, 3, 3)).collect();
        let tensor = stack_packets(&packets).unwrap();
        assert_eq!(tensor.dim(), (4, 30, 3, 3));
        assert_eq!(tensor[[2, 7, 1, 0]], Complex64::new(2.0, 0.0));
    }

    #[test]
    fn mismatched_packet_is_rejected() {
        let packets = vec![packet(0.0, 30, 3, 3), packet(1.0, 30, 2, 3)];
        assert!(matches!(
            stack_packets(&packets),
            Err(SanitizeError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn empty_packet_list_is_rejected() {
        assert!(matches!(stack_packets(&[]), Err(SanitizeError::EmptyAxis(_))));
    }

    #[test]
    fn capture_defaults_match_three_by_three_array() {
        let shape = CaptureConfig::default().window_shape(5);
        assert_eq!(shape, CsiShape::new(5, 30, 3, 3));
    }
}
