//! Phase sanitization core for WiFi channel state information.
//!
//! Raw complex CSI is split into amplitude and phase; the phase of every
//! antenna pair then runs through unwrapping, outlier filtering, Kalman
//! smoothing and linear detrending before it reaches the pose model.

pub mod csi_interface;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use csi_interface::{CsiPacket, CsiShape, SanitizedBatch, SanitizedCsi};
pub use prelude::{DetrendMode, PhaseStage, SanitizeError, SanitizeResult, SanitizerConfig};
pub use processing::{sanitize_csi_batch, PhaseSanitizer};
