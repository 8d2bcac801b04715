pub mod packet;
pub mod tensor;

pub use packet::{stack_packets, CaptureConfig, CsiPacket};
pub use tensor::{CsiShape, SanitizedBatch, SanitizedCsi};
