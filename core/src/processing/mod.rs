pub mod detrend;
pub mod kalman;
pub mod outlier;
pub mod pipeline;
pub mod unwrap;

pub use detrend::LinearDetrender;
pub use kalman::{KalmanSmoother, KalmanState};
pub use outlier::OutlierFilter;
pub use pipeline::{sanitize_csi_batch, PhaseSanitizer};
pub use unwrap::PhaseUnwrapper;
