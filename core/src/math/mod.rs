pub mod boundary;
pub mod matrix;
pub mod stats;

pub use boundary::Boundary;
pub use matrix::MatrixHelper;
pub use stats::StatsHelper;
