//! Change detectors watching a stream of error signals.

mod adwin;
mod drift_detector;
mod eddm;

pub use adwin::Adwin;
pub use drift_detector::DriftDetector;
pub use eddm::Eddm;
