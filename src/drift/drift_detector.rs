use std::fmt::Debug;

/// Detector fed one error signal per observation, `1.0` meaning a mistake.
pub trait DriftDetector: Debug + Send + Sync {
    /// Update detector with new value, returns true if drift detected
    fn update(&mut self, value: f64) -> bool;

    fn reset(&mut self);

    /// Whether the last update signalled drift.
    fn drift_detected(&self) -> bool;

    fn samples_seen(&self) -> u64;

    /// Current estimate of the monitored mean.
    fn estimation(&self) -> f64;
}
