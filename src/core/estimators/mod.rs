mod gaussian_estimator;
mod target_stats;

pub use gaussian_estimator::GaussianEstimator;
pub use target_stats::{RunningVariance, TargetStats};
