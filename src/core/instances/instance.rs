use crate::core::instances::{FeatureValue, Label};

/// A single weighted observation as seen by learners.
///
/// Feature ids are dense model indices; implementations decide how they map
/// onto their own storage. A feature the instance does not carry is reported
/// as `None` and is treated as missing.
pub trait Instance {
    fn weight(&self) -> f64;

    fn label(&self) -> Option<Label>;

    fn feature(&self, feature_id: usize) -> Option<FeatureValue>;

    /// Present features in ascending id order.
    fn features(&self) -> Vec<(usize, FeatureValue)>;
}
