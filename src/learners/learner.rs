use crate::core::instances::Instance;
use crate::error::Result;

/// Incremental learner driven by the prequential evaluator.
pub trait Learner {
    /// Per-class votes for classifiers, a single-element vector holding the
    /// prediction for regressors. Empty when the learner knows nothing yet.
    fn votes_for_instance(&self, instance: &dyn Instance) -> Result<Vec<f64>>;

    fn train_on_instance(&mut self, instance: &dyn Instance) -> Result<()>;

    fn byte_size(&self) -> usize;
}
