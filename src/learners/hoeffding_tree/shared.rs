use crate::core::instances::{Instance, Label};
use crate::error::Result;
use crate::learners::hoeffding_tree::HoeffdingTree;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A tree shared between threads: many concurrent predictions, one learner
/// at a time.
#[derive(Clone)]
pub struct SharedHoeffdingTree {
    inner: Arc<RwLock<HoeffdingTree>>,
}

impl SharedHoeffdingTree {
    pub fn new(tree: HoeffdingTree) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    pub fn learn(&self, instance: &dyn Instance) -> Result<()> {
        self.inner.write().learn(instance)
    }

    pub fn predict(&self, instance: &dyn Instance) -> Result<Option<Label>> {
        self.inner.read().predict(instance)
    }

    pub fn predict_proba(&self, instance: &dyn Instance) -> Result<BTreeMap<usize, f64>> {
        self.inner.read().predict_proba(instance)
    }

    /// Runs `f` against a consistent view of the tree.
    pub fn with_tree<T>(&self, f: impl FnOnce(&HoeffdingTree) -> T) -> T {
        f(&self.inner.read())
    }
}
