use crate::core::instances::{Instance, Label};
use crate::error::{LearnerError, Result};
use crate::learners::Learner;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Votes for the true class of every instance it is asked about.
#[derive(Default)]
pub struct OracleLearner;

impl Learner for OracleLearner {
    fn votes_for_instance(&self, instance: &dyn Instance) -> Result<Vec<f64>> {
        Ok(match instance.label() {
            Some(Label::Class(c)) => {
                let mut votes = vec![0.0; c + 1];
                votes[c] = 1.0;
                votes
            }
            Some(Label::Numeric(v)) => vec![v],
            None => Vec::new(),
        })
    }

    fn train_on_instance(&mut self, _instance: &dyn Instance) -> Result<()> {
        Ok(())
    }

    fn byte_size(&self) -> usize {
        0
    }
}

/// Never has an opinion.
#[derive(Default)]
pub struct NoVotesLearner;

impl Learner for NoVotesLearner {
    fn votes_for_instance(&self, _instance: &dyn Instance) -> Result<Vec<f64>> {
        Ok(Vec::new())
    }

    fn train_on_instance(&mut self, _instance: &dyn Instance) -> Result<()> {
        Ok(())
    }

    fn byte_size(&self) -> usize {
        0
    }
}

/// Counts training calls through a handle that outlives the boxed learner.
pub struct TrainSpyLearner {
    count: Arc<AtomicUsize>,
}

pub struct TrainSpyHandle {
    count: Arc<AtomicUsize>,
}

impl TrainSpyHandle {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl TrainSpyLearner {
    pub fn new() -> (Self, TrainSpyHandle) {
        let count = Arc::new(AtomicUsize::new(0));
        (
            Self {
                count: Arc::clone(&count),
            },
            TrainSpyHandle { count },
        )
    }
}

impl Learner for TrainSpyLearner {
    fn votes_for_instance(&self, _instance: &dyn Instance) -> Result<Vec<f64>> {
        Ok(vec![1.0])
    }

    fn train_on_instance(&mut self, _instance: &dyn Instance) -> Result<()> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn byte_size(&self) -> usize {
        size_of::<Self>()
    }
}

/// Rejects every training instance.
#[derive(Default)]
pub struct FailingLearner;

impl Learner for FailingLearner {
    fn votes_for_instance(&self, _instance: &dyn Instance) -> Result<Vec<f64>> {
        Ok(Vec::new())
    }

    fn train_on_instance(&mut self, _instance: &dyn Instance) -> Result<()> {
        Err(LearnerError::InvalidObservation("always rejected".into()))
    }

    fn byte_size(&self) -> usize {
        0
    }
}
