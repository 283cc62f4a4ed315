use crate::evaluation::{LearningCurve, PerformanceEvaluator, Snapshot};
use crate::learners::Learner;
use crate::streams::Stream;
use log::{debug, info};
use std::collections::BTreeMap;
use std::io::{Error, ErrorKind};
use std::sync::mpsc::Sender;
use std::time::Instant;

/// Test-then-train loop: every instance is first predicted, scored, and then
/// used for training. A snapshot is taken every `sample_frequency`
/// instances and once more at the end.
pub struct PrequentialEvaluator {
    learner: Box<dyn Learner>,
    stream: Box<dyn Stream>,
    evaluator: Box<dyn PerformanceEvaluator>,

    curve: LearningCurve,

    max_instances: Option<u64>,
    max_seconds: Option<u64>,
    sample_frequency: u64,

    processed: u64,
    start_time: Instant,

    progress_tx: Option<Sender<Snapshot>>,
}

impl PrequentialEvaluator {
    pub fn new(
        learner: Box<dyn Learner>,
        stream: Box<dyn Stream>,
        evaluator: Box<dyn PerformanceEvaluator>,
        max_instances: Option<u64>,
        max_seconds: Option<u64>,
        sample_frequency: u64,
    ) -> Result<Self, Error> {
        if sample_frequency == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "sample_frequency must be > 0",
            ));
        }

        Ok(Self {
            learner,
            stream,
            evaluator,
            curve: LearningCurve::default(),
            max_instances,
            max_seconds,
            sample_frequency,
            processed: 0,
            start_time: Instant::now(),
            progress_tx: None,
        })
    }

    /// Sends a copy of every snapshot to `tx` as it is taken.
    pub fn with_progress(mut self, tx: Sender<Snapshot>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Runs until the stream ends or a limit is hit. A learner error stops
    /// the run and surfaces as `ErrorKind::InvalidData`.
    pub fn run(&mut self) -> Result<(), Error> {
        self.start_time = Instant::now();
        info!(
            "prequential run on {} (limit {:?} instances, {:?} s)",
            self.stream.header().relation_name(),
            self.max_instances,
            self.max_seconds
        );

        while self.stream.has_more_instances() {
            if self.max_instances.is_some_and(|n| self.processed >= n) {
                break;
            }
            if self
                .max_seconds
                .is_some_and(|s| self.start_time.elapsed().as_secs() >= s)
            {
                break;
            }
            let Some(instance) = self.stream.next_instance() else {
                break;
            };
            self.processed += 1;

            let votes = self
                .learner
                .votes_for_instance(instance.as_ref())
                .map_err(|e| Error::new(ErrorKind::InvalidData, e))?;
            self.evaluator.add_result(instance.as_ref(), votes);

            if instance.label().is_some() {
                self.learner
                    .train_on_instance(instance.as_ref())
                    .map_err(|e| Error::new(ErrorKind::InvalidData, e))?;
            }

            if self.processed % self.sample_frequency == 0 {
                self.push_snapshot();
            }
        }

        self.push_snapshot();
        if let Some(last) = self.curve.latest() {
            info!("prequential run finished: {last}");
        }
        Ok(())
    }

    pub fn curve(&self) -> &LearningCurve {
        &self.curve
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    fn push_snapshot(&mut self) {
        let mut accuracy = f64::NAN;
        let mut kappa = f64::NAN;
        let mut extras = BTreeMap::new();
        for m in self.evaluator.performance() {
            match m.name.as_str() {
                "accuracy" => accuracy = m.value,
                "kappa" => kappa = m.value,
                _ => {
                    extras.insert(m.name, m.value);
                }
            }
        }

        let snapshot = Snapshot {
            instances_seen: self.processed,
            accuracy,
            kappa,
            model_bytes: self.learner.byte_size(),
            seconds: self.start_time.elapsed().as_secs_f64(),
            extras,
        };
        debug!("{snapshot}");

        if let Some(tx) = &self.progress_tx {
            // A dropped receiver only means nobody is watching.
            let _ = tx.send(snapshot.clone());
        }
        self.curve.push(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HoeffdingTreeParams, LeafPredictionChoice, NoParams};
    use crate::evaluation::{BasicClassificationEvaluator, BasicEstimator};
    use crate::learners::HoeffdingTree;
    use crate::streams::generators::{SeaFunction, SeaGenerator};
    use crate::testing::{FailingLearner, NoVotesLearner, OracleLearner, TrainSpyLearner, VecStream};
    use std::sync::mpsc;

    fn alternating(n: usize) -> Box<dyn Stream> {
        Box::new(VecStream::new((0..n).map(|i| i % 2).collect()))
    }

    fn evaluator() -> Box<dyn PerformanceEvaluator> {
        Box::new(BasicClassificationEvaluator::<BasicEstimator>::new(2))
    }

    #[test]
    fn zero_sample_frequency_is_rejected() {
        let err = PrequentialEvaluator::new(
            Box::new(OracleLearner),
            alternating(10),
            evaluator(),
            None,
            None,
            0,
        )
        .err()
        .unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn periodic_and_final_snapshots() {
        let mut pq = PrequentialEvaluator::new(
            Box::new(OracleLearner),
            alternating(100),
            evaluator(),
            None,
            None,
            10,
        )
        .unwrap();
        pq.run().unwrap();

        assert_eq!(pq.curve().len(), 11);
        let last = pq.curve().latest().unwrap();
        assert_eq!(last.instances_seen, 100);
        assert!(last.accuracy > 0.9999);
        assert!(last.kappa > 0.99);
        assert!(last.extras.contains_key("kappa_t"));
    }

    #[test]
    fn stops_at_max_instances() {
        let mut pq = PrequentialEvaluator::new(
            Box::new(OracleLearner),
            alternating(1_000),
            evaluator(),
            Some(25),
            None,
            5,
        )
        .unwrap();
        pq.run().unwrap();
        assert_eq!(pq.curve().len(), 6);
        assert_eq!(pq.processed(), 25);
    }

    #[test]
    fn stops_immediately_when_time_is_zero() {
        let mut pq = PrequentialEvaluator::new(
            Box::new(OracleLearner),
            alternating(100),
            evaluator(),
            None,
            Some(0),
            10,
        )
        .unwrap();
        pq.run().unwrap();
        assert_eq!(pq.curve().len(), 1);
        let last = pq.curve().latest().unwrap();
        assert_eq!(last.instances_seen, 0);
        assert!(last.accuracy.is_nan());
        assert_eq!(last.kappa, 0.0);
    }

    #[test]
    fn empty_votes_leave_metrics_unset() {
        let mut pq = PrequentialEvaluator::new(
            Box::new(NoVotesLearner),
            alternating(20),
            evaluator(),
            None,
            None,
            10,
        )
        .unwrap();
        pq.run().unwrap();
        let last = pq.curve().latest().unwrap();
        assert!(last.accuracy.is_nan());
        assert_eq!(last.kappa, 0.0);
    }

    #[test]
    fn trains_once_per_instance() {
        let (spy, handle) = TrainSpyLearner::new();
        let mut pq =
            PrequentialEvaluator::new(Box::new(spy), alternating(37), evaluator(), None, None, 10)
                .unwrap();
        pq.run().unwrap();
        assert_eq!(handle.count(), 37);
        assert!(pq.curve().latest().unwrap().model_bytes > 0);
    }

    #[test]
    fn learner_errors_stop_the_run() {
        let mut pq = PrequentialEvaluator::new(
            Box::new(FailingLearner),
            alternating(10),
            evaluator(),
            None,
            None,
            5,
        )
        .unwrap();
        let err = pq.run().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(pq.processed(), 1);
    }

    #[test]
    fn progress_receives_every_snapshot() {
        let (tx, rx) = mpsc::channel();
        let mut pq = PrequentialEvaluator::new(
            Box::new(OracleLearner),
            alternating(30),
            evaluator(),
            None,
            None,
            10,
        )
        .unwrap()
        .with_progress(tx);
        pq.run().unwrap();
        let received: Vec<Snapshot> = rx.try_iter().collect();
        assert_eq!(received.len(), pq.curve().len());
        assert_eq!(received.last().unwrap().instances_seen, 30);
    }

    #[test]
    fn hoeffding_tree_learns_sea_prequentially() {
        let tree = HoeffdingTree::new(HoeffdingTreeParams {
            leaf_prediction: LeafPredictionChoice::NBAdaptive(NoParams::default()),
            ..HoeffdingTreeParams::default()
        })
        .unwrap();
        let stream = SeaGenerator::new(SeaFunction::F1, false, 0, Some(20_000), 1).unwrap();
        let mut pq = PrequentialEvaluator::new(
            Box::new(tree),
            Box::new(stream),
            evaluator(),
            None,
            None,
            5_000,
        )
        .unwrap();
        pq.run().unwrap();
        let last = pq.curve().latest().unwrap();
        assert_eq!(last.instances_seen, 20_000);
        assert!(last.accuracy > 0.8, "accuracy {}", last.accuracy);
        assert!(last.model_bytes > 0);
    }
}
