use crate::core::instances::Instance;
use crate::evaluation::Measurement;
use std::collections::BTreeMap;

/// Online evaluator fed with one labelled example and the learner's votes
/// for it at a time.
pub trait PerformanceEvaluator {
    fn reset(&mut self);

    /// Votes are one score per class for classifiers and `[prediction]` for
    /// regressors. Unlabelled examples and empty votes are skipped.
    fn add_result(&mut self, example: &dyn Instance, votes: Vec<f64>);

    fn performance(&self) -> Vec<Measurement>;
}

pub trait PerformanceEvaluatorExt {
    /// Requested metrics in order, `None` for names the evaluator lacks.
    fn metrics<'a, I>(&self, names: I) -> Vec<(String, Option<f64>)>
    where
        I: IntoIterator<Item = &'a str>;

    fn metric(&self, name: &str) -> Option<f64> {
        self.metrics([name]).into_iter().next().and_then(|(_, v)| v)
    }
}

impl<T: PerformanceEvaluator + ?Sized> PerformanceEvaluatorExt for T {
    fn metrics<'a, I>(&self, names: I) -> Vec<(String, Option<f64>)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let by_name: BTreeMap<_, _> = self
            .performance()
            .into_iter()
            .map(|m| (m.name, m.value))
            .collect();
        names
            .into_iter()
            .map(|n| (n.to_string(), by_name.get(n).copied()))
            .collect()
    }
}
