use crate::core::instances::{Instance, Label};
use crate::evaluation::{Estimator, Measurement, PerformanceEvaluator};

/// Online classification evaluator.
///
/// Tracks weighted accuracy, the marginals of predicted and true classes
/// for Cohen's kappa, and two baselines: the no-change classifier (last
/// true class) for kappa-temporal and the running majority class for
/// kappa-M. Macro precision, recall and F1 are reported when enabled.
pub struct BasicClassificationEvaluator<E: Estimator + Default> {
    correct: E,
    predicted_marginal: Vec<E>,
    true_marginal: Vec<E>,
    precision: Vec<E>,
    recall: Vec<E>,
    no_change_correct: E,
    majority_correct: E,
    last_true_class: Option<usize>,
    total_weight: f64,
    show_precision_recall: bool,
}

impl<E: Estimator + Default> BasicClassificationEvaluator<E> {
    pub fn new(num_classes: usize) -> Self {
        let mut evaluator = Self {
            correct: E::default(),
            predicted_marginal: Vec::new(),
            true_marginal: Vec::new(),
            precision: Vec::new(),
            recall: Vec::new(),
            no_change_correct: E::default(),
            majority_correct: E::default(),
            last_true_class: None,
            total_weight: 0.0,
            show_precision_recall: false,
        };
        evaluator.grow_to(num_classes);
        evaluator
    }

    pub fn with_precision_recall(mut self, show: bool) -> Self {
        self.show_precision_recall = show;
        self
    }

    pub fn num_classes(&self) -> usize {
        self.true_marginal.len()
    }

    fn grow_to(&mut self, k: usize) {
        for v in [
            &mut self.predicted_marginal,
            &mut self.true_marginal,
            &mut self.precision,
            &mut self.recall,
        ] {
            while v.len() < k {
                v.push(E::default());
            }
        }
    }

    /// Highest finite vote, lowest index on ties.
    fn argmax(votes: &[f64]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &x) in votes.iter().enumerate() {
            if x.is_finite() && best.is_none_or(|(_, b)| x > b) {
                best = Some((i, x));
            }
        }
        best.map(|(i, _)| i)
    }

    fn majority_class(&self) -> Option<usize> {
        let estimates: Vec<f64> = self.true_marginal.iter().map(E::estimation).collect();
        Self::argmax(&estimates)
    }

    fn kappa_against(p_o: f64, baseline: f64) -> f64 {
        let d = 1.0 - baseline;
        if d.abs() > f64::EPSILON {
            (p_o - baseline) / d
        } else {
            f64::NAN
        }
    }
}

impl<E: Estimator + Default> PerformanceEvaluator for BasicClassificationEvaluator<E> {
    fn reset(&mut self) {
        *self = Self::new(self.num_classes()).with_precision_recall(self.show_precision_recall);
    }

    fn add_result(&mut self, example: &dyn Instance, votes: Vec<f64>) {
        let Some(Label::Class(y)) = example.label() else {
            return;
        };
        let w = example.weight();
        if w.is_nan() || w <= 0.0 {
            return;
        }
        let Some(yhat) = Self::argmax(&votes) else {
            return;
        };
        self.grow_to(votes.len().max(y + 1));

        self.total_weight += w;
        let hit = |ok: bool| if ok { 1.0 } else { 0.0 };
        self.correct.add(hit(yhat == y), w);

        if let Some(prev) = self.last_true_class {
            self.no_change_correct.add(hit(prev == y), w);
        }
        if let Some(majority) = self.majority_class() {
            self.majority_correct.add(hit(majority == y), w);
        }

        for (c, est) in self.predicted_marginal.iter_mut().enumerate() {
            est.add(hit(c == yhat), w);
        }
        for (c, est) in self.true_marginal.iter_mut().enumerate() {
            est.add(hit(c == y), w);
        }
        self.precision[yhat].add(hit(yhat == y), w);
        self.recall[y].add(hit(yhat == y), w);

        self.last_true_class = Some(y);
    }

    fn performance(&self) -> Vec<Measurement> {
        let p_o = self.correct.estimation();
        let mut m = vec![Measurement::new("accuracy", p_o)];

        if self.total_weight <= 0.0 {
            m.extend([
                Measurement::new("kappa", 0.0),
                Measurement::new("kappa_t", 0.0),
                Measurement::new("kappa_m", 0.0),
            ]);
            return m;
        }

        let p_e: f64 = self
            .predicted_marginal
            .iter()
            .zip(&self.true_marginal)
            .map(|(p, t)| p.estimation() * t.estimation())
            .filter(|x| x.is_finite())
            .sum();
        m.push(Measurement::new("kappa", Self::kappa_against(p_o, p_e)));
        m.push(Measurement::new(
            "kappa_t",
            Self::kappa_against(p_o, self.no_change_correct.estimation()),
        ));
        m.push(Measurement::new(
            "kappa_m",
            Self::kappa_against(p_o, self.majority_correct.estimation()),
        ));

        if self.show_precision_recall {
            let macro_avg = |v: &[E]| {
                let finite: Vec<f64> = v
                    .iter()
                    .map(E::estimation)
                    .filter(|x| x.is_finite())
                    .collect();
                if finite.is_empty() {
                    f64::NAN
                } else {
                    finite.iter().sum::<f64>() / finite.len() as f64
                }
            };
            let precision = macro_avg(&self.precision);
            let recall = macro_avg(&self.recall);
            let f1 = if precision + recall > f64::EPSILON {
                2.0 * precision * recall / (precision + recall)
            } else {
                f64::NAN
            };
            m.push(Measurement::new("precision", precision));
            m.push(Measurement::new("recall", recall));
            m.push(Measurement::new("f1", f1));
        }
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instances::Observation;
    use crate::evaluation::{BasicEstimator, PerformanceEvaluatorExt};

    type Eval = BasicClassificationEvaluator<BasicEstimator>;

    fn inst(y: usize, w: f64) -> Observation {
        Observation::numeric(&[0.0], Some(Label::Class(y))).with_weight(w)
    }

    fn votes(pred: usize) -> Vec<f64> {
        if pred == 0 { vec![1.0, 0.0] } else { vec![0.0, 1.0] }
    }

    #[test]
    fn empty_evaluator_reports_nan_accuracy_and_zero_kappas() {
        let ev = Eval::new(2);
        assert!(ev.metric("accuracy").unwrap().is_nan());
        assert_eq!(ev.metric("kappa"), Some(0.0));
        assert_eq!(ev.metric("kappa_t"), Some(0.0));
        assert_eq!(ev.metric("kappa_m"), Some(0.0));
        assert_eq!(ev.metric("precision"), None);
    }

    #[test]
    fn perfect_balanced_predictions_give_kappa_one() {
        let mut ev = Eval::new(2).with_precision_recall(true);
        ev.add_result(&inst(0, 1.0), votes(0));
        ev.add_result(&inst(1, 1.0), votes(1));
        assert!((ev.metric("accuracy").unwrap() - 1.0).abs() < 1e-12);
        assert!((ev.metric("kappa").unwrap() - 1.0).abs() < 1e-12);
        assert!((ev.metric("precision").unwrap() - 1.0).abs() < 1e-12);
        assert!((ev.metric("f1").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn chance_level_gives_kappa_zero() {
        let mut ev = Eval::new(2);
        ev.add_result(&inst(0, 1.0), votes(1));
        ev.add_result(&inst(1, 1.0), votes(1));
        assert!(ev.metric("kappa").unwrap().abs() < 1e-12);
    }

    #[test]
    fn accuracy_is_weighted() {
        let mut ev = Eval::new(2);
        ev.add_result(&inst(1, 3.0), votes(1));
        ev.add_result(&inst(0, 1.0), votes(1));
        assert!((ev.metric("accuracy").unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn unusable_results_are_skipped() {
        let mut ev = Eval::new(2);
        ev.add_result(&inst(1, 0.0), votes(1));
        ev.add_result(&inst(1, 1.0), Vec::new());
        ev.add_result(&Observation::numeric(&[0.0], None), votes(0));
        ev.add_result(
            &Observation::numeric(&[0.0], Some(Label::Numeric(1.0))),
            votes(0),
        );
        assert!(ev.metric("accuracy").unwrap().is_nan());
    }

    #[test]
    fn unseen_classes_grow_the_marginals() {
        let mut ev = Eval::new(0);
        ev.add_result(&inst(3, 1.0), vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(ev.num_classes(), 4);
        assert!((ev.metric("accuracy").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reset_clears_metrics() {
        let mut ev = Eval::new(2);
        ev.add_result(&inst(1, 1.0), votes(1));
        ev.reset();
        assert!(ev.metric("accuracy").unwrap().is_nan());
        assert_eq!(ev.metric("kappa"), Some(0.0));
    }
}
