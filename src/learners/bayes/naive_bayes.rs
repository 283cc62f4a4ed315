use crate::core::estimators::TargetStats;
use crate::core::instances::Instance;
use crate::learners::attribute_observers::AttributeObserver;
use std::collections::BTreeMap;

/// Smallest likelihood a single feature may contribute, so that one
/// degenerate density cannot zero out a class.
const MIN_LIKELIHOOD: f64 = 1e-300;

pub struct NaiveBayes;

impl NaiveBayes {
    /// Normalised class votes `P(c) * prod_f P(x_f | c)` computed in log space.
    ///
    /// Only features with an observer contribute. Classes never observed get
    /// a vote of zero.
    pub fn do_naive_bayes_prediction(
        instance: &dyn Instance,
        observed_class_distribution: &TargetStats,
        attribute_observers: &BTreeMap<usize, AttributeObserver>,
    ) -> Vec<f64> {
        let class_weights = observed_class_distribution.class_weights();
        let total: f64 = class_weights.iter().sum();
        if total <= 0.0 {
            return vec![0.0; class_weights.len()];
        }

        let mut log_votes = vec![f64::NEG_INFINITY; class_weights.len()];
        for (class_index, &class_weight) in class_weights.iter().enumerate() {
            if class_weight <= 0.0 {
                continue;
            }
            let mut log_vote = (class_weight / total).ln();
            for (feature_id, value) in instance.features() {
                let Some(observer) = attribute_observers.get(&feature_id) else {
                    continue;
                };
                if let Some(p) = observer.probability_of_value_given_class(value, class_index) {
                    log_vote += p.max(MIN_LIKELIHOOD).ln();
                }
            }
            log_votes[class_index] = log_vote;
        }

        let max = log_votes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut votes: Vec<f64> = log_votes
            .iter()
            .map(|&lv| if lv.is_finite() { (lv - max).exp() } else { 0.0 })
            .collect();
        let sum: f64 = votes.iter().sum();
        if sum > 0.0 {
            votes.iter_mut().for_each(|v| *v /= sum);
        }
        votes
    }
}
