use crate::core::estimators::TargetStats;
use crate::core::instances::{FeatureValue, Instance, Label};
use crate::learners::attribute_observers::AttributeObserver;
use crate::learners::bayes::NaiveBayes;
use crate::learners::hoeffding_tree::LeafPredictionOption;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafStatus {
    Active,
    /// Deactivated under memory pressure: keeps target statistics and
    /// counters, drops attribute observers and never splits.
    Inactive,
}

/// A leaf and its local predictor.
///
/// `observed` holds what reached this leaf and alone drives split decisions.
/// `inherited` is the share of the parent's statistics the split assigned to
/// this branch; it only seeds predictions.
#[derive(Debug, Clone)]
pub struct LearningNode {
    observed: TargetStats,
    inherited: TargetStats,
    attribute_observers: BTreeMap<usize, AttributeObserver>,
    observed_count: f64,
    last_split_check_count: f64,
    status: LeafStatus,
    depth: usize,
    mc_correct_weight: f64,
    nb_correct_weight: f64,
}

impl LearningNode {
    pub fn new(inherited: TargetStats, depth: usize) -> Self {
        Self {
            observed: inherited.empty_like(),
            inherited,
            attribute_observers: BTreeMap::new(),
            observed_count: 0.0,
            last_split_check_count: 0.0,
            status: LeafStatus::Active,
            depth,
            mc_correct_weight: 0.0,
            nb_correct_weight: 0.0,
        }
    }

    pub fn observed_stats(&self) -> &TargetStats {
        &self.observed
    }

    pub fn inherited_stats(&self) -> &TargetStats {
        &self.inherited
    }

    /// Inherited and observed statistics together.
    pub fn prediction_stats(&self) -> TargetStats {
        let mut stats = self.inherited.clone();
        stats.merge(&self.observed);
        stats
    }

    pub fn observed_count(&self) -> f64 {
        self.observed_count
    }

    pub fn last_split_check_count(&self) -> f64 {
        self.last_split_check_count
    }

    pub fn set_last_split_check_count(&mut self, count: f64) {
        self.last_split_check_count = count;
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn status(&self) -> LeafStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == LeafStatus::Active
    }

    pub fn attribute_observers(&self) -> &BTreeMap<usize, AttributeObserver> {
        &self.attribute_observers
    }

    pub fn learn_from_instance(
        &mut self,
        instance: &dyn Instance,
        features: &[(usize, FeatureValue)],
        label: Label,
        weight: f64,
        leaf_prediction: LeafPredictionOption,
        max_bins: usize,
    ) {
        if self.is_active() && leaf_prediction == LeafPredictionOption::AdaptiveNaiveBayes {
            if let Label::Class(true_class) = label {
                let stats = self.prediction_stats();
                if stats.majority_class() == Some(true_class) {
                    self.mc_correct_weight += weight;
                }
                let nb_votes = NaiveBayes::do_naive_bayes_prediction(
                    instance,
                    &stats,
                    &self.attribute_observers,
                );
                if max_index(&nb_votes) == Some(true_class) {
                    self.nb_correct_weight += weight;
                }
            }
        }

        self.observed.add(label, weight);
        self.observed_count += weight;

        if self.is_active() {
            for (feature_id, value) in features {
                self.attribute_observers
                    .entry(*feature_id)
                    .or_insert_with(|| AttributeObserver::for_kind(value.kind(), max_bins))
                    .observe(*value, label, weight);
            }
        }
    }

    /// Whether `get_class_votes` answers with naive Bayes.
    pub fn uses_naive_bayes(
        &self,
        leaf_prediction: LeafPredictionOption,
        nb_threshold: usize,
    ) -> bool {
        if self.attribute_observers.is_empty() {
            return false;
        }
        match leaf_prediction {
            LeafPredictionOption::MajorityClass | LeafPredictionOption::Mean => false,
            LeafPredictionOption::NaiveBayes => self.observed_count >= nb_threshold as f64,
            LeafPredictionOption::AdaptiveNaiveBayes => {
                self.mc_correct_weight <= self.nb_correct_weight
            }
        }
    }

    pub fn get_class_votes(
        &self,
        instance: &dyn Instance,
        leaf_prediction: LeafPredictionOption,
        nb_threshold: usize,
    ) -> Vec<f64> {
        let stats = self.prediction_stats();
        if self.uses_naive_bayes(leaf_prediction, nb_threshold) {
            NaiveBayes::do_naive_bayes_prediction(instance, &stats, &self.attribute_observers)
        } else {
            stats.class_weights().to_vec()
        }
    }

    /// Expected gain from keeping this leaf active: observed weight times
    /// impurity.
    pub fn calculate_promise(&self) -> f64 {
        self.observed_count * self.observed.impurity()
    }

    pub fn deactivate(&mut self) {
        self.status = LeafStatus::Inactive;
        self.attribute_observers = BTreeMap::new();
    }

    pub fn activate(&mut self) {
        self.status = LeafStatus::Active;
    }

    pub fn calc_byte_size(&self) -> usize {
        size_of::<Self>() + self.observed.byte_size() + self.inherited.byte_size()
            - 2 * size_of::<TargetStats>()
            + self
                .attribute_observers
                .values()
                .map(|o| size_of::<usize>() + o.byte_size())
                .sum::<usize>()
    }
}

/// Index of the largest positive vote, lowest index on ties.
pub(crate) fn max_index(votes: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in votes.iter().enumerate() {
        if v > 0.0 && best.is_none_or(|(_, bv)| v > bv) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}
