use crate::core::estimators::TargetStats;
use crate::core::instances::Label;
use crate::learners::conditional_tests::AttributeSplitSuggestion;
use crate::learners::hoeffding_tree::instance_conditional_test::{
    InstanceConditionalTest, NominalAttributeBinaryTest, NominalAttributeMultiwayTest,
};
use crate::learners::hoeffding_tree::split_criteria::SplitCriterion;
use std::collections::BTreeMap;

/// Exact target statistics per category of a nominal feature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NominalAttributeObserver {
    stats_per_value: BTreeMap<usize, TargetStats>,
}

impl NominalAttributeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, value: usize, label: Label, weight: f64) {
        if !(weight > 0.0) {
            return;
        }
        self.stats_per_value
            .entry(value)
            .or_insert_with(|| TargetStats::for_label(label))
            .add(label, weight);
    }

    pub fn merge(&mut self, other: &NominalAttributeObserver) {
        for (value, stats) in &other.stats_per_value {
            match self.stats_per_value.get_mut(value) {
                Some(mine) => mine.merge(stats),
                None => {
                    self.stats_per_value.insert(*value, stats.clone());
                }
            }
        }
    }

    pub fn number_of_values(&self) -> usize {
        self.stats_per_value.len()
    }

    fn non_empty_values(&self) -> impl Iterator<Item = (&usize, &TargetStats)> {
        self.stats_per_value
            .iter()
            .filter(|(_, stats)| stats.total_weight() > 0.0)
    }

    pub fn best_split_suggestion(
        &self,
        criterion: &dyn SplitCriterion,
        pre_split: &TargetStats,
        feature_id: usize,
        binary_only: bool,
    ) -> Option<AttributeSplitSuggestion> {
        if self.non_empty_values().count() < 2 {
            return None;
        }
        if binary_only {
            return self.best_binary_suggestion(criterion, pre_split, feature_id);
        }
        let categories: Vec<usize> = self.non_empty_values().map(|(v, _)| *v).collect();
        let post_split: Vec<TargetStats> =
            self.non_empty_values().map(|(_, s)| s.clone()).collect();
        let merit = criterion.get_merit_of_split(pre_split, &post_split);
        if !merit.is_finite() {
            return None;
        }
        Some(AttributeSplitSuggestion::new(
            Some(InstanceConditionalTest::NominalMultiway(
                NominalAttributeMultiwayTest::new(feature_id, categories),
            )),
            post_split,
            merit,
        ))
    }

    fn best_binary_suggestion(
        &self,
        criterion: &dyn SplitCriterion,
        pre_split: &TargetStats,
        feature_id: usize,
    ) -> Option<AttributeSplitSuggestion> {
        let mut best: Option<AttributeSplitSuggestion> = None;
        for (value, stats) in self.non_empty_values() {
            let mut rest = stats.empty_like();
            for (other, other_stats) in self.non_empty_values() {
                if other != value {
                    rest.merge(other_stats);
                }
            }
            let post_split = vec![stats.clone(), rest];
            let merit = criterion.get_merit_of_split(pre_split, &post_split);
            if !merit.is_finite() {
                continue;
            }
            if best.as_ref().is_none_or(|b| merit > b.get_merit()) {
                best = Some(AttributeSplitSuggestion::new(
                    Some(InstanceConditionalTest::NominalBinary(
                        NominalAttributeBinaryTest::new(feature_id, *value),
                    )),
                    post_split,
                    merit,
                ));
            }
        }
        best
    }

    /// Laplace-smoothed `P(value | class)`.
    pub fn probability_of_value_given_class(&self, value: usize, class_index: usize) -> Option<f64> {
        let class_weight = |stats: &TargetStats| {
            stats.class_weights().get(class_index).copied().unwrap_or(0.0)
        };
        let total: f64 = self.stats_per_value.values().map(class_weight).sum();
        let value_weight = self.stats_per_value.get(&value).map_or(0.0, class_weight);
        let num_values = self.stats_per_value.len() as f64 + 1.0;
        Some((value_weight + 1.0) / (total + num_values))
    }

    pub fn byte_size(&self) -> usize {
        size_of::<Self>()
            + self
                .stats_per_value
                .values()
                .map(|s| size_of::<usize>() + s.byte_size())
                .sum::<usize>()
    }
}
