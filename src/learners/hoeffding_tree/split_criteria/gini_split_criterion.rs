use crate::core::estimators::TargetStats;
use crate::learners::hoeffding_tree::split_criteria::SplitCriterion;
use crate::learners::hoeffding_tree::split_criteria::split_criterion::num_subsets_greater_than_frac;

#[derive(Debug, Clone, Default)]
pub struct GiniSplitCriterion {}

impl GiniSplitCriterion {
    pub fn new() -> Self {
        Self {}
    }

    pub fn compute_gini(distribution: &[f64], distribution_sum_of_weights: f64) -> f64 {
        if distribution_sum_of_weights <= 0.0 {
            return 0.0;
        }
        let mut gini = 1.0;
        for w in distribution {
            let rel_freq = w / distribution_sum_of_weights;
            gini -= rel_freq * rel_freq;
        }
        gini
    }
}

impl SplitCriterion for GiniSplitCriterion {
    fn get_range_of_merit(&self, _pre_split: &TargetStats) -> f64 {
        1.0
    }

    fn get_merit_of_split(&self, pre_split: &TargetStats, post_split: &[TargetStats]) -> f64 {
        if num_subsets_greater_than_frac(post_split, 0.0) < 2 {
            return f64::NEG_INFINITY;
        }
        let total_weight: f64 = post_split.iter().map(TargetStats::total_weight).sum();
        let mut weighted_gini = 0.0;
        for dist in post_split {
            let w = dist.total_weight();
            weighted_gini += w / total_weight * Self::compute_gini(dist.class_weights(), w);
        }
        let pre = Self::compute_gini(pre_split.class_weights(), pre_split.total_weight());
        pre - weighted_gini
    }
}
