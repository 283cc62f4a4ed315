use crate::core::estimators::TargetStats;
use crate::learners::hoeffding_tree::split_criteria::SplitCriterion;
use crate::learners::hoeffding_tree::split_criteria::split_criterion::num_subsets_greater_than_frac;

/// Entropy reduction, in bits.
#[derive(Debug, Clone)]
pub struct InfoGainSplitCriterion {
    min_branch_fraction: f64,
}

impl InfoGainSplitCriterion {
    pub fn new(min_branch_fraction: f64) -> Self {
        Self {
            min_branch_fraction,
        }
    }

    pub fn compute_entropy(distribution: &[f64]) -> f64 {
        let total: f64 = distribution.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        distribution
            .iter()
            .filter(|&&w| w > 0.0)
            .map(|&w| {
                let p = w / total;
                -p * p.log2()
            })
            .sum()
    }

    fn compute_weighted_entropy(post_split: &[TargetStats]) -> f64 {
        let total: f64 = post_split.iter().map(TargetStats::total_weight).sum();
        if total <= 0.0 {
            return 0.0;
        }
        post_split
            .iter()
            .map(|d| d.total_weight() / total * Self::compute_entropy(d.class_weights()))
            .sum()
    }
}

impl Default for InfoGainSplitCriterion {
    fn default() -> Self {
        Self::new(0.01)
    }
}

impl SplitCriterion for InfoGainSplitCriterion {
    fn get_range_of_merit(&self, pre_split: &TargetStats) -> f64 {
        let num_classes = pre_split.class_weights().len().max(2);
        (num_classes as f64).log2()
    }

    fn get_merit_of_split(&self, pre_split: &TargetStats, post_split: &[TargetStats]) -> f64 {
        if num_subsets_greater_than_frac(post_split, self.min_branch_fraction) < 2 {
            return f64::NEG_INFINITY;
        }
        Self::compute_entropy(pre_split.class_weights()) - Self::compute_weighted_entropy(post_split)
    }
}
