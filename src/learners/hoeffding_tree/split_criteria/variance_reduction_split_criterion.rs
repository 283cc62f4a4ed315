use crate::core::estimators::TargetStats;
use crate::learners::hoeffding_tree::split_criteria::SplitCriterion;
use crate::learners::hoeffding_tree::split_criteria::split_criterion::num_subsets_greater_than_frac;

/// Fraction of the parent's target variance removed by the split, in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct VarianceReductionSplitCriterion {
    min_branch_fraction: f64,
}

impl VarianceReductionSplitCriterion {
    pub fn new(min_branch_fraction: f64) -> Self {
        Self {
            min_branch_fraction,
        }
    }
}

impl Default for VarianceReductionSplitCriterion {
    fn default() -> Self {
        Self::new(0.01)
    }
}

impl SplitCriterion for VarianceReductionSplitCriterion {
    fn get_range_of_merit(&self, _pre_split: &TargetStats) -> f64 {
        1.0
    }

    fn get_merit_of_split(&self, pre_split: &TargetStats, post_split: &[TargetStats]) -> f64 {
        if num_subsets_greater_than_frac(post_split, self.min_branch_fraction) < 2 {
            return f64::NEG_INFINITY;
        }
        let pre_variance = pre_split.variance();
        if pre_variance <= 0.0 {
            return 0.0;
        }
        let total: f64 = post_split.iter().map(TargetStats::total_weight).sum();
        let post_variance: f64 = post_split
            .iter()
            .map(|d| d.total_weight() / total * d.variance())
            .sum();
        ((pre_variance - post_variance) / pre_variance).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instances::Label;

    fn moments(values: &[f64]) -> TargetStats {
        let mut stats = TargetStats::moments();
        for v in values {
            stats.add(Label::Numeric(*v), 1.0);
        }
        stats
    }

    #[test]
    fn separating_two_levels_removes_all_variance() {
        let crit = VarianceReductionSplitCriterion::default();
        let pre = moments(&[0.0, 0.0, 10.0, 10.0]);
        let post = [moments(&[0.0, 0.0]), moments(&[10.0, 10.0])];
        assert!((crit.get_merit_of_split(&pre, &post) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn mixed_children_keep_the_variance() {
        let crit = VarianceReductionSplitCriterion::default();
        let pre = moments(&[0.0, 10.0, 0.0, 10.0]);
        let post = [moments(&[0.0, 10.0]), moments(&[0.0, 10.0])];
        assert!(crit.get_merit_of_split(&pre, &post).abs() < 1e-12);
    }
}
