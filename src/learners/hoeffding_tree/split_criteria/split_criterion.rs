use crate::core::estimators::TargetStats;

/// Scores a candidate partition of a node's target statistics.
///
/// Merits are gains: higher is better and the null split scores 0. A merit
/// of `f64::NEG_INFINITY` marks a partition that must not be used.
pub trait SplitCriterion: Send + Sync {
    /// Width of the interval merits can fall in, the `R` of the Hoeffding bound.
    fn get_range_of_merit(&self, pre_split: &TargetStats) -> f64;

    fn get_merit_of_split(&self, pre_split: &TargetStats, post_split: &[TargetStats]) -> f64;
}

/// Number of branches holding more than `min_frac` of the total weight.
pub(crate) fn num_subsets_greater_than_frac(post_split: &[TargetStats], min_frac: f64) -> usize {
    let weights: Vec<f64> = post_split.iter().map(TargetStats::total_weight).collect();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return 0;
    }
    weights.iter().filter(|&&w| w / total > min_frac).count()
}
