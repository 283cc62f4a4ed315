use crate::core::estimators::TargetStats;
use crate::learners::hoeffding_tree::instance_conditional_test::InstanceConditionalTest;
use std::cmp::Ordering;

/// A candidate split: the test (or `None` for "do not split"), the target
/// statistics each branch would start with, and the criterion's merit.
#[derive(Debug, Clone)]
pub struct AttributeSplitSuggestion {
    split_test: Option<InstanceConditionalTest>,
    resulting_stats: Vec<TargetStats>,
    merit: f64,
}

impl AttributeSplitSuggestion {
    pub fn new(
        split_test: Option<InstanceConditionalTest>,
        resulting_stats: Vec<TargetStats>,
        merit: f64,
    ) -> Self {
        Self {
            split_test,
            resulting_stats,
            merit,
        }
    }

    /// The pre-pruning candidate: keep the leaf as it is.
    pub fn null_split(pre_split: &TargetStats) -> Self {
        Self::new(None, vec![pre_split.clone()], 0.0)
    }

    pub fn get_split_test(&self) -> Option<&InstanceConditionalTest> {
        self.split_test.as_ref()
    }

    pub fn get_resulting_stats(&self) -> &[TargetStats] {
        &self.resulting_stats
    }

    pub fn get_merit(&self) -> f64 {
        self.merit
    }

    pub fn number_of_splits(&self) -> usize {
        self.resulting_stats.len()
    }

    pub fn resulting_stats_from_split(&self, split_index: usize) -> Option<&TargetStats> {
        self.resulting_stats.get(split_index)
    }

    pub fn feature_id(&self) -> Option<usize> {
        self.split_test.as_ref().map(InstanceConditionalTest::feature_id)
    }

    /// Ranking order: higher merit first, then lower feature id, the null
    /// split after every real split of equal merit.
    pub fn rank(&self, other: &Self) -> Ordering {
        other
            .merit
            .total_cmp(&self.merit)
            .then_with(|| match (self.feature_id(), other.feature_id()) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    }

    /// Branch that receives instances the test cannot route: the heaviest one.
    pub fn default_branch(&self) -> usize {
        let mut best = 0;
        for (i, stats) in self.resulting_stats.iter().enumerate() {
            if stats.total_weight() > self.resulting_stats[best].total_weight() {
                best = i;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learners::hoeffding_tree::instance_conditional_test::NumericAttributeBinaryTest;

    fn numeric(feature_id: usize, merit: f64) -> AttributeSplitSuggestion {
        AttributeSplitSuggestion::new(
            Some(InstanceConditionalTest::NumericBinary(
                NumericAttributeBinaryTest::new(feature_id, 0.0),
            )),
            vec![
                TargetStats::Classes(vec![1.0, 0.0]),
                TargetStats::Classes(vec![0.0, 3.0]),
            ],
            merit,
        )
    }

    #[test]
    fn ranking_prefers_merit_then_lower_feature_then_real_splits() {
        let null = AttributeSplitSuggestion::null_split(&TargetStats::Classes(vec![1.0, 3.0]));
        let mut all = vec![numeric(4, 0.0), null, numeric(2, 0.3), numeric(1, 0.3)];
        all.sort_by(|a, b| a.rank(b));
        let ids: Vec<Option<usize>> = all.iter().map(|s| s.feature_id()).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(4), None]);
    }

    #[test]
    fn default_branch_is_heaviest() {
        assert_eq!(numeric(0, 0.1).default_branch(), 1);
    }
}
