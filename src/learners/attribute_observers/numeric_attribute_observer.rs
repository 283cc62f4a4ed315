use crate::core::estimators::{GaussianEstimator, TargetStats};
use crate::core::instances::Label;
use crate::learners::conditional_tests::AttributeSplitSuggestion;
use crate::learners::hoeffding_tree::instance_conditional_test::{
    InstanceConditionalTest, NumericAttributeBinaryTest,
};
use crate::learners::hoeffding_tree::split_criteria::SplitCriterion;

#[derive(Debug, Clone, PartialEq)]
struct Bin {
    value: f64,
    weight: f64,
    stats: TargetStats,
}

/// Bounded adaptive histogram over a numeric feature.
///
/// Bins are kept sorted by their mean value. When a new value would exceed
/// `max_bins`, the two adjacent bins with the closest means are merged and
/// every value they hold is thereafter treated as lying at the merged mean.
/// Split thresholds are midpoints between consecutive bin means, so the
/// candidate set is exact while the number of distinct values stays within
/// the budget.
///
/// Per-class Gaussians are kept alongside for naive Bayes leaves.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericAttributeObserver {
    max_bins: usize,
    bins: Vec<Bin>,
    attribute_value_distribution_per_class: Vec<Option<GaussianEstimator>>,
}

impl NumericAttributeObserver {
    pub fn new(max_bins: usize) -> Self {
        Self {
            max_bins: max_bins.max(2),
            bins: Vec::new(),
            attribute_value_distribution_per_class: Vec::new(),
        }
    }

    pub fn number_of_bins(&self) -> usize {
        self.bins.len()
    }

    pub fn max_bins(&self) -> usize {
        self.max_bins
    }

    pub fn observe(&mut self, value: f64, label: Label, weight: f64) {
        if !value.is_finite() || !(weight > 0.0) {
            return;
        }
        let mut stats = TargetStats::for_label(label);
        stats.add(label, weight);
        self.insert_bin(Bin {
            value,
            weight,
            stats,
        });

        if let Label::Class(class_index) = label {
            if class_index >= self.attribute_value_distribution_per_class.len() {
                self.attribute_value_distribution_per_class
                    .resize_with(class_index + 1, || None);
            }
            self.attribute_value_distribution_per_class[class_index]
                .get_or_insert_with(GaussianEstimator::new)
                .add_observation(value, weight);
        }
    }

    pub fn merge(&mut self, other: &NumericAttributeObserver) {
        for bin in &other.bins {
            self.insert_bin(bin.clone());
        }
        if other.attribute_value_distribution_per_class.len()
            > self.attribute_value_distribution_per_class.len()
        {
            self.attribute_value_distribution_per_class
                .resize_with(other.attribute_value_distribution_per_class.len(), || None);
        }
        for (mine, theirs) in self
            .attribute_value_distribution_per_class
            .iter_mut()
            .zip(other.attribute_value_distribution_per_class.iter())
        {
            if let Some(theirs) = theirs {
                mine.get_or_insert_with(GaussianEstimator::new).merge(theirs);
            }
        }
    }

    fn insert_bin(&mut self, bin: Bin) {
        let pos = self.bins.partition_point(|b| b.value < bin.value);
        match self.bins.get_mut(pos) {
            Some(existing) if existing.value == bin.value => {
                existing.weight += bin.weight;
                existing.stats.merge(&bin.stats);
            }
            _ => {
                self.bins.insert(pos, bin);
                if self.bins.len() > self.max_bins {
                    self.merge_closest_bins();
                }
            }
        }
    }

    fn merge_closest_bins(&mut self) {
        let mut closest = 0;
        let mut closest_gap = f64::INFINITY;
        for i in 0..self.bins.len().saturating_sub(1) {
            let gap = self.bins[i + 1].value - self.bins[i].value;
            if gap < closest_gap {
                closest_gap = gap;
                closest = i;
            }
        }
        let right = self.bins.remove(closest + 1);
        let left = &mut self.bins[closest];
        let total = left.weight + right.weight;
        left.value = (left.value * left.weight + right.value * right.weight) / total;
        left.weight = total;
        left.stats.merge(&right.stats);
    }

    /// Best `value <= threshold` split over the bin midpoints; the lowest
    /// threshold wins ties.
    pub fn best_split_suggestion(
        &self,
        criterion: &dyn SplitCriterion,
        pre_split: &TargetStats,
        feature_id: usize,
    ) -> Option<AttributeSplitSuggestion> {
        if self.bins.len() < 2 {
            return None;
        }
        let mut suffix: Vec<TargetStats> = Vec::with_capacity(self.bins.len());
        let mut running = self.bins[0].stats.empty_like();
        for bin in self.bins.iter().rev() {
            running.merge(&bin.stats);
            suffix.push(running.clone());
        }
        suffix.reverse();

        let mut best: Option<AttributeSplitSuggestion> = None;
        let mut prefix = self.bins[0].stats.empty_like();
        for i in 0..self.bins.len() - 1 {
            prefix.merge(&self.bins[i].stats);
            let post_split = vec![prefix.clone(), suffix[i + 1].clone()];
            let merit = criterion.get_merit_of_split(pre_split, &post_split);
            if !merit.is_finite() {
                continue;
            }
            if best.as_ref().is_none_or(|b| merit > b.get_merit()) {
                let threshold = (self.bins[i].value + self.bins[i + 1].value) / 2.0;
                best = Some(AttributeSplitSuggestion::new(
                    Some(InstanceConditionalTest::NumericBinary(
                        NumericAttributeBinaryTest::new(feature_id, threshold),
                    )),
                    post_split,
                    merit,
                ));
            }
        }
        best
    }

    pub fn probability_of_value_given_class(&self, value: f64, class_index: usize) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        match self.attribute_value_distribution_per_class.get(class_index) {
            Some(Some(est)) => Some(est.probability_density(value)),
            _ => None,
        }
    }

    pub fn byte_size(&self) -> usize {
        size_of::<Self>()
            + self
                .bins
                .iter()
                .map(|b| size_of::<Bin>() + b.stats.byte_size() - size_of::<TargetStats>())
                .sum::<usize>()
            + self.attribute_value_distribution_per_class.capacity()
                * size_of::<Option<GaussianEstimator>>()
    }
}
