use crate::core::estimators::TargetStats;
use crate::core::instances::{FeatureKind, FeatureValue, Label};
use crate::learners::attribute_observers::{NominalAttributeObserver, NumericAttributeObserver};
use crate::learners::conditional_tests::AttributeSplitSuggestion;
use crate::learners::hoeffding_tree::split_criteria::SplitCriterion;

/// Per-feature sufficient statistics held by an active leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeObserver {
    Nominal(NominalAttributeObserver),
    Numeric(NumericAttributeObserver),
}

impl AttributeObserver {
    pub fn for_kind(kind: FeatureKind, max_bins: usize) -> Self {
        match kind {
            FeatureKind::Nominal => AttributeObserver::Nominal(NominalAttributeObserver::new()),
            FeatureKind::Numeric => {
                AttributeObserver::Numeric(NumericAttributeObserver::new(max_bins))
            }
        }
    }

    pub fn kind(&self) -> FeatureKind {
        match self {
            AttributeObserver::Nominal(_) => FeatureKind::Nominal,
            AttributeObserver::Numeric(_) => FeatureKind::Numeric,
        }
    }

    /// Values of the other kind are ignored.
    pub fn observe(&mut self, value: FeatureValue, label: Label, weight: f64) {
        match (self, value) {
            (AttributeObserver::Nominal(o), FeatureValue::Nominal(v)) => o.observe(v, label, weight),
            (AttributeObserver::Numeric(o), FeatureValue::Numeric(v)) => o.observe(v, label, weight),
            _ => {}
        }
    }

    pub fn merge(&mut self, other: &AttributeObserver) {
        match (self, other) {
            (AttributeObserver::Nominal(a), AttributeObserver::Nominal(b)) => a.merge(b),
            (AttributeObserver::Numeric(a), AttributeObserver::Numeric(b)) => a.merge(b),
            _ => debug_assert!(false, "merging observers of different kinds"),
        }
    }

    pub fn best_split_suggestion(
        &self,
        criterion: &dyn SplitCriterion,
        pre_split: &TargetStats,
        feature_id: usize,
        binary_only: bool,
    ) -> Option<AttributeSplitSuggestion> {
        match self {
            AttributeObserver::Nominal(o) => {
                o.best_split_suggestion(criterion, pre_split, feature_id, binary_only)
            }
            AttributeObserver::Numeric(o) => o.best_split_suggestion(criterion, pre_split, feature_id),
        }
    }

    pub fn probability_of_value_given_class(
        &self,
        value: FeatureValue,
        class_index: usize,
    ) -> Option<f64> {
        match (self, value) {
            (AttributeObserver::Nominal(o), FeatureValue::Nominal(v)) => {
                o.probability_of_value_given_class(v, class_index)
            }
            (AttributeObserver::Numeric(o), FeatureValue::Numeric(v)) => {
                o.probability_of_value_given_class(v, class_index)
            }
            _ => None,
        }
    }

    pub fn byte_size(&self) -> usize {
        match self {
            AttributeObserver::Nominal(o) => o.byte_size(),
            AttributeObserver::Numeric(o) => o.byte_size(),
        }
    }
}
