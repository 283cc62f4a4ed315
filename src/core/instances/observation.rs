use crate::core::instances::{FeatureValue, Instance, Label};
use std::collections::BTreeMap;

/// Sparse, immutable observation keyed by feature id.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    features: BTreeMap<usize, FeatureValue>,
    label: Option<Label>,
    weight: f64,
}

impl Observation {
    pub fn new<I>(features: I, label: Option<Label>) -> Self
    where
        I: IntoIterator<Item = (usize, FeatureValue)>,
    {
        Self {
            features: features.into_iter().collect(),
            label,
            weight: 1.0,
        }
    }

    /// Numeric features laid out densely from id 0.
    pub fn numeric(values: &[f64], label: Option<Label>) -> Self {
        Self::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (i, FeatureValue::Numeric(*v))),
            label,
        )
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn without_label(mut self) -> Self {
        self.label = None;
        self
    }
}

impl Instance for Observation {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn label(&self) -> Option<Label> {
        self.label
    }

    fn feature(&self, feature_id: usize) -> Option<FeatureValue> {
        self.features.get(&feature_id).copied()
    }

    fn features(&self) -> Vec<(usize, FeatureValue)> {
        self.features.iter().map(|(k, v)| (*k, *v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_lays_out_dense_ids() {
        let obs = Observation::numeric(&[0.5, 2.0], Some(Label::Class(1)));
        assert_eq!(obs.feature(1), Some(FeatureValue::Numeric(2.0)));
        assert_eq!(obs.feature(2), None);
        assert_eq!(obs.weight(), 1.0);
        assert_eq!(obs.label(), Some(Label::Class(1)));
    }

    #[test]
    fn features_are_ordered_by_id() {
        let obs = Observation::new(
            [(7, FeatureValue::Nominal(2)), (1, FeatureValue::Numeric(0.1))],
            None,
        )
        .with_weight(3.0);
        let ids: Vec<usize> = obs.features().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 7]);
        assert_eq!(obs.weight(), 3.0);
    }
}
