use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{FeatureKind, FeatureValue, Instance, Label};
use std::io::Error;
use std::sync::Arc;

/// Header-described instance storing every attribute, class included, as
/// `f64`. Nominal values hold the category index and NaN marks a missing value.
pub struct DenseInstance {
    pub header: Arc<InstanceHeader>,
    pub values: Vec<f64>,
    pub weight: f64,
}

impl DenseInstance {
    pub fn new(header: Arc<InstanceHeader>, values: Vec<f64>, weight: f64) -> DenseInstance {
        DenseInstance {
            header,
            values,
            weight,
        }
    }

    pub fn set_weight(&mut self, new_value: f64) -> Result<(), Error> {
        if new_value < 0.0 {
            Err(Error::new(
                std::io::ErrorKind::InvalidInput,
                "Weight cannot be negative",
            ))
        } else {
            self.weight = new_value;
            Ok(())
        }
    }

    pub fn value_at_index(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn set_value_at_index(&mut self, index: usize, new_value: f64) -> Result<(), Error> {
        if index < self.values.len() {
            self.values[index] = new_value;
            Ok(())
        } else {
            Err(Error::new(
                std::io::ErrorKind::InvalidInput,
                "Index out of bounds",
            ))
        }
    }

    pub fn class_value(&self) -> Option<f64> {
        self.values
            .get(self.header.class_index())
            .copied()
            .filter(|v| !v.is_nan())
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.clone()
    }

    pub fn header(&self) -> &InstanceHeader {
        &self.header
    }
}

impl Instance for DenseInstance {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn label(&self) -> Option<Label> {
        let value = self.class_value()?;
        let class_attribute = self.header.class_attribute()?;
        match class_attribute.kind() {
            FeatureKind::Nominal if value >= 0.0 => Some(Label::Class(value as usize)),
            FeatureKind::Nominal => None,
            FeatureKind::Numeric => Some(Label::Numeric(value)),
        }
    }

    fn feature(&self, feature_id: usize) -> Option<FeatureValue> {
        if feature_id >= self.header.number_of_features() {
            return None;
        }
        let index = self.header.feature_id_to_attribute_index(feature_id);
        let value = self.value_at_index(index)?;
        if value.is_nan() {
            return None;
        }
        match self.header.attribute_at_index(index)?.kind() {
            FeatureKind::Numeric => Some(FeatureValue::Numeric(value)),
            FeatureKind::Nominal if value >= 0.0 => Some(FeatureValue::Nominal(value as usize)),
            FeatureKind::Nominal => None,
        }
    }

    fn features(&self) -> Vec<(usize, FeatureValue)> {
        (0..self.header.number_of_features())
            .filter_map(|id| self.feature(id).map(|v| (id, v)))
            .collect()
    }
}
