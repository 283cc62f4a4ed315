use crate::core::attributes::Attribute;
use crate::core::instances::FeatureKind;
use std::any::Any;

#[derive(Debug, Clone)]
pub struct NumericAttribute {
    pub name: String,
}

impl NumericAttribute {
    pub fn new(name: String) -> NumericAttribute {
        NumericAttribute { name }
    }
}

impl Attribute for NumericAttribute {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn kind(&self) -> FeatureKind {
        FeatureKind::Numeric
    }
}
