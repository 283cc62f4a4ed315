use crate::core::instances::FeatureKind;
use std::any::Any;
use std::sync::Arc;

pub trait Attribute: Any + Send + Sync {
    fn name(&self) -> String;

    fn as_any(&self) -> &dyn Any;

    /// Whether values of this attribute are ordered numbers or category indices.
    fn kind(&self) -> FeatureKind;
}

pub type AttributeRef = Arc<dyn Attribute>;
