mod attribute_observer;
mod nominal_attribute_observer;
mod numeric_attribute_observer;

pub use attribute_observer::AttributeObserver;
pub use nominal_attribute_observer::NominalAttributeObserver;
pub use numeric_attribute_observer::NumericAttributeObserver;
