mod dense_instance;
mod feature_value;
mod instance;
mod observation;

pub use dense_instance::DenseInstance;
pub use feature_value::{FeatureKind, FeatureValue, Label};
pub use instance::Instance;
pub use observation::Observation;
