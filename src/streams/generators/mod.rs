mod concept_drift;
mod sea;
mod sine;

pub use concept_drift::ConceptDriftStream;
pub use sea::{SeaFunction, SeaGenerator};
pub use sine::{SineFunction, SineGenerator};
