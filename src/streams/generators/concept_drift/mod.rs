mod concept_drift_stream;

pub use concept_drift_stream::ConceptDriftStream;
