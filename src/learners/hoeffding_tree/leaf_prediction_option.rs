use crate::config::LeafPredictionChoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafPredictionOption {
    MajorityClass,
    NaiveBayes,
    AdaptiveNaiveBayes,
    Mean,
}

impl From<&LeafPredictionChoice> for LeafPredictionOption {
    fn from(choice: &LeafPredictionChoice) -> Self {
        match choice {
            LeafPredictionChoice::NBAdaptive(_) => LeafPredictionOption::AdaptiveNaiveBayes,
            LeafPredictionChoice::NaiveBayes(_) => LeafPredictionOption::NaiveBayes,
            LeafPredictionChoice::MajorityClass(_) => LeafPredictionOption::MajorityClass,
            LeafPredictionChoice::Mean(_) => LeafPredictionOption::Mean,
        }
    }
}
