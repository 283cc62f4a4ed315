mod basic_classification_evaluator;
mod basic_regression_evaluator;
mod performance_evaluator;

pub use basic_classification_evaluator::BasicClassificationEvaluator;
pub use basic_regression_evaluator::BasicRegressionEvaluator;
pub use performance_evaluator::{PerformanceEvaluator, PerformanceEvaluatorExt};
