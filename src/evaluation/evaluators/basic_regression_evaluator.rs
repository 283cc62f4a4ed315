use crate::core::instances::{Instance, Label};
use crate::evaluation::{Estimator, Measurement, PerformanceEvaluator};

/// Online regression evaluator reporting weighted mean absolute error and
/// root mean squared error. The prediction is the first vote.
#[derive(Default)]
pub struct BasicRegressionEvaluator<E: Estimator + Default> {
    absolute_error: E,
    squared_error: E,
}

impl<E: Estimator + Default> BasicRegressionEvaluator<E> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: Estimator + Default> PerformanceEvaluator for BasicRegressionEvaluator<E> {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn add_result(&mut self, example: &dyn Instance, votes: Vec<f64>) {
        let Some(Label::Numeric(y)) = example.label() else {
            return;
        };
        let Some(&prediction) = votes.first() else {
            return;
        };
        let error = prediction - y;
        self.absolute_error.add(error.abs(), example.weight());
        self.squared_error.add(error * error, example.weight());
    }

    fn performance(&self) -> Vec<Measurement> {
        vec![
            Measurement::new("mae", self.absolute_error.estimation()),
            Measurement::new("rmse", self.squared_error.estimation().sqrt()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instances::Observation;
    use crate::evaluation::{BasicEstimator, PerformanceEvaluatorExt};

    #[test]
    fn reports_mae_and_rmse() {
        let mut ev = BasicRegressionEvaluator::<BasicEstimator>::new();
        ev.add_result(&Observation::numeric(&[0.0], Some(Label::Numeric(1.0))), vec![2.0]);
        ev.add_result(&Observation::numeric(&[0.0], Some(Label::Numeric(1.0))), vec![-2.0]);
        assert!((ev.metric("mae").unwrap() - 2.0).abs() < 1e-12);
        assert!((ev.metric("rmse").unwrap() - 5.0f64.sqrt()).abs() < 1e-12);

        ev.add_result(&Observation::numeric(&[0.0], Some(Label::Class(1))), vec![0.0]);
        ev.add_result(&Observation::numeric(&[0.0], Some(Label::Numeric(3.0))), vec![]);
        assert!((ev.metric("mae").unwrap() - 2.0).abs() < 1e-12);

        ev.reset();
        assert!(ev.metric("rmse").unwrap().is_nan());
    }
}
