use crate::evaluation::estimators::Estimator;

/// Weighted running mean: `sum(w * v) / sum(w)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicEstimator {
    weight: f64,
    sum: f64,
}

impl Estimator for BasicEstimator {
    #[inline]
    fn add(&mut self, value: f64, weight: f64) {
        if value.is_nan() || weight <= 0.0 {
            return;
        }
        self.weight += weight;
        self.sum += value * weight;
    }

    #[inline]
    fn estimation(&self) -> f64 {
        if self.weight > 0.0 {
            self.sum / self.weight
        } else {
            f64::NAN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_mean_ignores_nan() {
        let mut e = BasicEstimator::default();
        assert!(e.estimation().is_nan());
        e.add(1.0, 3.0);
        e.add(0.0, 1.0);
        e.add(f64::NAN, 10.0);
        assert!((e.estimation() - 0.75).abs() < 1e-12);
    }
}
