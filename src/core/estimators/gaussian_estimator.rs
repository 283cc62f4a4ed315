use std::f64::consts::PI;

/// Weighted Gaussian fitted incrementally with Welford's update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GaussianEstimator {
    weight_sum: f64,
    mean: f64,
    variance_sum: f64,
}

impl GaussianEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observation(&mut self, value: f64, weight: f64) {
        if value.is_nan() || !(weight > 0.0) {
            return;
        }
        if self.weight_sum > 0.0 {
            self.weight_sum += weight;
            let last_mean = self.mean;
            self.mean += weight * (value - last_mean) / self.weight_sum;
            self.variance_sum += weight * (value - last_mean) * (value - self.mean);
        } else {
            self.mean = value;
            self.weight_sum = weight;
        }
    }

    pub fn merge(&mut self, other: &GaussianEstimator) {
        if other.weight_sum <= 0.0 {
            return;
        }
        if self.weight_sum <= 0.0 {
            *self = other.clone();
            return;
        }
        let total = self.weight_sum + other.weight_sum;
        let delta = other.mean - self.mean;
        self.variance_sum +=
            other.variance_sum + delta * delta * self.weight_sum * other.weight_sum / total;
        self.mean += delta * other.weight_sum / total;
        self.weight_sum = total;
    }

    pub fn total_weight(&self) -> f64 {
        self.weight_sum
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        if self.weight_sum > 1.0 {
            self.variance_sum / (self.weight_sum - 1.0)
        } else {
            0.0
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Density at `value`. A degenerate estimator is a unit spike at its mean.
    pub fn probability_density(&self, value: f64) -> f64 {
        if self.weight_sum <= 0.0 {
            return 0.0;
        }
        let std_dev = self.std_dev();
        if std_dev > 0.0 {
            let diff = value - self.mean;
            (1.0 / ((2.0 * PI).sqrt() * std_dev)) * (-(diff * diff) / (2.0 * std_dev * std_dev)).exp()
        } else if value == self.mean {
            1.0
        } else {
            0.0
        }
    }
}
