use crate::drift::DriftDetector;

/// Early Drift Detection Method.
///
/// Tracks the running mean `p` and standard deviation `s` of the distance
/// (in observations) between consecutive errors, and the value of `p + 2s`
/// at its maximum. Drift is signalled when `(p + 2s) / max(p + 2s)` drops
/// below `out_control_level`, i.e. errors start arriving closer together.
/// Values of at least `0.5` count as errors.
#[derive(Debug, Clone)]
pub struct Eddm {
    min_num_instances: u64,
    warning_level: f64,
    out_control_level: f64,
    min_num_errors: u64,
    n: u64,
    num_errors: u64,
    last_error_at: u64,
    mean: f64,
    std_temp: f64,
    m2s_max: f64,
    samples_seen: u64,
    in_concept_change: bool,
    in_warning_zone: bool,
}

impl Eddm {
    pub fn new(min_num_instances: u64, warning_level: f64, out_control_level: f64) -> Self {
        Self {
            min_num_instances,
            warning_level,
            out_control_level,
            min_num_errors: 30,
            n: 1,
            num_errors: 0,
            last_error_at: 0,
            mean: 0.0,
            std_temp: 0.0,
            m2s_max: 0.0,
            samples_seen: 0,
            in_concept_change: false,
            in_warning_zone: false,
        }
    }

    pub fn in_warning_zone(&self) -> bool {
        self.in_warning_zone
    }

    fn restart_statistics(&mut self) {
        self.n = 1;
        self.num_errors = 0;
        self.last_error_at = 0;
        self.mean = 0.0;
        self.std_temp = 0.0;
        self.m2s_max = 0.0;
    }
}

impl Default for Eddm {
    fn default() -> Self {
        Self::new(30, 0.95, 0.9)
    }
}

impl DriftDetector for Eddm {
    fn update(&mut self, value: f64) -> bool {
        if self.in_concept_change {
            self.restart_statistics();
        }
        self.in_concept_change = false;
        self.samples_seen += 1;
        self.n += 1;

        if value < 0.5 {
            return false;
        }

        self.in_warning_zone = false;
        self.num_errors += 1;
        let error_at = self.n - 1;
        let distance = (error_at - self.last_error_at) as f64;
        self.last_error_at = error_at;

        let old_mean = self.mean;
        self.mean += (distance - self.mean) / self.num_errors as f64;
        self.std_temp += (distance - self.mean) * (distance - old_mean);
        let std = (self.std_temp / self.num_errors as f64).sqrt();
        let m2s = self.mean + 2.0 * std;

        if self.n < self.min_num_instances {
            return false;
        }

        if m2s > self.m2s_max {
            self.m2s_max = m2s;
        } else {
            let p = m2s / self.m2s_max;
            let enough_errors = self.num_errors > self.min_num_errors;
            if enough_errors && p < self.out_control_level {
                self.in_concept_change = true;
            } else if enough_errors && p < self.warning_level {
                self.in_warning_zone = true;
            }
        }
        self.in_concept_change
    }

    fn reset(&mut self) {
        *self = Self::new(
            self.min_num_instances,
            self.warning_level,
            self.out_control_level,
        );
    }

    fn drift_detected(&self) -> bool {
        self.in_concept_change
    }

    fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    fn estimation(&self) -> f64 {
        self.mean
    }
}
