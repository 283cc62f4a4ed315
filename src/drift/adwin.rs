use crate::drift::DriftDetector;
use std::collections::VecDeque;

const MAX_BUCKETS_PER_ROW: usize = 5;
const MIN_SUB_WINDOW: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    total: f64,
    variance: f64,
}

/// ADaptive WINdowing.
///
/// Keeps a window of recent values compressed into an exponential histogram:
/// row `i` holds buckets summarising `2^i` values each, oldest at the front.
/// Every `clock` updates the window is scanned for a cut point whose two
/// sides have means that differ by more than
/// `sqrt(2 m v ln(2 ln(n) / delta)) + 2/3 m ln(2 ln(n) / delta)`, with
/// `m = 1/n0 + 1/n1`. The older side is dropped until no such cut remains.
#[derive(Debug, Clone)]
pub struct Adwin {
    delta: f64,
    clock: u64,
    rows: Vec<VecDeque<Bucket>>,
    width: f64,
    total: f64,
    variance: f64,
    samples_seen: u64,
    in_concept_change: bool,
}

impl Adwin {
    pub fn new(delta: f64) -> Self {
        Self {
            delta,
            clock: 32,
            rows: Vec::new(),
            width: 0.0,
            total: 0.0,
            variance: 0.0,
            samples_seen: 0,
            in_concept_change: false,
        }
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Number of values currently summarised by the window.
    pub fn width(&self) -> f64 {
        self.width
    }

    fn bucket_size(row: usize) -> f64 {
        (1u64 << row) as f64
    }

    fn insert_element(&mut self, value: f64) {
        if self.width > 0.0 {
            let mean = self.total / self.width;
            self.variance += self.width * (value - mean) * (value - mean) / (self.width + 1.0);
        }
        self.width += 1.0;
        self.total += value;

        if self.rows.is_empty() {
            self.rows.push(VecDeque::new());
        }
        self.rows[0].push_back(Bucket {
            total: value,
            variance: 0.0,
        });
        self.compress_buckets();
    }

    fn compress_buckets(&mut self) {
        let mut row = 0;
        while row < self.rows.len() && self.rows[row].len() > MAX_BUCKETS_PER_ROW {
            let n = Self::bucket_size(row);
            let (Some(a), Some(b)) = (self.rows[row].pop_front(), self.rows[row].pop_front())
            else {
                break;
            };
            let mean_diff = a.total / n - b.total / n;
            let merged = Bucket {
                total: a.total + b.total,
                variance: a.variance + b.variance + n * n * mean_diff * mean_diff / (2.0 * n),
            };
            if row + 1 == self.rows.len() {
                self.rows.push(VecDeque::new());
            }
            self.rows[row + 1].push_back(merged);
            row += 1;
        }
    }

    fn delete_oldest_bucket(&mut self) {
        let Some(row) = self.rows.iter().rposition(|r| !r.is_empty()) else {
            return;
        };
        let Some(bucket) = self.rows[row].pop_front() else {
            return;
        };
        let n = Self::bucket_size(row);
        self.width -= n;
        self.total -= bucket.total;
        if self.width > 0.0 {
            let remaining_mean = self.total / self.width;
            let bucket_mean = bucket.total / n;
            let diff = bucket_mean - remaining_mean;
            self.variance -= bucket.variance + n * self.width * diff * diff / (n + self.width);
            self.variance = self.variance.max(0.0);
        } else {
            self.total = 0.0;
            self.variance = 0.0;
        }
        while self.rows.last().is_some_and(VecDeque::is_empty) {
            self.rows.pop();
        }
    }

    fn detect_change(&mut self) -> bool {
        let mut changed = false;
        loop {
            if self.width < 2.0 * MIN_SUB_WINDOW {
                break;
            }
            let v = self.variance / self.width;
            let dd = (2.0 * self.width.ln() / self.delta).ln();
            let mut n0 = 0.0;
            let mut u0 = 0.0;
            let mut n1 = self.width;
            let mut u1 = self.total;
            let mut cut = false;

            'scan: for row in (0..self.rows.len()).rev() {
                let size = Self::bucket_size(row);
                for bucket in &self.rows[row] {
                    n0 += size;
                    n1 -= size;
                    u0 += bucket.total;
                    u1 -= bucket.total;
                    if n1 < MIN_SUB_WINDOW {
                        break 'scan;
                    }
                    if n0 < MIN_SUB_WINDOW {
                        continue;
                    }
                    let m = 1.0 / n0 + 1.0 / n1;
                    let epsilon = (2.0 * m * v * dd).sqrt() + 2.0 / 3.0 * dd * m;
                    if (u0 / n0 - u1 / n1).abs() > epsilon {
                        cut = true;
                        break 'scan;
                    }
                }
            }

            if !cut {
                break;
            }
            self.delete_oldest_bucket();
            changed = true;
        }
        changed
    }
}

impl Default for Adwin {
    fn default() -> Self {
        Self::new(0.002)
    }
}

impl DriftDetector for Adwin {
    fn update(&mut self, value: f64) -> bool {
        self.samples_seen += 1;
        self.insert_element(value);
        self.in_concept_change = false;
        if self.samples_seen % self.clock == 0 {
            self.in_concept_change = self.detect_change();
        }
        self.in_concept_change
    }

    fn reset(&mut self) {
        *self = Self::new(self.delta);
    }

    fn drift_detected(&self) -> bool {
        self.in_concept_change
    }

    fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    fn estimation(&self) -> f64 {
        if self.width > 0.0 {
            self.total / self.width
        } else {
            0.0
        }
    }
}
