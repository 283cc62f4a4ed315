use crate::core::instances::Label;
use std::mem::size_of;

/// Weighted running mean and (population) variance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningVariance {
    weight: f64,
    mean: f64,
    m2: f64,
}

impl RunningVariance {
    pub fn add(&mut self, value: f64, weight: f64) {
        let total = self.weight + weight;
        let delta = value - self.mean;
        self.mean += delta * weight / total;
        self.m2 += weight * delta * (value - self.mean);
        self.weight = total;
    }

    pub fn merge(&mut self, other: &RunningVariance) {
        if other.weight <= 0.0 {
            return;
        }
        if self.weight <= 0.0 {
            *self = *other;
            return;
        }
        let total = self.weight + other.weight;
        let delta = other.mean - self.mean;
        self.m2 += other.m2 + delta * delta * self.weight * other.weight / total;
        self.mean += delta * other.weight / total;
        self.weight = total;
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        if self.weight > 0.0 {
            (self.m2 / self.weight).max(0.0)
        } else {
            0.0
        }
    }
}

/// Sufficient statistics of the target seen by a node or a histogram bin.
///
/// Classification keeps one weight per class index (grown on demand),
/// regression keeps weighted moments.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetStats {
    Classes(Vec<f64>),
    Moments(RunningVariance),
}

impl TargetStats {
    pub fn classes() -> Self {
        TargetStats::Classes(Vec::new())
    }

    pub fn moments() -> Self {
        TargetStats::Moments(RunningVariance::default())
    }

    /// Empty accumulator matching the kind of `label`.
    pub fn for_label(label: Label) -> Self {
        match label {
            Label::Class(_) => TargetStats::classes(),
            Label::Numeric(_) => TargetStats::moments(),
        }
    }

    /// An empty accumulator of the same variant.
    pub fn empty_like(&self) -> Self {
        match self {
            TargetStats::Classes(_) => TargetStats::classes(),
            TargetStats::Moments(_) => TargetStats::moments(),
        }
    }

    /// Adds one weighted label. Returns `false` when the label kind does not
    /// match the accumulator, leaving it untouched.
    pub fn add(&mut self, label: Label, weight: f64) -> bool {
        match (self, label) {
            (TargetStats::Classes(dist), Label::Class(c)) => {
                if c >= dist.len() {
                    dist.resize(c + 1, 0.0);
                }
                dist[c] += weight;
                true
            }
            (TargetStats::Moments(moments), Label::Numeric(v)) => {
                moments.add(v, weight);
                true
            }
            _ => false,
        }
    }

    pub fn merge(&mut self, other: &TargetStats) {
        match (self, other) {
            (TargetStats::Classes(dist), TargetStats::Classes(o)) => {
                if o.len() > dist.len() {
                    dist.resize(o.len(), 0.0);
                }
                for (d, s) in dist.iter_mut().zip(o.iter()) {
                    *d += *s;
                }
            }
            (TargetStats::Moments(m), TargetStats::Moments(o)) => m.merge(o),
            _ => debug_assert!(false, "merging target stats of different kinds"),
        }
    }

    pub fn total_weight(&self) -> f64 {
        match self {
            TargetStats::Classes(dist) => dist.iter().sum(),
            TargetStats::Moments(m) => m.weight(),
        }
    }

    pub fn class_weights(&self) -> &[f64] {
        match self {
            TargetStats::Classes(dist) => dist,
            TargetStats::Moments(_) => &[],
        }
    }

    pub fn num_non_zero_entries(&self) -> usize {
        self.class_weights().iter().filter(|&&x| x > 0.0).count()
    }

    /// Class with the highest weight, lowest index on ties.
    pub fn majority_class(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &w) in self.class_weights().iter().enumerate() {
            if w > 0.0 && best.is_none_or(|(_, bw)| w > bw) {
                best = Some((i, w));
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn mean(&self) -> Option<f64> {
        match self {
            TargetStats::Moments(m) if m.weight() > 0.0 => Some(m.mean()),
            _ => None,
        }
    }

    pub fn variance(&self) -> f64 {
        match self {
            TargetStats::Moments(m) => m.variance(),
            TargetStats::Classes(_) => 0.0,
        }
    }

    /// A single class, or a target with no spread, leaves nothing to split on.
    pub fn is_pure(&self) -> bool {
        match self {
            TargetStats::Classes(_) => self.num_non_zero_entries() < 2,
            TargetStats::Moments(m) => m.variance() <= f64::EPSILON,
        }
    }

    /// Misclassification rate of the majority class, or the target variance.
    pub fn impurity(&self) -> f64 {
        match self {
            TargetStats::Classes(dist) => {
                let total: f64 = dist.iter().sum();
                if total <= 0.0 {
                    return 0.0;
                }
                let max = dist.iter().cloned().fold(0.0, f64::max);
                1.0 - max / total
            }
            TargetStats::Moments(m) => m.variance(),
        }
    }

    pub fn byte_size(&self) -> usize {
        match self {
            TargetStats::Classes(dist) => size_of::<Self>() + dist.capacity() * size_of::<f64>(),
            TargetStats::Moments(_) => size_of::<Self>(),
        }
    }
}
