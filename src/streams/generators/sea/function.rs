/// SEA class boundaries. A point is class 1 when `a1 + a2` exceeds the
/// concept's threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SeaFunction {
    F1,
    F2,
    F3,
    F4,
    /// Any boundary in `[0, 20]`, the range `a1 + a2` can take.
    Custom(f64),
}

impl SeaFunction {
    pub fn threshold(self) -> f64 {
        match self {
            SeaFunction::F1 => 8.0,
            SeaFunction::F2 => 9.0,
            SeaFunction::F3 => 7.0,
            SeaFunction::F4 => 9.5,
            SeaFunction::Custom(t) => t,
        }
    }

    pub fn classify(self, a1: f64, a2: f64) -> u8 {
        (a1 + a2 > self.threshold()) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_on_the_boundary_are_class_zero() {
        assert_eq!(SeaFunction::F1.classify(4.0, 4.0), 0);
        assert_eq!(SeaFunction::F1.classify(4.0, 4.001), 1);
        assert_eq!(SeaFunction::F4.classify(5.0, 4.5), 0);
        assert_eq!(SeaFunction::Custom(0.0).classify(0.0, 0.1), 1);
    }
}
