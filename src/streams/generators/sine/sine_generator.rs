use std::io::Error;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::streams::generators::sine::SineFunction;
use crate::streams::stream::Stream;

/// SINE concepts over two relevant attributes uniform in `[0, 1)`, optionally
/// followed by two uniform noise attributes.
pub struct SineGenerator {
    seed: u64,
    rng: StdRng,
    function: SineFunction,
    balance_classes: bool,
    next_class_should_be_zero: bool,
    has_noise: bool,
    header: Arc<InstanceHeader>,
    max_instances: Option<usize>,
    produced: usize,
}

impl SineGenerator {
    pub fn new(
        function: SineFunction,
        balance: bool,
        has_noise: bool,
        max_instances: Option<usize>,
        seed: u64,
    ) -> Result<Self, Error> {
        let feature_count = if has_noise { 4 } else { 2 };
        let mut attributes: Vec<AttributeRef> = (1..=feature_count)
            .map(|i| Arc::new(NumericAttribute::new(format!("att{i}"))) as AttributeRef)
            .collect();
        attributes.push(Arc::new(NominalAttribute::with_values(
            "class".into(),
            vec!["positive".into(), "negative".into()],
        )));
        let header = Arc::new(InstanceHeader::new("SINE".into(), attributes, feature_count));

        Ok(Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            function,
            balance_classes: balance,
            next_class_should_be_zero: false,
            has_noise,
            header,
            max_instances,
            produced: 0,
        })
    }

    pub fn function(&self) -> SineFunction {
        self.function
    }

    pub fn set_function(&mut self, function: SineFunction) {
        self.function = function;
    }
}

impl Stream for SineGenerator {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        self.max_instances.is_none_or(|max| self.produced < max)
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        if !self.has_more_instances() {
            return None;
        }

        let (a1, a2, cls) = loop {
            let a1: f64 = self.rng.random();
            let a2: f64 = self.rng.random();
            let cls = self.function.classify(a1, a2);
            if !self.balance_classes {
                break (a1, a2, cls);
            }
            let want_zero = self.next_class_should_be_zero;
            if want_zero == (cls == 0) {
                self.next_class_should_be_zero = !want_zero;
                break (a1, a2, cls);
            }
        };

        let mut values = vec![a1, a2];
        if self.has_noise {
            values.push(self.rng.random());
            values.push(self.rng.random());
        }
        values.push(cls as f64);

        self.produced += 1;
        Some(Box::new(DenseInstance::new(
            Arc::clone(&self.header),
            values,
            1.0,
        )))
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.produced = 0;
        self.next_class_should_be_zero = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instances::{FeatureValue, Label};

    fn point(inst: &dyn Instance) -> (f64, f64) {
        match (inst.feature(0), inst.feature(1)) {
            (Some(FeatureValue::Numeric(a1)), Some(FeatureValue::Numeric(a2))) => (a1, a2),
            other => panic!("expected two numeric features, got {other:?}"),
        }
    }

    #[test]
    fn labels_follow_the_sine_boundary() {
        let mut generator =
            SineGenerator::new(SineFunction::Sine1, false, false, Some(300), 112).unwrap();
        while let Some(inst) = generator.next_instance() {
            let (a1, a2) = point(inst.as_ref());
            let expected = if a1 >= a2.sin() { 0 } else { 1 };
            assert_eq!(inst.label(), Some(Label::Class(expected)));
        }
        assert!(!generator.has_more_instances());
    }

    #[test]
    fn reversed_functions_swap_labels() {
        for (a1, a2) in [(0.1, 0.9), (0.9, 0.1), (0.4, 0.3), (0.2, 0.6)] {
            assert_eq!(
                SineFunction::Sine1.classify(a1, a2),
                1 - SineFunction::ReversedSine1.classify(a1, a2)
            );
            assert_eq!(
                SineFunction::Sine2.classify(a1, a2),
                1 - SineFunction::ReversedSine2.classify(a1, a2)
            );
        }
        // 0.5 + 0.3 * sin(3π/6) = 0.8
        assert_eq!(SineFunction::Sine2.classify(0.79, 1.0 / 6.0), 1);
        assert_eq!(SineFunction::Sine2.classify(0.81, 1.0 / 6.0), 0);
    }

    #[test]
    fn noise_adds_two_features() {
        let mut generator =
            SineGenerator::new(SineFunction::Sine2, false, true, None, 3).unwrap();
        assert_eq!(generator.header().number_of_features(), 4);
        assert_eq!(generator.header().class_index(), 4);
        let inst = generator.next_instance().unwrap();
        assert_eq!(inst.features().len(), 4);
        assert!(inst.label().is_some());
    }

    #[test]
    fn balance_alternates_and_restart_replays() {
        let mut generator =
            SineGenerator::new(SineFunction::Sine1, true, false, None, 9).unwrap();
        let first: Vec<_> = (0..12)
            .map(|_| generator.next_instance().unwrap().label())
            .collect();
        let expected: Vec<_> = (0..12)
            .map(|i| Some(Label::Class(if i % 2 == 0 { 1 } else { 0 })))
            .collect();
        assert_eq!(first, expected);

        generator.restart().unwrap();
        let again: Vec<_> = (0..12)
            .map(|_| generator.next_instance().unwrap().label())
            .collect();
        assert_eq!(first, again);
    }
}
