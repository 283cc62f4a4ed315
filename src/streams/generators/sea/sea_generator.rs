use std::io::{Error, ErrorKind};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::streams::generators::sea::SeaFunction;
use crate::streams::stream::Stream;

/// SEA concepts: three numeric features uniform in `[0, 10)` where only the
/// first two decide the class, see [`SeaFunction::classify`].
pub struct SeaGenerator {
    seed: u64,
    rng: StdRng,
    function: SeaFunction,
    balance: bool,
    /// Class the next balanced instance must have.
    pending_class: Option<u8>,
    noise: f64,
    header: Arc<InstanceHeader>,
    max_instances: Option<usize>,
    produced: usize,
}

impl SeaGenerator {
    /// `noise_percentage` is the chance, in percent, that a label is flipped.
    pub fn new(
        function: SeaFunction,
        balance: bool,
        noise_percentage: u32,
        max_instances: Option<usize>,
        seed: u64,
    ) -> Result<Self, Error> {
        let threshold = function.threshold();
        if !(0.0..=20.0).contains(&threshold) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("SEA threshold {threshold} lies outside [0, 20]"),
            ));
        }
        if noise_percentage > 100 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("noise of {noise_percentage}% is above 100%"),
            ));
        }

        let mut attributes: Vec<AttributeRef> = ["attrib1", "attrib2", "attrib3"]
            .into_iter()
            .map(|name| Arc::new(NumericAttribute::new(name.into())) as AttributeRef)
            .collect();
        attributes.push(Arc::new(NominalAttribute::with_values(
            "class".into(),
            vec!["groupA".into(), "groupB".into()],
        )));

        Ok(Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            function,
            balance,
            pending_class: balance.then_some(1),
            noise: f64::from(noise_percentage) / 100.0,
            header: Arc::new(InstanceHeader::new("SEA".into(), attributes, 3)),
            max_instances,
            produced: 0,
        })
    }

    pub fn function(&self) -> SeaFunction {
        self.function
    }

    /// Moves the class boundary without restarting the sequence.
    pub fn set_function(&mut self, function: SeaFunction) {
        self.function = function;
    }

    /// Draws points until one has the class balancing asks for.
    fn draw(&mut self) -> ([f64; 3], u8) {
        loop {
            let point: [f64; 3] = std::array::from_fn(|_| self.rng.random_range(0.0..10.0));
            let class = self.function.classify(point[0], point[1]);
            match self.pending_class {
                Some(wanted) if wanted != class => continue,
                Some(wanted) => self.pending_class = Some(1 - wanted),
                None => {}
            }
            return (point, class);
        }
    }
}

impl Stream for SeaGenerator {
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
        let ([a1, a2, a3], class) = self.draw();
        let class = if self.rng.random_bool(self.noise) {
            1 - class
        } else {
            class
        };
        self.produced += 1;
        Some(Box::new(DenseInstance::new(
            Arc::clone(&self.header),
            vec![a1, a2, a3, f64::from(class)],
            1.0,
        )))
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.produced = 0;
        self.pending_class = self.balance.then_some(1);
        Ok(())
    }
}
