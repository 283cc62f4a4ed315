use std::io::{Error, ErrorKind};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::streams::stream::Stream;

/// Joins two streams with a concept change centred at `position`.
///
/// With `width == 0` the switch is abrupt: observations before `position`
/// come from `before`, the rest from `after`. Otherwise each observation is
/// drawn from `after` with probability `1 / (1 + e^(-4 (t - position) / width))`.
pub struct ConceptDriftStream {
    before: Box<dyn Stream>,
    after: Box<dyn Stream>,
    position: usize,
    width: usize,
    seed: u64,
    rng: StdRng,
    produced: usize,
}

impl ConceptDriftStream {
    pub fn new(
        before: Box<dyn Stream>,
        after: Box<dyn Stream>,
        position: usize,
        width: usize,
        seed: u64,
    ) -> Result<Self, Error> {
        let (h1, h2) = (before.header(), after.header());
        if h1.number_of_attributes() != h2.number_of_attributes()
            || h1.class_index() != h2.class_index()
        {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Both concepts must share the same attribute layout",
            ));
        }
        Ok(Self {
            before,
            after,
            position,
            width,
            seed,
            rng: StdRng::seed_from_u64(seed),
            produced: 0,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    fn probability_of_after(&self) -> f64 {
        let t = self.produced as f64 - self.position as f64;
        if self.width == 0 {
            return if t >= 0.0 { 1.0 } else { 0.0 };
        }
        1.0 / (1.0 + (-4.0 * t / self.width as f64).exp())
    }
}

impl Stream for ConceptDriftStream {
    fn header(&self) -> &InstanceHeader {
        self.before.header()
    }

    fn has_more_instances(&self) -> bool {
        if self.produced < self.position {
            self.before.has_more_instances()
        } else {
            self.after.has_more_instances()
        }
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        let p = self.probability_of_after();
        let from_after = p >= 1.0 || (p > 0.0 && self.rng.random::<f64>() < p);
        let next = if from_after {
            self.after.next_instance()
        } else {
            self.before.next_instance()
        };
        if next.is_some() {
            self.produced += 1;
        }
        next
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.before.restart()?;
        self.after.restart()?;
        self.rng = StdRng::seed_from_u64(self.seed);
        self.produced = 0;
        Ok(())
    }
}
