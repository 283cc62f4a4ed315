//! One-pass Hoeffding tree induction for data streams, with optional
//! concept-drift adaptation through per-branch change detectors and
//! alternate subtrees.

pub mod config;
pub mod core;
pub mod drift;
pub mod error;
pub mod evaluation;
pub mod learners;
pub mod streams;
pub mod tasks;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{LearnerError, Result};
pub use learners::{HoeffdingTree, Learner, SharedHoeffdingTree};
