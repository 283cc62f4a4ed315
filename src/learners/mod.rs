pub mod attribute_observers;
pub mod bayes;
pub mod conditional_tests;
pub mod hoeffding_tree;
mod learner;

pub use hoeffding_tree::{HoeffdingTree, SharedHoeffdingTree};
pub use learner::Learner;
