pub mod adaptation;
mod hoeffding_tree;
pub mod instance_conditional_test;
mod leaf_prediction_option;
pub mod nodes;
mod shared;
pub mod split_criteria;
pub mod split_evaluator;

pub use hoeffding_tree::{HoeffdingTree, MAX_CLASSES};
pub use leaf_prediction_option::LeafPredictionOption;
pub use shared::SharedHoeffdingTree;
