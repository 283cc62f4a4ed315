mod hoeffding_tree_params;
mod param_choice;

pub use hoeffding_tree_params::*;
pub use param_choice::ParamChoice;
