pub mod dummies;
pub mod stubs;

pub use dummies::header_binary;
pub use stubs::{
    FailingLearner, NoVotesLearner, OracleLearner, TrainSpyHandle, TrainSpyLearner, VecStream,
};
