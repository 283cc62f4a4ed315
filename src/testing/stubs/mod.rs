mod learners;
mod vec_stream;

pub use learners::{FailingLearner, NoVotesLearner, OracleLearner, TrainSpyHandle, TrainSpyLearner};
pub use vec_stream::VecStream;
