//! Training pipeline: encoding, splitting, fitting, evaluation.

mod logger;
mod metric;
mod trainer;

pub use logger::{TrainingLogger, Verbosity};
pub use metric::{Mae, Metric, Rmse};
pub use trainer::{TrainError, TrainReport, Trainer, TrainerParams};
