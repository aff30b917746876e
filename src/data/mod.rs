//! Data containers and dataset loading.

mod loader;
mod matrix;

pub use loader::{load_training_csv, DatasetLoadError, TrainingFrame};
pub use matrix::RowMatrix;
