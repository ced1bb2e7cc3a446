mod batches;
mod evaluate;
mod model;

pub use batches::{BatchSource, InMemoryBatches};
pub use evaluate::{EvaluationError, evaluate, evaluate_with_progress};
pub use model::{Classifier, Device, InferenceGuard};
