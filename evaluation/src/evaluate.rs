//! Top-1 accuracy evaluation over a labeled batch source.
//!
//! The evaluator is a single linear scan: every batch is scored once, each
//! sample's predicted class is the arg-max of its score column, and the
//! match count is divided by the source's reported sample total. All
//! collaborator failures propagate to the caller untouched.

use crate::batches::BatchSource;
use crate::model::{Classifier, Device, InferenceGuard};
use indicatif::ProgressBar;
use ndarray_stats::QuantileExt;
use thiserror::Error;

/// Errors that can occur while evaluating a model.
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// The batch source reported zero samples; accuracy over nothing is
    /// undefined and surfaces as an error rather than 0 or NaN.
    #[error("cannot evaluate over an empty dataset")]
    EmptyDataset,
    /// Mismatch between paired data, such as labels vs samples in a batch
    /// or score columns vs batch size.
    #[error("data mismatch: {0}")]
    DataMismatch(String),
    /// A score column had no usable maximum (no classes, or unordered
    /// values such as NaN).
    #[error("scores for sample {sample} have no usable maximum")]
    DegenerateScores { sample: usize },
    /// The model's forward pass failed; the underlying error is surfaced
    /// untouched.
    #[error(transparent)]
    Inference(#[from] anyhow::Error),
}

/// Computes top-1 accuracy of `model` over every batch of `data`.
///
/// The model is held in inference mode for the whole pass, released on every
/// exit path. Each batch is visited exactly once; a sample's predicted class
/// is the arg-max of its score column (ties resolve to the lowest index) and
/// is compared against the true label. The result is
/// `matches / num_samples` in [0, 1], where the denominator is the source's
/// reported sample count, not the number of batches.
///
/// # Errors
///
/// Returns [`EvaluationError::EmptyDataset`] for a zero-sample source. Any
/// model failure or batch shape mismatch propagates without local recovery.
pub fn evaluate<M, S>(model: &M, data: &S, device: Device) -> Result<f64, EvaluationError>
where
    M: Classifier + ?Sized,
    S: BatchSource + ?Sized,
{
    run(model, data, device, None)
}

/// Same contract as [`evaluate`], advancing `progress` batch by batch as the
/// scan proceeds. The bar's length is set to the source's sample count.
pub fn evaluate_with_progress<M, S>(
    model: &M,
    data: &S,
    device: Device,
    progress: &ProgressBar,
) -> Result<f64, EvaluationError>
where
    M: Classifier + ?Sized,
    S: BatchSource + ?Sized,
{
    run(model, data, device, Some(progress))
}

fn run<M, S>(
    model: &M,
    data: &S,
    device: Device,
    progress: Option<&ProgressBar>,
) -> Result<f64, EvaluationError>
where
    M: Classifier + ?Sized,
    S: BatchSource + ?Sized,
{
    let total = data.num_samples();
    if total == 0 {
        return Err(EvaluationError::EmptyDataset);
    }
    if let Some(progress) = progress {
        progress.set_length(total as u64);
    }

    let _inference = InferenceGuard::new(model);
    let mut correct = 0usize;
    let mut seen = 0usize;

    for (inputs, labels) in data.batches() {
        if labels.len() != inputs.ncols() {
            return Err(EvaluationError::DataMismatch(format!(
                "batch holds {} samples but {} labels",
                inputs.ncols(),
                labels.len()
            )));
        }

        let scores = model.scores(&inputs, device)?;
        if scores.ncols() != inputs.ncols() {
            return Err(EvaluationError::DataMismatch(format!(
                "model returned {} score columns for a batch of {}",
                scores.ncols(),
                inputs.ncols()
            )));
        }

        for (offset, &label) in labels.iter().enumerate() {
            let predicted = scores
                .column(offset)
                .argmax()
                .map_err(|_| EvaluationError::DegenerateScores {
                    sample: seen + offset,
                })?;
            if predicted == label {
                correct += 1;
            }
        }

        seen += labels.len();
        if let Some(progress) = progress {
            progress.inc(labels.len() as u64);
        }
    }

    Ok(correct as f64 / total as f64)
}
