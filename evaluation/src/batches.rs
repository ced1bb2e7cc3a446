use crate::evaluate::EvaluationError;
use ndarray::{Array2, s};

/// A finite, restartable source of labeled sample batches.
///
/// Each pass pairs a `[features x batch]` input matrix with one integer
/// class id per column. The reported sample count is the denominator used
/// for accuracy, independent of how the samples are batched.
pub trait BatchSource {
    /// Total number of samples the source yields across one full pass.
    fn num_samples(&self) -> usize;

    /// Starts a fresh pass over the dataset. Calling this again restarts
    /// from the beginning.
    fn batches(&self) -> Box<dyn Iterator<Item = (Array2<f64>, Vec<usize>)> + '_>;
}

/// A batch source over a dataset held fully in memory.
///
/// Samples are columns of a single `[features x n]` matrix, paired with one
/// class id each, and yielded in fixed-size chunks; the final batch may be
/// smaller than the configured size.
#[derive(Debug, Clone)]
pub struct InMemoryBatches {
    inputs: Array2<f64>,
    labels: Vec<usize>,
    batch_size: usize,
}

impl InMemoryBatches {
    /// Creates a batch source from a sample matrix and its labels.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::DataMismatch`] if the label count does not
    /// match the number of sample columns, or if `batch_size` is zero.
    pub fn new(
        inputs: Array2<f64>,
        labels: Vec<usize>,
        batch_size: usize,
    ) -> Result<Self, EvaluationError> {
        if labels.len() != inputs.ncols() {
            return Err(EvaluationError::DataMismatch(format!(
                "number of labels ({}) does not match number of samples ({})",
                labels.len(),
                inputs.ncols()
            )));
        }
        if batch_size == 0 {
            return Err(EvaluationError::DataMismatch(String::from(
                "batch size must be non-zero",
            )));
        }

        Ok(Self {
            inputs,
            labels,
            batch_size,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl BatchSource for InMemoryBatches {
    fn num_samples(&self) -> usize {
        self.labels.len()
    }

    fn batches(&self) -> Box<dyn Iterator<Item = (Array2<f64>, Vec<usize>)> + '_> {
        let total = self.labels.len();
        let step = self.batch_size;

        Box::new((0..total).step_by(step).map(move |start| {
            let end = (start + step).min(total);
            let inputs = self.inputs.slice(s![.., start..end]).to_owned();
            let labels = self
                .labels
                .iter()
                .skip(start)
                .take(end - start)
                .copied()
                .collect();
            (inputs, labels)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn sample_matrix(samples: usize) -> Array2<f64> {
        Array2::from_shape_fn((3, samples), |(row, col)| (row * samples + col) as f64)
    }

    #[test]
    fn test_label_count_mismatch() {
        let result = InMemoryBatches::new(sample_matrix(4), vec![0, 1], 2);

        match result {
            Err(EvaluationError::DataMismatch(msg)) => {
                assert!(msg.contains("does not match"));
            }
            _ => panic!("Expected DataMismatch error"),
        }
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let result = InMemoryBatches::new(sample_matrix(4), vec![0, 1, 0, 1], 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_final_batch_may_be_smaller() -> Result<(), EvaluationError> {
        let source = InMemoryBatches::new(sample_matrix(10), vec![0; 10], 4)?;

        let sizes: Vec<usize> = source.batches().map(|(_, labels)| labels.len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(source.num_samples(), 10);

        Ok(())
    }

    #[test]
    fn test_batches_are_restartable() -> Result<(), EvaluationError> {
        let source = InMemoryBatches::new(sample_matrix(5), vec![0, 1, 2, 1, 0], 2)?;

        let first: Vec<_> = source.batches().collect();
        let second: Vec<_> = source.batches().collect();

        assert_eq!(first.len(), 3);
        for ((inputs_a, labels_a), (inputs_b, labels_b)) in first.iter().zip(second.iter()) {
            assert_eq!(inputs_a, inputs_b);
            assert_eq!(labels_a, labels_b);
        }

        Ok(())
    }

    #[test]
    fn test_columns_arrive_in_order() -> Result<(), EvaluationError> {
        let source = InMemoryBatches::new(sample_matrix(4), vec![0, 1, 2, 0], 3)?;

        let mut seen = Vec::new();
        for (inputs, _) in source.batches() {
            for column in inputs.columns() {
                seen.push(column[0]);
            }
        }
        assert_eq!(seen, vec![0.0, 1.0, 2.0, 3.0]);

        Ok(())
    }
}
