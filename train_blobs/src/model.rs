//! Single-layer softmax regression over ndarray.

use anyhow::{Result, ensure};
use evaluation::{Classifier, Device};
use ndarray::{Array1, Array2, Axis};
use rand::Rng;
use rand::rngs::StdRng;

/// Linear classifier trained with plain full-batch gradient descent.
pub struct SoftmaxRegression {
    /// Weight matrix, `[num_classes x num_features]`
    weights: Array2<f64>,
    /// Per-class bias terms
    biases: Array1<f64>,
    /// Step size for gradient descent
    learning_rate: f64,
}

impl SoftmaxRegression {
    /// Creates a model with small random initial weights drawn from `rng`.
    pub fn new(
        num_features: usize,
        num_classes: usize,
        learning_rate: f64,
        rng: &mut StdRng,
    ) -> Self {
        let weights =
            Array2::from_shape_fn((num_classes, num_features), |_| rng.random_range(-0.1..0.1));
        let biases = Array1::zeros(num_classes);

        Self {
            weights,
            biases,
            learning_rate,
        }
    }

    /// Raw class scores for a batch, one sample per column.
    fn logits(&self, inputs: &Array2<f64>) -> Array2<f64> {
        self.weights.dot(inputs) + &self.biases.view().insert_axis(Axis(1))
    }

    /// Softmax probabilities per column, shifted by the column maximum for
    /// numerical stability.
    fn probabilities(&self, inputs: &Array2<f64>) -> Array2<f64> {
        let mut scores = self.logits(inputs);
        for mut column in scores.axis_iter_mut(Axis(1)) {
            let max = column.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
            column.mapv_inplace(|value| (value - max).exp());
            let sum = column.sum();
            column.mapv_inplace(|value| value / sum);
        }
        scores
    }

    /// Runs one full-batch gradient step and returns the mean cross-entropy
    /// loss before the update.
    ///
    /// # Errors
    ///
    /// Returns an error if the label count does not match the batch, or a
    /// label falls outside the class range.
    pub fn fit_epoch(&mut self, inputs: &Array2<f64>, labels: &[usize]) -> Result<f64> {
        ensure!(
            labels.len() == inputs.ncols(),
            "batch holds {} samples but {} labels",
            inputs.ncols(),
            labels.len()
        );
        ensure!(
            labels.iter().all(|&label| label < self.weights.nrows()),
            "labels must be below the class count {}",
            self.weights.nrows()
        );
        let batch = labels.len() as f64;

        let probabilities = self.probabilities(inputs);

        // Gradient of cross-entropy wrt logits: probabilities - one_hot.
        let mut gradient = probabilities.clone();
        let mut loss = 0.0;
        for (column, &label) in labels.iter().enumerate() {
            loss -= probabilities[[label, column]].max(1e-12).ln();
            gradient[[label, column]] -= 1.0;
        }

        let weight_gradient = gradient.dot(&inputs.t()) / batch;
        let bias_gradient = gradient.sum_axis(Axis(1)) / batch;

        self.weights = &self.weights - &(weight_gradient * self.learning_rate);
        self.biases = &self.biases - &(bias_gradient * self.learning_rate);

        Ok(loss / batch)
    }
}

impl Classifier for SoftmaxRegression {
    fn scores(&self, inputs: &Array2<f64>, _device: Device) -> Result<Array2<f64>> {
        ensure!(
            inputs.nrows() == self.weights.ncols(),
            "expected {} features per sample, got {}",
            self.weights.ncols(),
            inputs.nrows()
        );
        Ok(self.logits(inputs))
    }
}
