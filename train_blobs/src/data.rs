//! Synthetic blob dataset for the demonstration loop.

use ndarray::Array2;
use rand::Rng;
use rand::rngs::StdRng;

/// Class centers for the synthetic task, one blob per class.
const CENTERS: [(f64, f64); 3] = [(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)];

/// Spread of each blob around its center.
const SPREAD: f64 = 1.2;

pub const NUM_FEATURES: usize = 2;
pub const NUM_CLASSES: usize = CENTERS.len();

/// Draws `samples_per_class` noisy points around every class center.
///
/// Points are columns of the returned matrix, paired with one class id
/// each. Every draw comes from the supplied generator, so a seeded run
/// reproduces the same dataset.
pub fn make_blobs(rng: &mut StdRng, samples_per_class: usize) -> (Array2<f64>, Vec<usize>) {
    let total = samples_per_class * CENTERS.len();
    let mut inputs = Array2::zeros((NUM_FEATURES, total));
    let mut labels = Vec::with_capacity(total);

    for (class, &(center_x, center_y)) in CENTERS.iter().enumerate() {
        for sample in 0..samples_per_class {
            let column = class * samples_per_class + sample;
            inputs[[0, column]] = center_x + rng.random_range(-SPREAD..SPREAD);
            inputs[[1, column]] = center_y + rng.random_range(-SPREAD..SPREAD);
            labels.push(class);
        }
    }

    (inputs, labels)
}
