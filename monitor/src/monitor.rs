//! Accumulating recorder of per-epoch training metrics.

use crate::render::{Frame, Panel, RenderError, Renderer, Series};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while persisting a monitor.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Wrapper for standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The history file could not be serialized or parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Records loss and accuracy curves across training epochs.
///
/// Histories are append-only and never reordered. Recording a validation
/// accuracy also maintains the running best value and the 1-based epoch it
/// was first reached at. A fresh monitor starts with empty curves, best
/// value 0 and best epoch 0.
///
/// The monitor is a single-writer structure: it carries no interior
/// synchronization and is meant to be owned by one training loop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Monitor {
    learning_curve: Vec<f64>,
    train_accuracy_curve: Vec<f64>,
    val_accuracy_curve: Vec<f64>,
    best_val_accuracy: f64,
    best_val_epoch: usize,
}

impl Monitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one loss value to the learning curve.
    pub fn record_loss(&mut self, value: f64) {
        self.learning_curve.push(value);
    }

    /// Appends one training accuracy value.
    pub fn record_train_accuracy(&mut self, value: f64) {
        self.train_accuracy_curve.push(value);
    }

    /// Appends one validation accuracy value.
    ///
    /// A value strictly greater than the best seen so far also updates the
    /// best value and its epoch (the new length of the validation history,
    /// so epochs are 1-based). Ties keep the earlier epoch.
    pub fn record_val_accuracy(&mut self, value: f64) {
        self.val_accuracy_curve.push(value);

        if value > self.best_val_accuracy {
            self.best_val_accuracy = value;
            self.best_val_epoch = self.val_accuracy_curve.len();
        }
    }

    pub fn learning_curve(&self) -> &[f64] {
        &self.learning_curve
    }

    pub fn train_accuracy_curve(&self) -> &[f64] {
        &self.train_accuracy_curve
    }

    pub fn val_accuracy_curve(&self) -> &[f64] {
        &self.val_accuracy_curve
    }

    /// Best validation accuracy recorded so far, 0 before any recording.
    pub fn best_val_accuracy(&self) -> f64 {
        self.best_val_accuracy
    }

    /// 1-based epoch the best validation accuracy was first reached at,
    /// 0 before any recording.
    pub fn best_val_epoch(&self) -> usize {
        self.best_val_epoch
    }

    /// Draws the recorded curves onto `renderer` as two side-by-side
    /// panels: the loss history, and the two accuracy histories overlaid
    /// with the latest and best values in the title.
    ///
    /// Rendering replaces the previous output and leaves the recorded
    /// histories untouched. With nothing recorded yet the accuracy panel
    /// keeps the plain title "Accuracy" instead of reading the (absent)
    /// most recent entries.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<(), RenderError> {
        renderer.render(&self.frame())
    }

    fn frame(&self) -> Frame {
        let accuracy_title = match (
            self.train_accuracy_curve.last(),
            self.val_accuracy_curve.last(),
        ) {
            (Some(train), Some(val)) => format!(
                "Train {:.4}, val {:.4}, max val {:.4} at {}",
                train, val, self.best_val_accuracy, self.best_val_epoch
            ),
            _ => String::from("Accuracy"),
        };

        Frame {
            panels: vec![
                Panel {
                    title: String::from("Loss"),
                    series: vec![Series {
                        label: String::from("loss"),
                        points: self.learning_curve.clone(),
                    }],
                },
                Panel {
                    title: accuracy_title,
                    series: vec![
                        Series {
                            label: String::from("train"),
                            points: self.train_accuracy_curve.clone(),
                        },
                        Series {
                            label: String::from("val"),
                            points: self.val_accuracy_curve.clone(),
                        },
                    ],
                },
            ],
        }
    }

    /// Saves the full monitor state to a JSON file.
    ///
    /// # Arguments
    /// * `path` - Path the history should be written to
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MonitorError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Loads a monitor saved with [`Monitor::save`], restoring curves and
    /// best-value bookkeeping verbatim.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MonitorError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
