use ndarray::Array2;
use std::fmt;

/// Execution target a batch is staged on before inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    /// Host memory, the default.
    #[default]
    Cpu,
    /// An accelerator identified by its device index.
    Accelerator(u32),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Accelerator(index) => write!(f, "accel:{index}"),
        }
    }
}

/// A model capable of forward inference on a batch of samples.
///
/// Inputs are `[features x batch]` matrices with one sample per column; the
/// returned score matrix is `[num_classes x batch]` with one score column per
/// sample. Implementations stage the batch on `device` before scoring.
pub trait Classifier {
    /// Computes per-class scores for every sample in the batch.
    ///
    /// # Errors
    ///
    /// Any failure from the underlying runtime (shape mismatch, device
    /// unavailable) is returned to the caller untouched.
    fn scores(&self, inputs: &Array2<f64>, device: Device) -> anyhow::Result<Array2<f64>>;

    /// Switches the model into inference mode, suspending any train-time
    /// behaviour such as gradient tracking or dropout. Called once before an
    /// evaluation pass; the default is a no-op for stateless models.
    fn enter_inference(&self) {}

    /// Restores the model's previous mode. Paired with `enter_inference`.
    fn exit_inference(&self) {}
}

/// Scoped inference-mode context over a model.
///
/// Construction calls [`Classifier::enter_inference`]; dropping the guard
/// calls [`Classifier::exit_inference`], so the mode is restored on every
/// exit path, early returns included.
pub struct InferenceGuard<'a, M: Classifier + ?Sized> {
    model: &'a M,
}

impl<'a, M: Classifier + ?Sized> InferenceGuard<'a, M> {
    pub fn new(model: &'a M) -> Self {
        model.enter_inference();
        Self { model }
    }
}

impl<M: Classifier + ?Sized> Drop for InferenceGuard<'_, M> {
    fn drop(&mut self) {
        self.model.exit_inference();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct ModeTracker {
        entered: Cell<u32>,
        exited: Cell<u32>,
    }

    impl ModeTracker {
        fn new() -> Self {
            Self {
                entered: Cell::new(0),
                exited: Cell::new(0),
            }
        }
    }

    impl Classifier for ModeTracker {
        fn scores(&self, inputs: &Array2<f64>, _device: Device) -> anyhow::Result<Array2<f64>> {
            Ok(inputs.clone())
        }

        fn enter_inference(&self) {
            self.entered.set(self.entered.get() + 1);
        }

        fn exit_inference(&self) {
            self.exited.set(self.exited.get() + 1);
        }
    }

    #[test]
    fn test_device_display() {
        assert_eq!(Device::Cpu.to_string(), "cpu");
        assert_eq!(Device::Accelerator(1).to_string(), "accel:1");
        assert_eq!(Device::default(), Device::Cpu);
    }

    #[test]
    fn test_guard_pairs_enter_and_exit() {
        let model = ModeTracker::new();

        {
            let _guard = InferenceGuard::new(&model);
            assert_eq!(model.entered.get(), 1);
            assert_eq!(model.exited.get(), 0);
        }

        assert_eq!(model.entered.get(), 1);
        assert_eq!(model.exited.get(), 1);
    }

    #[test]
    fn test_guard_exits_on_early_return() {
        let model = ModeTracker::new();

        let failing = |model: &ModeTracker| -> anyhow::Result<()> {
            let _guard = InferenceGuard::new(model);
            anyhow::bail!("batch failed");
        };

        assert!(failing(&model).is_err());
        assert_eq!(model.entered.get(), 1);
        assert_eq!(model.exited.get(), 1);
    }
}
