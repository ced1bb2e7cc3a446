//! Seedable pseudo-random source handles.
//!
//! Rather than reaching into hidden global state, every random source a
//! training run draws from is wrapped in a handle and registered with a
//! [`Seeder`](crate::Seeder). The same handle is kept by the code that
//! samples from the source, so resetting the handle resets the stream.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::rc::Rc;

/// A pseudo-random source that can be reset to a fixed state.
pub trait RandomSource {
    /// Name used when reporting which sources were seeded.
    fn name(&self) -> &str;

    /// Resets the source to the state derived from `seed_value`.
    fn reseed(&mut self, seed_value: u64);
}

/// An accelerator runtime exposing its own random state and the switches
/// that control how it selects compute kernels.
pub trait AcceleratorSource {
    /// Device kind this runtime answers to in a device string, e.g. "cuda".
    fn device_token(&self) -> &str;

    /// Resets the current device's random state.
    fn reseed(&mut self, seed_value: u64);

    /// Resets the random state of every device the runtime manages.
    fn reseed_all_devices(&mut self, seed_value: u64);

    /// Pins kernel selection to reproducible algorithms.
    fn force_deterministic_kernels(&mut self);

    /// Turns off auto-tuning that benchmarks kernels at run time.
    fn disable_benchmark_autotune(&mut self);
}

/// A named `StdRng` handle shared between the seeder and the code that
/// draws from it.
///
/// Cloning shares the underlying generator, so a clone registered with a
/// [`Seeder`](crate::Seeder) controls the same stream the caller samples
/// from. The handle is not thread-safe; keep it on one thread.
#[derive(Clone)]
pub struct SharedStdRng {
    name: &'static str,
    rng: Rc<RefCell<StdRng>>,
}

impl SharedStdRng {
    /// Creates a handle initially seeded from `seed_value`.
    pub fn new(name: &'static str, seed_value: u64) -> Self {
        Self {
            name,
            rng: Rc::new(RefCell::new(StdRng::seed_from_u64(seed_value))),
        }
    }

    /// Runs `f` with exclusive access to the generator.
    pub fn with<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        f(&mut self.rng.borrow_mut())
    }
}

impl RandomSource for SharedStdRng {
    fn name(&self) -> &str {
        self.name
    }

    fn reseed(&mut self, seed_value: u64) {
        *self.rng.borrow_mut() = StdRng::seed_from_u64(seed_value);
    }
}
