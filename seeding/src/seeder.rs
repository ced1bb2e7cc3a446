//! One-shot determinism initialization over explicit source handles.

use crate::sources::{AcceleratorSource, RandomSource};

/// Parameters for [`Seeder::seed_all`].
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Value every source is seeded with.
    pub seed_value: u64,
    /// Device string deciding whether accelerator state is also seeded,
    /// e.g. "cpu" or "cuda:0".
    pub device: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            seed_value: 0,
            device: String::from("cpu"),
        }
    }
}

/// Registry of every seedable source reachable by a training run.
///
/// The caller assembles the handles once at startup and applies
/// [`seed_all`](Seeder::seed_all) before the training loop begins.
#[derive(Default)]
pub struct Seeder {
    sources: Vec<Box<dyn RandomSource>>,
    accelerators: Vec<Box<dyn AcceleratorSource>>,
}

impl Seeder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a general-purpose source. Sources are reseeded in
    /// registration order.
    pub fn register(&mut self, source: impl RandomSource + 'static) -> &mut Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Registers an accelerator runtime handle.
    pub fn register_accelerator(
        &mut self,
        accelerator: impl AcceleratorSource + 'static,
    ) -> &mut Self {
        self.accelerators.push(Box::new(accelerator));
        self
    }

    /// Seeds every registered source with the same value.
    ///
    /// When the config names a non-CPU device, any registered accelerator
    /// matching the device kind (the part before a `:`) is also reseeded,
    /// on its current device and across all its devices, and switched to
    /// reproducible kernel selection with benchmark auto-tuning disabled.
    ///
    /// A device kind no registered accelerator recognizes gets the
    /// CPU-only path. That fallback is deliberate: an unknown token means
    /// "no accelerator state to seed", not a failure.
    ///
    /// Calling this twice with the same config leaves every source in the
    /// same state, so downstream draws repeat identically.
    ///
    /// Reports the seeded source names on stdout as it goes.
    pub fn seed_all(&mut self, config: &SeedConfig) {
        for source in &mut self.sources {
            source.reseed(config.seed_value);
        }
        if !self.sources.is_empty() {
            let names = self
                .sources
                .iter()
                .map(|source| source.name())
                .collect::<Vec<_>>()
                .join(", ");
            println!("Seeded {} with value {}", names, config.seed_value);
        }

        let kind = device_kind(&config.device);
        if kind == "cpu" {
            return;
        }

        for accelerator in &mut self.accelerators {
            if accelerator.device_token() != kind {
                continue;
            }
            accelerator.reseed(config.seed_value);
            accelerator.reseed_all_devices(config.seed_value);
            accelerator.force_deterministic_kernels();
            accelerator.disable_benchmark_autotune();
            println!(
                "Seeded {} accelerator and pinned deterministic kernels",
                accelerator.device_token()
            );
        }
    }
}

/// Device kind of a device string: everything before the first `:`.
fn device_kind(device: &str) -> &str {
    device.split(':').next().unwrap_or(device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SharedStdRng;
    use rand::{Rng, SeedableRng};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default, PartialEq)]
    struct AcceleratorState {
        seeds: Vec<u64>,
        all_device_seeds: Vec<u64>,
        deterministic_kernels: bool,
        benchmark_autotune: bool,
    }

    /// Accelerator fake whose state stays observable after registration.
    struct FakeAccelerator {
        token: &'static str,
        state: Rc<RefCell<AcceleratorState>>,
    }

    impl FakeAccelerator {
        fn new(token: &'static str) -> (Self, Rc<RefCell<AcceleratorState>>) {
            let state = Rc::new(RefCell::new(AcceleratorState {
                benchmark_autotune: true,
                ..AcceleratorState::default()
            }));
            (
                Self {
                    token,
                    state: Rc::clone(&state),
                },
                state,
            )
        }
    }

    impl AcceleratorSource for FakeAccelerator {
        fn device_token(&self) -> &str {
            self.token
        }

        fn reseed(&mut self, seed_value: u64) {
            self.state.borrow_mut().seeds.push(seed_value);
        }

        fn reseed_all_devices(&mut self, seed_value: u64) {
            self.state.borrow_mut().all_device_seeds.push(seed_value);
        }

        fn force_deterministic_kernels(&mut self) {
            self.state.borrow_mut().deterministic_kernels = true;
        }

        fn disable_benchmark_autotune(&mut self) {
            self.state.borrow_mut().benchmark_autotune = false;
        }
    }

    #[test]
    fn test_default_config() {
        let config = SeedConfig::default();
        assert_eq!(config.seed_value, 0);
        assert_eq!(config.device, "cpu");
    }

    #[test]
    fn test_seeding_is_repeatable() {
        let handle = SharedStdRng::new("general", 1);
        let mut seeder = Seeder::new();
        seeder.register(handle.clone());

        let config = SeedConfig {
            seed_value: 42,
            device: String::from("cpu"),
        };

        seeder.seed_all(&config);
        let first: Vec<u64> = (0..8).map(|_| handle.with(|rng| rng.random())).collect();

        seeder.seed_all(&config);
        let second: Vec<u64> = (0..8).map(|_| handle.with(|rng| rng.random())).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_all_sources_get_the_same_seed() {
        let general = SharedStdRng::new("general", 1);
        let arrays = SharedStdRng::new("arrays", 2);

        let mut seeder = Seeder::new();
        seeder.register(general.clone());
        seeder.register(arrays.clone());
        seeder.seed_all(&SeedConfig {
            seed_value: 9,
            device: String::from("cpu"),
        });

        let from_general: u64 = general.with(|rng| rng.random());
        let from_arrays: u64 = arrays.with(|rng| rng.random());
        assert_eq!(from_general, from_arrays);
    }

    #[test]
    fn test_matching_accelerator_is_fully_configured() {
        let (accelerator, state) = FakeAccelerator::new("cuda");
        let mut seeder = Seeder::new();
        seeder.register_accelerator(accelerator);

        seeder.seed_all(&SeedConfig {
            seed_value: 7,
            device: String::from("cuda:1"),
        });

        let state = state.borrow();
        assert_eq!(state.seeds, vec![7]);
        assert_eq!(state.all_device_seeds, vec![7]);
        assert!(state.deterministic_kernels);
        assert!(!state.benchmark_autotune);
    }

    #[test]
    fn test_unrecognized_device_falls_back_to_cpu_path() {
        let handle = SharedStdRng::new("general", 1);
        let (accelerator, state) = FakeAccelerator::new("cuda");

        let mut seeder = Seeder::new();
        seeder.register(handle.clone());
        seeder.register_accelerator(accelerator);

        seeder.seed_all(&SeedConfig {
            seed_value: 5,
            device: String::from("tpu:0"),
        });

        // General sources are still seeded; the accelerator is untouched.
        let from_handle: u64 = handle.with(|rng| rng.random());
        let mut fresh = rand::rngs::StdRng::seed_from_u64(5);
        let expected: u64 = fresh.random();
        assert_eq!(from_handle, expected);

        let state = state.borrow();
        assert!(state.seeds.is_empty());
        assert!(state.all_device_seeds.is_empty());
        assert!(!state.deterministic_kernels);
        assert!(state.benchmark_autotune);
    }

    #[test]
    fn test_cpu_device_skips_accelerators() {
        let (accelerator, state) = FakeAccelerator::new("cuda");
        let mut seeder = Seeder::new();
        seeder.register_accelerator(accelerator);

        seeder.seed_all(&SeedConfig::default());

        assert!(state.borrow().seeds.is_empty());
    }
}
