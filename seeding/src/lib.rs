mod seeder;
mod sources;

pub use seeder::{SeedConfig, Seeder};
pub use sources::{AcceleratorSource, RandomSource, SharedStdRng};
