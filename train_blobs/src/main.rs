mod data;
mod model;

use anyhow::{Context, Result};
use clap::Parser;
use evaluation::{Device, InMemoryBatches, evaluate, evaluate_with_progress};
use indicatif::{ProgressBar, ProgressStyle};
use model::SoftmaxRegression;
use monitor::{Monitor, SvgRenderer};
use seeding::{SeedConfig, Seeder, SharedStdRng};

const HISTORY_PATH: &str = "training_history.json";
const CHART_PATH: &str = "training_progress.svg";

const BATCH_SIZE: usize = 32;
const LEARNING_RATE: f64 = 0.5;
const TRAIN_SAMPLES_PER_CLASS: usize = 200;
const VAL_SAMPLES_PER_CLASS: usize = 50;

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Train { seed, epochs } => {
            train(seed, epochs).context("Failed to train classifier")?
        }
        Command::Graph => graph().context("Failed to render chart")?,
    }

    Ok(())
}

fn train(seed: u64, epochs: usize) -> Result<()> {
    // One handle per random stream; the seeder resets both from one value.
    let model_rng = SharedStdRng::new("model-init", seed);
    let data_rng = SharedStdRng::new("data", seed);

    let mut seeder = Seeder::new();
    seeder.register(model_rng.clone());
    seeder.register(data_rng.clone());
    seeder.seed_all(&SeedConfig {
        seed_value: seed,
        device: String::from("cpu"),
    });

    println!("Generating blob dataset...");
    let (train_inputs, train_labels) =
        data_rng.with(|rng| data::make_blobs(rng, TRAIN_SAMPLES_PER_CLASS));
    let (val_inputs, val_labels) = data_rng.with(|rng| data::make_blobs(rng, VAL_SAMPLES_PER_CLASS));

    let train_batches = InMemoryBatches::new(train_inputs.clone(), train_labels.clone(), BATCH_SIZE)?;
    let val_batches = InMemoryBatches::new(val_inputs, val_labels, BATCH_SIZE)?;
    println!(
        "{} training samples, {} validation samples",
        train_batches.len(),
        val_batches.len()
    );

    let mut model = model_rng.with(|rng| {
        SoftmaxRegression::new(data::NUM_FEATURES, data::NUM_CLASSES, LEARNING_RATE, rng)
    });

    let mut monitor = Monitor::new();
    let mut renderer = SvgRenderer::new(CHART_PATH);

    println!("\nTraining for {epochs} epochs...");
    let progress = ProgressBar::new(epochs as u64);
    progress.set_style(create_progress_style(
        "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>4}/{len:4} Epoch {msg}",
    )?);

    for epoch in 1..=epochs {
        let loss = model.fit_epoch(&train_inputs, &train_labels)?;
        let train_accuracy = evaluate(&model, &train_batches, Device::Cpu)?;
        let val_accuracy = evaluate(&model, &val_batches, Device::Cpu)?;

        monitor.record_loss(loss);
        monitor.record_train_accuracy(train_accuracy);
        monitor.record_val_accuracy(val_accuracy);

        progress.set_message(format!("- loss {loss:.4}, val {val_accuracy:.4}"));
        progress.inc(1);

        if epoch % 10 == 0 {
            monitor.render(&mut renderer)?;
        }
    }
    progress.finish_with_message("training complete");

    println!("\nScoring the validation set...");
    let scoring = ProgressBar::new(0);
    scoring.set_style(create_progress_style(
        "{spinner:.yellow} [{elapsed_precise}] {bar:40.yellow/blue} {pos:>4}/{len:4} Samples",
    )?);
    let final_accuracy = evaluate_with_progress(&model, &val_batches, Device::Cpu, &scoring)?;
    scoring.finish_and_clear();
    println!("Final validation accuracy: {final_accuracy:.4}");

    monitor.render(&mut renderer)?;
    monitor
        .save(HISTORY_PATH)
        .context("Failed to save training history")?;

    println!(
        "Best validation accuracy {:.4} at epoch {}",
        monitor.best_val_accuracy(),
        monitor.best_val_epoch()
    );
    println!("History saved to {HISTORY_PATH}, chart saved to {CHART_PATH}");

    Ok(())
}

fn graph() -> Result<()> {
    let monitor = Monitor::load(HISTORY_PATH)
        .with_context(|| format!("Failed to load training history from {HISTORY_PATH}"))?;

    let mut renderer = SvgRenderer::new(CHART_PATH);
    monitor.render(&mut renderer)?;

    println!("Chart saved to {CHART_PATH}");
    Ok(())
}

/// Creates a progress bar style with the specified template.
fn create_progress_style(template: &str) -> Result<ProgressStyle> {
    Ok(ProgressStyle::with_template(template)
        .context("Failed to set progress bar template")?
        .progress_chars("##-"))
}

#[derive(clap::Parser)]
#[command(name = "train_blobs", about = "Softmax regression on synthetic blobs", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Train the classifier and record training progress
    Train {
        /// Seed applied to every random source
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Number of training epochs
        #[arg(long, default_value_t = 60)]
        epochs: usize,
    },
    /// Re-render the progress chart from a saved history
    Graph,
}
