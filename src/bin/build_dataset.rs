/// build_dataset: turn every annotated recording under DATASET_PATH into
/// labeled windows in OUTPUT_PATH/STORE_FILENAME.
///
/// Configuration comes from the environment (PREICTAL_SECONDS,
/// WINDOW_SIZE_SECONDS, WINDOW_OVERLAP_SECONDS, DATASET_PATH, OUTPUT_PATH,
/// SLICES_FILENAME, STORE_FILENAME, optional USEFUL_CHANNELS, DISCARDED_EDFS,
/// BAND_LOW_HZ, BAND_HIGH_HZ); the paths can be overridden on the command line.
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ictal::{build, DatasetConfig};

#[derive(Parser, Debug)]
#[command(name = "build_dataset", about = "Build the seizure-onset window dataset")]
struct Args {
    /// Override DATASET_PATH.
    #[arg(long)]
    dataset_path: Option<PathBuf>,

    /// Override OUTPUT_PATH.
    #[arg(long)]
    output_path: Option<PathBuf>,

    /// Log per-recording details (same as RUST_LOG=debug).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let mut cfg = DatasetConfig::from_env().context("reading configuration")?;
    if let Some(p) = args.dataset_path {
        cfg.dataset_path = p;
    }
    if let Some(p) = args.output_path {
        cfg.output_path = p;
    }

    tracing::info!(
        dataset = %cfg.dataset_path.display(),
        output = %cfg.store_path().display(),
        preictal_s = cfg.preictal_seconds,
        window_s = cfg.window_size_seconds,
        overlap_s = cfg.window_overlap_seconds,
        channels = cfg.useful_channels.len(),
        "starting dataset build"
    );

    let summary = build(&cfg)?;
    println!(
        "{} patients, {} recordings ({} discarded): {} normal windows, {} preictal segments ({} windows)",
        summary.patients,
        summary.recordings,
        summary.discarded,
        summary.normal_windows,
        summary.anomaly_entries,
        summary.anomaly_windows,
    );
    Ok(())
}
