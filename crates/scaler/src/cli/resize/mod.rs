//! The `scaler resize` command.

mod batch;
mod setup;
pub mod types;

pub use types::{Filter, ManifestFormat};

use clap::Args;
use scaler_core::{Config, FileDiscovery};
use std::path::PathBuf;

use batch::run_batch;
use setup::{apply_overrides, SaveMode};

/// Arguments for the `resize` command.
#[derive(Args, Debug, Default)]
pub struct ResizeArgs {
    /// Image files or directories to resize
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory to save results in (defaults to `output.dir` from config)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Output width in pixels
    #[arg(short, long)]
    pub width: Option<u32>,

    /// JPEG quality in [0, 1]
    #[arg(short, long)]
    pub quality: Option<f32>,

    /// Resampling filter
    #[arg(long, value_enum)]
    pub filter: Option<Filter>,

    /// Number of images resized concurrently
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Always bundle results into a zip archive
    #[arg(long, conflicts_with = "no_zip")]
    pub zip: bool,

    /// Always save results as individual files
    #[arg(long)]
    pub no_zip: bool,

    /// Archive file name (must end in .zip)
    #[arg(long)]
    pub archive_name: Option<String>,

    /// Keep images narrower than the target width at their original size
    #[arg(long)]
    pub no_upscale: bool,

    /// Write a manifest of saved artifacts to this file
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Manifest format (defaults to `output.format` from config)
    #[arg(short, long, value_enum)]
    pub format: Option<ManifestFormat>,
}

/// Execute the resize command.
pub async fn execute(args: ResizeArgs, mut config: Config) -> anyhow::Result<()> {
    for input in &args.inputs {
        if !input.exists() {
            anyhow::bail!(
                "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
                input
            );
        }
    }

    apply_overrides(&mut config, &args);
    let mode = SaveMode::from_args(&args);

    let files = FileDiscovery::new(config.processing.clone()).discover_all(&args.inputs);
    if files.is_empty() {
        anyhow::bail!("No supported image files found in {:?}", args.inputs);
    }
    tracing::info!(
        "Found {} image(s) ({:.1} MB)",
        files.len(),
        FileDiscovery::total_size(&files) as f64 / 1_000_000.0
    );

    run_batch(config, &args, mode, files).await
}
