//! Resize setup: config overrides and save mode.

use scaler_core::{Config, OutputFormat};

use super::types::ManifestFormat;
use super::ResizeArgs;

/// How results are saved to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// One result → single file, several → archive
    Auto,
    /// Always an archive
    Archive,
    /// Always individual files
    Files,
}

impl SaveMode {
    pub fn from_args(args: &ResizeArgs) -> Self {
        if args.zip {
            Self::Archive
        } else if args.no_zip {
            Self::Files
        } else {
            Self::Auto
        }
    }
}

/// Fold CLI flags into the loaded config. Validation happens when the
/// `Scaler` is built.
pub fn apply_overrides(config: &mut Config, args: &ResizeArgs) {
    if let Some(width) = args.width {
        config.resize.target_width = width;
    }
    if let Some(quality) = args.quality {
        config.resize.quality = quality;
    }
    if let Some(filter) = args.filter {
        config.resize.filter = filter.into();
    }
    if args.no_upscale {
        config.resize.upscale = false;
    }
    if let Some(parallel) = args.parallel {
        config.processing.parallel_workers = parallel;
    }
    if let Some(ref name) = args.archive_name {
        config.package.archive_name = name.clone();
    }
    if let Some(ref dir) = args.out_dir {
        config.output.dir = dir.to_string_lossy().into_owned();
    }
}

/// Manifest format: `--format` if given, else `output.format` from config
/// (JSON when the config value is unknown).
pub fn manifest_format(config: &Config, flag: Option<ManifestFormat>) -> OutputFormat {
    if let Some(format) = flag {
        return format.into();
    }
    OutputFormat::parse(&config.output.format).unwrap_or_else(|| {
        tracing::warn!(
            "Unknown output format {:?}, using json",
            config.output.format
        );
        OutputFormat::Json
    })
}
