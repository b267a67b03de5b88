//! CLI enum types for the resize command: resampling filter and manifest format.

use clap::ValueEnum;
use scaler_core::config::ResizeFilter;
use scaler_core::OutputFormat as CoreOutputFormat;

/// Resampling filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Filter {
    /// Nearest neighbour (fastest, blocky)
    Nearest,
    /// Bilinear
    #[value(alias = "bilinear")]
    Triangle,
    /// Bicubic (Catmull-Rom)
    #[value(alias = "bicubic")]
    Catmullrom,
    /// Lanczos, window 3 (sharpest)
    #[value(alias = "lanczos")]
    Lanczos3,
}

impl From<Filter> for ResizeFilter {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Nearest => ResizeFilter::Nearest,
            Filter::Triangle => ResizeFilter::Triangle,
            Filter::Catmullrom => ResizeFilter::CatmullRom,
            Filter::Lanczos3 => ResizeFilter::Lanczos3,
        }
    }
}

/// Manifest formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ManifestFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<ManifestFormat> for CoreOutputFormat {
    fn from(format: ManifestFormat) -> Self {
        match format {
            ManifestFormat::Json => CoreOutputFormat::Json,
            ManifestFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}
